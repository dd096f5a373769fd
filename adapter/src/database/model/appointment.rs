use kernel::model::{
    appointment::{Appointment, AppointmentStatus},
    id::{AppointmentId, BranchId, CustomerId, ResourceId, UserId},
};
use sqlx::types::chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct AppointmentRow {
    pub appointment_id: AppointmentId,
    pub resource_id: ResourceId,
    pub customer_id: CustomerId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_by: UserId,
    pub created_branch_id: BranchId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AppointmentRow> for Appointment {
    fn from(value: AppointmentRow) -> Self {
        let AppointmentRow {
            appointment_id,
            resource_id,
            customer_id,
            start_time,
            end_time,
            status,
            notes,
            created_by,
            created_branch_id,
            created_at,
            updated_at,
        } = value;
        Appointment {
            appointment_id,
            resource_id,
            customer_id,
            start_time,
            end_time,
            status,
            notes,
            created_by,
            created_branch_id,
            created_at,
            updated_at,
        }
    }
}
