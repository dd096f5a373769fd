use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    appointment::{Appointment, AppointmentStatus},
    id::{AppointmentId, BranchId, CustomerId, ResourceId, SlotId, UserId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    #[garde(skip)]
    pub slot_id: SlotId,
    #[garde(skip)]
    pub customer_id: CustomerId,
    #[garde(inner(length(max = 1000)))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    #[garde(skip)]
    pub status: Option<AppointmentStatus>,
    #[garde(inner(length(max = 1000)))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRangeQuery {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentsResponse {
    pub items: Vec<AppointmentResponse>,
}

impl From<Vec<Appointment>> for AppointmentsResponse {
    fn from(value: Vec<Appointment>) -> Self {
        Self {
            items: value.into_iter().map(AppointmentResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentResponse {
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

impl From<Appointment> for AppointmentResponse {
    fn from(value: Appointment) -> Self {
        let Appointment {
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
        Self {
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
