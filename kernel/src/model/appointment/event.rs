use chrono::{DateTime, Utc};
use derive_new::new;

use crate::model::{
    appointment::AppointmentStatus,
    id::{AppointmentId, BranchId, CustomerId, ResourceId, UserId},
};

#[derive(Debug, new)]
pub struct CreateAppointment {
    pub resource_id: ResourceId,
    pub customer_id: CustomerId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_by: UserId,
    pub created_branch_id: BranchId,
}

// 作成後に変更できるのは status と notes だけ。
// 他のフィールドを持たないことで不変条件を型で担保する。
#[derive(Debug, new)]
pub struct UpdateAppointmentProgress {
    pub appointment_id: AppointmentId,
    pub status: Option<AppointmentStatus>,
    pub notes: Option<String>,
}
