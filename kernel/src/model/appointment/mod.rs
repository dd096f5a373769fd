use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    id::{AppointmentId, BranchId, CustomerId, ResourceId, UserId},
    interval::TimeRange,
};

pub mod event;

#[derive(Debug, Clone)]
pub struct Appointment {
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

impl Appointment {
    pub fn time_range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.end_time)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "appointment_status", rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    // scheduled → completed | cancelled のみ。終端状態からは遷移できない。
    pub fn can_transition_to(self, next: AppointmentStatus) -> bool {
        matches!(
            (self, next),
            (AppointmentStatus::Scheduled, AppointmentStatus::Completed)
                | (AppointmentStatus::Scheduled, AppointmentStatus::Cancelled)
        )
    }
}
