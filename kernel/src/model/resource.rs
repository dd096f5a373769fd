use crate::model::id::{BranchId, ResourceId};

#[derive(Debug, Clone)]
pub struct Resource {
    pub resource_id: ResourceId,
    pub branch_id: BranchId,
    pub resource_name: String,
    pub active: bool,
    pub appointment_active: bool,
    pub online_appointment_active: bool,
    pub is_deleted: bool,
}

impl Resource {
    // 予約を受け付けられる条件。照会時と確定時で必ず同じ判定を通す。
    pub fn is_bookable(&self) -> bool {
        !self.is_deleted && self.active && self.appointment_active
    }
}
