use kernel::model::{
    id::{ResourceId, SlotId},
    slot::SlotHold,
};
use sqlx::types::chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct SlotHoldRow {
    pub slot_id: SlotId,
    pub resource_id: ResourceId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub held_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<SlotHoldRow> for SlotHold {
    fn from(value: SlotHoldRow) -> Self {
        let SlotHoldRow {
            slot_id,
            resource_id,
            start_time,
            end_time,
            held_at,
            expires_at,
        } = value;
        SlotHold {
            slot_id,
            resource_id,
            start_time,
            end_time,
            held_at,
            expires_at,
        }
    }
}
