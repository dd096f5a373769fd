use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{id::SlotId, slot::SlotHold};
use serde::{Deserialize, Serialize};

use crate::model::resource::ResourceSummaryResponse;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSlotsQuery {
    // 上限は最大検索期間（31 日）を分に換算した値
    #[garde(range(min = 1, max = 44_640))]
    pub duration_in_minutes: i64,
    #[garde(skip)]
    pub query_start_date: DateTime<Utc>,
    #[garde(skip)]
    pub query_end_date: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSlotsResponse {
    pub resource: ResourceSummaryResponse,
    pub query_start_date: DateTime<Utc>,
    pub query_end_date: DateTime<Utc>,
    pub duration_in_minutes: i64,
    pub total_slots: usize,
    pub available_slots: Vec<AvailableSlotResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSlotResponse {
    pub slot_id: SlotId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl From<SlotHold> for AvailableSlotResponse {
    fn from(value: SlotHold) -> Self {
        Self {
            slot_id: value.slot_id,
            start_time: value.start_time,
            end_time: value.end_time,
        }
    }
}
