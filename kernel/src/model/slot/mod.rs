use chrono::{DateTime, Duration, Utc};

use crate::model::{
    id::{ResourceId, SlotId},
    interval::TimeRange,
};

/// 照会で払い出した空き枠の一時ホールド。
/// 真実のレコードではなくリースであり、expires_at を過ぎたら
/// 物理削除前でも存在しないものとして扱う。
#[derive(Debug, Clone)]
pub struct SlotHold {
    pub slot_id: SlotId,
    pub resource_id: ResourceId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub held_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SlotHold {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn time_range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.end_time)
    }
}

/// 照会期間を duration 刻みで敷き詰め、既存予約と重ならない枠だけを返す。
///
/// カーソルは window_start から duration ずつ進み、枠どうしは隣接して
/// 重ならない。window_end をはみ出す端数の枠は出力しない。
/// 予約と重なった候補は黙って捨てる（フラグ付きで返したりしない）。
pub fn tile_available(
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    duration: Duration,
    booked: &[TimeRange],
) -> Vec<TimeRange> {
    if duration <= Duration::zero() {
        return Vec::new();
    }

    let mut slots = Vec::new();
    let mut cursor = window_start;
    loop {
        // 巨大な duration で DateTime の上限を越えるとオーバーフローするため
        // checked 加算を使い、越えた場合は期間の終わりとして扱う
        let Some(candidate_end) = cursor.checked_add_signed(duration) else {
            break;
        };
        let candidate = TimeRange::new(cursor, candidate_end);
        if candidate.end > window_end {
            break;
        }
        if booked.iter().all(|b| !candidate.overlaps(b)) {
            slots.push(candidate);
        }
        cursor = candidate.end;
    }
    slots
}
