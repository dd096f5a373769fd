use async_trait::async_trait;
use chrono::Duration;
use shared::error::AppResult;

use crate::model::{
    id::{ResourceId, SlotId},
    interval::TimeRange,
    slot::SlotHold,
};

#[mockall::automock]
#[async_trait]
pub trait SlotHoldRepository: Send + Sync {
    // リソースの既存ホールドをすべて破棄してから新しい一式を登録する。
    // 削除が先であること。前回照会の残骸と新しい枠が同居してはならない。
    async fn replace_all(
        &self,
        resource_id: ResourceId,
        slots: Vec<TimeRange>,
        ttl: Duration,
    ) -> AppResult<Vec<SlotHold>>;
    // 期限切れは None を返す。呼び出し側は「存在しなかった」と区別できない。
    async fn find_by_id(&self, slot_id: SlotId) -> AppResult<Option<SlotHold>>;
    // 冪等。二重削除や期限切れ ID の削除はエラーにしない。
    async fn delete(&self, slot_id: SlotId) -> AppResult<()>;
    async fn purge_expired(&self) -> AppResult<u64>;
}
