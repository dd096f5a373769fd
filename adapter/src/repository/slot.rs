use async_trait::async_trait;
use chrono::{Duration, Utc};
use derive_new::new;
use kernel::model::{
    id::{ResourceId, SlotId},
    interval::TimeRange,
    slot::SlotHold,
};
use kernel::repository::slot::SlotHoldRepository;
use shared::error::{AppError, AppResult};

use crate::database::{model::slot::SlotHoldRow, ConnectionPool};

#[derive(new)]
pub struct SlotHoldRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl SlotHoldRepository for SlotHoldRepositoryImpl {
    async fn replace_all(
        &self,
        resource_id: ResourceId,
        slots: Vec<TimeRange>,
        ttl: Duration,
    ) -> AppResult<Vec<SlotHold>> {
        let mut tx = self.db.begin().await?;

        // ① 同一リソースの既存ホールドをすべて破棄する。
        // 前回照会の残骸（TTL が残っていても）と新しい一式が
        // 同居しないよう、削除を先に行う。
        sqlx::query(
            r#"
                DELETE FROM slot_holds WHERE resource_id = $1
            "#,
        )
        .bind(resource_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        // ② 新しい一式を TTL 付きで登録する
        let now = Utc::now();
        let expires_at = now + ttl;
        let mut holds = Vec::with_capacity(slots.len());
        for slot in slots {
            let row: SlotHoldRow = sqlx::query_as(
                r#"
                    INSERT INTO slot_holds
                    (slot_id, resource_id, start_time, end_time, held_at, expires_at)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    RETURNING slot_id, resource_id, start_time, end_time, held_at, expires_at
                "#,
            )
            .bind(SlotId::new())
            .bind(resource_id)
            .bind(slot.start)
            .bind(slot.end)
            .bind(now)
            .bind(expires_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
            holds.push(SlotHold::from(row));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(holds)
    }

    async fn find_by_id(&self, slot_id: SlotId) -> AppResult<Option<SlotHold>> {
        let row: Option<SlotHoldRow> = sqlx::query_as(
            r#"
                SELECT slot_id, resource_id, start_time, end_time, held_at, expires_at
                FROM slot_holds
                WHERE slot_id = $1
            "#,
        )
        .bind(slot_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(hold) = row.map(SlotHold::from) else {
            return Ok(None);
        };

        // リースの期限は読み取り側で必ず検査する。
        // 期限切れの行はこの場で片付けて「存在しない」と答える。
        // TODO: CI に Postgres が入ったら、期限切れ行が None になり
        // 同時に削除されることを #[sqlx::test] で検証する
        if hold.is_expired(Utc::now()) {
            self.delete(slot_id).await?;
            return Ok(None);
        }

        Ok(Some(hold))
    }

    async fn delete(&self, slot_id: SlotId) -> AppResult<()> {
        // 冪等にするため rows_affected は見ない
        sqlx::query(
            r#"
                DELETE FROM slot_holds WHERE slot_id = $1
            "#,
        )
        .bind(slot_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(())
    }

    async fn purge_expired(&self) -> AppResult<u64> {
        let res = sqlx::query(
            r#"
                DELETE FROM slot_holds WHERE expires_at < now()
            "#,
        )
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(res.rows_affected())
    }
}
