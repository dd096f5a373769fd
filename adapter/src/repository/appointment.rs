use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    appointment::{
        event::{CreateAppointment, UpdateAppointmentProgress},
        Appointment, AppointmentStatus,
    },
    id::{AppointmentId, ResourceId},
    interval::TimeRange,
};
use kernel::repository::appointment::AppointmentRepository;
use shared::error::{AppError, AppResult};

use crate::database::{
    model::{appointment::AppointmentRow, resource::ResourceRow},
    ConnectionPool,
};

#[derive(new)]
pub struct AppointmentRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl AppointmentRepository for AppointmentRepositoryImpl {
    // 予約確定操作を行う
    async fn create(&self, event: CreateAppointment) -> AppResult<Appointment> {
        let mut tx = self.db.begin().await?;

        // トランザクション分離レベルを SERIALIZABLE に設定する
        self.set_transaction_serializable(&mut tx).await?;

        // 事前のチェックとして、以下を調べる。
        // - 指定のリソースがまだ予約を受け付けられる状態か
        // - 希望時間帯にキャンセル以外の既存予約が無いか
        //
        // 照会からここまでの間に状態が変わっている可能性があるため、
        // 照会時と同じ判定を現在のデータに対してやり直す。
        {
            //
            // ① リソースの存在確認 ＋ 適格性チェック
            //
            let resource_row: Option<ResourceRow> = sqlx::query_as(
                r#"
                    SELECT
                        resource_id,
                        branch_id,
                        resource_name,
                        active,
                        appointment_active,
                        online_appointment_active,
                        is_deleted
                    FROM resources
                    WHERE resource_id = $1
                "#,
            )
            .bind(event.resource_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            let eligible = resource_row
                .map(kernel::model::resource::Resource::from)
                .map(|r| r.is_bookable())
                .unwrap_or(false);
            if !eligible {
                return Err(AppError::ResourceNotEligible(format!(
                    "リソース（{}）は現在予約を受け付けていません。再度空き枠を照会してください。",
                    event.resource_id
                )));
            }

            //
            // ② 希望時間帯が既存予約と重なっていないか確認
            //    重複条件：
            //        existing.start < new.end AND new.start < existing.end
            //
            let overlap: Option<(AppointmentId,)> = sqlx::query_as(
                r#"
                    SELECT appointment_id
                    FROM appointments
                    WHERE resource_id = $1
                      AND status <> 'cancelled'
                      AND start_time < $3
                      AND $2 < end_time
                    LIMIT 1
                "#,
            )
            .bind(event.resource_id)
            .bind(event.start_time)
            .bind(event.end_time)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            if overlap.is_some() {
                return Err(AppError::SlotConflict(format!(
                    "リソース（{}）の指定時間帯にはすでに予約が存在します。再度空き枠を照会してください。",
                    event.resource_id
                )));
            }
        }

        // ③ 予約レコードを追加する。
        // appointments テーブルの排他制約（resource_id × 時間帯）により、
        // 同時に走った確定操作が両方ともここまで到達しても
        // コミットできるのは片方だけになる。
        let row: AppointmentRow = sqlx::query_as(
            r#"
                INSERT INTO appointments
                (appointment_id, resource_id, customer_id, start_time, end_time,
                 status, notes, created_by, created_branch_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING
                    appointment_id, resource_id, customer_id, start_time, end_time,
                    status, notes, created_by, created_branch_id, created_at, updated_at
            "#,
        )
        .bind(AppointmentId::new())
        .bind(event.resource_id)
        .bind(event.customer_id)
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(AppointmentStatus::Scheduled)
        .bind(&event.notes)
        .bind(event.created_by)
        .bind(event.created_branch_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_conflictable_error(e, event.resource_id))?;

        tx.commit()
            .await
            .map_err(|e| map_conflictable_error(e, event.resource_id))?;

        Ok(Appointment::from(row))
    }

    async fn find_by_id(&self, appointment_id: AppointmentId) -> AppResult<Option<Appointment>> {
        let row: Option<AppointmentRow> = sqlx::query_as(
            r#"
                SELECT
                    appointment_id, resource_id, customer_id, start_time, end_time,
                    status, notes, created_by, created_branch_id, created_at, updated_at
                FROM appointments
                WHERE appointment_id = $1
            "#,
        )
        .bind(appointment_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Appointment::from))
    }

    // 照会期間に収まるキャンセル以外の予約を取得する
    async fn find_active_in_range(
        &self,
        resource_id: ResourceId,
        range: TimeRange,
    ) -> AppResult<Vec<Appointment>> {
        let rows: Vec<AppointmentRow> = sqlx::query_as(
            r#"
                SELECT
                    appointment_id, resource_id, customer_id, start_time, end_time,
                    status, notes, created_by, created_branch_id, created_at, updated_at
                FROM appointments
                WHERE resource_id = $1
                  AND status <> 'cancelled'
                  AND start_time >= $2
                  AND end_time <= $3
                ORDER BY start_time ASC
            "#,
        )
        .bind(resource_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Appointment::from).collect())
    }

    // status / notes の更新操作を行う
    async fn update_progress(&self, event: UpdateAppointmentProgress) -> AppResult<Appointment> {
        let mut tx = self.db.begin().await?;

        // ① 現在の状態を取得し、遷移の可否を確認する
        let current: Option<AppointmentRow> = sqlx::query_as(
            r#"
                SELECT
                    appointment_id, resource_id, customer_id, start_time, end_time,
                    status, notes, created_by, created_branch_id, created_at, updated_at
                FROM appointments
                WHERE appointment_id = $1
                FOR UPDATE
            "#,
        )
        .bind(event.appointment_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(current) = current else {
            return Err(AppError::EntityNotFound(format!(
                "予約（{}）が見つかりませんでした。",
                event.appointment_id
            )));
        };

        if let Some(next) = event.status {
            if !current.status.can_transition_to(next) {
                return Err(AppError::UnprocessableEntity(format!(
                    "予約（{}）を {:?} から {:?} へ変更することはできません。",
                    event.appointment_id, current.status, next
                )));
            }
        }

        // ② 更新できるのは status と notes のみ
        let row: AppointmentRow = sqlx::query_as(
            r#"
                UPDATE appointments
                SET
                    status = COALESCE($2, status),
                    notes = COALESCE($3, notes),
                    updated_at = now()
                WHERE appointment_id = $1
                RETURNING
                    appointment_id, resource_id, customer_id, start_time, end_time,
                    status, notes, created_by, created_branch_id, created_at, updated_at
            "#,
        )
        .bind(event.appointment_id)
        .bind(event.status)
        .bind(&event.notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(Appointment::from(row))
    }
}

impl AppointmentRepositoryImpl {
    // create メソッドでのトランザクションを利用するにあたり
    // トランザクション分離レベルを SERIALIZABLE にするために
    // 内部的に使うメソッド
    async fn set_transaction_serializable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }
}

// 排他制約違反・一意制約違反・直列化失敗はいずれも
// 「同時に入った別の確定に負けた」ことを意味するので SlotConflict に寄せる。
// クライアントへの指示はどれも同じ（再照会してやり直す）である。
fn map_conflictable_error(e: sqlx::Error, resource_id: ResourceId) -> AppError {
    if let sqlx::Error::Database(ref db_err) = e {
        if let Some(code) = db_err.code() {
            // 23P01: exclusion_violation / 23505: unique_violation / 40001: serialization_failure
            if matches!(code.as_ref(), "23P01" | "23505" | "40001") {
                return AppError::SlotConflict(format!(
                    "リソース（{resource_id}）の指定時間帯にはすでに予約が存在します。再度空き枠を照会してください。"
                ));
            }
        }
    }
    AppError::SpecificOperationError(e)
}
