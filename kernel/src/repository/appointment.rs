use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    appointment::{
        event::{CreateAppointment, UpdateAppointmentProgress},
        Appointment,
    },
    id::{AppointmentId, ResourceId},
    interval::TimeRange,
};

#[mockall::automock]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    // 予約を確定する。リソースの適格性と時間帯の重複を
    // 同一トランザクション内で再検査したうえで INSERT する。
    async fn create(&self, event: CreateAppointment) -> AppResult<Appointment>;
    async fn find_by_id(&self, appointment_id: AppointmentId) -> AppResult<Option<Appointment>>;
    // 照会期間に収まる、キャンセル以外の予約を取得する
    async fn find_active_in_range(
        &self,
        resource_id: ResourceId,
        range: TimeRange,
    ) -> AppResult<Vec<Appointment>>;
    // status と notes だけを更新する（状態遷移は前進のみ）
    async fn update_progress(&self, event: UpdateAppointmentProgress) -> AppResult<Appointment>;
}
