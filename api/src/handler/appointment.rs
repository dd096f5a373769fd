use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use garde::Validate;
use kernel::model::{
    appointment::event::{CreateAppointment, UpdateAppointmentProgress},
    id::{AppointmentId, ResourceId},
    interval::TimeRange,
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::appointment::{
        AppointmentRangeQuery, AppointmentResponse, AppointmentsResponse,
        CreateAppointmentRequest, UpdateAppointmentRequest,
    },
};

/// 照会で払い出した枠 ID を消費して予約を確定する。
///
/// リソースの適格性と時間帯の重複はリポジトリのトランザクション内で
/// 再検査される。どちらかに引っかかったホールドは二度と成立しないので
/// その場で破棄する。
pub async fn create_appointment(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateAppointmentRequest>,
) -> AppResult<impl IntoResponse> {
    req.validate()?;

    // ① ホールドの存在確認（期限切れは「存在しない」扱いで返ってくる）
    let hold = registry
        .slot_hold_repository()
        .find_by_id(req.slot_id)
        .await?
        .ok_or_else(|| {
            AppError::SlotExpired(format!(
                "枠（{}）は無効か期限切れです。再度空き枠を照会してください。",
                req.slot_id
            ))
        })?;

    // ② 適格性・重複の再検査と INSERT は一体で行われる
    let event = CreateAppointment::new(
        hold.resource_id,
        req.customer_id,
        hold.start_time,
        hold.end_time,
        req.notes,
        user.user_id,
        user.branch_id,
    );
    let created = registry.appointment_repository().create(event).await;

    match created {
        Ok(appointment) => {
            // ③ 消費したホールドを破棄する。予約は確定済みなので、破棄に
            // 失敗しても TTL と掃除タスクに回収を任せ、成功応答を返す
            if let Err(e) = registry.slot_hold_repository().delete(req.slot_id).await {
                tracing::warn!(
                    error = %e,
                    slot_id = %req.slot_id,
                    "failed to discard consumed slot hold"
                );
            }
            Ok((
                StatusCode::CREATED,
                Json(AppointmentResponse::from(appointment)),
            ))
        }
        Err(e @ (AppError::ResourceNotEligible(_) | AppError::SlotConflict(_))) => {
            // このホールドはもう成立し得ないので片付けてから返す
            tracing::info!(slot_id = %req.slot_id, "discarding unusable slot hold");
            if let Err(del_err) = registry.slot_hold_repository().delete(req.slot_id).await {
                tracing::warn!(
                    error = %del_err,
                    slot_id = %req.slot_id,
                    "failed to discard unusable slot hold"
                );
            }
            Err(e)
        }
        Err(e) => Err(e),
    }
}

pub async fn show_appointment(
    _user: AuthorizedUser,
    Path(appointment_id): Path<AppointmentId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<AppointmentResponse>> {
    registry
        .appointment_repository()
        .find_by_id(appointment_id)
        .await?
        .map(AppointmentResponse::from)
        .map(Json)
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("予約（{appointment_id}）が見つかりませんでした。"))
        })
}

// 更新できるのは status と notes のみ。状態遷移の可否は
// kernel の can_transition_to に従う。
pub async fn update_appointment(
    _user: AuthorizedUser,
    Path(appointment_id): Path<AppointmentId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateAppointmentRequest>,
) -> AppResult<Json<AppointmentResponse>> {
    req.validate()?;

    let event = UpdateAppointmentProgress::new(appointment_id, req.status, req.notes);
    registry
        .appointment_repository()
        .update_progress(event)
        .await
        .map(AppointmentResponse::from)
        .map(Json)
}

pub async fn resource_appointments(
    _user: AuthorizedUser,
    Path(resource_id): Path<ResourceId>,
    State(registry): State<AppRegistry>,
    Query(req): Query<AppointmentRangeQuery>,
) -> AppResult<Json<AppointmentsResponse>> {
    if req.to < req.from {
        return Err(AppError::UnprocessableEntity(
            "to には from 以降の日時を指定してください。".into(),
        ));
    }

    registry
        .appointment_repository()
        .find_active_in_range(resource_id, TimeRange::new(req.from, req.to))
        .await
        .map(AppointmentsResponse::from)
        .map(Json)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, TimeZone, Utc};
    use kernel::model::{
        appointment::{Appointment, AppointmentStatus},
        id::{BranchId, CustomerId, SlotId, UserId},
        slot::SlotHold,
    };
    use kernel::repository::{
        appointment::MockAppointmentRepository, health::MockHealthCheckRepository,
        resource::MockResourceRepository, slot::MockSlotHoldRepository,
    };
    use shared::config::SchedulerConfig;

    use super::*;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, hour, min, 0).unwrap()
    }

    fn acting_user() -> AuthorizedUser {
        AuthorizedUser {
            user_id: UserId::new(),
            branch_id: BranchId::new(),
        }
    }

    fn live_hold(slot_id: SlotId, resource_id: ResourceId) -> SlotHold {
        let now = Utc::now();
        SlotHold {
            slot_id,
            resource_id,
            start_time: at(10, 0),
            end_time: at(10, 30),
            held_at: now,
            expires_at: now + chrono::Duration::seconds(120),
        }
    }

    fn scheduled_appointment(event: &CreateAppointment) -> Appointment {
        Appointment {
            appointment_id: kernel::model::id::AppointmentId::new(),
            resource_id: event.resource_id,
            customer_id: event.customer_id,
            start_time: event.start_time,
            end_time: event.end_time,
            status: AppointmentStatus::Scheduled,
            notes: event.notes.clone(),
            created_by: event.created_by,
            created_branch_id: event.created_branch_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn registry_with(
        appointment: MockAppointmentRepository,
        slot: MockSlotHoldRepository,
    ) -> AppRegistry {
        AppRegistry::from_parts(
            Arc::new(MockHealthCheckRepository::new()),
            Arc::new(MockResourceRepository::new()),
            Arc::new(appointment),
            Arc::new(slot),
            SchedulerConfig::default(),
        )
    }

    fn confirm_request(slot_id: SlotId) -> CreateAppointmentRequest {
        CreateAppointmentRequest {
            slot_id,
            customer_id: CustomerId::new(),
            notes: Some("初回".into()),
        }
    }

    #[tokio::test]
    async fn confirm_creates_appointment_and_consumes_hold() {
        let slot_id = SlotId::new();
        let resource_id = ResourceId::new();

        let mut slot_repo = MockSlotHoldRepository::new();
        slot_repo
            .expect_find_by_id()
            .returning(move |id| Ok(Some(live_hold(id, resource_id))));
        // 成功時は消費したホールドを必ず破棄する
        slot_repo.expect_delete().times(1).returning(|_| Ok(()));

        let mut appointment_repo = MockAppointmentRepository::new();
        appointment_repo
            .expect_create()
            .times(1)
            .returning(|event| Ok(scheduled_appointment(&event)));

        let registry = registry_with(appointment_repo, slot_repo);
        let res = create_appointment(
            acting_user(),
            State(registry),
            Json(confirm_request(slot_id)),
        )
        .await;

        let response = res.unwrap().into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn confirm_succeeds_even_if_hold_cleanup_fails() {
        let slot_id = SlotId::new();
        let resource_id = ResourceId::new();

        let mut slot_repo = MockSlotHoldRepository::new();
        slot_repo
            .expect_find_by_id()
            .returning(move |id| Ok(Some(live_hold(id, resource_id))));
        // 破棄に失敗しても予約自体は確定している。回収は掃除タスクに任せ、
        // クライアントには 201 を返す
        slot_repo
            .expect_delete()
            .times(1)
            .returning(|_| Err(AppError::NoRowsAffectedError("hold delete failed".into())));

        let mut appointment_repo = MockAppointmentRepository::new();
        appointment_repo
            .expect_create()
            .times(1)
            .returning(|event| Ok(scheduled_appointment(&event)));

        let registry = registry_with(appointment_repo, slot_repo);
        let res = create_appointment(
            acting_user(),
            State(registry),
            Json(confirm_request(slot_id)),
        )
        .await;

        let response = res.unwrap().into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn confirm_with_unknown_or_expired_slot_id_fails() {
        // 期限切れも未発行も同じ経路で「存在しない」になる
        let mut slot_repo = MockSlotHoldRepository::new();
        slot_repo.expect_find_by_id().returning(|_| Ok(None));

        let registry = registry_with(MockAppointmentRepository::new(), slot_repo);
        let res = create_appointment(
            acting_user(),
            State(registry),
            Json(confirm_request(SlotId::new())),
        )
        .await;

        assert!(matches!(res, Err(AppError::SlotExpired(_))));
    }

    #[tokio::test]
    async fn confirm_surfaces_conflict_and_discards_hold() {
        let resource_id = ResourceId::new();

        let mut slot_repo = MockSlotHoldRepository::new();
        slot_repo
            .expect_find_by_id()
            .returning(move |id| Ok(Some(live_hold(id, resource_id))));
        // 成立し得ないホールドはその場で破棄される
        slot_repo.expect_delete().times(1).returning(|_| Ok(()));

        let mut appointment_repo = MockAppointmentRepository::new();
        appointment_repo
            .expect_create()
            .returning(|_| Err(AppError::SlotConflict("既に予約があります。".into())));

        let registry = registry_with(appointment_repo, slot_repo);
        let res = create_appointment(
            acting_user(),
            State(registry),
            Json(confirm_request(SlotId::new())),
        )
        .await;

        assert!(matches!(res, Err(AppError::SlotConflict(_))));
    }

    #[tokio::test]
    async fn confirm_on_ineligible_resource_discards_hold() {
        let resource_id = ResourceId::new();

        let mut slot_repo = MockSlotHoldRepository::new();
        slot_repo
            .expect_find_by_id()
            .returning(move |id| Ok(Some(live_hold(id, resource_id))));
        slot_repo.expect_delete().times(1).returning(|_| Ok(()));

        let mut appointment_repo = MockAppointmentRepository::new();
        appointment_repo.expect_create().returning(|_| {
            Err(AppError::ResourceNotEligible(
                "予約を受け付けていません。".into(),
            ))
        });

        let registry = registry_with(appointment_repo, slot_repo);
        let res = create_appointment(
            acting_user(),
            State(registry),
            Json(confirm_request(SlotId::new())),
        )
        .await;

        assert!(matches!(res, Err(AppError::ResourceNotEligible(_))));
    }

    #[tokio::test]
    async fn show_appointment_returns_not_found_for_unknown_id() {
        let mut appointment_repo = MockAppointmentRepository::new();
        appointment_repo.expect_find_by_id().returning(|_| Ok(None));

        let registry = registry_with(appointment_repo, MockSlotHoldRepository::new());
        let res = show_appointment(
            acting_user(),
            Path(AppointmentId::new()),
            State(registry),
        )
        .await;

        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
    }

    #[tokio::test]
    async fn range_query_rejects_inverted_range() {
        let registry = registry_with(
            MockAppointmentRepository::new(),
            MockSlotHoldRepository::new(),
        );
        let res = resource_appointments(
            acting_user(),
            Path(ResourceId::new()),
            State(registry),
            Query(AppointmentRangeQuery {
                from: at(11, 0),
                to: at(9, 0),
            }),
        )
        .await;

        assert!(matches!(res, Err(AppError::UnprocessableEntity(_))));
    }
}
