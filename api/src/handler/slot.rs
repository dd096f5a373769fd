use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Duration;
use garde::Validate;
use kernel::model::{appointment::Appointment, id::ResourceId, interval::TimeRange, slot};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::slot::{AvailableSlotResponse, AvailableSlotsQuery, AvailableSlotsResponse},
};

/// 指定期間を枠で敷き詰め、空いている枠をホールド付きで返す。
///
/// 呼び出すたびに同一リソースの既存ホールドは破棄される。
/// 照会のやり直しが古いホールドの掃除を兼ねる。
pub async fn available_slots(
    _user: AuthorizedUser,
    Path(resource_id): Path<ResourceId>,
    State(registry): State<AppRegistry>,
    Query(req): Query<AvailableSlotsQuery>,
) -> AppResult<Json<AvailableSlotsResponse>> {
    req.validate()?;

    if req.query_end_date < req.query_start_date {
        return Err(AppError::UnprocessableEntity(
            "queryEndDate には queryStartDate 以降の日時を指定してください。".into(),
        ));
    }
    let max_window = Duration::days(registry.scheduler_config().max_window_days);
    if req.query_end_date - req.query_start_date > max_window {
        return Err(AppError::UnprocessableEntity(format!(
            "照会期間は最長 {} 日までです。",
            registry.scheduler_config().max_window_days
        )));
    }

    let resource = registry
        .resource_repository()
        .find_by_id(resource_id)
        .await?
        .filter(|r| r.is_bookable())
        .ok_or_else(|| {
            AppError::ResourceNotEligible(format!(
                "リソース（{resource_id}）は現在予約を受け付けていません。"
            ))
        })?;

    let window = TimeRange::new(req.query_start_date, req.query_end_date);
    let booked: Vec<TimeRange> = registry
        .appointment_repository()
        .find_active_in_range(resource_id, window)
        .await?
        .iter()
        .map(Appointment::time_range)
        .collect();

    let slots = slot::tile_available(
        window.start,
        window.end,
        Duration::minutes(req.duration_in_minutes),
        &booked,
    );

    let holds = registry
        .slot_hold_repository()
        .replace_all(resource_id, slots, registry.scheduler_config().hold_ttl())
        .await?;

    let available_slots: Vec<AvailableSlotResponse> =
        holds.into_iter().map(AvailableSlotResponse::from).collect();
    Ok(Json(AvailableSlotsResponse {
        resource: resource.into(),
        query_start_date: req.query_start_date,
        query_end_date: req.query_end_date,
        duration_in_minutes: req.duration_in_minutes,
        total_slots: available_slots.len(),
        available_slots,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, TimeZone, Utc};
    use kernel::model::{
        appointment::{Appointment, AppointmentStatus},
        id::{AppointmentId, BranchId, CustomerId, SlotId, UserId},
        resource::Resource,
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

    fn bookable_resource(resource_id: ResourceId) -> Resource {
        Resource {
            resource_id,
            branch_id: BranchId::new(),
            resource_name: "Room A".into(),
            active: true,
            appointment_active: true,
            online_appointment_active: true,
            is_deleted: false,
        }
    }

    fn scheduled_appointment(
        resource_id: ResourceId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Appointment {
        Appointment {
            appointment_id: AppointmentId::new(),
            resource_id,
            customer_id: CustomerId::new(),
            start_time: start,
            end_time: end,
            status: AppointmentStatus::Scheduled,
            notes: None,
            created_by: UserId::new(),
            created_branch_id: BranchId::new(),
            created_at: at(8, 0),
            updated_at: at(8, 0),
        }
    }

    // モックのリポジトリを差し込んだレジストリを組み立てる
    fn registry_with(
        resource: MockResourceRepository,
        appointment: MockAppointmentRepository,
        slot: MockSlotHoldRepository,
    ) -> AppRegistry {
        AppRegistry::from_parts(
            Arc::new(MockHealthCheckRepository::new()),
            Arc::new(resource),
            Arc::new(appointment),
            Arc::new(slot),
            SchedulerConfig::default(),
        )
    }

    fn query(duration: i64, start: DateTime<Utc>, end: DateTime<Utc>) -> AvailableSlotsQuery {
        AvailableSlotsQuery {
            duration_in_minutes: duration,
            query_start_date: start,
            query_end_date: end,
        }
    }

    #[tokio::test]
    async fn returns_free_slots_around_existing_appointment() -> anyhow::Result<()> {
        let resource_id = ResourceId::new();

        let mut resource_repo = MockResourceRepository::new();
        resource_repo
            .expect_find_by_id()
            .returning(move |id| Ok(Some(bookable_resource(id))));

        // 10:00-10:30 に既存予約
        let mut appointment_repo = MockAppointmentRepository::new();
        appointment_repo
            .expect_find_active_in_range()
            .returning(|id, _| Ok(vec![scheduled_appointment(id, at(10, 0), at(10, 30))]));

        let mut slot_repo = MockSlotHoldRepository::new();
        slot_repo
            .expect_replace_all()
            .times(1)
            .returning(|resource_id, slots, ttl| {
                let now = Utc::now();
                Ok(slots
                    .into_iter()
                    .map(|s| SlotHold {
                        slot_id: SlotId::new(),
                        resource_id,
                        start_time: s.start,
                        end_time: s.end,
                        held_at: now,
                        expires_at: now + ttl,
                    })
                    .collect())
            });

        let registry = registry_with(resource_repo, appointment_repo, slot_repo);
        let Json(res) = available_slots(
            acting_user(),
            Path(resource_id),
            State(registry),
            Query(query(30, at(9, 0), at(11, 0))),
        )
        .await?;

        assert_eq!(res.total_slots, 3);
        let starts: Vec<_> = res.available_slots.iter().map(|s| s.start_time).collect();
        assert_eq!(starts, vec![at(9, 0), at(9, 30), at(10, 30)]);
        assert!(res
            .available_slots
            .iter()
            .all(|s| s.end_time - s.start_time == Duration::minutes(30)));
        // 埋まっている 10:00 始まりの枠は返らない
        assert!(!starts.contains(&at(10, 0)));

        Ok(())
    }

    #[tokio::test]
    async fn rejects_window_longer_than_31_days() {
        let registry = registry_with(
            MockResourceRepository::new(),
            MockAppointmentRepository::new(),
            MockSlotHoldRepository::new(),
        );

        let start = at(9, 0);
        let end = start + Duration::days(32);
        let res = available_slots(
            acting_user(),
            Path(ResourceId::new()),
            State(registry),
            Query(query(30, start, end)),
        )
        .await;

        assert!(matches!(res, Err(AppError::UnprocessableEntity(_))));
    }

    #[tokio::test]
    async fn rejects_end_date_before_start_date() {
        let registry = registry_with(
            MockResourceRepository::new(),
            MockAppointmentRepository::new(),
            MockSlotHoldRepository::new(),
        );

        let res = available_slots(
            acting_user(),
            Path(ResourceId::new()),
            State(registry),
            Query(query(30, at(11, 0), at(9, 0))),
        )
        .await;

        assert!(matches!(res, Err(AppError::UnprocessableEntity(_))));
    }

    #[tokio::test]
    async fn rejects_non_positive_duration() {
        let registry = registry_with(
            MockResourceRepository::new(),
            MockAppointmentRepository::new(),
            MockSlotHoldRepository::new(),
        );

        let res = available_slots(
            acting_user(),
            Path(ResourceId::new()),
            State(registry),
            Query(query(0, at(9, 0), at(11, 0))),
        )
        .await;

        assert!(matches!(res, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn rejects_duration_exceeding_max_window() {
        let registry = registry_with(
            MockResourceRepository::new(),
            MockAppointmentRepository::new(),
            MockSlotHoldRepository::new(),
        );

        let res = available_slots(
            acting_user(),
            Path(ResourceId::new()),
            State(registry),
            Query(query(1_440_000_000_000, at(9, 0), at(11, 0))),
        )
        .await;

        assert!(matches!(res, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn rejects_resource_not_accepting_appointments() {
        let mut resource_repo = MockResourceRepository::new();
        resource_repo.expect_find_by_id().returning(|id| {
            let mut r = bookable_resource(id);
            r.appointment_active = false;
            Ok(Some(r))
        });

        let registry = registry_with(
            resource_repo,
            MockAppointmentRepository::new(),
            MockSlotHoldRepository::new(),
        );

        let res = available_slots(
            acting_user(),
            Path(ResourceId::new()),
            State(registry),
            Query(query(30, at(9, 0), at(11, 0))),
        )
        .await;

        assert!(matches!(res, Err(AppError::ResourceNotEligible(_))));
    }

    #[tokio::test]
    async fn rejects_missing_resource() {
        let mut resource_repo = MockResourceRepository::new();
        resource_repo.expect_find_by_id().returning(|_| Ok(None));

        let registry = registry_with(
            resource_repo,
            MockAppointmentRepository::new(),
            MockSlotHoldRepository::new(),
        );

        let res = available_slots(
            acting_user(),
            Path(ResourceId::new()),
            State(registry),
            Query(query(30, at(9, 0), at(11, 0))),
        )
        .await;

        assert!(matches!(res, Err(AppError::ResourceNotEligible(_))));
    }
}
