use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::id::SlotId;
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::AuthorizedUser,
    model::slot::{
        CreateSlotRequest, SlotResponse, SwappableSlotResponse, UpdateSlotStatusRequest,
        UpdateSlotStatusRequestWithIds,
    },
};

pub async fn register_slot(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateSlotRequest>,
) -> AppResult<(StatusCode, Json<SlotResponse>)> {
    req.validate(&())?;

    registry
        .slot_repository()
        .create(req.into(), user.id())
        .await
        .map(|slot| (StatusCode::CREATED, Json(slot.into())))
}

pub async fn show_my_slots(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<SlotResponse>>> {
    registry
        .slot_repository()
        .find_by_owner(user.id())
        .await
        .map(|slots| Json(slots.into_iter().map(SlotResponse::from).collect()))
}

pub async fn update_slot_status(
    user: AuthorizedUser,
    Path(slot_id): Path<SlotId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateSlotStatusRequest>,
) -> AppResult<StatusCode> {
    let update_status = UpdateSlotStatusRequestWithIds::new(slot_id, user.id(), req).try_into()?;
    registry
        .slot_repository()
        .update_status(update_status)
        .await
        .map(|_| StatusCode::OK)
}

pub async fn show_swappable_slots(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<SwappableSlotResponse>>> {
    registry
        .slot_repository()
        .find_swappable_excluding(user.id())
        .await
        .map(|slots| {
            Json(
                slots
                    .into_iter()
                    .map(SwappableSlotResponse::from)
                    .collect(),
            )
        })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::Request;
    use chrono::{TimeZone, Utc};
    use kernel::{
        model::{
            auth::AccessToken,
            id::UserId,
            slot::{Slot, SlotStatus},
            user::{SlotOwner, User},
        },
        repository::{
            auth::MockAuthRepository, health::MockHealthCheckRepository,
            slot::MockSlotRepository, swap::MockSwapRepository, user::MockUserRepository,
        },
    };
    use shared::error::AppError;
    use tower::ServiceExt;

    use super::*;
    use crate::route::slot::build_slot_routers;

    fn authorized_user(user_id: UserId) -> AuthorizedUser {
        AuthorizedUser {
            access_token: AccessToken("dummy".into()),
            user: User {
                user_id,
                user_name: "Alice".into(),
                email: "alice@example.com".into(),
            },
        }
    }

    fn registry_with_slot_repo(slot_repository: MockSlotRepository) -> AppRegistry {
        AppRegistry::with_repositories(
            Arc::new(MockHealthCheckRepository::new()),
            Arc::new(MockAuthRepository::new()),
            Arc::new(MockUserRepository::new()),
            Arc::new(slot_repository),
            Arc::new(MockSwapRepository::new()),
        )
    }

    fn sample_slot(owner_id: UserId, status: SlotStatus) -> Slot {
        Slot {
            slot_id: kernel::model::id::SlotId::new(),
            title: "Morning shift".into(),
            start_time: Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
            status,
            owner: SlotOwner {
                owner_id,
                owner_name: "Alice".into(),
            },
        }
    }

    #[tokio::test]
    async fn register_slot_returns_created_busy_slot() {
        let user_id = UserId::new();
        let mut slot_repository = MockSlotRepository::new();
        slot_repository
            .expect_create()
            .withf(move |event, owner_id| {
                event.title == "Morning shift" && *owner_id == user_id
            })
            .returning(move |_, owner_id| Ok(sample_slot(owner_id, SlotStatus::Busy)));

        let registry = registry_with_slot_repo(slot_repository);
        let req = CreateSlotRequest {
            title: "Morning shift".into(),
            start_time: Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        };

        let (status, Json(res)) =
            register_slot(authorized_user(user_id), State(registry), Json(req))
                .await
                .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(res.status, "BUSY");
    }

    #[tokio::test]
    async fn register_slot_rejects_empty_title() {
        let registry = registry_with_slot_repo(MockSlotRepository::new());
        let req = CreateSlotRequest {
            title: "".into(),
            start_time: Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        };

        let res = register_slot(authorized_user(UserId::new()), State(registry), Json(req)).await;

        assert!(matches!(res, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn update_slot_status_is_forwarded_with_owner() {
        let user_id = UserId::new();
        let slot_id = kernel::model::id::SlotId::new();
        let mut slot_repository = MockSlotRepository::new();
        slot_repository
            .expect_update_status()
            .withf(move |event| {
                event.slot_id == slot_id
                    && event.requested_user == user_id
                    && event.status == SlotStatus::Swappable
            })
            .returning(|_| Ok(()));

        let registry = registry_with_slot_repo(slot_repository);
        let req = UpdateSlotStatusRequest {
            status: "SWAPPABLE".into(),
        };

        let status = update_slot_status(
            authorized_user(user_id),
            Path(slot_id),
            State(registry),
            Json(req),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn update_slot_status_rejects_unknown_status_before_store() {
        // モックに期待を登録しないことで、リポジトリに到達しないことも確認する
        let registry = registry_with_slot_repo(MockSlotRepository::new());
        let req = UpdateSlotStatusRequest {
            status: "CANCELLED".into(),
        };

        let res = update_slot_status(
            authorized_user(UserId::new()),
            Path(kernel::model::id::SlotId::new()),
            State(registry),
            Json(req),
        )
        .await;

        assert!(matches!(res, Err(AppError::UnprocessableEntity(_))));
    }

    #[tokio::test]
    async fn update_slot_status_rejects_direct_swap_pending() {
        let registry = registry_with_slot_repo(MockSlotRepository::new());
        let req = UpdateSlotStatusRequest {
            status: "SWAP_PENDING".into(),
        };

        let res = update_slot_status(
            authorized_user(UserId::new()),
            Path(kernel::model::id::SlotId::new()),
            State(registry),
            Json(req),
        )
        .await;

        assert!(matches!(res, Err(AppError::UnprocessableEntity(_))));
    }

    #[tokio::test]
    async fn update_slot_status_propagates_not_found() {
        let mut slot_repository = MockSlotRepository::new();
        slot_repository
            .expect_update_status()
            .returning(|_| Err(AppError::EntityNotFound("missing".into())));

        let registry = registry_with_slot_repo(slot_repository);
        let req = UpdateSlotStatusRequest {
            status: "BUSY".into(),
        };

        let res = update_slot_status(
            authorized_user(UserId::new()),
            Path(kernel::model::id::SlotId::new()),
            State(registry),
            Json(req),
        )
        .await;

        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
    }

    #[tokio::test]
    async fn swappable_slots_are_looked_up_excluding_caller() {
        let user_id = UserId::new();
        let other_id = UserId::new();
        let mut slot_repository = MockSlotRepository::new();
        slot_repository
            .expect_find_swappable_excluding()
            .withf(move |excluded| *excluded == user_id)
            .returning(move |_| Ok(vec![sample_slot(other_id, SlotStatus::Swappable)]));

        let registry = registry_with_slot_repo(slot_repository);

        let Json(res) = show_swappable_slots(authorized_user(user_id), State(registry))
            .await
            .unwrap();

        assert_eq!(res.len(), 1);
        assert_eq!(res[0].owner_name, "Alice");
    }

    #[tokio::test]
    async fn protected_routes_require_bearer_token() {
        let registry = registry_with_slot_repo(MockSlotRepository::new());
        let app = build_slot_routers().with_state(registry);

        let res = app
            .oneshot(
                Request::builder()
                    .uri("/api/my-events")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn my_events_returns_slots_for_token_holder() {
        let user_id = UserId::new();

        let mut auth_repository = MockAuthRepository::new();
        auth_repository
            .expect_fetch_user_id_from_token()
            .returning(move |_| Ok(Some(user_id)));
        let mut user_repository = MockUserRepository::new();
        user_repository
            .expect_find_current_user()
            .returning(move |id| {
                Ok(Some(User {
                    user_id: id,
                    user_name: "Alice".into(),
                    email: "alice@example.com".into(),
                }))
            });
        let mut slot_repository = MockSlotRepository::new();
        slot_repository
            .expect_find_by_owner()
            .withf(move |owner| *owner == user_id)
            .returning(move |owner| Ok(vec![sample_slot(owner, SlotStatus::Busy)]));

        let registry = AppRegistry::with_repositories(
            Arc::new(MockHealthCheckRepository::new()),
            Arc::new(auth_repository),
            Arc::new(user_repository),
            Arc::new(slot_repository),
            Arc::new(MockSwapRepository::new()),
        );
        let app = build_slot_routers().with_state(registry);

        let res = app
            .oneshot(
                Request::builder()
                    .uri("/api/my-events")
                    .header("Authorization", "Bearer token")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
    }
}
