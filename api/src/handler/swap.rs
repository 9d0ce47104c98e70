use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use kernel::model::{
    id::SwapRequestId,
    swap::event::{CreateSwapRequest, RespondSwapRequest},
};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::AuthorizedUser,
    model::swap::{CreateSwapRequestRequest, SwapRequestsResponse, SwapRespondRequest},
};

pub async fn create_swap_request(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateSwapRequestRequest>,
) -> AppResult<StatusCode> {
    let event = CreateSwapRequest::new(user.id(), req.my_slot_id, req.their_slot_id);
    registry
        .swap_repository()
        .create(event)
        .await
        .map(|_| StatusCode::CREATED)
}

pub async fn show_swap_requests(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<SwapRequestsResponse>> {
    registry
        .swap_repository()
        .find_pending_by_user(user.id())
        .await
        .map(|listing| Json(listing.into()))
}

pub async fn respond_swap_request(
    user: AuthorizedUser,
    Path(swap_request_id): Path<SwapRequestId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<SwapRespondRequest>,
) -> AppResult<StatusCode> {
    let event = RespondSwapRequest::new(swap_request_id, user.id(), req.accept);
    registry
        .swap_repository()
        .respond(event)
        .await
        .map(|_| StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use kernel::{
        model::{
            auth::AccessToken,
            id::{SlotId, UserId},
            swap::{SwapRequestListing, SwapRequestSummary, SwapStatus},
            user::User,
        },
        repository::{
            auth::MockAuthRepository, health::MockHealthCheckRepository,
            slot::MockSlotRepository, swap::MockSwapRepository, user::MockUserRepository,
        },
    };
    use shared::error::AppError;

    use super::*;

    fn authorized_user(user_id: UserId) -> AuthorizedUser {
        AuthorizedUser {
            access_token: AccessToken("dummy".into()),
            user: User {
                user_id,
                user_name: "Bob".into(),
                email: "bob@example.com".into(),
            },
        }
    }

    fn registry_with_swap_repo(swap_repository: MockSwapRepository) -> AppRegistry {
        AppRegistry::with_repositories(
            Arc::new(MockHealthCheckRepository::new()),
            Arc::new(MockAuthRepository::new()),
            Arc::new(MockUserRepository::new()),
            Arc::new(MockSlotRepository::new()),
            Arc::new(swap_repository),
        )
    }

    #[tokio::test]
    async fn create_swap_request_marks_caller_as_requester() {
        let user_id = UserId::new();
        let my_slot_id = SlotId::new();
        let their_slot_id = SlotId::new();

        let mut swap_repository = MockSwapRepository::new();
        swap_repository
            .expect_create()
            .withf(move |event| {
                event.requester_id == user_id
                    && event.offered_slot_id == my_slot_id
                    && event.requested_slot_id == their_slot_id
            })
            .returning(|_| Ok(kernel::model::id::SwapRequestId::new()));

        let registry = registry_with_swap_repo(swap_repository);
        let req = CreateSwapRequestRequest {
            my_slot_id,
            their_slot_id,
        };

        let status = create_swap_request(authorized_user(user_id), State(registry), Json(req))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn create_swap_request_propagates_invalid_offer() {
        let mut swap_repository = MockSwapRepository::new();
        swap_repository
            .expect_create()
            .returning(|_| Err(AppError::UnprocessableEntity("invalid offer".into())));

        let registry = registry_with_swap_repo(swap_repository);
        let req = CreateSwapRequestRequest {
            my_slot_id: SlotId::new(),
            their_slot_id: SlotId::new(),
        };

        let res = create_swap_request(authorized_user(UserId::new()), State(registry), Json(req))
            .await;

        assert!(matches!(res, Err(AppError::UnprocessableEntity(_))));
    }

    #[tokio::test]
    async fn respond_uses_caller_as_responder() {
        let user_id = UserId::new();
        let swap_request_id = SwapRequestId::new();

        let mut swap_repository = MockSwapRepository::new();
        swap_repository
            .expect_respond()
            .withf(move |event| {
                event.swap_request_id == swap_request_id
                    && event.responder_id == user_id
                    && event.accept
            })
            .returning(|_| Ok(()));

        let registry = registry_with_swap_repo(swap_repository);

        let status = respond_swap_request(
            authorized_user(user_id),
            Path(swap_request_id),
            State(registry),
            Json(SwapRespondRequest { accept: true }),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn respond_by_non_owner_surfaces_not_found() {
        // リポジトリは所有者以外の応答を EntityNotFound として返す
        let mut swap_repository = MockSwapRepository::new();
        swap_repository
            .expect_respond()
            .returning(|_| Err(AppError::EntityNotFound("not the owner".into())));

        let registry = registry_with_swap_repo(swap_repository);

        let res = respond_swap_request(
            authorized_user(UserId::new()),
            Path(SwapRequestId::new()),
            State(registry),
            Json(SwapRespondRequest { accept: true }),
        )
        .await;

        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
    }

    #[tokio::test]
    async fn listing_is_split_into_incoming_and_outgoing() {
        let user_id = UserId::new();
        let start = Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap();

        let mut swap_repository = MockSwapRepository::new();
        swap_repository
            .expect_find_pending_by_user()
            .withf(move |id| *id == user_id)
            .returning(move |_| {
                Ok(SwapRequestListing {
                    incoming: vec![SwapRequestSummary {
                        swap_request_id: SwapRequestId::new(),
                        status: SwapStatus::Pending,
                        requested_slot_title: "My slot".into(),
                        requested_slot_start: start,
                        offered_slot_title: "Their slot".into(),
                        offered_slot_start: start,
                        counterpart_name: "Alice".into(),
                    }],
                    outgoing: vec![],
                })
            });

        let registry = registry_with_swap_repo(swap_repository);

        let Json(res) = show_swap_requests(authorized_user(user_id), State(registry))
            .await
            .unwrap();

        assert_eq!(res.incoming.len(), 1);
        assert_eq!(res.incoming[0].status, "PENDING");
        assert_eq!(res.incoming[0].counterpart_name, "Alice");
        assert!(res.outgoing.is_empty());
    }
}
