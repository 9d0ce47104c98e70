use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::swap::{create_swap_request, respond_swap_request, show_swap_requests};

pub fn build_swap_routers() -> Router<AppRegistry> {
    let swap_routers = Router::new()
        .route("/swap-request", post(create_swap_request))
        .route("/requests", get(show_swap_requests))
        .route("/swap-response/:swap_request_id", post(respond_swap_request));

    Router::new().nest("/api", swap_routers)
}
