use axum::{
    routing::{get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::slot::{
    register_slot, show_my_slots, show_swappable_slots, update_slot_status,
};

pub fn build_slot_routers() -> Router<AppRegistry> {
    let slot_routers = Router::new()
        .route("/events", post(register_slot))
        .route("/my-events", get(show_my_slots))
        .route("/events/:slot_id/status", put(update_slot_status))
        .route("/swappable-slots", get(show_swappable_slots));

    Router::new().nest("/api", slot_routers)
}
