use axum::{routing::post, Router};
use registry::AppRegistry;

use crate::handler::auth::{login, logout, signup};

pub fn routes() -> Router<AppRegistry> {
    let auth_routers = Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout));

    Router::new().nest("/api", auth_routers)
}
