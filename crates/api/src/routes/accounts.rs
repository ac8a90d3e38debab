use axum::{routing::post, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/login", post(handlers::accounts::login))
        .route(
            "/api/forgot-password",
            post(handlers::accounts::forgot_password),
        )
}
