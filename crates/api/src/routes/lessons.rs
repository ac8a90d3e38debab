use axum::{routing::post, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/lessons/request", post(handlers::lessons::request_lesson))
        .route("/api/lessons/book", post(handlers::lessons::book_lesson))
        .route(
            "/api/lessons/:id/accept",
            post(handlers::lessons::accept_lesson),
        )
        .route(
            "/api/lessons/:id/decline",
            post(handlers::lessons::decline_lesson),
        )
        .route(
            "/api/lessons/:id/cancel",
            post(handlers::lessons::cancel_lesson),
        )
        .route(
            "/api/lessons/:id/reschedule",
            post(handlers::lessons::reschedule_lesson),
        )
}
