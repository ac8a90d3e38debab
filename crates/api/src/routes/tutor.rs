use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/tutor/slots", post(handlers::tutor::publish_slot))
        .route("/api/tutor/slots/open", get(handlers::tutor::open_slots))
        .route(
            "/api/tutor/lessons/pending",
            get(handlers::tutor::pending_lessons),
        )
        .route(
            "/api/tutor/lessons/confirmed",
            get(handlers::tutor::confirmed_lessons),
        )
}
