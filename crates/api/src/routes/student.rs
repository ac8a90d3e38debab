use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/student/lessons", get(handlers::student::my_lessons))
        .route(
            "/api/students/lessons/:id/cancel",
            post(handlers::student::cancel_my_lesson),
        )
}
