use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/admin/users", post(handlers::admin::create_user))
        .route(
            "/api/admin/lessons/:id/provision",
            post(handlers::admin::provision_student),
        )
        .route("/api/admin/lessons", get(handlers::admin::all_lessons))
        .route(
            "/api/admin/notifications",
            get(handlers::admin::notifications),
        )
}
