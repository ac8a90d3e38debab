use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/subjects", get(handlers::catalog::list_subjects))
        .route("/api/grades", get(handlers::catalog::list_grades))
        .route("/api/tutors", get(handlers::catalog::find_tutors))
        .route(
            "/api/tutors/by-subject",
            get(handlers::catalog::tutors_by_subject),
        )
        .route(
            "/api/tutors/:id/slots",
            get(handlers::catalog::bookable_slots),
        )
}
