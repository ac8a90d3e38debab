use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use tutorbook_core::models::{
    catalog::{Grade, Subject, SubjectTutors, Tutor, TutorFilter},
    time_slot::TimeSlot,
};
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn list_subjects(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Subject>>, AppError> {
    Ok(Json(state.catalog.subjects().await?))
}

#[axum::debug_handler]
pub async fn list_grades(State(state): State<Arc<ApiState>>) -> Result<Json<Vec<Grade>>, AppError> {
    Ok(Json(state.catalog.grades().await?))
}

#[axum::debug_handler]
pub async fn find_tutors(
    State(state): State<Arc<ApiState>>,
    Query(filter): Query<TutorFilter>,
) -> Result<Json<Vec<Tutor>>, AppError> {
    Ok(Json(state.catalog.tutors_by_filter(filter).await?))
}

#[axum::debug_handler]
pub async fn tutors_by_subject(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<SubjectTutors>>, AppError> {
    Ok(Json(state.catalog.tutors_by_subject().await?))
}

/// Slots a visitor may still request.
#[axum::debug_handler]
pub async fn bookable_slots(
    State(state): State<Arc<ApiState>>,
    Path(tutor_id): Path<Uuid>,
) -> Result<Json<Vec<TimeSlot>>, AppError> {
    Ok(Json(state.catalog.bookable_slots(tutor_id).await?))
}
