use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tutorbook_core::models::{
    lesson::{ConfirmedLessonView, PendingLessonView},
    time_slot::{NewTimeSlot, TimeSlot},
};

use super::current_tutor;
use crate::{
    middleware::{auth::Caller, error_handling::AppError},
    ApiState,
};

#[axum::debug_handler]
pub async fn publish_slot(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
    Json(payload): Json<NewTimeSlot>,
) -> Result<(StatusCode, Json<TimeSlot>), AppError> {
    let tutor = current_tutor(&state, &caller).await?;
    let slot = state.slots.create_slot(tutor.id, payload).await?;

    Ok((StatusCode::CREATED, Json(slot)))
}

/// Candidate slots for the tutor's reschedule page.
#[axum::debug_handler]
pub async fn open_slots(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
) -> Result<Json<Vec<TimeSlot>>, AppError> {
    let tutor = current_tutor(&state, &caller).await?;
    Ok(Json(state.slots.list_open_slots(tutor.id).await?))
}

#[axum::debug_handler]
pub async fn pending_lessons(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
) -> Result<Json<Vec<PendingLessonView>>, AppError> {
    let tutor = current_tutor(&state, &caller).await?;
    Ok(Json(state.lessons.pending_for_tutor(tutor.id).await?))
}

#[axum::debug_handler]
pub async fn confirmed_lessons(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
) -> Result<Json<Vec<ConfirmedLessonView>>, AppError> {
    let tutor = current_tutor(&state, &caller).await?;
    Ok(Json(state.lessons.confirmed_for_tutor(tutor.id).await?))
}
