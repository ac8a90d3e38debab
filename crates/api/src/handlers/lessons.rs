use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;
use tutorbook_core::models::lesson::{
    BookLessonRequest, Lesson, RequestLessonRequest, RescheduleRequest,
};
use uuid::Uuid;

use super::{current_student, managed_lesson};
use crate::{
    middleware::{auth::Caller, error_handling::AppError},
    ApiState,
};

/// Anonymous visitors leave their contact details with the request.
#[axum::debug_handler]
pub async fn request_lesson(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<RequestLessonRequest>,
) -> Result<(StatusCode, Json<Lesson>), AppError> {
    let lesson = state
        .lessons
        .request_lesson(payload.tutor_id, payload.slot_id, payload.contact())
        .await?;

    Ok((StatusCode::CREATED, Json(lesson)))
}

#[axum::debug_handler]
pub async fn book_lesson(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
    Json(payload): Json<BookLessonRequest>,
) -> Result<(StatusCode, Json<Lesson>), AppError> {
    let student = current_student(&state, &caller).await?;
    let lesson = state
        .lessons
        .book_lesson(student.id, payload.tutor_id, payload.slot_id)
        .await?;

    Ok((StatusCode::CREATED, Json(lesson)))
}

#[axum::debug_handler]
pub async fn accept_lesson(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
    Path(lesson_id): Path<Uuid>,
) -> Result<Json<Lesson>, AppError> {
    managed_lesson(&state, &caller, lesson_id).await?;
    Ok(Json(state.lessons.accept(lesson_id).await?))
}

#[axum::debug_handler]
pub async fn decline_lesson(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
    Path(lesson_id): Path<Uuid>,
) -> Result<Json<Lesson>, AppError> {
    managed_lesson(&state, &caller, lesson_id).await?;
    Ok(Json(state.lessons.decline(lesson_id).await?))
}

#[axum::debug_handler]
pub async fn cancel_lesson(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
    Path(lesson_id): Path<Uuid>,
) -> Result<Json<Lesson>, AppError> {
    managed_lesson(&state, &caller, lesson_id).await?;
    Ok(Json(state.lessons.cancel(lesson_id).await?))
}

/// Moves a lesson onto an existing open slot, or onto a slot minted for it.
#[axum::debug_handler]
pub async fn reschedule_lesson(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
    Path(lesson_id): Path<Uuid>,
    Json(payload): Json<RescheduleRequest>,
) -> Result<Json<Lesson>, AppError> {
    let lesson = managed_lesson(&state, &caller, lesson_id).await?;

    let moved = match payload {
        RescheduleRequest::ExistingSlot { slot_id } => {
            debug!(lesson_id = %lesson_id, slot_id = %slot_id, "rescheduling onto existing slot");
            state.lessons.reschedule(lesson_id, slot_id).await?
        }
        RescheduleRequest::NewSlot(slot) => {
            debug!(lesson_id = %lesson_id, date = %slot.date, "rescheduling onto new slot");
            state
                .lessons
                .reschedule_with_new_slot(lesson_id, lesson.tutor_id, slot)
                .await?
        }
    };

    Ok(Json(moved))
}
