use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tutorbook_core::{
    errors::BookingError,
    models::lesson::{Lesson, StudentLessonView},
};
use uuid::Uuid;

use super::{current_student, load_lesson};
use crate::{
    middleware::{auth::Caller, error_handling::AppError},
    ApiState,
};

#[axum::debug_handler]
pub async fn my_lessons(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
) -> Result<Json<Vec<StudentLessonView>>, AppError> {
    let student = current_student(&state, &caller).await?;
    Ok(Json(state.lessons.history_for_student(student.id).await?))
}

/// A student withdrawing from a lesson declines it; the slot stays held.
#[axum::debug_handler]
pub async fn cancel_my_lesson(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
    Path(lesson_id): Path<Uuid>,
) -> Result<Json<Lesson>, AppError> {
    let student = current_student(&state, &caller).await?;
    let lesson = load_lesson(&state, lesson_id).await?;

    if lesson.student_id != Some(student.id) {
        return Err(BookingError::Authorization(format!(
            "lesson {} belongs to another student",
            lesson_id
        ))
        .into());
    }

    Ok(Json(state.lessons.decline(lesson_id).await?))
}
