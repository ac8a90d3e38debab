use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tutorbook_core::models::{
    account::{AdminNotification, CreateUserRequest, Credentials, ProvisionedStudent, Role, User},
    lesson::AdminLessonView,
};
use uuid::Uuid;

use crate::{
    middleware::{auth::Caller, error_handling::AppError},
    ApiState,
};

#[axum::debug_handler]
pub async fn create_user(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    caller.require(&[Role::Admin])?;
    let user = state
        .accounts
        .create_user(Credentials::new(payload.login, payload.password), payload.role)
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Turns the contact details of a lesson request into a student login.
#[axum::debug_handler]
pub async fn provision_student(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
    Path(lesson_id): Path<Uuid>,
    Json(payload): Json<Credentials>,
) -> Result<(StatusCode, Json<ProvisionedStudent>), AppError> {
    caller.require(&[Role::Admin])?;
    let provisioned = state.accounts.provision_student(lesson_id, payload).await?;

    Ok((StatusCode::CREATED, Json(provisioned)))
}

#[axum::debug_handler]
pub async fn all_lessons(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
) -> Result<Json<Vec<AdminLessonView>>, AppError> {
    caller.require(&[Role::Admin])?;
    Ok(Json(state.lessons.all_lessons().await?))
}

#[axum::debug_handler]
pub async fn notifications(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
) -> Result<Json<Vec<AdminNotification>>, AppError> {
    caller.require(&[Role::Admin])?;
    Ok(Json(state.accounts.admin_notifications().await?))
}
