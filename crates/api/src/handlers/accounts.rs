use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;
use tutorbook_core::models::account::{Actor, Credentials, ForgotPasswordRequest};

use crate::{middleware::error_handling::AppError, ApiState};

#[derive(Debug, Serialize)]
pub struct ForgotPasswordResponse {
    pub status: &'static str,
}

/// Checks a login and password; the gateway builds the session from the result.
#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<Credentials>,
) -> Result<Json<Actor>, AppError> {
    Ok(Json(state.accounts.authenticate(payload).await?))
}

#[axum::debug_handler]
pub async fn forgot_password(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<(StatusCode, Json<ForgotPasswordResponse>), AppError> {
    state.accounts.notify_forgotten_password(payload.login).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(ForgotPasswordResponse { status: "received" }),
    ))
}
