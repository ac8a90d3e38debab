//! # Error Handling Middleware
//!
//! Maps [`BookingError`] onto HTTP status codes and JSON error bodies so every
//! handler reports failures the same way.
//!
//! Conflicts carry a hint telling the caller how to recover. Storage failures
//! are logged in full but answered with a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;
use tutorbook_core::errors::BookingError;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use tutorbook_api::middleware::error_handling::AppError;
/// use tutorbook_core::errors::BookingError;
/// use uuid::Uuid;
///
/// async fn handler(id: Uuid) -> Result<Json<()>, AppError> {
///     Err(BookingError::lesson_not_found(id).into())
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub BookingError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::SlotConflict(_)
            | BookingError::LoginTaken(_)
            | BookingError::AlreadyProvisioned(_)
            | BookingError::InvalidTransition { .. } => StatusCode::CONFLICT,
            BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::Authentication(_) => StatusCode::UNAUTHORIZED,
            BookingError::Authorization(_) => StatusCode::FORBIDDEN,
            BookingError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn hint(&self) -> Option<&'static str> {
        match &self.0 {
            BookingError::SlotConflict(_) => Some("please pick another time"),
            BookingError::LoginTaken(_) => Some("choose a different login"),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self.0 {
            BookingError::Storage(report) => {
                error!("storage failure: {:?}", report);
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = match self.hint() {
            Some(hint) => json!({ "error": message, "hint": hint }),
            None => json!({ "error": message }),
        };

        (status, Json(body)).into_response()
    }
}

/// Allows `?` on `BookingResult` inside handlers.
impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BookingError::Storage(err))
    }
}

/// Maps a BookingError to an HTTP response
pub fn map_error(err: BookingError) -> Response {
    AppError(err).into_response()
}
