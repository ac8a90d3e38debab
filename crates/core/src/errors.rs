use thiserror::Error;
use uuid::Uuid;

use crate::models::lesson::LessonStatus;

/// Every failure a booking operation can report.
///
/// Operations either commit fully or roll back fully, so receiving any of
/// these means nothing was persisted.
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The slot is already held, or the row lock could not be taken in time.
    #[error("Slot conflict: {0}")]
    SlotConflict(String),

    #[error("Login already taken: {0}")]
    LoginTaken(String),

    #[error("Lesson {0} already has a student account")]
    AlreadyProvisioned(Uuid),

    #[error("Lesson {lesson_id} cannot be {action} while {status}")]
    InvalidTransition {
        lesson_id: Uuid,
        status: LessonStatus,
        action: &'static str,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Storage error: {0}")]
    Storage(#[from] eyre::Report),
}

impl BookingError {
    pub fn lesson_not_found(id: Uuid) -> Self {
        BookingError::NotFound(format!("Lesson with ID {} not found", id))
    }

    pub fn slot_not_found(id: Uuid) -> Self {
        BookingError::NotFound(format!("Time slot with ID {} not found", id))
    }

    pub fn tutor_not_found(id: Uuid) -> Self {
        BookingError::NotFound(format!("Tutor with ID {} not found", id))
    }

    pub fn slot_taken(id: Uuid) -> Self {
        BookingError::SlotConflict(format!("Time slot {} is already taken", id))
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
