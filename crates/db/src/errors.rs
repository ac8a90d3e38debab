//! Translation of `sqlx` failures into [`BookingError`].

use tracing::error;
use tutorbook_core::errors::BookingError;

/// Postgres SQLSTATE codes the booking flows care about.
const LOCK_NOT_AVAILABLE: &str = "55P03";
const DEADLOCK_DETECTED: &str = "40P01";
const SERIALIZATION_FAILURE: &str = "40001";
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Partial unique index allowing one active lesson per slot.
pub const ACTIVE_LESSON_INDEX: &str = "idx_lessons_active_slot";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlFailure {
    /// Lock wait timed out, deadlock victim, or serialization failure.
    Contention,
    UniqueViolation,
    ForeignKeyViolation,
}

pub fn sql_failure(code: &str) -> Option<SqlFailure> {
    match code {
        LOCK_NOT_AVAILABLE | DEADLOCK_DETECTED | SERIALIZATION_FAILURE => {
            Some(SqlFailure::Contention)
        }
        UNIQUE_VIOLATION => Some(SqlFailure::UniqueViolation),
        FOREIGN_KEY_VIOLATION => Some(SqlFailure::ForeignKeyViolation),
        _ => None,
    }
}

/// Failure kind and violated constraint of a database error, if it is one.
pub fn inspect(err: &sqlx::Error) -> Option<(SqlFailure, Option<String>)> {
    match err {
        sqlx::Error::Database(db_err) => {
            let failure = db_err.code().as_deref().and_then(sql_failure)?;
            Some((failure, db_err.constraint().map(str::to_string)))
        }
        _ => None,
    }
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(inspect(err), Some((SqlFailure::UniqueViolation, _)))
}

pub fn classify(err: sqlx::Error) -> BookingError {
    match inspect(&err) {
        Some((SqlFailure::Contention, _)) => {
            BookingError::SlotConflict(format!("concurrent booking in progress: {}", err))
        }
        Some((SqlFailure::UniqueViolation, Some(constraint)))
            if constraint == ACTIVE_LESSON_INDEX =>
        {
            BookingError::SlotConflict("slot already has an active lesson".to_string())
        }
        Some((SqlFailure::ForeignKeyViolation, constraint)) => BookingError::NotFound(format!(
            "referenced record does not exist ({})",
            constraint.unwrap_or_default()
        )),
        _ => {
            error!("database failure: {}", err);
            BookingError::Storage(eyre::Report::new(err))
        }
    }
}
