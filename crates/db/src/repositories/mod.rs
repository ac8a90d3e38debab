pub mod accounts;
pub mod catalog;
pub mod lesson;
pub mod time_slot;

use std::time::Duration;

use sqlx::{PgPool, Postgres, Transaction};
use tutorbook_core::{errors::BookingResult, models::time_slot::DEFAULT_LESSON_MINUTES};

use crate::errors::classify;

/// Knobs shared by the transactional stores.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    /// Longest a transaction waits for a row lock before giving up.
    pub lock_timeout: Duration,
    /// Lesson length used when a new slot has no explicit end.
    pub lesson_duration: chrono::Duration,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_millis(5000),
            lesson_duration: chrono::Duration::minutes(DEFAULT_LESSON_MINUTES),
        }
    }
}

/// Opens a transaction whose lock waits are bounded by `lock_timeout`.
pub(crate) async fn begin(
    pool: &PgPool,
    settings: &StoreSettings,
) -> BookingResult<Transaction<'static, Postgres>> {
    let mut tx = pool.begin().await.map_err(classify)?;

    sqlx::query("SELECT set_config('lock_timeout', $1, true)")
        .bind(format!("{}ms", settings.lock_timeout.as_millis()))
        .execute(&mut *tx)
        .await
        .map_err(classify)?;

    Ok(tx)
}
