//! Slot ledger: the only code that flips `time_slots.is_available`.
//!
//! The connection-level functions are meant to run inside a caller's
//! transaction; [`PgSlotLedger`] wraps them in one transaction per call.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use sqlx::{PgConnection, PgPool};
use tracing::{debug, info, warn};
use tutorbook_core::{
    errors::{BookingError, BookingResult},
    models::time_slot::{NewTimeSlot, TimeSlot},
    services::SlotLedger,
};
use uuid::Uuid;

use super::{begin, StoreSettings};
use crate::{errors::classify, models::DbTimeSlot};

/// Takes the row lock on a slot and returns its current state.
pub async fn lock_slot(conn: &mut PgConnection, slot_id: Uuid) -> BookingResult<DbTimeSlot> {
    sqlx::query_as::<_, DbTimeSlot>(
        r#"
        SELECT id, tutor_id, date, start_time, end_time, is_available
        FROM time_slots
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(slot_id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(classify)?
    .ok_or_else(|| BookingError::slot_not_found(slot_id))
}

/// Holds an open slot.
///
/// The availability check happens under the row lock, so two transactions
/// racing for the same slot serialize here. When `tutor_id` is given the slot
/// must belong to that tutor.
pub async fn reserve(
    conn: &mut PgConnection,
    slot_id: Uuid,
    tutor_id: Option<Uuid>,
) -> BookingResult<DbTimeSlot> {
    let slot = lock_slot(conn, slot_id).await?;

    if let Some(tutor_id) = tutor_id {
        if slot.tutor_id != tutor_id {
            return Err(BookingError::Validation(format!(
                "time slot {} does not belong to tutor {}",
                slot_id, tutor_id
            )));
        }
    }

    if !slot.is_available {
        warn!(slot_id = %slot_id, "slot already held");
        return Err(BookingError::slot_taken(slot_id));
    }

    set_availability(conn, slot_id, false).await
}

/// Opens a slot again. An already-open slot stays open.
pub async fn release(conn: &mut PgConnection, slot_id: Uuid) -> BookingResult<DbTimeSlot> {
    set_availability(conn, slot_id, true).await
}

pub(crate) async fn set_availability(
    conn: &mut PgConnection,
    slot_id: Uuid,
    is_available: bool,
) -> BookingResult<DbTimeSlot> {
    sqlx::query_as::<_, DbTimeSlot>(
        r#"
        UPDATE time_slots
        SET is_available = $2
        WHERE id = $1
        RETURNING id, tutor_id, date, start_time, end_time, is_available
        "#,
    )
    .bind(slot_id)
    .bind(is_available)
    .fetch_optional(&mut *conn)
    .await
    .map_err(classify)?
    .ok_or_else(|| BookingError::slot_not_found(slot_id))
}

pub async fn insert_slot(
    conn: &mut PgConnection,
    tutor_id: Uuid,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    is_available: bool,
) -> BookingResult<DbTimeSlot> {
    let tutor_exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM tutors WHERE id = $1)")
            .bind(tutor_id)
            .fetch_one(&mut *conn)
            .await
            .map_err(classify)?;

    if !tutor_exists {
        return Err(BookingError::tutor_not_found(tutor_id));
    }

    let id = Uuid::new_v4();

    sqlx::query_as::<_, DbTimeSlot>(
        r#"
        INSERT INTO time_slots (id, tutor_id, date, start_time, end_time, is_available)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, tutor_id, date, start_time, end_time, is_available
        "#,
    )
    .bind(id)
    .bind(tutor_id)
    .bind(date)
    .bind(start_time)
    .bind(end_time)
    .bind(is_available)
    .fetch_one(&mut *conn)
    .await
    .map_err(classify)
}

pub async fn get_open_slots_by_tutor_id(
    pool: &PgPool,
    tutor_id: Uuid,
) -> BookingResult<Vec<DbTimeSlot>> {
    sqlx::query_as::<_, DbTimeSlot>(
        r#"
        SELECT id, tutor_id, date, start_time, end_time, is_available
        FROM time_slots
        WHERE tutor_id = $1 AND is_available = TRUE
        ORDER BY date ASC, start_time ASC
        "#,
    )
    .bind(tutor_id)
    .fetch_all(pool)
    .await
    .map_err(classify)
}

#[derive(Clone)]
pub struct PgSlotLedger {
    pool: PgPool,
    settings: StoreSettings,
}

impl PgSlotLedger {
    pub fn new(pool: PgPool, settings: StoreSettings) -> Self {
        Self { pool, settings }
    }
}

#[async_trait]
impl SlotLedger for PgSlotLedger {
    async fn list_open_slots(&self, tutor_id: Uuid) -> BookingResult<Vec<TimeSlot>> {
        let slots = get_open_slots_by_tutor_id(&self.pool, tutor_id).await?;
        debug!(tutor_id = %tutor_id, count = slots.len(), "listed open slots");
        Ok(slots.into_iter().map(TimeSlot::from).collect())
    }

    async fn create_slot(&self, tutor_id: Uuid, slot: NewTimeSlot) -> BookingResult<TimeSlot> {
        let end_time = slot.resolve_end(self.settings.lesson_duration)?;

        let mut tx = begin(&self.pool, &self.settings).await?;
        let created = insert_slot(
            &mut tx,
            tutor_id,
            slot.date,
            slot.start_time,
            end_time,
            true,
        )
        .await?;
        tx.commit().await.map_err(classify)?;

        info!(slot_id = %created.id, tutor_id = %tutor_id, "published time slot");
        Ok(created.into())
    }

    async fn reserve(&self, slot_id: Uuid) -> BookingResult<TimeSlot> {
        let mut tx = begin(&self.pool, &self.settings).await?;
        let slot = reserve(&mut tx, slot_id, None).await?;
        tx.commit().await.map_err(classify)?;

        info!(slot_id = %slot_id, "reserved time slot");
        Ok(slot.into())
    }

    async fn release(&self, slot_id: Uuid) -> BookingResult<TimeSlot> {
        let mut tx = begin(&self.pool, &self.settings).await?;
        let slot = release(&mut tx, slot_id).await?;
        tx.commit().await.map_err(classify)?;

        info!(slot_id = %slot_id, "released time slot");
        Ok(slot.into())
    }
}
