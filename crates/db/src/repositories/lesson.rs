//! Lesson lifecycle engine.
//!
//! Each operation is one transaction. Lesson rows are locked before their
//! status is checked, and slot holds go through the slot ledger functions, so
//! a failed step rolls back every write made before it.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, info};
use tutorbook_core::{
    errors::{BookingError, BookingResult},
    models::{
        lesson::{
            AdminLessonView, ConfirmedLessonView, ContactInfo, Lesson, LessonAction,
            LessonStatus, PendingLessonView, StudentLessonView,
        },
        time_slot::NewTimeSlot,
    },
    services::LessonLifecycle,
};
use uuid::Uuid;

use super::{begin, time_slot, StoreSettings};
use crate::{
    errors::classify,
    models::{
        DbAdminLesson, DbConfirmedLesson, DbLesson, DbPendingLesson, DbStudent, DbStudentLesson,
    },
};

struct NewLesson<'a> {
    tutor_id: Uuid,
    timeslot_id: Uuid,
    student_id: Option<Uuid>,
    student_name: Option<&'a str>,
    student_phone: Option<&'a str>,
    student_email: Option<&'a str>,
    status: LessonStatus,
}

async fn insert_lesson(conn: &mut PgConnection, lesson: NewLesson<'_>) -> BookingResult<Lesson> {
    let row = sqlx::query_as::<_, DbLesson>(
        r#"
        INSERT INTO lessons (id, tutor_id, timeslot_id, student_id, student_name,
                             student_phone, student_email, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
        RETURNING id, tutor_id, timeslot_id, student_id, student_name,
                  student_phone, student_email, status, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(lesson.tutor_id)
    .bind(lesson.timeslot_id)
    .bind(lesson.student_id)
    .bind(lesson.student_name)
    .bind(lesson.student_phone)
    .bind(lesson.student_email)
    .bind(lesson.status.as_str())
    .fetch_one(&mut *conn)
    .await
    .map_err(classify)?;

    row.try_into()
}

/// Locks the lesson row for the rest of the transaction.
pub(crate) async fn lock_lesson(conn: &mut PgConnection, lesson_id: Uuid) -> BookingResult<Lesson> {
    sqlx::query_as::<_, DbLesson>(
        r#"
        SELECT id, tutor_id, timeslot_id, student_id, student_name,
               student_phone, student_email, status, created_at
        FROM lessons
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(lesson_id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(classify)?
    .ok_or_else(|| BookingError::lesson_not_found(lesson_id))?
    .try_into()
}

async fn update_lesson(
    conn: &mut PgConnection,
    lesson_id: Uuid,
    timeslot_id: Uuid,
    status: LessonStatus,
) -> BookingResult<Lesson> {
    sqlx::query_as::<_, DbLesson>(
        r#"
        UPDATE lessons
        SET timeslot_id = $2, status = $3
        WHERE id = $1
        RETURNING id, tutor_id, timeslot_id, student_id, student_name,
                  student_phone, student_email, status, created_at
        "#,
    )
    .bind(lesson_id)
    .bind(timeslot_id)
    .bind(status.as_str())
    .fetch_one(&mut *conn)
    .await
    .map_err(classify)?
    .try_into()
}

#[derive(Clone)]
pub struct PgLessonLifecycle {
    pool: PgPool,
    settings: StoreSettings,
}

impl PgLessonLifecycle {
    pub fn new(pool: PgPool, settings: StoreSettings) -> Self {
        Self { pool, settings }
    }

    /// Applies a status-only transition (accept, decline, cancel).
    async fn transition(&self, lesson_id: Uuid, action: LessonAction) -> BookingResult<Lesson> {
        let mut tx = begin(&self.pool, &self.settings).await?;

        let lesson = lock_lesson(&mut tx, lesson_id).await?;
        action.check(lesson_id, lesson.status)?;

        match action {
            // The slot should already be held since request time; hold it regardless.
            LessonAction::Accept => {
                time_slot::lock_slot(&mut tx, lesson.timeslot_id).await?;
                time_slot::set_availability(&mut tx, lesson.timeslot_id, false).await?;
            }
            LessonAction::Cancel => {
                time_slot::release(&mut tx, lesson.timeslot_id).await?;
            }
            LessonAction::Decline | LessonAction::Reschedule => {}
        }

        let updated = update_lesson(&mut tx, lesson_id, lesson.timeslot_id, action.target()).await?;
        tx.commit().await.map_err(classify)?;

        info!(
            lesson_id = %lesson_id,
            slot_id = %lesson.timeslot_id,
            from = %lesson.status,
            to = %updated.status,
            slot_released = action.releases_slot(),
            "lesson {}",
            action.verb()
        );
        Ok(updated)
    }

    /// Points a locked, active lesson at `new_slot_id` and frees its old slot.
    async fn move_lesson(
        conn: &mut PgConnection,
        lesson: &Lesson,
        new_slot_id: Uuid,
    ) -> BookingResult<Lesson> {
        time_slot::release(conn, lesson.timeslot_id).await?;
        update_lesson(conn, lesson.id, new_slot_id, LessonStatus::Scheduled).await
    }
}

#[async_trait]
impl LessonLifecycle for PgLessonLifecycle {
    async fn request_lesson(
        &self,
        tutor_id: Uuid,
        slot_id: Uuid,
        contact: ContactInfo,
    ) -> BookingResult<Lesson> {
        let contact = contact.validated()?;

        let mut tx = begin(&self.pool, &self.settings).await?;
        time_slot::reserve(&mut tx, slot_id, Some(tutor_id)).await?;
        let lesson = insert_lesson(
            &mut tx,
            NewLesson {
                tutor_id,
                timeslot_id: slot_id,
                student_id: None,
                student_name: Some(contact.name.as_str()),
                student_phone: Some(contact.phone.as_str()),
                student_email: contact.email.as_deref(),
                status: LessonStatus::Pending,
            },
        )
        .await?;
        tx.commit().await.map_err(classify)?;

        info!(lesson_id = %lesson.id, slot_id = %slot_id, tutor_id = %tutor_id, "lesson requested");
        Ok(lesson)
    }

    async fn book_lesson(
        &self,
        student_id: Uuid,
        tutor_id: Uuid,
        slot_id: Uuid,
    ) -> BookingResult<Lesson> {
        let mut tx = begin(&self.pool, &self.settings).await?;

        let student = sqlx::query_as::<_, DbStudent>(
            "SELECT id, user_id, full_name, phone FROM students WHERE id = $1",
        )
        .bind(student_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(classify)?
        .ok_or_else(|| BookingError::NotFound(format!("Student with ID {} not found", student_id)))?;

        time_slot::reserve(&mut tx, slot_id, Some(tutor_id)).await?;
        let lesson = insert_lesson(
            &mut tx,
            NewLesson {
                tutor_id,
                timeslot_id: slot_id,
                student_id: Some(student.id),
                student_name: Some(student.full_name.as_str()),
                student_phone: student.phone.as_deref(),
                student_email: None,
                status: LessonStatus::Scheduled,
            },
        )
        .await?;
        tx.commit().await.map_err(classify)?;

        info!(lesson_id = %lesson.id, slot_id = %slot_id, student_id = %student_id, "lesson booked");
        Ok(lesson)
    }

    async fn accept(&self, lesson_id: Uuid) -> BookingResult<Lesson> {
        self.transition(lesson_id, LessonAction::Accept).await
    }

    async fn decline(&self, lesson_id: Uuid) -> BookingResult<Lesson> {
        self.transition(lesson_id, LessonAction::Decline).await
    }

    async fn cancel(&self, lesson_id: Uuid) -> BookingResult<Lesson> {
        self.transition(lesson_id, LessonAction::Cancel).await
    }

    async fn reschedule(&self, lesson_id: Uuid, new_slot_id: Uuid) -> BookingResult<Lesson> {
        let mut tx = begin(&self.pool, &self.settings).await?;

        let lesson = lock_lesson(&mut tx, lesson_id).await?;
        LessonAction::Reschedule.check(lesson_id, lesson.status)?;
        if lesson.timeslot_id == new_slot_id {
            return Err(BookingError::Validation(format!(
                "lesson {} is already in slot {}",
                lesson_id, new_slot_id
            )));
        }

        // The new hold must succeed before the old slot is given up.
        time_slot::reserve(&mut tx, new_slot_id, Some(lesson.tutor_id)).await?;
        let updated = Self::move_lesson(&mut tx, &lesson, new_slot_id).await?;
        tx.commit().await.map_err(classify)?;

        info!(
            lesson_id = %lesson_id,
            old_slot_id = %lesson.timeslot_id,
            new_slot_id = %new_slot_id,
            "lesson rescheduled"
        );
        Ok(updated)
    }

    async fn reschedule_with_new_slot(
        &self,
        lesson_id: Uuid,
        tutor_id: Uuid,
        slot: NewTimeSlot,
    ) -> BookingResult<Lesson> {
        let end_time = slot.resolve_end(self.settings.lesson_duration)?;

        let mut tx = begin(&self.pool, &self.settings).await?;

        let lesson = lock_lesson(&mut tx, lesson_id).await?;
        LessonAction::Reschedule.check(lesson_id, lesson.status)?;
        if lesson.tutor_id != tutor_id {
            return Err(BookingError::Authorization(format!(
                "lesson {} belongs to another tutor",
                lesson_id
            )));
        }

        // Minted already held, so it never shows up as bookable.
        let new_slot = time_slot::insert_slot(
            &mut tx,
            tutor_id,
            slot.date,
            slot.start_time,
            end_time,
            false,
        )
        .await?;
        let updated = Self::move_lesson(&mut tx, &lesson, new_slot.id).await?;
        tx.commit().await.map_err(classify)?;

        info!(
            lesson_id = %lesson_id,
            old_slot_id = %lesson.timeslot_id,
            new_slot_id = %new_slot.id,
            "lesson moved to a new slot"
        );
        Ok(updated)
    }

    async fn find_lesson(&self, lesson_id: Uuid) -> BookingResult<Option<Lesson>> {
        sqlx::query_as::<_, DbLesson>(
            r#"
            SELECT id, tutor_id, timeslot_id, student_id, student_name,
                   student_phone, student_email, status, created_at
            FROM lessons
            WHERE id = $1
            "#,
        )
        .bind(lesson_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)?
        .map(Lesson::try_from)
        .transpose()
    }

    async fn pending_for_tutor(&self, tutor_id: Uuid) -> BookingResult<Vec<PendingLessonView>> {
        let rows = sqlx::query_as::<_, DbPendingLesson>(
            r#"
            SELECT l.id, l.student_name, ts.date, ts.start_time
            FROM lessons l
            JOIN time_slots ts ON l.timeslot_id = ts.id
            WHERE l.tutor_id = $1 AND l.status = 'pending'
            ORDER BY ts.date ASC, ts.start_time ASC
            "#,
        )
        .bind(tutor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        debug!(tutor_id = %tutor_id, count = rows.len(), "pending requests");
        Ok(rows.into_iter().map(PendingLessonView::from).collect())
    }

    async fn confirmed_for_tutor(
        &self,
        tutor_id: Uuid,
    ) -> BookingResult<Vec<ConfirmedLessonView>> {
        let rows = sqlx::query_as::<_, DbConfirmedLesson>(
            r#"
            SELECT l.id, l.student_name, l.student_phone, ts.date, ts.start_time
            FROM lessons l
            JOIN time_slots ts ON l.timeslot_id = ts.id
            WHERE l.tutor_id = $1 AND l.status = 'scheduled'
            ORDER BY ts.date ASC, ts.start_time ASC
            "#,
        )
        .bind(tutor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        Ok(rows.into_iter().map(ConfirmedLessonView::from).collect())
    }

    async fn history_for_student(
        &self,
        student_id: Uuid,
    ) -> BookingResult<Vec<StudentLessonView>> {
        let rows = sqlx::query_as::<_, DbStudentLesson>(
            r#"
            SELECT l.id, l.status,
                   t.first_name || ' ' || t.last_name AS tutor_name,
                   ts.date, ts.start_time
            FROM lessons l
            JOIN tutors t ON l.tutor_id = t.id
            JOIN time_slots ts ON l.timeslot_id = ts.id
            WHERE l.student_id = $1
            ORDER BY ts.date ASC, ts.start_time ASC
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        debug!(student_id = %student_id, count = rows.len(), "student lesson history");
        rows.into_iter().map(StudentLessonView::try_from).collect()
    }

    async fn all_lessons(&self) -> BookingResult<Vec<AdminLessonView>> {
        let rows = sqlx::query_as::<_, DbAdminLesson>(
            r#"
            SELECT l.id, l.student_name, l.student_phone, l.status,
                   t.last_name AS tutor_name,
                   ts.date, ts.start_time,
                   l.student_id,
                   u.username AS account_login
            FROM lessons l
            JOIN tutors t ON l.tutor_id = t.id
            JOIN time_slots ts ON l.timeslot_id = ts.id
            LEFT JOIN students s ON l.student_id = s.id
            LEFT JOIN users u ON s.user_id = u.id
            ORDER BY ts.date DESC, ts.start_time DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        rows.into_iter().map(AdminLessonView::try_from).collect()
    }
}
