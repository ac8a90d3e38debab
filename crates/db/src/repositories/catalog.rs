use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use tutorbook_core::{
    errors::BookingResult,
    models::{
        catalog::{Grade, Subject, SubjectTutors, Tutor, TutorFilter},
        time_slot::TimeSlot,
    },
    services::Catalog,
};
use uuid::Uuid;

use crate::{
    errors::classify,
    models::{DbGrade, DbSubject, DbTimeSlot, DbTutor},
};

// Reviews are pre-aggregated so tutors without any still come back with 0.
const TUTOR_SELECT: &str = r#"
    SELECT t.id, t.username, t.first_name, t.last_name, t.email, t.phone,
           t.bio, t.experience_years, t.hourly_rate,
           COALESCE(r.avg_rating, 0)::DOUBLE PRECISION AS avg_rating
    FROM tutors t
    LEFT JOIN (
        SELECT tutor_id, AVG(rating) AS avg_rating
        FROM reviews
        GROUP BY tutor_id
    ) r ON r.tutor_id = t.id
"#;

#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn subjects_of(&self, tutor_id: Uuid) -> BookingResult<Vec<Subject>> {
        let rows = sqlx::query_as::<_, DbSubject>(
            r#"
            SELECT s.id, s.name
            FROM subjects s
            JOIN tutor_subjects ts ON s.id = ts.subject_id
            WHERE ts.tutor_id = $1
            ORDER BY s.name
            "#,
        )
        .bind(tutor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        Ok(rows.into_iter().map(Subject::from).collect())
    }

    async fn grades_of(&self, tutor_id: Uuid) -> BookingResult<Vec<Grade>> {
        let rows = sqlx::query_as::<_, DbGrade>(
            r#"
            SELECT g.id, g.grade_name
            FROM grades g
            JOIN tutor_grades tg ON g.id = tg.grade_id
            WHERE tg.tutor_id = $1
            ORDER BY g.position, g.grade_name
            "#,
        )
        .bind(tutor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        Ok(rows.into_iter().map(Grade::from).collect())
    }

    /// Attaches subjects, grades and bookable slots to each tutor row.
    async fn enrich(&self, rows: Vec<DbTutor>) -> BookingResult<Vec<Tutor>> {
        let mut tutors = Vec::with_capacity(rows.len());
        for row in rows {
            let mut tutor = Tutor::from(row);
            tutor.subjects = self.subjects_of(tutor.id).await?;
            tutor.grades = self.grades_of(tutor.id).await?;
            tutor.open_slots = self.bookable_slots(tutor.id).await?;
            tutors.push(tutor);
        }
        Ok(tutors)
    }

    async fn tutors_teaching(&self, subject_id: Uuid) -> BookingResult<Vec<Tutor>> {
        let query = format!(
            r#"
            {TUTOR_SELECT}
            WHERE t.is_active = TRUE
              AND EXISTS (SELECT 1 FROM tutor_subjects ts
                          WHERE ts.tutor_id = t.id AND ts.subject_id = $1)
            ORDER BY avg_rating DESC, t.last_name ASC
            "#
        );
        let rows = sqlx::query_as::<_, DbTutor>(&query)
            .bind(subject_id)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?;

        self.enrich(rows).await
    }
}

#[async_trait]
impl Catalog for PgCatalog {
    async fn subjects(&self) -> BookingResult<Vec<Subject>> {
        let rows = sqlx::query_as::<_, DbSubject>("SELECT id, name FROM subjects ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?;

        Ok(rows.into_iter().map(Subject::from).collect())
    }

    async fn grades(&self) -> BookingResult<Vec<Grade>> {
        let rows = sqlx::query_as::<_, DbGrade>(
            "SELECT id, grade_name FROM grades ORDER BY position, grade_name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        Ok(rows.into_iter().map(Grade::from).collect())
    }

    async fn tutors_by_filter(&self, filter: TutorFilter) -> BookingResult<Vec<Tutor>> {
        let query = format!(
            r#"
            {TUTOR_SELECT}
            WHERE t.is_active = TRUE
              AND EXISTS (SELECT 1 FROM tutor_subjects ts
                          WHERE ts.tutor_id = t.id AND ts.subject_id = $1)
              AND EXISTS (SELECT 1 FROM tutor_grades tg
                          WHERE tg.tutor_id = t.id AND tg.grade_id = $2)
            ORDER BY avg_rating DESC, t.last_name ASC
            "#
        );
        let rows = sqlx::query_as::<_, DbTutor>(&query)
            .bind(filter.subject_id)
            .bind(filter.grade_id)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?;

        debug!(
            subject_id = %filter.subject_id,
            grade_id = %filter.grade_id,
            count = rows.len(),
            "filtered tutors"
        );
        self.enrich(rows).await
    }

    async fn tutors_by_subject(&self) -> BookingResult<Vec<SubjectTutors>> {
        let mut grouped = Vec::new();
        for subject in self.subjects().await? {
            let tutors = self.tutors_teaching(subject.id).await?;
            if !tutors.is_empty() {
                grouped.push(SubjectTutors { subject, tutors });
            }
        }
        Ok(grouped)
    }

    async fn tutor_by_username(&self, username: String) -> BookingResult<Option<Tutor>> {
        let query = format!("{TUTOR_SELECT} WHERE t.username = $1");
        let row = sqlx::query_as::<_, DbTutor>(&query)
            .bind(&username)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;

        match row {
            Some(row) => Ok(self.enrich(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn bookable_slots(&self, tutor_id: Uuid) -> BookingResult<Vec<TimeSlot>> {
        // The flag alone is not enough: a pending request may point at a slot
        // that is still flagged available.
        let rows = sqlx::query_as::<_, DbTimeSlot>(
            r#"
            SELECT ts.id, ts.tutor_id, ts.date, ts.start_time, ts.end_time, ts.is_available
            FROM time_slots ts
            LEFT JOIN lessons l
                ON ts.id = l.timeslot_id AND l.status IN ('pending', 'scheduled')
            WHERE ts.tutor_id = $1
              AND ts.is_available = TRUE
              AND l.id IS NULL
            ORDER BY ts.date ASC, ts.start_time ASC
            "#,
        )
        .bind(tutor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        Ok(rows.into_iter().map(TimeSlot::from).collect())
    }
}
