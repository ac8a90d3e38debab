use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

/// Creates every table and index the booking service needs.
///
/// Safe to run on every start: all statements are `IF NOT EXISTS`.
pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Reference data
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS subjects (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL UNIQUE
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS grades (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            grade_name VARCHAR(64) NOT NULL UNIQUE,
            position INTEGER NOT NULL DEFAULT 0
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tutors (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            username VARCHAR(255) NOT NULL UNIQUE,
            first_name VARCHAR(255) NOT NULL,
            last_name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NULL,
            phone VARCHAR(64) NULL,
            bio TEXT NULL,
            experience_years INTEGER NOT NULL DEFAULT 0,
            hourly_rate DOUBLE PRECISION NOT NULL DEFAULT 0,
            is_active BOOLEAN NOT NULL DEFAULT TRUE
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tutor_subjects (
            tutor_id UUID NOT NULL REFERENCES tutors(id),
            subject_id UUID NOT NULL REFERENCES subjects(id),
            PRIMARY KEY (tutor_id, subject_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tutor_grades (
            tutor_id UUID NOT NULL REFERENCES tutors(id),
            grade_id UUID NOT NULL REFERENCES grades(id),
            PRIMARY KEY (tutor_id, grade_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            tutor_id UUID NOT NULL REFERENCES tutors(id),
            rating SMALLINT NOT NULL CHECK (rating BETWEEN 1 AND 5),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Slots and lessons
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS time_slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            tutor_id UUID NOT NULL REFERENCES tutors(id),
            date DATE NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            is_available BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_time_range CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Accounts
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            username VARCHAR(255) NOT NULL,
            password_hash VARCHAR(255) NOT NULL,
            role VARCHAR(16) NOT NULL CHECK (role IN ('admin', 'tutor', 'student')),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT users_username_key UNIQUE (username)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS students (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL UNIQUE REFERENCES users(id),
            full_name VARCHAR(255) NOT NULL,
            phone VARCHAR(64) NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS lessons (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            tutor_id UUID NOT NULL REFERENCES tutors(id),
            timeslot_id UUID NOT NULL REFERENCES time_slots(id),
            student_id UUID NULL REFERENCES students(id),
            student_name VARCHAR(255) NULL,
            student_phone VARCHAR(64) NULL,
            student_email VARCHAR(255) NULL,
            status VARCHAR(16) NOT NULL
                CHECK (status IN ('pending', 'scheduled', 'declined', 'cancelled')),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS admin_notifications (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            message TEXT NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // At most one pending/scheduled lesson may point at a slot.
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_lessons_active_slot
            ON lessons(timeslot_id)
            WHERE status IN ('pending', 'scheduled');
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::raw_sql(
        r#"
        CREATE INDEX IF NOT EXISTS idx_time_slots_tutor_date ON time_slots(tutor_id, date, start_time);
        CREATE INDEX IF NOT EXISTS idx_lessons_timeslot_status ON lessons(timeslot_id, status);
        CREATE INDEX IF NOT EXISTS idx_lessons_tutor_status ON lessons(tutor_id, status);
        CREATE INDEX IF NOT EXISTS idx_lessons_student_id ON lessons(student_id);
        CREATE INDEX IF NOT EXISTS idx_reviews_tutor_id ON reviews(tutor_id);
        CREATE INDEX IF NOT EXISTS idx_admin_notifications_created_at ON admin_notifications(created_at);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
