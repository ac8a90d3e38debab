#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use fake::{
    faker::name::en::{FirstName, LastName},
    Fake,
};
use sqlx::PgPool;
use tutorbook_core::{
    models::{
        lesson::ContactInfo,
        time_slot::{NewTimeSlot, TimeSlot},
    },
    services::SlotLedger,
};
use tutorbook_db::{
    mock::create_test_pool, PgAccounts, PgCatalog, PgLessonLifecycle, PgSlotLedger, StoreSettings,
};
use uuid::Uuid;

pub struct Stores {
    pub pool: PgPool,
    pub slots: PgSlotLedger,
    pub lessons: PgLessonLifecycle,
    pub accounts: PgAccounts,
    pub catalog: PgCatalog,
}

/// `None` when `TEST_DATABASE_URL` is unset; the calling test then returns early.
pub async fn stores() -> Option<Stores> {
    let pool = create_test_pool()
        .await
        .expect("test database should be reachable")?;
    let settings = StoreSettings::default();

    Some(Stores {
        slots: PgSlotLedger::new(pool.clone(), settings.clone()),
        lessons: PgLessonLifecycle::new(pool.clone(), settings.clone()),
        accounts: PgAccounts::new(pool.clone(), settings),
        catalog: PgCatalog::new(pool.clone()),
        pool,
    })
}

/// Unique per call so tests can share one database.
pub fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

pub async fn seed_tutor(pool: &PgPool) -> Uuid {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();

    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO tutors (username, first_name, last_name, experience_years, hourly_rate)
        VALUES ($1, $2, $3, 3, 25.0)
        RETURNING id
        "#,
    )
    .bind(unique("tutor"))
    .bind(first_name)
    .bind(last_name)
    .fetch_one(pool)
    .await
    .expect("seed tutor")
}

pub async fn seed_student(pool: &PgPool) -> Uuid {
    let user_id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (username, password_hash, role) VALUES ($1, 'unused', 'student') RETURNING id",
    )
    .bind(unique("student"))
    .fetch_one(pool)
    .await
    .expect("seed user");

    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO students (user_id, full_name, phone) VALUES ($1, 'Ben Carter', '555-0199') RETURNING id",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
    .expect("seed student")
}

pub async fn open_slot(stores: &Stores, tutor_id: Uuid, hour: u32) -> TimeSlot {
    let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
    let start = NaiveTime::from_hms_opt(hour, 0, 0).unwrap();

    stores
        .slots
        .create_slot(tutor_id, NewTimeSlot::new(date, start))
        .await
        .expect("publish slot")
}

pub async fn is_available(pool: &PgPool, slot_id: Uuid) -> bool {
    sqlx::query_scalar::<_, bool>("SELECT is_available FROM time_slots WHERE id = $1")
        .bind(slot_id)
        .fetch_one(pool)
        .await
        .expect("slot exists")
}

pub fn contact() -> ContactInfo {
    ContactInfo::new("Ana Lopez", "555-0101").with_email("ana@example.com")
}
