use axum::http::StatusCode;
use chrono::NaiveTime;
use mockall::predicate;
use pretty_assertions::assert_eq;
use serde_json::json;
use tutorbook_core::models::{
    lesson::{ConfirmedLessonView, PendingLessonView},
    time_slot::{NewTimeSlot, TimeSlot},
};
use uuid::Uuid;

use crate::test_utils::{as_actor, lesson_date, lesson_start, slot, tutor, TestContext};

#[tokio::test]
async fn tutor_publishes_a_slot() {
    let mut ctx = TestContext::new();
    let mia = tutor("mia");
    let tutor_id = mia.id;
    let created = slot(tutor_id, true);
    let expected = created.clone();
    let requested = NewTimeSlot::new(lesson_date(), lesson_start())
        .with_end(NaiveTime::from_hms_opt(16, 30, 0).unwrap());

    ctx.catalog
        .expect_tutor_by_username()
        .returning(move |_| Ok(Some(mia.clone())));
    ctx.slots
        .expect_create_slot()
        .with(predicate::eq(tutor_id), predicate::eq(requested))
        .times(1)
        .returning(move |_, _| Ok(created.clone()));

    let server = ctx.server();
    let response = as_actor(server.post("/api/tutor/slots"), "mia", "tutor")
        .json(&json!({
            "date": "2026-03-14",
            "start_time": "15:00:00",
            "end_time": "16:30:00",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(response.json::<TimeSlot>(), expected);
}

#[tokio::test]
async fn dashboard_lists_pending_and_confirmed() {
    let mut ctx = TestContext::new();
    let mia = tutor("mia");
    let tutor_id = mia.id;
    let pending = vec![PendingLessonView {
        id: Uuid::new_v4(),
        student_name: Some("Ana".into()),
        date: lesson_date(),
        start_time: lesson_start(),
    }];
    let confirmed = vec![ConfirmedLessonView {
        id: Uuid::new_v4(),
        student_name: Some("Ben".into()),
        student_phone: Some("555-0102".into()),
        date: lesson_date(),
        start_time: lesson_start(),
    }];
    let (expected_pending, expected_confirmed) = (pending.clone(), confirmed.clone());

    ctx.catalog
        .expect_tutor_by_username()
        .times(2)
        .returning(move |_| Ok(Some(mia.clone())));
    ctx.lessons
        .expect_pending_for_tutor()
        .with(predicate::eq(tutor_id))
        .returning(move |_| Ok(pending.clone()));
    ctx.lessons
        .expect_confirmed_for_tutor()
        .with(predicate::eq(tutor_id))
        .returning(move |_| Ok(confirmed.clone()));

    let server = ctx.server();
    let response = as_actor(server.get("/api/tutor/lessons/pending"), "mia", "tutor").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Vec<PendingLessonView>>(), expected_pending);

    let response = as_actor(server.get("/api/tutor/lessons/confirmed"), "mia", "tutor").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Vec<ConfirmedLessonView>>(), expected_confirmed);
}

#[tokio::test]
async fn open_slots_feed_the_reschedule_page() {
    let mut ctx = TestContext::new();
    let mia = tutor("mia");
    let tutor_id = mia.id;
    let open = vec![slot(tutor_id, true), slot(tutor_id, true)];
    let expected = open.clone();

    ctx.catalog
        .expect_tutor_by_username()
        .returning(move |_| Ok(Some(mia.clone())));
    ctx.slots
        .expect_list_open_slots()
        .with(predicate::eq(tutor_id))
        .returning(move |_| Ok(open.clone()));

    let server = ctx.server();
    let response = as_actor(server.get("/api/tutor/slots/open"), "mia", "tutor").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Vec<TimeSlot>>(), expected);
}

#[tokio::test]
async fn unknown_tutor_login_is_forbidden() {
    let mut ctx = TestContext::new();
    ctx.catalog
        .expect_tutor_by_username()
        .returning(|_| Ok(None));
    ctx.slots.expect_create_slot().times(0);

    let server = ctx.server();
    let response = as_actor(server.post("/api/tutor/slots"), "nobody", "tutor")
        .json(&json!({ "date": "2026-03-14", "start_time": "15:00:00" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admins_have_no_tutor_dashboard() {
    let mut ctx = TestContext::new();
    ctx.catalog.expect_tutor_by_username().times(0);

    let server = ctx.server();
    let response = as_actor(server.get("/api/tutor/lessons/pending"), "root", "admin").await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}
