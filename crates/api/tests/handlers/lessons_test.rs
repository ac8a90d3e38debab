use axum::http::StatusCode;
use chrono::NaiveTime;
use mockall::predicate;
use pretty_assertions::assert_eq;
use serde_json::json;
use tutorbook_core::{
    errors::BookingError,
    models::{
        lesson::{ContactInfo, Lesson, LessonStatus},
        time_slot::NewTimeSlot,
    },
};
use uuid::Uuid;

use crate::test_utils::{as_actor, lesson, lesson_date, lesson_start, student, tutor, TestContext};

#[tokio::test]
async fn anonymous_visitor_requests_a_lesson() {
    let mut ctx = TestContext::new();
    let tutor_id = Uuid::new_v4();
    let slot_id = Uuid::new_v4();
    let pending = lesson(tutor_id, LessonStatus::Pending);
    let expected = pending.clone();

    ctx.lessons
        .expect_request_lesson()
        .with(
            predicate::eq(tutor_id),
            predicate::eq(slot_id),
            predicate::eq(ContactInfo::new("Ana", "555-0101").with_email("ana@example.com")),
        )
        .times(1)
        .returning(move |_, _, _| Ok(pending.clone()));

    let response = ctx
        .server()
        .post("/api/lessons/request")
        .json(&json!({
            "tutor_id": tutor_id,
            "slot_id": slot_id,
            "student_name": "Ana",
            "student_phone": "555-0101",
            "student_email": "ana@example.com",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(response.json::<Lesson>(), expected);
}

#[tokio::test]
async fn taken_slot_asks_the_visitor_to_pick_another_time() {
    let mut ctx = TestContext::new();
    let slot_id = Uuid::new_v4();
    ctx.lessons
        .expect_request_lesson()
        .returning(move |_, _, _| Err(BookingError::slot_taken(slot_id)));

    let response = ctx
        .server()
        .post("/api/lessons/request")
        .json(&json!({
            "tutor_id": Uuid::new_v4(),
            "slot_id": slot_id,
            "student_name": "Ana",
            "student_phone": "555-0101",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(
        response.json::<serde_json::Value>()["hint"],
        "please pick another time"
    );
}

#[tokio::test]
async fn student_books_for_their_own_profile() {
    let mut ctx = TestContext::new();
    let sam = student("sam");
    let student_id = sam.id;
    let tutor_id = Uuid::new_v4();
    let slot_id = Uuid::new_v4();
    let mut booked = lesson(tutor_id, LessonStatus::Scheduled);
    booked.student_id = Some(student_id);

    ctx.accounts
        .expect_student_by_login()
        .with(predicate::eq("sam".to_string()))
        .returning(move |_| Ok(Some(sam.clone())));
    ctx.lessons
        .expect_book_lesson()
        .with(
            predicate::eq(student_id),
            predicate::eq(tutor_id),
            predicate::eq(slot_id),
        )
        .times(1)
        .returning(move |_, _, _| Ok(booked.clone()));

    let server = ctx.server();
    let response = as_actor(server.post("/api/lessons/book"), "sam", "student")
        .json(&json!({ "tutor_id": tutor_id, "slot_id": slot_id }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(response.json::<Lesson>().status, LessonStatus::Scheduled);
}

#[tokio::test]
async fn booking_requires_identity() {
    let mut ctx = TestContext::new();
    ctx.lessons.expect_book_lesson().times(0);

    let response = ctx
        .server()
        .post("/api/lessons/book")
        .json(&json!({ "tutor_id": Uuid::new_v4(), "slot_id": Uuid::new_v4() }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn tutor_accepts_own_lesson() {
    let mut ctx = TestContext::new();
    let mia = tutor("mia");
    let pending = lesson(mia.id, LessonStatus::Pending);
    let lesson_id = pending.id;
    let mut accepted = pending.clone();
    accepted.status = LessonStatus::Scheduled;

    ctx.lessons
        .expect_find_lesson()
        .with(predicate::eq(lesson_id))
        .returning(move |_| Ok(Some(pending.clone())));
    ctx.catalog
        .expect_tutor_by_username()
        .with(predicate::eq("mia".to_string()))
        .returning(move |_| Ok(Some(mia.clone())));
    ctx.lessons
        .expect_accept()
        .with(predicate::eq(lesson_id))
        .times(1)
        .returning(move |_| Ok(accepted.clone()));

    let server = ctx.server();
    let response = as_actor(
        server.post(&format!("/api/lessons/{}/accept", lesson_id)),
        "mia",
        "tutor",
    )
    .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Lesson>().status, LessonStatus::Scheduled);
}

#[tokio::test]
async fn tutor_cannot_touch_another_tutors_lesson() {
    let mut ctx = TestContext::new();
    let mia = tutor("mia");
    let foreign = lesson(Uuid::new_v4(), LessonStatus::Pending);
    let lesson_id = foreign.id;

    ctx.lessons
        .expect_find_lesson()
        .returning(move |_| Ok(Some(foreign.clone())));
    ctx.catalog
        .expect_tutor_by_username()
        .returning(move |_| Ok(Some(mia.clone())));
    ctx.lessons.expect_cancel().times(0);

    let server = ctx.server();
    let response = as_actor(
        server.post(&format!("/api/lessons/{}/cancel", lesson_id)),
        "mia",
        "tutor",
    )
    .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_declines_without_tutor_lookup() {
    let mut ctx = TestContext::new();
    let pending = lesson(Uuid::new_v4(), LessonStatus::Pending);
    let lesson_id = pending.id;
    let mut declined = pending.clone();
    declined.status = LessonStatus::Declined;

    ctx.lessons
        .expect_find_lesson()
        .returning(move |_| Ok(Some(pending.clone())));
    ctx.catalog.expect_tutor_by_username().times(0);
    ctx.lessons
        .expect_decline()
        .with(predicate::eq(lesson_id))
        .times(1)
        .returning(move |_| Ok(declined.clone()));

    let server = ctx.server();
    let response = as_actor(
        server.post(&format!("/api/lessons/{}/decline", lesson_id)),
        "root",
        "admin",
    )
    .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Lesson>().status, LessonStatus::Declined);
}

#[tokio::test]
async fn transition_out_of_a_terminal_state_is_a_conflict() {
    let mut ctx = TestContext::new();
    let declined = lesson(Uuid::new_v4(), LessonStatus::Declined);
    let lesson_id = declined.id;

    ctx.lessons
        .expect_find_lesson()
        .returning(move |_| Ok(Some(declined.clone())));
    ctx.lessons.expect_accept().returning(move |id| {
        Err(BookingError::InvalidTransition {
            lesson_id: id,
            status: LessonStatus::Declined,
            action: "accepted",
        })
    });

    let server = ctx.server();
    let response = as_actor(
        server.post(&format!("/api/lessons/{}/accept", lesson_id)),
        "root",
        "admin",
    )
    .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_lesson_is_not_found() {
    let mut ctx = TestContext::new();
    ctx.lessons.expect_find_lesson().returning(|_| Ok(None));
    ctx.lessons.expect_cancel().times(0);

    let server = ctx.server();
    let response = as_actor(
        server.post(&format!("/api/lessons/{}/cancel", Uuid::new_v4())),
        "root",
        "admin",
    )
    .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn students_cannot_accept_lessons() {
    let mut ctx = TestContext::new();
    ctx.lessons.expect_find_lesson().times(0);
    ctx.lessons.expect_accept().times(0);

    let server = ctx.server();
    let response = as_actor(
        server.post(&format!("/api/lessons/{}/accept", Uuid::new_v4())),
        "sam",
        "student",
    )
    .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn reschedules_onto_an_existing_slot() {
    let mut ctx = TestContext::new();
    let scheduled = lesson(Uuid::new_v4(), LessonStatus::Scheduled);
    let lesson_id = scheduled.id;
    let new_slot_id = Uuid::new_v4();
    let mut moved = scheduled.clone();
    moved.timeslot_id = new_slot_id;

    ctx.lessons
        .expect_find_lesson()
        .returning(move |_| Ok(Some(scheduled.clone())));
    ctx.lessons
        .expect_reschedule()
        .with(predicate::eq(lesson_id), predicate::eq(new_slot_id))
        .times(1)
        .returning(move |_, _| Ok(moved.clone()));
    ctx.lessons.expect_reschedule_with_new_slot().times(0);

    let server = ctx.server();
    let response = as_actor(
        server.post(&format!("/api/lessons/{}/reschedule", lesson_id)),
        "root",
        "admin",
    )
    .json(&json!({ "slot_id": new_slot_id }))
    .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Lesson>().timeslot_id, new_slot_id);
}

#[tokio::test]
async fn reschedules_onto_a_new_slot_for_the_lessons_tutor() {
    let mut ctx = TestContext::new();
    let mia = tutor("mia");
    let tutor_id = mia.id;
    let pending = lesson(tutor_id, LessonStatus::Pending);
    let lesson_id = pending.id;
    let mut moved = pending.clone();
    moved.status = LessonStatus::Scheduled;
    let requested = NewTimeSlot::new(lesson_date(), lesson_start());

    ctx.lessons
        .expect_find_lesson()
        .returning(move |_| Ok(Some(pending.clone())));
    ctx.catalog
        .expect_tutor_by_username()
        .returning(move |_| Ok(Some(mia.clone())));
    ctx.lessons
        .expect_reschedule_with_new_slot()
        .with(
            predicate::eq(lesson_id),
            predicate::eq(tutor_id),
            predicate::eq(requested),
        )
        .times(1)
        .returning(move |_, _, _| Ok(moved.clone()));

    let server = ctx.server();
    let response = as_actor(
        server.post(&format!("/api/lessons/{}/reschedule", lesson_id)),
        "mia",
        "tutor",
    )
    .json(&json!({ "date": "2026-03-14", "start_time": "15:00:00" }))
    .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Lesson>().status, LessonStatus::Scheduled);
}

#[tokio::test]
async fn reschedule_past_midnight_is_rejected() {
    let mut ctx = TestContext::new();
    let pending = lesson(Uuid::new_v4(), LessonStatus::Pending);
    let lesson_id = pending.id;

    ctx.lessons
        .expect_find_lesson()
        .returning(move |_| Ok(Some(pending.clone())));
    ctx.lessons
        .expect_reschedule_with_new_slot()
        .withf(|_, _, slot| slot.start_time == NaiveTime::from_hms_opt(23, 30, 0).unwrap())
        .returning(|_, _, _| {
            Err(BookingError::Validation(
                "a lesson starting at 23:30:00 would run past midnight".into(),
            ))
        });

    let server = ctx.server();
    let response = as_actor(
        server.post(&format!("/api/lessons/{}/reschedule", lesson_id)),
        "root",
        "admin",
    )
    .json(&json!({ "date": "2026-03-14", "start_time": "23:30:00" }))
    .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reschedule_naming_both_targets_is_rejected() {
    let mut ctx = TestContext::new();
    ctx.lessons.expect_find_lesson().times(0);
    ctx.lessons.expect_reschedule().times(0);
    ctx.lessons.expect_reschedule_with_new_slot().times(0);

    let server = ctx.server();
    let response = as_actor(
        server.post(&format!("/api/lessons/{}/reschedule", Uuid::new_v4())),
        "root",
        "admin",
    )
    .json(&json!({
        "slot_id": Uuid::new_v4(),
        "date": "2026-03-14",
        "start_time": "15:00:00"
    }))
    .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}
