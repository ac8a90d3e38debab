use axum::http::StatusCode;
use chrono::Utc;
use mockall::predicate;
use pretty_assertions::assert_eq;
use serde_json::json;
use tutorbook_core::{
    errors::BookingError,
    models::{
        account::{AdminNotification, ProvisionedStudent, Role, User},
        lesson::{AdminLessonView, LessonStatus},
    },
};
use uuid::Uuid;

use crate::test_utils::{as_actor, lesson_date, lesson_start, TestContext};

#[tokio::test]
async fn admin_creates_a_tutor_login() {
    let mut ctx = TestContext::new();
    let user = User {
        id: Uuid::new_v4(),
        username: "mia".into(),
        role: Role::Tutor,
    };
    let expected = user.clone();

    ctx.accounts
        .expect_create_user()
        .withf(|credentials, role| {
            credentials.login == "mia" && credentials.password == "s3cret" && *role == Role::Tutor
        })
        .times(1)
        .returning(move |_, _| Ok(user.clone()));

    let server = ctx.server();
    let response = as_actor(server.post("/api/admin/users"), "root", "admin")
        .json(&json!({ "login": "mia", "password": "s3cret", "role": "tutor" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(response.json::<User>(), expected);
}

#[tokio::test]
async fn duplicate_login_asks_for_another() {
    let mut ctx = TestContext::new();
    ctx.accounts
        .expect_create_user()
        .returning(|credentials, _| Err(BookingError::LoginTaken(credentials.login)));

    let server = ctx.server();
    let response = as_actor(server.post("/api/admin/users"), "root", "admin")
        .json(&json!({ "login": "mia", "password": "x", "role": "student" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(
        response.json::<serde_json::Value>()["hint"],
        "choose a different login"
    );
}

#[tokio::test]
async fn provisions_a_student_from_a_lesson() {
    let mut ctx = TestContext::new();
    let lesson_id = Uuid::new_v4();
    let provisioned = ProvisionedStudent {
        lesson_id,
        user_id: Uuid::new_v4(),
        student_id: Uuid::new_v4(),
        login: "ana".into(),
    };
    let expected = provisioned.clone();

    ctx.accounts
        .expect_provision_student()
        .with(predicate::eq(lesson_id), predicate::always())
        .times(1)
        .returning(move |_, _| Ok(provisioned.clone()));

    let server = ctx.server();
    let response = as_actor(
        server.post(&format!("/api/admin/lessons/{}/provision", lesson_id)),
        "root",
        "admin",
    )
    .json(&json!({ "login": "ana", "password": "welcome" }))
    .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(response.json::<ProvisionedStudent>(), expected);
}

#[tokio::test]
async fn provisioning_twice_is_a_conflict() {
    let mut ctx = TestContext::new();
    ctx.accounts
        .expect_provision_student()
        .returning(|lesson_id, _| Err(BookingError::AlreadyProvisioned(lesson_id)));

    let server = ctx.server();
    let response = as_actor(
        server.post(&format!("/api/admin/lessons/{}/provision", Uuid::new_v4())),
        "root",
        "admin",
    )
    .json(&json!({ "login": "ana", "password": "welcome" }))
    .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn tutors_cannot_use_admin_endpoints() {
    let mut ctx = TestContext::new();
    ctx.lessons.expect_all_lessons().times(0);
    ctx.accounts.expect_admin_notifications().times(0);

    let server = ctx.server();
    let response = as_actor(server.get("/api/admin/lessons"), "mia", "tutor").await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = as_actor(server.get("/api/admin/notifications"), "mia", "tutor").await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_sees_every_lesson_and_the_inbox() {
    let mut ctx = TestContext::new();
    let lessons = vec![AdminLessonView {
        id: Uuid::new_v4(),
        student_name: Some("Ana".into()),
        student_phone: Some("555-0101".into()),
        status: LessonStatus::Pending,
        tutor_name: "Mia Novak".into(),
        date: lesson_date(),
        start_time: lesson_start(),
        student_id: None,
        account_login: None,
    }];
    let inbox = vec![AdminNotification {
        id: Uuid::new_v4(),
        message: "Password reset requested for login: ana".into(),
        created_at: Utc::now(),
    }];
    let (expected_lessons, expected_inbox) = (lessons.clone(), inbox.clone());

    ctx.lessons
        .expect_all_lessons()
        .returning(move || Ok(lessons.clone()));
    ctx.accounts
        .expect_admin_notifications()
        .returning(move || Ok(inbox.clone()));

    let server = ctx.server();
    let response = as_actor(server.get("/api/admin/lessons"), "root", "admin").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Vec<AdminLessonView>>(), expected_lessons);

    let response = as_actor(server.get("/api/admin/notifications"), "root", "admin").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Vec<AdminNotification>>(), expected_inbox);
}
