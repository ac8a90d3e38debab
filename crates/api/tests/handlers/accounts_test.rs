use axum::http::StatusCode;
use chrono::Utc;
use mockall::predicate;
use pretty_assertions::assert_eq;
use serde_json::json;
use tutorbook_core::{
    errors::BookingError,
    models::account::{Actor, AdminNotification, Role},
};
use uuid::Uuid;

use crate::test_utils::TestContext;

#[tokio::test]
async fn login_returns_the_actor() {
    let mut ctx = TestContext::new();
    ctx.accounts
        .expect_authenticate()
        .withf(|credentials| credentials.login == "mia" && credentials.password == "s3cret")
        .returning(|_| Ok(Actor::new("mia", Role::Tutor)));

    let response = ctx
        .server()
        .post("/api/login")
        .json(&json!({ "login": "mia", "password": "s3cret" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Actor>(), Actor::new("mia", Role::Tutor));
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let mut ctx = TestContext::new();
    ctx.accounts.expect_authenticate().returning(|_| {
        Err(BookingError::Authentication(
            "invalid login or password".into(),
        ))
    });

    let response = ctx
        .server()
        .post("/api/login")
        .json(&json!({ "login": "mia", "password": "nope" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn forgotten_password_reaches_the_admin_inbox() {
    let mut ctx = TestContext::new();
    ctx.accounts
        .expect_notify_forgotten_password()
        .with(predicate::eq("ana".to_string()))
        .times(1)
        .returning(|login| {
            Ok(AdminNotification {
                id: Uuid::new_v4(),
                message: format!("Password reset requested for login: {}", login),
                created_at: Utc::now(),
            })
        });

    let response = ctx
        .server()
        .post("/api/forgot-password")
        .json(&json!({ "login": "ana" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::ACCEPTED);
    assert_eq!(response.json::<serde_json::Value>()["status"], "received");
}

#[tokio::test]
async fn blank_login_is_rejected() {
    let mut ctx = TestContext::new();
    ctx.accounts
        .expect_notify_forgotten_password()
        .returning(|_| Err(BookingError::Validation("login is required".into())));

    let response = ctx
        .server()
        .post("/api/forgot-password")
        .json(&json!({ "login": "  " }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}
