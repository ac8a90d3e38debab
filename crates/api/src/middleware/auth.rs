//! # Caller Identity
//!
//! The booking API sits behind a gateway that authenticates sessions and
//! forwards the resolved caller as two headers. This module turns those
//! headers into an [`Actor`] and offers role checks for handlers.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tutorbook_core::{
    errors::BookingError,
    models::account::{Actor, Role},
};

use crate::middleware::error_handling::AppError;

pub const ACTOR_LOGIN_HEADER: &str = "x-actor-login";
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// The authenticated caller of a request.
///
/// Extraction fails with `401` when either header is missing or the role is
/// not one the service knows.
#[derive(Debug, Clone)]
pub struct Caller(pub Actor);

impl Caller {
    /// Passes when the caller holds one of `roles`, `403` otherwise.
    pub fn require(&self, roles: &[Role]) -> Result<&Actor, BookingError> {
        if roles.contains(&self.0.role) {
            Ok(&self.0)
        } else {
            Err(BookingError::Authorization(format!(
                "role {} may not perform this action",
                self.0.role
            )))
        }
    }

    pub fn role(&self) -> Role {
        self.0.role
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let login = header(parts, ACTOR_LOGIN_HEADER).ok_or_else(|| {
            BookingError::Authentication("missing caller identity".to_string())
        })?;
        let role = header(parts, ACTOR_ROLE_HEADER)
            .ok_or_else(|| BookingError::Authentication("missing caller role".to_string()))?
            .parse::<Role>()
            .map_err(|_| BookingError::Authentication("unknown caller role".to_string()))?;

        Ok(Caller(Actor::new(login, role)))
    }
}
