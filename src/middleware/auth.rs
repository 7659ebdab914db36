//! HTTP Basic Auth gate for the single dashboard operator.

use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Basic, Authorization},
    TypedHeader,
};
use sha2::{Digest, Sha256};

use crate::config::Credentials;
use crate::errors::AppError;
use crate::AppState;

/// Operator authenticated with Basic Auth.
///
/// Usable as an extractor; the router also applies [`require_operator`] to
/// every route so handlers never run unauthenticated.
#[derive(Debug, Clone)]
pub struct Operator {
    pub username: String,
}

impl FromRequestParts<AppState> for Operator {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(basic)) =
            TypedHeader::<Authorization<Basic>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::Unauthorized)?;

        if !verify_credentials(&state.config.credentials, basic.username(), basic.password()) {
            tracing::warn!(username = basic.username(), "Rejected dashboard credentials");
            return Err(AppError::Unauthorized);
        }

        Ok(Operator {
            username: basic.username().to_string(),
        })
    }
}

/// Middleware rejecting any request without valid operator credentials.
pub async fn require_operator(
    _operator: Operator,
    request: Request,
    next: Next,
) -> Response {
    next.run(request).await
}

/// Compare supplied credentials against the configured pair.
///
/// Both fields are always compared, through fixed-length digests, so timing
/// does not reveal which field or byte differed.
pub fn verify_credentials(expected: &Credentials, username: &str, password: &str) -> bool {
    let username_ok = digests_equal(&expected.username, username);
    let password_ok = digests_equal(&expected.password, password);
    username_ok & password_ok
}

fn digests_equal(a: &str, b: &str) -> bool {
    let a = Sha256::digest(a.as_bytes());
    let b = Sha256::digest(b.as_bytes());
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
