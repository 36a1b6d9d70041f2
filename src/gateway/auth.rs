//! API key authentication for the `/orders` routes.
//!
//! Clients send the shared key in `X-Api-Key`. When no key is configured
//! every request passes.

use std::sync::Arc;

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::state::AppState;
use super::types::{ApiResponse, error_codes};

pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Authentication failure kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorCode {
    /// Header absent or empty
    MissingApiKey,
    /// Header present but does not match
    InvalidApiKey,
}

impl AuthErrorCode {
    pub fn code(self) -> i32 {
        match self {
            Self::MissingApiKey => error_codes::MISSING_AUTH,
            Self::InvalidApiKey => error_codes::AUTH_FAILED,
        }
    }

    pub fn http_status(self) -> StatusCode {
        match self {
            Self::MissingApiKey => StatusCode::UNAUTHORIZED,
            Self::InvalidApiKey => StatusCode::FORBIDDEN,
        }
    }

    fn message(self) -> &'static str {
        match self {
            Self::MissingApiKey => "Authorization header missing",
            Self::InvalidApiKey => "Authorization failed: invalid API key",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthError {
    pub code: AuthErrorCode,
}

impl From<AuthErrorCode> for AuthError {
    fn from(code: AuthErrorCode) -> Self {
        Self { code }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()>::error(self.code.code(), self.code.message());
        (self.code.http_status(), Json(body)).into_response()
    }
}

/// Axum middleware checking `X-Api-Key` against the configured key.
pub async fn api_key_middleware(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    if let Some(expected) = state.api_key.as_deref() {
        check_api_key(request.headers(), expected).inspect_err(|e| {
            tracing::warn!(
                "Rejected {} {}: {:?}",
                request.method(),
                request.uri().path(),
                e.code
            );
        })?;
    }
    Ok(next.run(request).await)
}

pub fn check_api_key(headers: &HeaderMap, expected: &str) -> Result<(), AuthError> {
    let provided = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or(AuthErrorCode::MissingApiKey)?;

    if constant_time_eq(provided.as_bytes(), expected.as_bytes()) {
        Ok(())
    } else {
        Err(AuthErrorCode::InvalidApiKey.into())
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// New random API key (32 lowercase hex chars)
pub fn generate_api_key() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
