//! Unified error handling with consistent API response envelope.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Challenge sent with every 401 so browsers prompt for credentials.
pub const BASIC_AUTH_CHALLENGE: &str = r#"Basic realm="Login Required""#;

/// Error detail in the API response envelope.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

/// Consistent JSON envelope for all API responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a successful result in the envelope.
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            data: Some(data),
            error: None,
        })
    }

    /// Wrap an error in the envelope.
    pub fn error(code: &str, message: &str) -> Json<Self> {
        Json(Self {
            data: None,
            error: Some(ApiError {
                code: code.to_string(),
                message: message.to_string(),
            }),
        })
    }
}

/// Application error type mapping to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The campaign API failed, answered non-2xx, or sent an unexpected body.
    /// `status` is `None` when the failure is not tied to one HTTP response
    /// (transport errors, a listing cursor that stops advancing).
    #[error("{}", upstream_message(.status, .message))]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

fn upstream_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("Upstream error (HTTP {code}): {message}"),
        None => format!("Upstream error: {message}"),
    }
}

impl AppError {
    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Check if this error represents an auth failure.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (code, message) = match &self {
            AppError::Unauthorized => ("UNAUTHORIZED", "Authentication required".to_string()),
            AppError::BadRequest(msg) => ("BAD_REQUEST", msg.clone()),
            AppError::Upstream {
                status: upstream_status,
                message,
            } => {
                tracing::error!(upstream_status = ?upstream_status, error = %message, "Upstream error");
                ("UPSTREAM_ERROR", self.to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                ("INTERNAL_ERROR", "An internal error occurred".to_string())
            }
        };

        let mut response = (status, ApiResponse::<()>::error(code, &message)).into_response();
        if self.is_unauthorized() {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(BASIC_AUTH_CHALLENGE),
            );
        }
        response
    }
}
