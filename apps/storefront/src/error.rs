//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Handler: Result<Json<T>, ApiError>                                     │
//! │         │                                                               │
//! │         ├── ValidationError ─┐                                          │
//! │         ├── CoreError ───────┼──► ApiError { code, message } ──► HTTP   │
//! │         └── SessionError ────┘          │                               │
//! │                                         ▼                               │
//! │                      status from code: 400 / 404 / 409 / 422 / 500      │
//! │                                                                         │
//! │  Frontend receives:                                                     │
//! │    { "code": "INSUFFICIENT_POINTS",                                     │
//! │      "message": "Insufficient points: 2000 required, 1750 available" }  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use vitrine_core::{CoreError, ValidationError};
use vitrine_session::{BackendError, SessionError};

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// What the frontend receives when a request fails.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Checkout attempted with nothing in the cart (422)
    EmptyCart,

    /// Not enough loyalty points (422)
    InsufficientPoints,

    /// Request conflicts with the current state, e.g. a chat that ended (409)
    Conflict,

    /// AR requested on a device that cannot run it (422)
    ArUnsupported,

    /// The operation was cancelled before it completed (409)
    Cancelled,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::EmptyCart | ErrorCode::InsufficientPoints | ErrorCode::ArUnsupported => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ErrorCode::Conflict | ErrorCode::Cancelled => StatusCode::CONFLICT,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::ProductNotFound(_)
            | CoreError::RewardNotFound(_)
            | CoreError::ReviewNotFound(_)
            | CoreError::AgentNotFound(_) => ErrorCode::NotFound,
            CoreError::UnknownOption { .. }
            | CoreError::UnknownVariant { .. }
            | CoreError::Validation(_) => ErrorCode::ValidationError,
            CoreError::EmptyCart => ErrorCode::EmptyCart,
            CoreError::InsufficientPoints { .. } => ErrorCode::InsufficientPoints,
            CoreError::RewardUnavailable(_) | CoreError::ChatEnded | CoreError::ChatStillActive => {
                ErrorCode::Conflict
            }
            CoreError::ArUnsupported => ErrorCode::ArUnsupported,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::SessionNotFound(id) => ApiError::not_found("Session", &id.to_string()),
            SessionError::CheckoutInProgress => ApiError::new(
                ErrorCode::Conflict,
                "A checkout is already in progress for this session",
            ),
            SessionError::Core(e) => e.into(),
            SessionError::Backend(BackendError::Cancelled) => {
                ApiError::new(ErrorCode::Cancelled, "Operation was cancelled")
            }
            SessionError::Backend(BackendError::TaskFailed(e)) => {
                // Log the actual error but return a generic message
                tracing::error!("Backend task failed: {}", e);
                ApiError::internal("Backend operation failed")
            }
        }
    }
}

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        SessionError::Backend(err).into()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }
        (status, Json(self)).into_response()
    }
}
