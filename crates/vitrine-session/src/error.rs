//! # Session Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Lookup         │  │  Backend        │  │  Domain                 │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  SessionNotFound│  │  Cancelled      │  │  Core(CoreError)        │ │
//! │  │  CheckoutIn-    │  │                 │  │                         │ │
//! │  │    Progress     │  │                 │  │                         │ │
//! │  │                 │  │  TaskFailed     │  │  (validation, points,   │ │
//! │  │                 │  │                 │  │   empty cart, ...)      │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use uuid::Uuid;
use vitrine_core::CoreError;

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Result type alias for simulated backend calls.
pub type BackendResult<T> = Result<T, BackendError>;

/// Failures of a backend call.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The operation was cancelled before it completed.
    #[error("Operation was cancelled")]
    Cancelled,

    /// The task running the operation panicked.
    #[error("Backend task failed: {0}")]
    TaskFailed(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    /// No session has this id (expired or never created).
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    /// An order for this session is already being submitted.
    #[error("A checkout is already in progress for this session")]
    CheckoutInProgress,

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<vitrine_core::ValidationError> for SessionError {
    fn from(err: vitrine_core::ValidationError) -> Self {
        SessionError::Core(CoreError::Validation(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_lifts_through_core() {
        let err: SessionError = vitrine_core::ValidationError::Required {
            field: "email".to_string(),
        }
        .into();
        assert!(matches!(err, SessionError::Core(CoreError::Validation(_))));
        assert_eq!(err.to_string(), "Validation error: email is required");
    }
}
