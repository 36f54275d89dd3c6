//! Error handling for the access-control core
//!
//! This module provides idiomatic Rust error types using thiserror for
//! better error messages and proper error chain handling.

use thiserror::Error;

/// Main error type for the access-control core
#[derive(Error, Debug)]
pub enum AccessError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Permission denied: {operation}")]
    PermissionDenied { operation: String },

    #[error("Not found: {what}")]
    NotFound { what: String },

    #[error("Backing store error: {message}")]
    BackingStore { message: String },

    #[error("Audit write failed, disclosure aborted: {message}")]
    AuditWriteFailed { message: String },
}

impl AccessError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn permission_denied(operation: impl Into<String>) -> Self {
        Self::PermissionDenied {
            operation: operation.into(),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    pub fn backing_store(message: impl Into<String>) -> Self {
        Self::BackingStore {
            message: message.into(),
        }
    }

    /// Whether a caller may reasonably retry the failed operation.
    ///
    /// Only infrastructure failures are retryable; validation and
    /// permission errors must be surfaced, not retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::BackingStore { .. })
    }
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for AccessError {
    fn from(error: sqlx::Error) -> Self {
        Self::BackingStore {
            message: error.to_string(),
        }
    }
}

/// Result type alias for convenience
pub type AccessResult<T> = Result<T, AccessError>;
