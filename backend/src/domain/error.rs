//! Domain-level error type.
//!
//! Errors are transport agnostic: the HTTP adapter decides status codes and
//! the client-visible envelope. Each error captures the task's [`TraceId`]
//! when one is in scope so logs and responses can be correlated.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TraceId;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request body is not valid JSON, or a field is missing or mistyped.
    MalformedRequest,
    /// A field violates one of the user validation rules.
    ValidationFailed,
    /// A path identifier is not a positive integer.
    InvalidIdentifier,
    /// The addressed user does not exist.
    NotFound,
    /// Another user already holds the requested username.
    DuplicateUsername,
    /// The store could not be reached or did not answer in time.
    StorageUnavailable,
    /// A stored row could not be turned back into a user.
    StorageCorruption,
    /// Any other unexpected failure.
    InternalError,
}

impl ErrorCode {
    /// Whether this code describes a server-side failure whose message must
    /// not reach clients.
    #[must_use]
    pub fn is_internal(self) -> bool {
        matches!(
            self,
            Self::StorageUnavailable | Self::StorageCorruption | Self::InternalError
        )
    }

    /// Stable string form, as used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MalformedRequest => "malformed_request",
            Self::ValidationFailed => "validation_failed",
            Self::InvalidIdentifier => "invalid_identifier",
            Self::NotFound => "not_found",
            Self::DuplicateUsername => "duplicate_username",
            Self::StorageUnavailable => "storage_unavailable",
            Self::StorageCorruption => "storage_corruption",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain error payload.
///
/// # Examples
/// ```
/// use users_service::domain::{Error, ErrorCode};
///
/// let err = Error::duplicate_username("Username already exists");
/// assert_eq!(err.code(), ErrorCode::DuplicateUsername);
/// assert_eq!(err.message(), "Username already exists");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    code: ErrorCode,
    message: String,
    details: Option<Value>,
    trace_id: Option<String>,
}

impl Error {
    /// Create a new error, capturing the current trace identifier if any.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            trace_id: TraceId::current().map(|id| id.to_string()),
        }
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Structured diagnostic context, logged server-side only.
    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Trace identifier captured when the error was raised.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Attach structured diagnostic context.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Override the captured trace identifier.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Convenience constructor for [`ErrorCode::MalformedRequest`].
    pub fn malformed_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MalformedRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::ValidationFailed`].
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    /// Convenience constructor for [`ErrorCode::InvalidIdentifier`].
    pub fn invalid_identifier(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidIdentifier, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::DuplicateUsername`].
    pub fn duplicate_username(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DuplicateUsername, message)
    }

    /// Convenience constructor for [`ErrorCode::StorageUnavailable`].
    pub fn storage_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::StorageCorruption`].
    pub fn storage_corruption(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageCorruption, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for Error {}
