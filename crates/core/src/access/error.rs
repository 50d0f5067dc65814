//! Access control error types.

use thiserror::Error;
use tyredesk_shared::AppError;

/// Errors raised by access state operations and the state store.
#[derive(Debug, Error)]
pub enum AccessError {
    /// No role with this name.
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// No user with this email.
    #[error("unknown user: {0}")]
    UnknownUser(String),

    /// Permission key outside the closed set.
    #[error("unknown permission: {0}")]
    UnknownPermission(String),

    /// A role with this name already exists.
    #[error("role already exists: {0}")]
    DuplicateRole(String),

    /// A user with this email already exists.
    #[error("user already exists: {0}")]
    DuplicateUser(String),

    /// The backing store failed.
    #[error("access store failed: {0}")]
    Storage(String),

    /// The stored document could not be encoded or decoded.
    #[error("access state is malformed: {0}")]
    Serialization(String),
}

impl AccessError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::UnknownRole(_) | Self::UnknownUser(_) => 404,
            Self::UnknownPermission(_) => 400,
            Self::DuplicateRole(_) | Self::DuplicateUser(_) => 409,
            Self::Storage(_) | Self::Serialization(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownRole(_) => "ROLE_NOT_FOUND",
            Self::UnknownUser(_) => "USER_NOT_FOUND",
            Self::UnknownPermission(_) => "UNKNOWN_PERMISSION",
            Self::DuplicateRole(_) => "DUPLICATE_ROLE",
            Self::DuplicateUser(_) => "DUPLICATE_USER",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Serialization(_) => "MALFORMED_ACCESS_STATE",
        }
    }
}

impl From<opendal::Error> for AccessError {
    fn from(err: opendal::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AccessError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        let message = err.to_string();
        match err {
            AccessError::UnknownRole(_) | AccessError::UnknownUser(_) => Self::NotFound(message),
            AccessError::UnknownPermission(_) => Self::Validation(message),
            AccessError::DuplicateRole(_) | AccessError::DuplicateUser(_) => Self::Conflict(message),
            AccessError::Storage(_) | AccessError::Serialization(_) => Self::Storage(message),
        }
    }
}
