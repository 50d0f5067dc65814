//! Client error types.

use thiserror::Error;
use tyredesk_core::ExpenseError;
use tyredesk_shared::AppError;

/// Result type alias for gateway and desk calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors from the expense API or from the workflow run in front of it.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The workflow refused the operation; nothing was sent.
    #[error(transparent)]
    Workflow(#[from] ExpenseError),

    /// The API answered with a non-success status.
    #[error("API request failed: {status} - {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The API does not know the expense.
    #[error("expense {0} not found on server")]
    NotFound(String),

    /// Connection, timeout or decoding failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The client could not be configured.
    #[error("client configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Creates an API error.
    #[must_use]
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Workflow(err) => err.status_code(),
            Self::Api { status, .. } => *status,
            Self::NotFound(_) => 404,
            Self::Http(_) => 502,
            Self::Configuration(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Workflow(err) => err.error_code(),
            Self::Api { .. } => "API_ERROR",
            Self::NotFound(_) => "EXPENSE_NOT_FOUND",
            Self::Http(_) => "HTTP_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        let message = err.to_string();
        match err {
            ClientError::Workflow(inner) => inner.into(),
            ClientError::NotFound(_) => Self::NotFound(message),
            ClientError::Configuration(_) => Self::Configuration(message),
            ClientError::Api { .. } | ClientError::Http(_) => Self::ExternalService(message),
        }
    }
}
