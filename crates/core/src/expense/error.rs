//! Expense workflow error types.
//!
//! Every variant is recoverable: the caller reports it and the expense is
//! left exactly as it was.

use thiserror::Error;
use tyredesk_shared::AppError;
use tyredesk_shared::types::ExpenseId;

use crate::expense::types::ExpenseStatus;

/// Errors that can occur during expense workflow operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpenseError {
    /// Rejection reason is required but not provided.
    #[error("Rejection reason is required")]
    RejectionReasonRequired,

    /// A field of a new expense failed validation.
    #[error("Invalid {field}: {message}")]
    InvalidInput {
        /// The offending field.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// The reversal window for the last decision has closed.
    #[error("Toggle window expired ({window}).")]
    ToggleWindowExpired {
        /// Human-readable window length, e.g. "1 hour".
        window: String,
    },

    /// Attempted a transition the workflow does not allow.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: ExpenseStatus,
        /// The attempted target status.
        to: ExpenseStatus,
    },

    /// Expense is not in the caller's working set.
    #[error("Expense {0} not found")]
    NotFound(ExpenseId),

    /// A status string outside the closed enumeration.
    #[error("Unknown expense status '{0}'")]
    UnknownStatus(String),
}

impl ExpenseError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            message: message.into(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::RejectionReasonRequired
            | Self::InvalidInput { .. }
            | Self::InvalidTransition { .. }
            | Self::UnknownStatus(_) => 400,

            Self::ToggleWindowExpired { .. } => 409,

            Self::NotFound(_) => 404,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::RejectionReasonRequired => "REJECTION_REASON_REQUIRED",
            Self::InvalidInput { .. } => "VALIDATION_ERROR",
            Self::ToggleWindowExpired { .. } => "TOGGLE_WINDOW_EXPIRED",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::NotFound(_) => "EXPENSE_NOT_FOUND",
            Self::UnknownStatus(_) => "UNKNOWN_STATUS",
        }
    }

    /// Returns true for input the operator has to correct.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::RejectionReasonRequired | Self::InvalidInput { .. } | Self::UnknownStatus(_)
        )
    }
}

impl From<ExpenseError> for AppError {
    fn from(err: ExpenseError) -> Self {
        let message = err.to_string();
        match err {
            ExpenseError::RejectionReasonRequired
            | ExpenseError::InvalidInput { .. }
            | ExpenseError::UnknownStatus(_) => Self::Validation(message),
            ExpenseError::ToggleWindowExpired { .. } | ExpenseError::InvalidTransition { .. } => {
                Self::BusinessRule(message)
            }
            ExpenseError::NotFound(_) => Self::NotFound(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_reason_required_error() {
        let err = ExpenseError::RejectionReasonRequired;
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "REJECTION_REASON_REQUIRED");
        assert!(err.is_validation());
    }

    #[test]
    fn test_toggle_window_expired_message() {
        let err = ExpenseError::ToggleWindowExpired {
            window: "1 hour".to_string(),
        };
        assert_eq!(err.to_string(), "Toggle window expired (1 hour).");
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "TOGGLE_WINDOW_EXPIRED");
        assert!(!err.is_validation());
    }

    #[test]
    fn test_invalid_transition_error() {
        let err = ExpenseError::InvalidTransition {
            from: ExpenseStatus::Pending,
            to: ExpenseStatus::Paid,
        };
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
        assert!(err.to_string().contains("Pending"));
        assert!(err.to_string().contains("Paid"));
    }

    #[test]
    fn test_not_found_error() {
        let err = ExpenseError::NotFound(ExpenseId::from("exp-9"));
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "EXPENSE_NOT_FOUND");
        assert_eq!(err.to_string(), "Expense exp-9 not found");
    }

    #[test]
    fn test_invalid_input_error() {
        let err = ExpenseError::invalid_input("amount", "must not be negative");
        assert_eq!(err.to_string(), "Invalid amount: must not be negative");
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_into_app_error() {
        let app: AppError = ExpenseError::RejectionReasonRequired.into();
        assert_eq!(app.status_code(), 400);

        let app: AppError = ExpenseError::ToggleWindowExpired {
            window: "1 hour".to_string(),
        }
        .into();
        assert_eq!(app.error_code(), "BUSINESS_RULE_VIOLATION");

        let app: AppError = ExpenseError::NotFound(ExpenseId::from("x")).into();
        assert_eq!(app.status_code(), 404);
    }
}
