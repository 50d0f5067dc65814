//! Expense records and their decision workflow.
//!
//! # Modules
//!
//! - `types` - Expense record, status, category and priority
//! - `error` - Workflow-specific error types
//! - `clock` - Injectable time source
//! - `action` - Audit actions and persistence patches
//! - `service` - Approve, reject, toggle and mark-paid transitions
//! - `summary` - Summary cards over a list of expenses
//! - `query` - Filtering, sorting and pagination

pub mod action;
pub mod clock;
pub mod error;
pub mod query;
pub mod service;
pub mod summary;
pub mod types;

#[cfg(test)]
mod service_props;

pub use action::{ActionKind, ExpenseAction, ExpensePatch, Transition};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::ExpenseError;
pub use query::{ExpenseFilter, ExpenseQuery, SortDirection, SortField, SortSpec};
pub use service::{ExpenseWorkflow, WorkflowPolicy, describe_window, find_expense, within_toggle_window};
pub use summary::ExpenseSummary;
pub use types::{
    CreateExpenseInput, Decision, Expense, ExpenseCategory, ExpenseStatus, Priority, Requester,
};
