//! Core business logic for Tyredesk.
//!
//! This crate contains the expense workflow and access control rules with
//! no web dependencies. Everything that talks to the expense API lives in
//! `tyredesk-client`.
//!
//! # Modules
//!
//! - `expense` - Expense records, decision workflow, summaries and list queries
//! - `access` - Roles, permissions and their persisted state

pub mod access;
pub mod expense;

pub use access::{AccessError, AccessState, AccessStore, OperatorAccessStore, Permission};
pub use expense::{
    Clock, Decision, Expense, ExpenseError, ExpenseStatus, ExpenseSummary, ExpenseWorkflow,
    SystemClock, WorkflowPolicy,
};
