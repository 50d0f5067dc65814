//! Shared types, errors, and configuration for Tyredesk.
//!
//! This crate provides common types used across all other crates:
//! - Money formatting with decimal precision
//! - Typed IDs for expense records and audit actions
//! - Pagination types for list views
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{ApiConfig, AppConfig, StorageConfig, WorkflowConfig};
pub use error::{AppError, AppResult};
