//! Role and permission management.
//!
//! The state is a plain value passed to whoever needs it and persisted
//! through an `AccessStore`.

pub mod error;
pub mod store;
pub mod types;

pub use error::AccessError;
pub use store::{AccessStore, OperatorAccessStore};
pub use types::{AccessState, Permission, RoleDefinition, UserAccount};
