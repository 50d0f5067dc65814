//! Expense API client for Tyredesk.
//!
//! - `gateway` - The persistence trait the desk talks to
//! - `http` - `reqwest` implementation against the expense API
//! - `memory` - In-process implementation for tests and offline use
//! - `desk` - Working set that pairs workflow operations with persistence

pub mod desk;
pub mod error;
pub mod gateway;
pub mod http;
pub mod memory;

pub use desk::ExpenseDesk;
pub use error::{ClientError, ClientResult};
pub use gateway::ExpenseGateway;
pub use http::HttpExpenseGateway;
pub use memory::InMemoryGateway;
