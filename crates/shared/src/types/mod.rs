//! Common types used across the application.

pub mod id;
pub mod money;
pub mod pagination;

pub use id::*;
pub use money::{Money, format_amount};
pub use pagination::{PageMeta, PageRequest, PageResponse};
