//! The seam between the desk and wherever expenses are persisted.

use std::sync::Arc;

use async_trait::async_trait;
use tyredesk_core::expense::{CreateExpenseInput, Expense, ExpenseFilter, ExpensePatch};
use tyredesk_shared::types::ExpenseId;

use crate::error::ClientResult;

/// Expense persistence API.
#[async_trait]
pub trait ExpenseGateway: Send + Sync {
    /// Creates an expense and returns the stored record.
    async fn create(&self, input: &CreateExpenseInput) -> ClientResult<Expense>;

    /// Lists expenses matching `filter`.
    async fn list(&self, filter: &ExpenseFilter) -> ClientResult<Vec<Expense>>;

    /// Applies `patch` to an expense and returns the stored record.
    async fn update(&self, id: &ExpenseId, patch: &ExpensePatch) -> ClientResult<Expense>;
}

#[async_trait]
impl<G: ExpenseGateway + ?Sized> ExpenseGateway for Arc<G> {
    async fn create(&self, input: &CreateExpenseInput) -> ClientResult<Expense> {
        (**self).create(input).await
    }

    async fn list(&self, filter: &ExpenseFilter) -> ClientResult<Vec<Expense>> {
        (**self).list(filter).await
    }

    async fn update(&self, id: &ExpenseId, patch: &ExpensePatch) -> ClientResult<Expense> {
        (**self).update(id, patch).await
    }
}
