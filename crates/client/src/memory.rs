//! In-process gateway for tests and offline use.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tyredesk_core::expense::{
    CreateExpenseInput, Expense, ExpenseFilter, ExpensePatch, ExpenseWorkflow, SystemClock,
};
use tyredesk_shared::types::ExpenseId;

use crate::error::{ClientError, ClientResult};
use crate::gateway::ExpenseGateway;

/// Gateway that keeps expenses in a vector and behaves like the API.
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    expenses: Mutex<Vec<Expense>>,
    updates: AtomicUsize,
    failure: Mutex<Option<u16>>,
    assign_ids: bool,
}

impl InMemoryGateway {
    /// Creates an empty gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gateway seeded with `expenses`.
    #[must_use]
    pub fn with_expenses(expenses: Vec<Expense>) -> Self {
        Self {
            expenses: Mutex::new(expenses),
            ..Self::default()
        }
    }

    /// Ignores client-supplied ids on create and generates fresh ones.
    #[must_use]
    pub fn assigning_ids(mut self) -> Self {
        self.assign_ids = true;
        self
    }

    /// Makes every following update fail with `status`, or succeed again with `None`.
    pub fn fail_updates_with(&self, status: Option<u16>) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = status;
    }

    /// Returns a copy of the stored expenses.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Expense> {
        self.lock().clone()
    }

    /// Returns how many updates were attempted.
    #[must_use]
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Expense>> {
        self.expenses.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ExpenseGateway for InMemoryGateway {
    async fn create(&self, input: &CreateExpenseInput) -> ClientResult<Expense> {
        let mut input = input.clone();
        if self.assign_ids {
            input.id = None;
        }
        let expense = ExpenseWorkflow::<SystemClock>::default()
            .create(input)
            .map_err(|e| ClientError::api(400, e.to_string()))?
            .expense;

        let mut expenses = self.lock();
        if expenses.iter().any(|e| e.id == expense.id) {
            return Err(ClientError::api(409, format!("expense {} already exists", expense.id)));
        }
        expenses.push(expense.clone());
        Ok(expense)
    }

    async fn list(&self, filter: &ExpenseFilter) -> ClientResult<Vec<Expense>> {
        Ok(filter.apply(&self.lock()))
    }

    async fn update(&self, id: &ExpenseId, patch: &ExpensePatch) -> ClientResult<Expense> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        let failure = *self.failure.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(status) = failure {
            return Err(ClientError::api(status, "injected failure"));
        }

        let mut expenses = self.lock();
        let expense = expenses
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| ClientError::NotFound(id.to_string()))?;
        patch.apply(expense);
        Ok(expense.clone())
    }
}
