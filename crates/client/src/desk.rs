//! The expense desk: a working set of expenses kept in sync with the API.
//!
//! Every decision runs through the workflow first. Only a successful
//! transition is sent to the gateway, and the local record is replaced by the
//! server's copy once the update is accepted. A refused operation or a failed
//! update leaves the working set exactly as it was.

use tracing::{error, info, warn};
use tyredesk_core::expense::{
    CreateExpenseInput, Decision, Expense, ExpenseAction, ExpenseError, ExpenseFilter,
    ExpensePatch, ExpenseQuery, ExpenseSummary, ExpenseWorkflow, SystemClock, Transition,
    find_expense,
};
use tyredesk_core::Clock;
use tyredesk_shared::types::{ExpenseId, PageResponse};

use crate::error::{ClientError, ClientResult};
use crate::gateway::ExpenseGateway;

/// Working set of expenses bound to a gateway and a workflow.
pub struct ExpenseDesk<G, C = SystemClock> {
    gateway: G,
    workflow: ExpenseWorkflow<C>,
    expenses: Vec<Expense>,
    audit: Vec<ExpenseAction>,
}

impl<G: ExpenseGateway, C: Clock> ExpenseDesk<G, C> {
    /// Creates an empty desk.
    #[must_use]
    pub fn new(gateway: G, workflow: ExpenseWorkflow<C>) -> Self {
        Self {
            gateway,
            workflow,
            expenses: Vec::new(),
            audit: Vec::new(),
        }
    }

    /// Returns the gateway.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Returns the workflow.
    pub fn workflow(&self) -> &ExpenseWorkflow<C> {
        &self.workflow
    }

    /// Returns the working set.
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Returns the actions taken through this desk, oldest first.
    pub fn audit_log(&self) -> &[ExpenseAction] {
        &self.audit
    }

    /// Replaces the working set with the server's list.
    ///
    /// # Errors
    ///
    /// Returns the gateway error; the working set is kept on failure.
    pub async fn refresh(&mut self, filter: &ExpenseFilter) -> ClientResult<usize> {
        match self.gateway.list(filter).await {
            Ok(expenses) => {
                info!(count = expenses.len(), "expenses loaded");
                self.expenses = expenses;
                Ok(self.expenses.len())
            }
            Err(err) => {
                error!(error = %err, "failed to load expenses");
                Err(err)
            }
        }
    }

    /// Looks up an expense in the working set.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is not loaded.
    pub fn get(&self, id: &ExpenseId) -> ClientResult<&Expense> {
        Ok(find_expense(&self.expenses, id)?)
    }

    /// Summary cards over the working set.
    #[must_use]
    pub fn summary(&self) -> ExpenseSummary {
        ExpenseSummary::generate(&self.expenses)
    }

    /// Filters, sorts and pages the working set.
    #[must_use]
    pub fn query(&self, query: &ExpenseQuery) -> PageResponse<Expense> {
        query.run(&self.expenses)
    }

    /// Returns true if the last decision on `id` can still be toggled.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is not loaded.
    pub fn can_toggle(&self, id: &ExpenseId) -> ClientResult<bool> {
        Ok(self.workflow.can_toggle_decision(self.get(id)?))
    }

    /// Validates and raises a new expense, then adds the server's copy.
    ///
    /// # Errors
    ///
    /// Returns a workflow error for invalid input, or the gateway error.
    pub async fn create(&mut self, input: CreateExpenseInput) -> ClientResult<&Expense> {
        let transition = match self.workflow.create(input.clone()) {
            Ok(transition) => transition,
            Err(err) => {
                warn!(error = %err, "expense creation refused");
                return Err(err.into());
            }
        };

        let input = CreateExpenseInput {
            id: Some(transition.expense.id.clone()),
            ..input
        };
        let saved = match self.gateway.create(&input).await {
            Ok(saved) => saved,
            Err(err) => {
                error!(expense_id = %transition.expense.id, error = %err, "failed to create expense");
                return Err(err);
            }
        };

        info!(expense_id = %saved.id, amount = %saved.amount, "expense created");
        // The server may assign its own id.
        let mut action = transition.action;
        action.expense_id = saved.id.clone();
        self.audit.push(action);
        self.expenses.push(saved);
        let index = self.expenses.len() - 1;
        Ok(&self.expenses[index])
    }

    /// Approves an expense.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or the gateway error.
    pub async fn approve(&mut self, id: &ExpenseId, approver_name: &str) -> ClientResult<&Expense> {
        self.apply(id, |workflow, expense| Ok(workflow.approve(expense, approver_name)))
            .await
    }

    /// Rejects an expense with a reason.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `RejectionReasonRequired` or the gateway error.
    pub async fn reject(&mut self, id: &ExpenseId, reason: &str) -> ClientResult<&Expense> {
        self.apply(id, |workflow, expense| workflow.reject(expense, reason))
            .await
    }

    /// Reverses the last decision while the toggle window is open.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `ToggleWindowExpired`, `InvalidTransition` or the gateway error.
    pub async fn toggle(&mut self, id: &ExpenseId, target: Decision) -> ClientResult<&Expense> {
        self.apply(id, |workflow, expense| workflow.toggle_decision(expense, target))
            .await
    }

    /// Marks an approved expense as paid.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `InvalidTransition` or the gateway error.
    pub async fn mark_paid(&mut self, id: &ExpenseId) -> ClientResult<&Expense> {
        self.apply(id, |workflow, expense| workflow.mark_paid(expense))
            .await
    }

    async fn apply<F>(&mut self, id: &ExpenseId, operation: F) -> ClientResult<&Expense>
    where
        F: FnOnce(&ExpenseWorkflow<C>, &Expense) -> Result<Transition, ExpenseError>,
    {
        let Some(index) = self.expenses.iter().position(|e| &e.id == id) else {
            warn!(expense_id = %id, "expense not in working set");
            return Err(ExpenseError::NotFound(id.clone()).into());
        };

        let current = &self.expenses[index];
        let transition = match operation(&self.workflow, current) {
            Ok(transition) => transition,
            Err(err) => {
                warn!(expense_id = %id, status = %current.status, error = %err, "operation refused");
                return Err(ClientError::Workflow(err));
            }
        };

        let patch = ExpensePatch::between(current, &transition.expense);
        let saved = match self.gateway.update(id, &patch).await {
            Ok(saved) => saved,
            Err(err) => {
                error!(expense_id = %id, error = %err, "failed to persist expense update");
                return Err(err);
            }
        };

        info!(
            expense_id = %id,
            action = transition.action.kind.label(),
            from = %current.status,
            to = %saved.status,
            "expense updated"
        );
        self.expenses[index] = saved;
        self.audit.push(transition.action);
        Ok(&self.expenses[index])
    }
}
