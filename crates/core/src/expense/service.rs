//! Expense decision workflow.
//!
//! This module implements the status state machine for expenses: approve,
//! reject, the time-boxed administrative toggle, and mark paid. Operations
//! take the current record by reference and return a new one; nothing here
//! performs I/O.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tyredesk_shared::WorkflowConfig;
use tyredesk_shared::types::ExpenseId;

use crate::expense::action::{ActionKind, ExpenseAction, Transition};
use crate::expense::clock::{Clock, SystemClock};
use crate::expense::error::ExpenseError;
use crate::expense::types::{CreateExpenseInput, Decision, Expense, ExpenseStatus};

/// Tunables for the decision workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowPolicy {
    /// How long after the last decision a toggle is still allowed (exclusive).
    pub toggle_window: Duration,
    /// Recorded as approver when toggling to approved.
    pub admin_label: String,
    /// Recorded as reason when toggling to rejected without an existing reason.
    pub default_rejection_reason: String,
}

impl Default for WorkflowPolicy {
    fn default() -> Self {
        Self::from(&WorkflowConfig::default())
    }
}

impl From<&WorkflowConfig> for WorkflowPolicy {
    fn from(config: &WorkflowConfig) -> Self {
        Self {
            toggle_window: i64::try_from(config.toggle_window_secs)
                .ok()
                .and_then(Duration::try_seconds)
                .unwrap_or(Duration::MAX),
            admin_label: config.admin_label.clone(),
            default_rejection_reason: config.default_rejection_reason.clone(),
        }
    }
}

/// Returns true if a decision taken at `decision_date` can still be toggled at `now`.
///
/// The window is exclusive: a toggle exactly `window` after the decision is
/// refused. A decision date in the future (clock skew) counts as inside.
#[must_use]
pub fn within_toggle_window(
    decision_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    window: Duration,
) -> bool {
    decision_date.is_some_and(|decided| now - decided < window)
}

/// Renders a window length the way the error message shows it.
#[must_use]
pub fn describe_window(window: Duration) -> String {
    fn plural(n: i64, unit: &str) -> String {
        if n == 1 {
            format!("1 {unit}")
        } else {
            format!("{n} {unit}s")
        }
    }

    let secs = window.num_seconds();
    if secs > 0 && secs % 3600 == 0 {
        plural(secs / 3600, "hour")
    } else if secs > 0 && secs % 60 == 0 {
        plural(secs / 60, "minute")
    } else {
        plural(secs, "second")
    }
}

/// Service for expense status transitions.
///
/// Holds the policy and the clock; everything else is passed in per call.
#[derive(Debug, Clone)]
pub struct ExpenseWorkflow<C = SystemClock> {
    policy: WorkflowPolicy,
    clock: C,
}

impl Default for ExpenseWorkflow<SystemClock> {
    fn default() -> Self {
        Self::new(WorkflowPolicy::default(), SystemClock)
    }
}

impl<C: Clock> ExpenseWorkflow<C> {
    /// Creates a workflow with the given policy and clock.
    #[must_use]
    pub fn new(policy: WorkflowPolicy, clock: C) -> Self {
        Self { policy, clock }
    }

    /// Returns the active policy.
    #[must_use]
    pub fn policy(&self) -> &WorkflowPolicy {
        &self.policy
    }

    /// Returns the current time according to the injected clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Raise a new expense in Pending status.
    ///
    /// # Returns
    /// * `Ok(Transition)` with the new record and a `Create` action
    /// * `Err(ExpenseError::InvalidInput)` if title, amount or requester is invalid
    pub fn create(&self, input: CreateExpenseInput) -> Result<Transition, ExpenseError> {
        validate_new(&input)?;

        let now = self.clock.now();
        let expense = Expense {
            id: input.id.unwrap_or_default(),
            title: input.title.trim().to_string(),
            description: input.description,
            category: input.category,
            department: input.department,
            vendor: input.vendor,
            invoice_number: input.invoice_number,
            tags: input.tags,
            priority: input.priority,
            amount: input.amount,
            currency: input.currency,
            requested_by: input.requested_by,
            request_date: now,
            status: ExpenseStatus::Pending,
            approved_by: None,
            approved_date: None,
            rejection_reason: None,
            decision_date: None,
            paid_date: None,
        };

        let action = ExpenseAction::record(
            ActionKind::Create,
            None,
            &expense,
            Some(expense.requested_by.name.clone()),
            now,
        );
        Ok(Transition { expense, action })
    }

    /// Approve an expense.
    ///
    /// Accepted from every status, including Rejected and Paid. The
    /// rejection reason is left in place.
    pub fn approve(&self, expense: &Expense, approver_name: &str) -> Transition {
        let now = self.clock.now();
        let mut updated = expense.clone();
        updated.status = ExpenseStatus::Approved;
        updated.approved_by = Some(approver_name.to_string());
        updated.approved_date = Some(now);
        updated.decision_date = Some(now);

        let action = ExpenseAction::record(
            ActionKind::Approve,
            Some(expense),
            &updated,
            Some(approver_name.to_string()),
            now,
        );
        Transition {
            expense: updated,
            action,
        }
    }

    /// Reject an expense with a reason.
    ///
    /// # Returns
    /// * `Ok(Transition)` with status Rejected and the reason recorded
    /// * `Err(ExpenseError::RejectionReasonRequired)` if the reason is blank
    /// * `Err(ExpenseError::InvalidTransition)` if the expense is Paid
    pub fn reject(
        &self,
        expense: &Expense,
        rejection_reason: &str,
    ) -> Result<Transition, ExpenseError> {
        if rejection_reason.trim().is_empty() {
            return Err(ExpenseError::RejectionReasonRequired);
        }
        ensure_transition(expense.status, ExpenseStatus::Rejected)?;

        let now = self.clock.now();
        let mut updated = expense.clone();
        updated.status = ExpenseStatus::Rejected;
        updated.rejection_reason = Some(rejection_reason.to_string());
        updated.decision_date = Some(now);

        let action = ExpenseAction::record(ActionKind::Reject, Some(expense), &updated, None, now);
        Ok(Transition {
            expense: updated,
            action,
        })
    }

    /// Returns true if the last decision on `expense` can still be reversed.
    #[must_use]
    pub fn can_toggle_decision(&self, expense: &Expense) -> bool {
        within_toggle_window(
            expense.decision_date,
            self.clock.now(),
            self.policy.toggle_window,
        )
    }

    /// Reverse the last decision while the toggle window is open.
    ///
    /// # Returns
    /// * `Ok(Transition)` with the flipped status
    /// * `Err(ExpenseError::InvalidTransition)` if the expense is Paid
    /// * `Err(ExpenseError::ToggleWindowExpired)` if the window has closed
    pub fn toggle_decision(
        &self,
        expense: &Expense,
        target: Decision,
    ) -> Result<Transition, ExpenseError> {
        // Approve is permissive from Paid; toggling out of Paid is not.
        if expense.status.is_terminal() {
            return Err(ExpenseError::InvalidTransition {
                from: expense.status,
                to: target.status(),
            });
        }
        ensure_transition(expense.status, target.status())?;

        let now = self.clock.now();
        if !within_toggle_window(expense.decision_date, now, self.policy.toggle_window) {
            return Err(ExpenseError::ToggleWindowExpired {
                window: describe_window(self.policy.toggle_window),
            });
        }

        let mut updated = expense.clone();
        let (kind, actor) = match target {
            Decision::Approved => {
                updated.status = ExpenseStatus::Approved;
                updated.approved_by = Some(self.policy.admin_label.clone());
                updated.approved_date = Some(now);
                updated.rejection_reason = None;
                (ActionKind::ToggleApprove, self.policy.admin_label.clone())
            }
            Decision::Rejected => {
                updated.status = ExpenseStatus::Rejected;
                let reason = expense
                    .rejection_reason()
                    .map_or_else(|| self.policy.default_rejection_reason.clone(), str::to_string);
                updated.rejection_reason = Some(reason);
                (ActionKind::ToggleReject, self.policy.admin_label.clone())
            }
        };
        updated.decision_date = Some(now);

        let action = ExpenseAction::record(kind, Some(expense), &updated, Some(actor), now);
        Ok(Transition {
            expense: updated,
            action,
        })
    }

    /// Mark an approved expense as paid.
    ///
    /// The decision date is not touched, so payment does not reopen the
    /// toggle window.
    ///
    /// # Returns
    /// * `Ok(Transition)` with status Paid
    /// * `Err(ExpenseError::InvalidTransition)` if not in Approved status
    pub fn mark_paid(&self, expense: &Expense) -> Result<Transition, ExpenseError> {
        ensure_transition(expense.status, ExpenseStatus::Paid)?;

        let now = self.clock.now();
        let mut updated = expense.clone();
        updated.status = ExpenseStatus::Paid;
        updated.paid_date = Some(now);

        let action = ExpenseAction::record(ActionKind::MarkPaid, Some(expense), &updated, None, now);
        Ok(Transition {
            expense: updated,
            action,
        })
    }
}

fn ensure_transition(from: ExpenseStatus, to: ExpenseStatus) -> Result<(), ExpenseError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(ExpenseError::InvalidTransition { from, to })
    }
}

fn validate_new(input: &CreateExpenseInput) -> Result<(), ExpenseError> {
    if input.title.trim().is_empty() {
        return Err(ExpenseError::invalid_input("title", "must not be empty"));
    }
    if input.amount < Decimal::ZERO {
        return Err(ExpenseError::invalid_input("amount", "must not be negative"));
    }
    if input.requested_by.name.trim().is_empty() {
        return Err(ExpenseError::invalid_input("requestedBy.name", "must not be empty"));
    }
    if !input.requested_by.email.contains('@') {
        return Err(ExpenseError::invalid_input(
            "requestedBy.email",
            "must be an email address",
        ));
    }
    if input.id.as_ref().is_some_and(|id| id.as_str().trim().is_empty()) {
        return Err(ExpenseError::invalid_input("id", "must not be blank"));
    }
    Ok(())
}

/// Resolves an expense by id in a working set.
pub fn find_expense<'a>(expenses: &'a [Expense], id: &ExpenseId) -> Result<&'a Expense, ExpenseError> {
    expenses
        .iter()
        .find(|e| &e.id == id)
        .ok_or_else(|| ExpenseError::NotFound(id.clone()))
}
