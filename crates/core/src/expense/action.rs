//! Audit actions and persistence patches produced by workflow operations.
//!
//! Each operation returns the updated record together with an
//! `ExpenseAction` (who did what, when). The caller turns the before/after
//! pair into an `ExpensePatch` and sends it to the expense API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tyredesk_shared::types::{ActionId, ExpenseId};

use crate::expense::types::{Expense, ExpenseStatus, double_option};

/// What a workflow action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    /// Expense raised.
    Create,
    /// Explicit approval.
    Approve,
    /// Explicit rejection.
    Reject,
    /// Administrative reversal to approved.
    ToggleApprove,
    /// Administrative reversal to rejected.
    ToggleReject,
    /// Paid out.
    MarkPaid,
}

impl ActionKind {
    /// Returns the label used in the audit log.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Create => "created",
            Self::Approve => "approved",
            Self::Reject => "rejected",
            Self::ToggleApprove => "toggled to approved",
            Self::ToggleReject => "toggled to rejected",
            Self::MarkPaid => "marked paid",
        }
    }
}

/// Audit record for one workflow operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseAction {
    /// Unique identifier of this action.
    pub id: ActionId,
    /// The expense acted on.
    pub expense_id: ExpenseId,
    /// What happened.
    pub kind: ActionKind,
    /// Status before the action (`None` on create).
    pub from: Option<ExpenseStatus>,
    /// Status after the action.
    pub to: ExpenseStatus,
    /// Who acted, when known.
    pub actor: Option<String>,
    /// Rejection reason, when one applies.
    pub reason: Option<String>,
    /// When the action took effect.
    pub at: DateTime<Utc>,
}

impl ExpenseAction {
    pub(crate) fn record(
        kind: ActionKind,
        before: Option<&Expense>,
        after: &Expense,
        actor: Option<String>,
        at: DateTime<Utc>,
    ) -> Self {
        let reason = match after.status {
            ExpenseStatus::Rejected => after.rejection_reason.clone(),
            _ => None,
        };

        Self {
            id: ActionId::new(),
            expense_id: after.id.clone(),
            kind,
            from: before.map(|e| e.status),
            to: after.status,
            actor,
            reason,
            at,
        }
    }
}

/// Result of a successful workflow operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The updated expense.
    pub expense: Expense,
    /// The audit record for the change.
    pub action: ExpenseAction,
}

impl Transition {
    /// Returns the resulting status.
    #[must_use]
    pub fn new_status(&self) -> ExpenseStatus {
        self.expense.status
    }
}

/// Workflow field changes to send to the expense API.
///
/// Only fields that changed are present. `rejection_reason: Some(None)`
/// serializes as `null` and clears the reason remotely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePatch {
    /// New status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ExpenseStatus>,
    /// New approver name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    /// New approval timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_date: Option<DateTime<Utc>>,
    /// New rejection reason, or `Some(None)` to clear it.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub rejection_reason: Option<Option<String>>,
    /// New decision timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_date: Option<DateTime<Utc>>,
    /// New payment timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<DateTime<Utc>>,
}

impl ExpensePatch {
    /// Builds the patch that turns `before` into `after`.
    #[must_use]
    pub fn between(before: &Expense, after: &Expense) -> Self {
        fn changed<T: Clone + PartialEq>(old: &Option<T>, new: &Option<T>) -> Option<T> {
            if old == new { None } else { new.clone() }
        }

        Self {
            status: (before.status != after.status).then_some(after.status),
            approved_by: changed(&before.approved_by, &after.approved_by),
            approved_date: changed(&before.approved_date, &after.approved_date),
            rejection_reason: (before.rejection_reason != after.rejection_reason)
                .then(|| after.rejection_reason.clone()),
            decision_date: changed(&before.decision_date, &after.decision_date),
            paid_date: changed(&before.paid_date, &after.paid_date),
        }
    }

    /// Returns true if the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the patch to a local copy of the record.
    pub fn apply(&self, expense: &mut Expense) {
        if let Some(status) = self.status {
            expense.status = status;
        }
        if let Some(approved_by) = &self.approved_by {
            expense.approved_by = Some(approved_by.clone());
        }
        if let Some(approved_date) = self.approved_date {
            expense.approved_date = Some(approved_date);
        }
        if let Some(reason) = &self.rejection_reason {
            expense.rejection_reason.clone_from(reason);
        }
        if let Some(decision_date) = self.decision_date {
            expense.decision_date = Some(decision_date);
        }
        if let Some(paid_date) = self.paid_date {
            expense.paid_date = Some(paid_date);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expense::types::{ExpenseCategory, Requester};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn sample() -> Expense {
        Expense {
            id: ExpenseId::from("exp-1"),
            title: "Forklift tyres".to_string(),
            description: String::new(),
            category: ExpenseCategory::TyreStock,
            department: "Warehouse".to_string(),
            vendor: None,
            invoice_number: None,
            tags: Default::default(),
            priority: None,
            amount: dec!(120000),
            currency: "₦".to_string(),
            requested_by: Requester {
                name: "Ada Obi".to_string(),
                email: "ada@example.com".to_string(),
            },
            request_date: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
            status: ExpenseStatus::Rejected,
            approved_by: None,
            approved_date: None,
            rejection_reason: Some("dup".to_string()),
            decision_date: None,
            paid_date: None,
        }
    }

    #[test]
    fn test_patch_between_identical_is_empty() {
        let expense = sample();
        assert!(ExpensePatch::between(&expense, &expense).is_empty());
    }

    #[test]
    fn test_patch_clears_rejection_reason() {
        let before = sample();
        let mut after = before.clone();
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        after.status = ExpenseStatus::Approved;
        after.approved_by = Some("Admin".to_string());
        after.approved_date = Some(at);
        after.rejection_reason = None;
        after.decision_date = Some(at);

        let patch = ExpensePatch::between(&before, &after);
        assert_eq!(patch.status, Some(ExpenseStatus::Approved));
        assert_eq!(patch.rejection_reason, Some(None));

        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json["status"], "APPROVED");
        assert_eq!(json["approvedBy"], "Admin");
        assert!(json["rejectionReason"].is_null());
        assert!(json.get("paidDate").is_none());

        let mut replay = before.clone();
        patch.apply(&mut replay);
        assert_eq!(replay, after);
    }

    #[test]
    fn test_patch_deserialize_distinguishes_null_and_absent() {
        let cleared: ExpensePatch =
            serde_json::from_str(r#"{"status":"APPROVED","rejectionReason":null}"#).unwrap();
        assert_eq!(cleared.rejection_reason, Some(None));

        let untouched: ExpensePatch = serde_json::from_str(r#"{"status":"APPROVED"}"#).unwrap();
        assert_eq!(untouched.rejection_reason, None);
    }

    #[test]
    fn test_action_records_reason_only_when_rejected() {
        let expense = sample();
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 5, 0).unwrap();
        let action = ExpenseAction::record(ActionKind::Reject, None, &expense, None, at);
        assert_eq!(action.reason.as_deref(), Some("dup"));
        assert_eq!(action.to, ExpenseStatus::Rejected);
        assert_eq!(action.from, None);

        let mut approved = expense.clone();
        approved.status = ExpenseStatus::Approved;
        let action = ExpenseAction::record(
            ActionKind::Approve,
            Some(&expense),
            &approved,
            Some("Chidi".to_string()),
            at,
        );
        assert_eq!(action.reason, None);
        assert_eq!(action.from, Some(ExpenseStatus::Rejected));
        assert_eq!(action.kind.label(), "approved");
    }
}
