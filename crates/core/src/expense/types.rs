//! Expense domain types.
//!
//! Records are modelled on the remote API's JSON shape: camelCase field
//! names, uppercase status codes and SCREAMING_SNAKE category codes.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use tyredesk_shared::types::ExpenseId;

use crate::expense::error::ExpenseError;

/// Expense status in the decision workflow.
///
/// The valid transitions are:
/// - Pending → Approved (approve)
/// - Pending → Rejected (reject)
/// - Approved ↔ Rejected (toggle, within the reversal window)
/// - Approved → Paid (mark paid)
///
/// Approve is accepted from every status; see `ExpenseWorkflow::approve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExpenseStatus {
    /// Submitted and waiting for a decision.
    Pending,
    /// Approved for payment.
    Approved,
    /// Rejected with a reason.
    Rejected,
    /// Paid out (terminal).
    Paid,
}

impl ExpenseStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 4] = [Self::Pending, Self::Approved, Self::Rejected, Self::Paid];

    /// Returns the wire representation used by the remote API.
    #[must_use]
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Paid => "PAID",
        }
    }

    /// Returns the label shown to operators.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Paid => "Paid",
        }
    }

    /// Parses a status from either its wire code or its label.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "APPROVED" => Some(Self::Approved),
            "REJECTED" => Some(Self::Rejected),
            "PAID" => Some(Self::Paid),
            _ => None,
        }
    }

    /// Parses a wire status, failing on anything outside the enumeration.
    pub fn from_wire(s: &str) -> Result<Self, ExpenseError> {
        Self::parse(s).ok_or_else(|| ExpenseError::UnknownStatus(s.to_string()))
    }

    /// Returns true if no in-scope operation moves the expense out of this status.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Paid)
    }

    /// Check if the workflow can move an expense from this status to `to`.
    ///
    /// Every guarded operation in the workflow consults this table.
    ///
    /// Valid transitions:
    /// - any → Approved (approve)
    /// - Pending | Approved | Rejected → Rejected (reject, toggle)
    /// - Approved → Paid (mark paid)
    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        matches!(
            (self, to),
            (_, Self::Approved)
                | (Self::Pending | Self::Approved | Self::Rejected, Self::Rejected)
                | (Self::Approved, Self::Paid)
        )
    }
}

impl fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Target of a decision toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    /// Flip to approved.
    Approved,
    /// Flip to rejected.
    Rejected,
}

impl Decision {
    /// Returns the status this decision results in.
    #[must_use]
    pub fn status(&self) -> ExpenseStatus {
        match self {
            Self::Approved => ExpenseStatus::Approved,
            Self::Rejected => ExpenseStatus::Rejected,
        }
    }

    /// Parses a decision from a status string.
    pub fn parse(s: &str) -> Option<Self> {
        match ExpenseStatus::parse(s)? {
            ExpenseStatus::Approved => Some(Self::Approved),
            ExpenseStatus::Rejected => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// Expense category codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseCategory {
    /// Tyre stock purchases.
    TyreStock,
    /// Freight and delivery.
    Logistics,
    /// Power, water, internet.
    Utilities,
    /// Shop and warehouse rent.
    Rent,
    /// Salaries and wages.
    Payroll,
    /// Advertising and promotions.
    Marketing,
    /// Equipment and premises maintenance.
    Maintenance,
    /// Stationery and consumables.
    OfficeSupplies,
    /// Staff travel.
    Travel,
    /// Anything else.
    Other,
}

impl ExpenseCategory {
    /// All categories.
    pub const ALL: [Self; 10] = [
        Self::TyreStock,
        Self::Logistics,
        Self::Utilities,
        Self::Rent,
        Self::Payroll,
        Self::Marketing,
        Self::Maintenance,
        Self::OfficeSupplies,
        Self::Travel,
        Self::Other,
    ];

    /// Returns the wire code.
    #[must_use]
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::TyreStock => "TYRE_STOCK",
            Self::Logistics => "LOGISTICS",
            Self::Utilities => "UTILITIES",
            Self::Rent => "RENT",
            Self::Payroll => "PAYROLL",
            Self::Marketing => "MARKETING",
            Self::Maintenance => "MAINTENANCE",
            Self::OfficeSupplies => "OFFICE_SUPPLIES",
            Self::Travel => "TRAVEL",
            Self::Other => "OTHER",
        }
    }

    /// Returns the label shown to operators.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::TyreStock => "Tyre Stock",
            Self::Logistics => "Logistics",
            Self::Utilities => "Utilities",
            Self::Rent => "Rent",
            Self::Payroll => "Payroll",
            Self::Marketing => "Marketing",
            Self::Maintenance => "Maintenance",
            Self::OfficeSupplies => "Office Supplies",
            Self::Travel => "Travel",
            Self::Other => "Other",
        }
    }

    /// Parses a category from its wire code or label.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_uppercase().replace([' ', '-'], "_");
        Self::ALL.into_iter().find(|c| c.as_wire() == normalized)
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Expense priority, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Normal handling.
    Medium,
    /// Handle soon.
    High,
    /// Blocking operations.
    Urgent,
}

impl Priority {
    /// Parses a priority, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "urgent" => Some(Self::Urgent),
            _ => None,
        }
    }

    /// Returns the label shown to operators.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Urgent => "Urgent",
        }
    }
}

/// The person who raised an expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: String,
}

/// An expense record and its workflow metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Unique identifier.
    pub id: ExpenseId,
    /// Short title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Category code.
    pub category: ExpenseCategory,
    /// Owning department.
    #[serde(default)]
    pub department: String,
    /// Supplier being paid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    /// Supplier invoice number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Handling priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Non-negative amount, a plain JSON number on the wire.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
    /// Display symbol for the amount.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Who raised the expense. Never changes after creation.
    pub requested_by: Requester,
    /// When the expense was raised.
    pub request_date: DateTime<Utc>,
    /// Current workflow status.
    pub status: ExpenseStatus,
    /// Name of the last approver. Meaningful only when Approved or Paid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    /// When the expense last entered Approved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_date: Option<DateTime<Utc>>,
    /// Why the expense was rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    /// When the last approve, reject or toggle happened.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_date: Option<DateTime<Utc>>,
    /// When the expense was paid out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<DateTime<Utc>>,
}

pub(crate) fn default_currency() -> String {
    "₦".to_string()
}

impl Expense {
    /// Returns the approver only when the status makes it meaningful.
    ///
    /// A rejected expense may still carry the name of an earlier approver.
    #[must_use]
    pub fn effective_approver(&self) -> Option<&str> {
        match self.status {
            ExpenseStatus::Approved | ExpenseStatus::Paid => self.approved_by.as_deref(),
            _ => None,
        }
    }

    /// Returns the rejection reason if it is non-blank.
    #[must_use]
    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason
            .as_deref()
            .filter(|reason| !reason.trim().is_empty())
    }
}

/// Input for raising a new expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseInput {
    /// Identifier to use instead of a generated one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ExpenseId>,
    /// Short title (required).
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Category code.
    pub category: ExpenseCategory,
    /// Owning department.
    #[serde(default)]
    pub department: String,
    /// Supplier being paid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    /// Supplier invoice number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Handling priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Non-negative amount, a plain JSON number on the wire.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
    /// Display symbol for the amount.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Who is raising the expense.
    pub requested_by: Requester,
}

/// Deserializes a field that distinguishes "absent" from "explicitly null".
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`: a missing
/// field stays `None`, `null` becomes `Some(None)`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_wire_round_trip() {
        for status in ExpenseStatus::ALL {
            assert_eq!(ExpenseStatus::from_wire(status.as_wire()).unwrap(), status);
        }
    }

    #[rstest]
    #[case("PENDING", Some(ExpenseStatus::Pending))]
    #[case("Approved", Some(ExpenseStatus::Approved))]
    #[case(" rejected ", Some(ExpenseStatus::Rejected))]
    #[case("paid", Some(ExpenseStatus::Paid))]
    #[case("VOID", None)]
    #[case("", None)]
    fn test_status_parse(#[case] input: &str, #[case] expected: Option<ExpenseStatus>) {
        assert_eq!(ExpenseStatus::parse(input), expected);
    }

    #[test]
    fn test_status_from_wire_unknown() {
        let err = ExpenseStatus::from_wire("ARCHIVED").unwrap_err();
        assert!(matches!(err, ExpenseError::UnknownStatus(s) if s == "ARCHIVED"));
    }

    #[test]
    fn test_status_display_uses_label() {
        assert_eq!(ExpenseStatus::Pending.to_string(), "Pending");
        assert_eq!(ExpenseStatus::Paid.to_string(), "Paid");
    }

    #[test]
    fn test_status_serde_uses_wire() {
        assert_eq!(
            serde_json::to_string(&ExpenseStatus::Approved).unwrap(),
            "\"APPROVED\""
        );
        let parsed: ExpenseStatus = serde_json::from_str("\"REJECTED\"").unwrap();
        assert_eq!(parsed, ExpenseStatus::Rejected);
        assert!(serde_json::from_str::<ExpenseStatus>("\"Approved\"").is_err());
    }

    #[test]
    fn test_status_terminal() {
        assert!(ExpenseStatus::Paid.is_terminal());
        assert!(!ExpenseStatus::Approved.is_terminal());
        assert!(!ExpenseStatus::Pending.is_terminal());
    }

    #[test]
    fn test_can_transition_to() {
        // Valid transitions
        assert!(ExpenseStatus::Pending.can_transition_to(ExpenseStatus::Approved));
        assert!(ExpenseStatus::Pending.can_transition_to(ExpenseStatus::Rejected));
        assert!(ExpenseStatus::Rejected.can_transition_to(ExpenseStatus::Approved));
        assert!(ExpenseStatus::Approved.can_transition_to(ExpenseStatus::Rejected));
        assert!(ExpenseStatus::Approved.can_transition_to(ExpenseStatus::Paid));
        assert!(ExpenseStatus::Paid.can_transition_to(ExpenseStatus::Approved));

        // Invalid transitions
        assert!(!ExpenseStatus::Pending.can_transition_to(ExpenseStatus::Paid));
        assert!(!ExpenseStatus::Paid.can_transition_to(ExpenseStatus::Rejected));
        assert!(!ExpenseStatus::Approved.can_transition_to(ExpenseStatus::Pending));
        assert!(!ExpenseStatus::Rejected.can_transition_to(ExpenseStatus::Paid));
    }

    #[test]
    fn test_decision_parse() {
        assert_eq!(Decision::parse("approved"), Some(Decision::Approved));
        assert_eq!(Decision::parse("REJECTED"), Some(Decision::Rejected));
        assert_eq!(Decision::parse("paid"), None);
        assert_eq!(Decision::Rejected.status(), ExpenseStatus::Rejected);
    }

    #[rstest]
    #[case("TYRE_STOCK", Some(ExpenseCategory::TyreStock))]
    #[case("Office Supplies", Some(ExpenseCategory::OfficeSupplies))]
    #[case("office-supplies", Some(ExpenseCategory::OfficeSupplies))]
    #[case("rent", Some(ExpenseCategory::Rent))]
    #[case("fuel", None)]
    fn test_category_parse(#[case] input: &str, #[case] expected: Option<ExpenseCategory>) {
        assert_eq!(ExpenseCategory::parse(input), expected);
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::High < Priority::Urgent);
        assert_eq!(Priority::parse("URGENT"), Some(Priority::Urgent));
        assert_eq!(Priority::parse("whenever"), None);
    }

    #[test]
    fn test_expense_deserializes_api_shape() {
        let json = r#"{
            "id": "exp-1",
            "title": "Wheel balancer service",
            "category": "MAINTENANCE",
            "amount": 45000.5,
            "requestedBy": { "name": "Ada Obi", "email": "ada@example.com" },
            "requestDate": "2026-03-01T09:00:00Z",
            "status": "PENDING",
            "tags": ["workshop"]
        }"#;

        let expense: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(expense.id.as_str(), "exp-1");
        assert_eq!(expense.status, ExpenseStatus::Pending);
        assert_eq!(expense.currency, "₦");
        assert_eq!(expense.category, ExpenseCategory::Maintenance);
        assert!(expense.tags.contains("workshop"));
        assert_eq!(expense.decision_date, None);
        assert_eq!(expense.amount, dec!(45000.5));
    }

    #[test]
    fn test_amount_serializes_as_number() {
        let json = r#"{
            "title": "Wheel balancer service",
            "category": "MAINTENANCE",
            "amount": 45000.50,
            "requestedBy": { "name": "Ada Obi", "email": "ada@example.com" }
        }"#;
        let input: CreateExpenseInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.amount, dec!(45000.50));

        let body = serde_json::to_value(&input).unwrap();
        assert!(body["amount"].is_number());
        assert_eq!(body["amount"].to_string(), "45000.50");

        let expense: Expense = serde_json::from_str(
            r#"{
                "id": "exp-1",
                "title": "x",
                "category": "OTHER",
                "amount": 1200,
                "requestedBy": { "name": "A", "email": "a@example.com" },
                "requestDate": "2026-03-01T09:00:00Z",
                "status": "APPROVED"
            }"#,
        )
        .unwrap();
        let value = serde_json::to_value(&expense).unwrap();
        assert!(value["amount"].is_number());
        assert_eq!(value["amount"], 1200);
    }

    #[test]
    fn test_expense_rejects_unknown_status() {
        let json = r#"{
            "id": "exp-1",
            "title": "x",
            "category": "OTHER",
            "amount": 1,
            "requestedBy": { "name": "A", "email": "a@example.com" },
            "requestDate": "2026-03-01T09:00:00Z",
            "status": "ON_HOLD"
        }"#;

        assert!(serde_json::from_str::<Expense>(json).is_err());
    }
}
