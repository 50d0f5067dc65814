//! Summary cards for the expenses page.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::expense::types::{Expense, ExpenseCategory, ExpenseStatus};

/// Aggregate counts and totals over a list of expenses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSummary {
    /// Number of expenses.
    pub total_expenses: usize,
    /// Number in Pending.
    pub pending_expenses: usize,
    /// Number in Approved.
    pub approved_expenses: usize,
    /// Number in Rejected.
    pub rejected_expenses: usize,
    /// Number in Paid.
    pub paid_expenses: usize,
    /// Sum of every amount, whatever the status.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub total_amount: Decimal,
    /// Amount per category, for the breakdown chart.
    #[serde(default)]
    pub amount_by_category: BTreeMap<ExpenseCategory, Decimal>,
}

impl ExpenseSummary {
    /// Computes the summary for `expenses`. An empty slice yields all zeros.
    #[must_use]
    pub fn generate(expenses: &[Expense]) -> Self {
        expenses.iter().fold(Self::default(), |mut summary, expense| {
            summary.total_expenses += 1;
            match expense.status {
                ExpenseStatus::Pending => summary.pending_expenses += 1,
                ExpenseStatus::Approved => summary.approved_expenses += 1,
                ExpenseStatus::Rejected => summary.rejected_expenses += 1,
                ExpenseStatus::Paid => summary.paid_expenses += 1,
            }
            summary.total_amount += expense.amount;
            *summary
                .amount_by_category
                .entry(expense.category)
                .or_insert(Decimal::ZERO) += expense.amount;
            summary
        })
    }

    /// Returns the count for one status.
    #[must_use]
    pub fn count(&self, status: ExpenseStatus) -> usize {
        match status {
            ExpenseStatus::Pending => self.pending_expenses,
            ExpenseStatus::Approved => self.approved_expenses,
            ExpenseStatus::Rejected => self.rejected_expenses,
            ExpenseStatus::Paid => self.paid_expenses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expense::types::Requester;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use tyredesk_shared::types::ExpenseId;

    fn expense(id: &str, amount: Decimal, status: ExpenseStatus, category: ExpenseCategory) -> Expense {
        Expense {
            id: ExpenseId::from(id),
            title: format!("Expense {id}"),
            description: String::new(),
            category,
            department: "Sales".to_string(),
            vendor: None,
            invoice_number: None,
            tags: Default::default(),
            priority: None,
            amount,
            currency: "₦".to_string(),
            requested_by: Requester {
                name: "Ada Obi".to_string(),
                email: "ada@example.com".to_string(),
            },
            request_date: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
            status,
            approved_by: None,
            approved_date: None,
            rejection_reason: None,
            decision_date: None,
            paid_date: None,
        }
    }

    #[test]
    fn test_empty_summary() {
        let summary = ExpenseSummary::generate(&[]);
        assert_eq!(summary.total_expenses, 0);
        assert_eq!(summary.pending_expenses, 0);
        assert_eq!(summary.approved_expenses, 0);
        assert_eq!(summary.rejected_expenses, 0);
        assert_eq!(summary.paid_expenses, 0);
        assert_eq!(summary.total_amount, Decimal::ZERO);
        assert!(summary.amount_by_category.is_empty());
    }

    #[test]
    fn test_total_amount_ignores_status() {
        let expenses = vec![
            expense("1", dec!(100), ExpenseStatus::Pending, ExpenseCategory::Rent),
            expense("2", dec!(200), ExpenseStatus::Approved, ExpenseCategory::Rent),
            expense("3", dec!(0), ExpenseStatus::Rejected, ExpenseCategory::Travel),
        ];

        let summary = ExpenseSummary::generate(&expenses);
        assert_eq!(summary.total_expenses, 3);
        assert_eq!(summary.total_amount, dec!(300));
        assert_eq!(summary.pending_expenses, 1);
        assert_eq!(summary.approved_expenses, 1);
        assert_eq!(summary.rejected_expenses, 1);
        assert_eq!(summary.paid_expenses, 0);
        assert_eq!(summary.amount_by_category[&ExpenseCategory::Rent], dec!(300));
        assert_eq!(summary.amount_by_category[&ExpenseCategory::Travel], dec!(0));
    }

    #[test]
    fn test_count_by_status() {
        let expenses = vec![
            expense("1", dec!(10.50), ExpenseStatus::Paid, ExpenseCategory::Utilities),
            expense("2", dec!(4.25), ExpenseStatus::Paid, ExpenseCategory::Utilities),
        ];
        let summary = ExpenseSummary::generate(&expenses);
        assert_eq!(summary.count(ExpenseStatus::Paid), 2);
        assert_eq!(summary.count(ExpenseStatus::Pending), 0);
        assert_eq!(summary.total_amount, dec!(14.75));
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let json = serde_json::to_value(ExpenseSummary::generate(&[])).unwrap();
        assert_eq!(json["totalExpenses"], 0);
        assert_eq!(json["pendingExpenses"], 0);
        assert!(json["totalAmount"].is_number());
    }
}
