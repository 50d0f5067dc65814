//! Property-based tests for the expense workflow.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use tyredesk_shared::types::ExpenseId;

use crate::expense::clock::ManualClock;
use crate::expense::error::ExpenseError;
use crate::expense::service::{ExpenseWorkflow, WorkflowPolicy, within_toggle_window};
use crate::expense::summary::ExpenseSummary;
use crate::expense::types::{Decision, Expense, ExpenseCategory, ExpenseStatus, Requester};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

fn arb_status() -> impl Strategy<Value = ExpenseStatus> {
    prop_oneof![
        Just(ExpenseStatus::Pending),
        Just(ExpenseStatus::Approved),
        Just(ExpenseStatus::Rejected),
        Just(ExpenseStatus::Paid),
    ]
}

fn arb_decision() -> impl Strategy<Value = Decision> {
    prop_oneof![Just(Decision::Approved), Just(Decision::Rejected)]
}

/// Amounts from 0.00 to 10,000,000.00.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_reason() -> impl Strategy<Value = Option<String>> {
    prop_oneof![Just(None), "[a-z ]{0,20}".prop_map(Some)]
}

fn arb_expense() -> impl Strategy<Value = Expense> {
    (
        arb_status(),
        arb_amount(),
        arb_reason(),
        proptest::option::of(-7200i64..7200),
    )
        .prop_map(|(status, amount, rejection_reason, decided_offset)| Expense {
            id: ExpenseId::from("exp-prop"),
            title: "Generated".to_string(),
            description: String::new(),
            category: ExpenseCategory::Other,
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
            request_date: t0() - Duration::days(1),
            status,
            approved_by: None,
            approved_date: None,
            rejection_reason,
            decision_date: decided_offset.map(|secs| t0() - Duration::seconds(secs)),
            paid_date: None,
        })
}

fn workflow() -> ExpenseWorkflow<Arc<ManualClock>> {
    ExpenseWorkflow::new(WorkflowPolicy::default(), Arc::new(ManualClock::new(t0())))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The window check agrees with the elapsed time for every offset.
    #[test]
    fn prop_window_matches_elapsed(elapsed in -86_400i64..86_400, window in 0i64..7200) {
        let decided = t0();
        let now = decided + Duration::seconds(elapsed);
        let inside = within_toggle_window(Some(decided), now, Duration::seconds(window));
        prop_assert_eq!(inside, elapsed < window);
    }

    /// No decision date means no toggle, whatever the window.
    #[test]
    fn prop_window_requires_decision(window in 0i64..1_000_000) {
        prop_assert!(!within_toggle_window(None, t0(), Duration::seconds(window)));
    }

    /// Approve always lands in Approved and stamps the decision date.
    #[test]
    fn prop_approve_always_approved(expense in arb_expense(), approver in "[A-Za-z]{1,12}") {
        let transition = workflow().approve(&expense, &approver);
        prop_assert_eq!(transition.expense.status, ExpenseStatus::Approved);
        prop_assert_eq!(transition.expense.approved_by.as_deref(), Some(approver.as_str()));
        prop_assert_eq!(transition.expense.decision_date, Some(t0()));
        prop_assert_eq!(transition.expense.amount, expense.amount);
        prop_assert_eq!(transition.expense.rejection_reason, expense.rejection_reason);
    }

    /// A blank reason is refused from every status.
    #[test]
    fn prop_blank_reject_is_refused(expense in arb_expense(), blank in "[ \t]{0,5}") {
        let result = workflow().reject(&expense, &blank);
        prop_assert_eq!(result.unwrap_err(), ExpenseError::RejectionReasonRequired);
    }

    /// Toggle succeeds exactly when the expense is not Paid and inside the window,
    /// and the input record is never modified.
    #[test]
    fn prop_toggle_respects_window(expense in arb_expense(), target in arb_decision()) {
        let snapshot = expense.clone();
        let wf = workflow();
        let allowed = expense.status != ExpenseStatus::Paid && wf.can_toggle_decision(&expense);

        match wf.toggle_decision(&expense, target) {
            Ok(transition) => {
                prop_assert!(allowed);
                prop_assert_eq!(transition.expense.status, target.status());
                prop_assert_eq!(transition.expense.decision_date, Some(t0()));
                if target == Decision::Rejected {
                    prop_assert!(transition.expense.rejection_reason().is_some());
                } else {
                    prop_assert_eq!(transition.expense.rejection_reason, None);
                }
            }
            Err(err) => {
                prop_assert!(!allowed);
                let refused = matches!(
                    err,
                    ExpenseError::ToggleWindowExpired { .. } | ExpenseError::InvalidTransition { .. }
                );
                prop_assert!(refused, "unexpected toggle error: {:?}", err);
            }
        }
        prop_assert_eq!(expense, snapshot);
    }

    /// Mark paid succeeds only from Approved.
    #[test]
    fn prop_mark_paid_only_from_approved(expense in arb_expense()) {
        let result = workflow().mark_paid(&expense);
        prop_assert_eq!(result.is_ok(), expense.status == ExpenseStatus::Approved);
        if let Ok(transition) = result {
            prop_assert_eq!(transition.expense.status, ExpenseStatus::Paid);
            prop_assert_eq!(transition.expense.decision_date, expense.decision_date);
        }
    }

    /// Summary counts partition the list and the total is the plain sum.
    #[test]
    fn prop_summary_totals(expenses in prop::collection::vec(arb_expense(), 0..30)) {
        let summary = ExpenseSummary::generate(&expenses);
        let expected: Decimal = expenses.iter().map(|e| e.amount).sum();
        prop_assert_eq!(summary.total_amount, expected);
        prop_assert_eq!(summary.total_expenses, expenses.len());
        let counted: usize = ExpenseStatus::ALL.iter().map(|s| summary.count(*s)).sum();
        prop_assert_eq!(counted, expenses.len());
    }
}
