//! Filtering, sorting and pagination for expense lists.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tyredesk_shared::types::{PageRequest, PageResponse};

use crate::expense::types::{Expense, ExpenseCategory, ExpenseStatus, Priority};

/// Filter for expense lists. Empty criteria match everything; set criteria
/// are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseFilter {
    /// Case-insensitive substring over title, description, requester name
    /// and category.
    pub search: Option<String>,
    /// Exact status.
    pub status: Option<ExpenseStatus>,
    /// Exact category.
    pub category: Option<ExpenseCategory>,
    /// Department, compared case-insensitively.
    pub department: Option<String>,
    /// Exact priority.
    pub priority: Option<Priority>,
}

impl ExpenseFilter {
    /// Creates a new empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search text.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Restricts to one status.
    #[must_use]
    pub const fn with_status(mut self, status: ExpenseStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts to one category.
    #[must_use]
    pub const fn with_category(mut self, category: ExpenseCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Restricts to one department.
    #[must_use]
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// Restricts to one priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Returns the search needle, or `None` if blank.
    #[must_use]
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// Returns true if the filter is empty (matches everything).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search_term().is_none()
            && self.status.is_none()
            && self.category.is_none()
            && self.department.as_deref().is_none_or(|d| d.trim().is_empty())
            && self.priority.is_none()
    }

    /// Returns true if `expense` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, expense: &Expense) -> bool {
        if self.status.is_some_and(|s| s != expense.status) {
            return false;
        }
        if self.category.is_some_and(|c| c != expense.category) {
            return false;
        }
        if self.priority.is_some_and(|p| Some(p) != expense.priority) {
            return false;
        }
        if let Some(department) = self.department.as_deref().map(str::trim)
            && !department.is_empty()
            && !expense.department.trim().eq_ignore_ascii_case(department)
        {
            return false;
        }
        if let Some(needle) = self.search_term() {
            let haystacks = [
                expense.title.as_str(),
                expense.description.as_str(),
                expense.requested_by.name.as_str(),
                expense.category.label(),
                expense.category.as_wire(),
            ];
            return haystacks
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
        }
        true
    }

    /// Returns the matching expenses in their original order.
    #[must_use]
    pub fn apply(&self, expenses: &[Expense]) -> Vec<Expense> {
        expenses
            .iter()
            .filter(|e| self.matches(e))
            .cloned()
            .collect()
    }
}

/// Field to sort expense lists by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    /// Title, case-insensitive.
    Title,
    /// Amount.
    Amount,
    /// Creation timestamp.
    RequestDate,
    /// Status in lifecycle order.
    Status,
    /// Category label.
    Category,
    /// Department, case-insensitive.
    Department,
    /// Priority, low to urgent.
    Priority,
    /// Last decision timestamp.
    DecisionDate,
}

impl SortField {
    /// Parses a field name as used in list URLs (`requestDate`, `amount`, ...).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['_', '-'], "").as_str() {
            "title" => Some(Self::Title),
            "amount" => Some(Self::Amount),
            "requestdate" | "date" => Some(Self::RequestDate),
            "status" => Some(Self::Status),
            "category" => Some(Self::Category),
            "department" => Some(Self::Department),
            "priority" => Some(Self::Priority),
            "decisiondate" => Some(Self::DecisionDate),
            _ => None,
        }
    }

    fn compare(self, a: &Expense, b: &Expense) -> Ordering {
        match self {
            Self::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            Self::Amount => a.amount.cmp(&b.amount),
            Self::RequestDate => a.request_date.cmp(&b.request_date),
            Self::Status => a.status.cmp(&b.status),
            Self::Category => a.category.label().cmp(b.category.label()),
            Self::Department => a
                .department
                .to_lowercase()
                .cmp(&b.department.to_lowercase()),
            // None < Some, so missing values come first ascending
            Self::Priority => a.priority.cmp(&b.priority),
            Self::DecisionDate => a.decision_date.cmp(&b.decision_date),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl SortDirection {
    /// Parses `asc` / `desc`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Sort order for expense lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Field to compare.
    pub field: SortField,
    /// Direction.
    pub direction: SortDirection,
}

impl SortSpec {
    /// Creates a sort spec.
    #[must_use]
    pub const fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Sorts in place. Equal elements keep their relative order in both
    /// directions.
    pub fn sort(&self, expenses: &mut [Expense]) {
        expenses.sort_by(|a, b| {
            let ordering = self.field.compare(a, b);
            match self.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }
}

impl Default for SortSpec {
    /// Newest first, as the expenses page opens.
    fn default() -> Self {
        Self::new(SortField::RequestDate, SortDirection::Desc)
    }
}

/// Filter, then sort, then paginate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseQuery {
    /// Row filter.
    pub filter: ExpenseFilter,
    /// Sort order; `None` keeps the source order.
    pub sort: Option<SortSpec>,
    /// Page to return.
    pub page: PageRequest,
}

impl ExpenseQuery {
    /// Runs the pipeline over `expenses`.
    #[must_use]
    pub fn run(&self, expenses: &[Expense]) -> PageResponse<Expense> {
        let mut rows = self.filter.apply(expenses);
        if let Some(sort) = &self.sort {
            sort.sort(&mut rows);
        }
        self.page.paginate(&rows)
    }
}
