//! Command line definitions.

use clap::{Parser, Subcommand};
use tyredesk_core::expense::{Decision, ExpenseCategory, ExpenseStatus, SortDirection, SortField};

#[derive(Debug, Parser)]
#[command(name = "tyredesk", about = "Expense approvals for the tyre business back office.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List expenses.
    List {
        /// Only this status (pending, approved, rejected, paid)
        #[arg(long, value_parser = parse_status)]
        status: Option<ExpenseStatus>,
        /// Only this category code (e.g. TYRE_STOCK)
        #[arg(long, value_parser = parse_category)]
        category: Option<ExpenseCategory>,
        /// Only this department
        #[arg(long)]
        department: Option<String>,
        /// Case-insensitive text search
        #[arg(long)]
        search: Option<String>,
        /// Sort field (title, amount, requestDate, status, ...)
        #[arg(long, value_parser = parse_sort_field)]
        sort: Option<SortField>,
        /// Sort direction
        #[arg(long, value_parser = parse_direction, default_value = "asc")]
        direction: SortDirection,
        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: u32,
        /// Rows per page
        #[arg(long = "per-page", default_value = "10")]
        per_page: u32,
    },
    /// Show summary counts and totals.
    Summary,
    /// Approve an expense.
    Approve {
        /// Expense id
        id: String,
        /// Approver name
        #[arg(long)]
        by: String,
    },
    /// Reject an expense.
    Reject {
        /// Expense id
        id: String,
        /// Why it is rejected
        #[arg(long)]
        reason: String,
    },
    /// Reverse the last decision within the toggle window.
    Toggle {
        /// Expense id
        id: String,
        /// New decision: approved or rejected
        #[arg(value_parser = parse_decision)]
        decision: Decision,
    },
    /// Mark an approved expense as paid.
    Pay {
        /// Expense id
        id: String,
    },
    /// Manage roles and permissions.
    Roles {
        #[command(subcommand)]
        command: RolesCommands,
    },
}

#[derive(Debug, Subcommand)]
pub enum RolesCommands {
    /// Show roles, their permissions and users.
    List,
    /// Grant a permission to a role.
    Grant {
        /// Role name
        role: String,
        /// Permission key (e.g. approvals:approve)
        permission: String,
    },
    /// Revoke a permission from a role.
    Revoke {
        /// Role name
        role: String,
        /// Permission key (e.g. approvals:approve)
        permission: String,
    },
    /// Add a user account.
    AddUser {
        /// Login email
        email: String,
        /// Display name
        name: String,
        /// Role to assign
        #[arg(long)]
        role: Option<String>,
    },
    /// Assign a role to a user.
    Assign {
        /// Login email
        email: String,
        /// Role name
        role: String,
    },
    /// Activate or deactivate a user.
    SetActive {
        /// Login email
        email: String,
        /// true or false
        #[arg(action = clap::ArgAction::Set)]
        active: bool,
    },
    /// Check whether a user holds a permission.
    Check {
        /// Login email
        email: String,
        /// Permission key
        permission: String,
    },
}

fn parse_status(s: &str) -> Result<ExpenseStatus, String> {
    ExpenseStatus::parse(s).ok_or_else(|| format!("unknown status '{s}'"))
}

fn parse_category(s: &str) -> Result<ExpenseCategory, String> {
    ExpenseCategory::parse(s).ok_or_else(|| format!("unknown category '{s}'"))
}

fn parse_sort_field(s: &str) -> Result<SortField, String> {
    SortField::parse(s).ok_or_else(|| format!("unknown sort field '{s}'"))
}

fn parse_direction(s: &str) -> Result<SortDirection, String> {
    SortDirection::parse(s).ok_or_else(|| format!("expected asc or desc, got '{s}'"))
}

fn parse_decision(s: &str) -> Result<Decision, String> {
    Decision::parse(s).ok_or_else(|| format!("expected approved or rejected, got '{s}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_defaults() {
        let cli = Cli::try_parse_from(["tyredesk", "list", "--status", "pending"]).unwrap();
        match cli.command {
            Commands::List {
                status,
                direction,
                page,
                per_page,
                ..
            } => {
                assert_eq!(status, Some(ExpenseStatus::Pending));
                assert_eq!(direction, SortDirection::Asc);
                assert_eq!(page, 1);
                assert_eq!(per_page, 10);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_toggle() {
        let cli = Cli::try_parse_from(["tyredesk", "toggle", "exp-1", "Approved"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Toggle { decision: Decision::Approved, .. }
        ));
        assert!(Cli::try_parse_from(["tyredesk", "toggle", "exp-1", "paid"]).is_err());
    }

    #[test]
    fn test_reject_requires_reason_flag() {
        assert!(Cli::try_parse_from(["tyredesk", "reject", "exp-1"]).is_err());
        let cli =
            Cli::try_parse_from(["tyredesk", "reject", "exp-1", "--reason", "duplicate"]).unwrap();
        assert!(matches!(cli.command, Commands::Reject { reason, .. } if reason == "duplicate"));
    }

    #[test]
    fn test_parse_roles_grant() {
        let cli = Cli::try_parse_from([
            "tyredesk",
            "roles",
            "grant",
            "Staff",
            "reports:read",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Roles { command: RolesCommands::Grant { ref role, .. } } if role == "Staff"
        ));
    }
}
