//! Command handlers.

use tracing::{info, warn};
use tyredesk_client::{ExpenseDesk, HttpExpenseGateway};
use tyredesk_core::access::{AccessStore, OperatorAccessStore, Permission, UserAccount};
use tyredesk_core::expense::{
    Expense, ExpenseFilter, ExpenseQuery, ExpenseStatus, ExpenseWorkflow, SortSpec, SystemClock,
    WorkflowPolicy,
};
use tyredesk_shared::{AppConfig, AppResult};
use tyredesk_shared::types::{ExpenseId, Money, PageRequest, format_amount};

use crate::cli::{Commands, RolesCommands};

type Desk = ExpenseDesk<HttpExpenseGateway, SystemClock>;

pub async fn run(command: Commands, config: &AppConfig) -> AppResult<()> {
    match command {
        Commands::List {
            status,
            category,
            department,
            search,
            sort,
            direction,
            page,
            per_page,
        } => {
            let filter = ExpenseFilter {
                search,
                status,
                category,
                department,
                priority: None,
            };
            let mut desk = open_desk(config)?;
            desk.refresh(&filter).await?;

            let query = ExpenseQuery {
                filter,
                sort: Some(sort.map_or_else(SortSpec::default, |field| SortSpec::new(field, direction))),
                page: PageRequest::new(page, per_page),
            };
            let result = desk.query(&query);
            for expense in &result.data {
                println!("{}", row(expense));
            }
            println!(
                "page {}/{} ({} expenses)",
                result.meta.page, result.meta.total_pages, result.meta.total
            );
        }
        Commands::Summary => {
            let mut desk = open_desk(config)?;
            desk.refresh(&ExpenseFilter::new()).await?;
            let summary = desk.summary();
            let symbol = desk
                .expenses()
                .first()
                .map_or("₦", |e| e.currency.as_str());

            println!("Total expenses: {}", summary.total_expenses);
            println!("Pending:        {}", summary.pending_expenses);
            println!("Approved:       {}", summary.approved_expenses);
            println!("Rejected:       {}", summary.rejected_expenses);
            println!("Paid:           {}", summary.paid_expenses);
            println!("Total amount:   {}", Money::new(summary.total_amount, symbol));
            for (category, amount) in &summary.amount_by_category {
                println!("  {:<16} {}", category.label(), format_amount(*amount, symbol));
            }
        }
        Commands::Approve { id, by } => {
            let mut desk = loaded_desk(config).await?;
            let expense = desk.approve(&ExpenseId::from(id), &by).await?;
            println!("{}", row(expense));
        }
        Commands::Reject { id, reason } => {
            let mut desk = loaded_desk(config).await?;
            let expense = desk.reject(&ExpenseId::from(id), &reason).await?;
            println!("{}", row(expense));
        }
        Commands::Toggle { id, decision } => {
            let mut desk = loaded_desk(config).await?;
            let expense = desk.toggle(&ExpenseId::from(id), decision).await?;
            println!("{}", row(expense));
        }
        Commands::Pay { id } => {
            let mut desk = loaded_desk(config).await?;
            let expense = desk.mark_paid(&ExpenseId::from(id)).await?;
            println!("{}", row(expense));
        }
        Commands::Roles { command } => run_roles(command, config).await?,
    }
    Ok(())
}

fn open_desk(config: &AppConfig) -> AppResult<Desk> {
    let gateway = HttpExpenseGateway::from_config(&config.api)?;
    let workflow = ExpenseWorkflow::new(WorkflowPolicy::from(&config.workflow), SystemClock);
    Ok(ExpenseDesk::new(gateway, workflow))
}

async fn loaded_desk(config: &AppConfig) -> AppResult<Desk> {
    let mut desk = open_desk(config)?;
    if let Err(err) = desk.refresh(&ExpenseFilter::new()).await {
        warn!(error = %err, "failed to load expenses");
        return Err(err.into());
    }
    Ok(desk)
}

fn row(expense: &Expense) -> String {
    let mut line = format!(
        "{:<38} {:<9} {:>16}  {}  ({})",
        expense.id,
        expense.status.label(),
        format_amount(expense.amount, &expense.currency),
        expense.title,
        expense.requested_by.name,
    );
    if let Some(approver) = expense.effective_approver() {
        line.push_str(&format!(" approved by {approver}"));
    }
    if expense.status == ExpenseStatus::Rejected
        && let Some(reason) = expense.rejection_reason()
    {
        line.push_str(&format!(" reason: {reason}"));
    }
    line
}

async fn run_roles(command: RolesCommands, config: &AppConfig) -> AppResult<()> {
    let store = OperatorAccessStore::from_config(&config.storage)?;
    let mut state = store.load().await?;

    match command {
        RolesCommands::List => {
            for role in &state.roles {
                let keys: Vec<&str> = role.permissions.iter().map(Permission::key).collect();
                println!("{} ({}): {}", role.name, role.description, keys.join(", "));
            }
            for user in &state.users {
                let roles: Vec<&str> = user.roles.iter().map(String::as_str).collect();
                let active = if user.is_active { "active" } else { "inactive" };
                println!("{} <{}> [{}] {active}", user.name, user.email, roles.join(", "));
            }
            return Ok(());
        }
        RolesCommands::Check { email, permission } => {
            let permission = Permission::parse(&permission)?;
            let allowed = state.is_allowed(&email, permission);
            println!("{email} {} {permission}", if allowed { "has" } else { "lacks" });
            return Ok(());
        }
        RolesCommands::Grant { role, permission } => {
            let permission = Permission::parse(&permission)?;
            let changed = state.grant(&role, permission)?;
            info!(%role, %permission, changed, "permission granted");
        }
        RolesCommands::Revoke { role, permission } => {
            let permission = Permission::parse(&permission)?;
            let changed = state.revoke(&role, permission)?;
            info!(%role, %permission, changed, "permission revoked");
        }
        RolesCommands::AddUser { email, name, role } => {
            state.add_user(UserAccount::new(email.clone(), name))?;
            if let Some(role) = role {
                state.assign_role(&email, &role)?;
            }
            info!(%email, "user added");
        }
        RolesCommands::Assign { email, role } => {
            state.assign_role(&email, &role)?;
            info!(%email, %role, "role assigned");
        }
        RolesCommands::SetActive { email, active } => {
            state.set_user_active(&email, active)?;
            info!(%email, active, "user activation changed");
        }
    }

    store.save(&state).await?;
    Ok(())
}
