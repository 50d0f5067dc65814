//! Tyredesk operator CLI
//!
//! Loads expenses from the expense API, runs approval decisions through the
//! workflow and persists the results. Role management works on the local
//! access state file.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tyredesk_shared::{AppConfig, AppError, AppResult};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr so command output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tyredesk=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(
                code = err.error_code(),
                status = err.status_code(),
                recoverable = err.is_recoverable(),
                "{err}"
            );
            eprintln!("error [{}]: {err}", err.error_code());
            ExitCode::from(exit_status(&err))
        }
    }
}

async fn execute(cli: Cli) -> AppResult<()> {
    let config = AppConfig::load()?;
    commands::run(cli.command, &config).await
}

/// 1 when the operator can correct the input and retry, 2 otherwise.
fn exit_status(err: &AppError) -> u8 {
    if err.is_recoverable() { 1 } else { 2 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_status_separates_operator_errors() {
        assert_eq!(exit_status(&AppError::BusinessRule("window".into())), 1);
        assert_eq!(exit_status(&AppError::NotFound("exp-9".into())), 1);
        assert_eq!(exit_status(&AppError::Configuration("api.base_url".into())), 2);
        assert_eq!(exit_status(&AppError::Internal("poisoned".into())), 2);
    }

    #[test]
    fn test_workflow_refusal_reaches_cli_as_business_rule() {
        let err: AppError = tyredesk_client::ClientError::from(
            tyredesk_core::expense::ExpenseError::ToggleWindowExpired {
                window: "1 hour".into(),
            },
        )
        .into();
        assert_eq!(err.error_code(), "BUSINESS_RULE_VIOLATION");
        assert_eq!(exit_status(&err), 1);
    }
}
