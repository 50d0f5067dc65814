//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Remote expense API configuration.
    #[serde(default)]
    pub api: ApiConfig,
    /// Expense decision workflow configuration.
    #[serde(default)]
    pub workflow: WorkflowConfig,
    /// Access state storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Remote expense API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the REST API, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token sent with every request.
    #[serde(default)]
    pub token: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080/api/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Expense decision workflow configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowConfig {
    /// How long after a decision it may still be toggled, in seconds.
    #[serde(default = "default_toggle_window_secs")]
    pub toggle_window_secs: u64,
    /// Actor recorded as approver when an administrator toggles to approved.
    #[serde(default = "default_admin_label")]
    pub admin_label: String,
    /// Reason recorded when toggling to rejected and no reason exists yet.
    #[serde(default = "default_rejection_reason")]
    pub default_rejection_reason: String,
}

fn default_toggle_window_secs() -> u64 {
    3600 // 1 hour
}

fn default_admin_label() -> String {
    "Admin".to_string()
}

fn default_rejection_reason() -> String {
    "Rejected by admin".to_string()
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            toggle_window_secs: default_toggle_window_secs(),
            admin_label: default_admin_label(),
            default_rejection_reason: default_rejection_reason(),
        }
    }
}

/// Access state storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory for persisted state.
    #[serde(default = "default_storage_root")]
    pub root: PathBuf,
    /// Key of the access state document under the root.
    #[serde(default = "default_access_key")]
    pub access_key: String,
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("./data")
}

fn default_access_key() -> String {
    "access.json".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
            access_key: default_access_key(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("TYREDESK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
