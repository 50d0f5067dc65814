//! HTTP gateway for the expense API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use tyredesk_core::expense::{CreateExpenseInput, Expense, ExpenseFilter, ExpensePatch};
use tyredesk_shared::ApiConfig;
use tyredesk_shared::types::ExpenseId;

use crate::error::{ClientError, ClientResult};
use crate::gateway::ExpenseGateway;

/// List responses come either bare or wrapped in `data`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody {
    Bare(Vec<Expense>),
    Wrapped { data: Vec<Expense> },
}

impl ListBody {
    fn into_inner(self) -> Vec<Expense> {
        match self {
            Self::Bare(data) | Self::Wrapped { data } => data,
        }
    }
}

/// Expense API client over HTTP with JSON bodies.
#[derive(Debug, Clone)]
pub struct HttpExpenseGateway {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpExpenseGateway {
    /// Creates a client with a 30 second timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::with_timeout(base_url, 30)
    }

    /// Creates a client with a custom timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_timeout(base_url: impl Into<String>, timeout_secs: u64) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Creates a client from the `api` config section.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is blank or the HTTP client cannot be built.
    pub fn from_config(config: &ApiConfig) -> ClientResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(ClientError::Configuration("api.base_url is empty".to_string()));
        }
        let gateway = Self::with_timeout(config.base_url.trim(), config.timeout_secs)?;
        Ok(match config.token.as_deref().filter(|t| !t.trim().is_empty()) {
            Some(token) => gateway.with_token(token),
            None => gateway,
        })
    }

    /// Sends `token` as a bearer token on every request.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Returns the base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn read<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = error_body(status, response.text().await);
            Err(ClientError::api(status.as_u16(), body))
        }
    }
}

/// Body of an error response, empty when it could not be read.
fn error_body(status: StatusCode, body: reqwest::Result<String>) -> String {
    body.unwrap_or_else(|err| {
        debug!(status = status.as_u16(), error = %err, "failed to read error body");
        String::new()
    })
}

/// Builds the list query string. Empty criteria are left out.
fn list_params(filter: &ExpenseFilter) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(status) = filter.status {
        params.push(("status", status.as_wire().to_string()));
    }
    if let Some(category) = filter.category {
        params.push(("category", category.as_wire().to_string()));
    }
    if let Some(department) = filter.department.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        params.push(("department", department.to_string()));
    }
    if let Some(priority) = filter.priority {
        params.push(("priority", priority.label().to_uppercase()));
    }
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        params.push(("search", search.to_string()));
    }
    params
}

#[async_trait]
impl ExpenseGateway for HttpExpenseGateway {
    async fn create(&self, input: &CreateExpenseInput) -> ClientResult<Expense> {
        let request = self.client.post(self.url("/expenses")).json(input);
        let response = self.authorize(request).send().await?;
        Self::read(response).await
    }

    async fn list(&self, filter: &ExpenseFilter) -> ClientResult<Vec<Expense>> {
        let params = list_params(filter);
        debug!(?params, "listing expenses");
        let request = self.client.get(self.url("/expenses")).query(&params);
        let response = self.authorize(request).send().await?;
        Ok(Self::read::<ListBody>(response).await?.into_inner())
    }

    async fn update(&self, id: &ExpenseId, patch: &ExpensePatch) -> ClientResult<Expense> {
        let request = self
            .client
            .patch(self.url(&format!("/expenses/{id}")))
            .json(patch);
        let response = self.authorize(request).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(id.to_string()));
        }
        Self::read(response).await
    }
}
