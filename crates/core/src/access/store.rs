//! Persistence for access state using Apache OpenDAL.

use async_trait::async_trait;
use opendal::{ErrorKind, Operator, services};
use tyredesk_shared::StorageConfig;

use crate::access::error::AccessError;
use crate::access::types::AccessState;

/// Loads and saves the access state document.
#[async_trait]
pub trait AccessStore: Send + Sync {
    /// Loads the state. A store that has never been written yields the default roles.
    async fn load(&self) -> Result<AccessState, AccessError>;

    /// Replaces the stored state.
    async fn save(&self, state: &AccessState) -> Result<(), AccessError>;
}

/// Access store backed by an OpenDAL operator, one JSON document per key.
#[derive(Debug, Clone)]
pub struct OperatorAccessStore {
    operator: Operator,
    key: String,
}

impl OperatorAccessStore {
    /// Wraps an existing operator.
    #[must_use]
    pub fn new(operator: Operator, key: impl Into<String>) -> Self {
        Self {
            operator,
            key: key.into(),
        }
    }

    /// Stores the document under `key` inside a local directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not valid UTF-8 or the operator cannot be built.
    pub fn local_fs(root: &std::path::Path, key: impl Into<String>) -> Result<Self, AccessError> {
        let root = root
            .to_str()
            .ok_or_else(|| AccessError::Storage(format!("invalid path: {}", root.display())))?;
        let operator = Operator::new(services::Fs::default().root(root))?.finish();
        Ok(Self::new(operator, key))
    }

    /// Keeps the document in process memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the operator cannot be built.
    pub fn memory(key: impl Into<String>) -> Result<Self, AccessError> {
        let operator = Operator::new(services::Memory::default())?.finish();
        Ok(Self::new(operator, key))
    }

    /// Builds a filesystem store from the `storage` config section.
    ///
    /// # Errors
    ///
    /// Returns an error if the operator cannot be built.
    pub fn from_config(config: &StorageConfig) -> Result<Self, AccessError> {
        Self::local_fs(&config.root, config.access_key.clone())
    }

    /// Returns the key the document is stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl AccessStore for OperatorAccessStore {
    async fn load(&self) -> Result<AccessState, AccessError> {
        match self.operator.read(&self.key).await {
            Ok(buffer) => Ok(serde_json::from_slice(&buffer.to_vec())?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(AccessState::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, state: &AccessState) -> Result<(), AccessError> {
        let bytes = serde_json::to_vec_pretty(state)?;
        self.operator.write(&self.key, bytes).await?;
        Ok(())
    }
}
