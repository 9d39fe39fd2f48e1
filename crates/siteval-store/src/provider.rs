//! Option store manager that dispatches to the configured backend.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use siteval_core::config::StoreConfig;
use siteval_core::error::AppError;
use siteval_core::result::AppResult;
use siteval_core::traits::option_store::OptionStore;

use crate::file::FileOptionStore;
use crate::memory::MemoryOptionStore;

/// Option store manager that wraps the configured backend.
#[derive(Debug, Clone)]
pub struct OptionStoreManager {
    /// The inner store.
    inner: Arc<dyn OptionStore>,
}

impl OptionStoreManager {
    /// Create a new store manager from configuration.
    pub async fn new(config: &StoreConfig) -> AppResult<Self> {
        let inner: Arc<dyn OptionStore> = match config.provider.as_str() {
            "memory" => {
                info!("Initializing in-memory option store");
                Arc::new(MemoryOptionStore::new())
            }
            "file" => {
                info!(path = %config.path, "Initializing file option store");
                Arc::new(FileOptionStore::new(&config.path).await?)
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown option store provider: '{other}'. Supported: memory, file"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a store manager from an existing store (for testing).
    pub fn from_store(store: Arc<dyn OptionStore>) -> Self {
        Self { inner: store }
    }
}

#[async_trait]
impl OptionStore for OptionStoreManager {
    async fn get(&self, key: &str) -> AppResult<Option<Value>> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: Value) -> AppResult<()> {
        self.inner.put(key, value).await
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        self.inner.delete(key).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
