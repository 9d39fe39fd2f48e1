//! In-memory option store using the dashmap crate.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use tracing::debug;

use siteval_core::result::AppResult;
use siteval_core::traits::option_store::OptionStore;

/// In-memory option store. Cloning shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryOptionStore {
    options: Arc<DashMap<String, Value>>,
}

impl MemoryOptionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Whether no option is stored.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

#[async_trait]
impl OptionStore for MemoryOptionStore {
    async fn get(&self, key: &str) -> AppResult<Option<Value>> {
        Ok(self.options.get(key).map(|entry| entry.value().clone()))
    }

    async fn put(&self, key: &str, value: Value) -> AppResult<()> {
        self.options.insert(key.to_string(), value);
        debug!(key, "Stored option");
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        Ok(self.options.remove(key).is_some())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
