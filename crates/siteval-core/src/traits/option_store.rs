//! Key-value option store used for persisted worker state.

use async_trait::async_trait;
use serde_json::Value;

use crate::result::AppResult;

/// Trait for persisted option backends (in-memory, JSON file).
///
/// Each key holds one JSON document which is always replaced as a whole.
#[async_trait]
pub trait OptionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Get the value stored under `key`. Returns `None` if the key is absent.
    async fn get(&self, key: &str) -> AppResult<Option<Value>>;

    /// Replace the value stored under `key`.
    async fn put(&self, key: &str, value: Value) -> AppResult<()>;

    /// Remove `key`. Returns `true` if it existed.
    async fn delete(&self, key: &str) -> AppResult<bool>;

    /// Check that the backend is usable.
    async fn health_check(&self) -> AppResult<bool>;
}
