//! Persisted URL validation queue.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::{Mutex, MutexGuard};
use tracing;

use siteval_core::result::AppResult;
use siteval_core::traits::option_store::OptionStore;
use siteval_core::types::QueueEntry;
use siteval_store::keys::URL_VALIDATION_QUEUE;

/// Raw queue contents: hash → stored entry, in ascending hash order.
pub type QueueMap = Map<String, Value>;

/// The URL validation queue stored under a single option key.
///
/// Entries are kept as raw JSON so entries that do not parse survive a
/// read-modify-write cycle untouched. Clones share one mutation lock;
/// holders of [`ValidationQueue::lock`] get exclusive read-modify-write
/// access within this process.
#[derive(Debug, Clone)]
pub struct ValidationQueue {
    /// Option store holding the queue
    store: Arc<dyn OptionStore>,
    /// Serializes read-modify-write cycles
    mutation: Arc<Mutex<()>>,
}

/// One row of the queue as shown to operators.
#[derive(Debug, Clone, Serialize)]
pub struct QueueRow {
    /// Entry hash
    pub hash: String,
    /// Parsed entry, `None` when malformed
    pub entry: Option<QueueEntry>,
    /// Stored value as-is
    pub raw: Value,
}

impl ValidationQueue {
    /// Create a queue on top of `store`
    pub fn new(store: Arc<dyn OptionStore>) -> Self {
        Self {
            store,
            mutation: Arc::new(Mutex::new(())),
        }
    }

    /// Take the mutation lock for a read-modify-write cycle
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.mutation.lock().await
    }

    /// Load the queue. Absent or non-mapping values read as empty.
    pub async fn load(&self) -> AppResult<QueueMap> {
        match self.store.get(URL_VALIDATION_QUEUE).await? {
            Some(Value::Object(map)) => Ok(map),
            Some(other) => {
                tracing::warn!(
                    "Validation queue holds a non-mapping value ({}), treating as empty",
                    value_kind(&other)
                );
                Ok(QueueMap::new())
            }
            None => Ok(QueueMap::new()),
        }
    }

    /// Replace the stored queue with `queue`
    pub async fn save(&self, queue: QueueMap) -> AppResult<()> {
        self.store.put(URL_VALIDATION_QUEUE, Value::Object(queue)).await
    }

    /// Add `entry` under its hash. Returns `false` if it was already queued.
    pub async fn enqueue(&self, entry: &QueueEntry) -> AppResult<bool> {
        let _guard = self.lock().await;
        let mut queue = self.load().await?;
        let hash = entry.hash();
        if queue.contains_key(&hash) {
            return Ok(false);
        }
        queue.insert(hash.clone(), entry.to_value());
        self.save(queue).await?;
        tracing::debug!("Queued '{}' ({}) as {}", entry.url, entry.content_type, hash);
        Ok(true)
    }

    /// Remove the entry stored under `hash`. Returns `false` if absent.
    pub async fn remove(&self, hash: &str) -> AppResult<bool> {
        let _guard = self.lock().await;
        let mut queue = self.load().await?;
        if queue.remove(hash).is_none() {
            return Ok(false);
        }
        self.save(queue).await?;
        Ok(true)
    }

    /// Drop every entry. Returns how many were removed.
    pub async fn clear(&self) -> AppResult<usize> {
        let _guard = self.lock().await;
        let count = self.load().await?.len();
        self.save(QueueMap::new()).await?;
        Ok(count)
    }

    /// All entries, parsed where possible
    pub async fn rows(&self) -> AppResult<Vec<QueueRow>> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .map(|(hash, raw)| QueueRow {
                hash,
                entry: QueueEntry::from_value(&raw),
                raw,
            })
            .collect())
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
