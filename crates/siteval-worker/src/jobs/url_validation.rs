//! Recurring task draining the URL validation queue.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing;

use siteval_core::result::AppResult;
use siteval_core::traits::validation::ValidationProvider;
use siteval_core::types::{Interval, QueueEntry};

use crate::queue::ValidationQueue;
use crate::task::{BackgroundTask, Recurrence, hooks};

/// Validates a bounded batch of queued URLs on every firing, removing the
/// entries that validated successfully.
#[derive(Debug)]
pub struct UrlValidationCron {
    /// Queue to drain
    queue: ValidationQueue,
    /// Validation provider
    provider: Arc<dyn ValidationProvider>,
    /// Firing cadence
    interval: Interval,
    /// Entries visited per firing
    batch_limit: usize,
}

impl UrlValidationCron {
    /// The cron event name.
    pub const BACKGROUND_TASK_NAME: &'static str = "amp_validate_urls";

    /// Entries visited per firing unless configured otherwise.
    pub const DEFAULT_BATCH_LIMIT: usize = 5;

    /// Create the task with the default cadence and batch size
    pub fn new(queue: ValidationQueue, provider: Arc<dyn ValidationProvider>) -> Self {
        Self {
            queue,
            provider,
            interval: Interval::EveryTenMinutes,
            batch_limit: Self::DEFAULT_BATCH_LIMIT,
        }
    }

    /// Override the cadence
    pub fn with_interval(mut self, interval: Interval) -> Self {
        self.interval = interval;
        self
    }

    /// Override the batch size. At least one entry is visited per firing.
    pub fn with_batch_limit(mut self, batch_limit: usize) -> Self {
        self.batch_limit = batch_limit.max(1);
        self
    }

    /// Cadence of the recurring event
    pub fn interval(&self) -> Interval {
        self.interval
    }
}

#[async_trait]
impl BackgroundTask for UrlValidationCron {
    fn event_name(&self) -> &str {
        Self::BACKGROUND_TASK_NAME
    }

    fn action_hook(&self) -> &str {
        hooks::INIT
    }

    fn recurrence(&self) -> Recurrence {
        Recurrence::Every(self.interval)
    }

    async fn process(&self, _args: &[Value]) -> AppResult<()> {
        let _guard = self.queue.lock().await;
        let queue = self.queue.load().await?;

        if queue.is_empty() {
            tracing::debug!("Validation queue is empty");
            return Ok(());
        }

        let batch: Vec<(String, Value)> = queue
            .iter()
            .take(self.batch_limit)
            .map(|(hash, raw)| (hash.clone(), raw.clone()))
            .collect();

        let mut validated = Vec::new();
        for (hash, raw) in &batch {
            let Some(entry) = QueueEntry::from_value(raw) else {
                tracing::warn!("Skipping malformed validation queue entry '{}': {}", hash, raw);
                continue;
            };

            match self
                .provider
                .get_url_validation(&entry.url, &entry.content_type, false)
                .await
            {
                Ok(Some(_)) => validated.push(hash.clone()),
                Ok(None) => {
                    tracing::warn!("Validation of '{}' returned no result, keeping it queued", entry.url);
                }
                Err(e) => {
                    tracing::warn!("Validation of '{}' failed, keeping it queued: {}", entry.url, e);
                }
            }
        }

        // Other writers may have changed the queue while validating.
        let mut latest = self.queue.load().await?;
        for hash in &validated {
            latest.remove(hash);
        }

        tracing::info!(
            "Validation batch done: visited={}, validated={}, remaining={}",
            batch.len(),
            validated.len(),
            latest.len()
        );

        self.queue.save(latest).await
    }
}
