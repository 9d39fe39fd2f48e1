//! Fake collaborators shared by the worker's unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use siteval_core::error::AppError;
use siteval_core::result::AppResult;
use siteval_core::traits::option_store::OptionStore;
use siteval_core::traits::validation::ValidationProvider;
use siteval_core::types::ValidationResult;

/// What the fake provider answers for a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Success,
    Empty,
    Error,
}

/// A provider call as recorded by [`RecordingProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub url: String,
    pub content_type: String,
    pub force: bool,
}

/// Provider that answers from a script and records every call.
#[derive(Debug)]
pub struct RecordingProvider {
    default: Answer,
    overrides: HashMap<String, Answer>,
    calls: Mutex<Vec<Call>>,
}

impl RecordingProvider {
    pub fn answering(default: Answer) -> Self {
        Self {
            default,
            overrides: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with(mut self, url: &str, answer: Answer) -> Self {
        self.overrides.insert(url.to_string(), answer);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ValidationProvider for RecordingProvider {
    async fn get_url_validation(
        &self,
        url: &str,
        content_type: &str,
        force: bool,
    ) -> AppResult<Option<ValidationResult>> {
        self.calls.lock().unwrap().push(Call {
            url: url.to_string(),
            content_type: content_type.to_string(),
            force,
        });

        match self.overrides.get(url).copied().unwrap_or(self.default) {
            Answer::Success => Ok(Some(ValidationResult {
                url: url.to_string(),
                content_type: content_type.to_string(),
                status_code: 200,
                body_bytes: 1,
                validated_at: Utc::now(),
                forced: force,
            })),
            Answer::Empty => Ok(None),
            Answer::Error => Err(AppError::external_service(format!("{url} is down"))),
        }
    }
}

/// Option store that counts writes.
#[derive(Debug, Default)]
pub struct CountingStore {
    pub inner: siteval_store::MemoryOptionStore,
    pub puts: std::sync::atomic::AtomicUsize,
}

#[async_trait]
impl OptionStore for CountingStore {
    async fn get(&self, key: &str) -> AppResult<Option<serde_json::Value>> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: serde_json::Value) -> AppResult<()> {
        self.puts.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.inner.put(key, value).await
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        self.inner.delete(key).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
