//! HTTP-backed URL validation provider.
//!
//! Fetches the URL and records status and document size. Successful
//! results are cached; forced validations bypass the cache and refresh it.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use moka::future::Cache;
use tracing;

use siteval_core::config::ValidationConfig;
use siteval_core::error::{AppError, ErrorKind};
use siteval_core::result::AppResult;
use siteval_core::traits::validation::ValidationProvider;
use siteval_core::types::ValidationResult;

/// Validation provider that fetches URLs over HTTP.
#[derive(Debug, Clone)]
pub struct HttpValidationProvider {
    /// HTTP client
    client: reqwest::Client,
    /// Recent results by `type:url`
    cache: Cache<String, ValidationResult>,
}

impl HttpValidationProvider {
    /// Create a provider from configuration
    pub fn new(config: &ValidationConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        let cache = Cache::builder()
            .max_capacity(config.cache_max_capacity)
            .time_to_live(Duration::from_secs(config.cache_ttl_seconds))
            .build();

        Ok(Self { client, cache })
    }

    fn cache_key(url: &str, content_type: &str) -> String {
        format!("{content_type}:{url}")
    }
}

#[async_trait]
impl ValidationProvider for HttpValidationProvider {
    async fn get_url_validation(
        &self,
        url: &str,
        content_type: &str,
        force: bool,
    ) -> AppResult<Option<ValidationResult>> {
        let key = Self::cache_key(url, content_type);

        if !force {
            if let Some(cached) = self.cache.get(&key).await {
                tracing::debug!("Using cached validation for '{}'", url);
                return Ok(Some(cached));
            }
        }

        let response = self.client.get(url).send().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("Failed to fetch '{url}'"),
                e,
            )
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external_service(format!(
                "'{url}' responded with {status}"
            )));
        }

        let body = response.bytes().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("Failed to read body of '{url}'"),
                e,
            )
        })?;

        if body.is_empty() {
            tracing::debug!("'{}' returned an empty document", url);
            return Ok(None);
        }

        let result = ValidationResult {
            url: url.to_string(),
            content_type: content_type.to_string(),
            status_code: status.as_u16(),
            body_bytes: body.len() as u64,
            validated_at: Utc::now(),
            forced: force,
        };

        self.cache.insert(key, result.clone()).await;
        Ok(Some(result))
    }
}
