//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section; every section falls back to its defaults when absent.

pub mod access;
pub mod content;
pub mod logging;
pub mod store;
pub mod validation;
pub mod worker;

use serde::{Deserialize, Serialize};

pub use self::access::AccessConfig;
pub use self::content::ContentConfig;
pub use self::logging::LoggingConfig;
pub use self::store::StoreConfig;
pub use self::validation::ValidationConfig;
pub use self::worker::WorkerConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Background worker settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Option store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Content catalog settings.
    #[serde(default)]
    pub content: ContentConfig,
    /// Dev tools access settings.
    #[serde(default)]
    pub access: AccessConfig,
    /// Validation provider settings.
    #[serde(default)]
    pub validation: ValidationConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the base file with an optional environment overlay
    /// (`config/{env}.toml`) and environment variables prefixed with
    /// `SITEVAL__`. Missing files are not an error.
    pub fn load(path: &str, env: Option<&str>) -> Result<Self, AppError> {
        let mut builder =
            config::Config::builder().add_source(config::File::with_name(path).required(false));

        if let Some(env) = env {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{env}")).required(false));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("SITEVAL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the worker cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.worker.batch_limit == 0 {
            return Err(AppError::configuration("worker.batch_limit must be at least 1"));
        }
        if self.worker.action_poll_seconds == 0 {
            return Err(AppError::configuration(
                "worker.action_poll_seconds must be at least 1",
            ));
        }
        Ok(())
    }
}
