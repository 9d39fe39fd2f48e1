//! CLI command definitions and dispatch.

pub mod config;
pub mod drain;
pub mod queue;
pub mod save;
pub mod validate;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use siteval_core::config::AppConfig;
use siteval_core::error::AppError;
use siteval_store::OptionStoreManager;
use siteval_worker::{Collaborators, ValidationQueue, WorkerRunner};

/// SiteVal: background URL validation
#[derive(Debug, Parser)]
#[command(name = "siteval", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Inspect and edit the URL validation queue
    Queue(queue::QueueArgs),
    /// Run one batch of the recurring URL validation now
    Drain(drain::DrainArgs),
    /// Record that a content item was saved; a running server schedules its validation
    Save(save::SaveArgs),
    /// Fire the save_post action for a content item and validate it inline
    Validate(validate::ValidateArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Queue(args) => queue::execute(args, &self.config, self.format).await,
            Commands::Drain(args) => drain::execute(args, &self.config, self.format).await,
            Commands::Save(args) => save::execute(args, &self.config).await,
            Commands::Validate(args) => validate::execute(args, &self.config).await,
            Commands::Config(args) => config::execute(args, &self.config, self.format).await,
        }
    }
}

/// Helper: load configuration from file, honoring `SITEVAL_ENV`
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    let env = std::env::var("SITEVAL_ENV").ok();
    AppConfig::load(config_path, env.as_deref())
}

/// Helper: open the validation queue in the configured option store
pub async fn open_queue(config: &AppConfig) -> Result<ValidationQueue, AppError> {
    let store = OptionStoreManager::new(&config.store).await?;
    Ok(ValidationQueue::new(Arc::new(store)))
}

/// Helper: assemble the worker without starting its scheduler
pub async fn build_runner(config: &AppConfig) -> Result<WorkerRunner, AppError> {
    let deps = Collaborators::from_config(config).await?;
    WorkerRunner::build(config.worker.clone(), deps).await
}
