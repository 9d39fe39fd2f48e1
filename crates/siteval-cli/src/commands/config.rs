//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use siteval_core::error::AppError;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Validate configuration file
    Validate,
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let config = super::load_config(config_path)?;
            output::print_item(&config, format);
        }
        ConfigCommand::Validate => match super::load_config(config_path) {
            Ok(config) => {
                output::print_success(&format!("Configuration '{}' is valid", config_path));
                output::print_kv("Worker enabled", &config.worker.enabled.to_string());
                output::print_kv("Interval", &config.worker.validation_interval.to_string());
                output::print_kv("Batch limit", &config.worker.batch_limit.to_string());
                output::print_kv(
                    "Option store",
                    &format!("{} ({})", config.store.provider, config.store.path),
                );
                output::print_kv("Content manifest", &config.content.manifest);
                output::print_kv("Supported types", &config.content.supported_types.join(", "));
                output::print_kv(
                    "Dev tools users",
                    &config.access.dev_tools_users.len().to_string(),
                );
            }
            Err(e) => {
                output::print_error(&format!("Configuration invalid: {}", e));
                return Err(e);
            }
        },
    }

    Ok(())
}
