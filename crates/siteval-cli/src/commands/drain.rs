//! Run one recurring validation batch from the command line.

use clap::Args;
use serde::Serialize;

use crate::output::{self, OutputFormat};
use siteval_core::error::AppError;
use siteval_worker::jobs::UrlValidationCron;
use siteval_worker::task::BackgroundTask;

/// Arguments for the drain command
#[derive(Debug, Args)]
pub struct DrainArgs {}

/// Outcome of a drain run
#[derive(Debug, Serialize)]
struct DrainReport {
    before: usize,
    after: usize,
    validated: usize,
}

/// Execute the drain command
pub async fn execute(
    _args: &DrainArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let runner = super::build_runner(&config).await?;

    let task = runner
        .registry()
        .get(UrlValidationCron::BACKGROUND_TASK_NAME)
        .ok_or_else(|| AppError::internal("URL validation task is not registered"))?;

    let before = runner.queue().load().await?.len();
    task.process(&[]).await?;
    let after = runner.queue().load().await?.len();

    let report = DrainReport {
        before,
        after,
        validated: before.saturating_sub(after),
    };

    if format == OutputFormat::Table {
        output::print_success(&format!("Validated {} queued URL(s)", report.validated));
    }
    output::print_item(&report, format);

    Ok(())
}
