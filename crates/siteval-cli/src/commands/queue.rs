//! Validation queue CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use siteval_core::error::AppError;
use siteval_core::types::QueueEntry;
use siteval_worker::queue::QueueRow;

/// Arguments for queue commands
#[derive(Debug, Args)]
pub struct QueueArgs {
    /// Queue subcommand
    #[command(subcommand)]
    pub command: QueueCommand,
}

/// Queue subcommands
#[derive(Debug, Subcommand)]
pub enum QueueCommand {
    /// List queued entries
    List,
    /// Queue a URL for validation
    Add {
        /// URL to validate
        url: String,
        /// Content type of the URL
        #[arg(short = 't', long = "type", default_value = "post")]
        content_type: String,
    },
    /// Remove an entry by hash
    Remove {
        /// Entry hash
        hash: String,
    },
    /// Remove every entry
    Clear,
}

/// Queue entry as displayed
#[derive(Debug, Serialize, Tabled)]
struct QueueEntryView {
    #[tabled(rename = "Hash")]
    hash: String,
    #[tabled(rename = "Type")]
    content_type: String,
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<QueueRow> for QueueEntryView {
    fn from(row: QueueRow) -> Self {
        match row.entry {
            Some(entry) => Self {
                hash: row.hash,
                content_type: entry.content_type,
                url: entry.url,
                status: "queued".to_string(),
            },
            None => Self {
                hash: row.hash,
                content_type: "-".to_string(),
                url: row.raw.to_string(),
                status: "malformed".to_string(),
            },
        }
    }
}

/// Execute queue commands
pub async fn execute(
    args: &QueueArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let queue = super::open_queue(&config).await?;

    match &args.command {
        QueueCommand::List => {
            let rows: Vec<QueueEntryView> =
                queue.rows().await?.into_iter().map(QueueEntryView::from).collect();
            output::print_list(&rows, format);
        }
        QueueCommand::Add { url, content_type } => {
            if url.trim().is_empty() || content_type.trim().is_empty() {
                return Err(AppError::validation("URL and type must not be empty"));
            }

            let entry = QueueEntry::new(url.trim(), content_type.trim());
            if queue.enqueue(&entry).await? {
                output::print_success(&format!("Queued '{}' ({})", entry.url, entry.hash()));
            } else {
                output::print_warning(&format!("'{}' is already queued", entry.url));
            }
        }
        QueueCommand::Remove { hash } => {
            if queue.remove(hash).await? {
                output::print_success(&format!("Removed entry '{}'", hash));
            } else {
                return Err(AppError::not_found(format!("No queue entry '{}'", hash)));
            }
        }
        QueueCommand::Clear => {
            let removed = queue.clear().await?;
            output::print_success(&format!("Removed {} queue entries", removed));
        }
    }

    Ok(())
}
