//! Validate one content item the way a save would.

use clap::Args;

use crate::output;
use siteval_core::error::AppError;
use siteval_core::types::{ContentId, UserId};
use siteval_worker::task::{ActionContext, hooks};

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Content item id
    pub content_id: ContentId,

    /// Acting user id (defaults to the system actor)
    #[arg(short, long)]
    pub user: Option<UserId>,
}

/// Execute the validate command
pub async fn execute(args: &ValidateArgs, config_path: &str) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let runner = super::build_runner(&config).await?;

    let ctx = match args.user {
        Some(user) => ActionContext::user(user),
        None => ActionContext::system(),
    };

    let ran = runner
        .dispatcher()
        .run_inline(hooks::SAVE_POST, &ctx, &[args.content_id.to_value()])
        .await?;

    if ran.is_empty() {
        output::print_warning(&format!(
            "Content {} is not eligible for background validation",
            args.content_id
        ));
    } else {
        output::print_success(&format!("Ran {} for content {}", ran.join(", "), args.content_id));
    }

    Ok(())
}
