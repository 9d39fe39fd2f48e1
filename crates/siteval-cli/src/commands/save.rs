//! Record a content save for the running server to validate.

use std::sync::Arc;

use clap::Args;

use crate::output;
use siteval_core::error::AppError;
use siteval_core::types::{ContentId, UserId};
use siteval_store::OptionStoreManager;
use siteval_worker::task::{ActionContext, hooks};
use siteval_worker::{ActionInbox, PendingAction};

/// Arguments for the save command
#[derive(Debug, Args)]
pub struct SaveArgs {
    /// Content item id
    pub content_id: ContentId,

    /// Acting user id (defaults to the system actor)
    #[arg(short, long)]
    pub user: Option<UserId>,
}

/// Execute the save command
pub async fn execute(args: &SaveArgs, config_path: &str) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let store = OptionStoreManager::new(&config.store).await?;
    let inbox = ActionInbox::new(Arc::new(store));

    let ctx = match args.user {
        Some(user) => ActionContext::user(user),
        None => ActionContext::system(),
    };
    let action = PendingAction::new(hooks::SAVE_POST, ctx, vec![args.content_id.to_value()]);
    inbox.push(&action).await?;

    output::print_success(&format!(
        "Recorded save of content {} ({}); the server picks it up within {}s",
        args.content_id, action.id, config.worker.action_poll_seconds
    ));
    Ok(())
}
