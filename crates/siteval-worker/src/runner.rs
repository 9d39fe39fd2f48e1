//! Worker runner: assembles the background tasks and drives the scheduler
//! until a cancel signal is received.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing;

use siteval_core::config::{AppConfig, WorkerConfig};
use siteval_core::result::AppResult;
use siteval_core::traits::access::UserAccess;
use siteval_core::traits::content::{ContentStore, ContentSupport};
use siteval_core::traits::option_store::OptionStore;
use siteval_core::traits::validation::ValidationProvider;
use siteval_store::{FileContentStore, OptionStoreManager};

use crate::access::{DevToolsUserAccess, SupportedContentTypes};
use crate::actions::ActionDispatcher;
use crate::deactivator::BackgroundTaskDeactivator;
use crate::inbox::ActionInbox;
use crate::jobs::{SavePostValidationEvent, UrlValidationCron};
use crate::provider::HttpValidationProvider;
use crate::queue::ValidationQueue;
use crate::registry::TaskRegistry;
use crate::scheduler::CronScheduler;
use crate::task::{ActionContext, hooks};

/// External collaborators the background tasks run against.
#[derive(Debug, Clone)]
pub struct Collaborators {
    /// Option store holding the validation queue
    pub options: Arc<dyn OptionStore>,
    /// Validation provider
    pub provider: Arc<dyn ValidationProvider>,
    /// Content lookups
    pub content: Arc<dyn ContentStore>,
    /// Validation eligibility
    pub support: Arc<dyn ContentSupport>,
    /// Dev tools access
    pub access: Arc<dyn UserAccess>,
}

impl Collaborators {
    /// Build the configured stores, provider and access checks
    pub async fn from_config(config: &AppConfig) -> AppResult<Self> {
        let options = OptionStoreManager::new(&config.store).await?;
        let content = FileContentStore::load(&config.content.manifest).await?;
        tracing::info!(
            "Loaded {} content item(s) from '{}'",
            content.len(),
            config.content.manifest
        );

        Ok(Self {
            options: Arc::new(options),
            provider: Arc::new(HttpValidationProvider::new(&config.validation)?),
            content: Arc::new(content),
            support: Arc::new(SupportedContentTypes::from_config(&config.content)),
            access: Arc::new(DevToolsUserAccess::from_config(&config.access)),
        })
    }
}

/// Main worker runner owning the registry, scheduler and dispatcher
#[derive(Debug)]
pub struct WorkerRunner {
    /// Worker configuration
    config: WorkerConfig,
    /// Registered tasks
    registry: Arc<TaskRegistry>,
    /// Cron scheduler firing the tasks
    scheduler: Arc<CronScheduler>,
    /// Action hook dispatcher
    dispatcher: ActionDispatcher,
    /// Unschedules everything on shutdown
    deactivator: BackgroundTaskDeactivator,
    /// The persisted URL validation queue
    queue: ValidationQueue,
    /// Actions recorded by other processes
    inbox: ActionInbox,
}

impl WorkerRunner {
    /// Register the built-in tasks and wire them to a new scheduler
    pub async fn build(config: WorkerConfig, deps: Collaborators) -> AppResult<Self> {
        let inbox = ActionInbox::new(deps.options.clone());
        let queue = ValidationQueue::new(deps.options);

        let mut registry = TaskRegistry::new();
        registry.register(Arc::new(
            UrlValidationCron::new(queue.clone(), deps.provider.clone())
                .with_interval(config.validation_interval)
                .with_batch_limit(config.batch_limit),
        ))?;
        registry.register(Arc::new(SavePostValidationEvent::new(
            deps.provider,
            deps.content,
            deps.support,
            deps.access,
        )))?;
        let registry = Arc::new(registry);

        let scheduler = Arc::new(
            CronScheduler::new(
                registry.clone(),
                Duration::from_secs(config.single_event_delay_seconds),
            )
            .await?,
        );

        let dispatcher = ActionDispatcher::new(registry.clone(), scheduler.clone());
        let deactivator = BackgroundTaskDeactivator::new(scheduler.clone());
        for event_name in registry.event_names() {
            deactivator.track(event_name);
        }

        Ok(Self {
            config,
            registry,
            scheduler,
            dispatcher,
            deactivator,
            queue,
            inbox,
        })
    }

    /// Registered tasks
    pub fn registry(&self) -> &Arc<TaskRegistry> {
        &self.registry
    }

    /// The scheduler
    pub fn scheduler(&self) -> &Arc<CronScheduler> {
        &self.scheduler
    }

    /// Dispatcher for firing actions
    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }

    /// The URL validation queue
    pub fn queue(&self) -> &ValidationQueue {
        &self.queue
    }

    /// Inbox of actions recorded by other processes
    pub fn inbox(&self) -> &ActionInbox {
        &self.inbox
    }

    /// Fire every pending action recorded in the inbox, then acknowledge
    /// them. Actions whose dispatch failed stay pending. Returns how many
    /// events were scheduled.
    pub async fn dispatch_pending(&self) -> AppResult<usize> {
        let pending = self.inbox.pending().await?;
        if pending.is_empty() {
            return Ok(0);
        }

        let mut scheduled = 0;
        let mut handled = Vec::with_capacity(pending.len());
        for action in &pending {
            match self
                .dispatcher
                .do_action(&action.hook, &action.context(), &action.args)
                .await
            {
                Ok(count) => {
                    scheduled += count;
                    handled.push(action.id);
                }
                Err(e) => tracing::error!(
                    "Failed to dispatch action '{}' ({}): {}",
                    action.hook,
                    action.id,
                    e
                ),
            }
        }

        self.inbox.acknowledge(&handled).await?;
        tracing::info!(
            "Dispatched {} recorded action(s), {} event(s) scheduled",
            handled.len(),
            scheduled
        );
        Ok(scheduled)
    }

    /// Start the scheduler and run until the cancel signal is received
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) -> AppResult<()> {
        if !self.config.enabled {
            tracing::info!("Background worker disabled, nothing scheduled");
            wait_for_cancel(&mut cancel).await;
            return Ok(());
        }

        self.scheduler.start().await?;

        let scheduled = self
            .dispatcher
            .do_action(hooks::INIT, &ActionContext::system(), &[])
            .await?;
        tracing::info!(
            "Worker started with {} task(s), {} event(s) scheduled on '{}'",
            self.registry.len(),
            scheduled,
            hooks::INIT
        );

        let mut poll = time::interval(Duration::from_secs(self.config.action_poll_seconds));
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        tracing::info!("Worker received shutdown signal");
                        break;
                    }
                }
                _ = poll.tick() => {
                    if let Err(e) = self.dispatch_pending().await {
                        tracing::error!("Failed to read recorded actions: {}", e);
                    }
                }
            }
        }

        tracing::info!(
            "Deactivating with {} pending event(s)",
            self.scheduler.pending_events().len()
        );
        if let Err(e) = self.deactivator.deactivate().await {
            tracing::error!("Failed to deactivate background tasks: {}", e);
        }
        self.scheduler.shutdown().await?;

        tracing::info!("Worker shut down complete");
        Ok(())
    }
}

async fn wait_for_cancel(cancel: &mut watch::Receiver<bool>) {
    while !*cancel.borrow() {
        if cancel.changed().await.is_err() {
            break;
        }
    }
}
