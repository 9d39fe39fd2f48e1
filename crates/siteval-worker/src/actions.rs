//! Action hook dispatch: turns fired actions into scheduled events.

use std::sync::Arc;

use serde_json::Value;
use tracing;

use siteval_core::result::AppResult;

use crate::registry::TaskRegistry;
use crate::scheduler::EventScheduler;
use crate::task::{ActionContext, BackgroundTask};

/// Routes fired actions to the tasks listening on them.
#[derive(Debug, Clone)]
pub struct ActionDispatcher {
    /// Registered tasks
    registry: Arc<TaskRegistry>,
    /// Scheduler receiving deferred events
    scheduler: Arc<dyn EventScheduler>,
}

impl ActionDispatcher {
    /// Create a dispatcher
    pub fn new(registry: Arc<TaskRegistry>, scheduler: Arc<dyn EventScheduler>) -> Self {
        Self {
            registry,
            scheduler,
        }
    }

    /// Fire `hook`. Every listening task whose predicate holds gets its
    /// event scheduled. Returns how many new occurrences were scheduled.
    ///
    /// Recurring tasks are scheduled without arguments and only when not
    /// already scheduled. Single tasks receive their
    /// [`scheduled_args`](BackgroundTask::scheduled_args).
    pub async fn do_action(
        &self,
        hook: &str,
        ctx: &ActionContext,
        args: &[Value],
    ) -> AppResult<usize> {
        let mut scheduled = 0;

        for task in self.registry.listening_on(hook) {
            let recurrence = task.recurrence();

            if recurrence.is_recurring() && self.scheduler.is_scheduled(task.event_name()) {
                continue;
            }

            if !task.should_schedule_event(ctx, args).await {
                tracing::debug!(
                    "Action '{}' not eligible for event '{}'",
                    hook,
                    task.event_name()
                );
                continue;
            }

            let event_args = if recurrence.is_recurring() {
                Vec::new()
            } else {
                task.scheduled_args(args)
            };

            if self
                .scheduler
                .schedule(task.event_name(), recurrence, event_args)
                .await?
            {
                scheduled += 1;
            }
        }

        Ok(scheduled)
    }

    /// Fire `hook` and run every eligible task right away instead of
    /// scheduling it. Returns the event names that ran.
    pub async fn run_inline(
        &self,
        hook: &str,
        ctx: &ActionContext,
        args: &[Value],
    ) -> AppResult<Vec<String>> {
        let mut ran = Vec::new();

        for task in self.registry.listening_on(hook) {
            if !task.should_schedule_event(ctx, args).await {
                continue;
            }
            run_task(task.as_ref(), args).await?;
            ran.push(task.event_name().to_string());
        }

        Ok(ran)
    }
}

async fn run_task(task: &dyn BackgroundTask, args: &[Value]) -> AppResult<()> {
    tracing::info!("Running '{}' inline", task.event_name());
    task.process(args).await
}
