//! Background task capability shared by recurring and single-shot tasks.

use async_trait::async_trait;
use serde_json::Value;

use siteval_core::result::AppResult;
use siteval_core::types::{Interval, UserId};

/// Names of the actions external event sources fire.
pub mod hooks {
    /// Fired once the worker is up. Recurring tasks listen on it.
    pub const INIT: &str = "init";
    /// Fired after a content item was saved, with the content id as the
    /// only argument.
    pub const SAVE_POST: &str = "save_post";
}

/// How often a scheduled event fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recurrence {
    /// Fires exactly once.
    Once,
    /// Fires on a fixed cadence until unscheduled.
    Every(Interval),
}

impl Recurrence {
    /// Whether this is a recurring cadence.
    pub fn is_recurring(&self) -> bool {
        matches!(self, Self::Every(_))
    }
}

/// Who fired an action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionContext {
    /// Acting user, `None` for system or anonymous actors.
    pub actor: Option<UserId>,
}

impl ActionContext {
    /// Action fired by the system itself.
    pub fn system() -> Self {
        Self { actor: None }
    }

    /// Action fired on behalf of `user`.
    pub fn user(user: UserId) -> Self {
        Self { actor: Some(user) }
    }
}

/// A unit of deferred work driven by the scheduler.
///
/// The task only describes itself and does the work. Deciding when it runs
/// belongs to the [`ActionDispatcher`](crate::actions::ActionDispatcher)
/// and the [`CronScheduler`](crate::scheduler::CronScheduler).
#[async_trait]
pub trait BackgroundTask: Send + Sync + std::fmt::Debug + 'static {
    /// Unique, stable name of the scheduled event.
    fn event_name(&self) -> &str;

    /// Action on which the task gets scheduled.
    fn action_hook(&self) -> &str;

    /// Cadence of the scheduled event.
    fn recurrence(&self) -> Recurrence;

    /// Eligibility predicate evaluated synchronously when the action fires,
    /// before anything is scheduled.
    async fn should_schedule_event(&self, _ctx: &ActionContext, _args: &[Value]) -> bool {
        true
    }

    /// Arguments a single event is scheduled with, given the action
    /// arguments. Occurrences with equal scheduled arguments are one event.
    fn scheduled_args(&self, args: &[Value]) -> Vec<Value> {
        args.to_vec()
    }

    /// Do the work. `args` are the arguments captured at scheduling time.
    ///
    /// Task-level failures are handled inside; an `Err` here means the task
    /// could not run at all and is only logged by the scheduler.
    async fn process(&self, args: &[Value]) -> AppResult<()>;
}
