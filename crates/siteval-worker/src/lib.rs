//! Background URL validation for SiteVal.
//!
//! This crate provides:
//! - The [`BackgroundTask`] capability and a registry of tasks by event name
//! - A cron scheduler firing task events, single-flight per event name
//! - An action dispatcher turning fired hooks into scheduled events
//! - The recurring queue drainer and the single-shot `save_post` task
//! - An HTTP validation provider and config-backed access checks
//! - An inbox of actions recorded by other processes, polled by the runner

pub mod access;
pub mod actions;
pub mod deactivator;
pub mod inbox;
pub mod jobs;
pub mod provider;
pub mod queue;
pub mod registry;
pub mod runner;
pub mod scheduler;
pub mod task;

#[cfg(test)]
mod testing;

pub use actions::ActionDispatcher;
pub use deactivator::BackgroundTaskDeactivator;
pub use inbox::{ActionInbox, PendingAction};
pub use queue::ValidationQueue;
pub use registry::TaskRegistry;
pub use runner::{Collaborators, WorkerRunner};
pub use scheduler::{CronScheduler, EventScheduler};
pub use task::{ActionContext, BackgroundTask, Recurrence};
