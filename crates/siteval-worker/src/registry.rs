//! Registry of background tasks keyed by event name.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing;

use siteval_core::error::AppError;
use siteval_core::result::AppResult;

use crate::task::BackgroundTask;

/// Registered tasks by event name.
///
/// Built during initialization (mutable), shared behind an `Arc` afterwards.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: BTreeMap<String, Arc<dyn BackgroundTask>>,
}

impl TaskRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task. Event names must be unique.
    pub fn register(&mut self, task: Arc<dyn BackgroundTask>) -> AppResult<()> {
        let event_name = task.event_name().to_string();
        if self.tasks.contains_key(&event_name) {
            return Err(AppError::conflict(format!(
                "A background task is already registered for event '{event_name}'"
            )));
        }

        tracing::info!(
            "Registered background task '{}' on action '{}' ({:?})",
            event_name,
            task.action_hook(),
            task.recurrence()
        );
        self.tasks.insert(event_name, task);
        Ok(())
    }

    /// Look up a task by event name.
    pub fn get(&self, event_name: &str) -> Option<Arc<dyn BackgroundTask>> {
        self.tasks.get(event_name).cloned()
    }

    /// Tasks listening on `hook`, ordered by event name.
    pub fn listening_on(&self, hook: &str) -> Vec<Arc<dyn BackgroundTask>> {
        self.tasks
            .values()
            .filter(|task| task.action_hook() == hook)
            .cloned()
            .collect()
    }

    /// All registered event names.
    pub fn event_names(&self) -> Vec<String> {
        self.tasks.keys().cloned().collect()
    }

    /// Number of registered tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no task is registered.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
