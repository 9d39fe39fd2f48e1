//! Unschedules every known background event on deactivation.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use tracing;

use siteval_core::result::AppResult;

use crate::scheduler::EventScheduler;

/// Remembers registered event names and unschedules all of them when the
/// worker is deactivated.
#[derive(Debug, Clone)]
pub struct BackgroundTaskDeactivator {
    /// Scheduler holding the events
    scheduler: Arc<dyn EventScheduler>,
    /// Tracked event names
    events: Arc<Mutex<BTreeSet<String>>>,
}

impl BackgroundTaskDeactivator {
    /// Create a deactivator tracking nothing yet
    pub fn new(scheduler: Arc<dyn EventScheduler>) -> Self {
        Self {
            scheduler,
            events: Arc::new(Mutex::new(BTreeSet::new())),
        }
    }

    /// Track `event_name` for deactivation
    pub fn track(&self, event_name: impl Into<String>) {
        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        events.insert(event_name.into());
    }

    /// Tracked event names, sorted
    pub fn tracked(&self) -> Vec<String> {
        let events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        events.iter().cloned().collect()
    }

    /// Unschedule every occurrence of every tracked event. Returns how many
    /// occurrences were removed.
    pub async fn deactivate(&self) -> AppResult<usize> {
        let mut removed = 0;
        for event_name in self.tracked() {
            removed += self.scheduler.unschedule_all(&event_name).await?;
        }

        tracing::info!("Deactivated background tasks, {} occurrence(s) removed", removed);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TaskRegistry;
    use crate::scheduler::CronScheduler;
    use crate::task::Recurrence;
    use serde_json::json;
    use siteval_core::types::Interval;
    use std::time::Duration;

    #[tokio::test]
    async fn test_deactivate_unschedules_tracked_events() {
        let scheduler = Arc::new(
            CronScheduler::new(Arc::new(TaskRegistry::new()), Duration::from_secs(60))
                .await
                .unwrap(),
        );
        let every = Recurrence::Every(Interval::EveryTenMinutes);
        scheduler.schedule("recurring", every, vec![]).await.unwrap();
        scheduler.schedule("single", Recurrence::Once, vec![json!(1)]).await.unwrap();
        scheduler.schedule("single", Recurrence::Once, vec![json!(2)]).await.unwrap();
        scheduler.schedule("untracked", Recurrence::Once, vec![]).await.unwrap();

        let deactivator = BackgroundTaskDeactivator::new(scheduler.clone());
        deactivator.track("recurring");
        deactivator.track("single");
        deactivator.track("single");
        assert_eq!(deactivator.tracked(), vec!["recurring", "single"]);

        assert_eq!(deactivator.deactivate().await.unwrap(), 3);
        assert!(!scheduler.is_scheduled("recurring"));
        assert!(!scheduler.is_scheduled("single"));
        assert!(scheduler.is_scheduled("untracked"));

        assert_eq!(deactivator.deactivate().await.unwrap(), 0);
    }
}
