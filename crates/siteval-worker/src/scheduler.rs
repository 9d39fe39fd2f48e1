//! Cron scheduler for background task events.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;
use uuid::Uuid;

use siteval_core::error::AppError;
use siteval_core::result::AppResult;
use siteval_core::types::Interval;

use crate::registry::TaskRegistry;
use crate::task::Recurrence;

type FireFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Scheduling primitive the action dispatcher and deactivator depend on.
#[async_trait]
pub trait EventScheduler: Send + Sync + std::fmt::Debug + 'static {
    /// Schedule `event_name`. Returns `false` when an equivalent occurrence
    /// is already pending: any occurrence for recurring events, one with
    /// identical `args` for single events.
    async fn schedule(
        &self,
        event_name: &str,
        recurrence: Recurrence,
        args: Vec<Value>,
    ) -> AppResult<bool>;

    /// Whether any occurrence of `event_name` is pending.
    fn is_scheduled(&self, event_name: &str) -> bool;

    /// Drop every pending occurrence of `event_name`. Returns how many were
    /// removed.
    async fn unschedule_all(&self, event_name: &str) -> AppResult<usize>;

    /// Run the task behind `event_name` right now, bypassing the clock.
    async fn trigger(&self, event_name: &str, args: &[Value]);
}

/// A pending occurrence of a scheduled event.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduledEvent {
    /// Cron job backing the occurrence.
    pub job_id: Uuid,
    /// Event name.
    pub event_name: String,
    /// Arguments passed to `process` when it fires.
    pub args: Vec<Value>,
    /// Cadence, `None` for single events.
    pub interval: Option<Interval>,
    /// When the occurrence was scheduled.
    pub scheduled_at: DateTime<Utc>,
}

/// State shared between the scheduler handle and its cron callbacks.
#[derive(Debug)]
struct SchedulerState {
    registry: Arc<TaskRegistry>,
    pending: DashMap<String, Vec<ScheduledEvent>>,
    in_flight: DashMap<String, Arc<Mutex<()>>>,
}

impl SchedulerState {
    fn remove_pending(&self, event_name: &str, job_id: Uuid) {
        if let Some(mut events) = self.pending.get_mut(event_name) {
            events.retain(|event| event.job_id != job_id);
        }
        self.pending.remove_if(event_name, |_, events| events.is_empty());
    }

    /// Invoke the task. Firings of the same event name never overlap.
    async fn fire(&self, event_name: &str, args: &[Value]) {
        let guard = self
            .in_flight
            .entry(event_name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _running = guard.lock().await;

        let Some(task) = self.registry.get(event_name) else {
            tracing::warn!("No background task registered for event '{}'", event_name);
            return;
        };

        let started = Instant::now();
        tracing::debug!("Running background event '{}' with args {:?}", event_name, args);

        match task.process(args).await {
            Ok(()) => tracing::info!(
                "Background event '{}' finished in {}ms",
                event_name,
                started.elapsed().as_millis()
            ),
            Err(e) => tracing::error!("Background event '{}' failed: {}", event_name, e),
        }
    }
}

/// Cron-based scheduler for background task events
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Pending occurrences and task lookup, shared with cron callbacks
    state: Arc<SchedulerState>,
    /// Delay before single events fire
    single_delay: Duration,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler")
            .field("pending", &self.state.pending.len())
            .field("single_delay", &self.single_delay)
            .finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler firing tasks from `registry`
    pub async fn new(registry: Arc<TaskRegistry>, single_delay: Duration) -> AppResult<Self> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::scheduler(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler,
            state: Arc::new(SchedulerState {
                registry,
                pending: DashMap::new(),
                in_flight: DashMap::new(),
            }),
            single_delay,
        })
    }

    /// Start the scheduler
    pub async fn start(&self) -> AppResult<()> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::scheduler(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&self) -> AppResult<()> {
        let mut scheduler = self.scheduler.clone();
        scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::scheduler(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    /// Snapshot of all pending occurrences, ordered by event name
    pub fn pending_events(&self) -> Vec<ScheduledEvent> {
        let mut events: Vec<ScheduledEvent> = self
            .state
            .pending
            .iter()
            .flat_map(|entry| entry.value().clone())
            .collect();
        events.sort_by(|a, b| {
            a.event_name
                .cmp(&b.event_name)
                .then(a.scheduled_at.cmp(&b.scheduled_at))
        });
        events
    }

    fn build_job(&self, event_name: &str, recurrence: Recurrence, args: &[Value]) -> AppResult<CronJob> {
        let state = Arc::clone(&self.state);
        let name = event_name.to_string();
        let job_args = args.to_vec();
        let once = !recurrence.is_recurring();

        let run = move |job_id: Uuid, _scheduler: JobScheduler| -> FireFuture {
            let state = Arc::clone(&state);
            let name = name.clone();
            let args = job_args.clone();
            Box::pin(async move {
                if once {
                    state.remove_pending(&name, job_id);
                }
                state.fire(&name, &args).await;
            })
        };

        let job = match recurrence {
            Recurrence::Once => CronJob::new_one_shot_async(self.single_delay, run),
            Recurrence::Every(interval) => CronJob::new_repeated_async(interval.as_duration(), run),
        };

        job.map_err(|e| {
            AppError::scheduler(format!("Failed to create '{}' schedule: {}", event_name, e))
        })
    }
}

#[async_trait]
impl EventScheduler for CronScheduler {
    async fn schedule(
        &self,
        event_name: &str,
        recurrence: Recurrence,
        args: Vec<Value>,
    ) -> AppResult<bool> {
        let job = self.build_job(event_name, recurrence, &args)?;
        let job_id = job.guid();

        {
            let mut events = self.state.pending.entry(event_name.to_string()).or_default();
            let duplicate = match recurrence {
                Recurrence::Every(_) => !events.is_empty(),
                Recurrence::Once => events.iter().any(|event| event.args == args),
            };
            if duplicate {
                tracing::debug!("Event '{}' already scheduled, skipping", event_name);
                return Ok(false);
            }
            events.push(ScheduledEvent {
                job_id,
                event_name: event_name.to_string(),
                args,
                interval: match recurrence {
                    Recurrence::Once => None,
                    Recurrence::Every(interval) => Some(interval),
                },
                scheduled_at: Utc::now(),
            });
        }

        if let Err(e) = self.scheduler.add(job).await {
            self.state.remove_pending(event_name, job_id);
            return Err(AppError::scheduler(format!(
                "Failed to add '{}' schedule: {}",
                event_name, e
            )));
        }

        match recurrence {
            Recurrence::Once => tracing::info!(
                "Scheduled single event '{}' (in {}s)",
                event_name,
                self.single_delay.as_secs()
            ),
            Recurrence::Every(interval) => {
                tracing::info!("Scheduled recurring event '{}' ({})", event_name, interval)
            }
        }
        Ok(true)
    }

    fn is_scheduled(&self, event_name: &str) -> bool {
        self.state
            .pending
            .get(event_name)
            .map(|events| !events.is_empty())
            .unwrap_or(false)
    }

    async fn unschedule_all(&self, event_name: &str) -> AppResult<usize> {
        let Some((_, events)) = self.state.pending.remove(event_name) else {
            return Ok(0);
        };

        for event in &events {
            self.scheduler.remove(&event.job_id).await.map_err(|e| {
                AppError::scheduler(format!("Failed to remove '{}' schedule: {}", event_name, e))
            })?;
        }

        tracing::info!("Unscheduled {} occurrence(s) of '{}'", events.len(), event_name);
        Ok(events.len())
    }

    async fn trigger(&self, event_name: &str, args: &[Value]) {
        self.state.fire(event_name, args).await;
    }
}

#[cfg(test)]
impl CronScheduler {
    /// Whether an occurrence of `event_name` with exactly `args` is pending
    pub(crate) fn is_scheduled_with(&self, event_name: &str, args: &[Value]) -> bool {
        self.state
            .pending
            .get(event_name)
            .map(|events| events.iter().any(|event| event.args == args))
            .unwrap_or(false)
    }
}
