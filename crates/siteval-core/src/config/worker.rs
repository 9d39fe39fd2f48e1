//! Background worker configuration.

use serde::{Deserialize, Serialize};

use crate::types::Interval;

/// Background task worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the worker schedules anything at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cadence of the recurring URL validation task.
    #[serde(default)]
    pub validation_interval: Interval,
    /// Maximum queue entries visited per recurring run.
    #[serde(default = "default_batch_limit")]
    pub batch_limit: usize,
    /// Delay before a single-shot event fires, in seconds.
    #[serde(default = "default_single_event_delay")]
    pub single_event_delay_seconds: u64,
    /// How often the worker picks up actions recorded by other processes,
    /// in seconds.
    #[serde(default = "default_action_poll")]
    pub action_poll_seconds: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            validation_interval: Interval::default(),
            batch_limit: default_batch_limit(),
            single_event_delay_seconds: default_single_event_delay(),
            action_poll_seconds: default_action_poll(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_batch_limit() -> usize {
    5
}

fn default_single_event_delay() -> u64 {
    1
}

fn default_action_poll() -> u64 {
    5
}
