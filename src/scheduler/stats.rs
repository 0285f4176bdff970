/*!
 * Scheduler Statistics
 * Counters describing one simulation run
 */

use crate::core::serde::{is_zero_u64, is_zero_usize};
use crate::core::types::Tick;
use serde::{Deserialize, Serialize};

/// Dispatcher counters, snapshot with [`super::Dispatcher::stats`]
///
/// Plain counters: a run is single-threaded and owned by one dispatcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulerStats {
    /// Slices started
    #[serde(skip_serializing_if = "is_zero_u64", default)]
    pub dispatches: u64,
    /// Slices ended by quantum exhaustion
    #[serde(skip_serializing_if = "is_zero_u64", default)]
    pub preemptions: u64,
    #[serde(skip_serializing_if = "is_zero_usize", default)]
    pub completed: usize,
    /// Clock units spent with every queue empty
    #[serde(skip_serializing_if = "is_zero_u64", default)]
    pub idle_ticks: Tick,
    /// Clock units spent running a process
    #[serde(skip_serializing_if = "is_zero_u64", default)]
    pub busy_ticks: Tick,
    pub total_processes: usize,
}

impl SchedulerStats {
    pub(super) fn new(total_processes: usize) -> Self {
        Self {
            total_processes,
            ..Self::default()
        }
    }

    /// Fraction of elapsed clock spent running processes
    pub fn utilization(&self) -> f64 {
        let elapsed = self.busy_ticks + self.idle_ticks;
        if elapsed == 0 {
            return 0.0;
        }
        self.busy_ticks as f64 / elapsed as f64
    }
}
