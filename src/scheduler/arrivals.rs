/*!
 * Arrival Tracker
 * Admits processes into their ready queue once their arrival time is reached
 */

use super::queues::QueueBank;
use crate::core::types::{Pid, Tick};
use crate::process::ProcessRecord;
use tracing::debug;

/// Tracks which processes have been admitted
///
/// Each process is admitted exactly once. Admission scans pending processes
/// in arena order, so processes arriving at the same time enter their queues
/// in input order.
#[derive(Debug, Clone)]
pub struct ArrivalTracker {
    pending: Vec<Pid>,
    admitted: Vec<bool>,
}

impl ArrivalTracker {
    pub fn new(total: usize) -> Self {
        Self {
            pending: (0..total).collect(),
            admitted: vec![false; total],
        }
    }

    /// Enqueue every pending process with `arrival_time <= time`
    ///
    /// Returns the number of processes admitted by this call.
    pub fn admit_arrivals(
        &mut self,
        time: Tick,
        records: &[ProcessRecord],
        bank: &mut QueueBank,
    ) -> usize {
        let before = self.pending.len();
        let admitted = &mut self.admitted;

        self.pending.retain(|&pid| {
            let record = &records[pid];
            if record.arrival_time > time {
                return true;
            }
            bank.push_back(record.queue_level, pid);
            admitted[pid] = true;
            debug!(
                pid,
                label = %record.label,
                level = %record.queue_level,
                time,
                "Process admitted"
            );
            false
        });

        before - self.pending.len()
    }

    pub fn is_admitted(&self, pid: Pid) -> bool {
        self.admitted.get(pid).copied().unwrap_or(false)
    }

    /// Processes that have not arrived yet
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}
