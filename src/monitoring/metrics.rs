/*!
 * Metrics Collection
 * Per-process timing metrics and run-wide averages
 */

use crate::core::errors::SimulationError;
use crate::core::types::{Label, SimulationResult, Tick};
use crate::process::ProcessRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Final timings of one process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessMetrics {
    pub label: Label,
    pub waiting_time: Tick,
    pub completion_time: Tick,
    pub response_time: Tick,
    pub turnaround_time: Tick,
}

impl TryFrom<&ProcessRecord> for ProcessMetrics {
    type Error = SimulationError;

    fn try_from(record: &ProcessRecord) -> Result<Self, Self::Error> {
        let incomplete = || SimulationError::IncompleteRecord(record.label.to_string());
        Ok(Self {
            label: record.label.clone(),
            waiting_time: record.waiting_time().ok_or_else(incomplete)?,
            completion_time: record.completion_time().ok_or_else(incomplete)?,
            response_time: record.response_time().ok_or_else(incomplete)?,
            turnaround_time: record.turnaround_time().ok_or_else(incomplete)?,
        })
    }
}

/// Arithmetic means across a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Averages {
    pub waiting_time: f64,
    pub completion_time: f64,
    pub response_time: f64,
    pub turnaround_time: f64,
}

impl fmt::Display for Averages {
    /// `WT=<avg>; CT=<avg>; RT=<avg>; TAT=<avg>;` with one decimal place
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WT={:.1}; CT={:.1}; RT={:.1}; TAT={:.1};",
            self.waiting_time, self.completion_time, self.response_time, self.turnaround_time
        )
    }
}

/// Metrics for a whole run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    pub processes: Vec<ProcessMetrics>,
    pub averages: Averages,
}

/// Accumulates completed records and derives averages
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    processes: Vec<ProcessMetrics>,
    total_waiting: u64,
    total_completion: u64,
    total_response: u64,
    total_turnaround: u64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect metrics for a finished batch, in the given order
    pub fn collect(records: &[ProcessRecord]) -> SimulationResult<RunMetrics> {
        let mut collector = Self::new();
        for record in records {
            collector.observe(record)?;
        }
        collector.finish()
    }

    /// Add one completed record
    pub fn observe(&mut self, record: &ProcessRecord) -> SimulationResult<()> {
        let metrics = ProcessMetrics::try_from(record)?;
        self.total_waiting += metrics.waiting_time;
        self.total_completion += metrics.completion_time;
        self.total_response += metrics.response_time;
        self.total_turnaround += metrics.turnaround_time;
        self.processes.push(metrics);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Averages so far; `EmptyInput` when nothing was observed
    pub fn averages(&self) -> SimulationResult<Averages> {
        if self.processes.is_empty() {
            return Err(SimulationError::EmptyInput);
        }
        let n = self.processes.len() as f64;
        Ok(Averages {
            waiting_time: self.total_waiting as f64 / n,
            completion_time: self.total_completion as f64 / n,
            response_time: self.total_response as f64 / n,
            turnaround_time: self.total_turnaround as f64 / n,
        })
    }

    pub fn finish(self) -> SimulationResult<RunMetrics> {
        let averages = self.averages()?;
        Ok(RunMetrics {
            processes: self.processes,
            averages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::QueueLevel;
    use crate::scheduler::Dispatcher;

    #[test]
    fn test_empty_input_is_guarded() {
        assert_eq!(
            MetricsCollector::collect(&[]).unwrap_err(),
            SimulationError::EmptyInput
        );
    }

    #[test]
    fn test_incomplete_record_rejected() {
        let record = ProcessRecord::new("p", 2, 0, QueueLevel::L1, 0).unwrap();
        assert_eq!(
            MetricsCollector::collect(&[record]).unwrap_err(),
            SimulationError::IncompleteRecord("p".to_string())
        );
    }

    #[test]
    fn test_averages() {
        let records = vec![
            ProcessRecord::new("a", 6, 0, QueueLevel::L1, 0).unwrap(),
            ProcessRecord::new("b", 4, 0, QueueLevel::L2, 0).unwrap(),
            ProcessRecord::new("c", 2, 0, QueueLevel::L3, 0).unwrap(),
        ];
        let outcome = Dispatcher::with_defaults(records).run();
        let metrics = MetricsCollector::collect(&outcome.records).unwrap();

        assert_eq!(metrics.processes.len(), 3);
        assert_eq!(metrics.averages.completion_time, 28.0 / 3.0);
        assert_eq!(metrics.averages.waiting_time, 16.0 / 3.0);
        assert_eq!(metrics.averages.to_string(), "WT=5.3; CT=9.3; RT=5.3; TAT=9.3;");
    }
}
