/*!
 * MLQ Scheduling Simulator Library
 * Multi-level queue CPU scheduling over a logical clock, with metrics and reports
 */

pub mod core;
pub mod monitoring;
pub mod process;
pub mod report;
pub mod scheduler;

// Re-exports
pub use crate::core::{ParseError, SimulationError, SimulationResult};
pub use monitoring::{init_tracing, Averages, MetricsCollector, ProcessMetrics, RunMetrics};
pub use process::{ProcessRecord, QueueLevel};
pub use report::{ReportConfig, ReportFormat};
pub use scheduler::{Dispatcher, Quantum, SchedulerConfig, SimulationOutcome};

use std::path::Path;

/// Decode `input` and run it to completion
///
/// Malformed lines are skipped. Fails with `EmptyInput` when no valid record
/// remains.
pub fn simulate(input: &str, config: SchedulerConfig) -> SimulationResult<SimulationOutcome> {
    let parsed = process::parse_records(input);
    run_records(parsed.records, config)
}

/// Load a file and run it to completion
pub fn simulate_file(
    path: impl AsRef<Path>,
    config: SchedulerConfig,
) -> SimulationResult<SimulationOutcome> {
    let parsed = process::load_from_path(path)?;
    run_records(parsed.records, config)
}

fn run_records(
    records: Vec<ProcessRecord>,
    config: SchedulerConfig,
) -> SimulationResult<SimulationOutcome> {
    if records.is_empty() {
        return Err(SimulationError::EmptyInput);
    }
    Ok(Dispatcher::new(records, config).run())
}
