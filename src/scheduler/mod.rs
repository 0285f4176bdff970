/*!
 * MLQ Dispatcher
 * Time-stepped multi-level queue scheduling over a logical clock
 */

pub mod arrivals;
pub mod queues;
pub mod stats;
pub mod types;

mod operations;

pub use arrivals::ArrivalTracker;
pub use queues::QueueBank;
pub use stats::SchedulerStats;
pub use types::{
    DispatcherState, Quantum, SchedulerConfig, Slice, SliceOutcome, TickOutcome, TimelineEntry,
};

use crate::core::types::{Pid, Tick};
use crate::process::{ProcessRecord, QueueLevel};
use serde::Serialize;
use tracing::{debug, info, info_span, Span};
use uuid::Uuid;

/// Slice currently occupying the CPU
#[derive(Debug, Clone, Copy)]
struct Running {
    pid: Pid,
    level: QueueLevel,
    start: Tick,
    used: Tick,
}

/// Simulation state machine for one run
///
/// Owns the record arena, the queue bank, the arrival tracker and the logical
/// clock. Nothing is shared between dispatchers, so independent runs can be
/// driven side by side.
pub struct Dispatcher {
    records: Vec<ProcessRecord>,
    bank: QueueBank,
    arrivals: ArrivalTracker,
    config: SchedulerConfig,

    time: Tick,
    completed: usize,
    current: Option<Running>,

    timeline: Vec<TimelineEntry>,
    stats: SchedulerStats,

    run_id: Uuid,
    span: Span,
}

/// Everything a finished run produces
#[derive(Debug, Clone, Serialize)]
pub struct SimulationOutcome {
    pub run_id: Uuid,
    pub config: SchedulerConfig,
    /// Completed records in arena order
    pub records: Vec<ProcessRecord>,
    pub timeline: Vec<TimelineEntry>,
    pub stats: SchedulerStats,
    pub final_time: Tick,
}

impl Dispatcher {
    /// Create a dispatcher and admit arrivals at time 0
    ///
    /// Records are addressed by their position; callers wanting arrival
    /// ordering sort before handing them over. Any state left over from an
    /// earlier run is discarded, so a finished batch can be simulated again.
    pub fn new(mut records: Vec<ProcessRecord>, config: SchedulerConfig) -> Self {
        let run_id = Uuid::new_v4();
        let span = info_span!("simulation", run_id = %run_id, processes = records.len());

        let reused = records.iter().filter(|r| r.is_started()).count();
        records.iter_mut().for_each(ProcessRecord::reset);

        let total = records.len();
        let mut dispatcher = Self {
            bank: QueueBank::new(),
            arrivals: ArrivalTracker::new(total),
            config,
            time: 0,
            completed: 0,
            current: None,
            timeline: Vec::new(),
            stats: SchedulerStats::new(total),
            run_id,
            span,
            records,
        };

        {
            let _enter = dispatcher.span.enter();
            if reused > 0 {
                debug!(reused, "Reset records carried over from an earlier run");
            }
            info!(processes = total, config = ?config, "Dispatcher initialized");
        }
        dispatcher
            .arrivals
            .admit_arrivals(0, &dispatcher.records, &mut dispatcher.bank);
        dispatcher
    }

    /// Dispatcher with the default 3 / 5 / FCFS policy
    pub fn with_defaults(records: Vec<ProcessRecord>) -> Self {
        Self::new(records, SchedulerConfig::default())
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Current logical time
    #[inline(always)]
    pub fn time(&self) -> Tick {
        self.time
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn is_finished(&self) -> bool {
        self.completed == self.records.len()
    }

    pub fn state(&self) -> DispatcherState {
        if self.is_finished() {
            DispatcherState::Completed
        } else if let Some(running) = self.current {
            DispatcherState::Running(running.pid)
        } else if self.bank.is_empty() {
            DispatcherState::Idle
        } else {
            DispatcherState::Ready
        }
    }

    pub fn records(&self) -> &[ProcessRecord] {
        &self.records
    }

    pub fn record(&self, pid: Pid) -> Option<&ProcessRecord> {
        self.records.get(pid)
    }

    pub fn queues(&self) -> &QueueBank {
        &self.bank
    }

    pub fn arrivals(&self) -> &ArrivalTracker {
        &self.arrivals
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn timeline(&self) -> &[TimelineEntry] {
        &self.timeline
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("run_id", &self.run_id)
            .field("time", &self.time)
            .field("completed", &self.completed)
            .field("total", &self.records.len())
            .field("state", &self.state())
            .finish()
    }
}
