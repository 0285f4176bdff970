/*!
 * Scheduler Types
 * Quantum policy, configuration, and dispatch events
 */

use crate::core::errors::SimulationError;
use crate::core::types::{Pid, SimulationResult, Tick};
use crate::process::QueueLevel;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Per-level slice policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantum {
    /// Preempt after this many units (always >= 1)
    Slice(Tick),
    /// First-come first-served: run until the burst is exhausted
    RunToCompletion,
}

impl Quantum {
    /// Create a bounded slice
    pub fn slice(units: Tick) -> SimulationResult<Self> {
        if units == 0 {
            return Err(SimulationError::InvalidQuantum(
                "slice must be at least 1 unit".to_string(),
            ));
        }
        Ok(Self::Slice(units))
    }

    /// Parse `3`, `fcfs`, `none` or `unlimited`
    pub fn parse(s: &str) -> SimulationResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "fcfs" | "none" | "unlimited" => Ok(Self::RunToCompletion),
            other => {
                let units = other.parse::<Tick>().map_err(|_| {
                    SimulationError::InvalidQuantum(format!(
                        "'{}' is neither a positive integer nor 'fcfs'",
                        s
                    ))
                })?;
                Self::slice(units)
            }
        }
    }

    /// Maximum units per slice, `None` when unbounded
    #[inline(always)]
    pub const fn limit(&self) -> Option<Tick> {
        match self {
            Self::Slice(units) => Some(*units),
            Self::RunToCompletion => None,
        }
    }

    /// Whether a slice that has used `used` units must stop
    #[inline(always)]
    pub const fn is_exhausted(&self, used: Tick) -> bool {
        match self {
            Self::Slice(units) => used >= *units,
            Self::RunToCompletion => false,
        }
    }
}

impl Serialize for Quantum {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Slice(units) => serializer.serialize_u64(*units),
            Self::RunToCompletion => serializer.serialize_str("fcfs"),
        }
    }
}

impl<'de> Deserialize<'de> for Quantum {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Inner {
            Units(Tick),
            Name(String),
        }

        match Inner::deserialize(deserializer)? {
            Inner::Units(units) => Self::slice(units),
            Inner::Name(name) => Self::parse(&name),
        }
        .map_err(serde::de::Error::custom)
    }
}

/// Dispatch policy for the three queues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    quanta: [Quantum; 3],
}

impl SchedulerConfig {
    /// Environment variables consulted by [`SchedulerConfig::from_env`], by level
    pub const ENV_VARS: [&'static str; 3] = ["MLQ_QUANTUM_L1", "MLQ_QUANTUM_L2", "MLQ_QUANTUM_L3"];

    pub fn new(quanta: [Quantum; 3]) -> Self {
        Self { quanta }
    }

    /// Quantum policy of a level
    #[inline(always)]
    pub fn quantum(&self, level: QueueLevel) -> Quantum {
        self.quanta[level.index()]
    }

    pub fn with_quantum(mut self, level: QueueLevel, quantum: Quantum) -> Self {
        self.quanta[level.index()] = quantum;
        self
    }

    /// Defaults overridden by `MLQ_QUANTUM_L1..3`
    pub fn from_env() -> SimulationResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> SimulationResult<Self> {
        let mut config = Self::default();
        for level in QueueLevel::ALL {
            let key = Self::ENV_VARS[level.index()];
            if let Some(value) = lookup(key) {
                let quantum = Quantum::parse(&value)
                    .map_err(|e| SimulationError::Configuration(format!("{}: {}", key, e)))?;
                config = config.with_quantum(level, quantum);
            }
        }
        Ok(config)
    }
}

impl Default for SchedulerConfig {
    /// Level 1 round-robin q=3, level 2 round-robin q=5, level 3 FCFS
    fn default() -> Self {
        Self {
            quanta: [
                Quantum::Slice(3),
                Quantum::Slice(5),
                Quantum::RunToCompletion,
            ],
        }
    }
}

/// Observable state of the dispatcher between ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "pid", rename_all = "snake_case")]
pub enum DispatcherState {
    /// No queue holds work, but processes are still outstanding
    Idle,
    /// Queued work is waiting for the next dispatch decision
    Ready,
    /// A slice is in progress
    Running(Pid),
    /// Every process has completed
    Completed,
}

/// How a slice ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SliceOutcome {
    /// Quantum exhausted with work remaining; requeued at its level's tail
    Preempted,
    /// Burst finished
    Completed,
}

/// One contiguous run of a process on the CPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slice {
    pub pid: Pid,
    pub level: QueueLevel,
    pub start: Tick,
    pub end: Tick,
    pub outcome: SliceOutcome,
}

impl Slice {
    #[inline]
    pub const fn len(&self) -> Tick {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Entry of the execution timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimelineEntry {
    Slice(Slice),
    /// CPU idle over `[start, end)`
    Idle { start: Tick, end: Tick },
}

/// Result of one clock unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No work was queued; the clock advanced without running anything
    Idle,
    /// `pid` ran for one unit; `finished` is set when its slice ended
    Ran { pid: Pid, finished: Option<Slice> },
}
