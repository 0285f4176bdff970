/*!
 * Process Types
 * Process records and queue levels for the simulation
 */

use crate::core::serde::is_none;
use crate::core::types::{Label, Priority, Tick};
use crate::core::errors::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Queue a process is permanently bound to
///
/// Level 1 is served before level 2, which is served before level 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "i64")]
pub enum QueueLevel {
    L1,
    L2,
    L3,
}

impl QueueLevel {
    /// All levels in dispatch order
    pub const ALL: [QueueLevel; 3] = [QueueLevel::L1, QueueLevel::L2, QueueLevel::L3];

    /// Numeric level as written in input and output (1..=3)
    #[inline(always)]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::L1 => 1,
            Self::L2 => 2,
            Self::L3 => 3,
        }
    }

    /// Zero-based slot in per-level arrays
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.as_u8() as usize - 1
    }
}

impl TryFrom<i64> for QueueLevel {
    type Error = ParseError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::L1),
            2 => Ok(Self::L2),
            3 => Ok(Self::L3),
            other => Err(ParseError::InvalidQueueLevel(other)),
        }
    }
}

impl From<QueueLevel> for u8 {
    fn from(level: QueueLevel) -> Self {
        level.as_u8()
    }
}

impl fmt::Display for QueueLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// One process of the batch: static attributes plus simulation state
///
/// Timing fields are written only by the dispatcher. Once `completion_time`
/// is set the record is final. Deserialization goes through the same checks
/// as [`ProcessRecord::new`] and rejects inconsistent simulation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "RecordRepr")]
pub struct ProcessRecord {
    pub label: Label,
    pub burst_time: Tick,
    pub arrival_time: Tick,
    pub queue_level: QueueLevel,
    pub priority: Priority,

    remaining_time: Tick,
    #[serde(skip_serializing_if = "is_none")]
    start_time: Option<Tick>,
    #[serde(skip_serializing_if = "is_none")]
    completion_time: Option<Tick>,
}

/// Wire form of [`ProcessRecord`], checked before it becomes one
#[derive(Deserialize)]
struct RecordRepr {
    label: Label,
    burst_time: Tick,
    arrival_time: Tick,
    queue_level: QueueLevel,
    priority: Priority,
    #[serde(default)]
    remaining_time: Option<Tick>,
    #[serde(default)]
    start_time: Option<Tick>,
    #[serde(default)]
    completion_time: Option<Tick>,
}

impl TryFrom<RecordRepr> for ProcessRecord {
    type Error = ParseError;

    fn try_from(repr: RecordRepr) -> Result<Self, Self::Error> {
        let mut record = Self::new(
            repr.label,
            repr.burst_time,
            repr.arrival_time,
            repr.queue_level,
            repr.priority,
        )?;
        let burst = record.burst_time;
        let remaining = repr.remaining_time.unwrap_or(burst);
        let inconsistent = |msg: String| Err(ParseError::InconsistentState(msg));

        if remaining > burst {
            return inconsistent(format!("remaining time {} exceeds burst {}", remaining, burst));
        }
        match (repr.start_time, repr.completion_time) {
            (None, None) if remaining != burst => {
                return inconsistent("progress recorded without a start time".to_string());
            }
            (None, Some(_)) => {
                return inconsistent("completion recorded without a start time".to_string());
            }
            (Some(start), _) if start < record.arrival_time => {
                return inconsistent(format!(
                    "start {} precedes arrival {}",
                    start, record.arrival_time
                ));
            }
            (Some(_), None) if remaining == 0 => {
                return inconsistent("burst exhausted without a completion time".to_string());
            }
            (Some(_), Some(_)) if remaining != 0 => {
                return inconsistent(format!("completed with {} units remaining", remaining));
            }
            (Some(start), Some(done)) if done < start + burst => {
                return inconsistent(format!(
                    "completion {} is earlier than start {} plus burst {}",
                    done, start, burst
                ));
            }
            _ => {}
        }

        record.remaining_time = remaining;
        record.start_time = repr.start_time;
        record.completion_time = repr.completion_time;
        Ok(record)
    }
}

impl ProcessRecord {
    /// Create a fresh record; fails when the burst is zero
    pub fn new(
        label: impl Into<Label>,
        burst_time: Tick,
        arrival_time: Tick,
        queue_level: QueueLevel,
        priority: Priority,
    ) -> Result<Self, ParseError> {
        if burst_time == 0 {
            return Err(ParseError::ZeroBurst);
        }
        Ok(Self {
            label: label.into(),
            burst_time,
            arrival_time,
            queue_level,
            priority,
            remaining_time: burst_time,
            start_time: None,
            completion_time: None,
        })
    }

    #[inline(always)]
    pub fn remaining_time(&self) -> Tick {
        self.remaining_time
    }

    #[inline(always)]
    pub fn is_started(&self) -> bool {
        self.start_time.is_some()
    }

    #[inline(always)]
    pub fn is_completed(&self) -> bool {
        self.completion_time.is_some()
    }

    pub fn start_time(&self) -> Option<Tick> {
        self.start_time
    }

    pub fn completion_time(&self) -> Option<Tick> {
        self.completion_time
    }

    /// Delay between arrival and first dispatch
    pub fn response_time(&self) -> Option<Tick> {
        self.start_time.map(|start| start - self.arrival_time)
    }

    /// Time from arrival to completion
    pub fn turnaround_time(&self) -> Option<Tick> {
        self.completion_time.map(|done| done - self.arrival_time)
    }

    /// Time spent eligible but not running
    pub fn waiting_time(&self) -> Option<Tick> {
        self.turnaround_time().map(|tat| tat - self.burst_time)
    }

    /// Discard simulation state, leaving the record as [`ProcessRecord::new`] built it
    pub fn reset(&mut self) {
        self.remaining_time = self.burst_time;
        self.start_time = None;
        self.completion_time = None;
    }

    /// Record first dispatch; later calls are ignored
    pub(crate) fn mark_started(&mut self, time: Tick) {
        if self.start_time.is_none() {
            debug_assert!(time >= self.arrival_time);
            self.start_time = Some(time);
        }
    }

    /// Consume one CPU unit
    pub(crate) fn run_unit(&mut self) {
        debug_assert!(self.remaining_time > 0);
        self.remaining_time -= 1;
    }

    /// Freeze the timing fields at `time`
    pub(crate) fn finalize(&mut self, time: Tick) {
        debug_assert_eq!(self.remaining_time, 0);
        debug_assert!(self.completion_time.is_none());
        self.completion_time = Some(time);
    }
}
