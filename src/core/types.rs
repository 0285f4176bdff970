/*!
 * Core Types
 * Common types used across the simulator
 */

/// Process identifier: stable index into the dispatcher's record arena
pub type Pid = usize;

/// Logical clock value, in CPU units
pub type Tick = u64;

/// Reserved per-process priority (carried through, never consulted)
pub type Priority = i64;

/// Process label, stored inline when short
pub type Label = smartstring::alias::String;

/// Common result type for simulator operations
pub type SimulationResult<T> = Result<T, super::errors::SimulationError>;
