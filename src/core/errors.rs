/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons an input line is rejected by the record decoder
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "reason", content = "details", rename_all = "snake_case")]
pub enum ParseError {
    #[error("expected 5 fields, found {0}")]
    TooFewFields(usize),

    #[error("field '{field}' is not a valid number: '{value}'")]
    InvalidNumber { field: String, value: String },

    #[error("burst time must be greater than zero")]
    ZeroBurst,

    #[error("queue level {0} is outside 1..=3")]
    InvalidQueueLevel(i64),

    #[error("inconsistent simulation state: {0}")]
    InconsistentState(String),
}

/// Simulation errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SimulationError {
    #[error("Malformed record on line {line}: {reason}")]
    #[diagnostic(
        code(input::malformed_record),
        help("Records look like 'label;burst;arrival;queue;priority'. The line is skipped.")
    )]
    MalformedRecord { line: usize, reason: ParseError },

    #[error("No processes to schedule")]
    #[diagnostic(
        code(input::empty),
        help("The input contained no valid records. Check the file contents and format.")
    )]
    EmptyInput,

    #[error("Cannot open input '{path}': {message}")]
    #[diagnostic(
        code(io::unopenable_source),
        help("Check that the file exists and is readable.")
    )]
    UnopenableSource { path: String, message: String },

    #[error("Cannot write results to '{path}': {message}")]
    #[diagnostic(
        code(io::unwritable_sink),
        help("Check permissions and free space for the output location.")
    )]
    UnwritableSink { path: String, message: String },

    #[error("Process '{0}' has not completed")]
    #[diagnostic(
        code(metrics::incomplete_record),
        help("Metrics can only be collected after the dispatcher has run to completion.")
    )]
    IncompleteRecord(String),

    #[error("Invalid quantum: {0}")]
    #[diagnostic(
        code(config::invalid_quantum),
        help("A time slice must be at least 1 unit. Use 'fcfs' for run-to-completion.")
    )]
    InvalidQuantum(String),

    #[error("Cannot encode report: {0}")]
    #[diagnostic(
        code(report::encoding),
        help("The JSON report could not be serialized. Nothing was written.")
    )]
    ReportEncoding(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(config::invalid),
        help("Review the MLQ_* environment variables.")
    )]
    Configuration(String),
}

impl SimulationError {
    /// Build a source error from an I/O failure
    pub fn unopenable(path: impl AsRef<std::path::Path>, err: &std::io::Error) -> Self {
        SimulationError::UnopenableSource {
            path: path.as_ref().display().to_string(),
            message: err.to_string(),
        }
    }

    /// Build a sink error from an I/O failure
    pub fn unwritable(path: impl AsRef<std::path::Path>, err: &std::io::Error) -> Self {
        SimulationError::UnwritableSink {
            path: path.as_ref().display().to_string(),
            message: err.to_string(),
        }
    }
}
