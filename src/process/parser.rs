/*!
 * Process Record Decoder
 * Line-oriented parsing of `label;burst;arrival;queue;priority` records
 */

use super::types::{ProcessRecord, QueueLevel};
use crate::core::errors::{ParseError, SimulationError};
use crate::core::types::SimulationResult;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, warn};

/// Minimum number of non-empty fields in a record
const FIELD_COUNT: usize = 5;

/// A rejected input line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    /// 1-based line number
    pub line: usize,
    pub reason: ParseError,
}

impl From<SkippedLine> for SimulationError {
    fn from(skipped: SkippedLine) -> Self {
        SimulationError::MalformedRecord {
            line: skipped.line,
            reason: skipped.reason,
        }
    }
}

/// Result of decoding a whole input
#[derive(Debug, Clone, Default)]
pub struct ParsedInput {
    /// Valid records, sorted by arrival time (ties keep input order)
    pub records: Vec<ProcessRecord>,
    pub skipped: Vec<SkippedLine>,
}

/// Decode one line
///
/// Returns `Ok(None)` for blank lines and `#` comments. Whitespace is removed
/// from every field and empty fields are dropped before counting.
pub fn parse_line(line: &str) -> Result<Option<ProcessRecord>, ParseError> {
    if line.trim().is_empty() || line.trim_start().starts_with('#') {
        return Ok(None);
    }

    let fields: Vec<String> = line
        .split(';')
        .map(|field| field.chars().filter(|c| !c.is_whitespace()).collect::<String>())
        .filter(|field| !field.is_empty())
        .collect();

    if fields.len() < FIELD_COUNT {
        return Err(ParseError::TooFewFields(fields.len()));
    }

    let burst = parse_number::<u64>("burst_time", &fields[1])?;
    let arrival = parse_number::<u64>("arrival_time", &fields[2])?;
    let level = QueueLevel::try_from(parse_number::<i64>("queue_level", &fields[3])?)?;
    let priority = parse_number::<i64>("priority", &fields[4])?;

    ProcessRecord::new(fields[0].as_str(), burst, arrival, level, priority).map(Some)
}

fn parse_number<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Decode a whole input, skipping malformed lines
pub fn parse_records(input: &str) -> ParsedInput {
    let mut parsed = ParsedInput::default();

    for (idx, line) in input.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(record)) => parsed.records.push(record),
            Ok(None) => {}
            Err(reason) => {
                warn!(line = idx + 1, %reason, "Skipping malformed record");
                parsed.skipped.push(SkippedLine {
                    line: idx + 1,
                    reason,
                });
            }
        }
    }

    // Stable: equal arrivals keep file order
    parsed.records.sort_by_key(|record| record.arrival_time);

    debug!(
        records = parsed.records.len(),
        skipped = parsed.skipped.len(),
        "Input decoded"
    );
    parsed
}

/// Read and decode an input file
pub fn load_from_path(path: impl AsRef<Path>) -> SimulationResult<ParsedInput> {
    let path = path.as_ref();
    let contents =
        std::fs::read_to_string(path).map_err(|e| SimulationError::unopenable(path, &e))?;
    Ok(parse_records(&contents))
}
