/*!
 * Process Module
 * Process records and the input decoder that produces them
 */

pub mod parser;
pub mod types;

pub use parser::{load_from_path, parse_line, parse_records, ParsedInput, SkippedLine};
pub use types::{ProcessRecord, QueueLevel};
