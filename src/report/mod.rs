/*!
 * Results Report
 * Renders a finished run as the semicolon table or JSON and writes it out
 */

use crate::core::errors::SimulationError;
use crate::core::types::SimulationResult;
use crate::monitoring::{MetricsCollector, ProcessMetrics, RunMetrics};
use crate::process::ProcessRecord;
use crate::scheduler::{SchedulerConfig, SchedulerStats, SimulationOutcome, TimelineEntry};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;

/// Comment line opening every text report
pub const HEADER: &str = "# Etiquetas; BT; AT; Q; Pr; WT; CT; RT; TAT";

/// Default output file
pub const DEFAULT_OUTPUT: &str = "salida.txt";

/// Output encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(SimulationError::Configuration(format!(
                "unknown report format '{}'. Valid: text, json",
                other
            ))),
        }
    }
}

/// Where and how results are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub output_path: PathBuf,
    pub format: ReportFormat,
}

impl ReportConfig {
    /// Defaults overridden by `MLQ_OUTPUT` and `MLQ_REPORT_FORMAT`
    pub fn from_env() -> SimulationResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> SimulationResult<Self> {
        let mut config = Self::default();
        if let Some(path) = lookup("MLQ_OUTPUT") {
            config.output_path = PathBuf::from(path);
        }
        if let Some(format) = lookup("MLQ_REPORT_FORMAT") {
            config.format = format.parse()?;
        }
        Ok(config)
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            format: ReportFormat::Text,
        }
    }
}

/// Semicolon table: header, one line per record, blank line, averages
pub fn render_text(records: &[ProcessRecord]) -> SimulationResult<String> {
    let metrics = MetricsCollector::collect(records)?;

    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');
    for (record, m) in records.iter().zip(&metrics.processes) {
        write_row(&mut out, record, m);
    }
    out.push('\n');
    out.push_str(&metrics.averages.to_string());
    out.push('\n');
    Ok(out)
}

fn write_row(out: &mut String, record: &ProcessRecord, m: &ProcessMetrics) {
    // Writing to a String cannot fail
    let _ = writeln!(
        out,
        "{};{};{};{};{};{};{};{};{}",
        record.label,
        record.burst_time,
        record.arrival_time,
        record.queue_level,
        record.priority,
        m.waiting_time,
        m.completion_time,
        m.response_time,
        m.turnaround_time
    );
}

#[derive(Serialize)]
struct JsonReport<'a> {
    run_id: Uuid,
    config: &'a SchedulerConfig,
    records: &'a [ProcessRecord],
    metrics: &'a RunMetrics,
    stats: &'a SchedulerStats,
    timeline: &'a [TimelineEntry],
    final_time: u64,
}

/// Full run as pretty-printed JSON
pub fn render_json(outcome: &SimulationOutcome) -> SimulationResult<String> {
    let metrics = MetricsCollector::collect(&outcome.records)?;
    let report = JsonReport {
        run_id: outcome.run_id,
        config: &outcome.config,
        records: &outcome.records,
        metrics: &metrics,
        stats: &outcome.stats,
        timeline: &outcome.timeline,
        final_time: outcome.final_time,
    };
    encode_json(&report)
}

fn encode_json<T: Serialize>(value: &T) -> SimulationResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| SimulationError::ReportEncoding(e.to_string()))
}

pub fn render(outcome: &SimulationOutcome, format: ReportFormat) -> SimulationResult<String> {
    match format {
        ReportFormat::Text => render_text(&outcome.records),
        ReportFormat::Json => render_json(outcome),
    }
}

/// Write a rendered report; nothing is written when rendering fails
pub fn write_report(outcome: &SimulationOutcome, config: &ReportConfig) -> SimulationResult<()> {
    let contents = render(outcome, config.format)?;
    write_to(&config.output_path, &contents)?;
    info!(
        path = %config.output_path.display(),
        format = ?config.format,
        "Report written"
    );
    Ok(())
}

fn write_to(path: &Path, contents: &str) -> SimulationResult<()> {
    std::fs::write(path, contents).map_err(|e| SimulationError::unwritable(path, &e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::parse_records;
    use crate::scheduler::Dispatcher;

    fn run(input: &str) -> SimulationOutcome {
        Dispatcher::with_defaults(parse_records(input).records).run()
    }

    #[test]
    fn test_render_text() {
        let outcome = run("A;6;0;1;0\nB;4;0;2;0\nC;2;0;3;0\n");
        let text = render_text(&outcome.records).unwrap();
        assert_eq!(
            text,
            "# Etiquetas; BT; AT; Q; Pr; WT; CT; RT; TAT\n\
             A;6;0;1;0;0;6;0;6\n\
             B;4;0;2;0;6;10;6;10\n\
             C;2;0;3;0;10;12;10;12\n\
             \n\
             WT=5.3; CT=9.3; RT=5.3; TAT=9.3;\n"
        );
    }

    #[test]
    fn test_render_empty_is_error() {
        let outcome = run("# nothing here\n");
        assert_eq!(
            render(&outcome, ReportFormat::Text).unwrap_err(),
            SimulationError::EmptyInput
        );
    }

    #[test]
    fn test_render_json() {
        let outcome = run("A;2;0;1;9\n");
        let json = render_json(&outcome).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["final_time"], 2);
        assert_eq!(value["records"][0]["label"], "A");
        assert_eq!(value["metrics"]["averages"]["turnaround_time"], 2.0);
        assert_eq!(value["timeline"][0]["kind"], "slice");
    }

    #[test]
    fn test_encoding_failure_is_reported_as_encoding() {
        // JSON object keys must be strings
        let mut map = std::collections::BTreeMap::new();
        map.insert((1u8, 2u8), 3u8);
        assert!(matches!(
            encode_json(&map),
            Err(SimulationError::ReportEncoding(_))
        ));
    }

    #[test]
    fn test_report_format_parsing() {
        assert_eq!(" TXT ".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert_eq!("json".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert!(matches!(
            "xml".parse::<ReportFormat>(),
            Err(SimulationError::Configuration(_))
        ));
    }

    #[test]
    fn test_report_config_from_lookup() {
        let config = ReportConfig::from_lookup(|key| match key {
            "MLQ_OUTPUT" => Some("out.json".to_string()),
            "MLQ_REPORT_FORMAT" => Some("JSON".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.output_path, PathBuf::from("out.json"));
        assert_eq!(config.format, ReportFormat::Json);

        assert!(ReportConfig::from_lookup(|_| Some("xml".to_string())).is_err());
        assert_eq!(ReportConfig::from_lookup(|_| None).unwrap(), ReportConfig::default());
    }

    #[test]
    fn test_unwritable_sink() {
        let outcome = run("A;1;0;1;0\n");
        let config = ReportConfig {
            output_path: PathBuf::from("/nonexistent-dir/salida.txt"),
            format: ReportFormat::Text,
        };
        assert!(matches!(
            write_report(&outcome, &config),
            Err(SimulationError::UnwritableSink { .. })
        ));
    }
}
