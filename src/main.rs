/*!
 * MLQ Simulator - Main Entry Point
 *
 * Reads a batch of process records, runs the multi-level queue simulation
 * and writes the results table.
 */

use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};

use mlq_sim::process::{self, ParsedInput};
use mlq_sim::report::{self, ReportConfig};
use mlq_sim::{init_tracing, Dispatcher, SchedulerConfig, SimulationError, SimulationResult};

/// Multi-level queue CPU scheduling simulator
#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    /// Input file with `label;burst;arrival;queue;priority` records.
    /// Prompted for when omitted.
    input: Option<PathBuf>,
}

fn main() -> miette::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let scheduler_config = SchedulerConfig::from_env()?;
    let report_config = ReportConfig::from_env()?;

    let parsed = acquire_input(cli.input, &mut io::stdin().lock(), &mut io::stdout())?;
    if !parsed.skipped.is_empty() {
        warn!(skipped = parsed.skipped.len(), "Some input lines were skipped");
    }
    if parsed.records.is_empty() {
        return Err(SimulationError::EmptyInput.into());
    }

    info!(processes = parsed.records.len(), "Starting simulation");
    let outcome = Dispatcher::new(parsed.records, scheduler_config).run();

    report::write_report(&outcome, &report_config)?;
    println!(
        "Simulation complete. Results written to {}",
        report_config.output_path.display()
    );
    Ok(())
}

/// Load the input, re-prompting on `input` until a readable file is supplied
///
/// Each failure is reported on stderr before the next prompt.
fn acquire_input(
    initial: Option<PathBuf>,
    input: &mut impl BufRead,
    prompt: &mut impl Write,
) -> SimulationResult<ParsedInput> {
    let mut candidate = initial;

    loop {
        let path = match candidate.take() {
            Some(path) => path,
            None => prompt_for_path(input, prompt)?,
        };

        match process::load_from_path(&path) {
            Ok(parsed) => return Ok(parsed),
            Err(err) => {
                eprintln!("{:?}", miette::Report::new(err));
            }
        }
    }
}

/// Ask for a path; fails only when the input is exhausted
fn prompt_for_path(
    input: &mut impl BufRead,
    prompt: &mut impl Write,
) -> SimulationResult<PathBuf> {
    let closed = |message: &str| SimulationError::UnopenableSource {
        path: "<stdin>".to_string(),
        message: message.to_string(),
    };

    loop {
        write!(prompt, "Input file path: ")
            .and_then(|_| prompt.flush())
            .map_err(|e| SimulationError::unopenable("<stdout>", &e))?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .map_err(|e| SimulationError::unopenable("<stdin>", &e))?;
        if read == 0 {
            return Err(closed("no input path supplied before end of input"));
        }

        let trimmed = line.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn prompts(output: &[u8]) -> usize {
        String::from_utf8_lossy(output)
            .matches("Input file path: ")
            .count()
    }

    #[test]
    fn test_prompt_skips_blank_lines_and_trims() {
        let mut input = Cursor::new("\n   \n  data/entrada.txt  \n");
        let mut output = Vec::new();

        let path = prompt_for_path(&mut input, &mut output).unwrap();
        assert_eq!(path, PathBuf::from("data/entrada.txt"));
        assert_eq!(prompts(&output), 3);
    }

    #[test]
    fn test_prompt_fails_at_end_of_input() {
        let mut input = Cursor::new("  \n");
        let mut output = Vec::new();

        let err = prompt_for_path(&mut input, &mut output).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::UnopenableSource { ref path, .. } if path == "<stdin>"
        ));
    }

    #[test]
    fn test_unopenable_source_is_prompted_again() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("entrada.txt");
        fs::write(&good, "A;2;0;1;0\n").unwrap();

        let mut input = Cursor::new(format!(
            "{}\n{}\n",
            dir.path().join("also-missing.txt").display(),
            good.display()
        ));
        let mut output = Vec::new();

        let parsed = acquire_input(
            Some(dir.path().join("missing.txt")),
            &mut input,
            &mut output,
        )
        .unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].label.as_str(), "A");
        assert_eq!(prompts(&output), 2);
    }

    #[test]
    fn test_initial_path_needs_no_prompt() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("entrada.txt");
        fs::write(&good, "A;2;0;1;0\nB;1;0;3;0\n").unwrap();

        let mut output = Vec::new();
        let parsed = acquire_input(Some(good), &mut Cursor::new(""), &mut output).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert!(output.is_empty());
    }

    #[test]
    fn test_end_of_input_after_failures_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut output = Vec::new();

        let err = acquire_input(
            Some(dir.path().join("missing.txt")),
            &mut Cursor::new(""),
            &mut output,
        )
        .unwrap_err();
        assert!(matches!(err, SimulationError::UnopenableSource { .. }));
        assert_eq!(prompts(&output), 1);
    }
}
