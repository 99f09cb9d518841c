//! # Waveform Quality
//!
//! The Waveform Quality tool performs the following functions:
//! * Reads a recording of one or more periodic signals from a JSON file.
//! * Finds the troughs of the chosen signal, dividing it into cycles.
//! * Evaluates a set of plausibility checks, either the arterial pressure preset or one read from a JSON file, against every cycle.
//! * Prints the pass/fail report, with one row per cycle, as a table or as JSON.
//!
mod input;
mod render;

use clap::Parser;
use input::WaveformFile;
use miette::{Context, IntoDiagnostic};
use render::OutputFormat;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use waveform_features::{CheckSet, CheckSetConfig, DetectionOutcome, TroughDetector, check_cycles};

/// [clap] derived struct to handle command line parameters.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Cli {
    /// JSON file containing the time column and signal columns
    #[clap(long)]
    input: PathBuf,

    /// The signal to check, if not given the first signal column in the file is used
    #[clap(long)]
    column: Option<String>,

    /// Half-width, in samples, of the widest window used to find troughs.
    /// If not given, half the length of the signal is used, which needs memory quadratic in the length.
    #[clap(long)]
    scale: Option<usize>,

    /// If set, trough detection is abandoned rather than using more than this many bytes
    #[clap(long, env)]
    memory_budget: Option<usize>,

    /// JSON file defining the checks, if not given the arterial pressure checks are used
    #[clap(long)]
    checks: Option<PathBuf>,

    /// How the report is printed to stdout
    #[clap(long, value_enum, default_value_t)]
    format: OutputFormat,
}

fn read_file(path: &Path) -> miette::Result<String> {
    fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Cannot read {}", path.display()))
}

fn load_checks(path: Option<&Path>) -> miette::Result<CheckSet> {
    match path {
        Some(path) => CheckSetConfig::from_json(&read_file(path)?)
            .into_diagnostic()
            .wrap_err_with(|| format!("Invalid check configuration {}", path.display()))?
            .into_check_set()
            .into_diagnostic(),
        None => Ok(CheckSet::arterial_pressure()),
    }
}

fn main() -> miette::Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut table = WaveformFile::from_json(&read_file(&args.input)?)
        .into_diagnostic()
        .wrap_err_with(|| format!("Invalid waveform file {}", args.input.display()))?
        .into_table()
        .into_diagnostic()?;
    let checks = load_checks(args.checks.as_deref())?;

    let column = match args.column {
        Some(column) => column,
        None => table
            .names()
            .first()
            .cloned()
            .ok_or_else(|| miette::miette!("No signal columns"))?,
    };
    debug!("Checking {column} with {} checks", checks.len());

    let mut detector = TroughDetector::new(args.scale);
    if let Some(bytes) = args.memory_budget {
        detector = detector.with_memory_budget(bytes);
    }
    match detector.find_troughs(&mut table, &column).into_diagnostic()? {
        DetectionOutcome::Found(troughs) => info!("Found {troughs} troughs in {column}"),
        DetectionOutcome::ResourceExhausted { scale, .. } => {
            miette::bail!("Trough detection at scale {scale} ran out of memory, try a smaller --scale")
        }
    }

    let report = check_cycles(&mut table, &column, &checks).into_diagnostic()?;
    let failed = report.failed_cycles();
    if failed.is_empty() {
        info!("All {} cycles passed", report.n_cycles());
    } else {
        info!("Cycles failing at least one check: {failed:?}");
    }

    println!("{}", args.format.render(&report).into_diagnostic()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_arguments() {
        let args = Cli::parse_from([
            "waveform-quality",
            "--input",
            "recording.json",
            "--scale",
            "125",
            "--format",
            "json",
        ]);
        assert_eq!(args.input, PathBuf::from("recording.json"));
        assert_eq!(args.scale, Some(125));
        assert_eq!(args.column, None);
        assert!(matches!(args.format, OutputFormat::Json));
    }

    #[test]
    fn default_checks() {
        assert_eq!(load_checks(None).unwrap().len(), 9);
    }
}
