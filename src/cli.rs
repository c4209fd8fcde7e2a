// File: ./src/cli.rs
//! Shared command-line interface logic: help text, argument parsing and
//! logger setup for the `tripcal` binary.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub fn print_help(binary_name: &str) {
    println!(
        "Tripcal v{} - Turn a day-by-day travel itinerary into calendar events",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!(
        "    {} convert [--start <YYYY-MM-DD>] [--out <dir>] <file|-> ...",
        binary_name
    );
    println!("    {} inspect <file.ics> [--json]", binary_name);
    println!("    {} --help", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -s, --start <date>    Date of \"Day 1\" (defaults to today).");
    println!("    -o, --out <dir>       Write .ics files into <dir>.");
    println!("    -r, --root <path>     Use a different directory for config and data.");
    println!("    --json                (inspect) Print events as JSON.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("CONVERT COMMAND:");
    println!(
        "    {} convert rome.txt                      Writes rome.ics",
        binary_name
    );
    println!(
        "    {} convert a.txt b.txt --out cal/        Converts both files in parallel",
        binary_name
    );
    println!(
        "    cat plan.txt | {} convert - > trip.ics   Reads stdin, writes stdout",
        binary_name
    );
    println!(
        "    {} convert --start 2025-05-01 plan.txt   Anchors Day 1 on May 1st",
        binary_name
    );
    println!();
    println!("ITINERARY FORMAT:");
    println!("    Day 1: Arrive, check in, evening walk");
    println!("    Day 2:");
    println!("      - Museum in the morning");
    println!("      - Food market for lunch");
    println!();
    println!("    Each \"Day N\" block becomes one all-day event on Day 1 + (N - 1).");
    println!("    Text without any \"Day N\" marker becomes a single event on the start date.");
    println!();
    println!("CONFIG:");
    println!("    config.toml keys: day_summary, fallback_summary, output_file_name, log_level");
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConvertArgs {
    pub start: Option<NaiveDate>,
    pub out_dir: Option<PathBuf>,
    pub root: Option<PathBuf>,
    pub inputs: Vec<String>,
}

impl ConvertArgs {
    pub fn parse(args: &[String]) -> Result<Self> {
        let mut parsed = ConvertArgs::default();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "-s" | "--start" => {
                    let value = iter.next().context("--start needs a date (YYYY-MM-DD)")?;
                    parsed.start = Some(parse_start_date(value)?);
                }
                "-o" | "--out" => {
                    let value = iter.next().context("--out needs a directory")?;
                    parsed.out_dir = Some(PathBuf::from(value));
                }
                "-r" | "--root" => {
                    let value = iter.next().context("--root needs a path")?;
                    parsed.root = Some(PathBuf::from(value));
                }
                "-" => parsed.inputs.push(arg.clone()),
                flag if flag.starts_with('-') => bail!("Unknown option '{}'", flag),
                _ => parsed.inputs.push(arg.clone()),
            }
        }

        if parsed.inputs.is_empty() {
            bail!("convert needs at least one input file (or '-' for stdin)");
        }
        Ok(parsed)
    }

    /// A lone stdin input with no output directory streams to stdout.
    pub fn streams_to_stdout(&self) -> bool {
        self.out_dir.is_none() && self.inputs.len() == 1 && self.inputs[0] == "-"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectArgs {
    pub path: PathBuf,
    pub json: bool,
    pub root: Option<PathBuf>,
}

impl InspectArgs {
    pub fn parse(args: &[String]) -> Result<Self> {
        let mut path = None;
        let mut json = false;
        let mut root = None;
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--json" => json = true,
                "-r" | "--root" => {
                    let value = iter.next().context("--root needs a path")?;
                    root = Some(PathBuf::from(value));
                }
                flag if flag.starts_with('-') => bail!("Unknown option '{}'", flag),
                _ if path.is_some() => bail!("inspect takes a single .ics file"),
                _ => path = Some(PathBuf::from(arg)),
            }
        }

        let path = path.context("inspect needs an .ics file")?;
        Ok(Self { path, json, root })
    }
}

pub fn parse_start_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid start date '{}', expected YYYY-MM-DD", value))
}

/// Warnings and errors go to stderr; everything at `level` also goes to the
/// log file when one is given.
pub fn init_logging(level: &str, log_file: Option<&Path>) -> Result<()> {
    let level = LevelFilter::from_str(level)
        .with_context(|| format!("Invalid log_level '{}'", level))?;
    let config = ConfigBuilder::new().set_time_format_rfc3339().build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level.min(LevelFilter::Warn),
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    if let Some(path) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file '{}'", path.display()))?;
        loggers.push(WriteLogger::new(level, config, file));
    }

    CombinedLogger::init(loggers).context("Logger already initialized")?;
    Ok(())
}
