//! Haystack containment checker CLI
//!
//! Checks that a needle JSON document is contained in a haystack JSON
//! document, with `@matcher(args)` strings in the needle dispatched to the
//! built-in matchers.
//!
//! Usage:
//!   haystack --needle expected.json --haystack response.json [OPTIONS]
//!   curl -s http://localhost/api | haystack --needle expected.json --haystack -
//!
//! Exit status: 0 when contained, 1 on a mismatch, 2 on usage, I/O or
//! configuration errors.

mod config;
mod report;

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use config::Config;
use haystack::Document;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

const RED: &str = "\x1b[31m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// Check that one JSON document is contained in another
#[derive(Parser, Debug)]
#[command(name = "haystack")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Needle document (expected subset); `-` reads stdin
    #[arg(short, long)]
    needle: PathBuf,

    /// Haystack document (actual value); `-` reads stdin
    #[arg(short = 'H', long)]
    haystack: PathBuf,

    /// YAML configuration file (matchers, JWT tokens)
    #[arg(short, long, env = "HAYSTACK_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Compare every needle string literally (no built-in matchers)
    #[arg(long)]
    no_default_matchers: bool,

    /// Show the matcher failure behind a mismatch
    #[arg(short, long)]
    verbose: bool,

    /// Log filter directive (overrides RUST_LOG), e.g. `debug` or `haystack=trace`
    #[arg(long)]
    log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,
}

fn is_stdin(path: &std::path::Path) -> bool {
    path.as_os_str() == "-"
}

fn init_tracing(args: &Args) -> Result<(), anyhow::Error> {
    let filter = match &args.log_level {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("Invalid log level '{directive}'"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    match args.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
    Ok(())
}

fn read_document(path: &std::path::Path, document: Document) -> Result<Value, anyhow::Error> {
    let contents = if is_stdin(path) {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .with_context(|| format!("Failed to read the {document} from stdin"))?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read the {document} from {}", path.display()))?
    };
    serde_json::from_str(&contents).with_context(|| format!("The {document} is not valid JSON"))
}

/// Returns whether the needle is contained.
fn run(args: &Args) -> Result<bool, anyhow::Error> {
    if is_stdin(&args.needle) && is_stdin(&args.haystack) {
        anyhow::bail!("Only one of --needle and --haystack can be read from stdin");
    }

    let config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    let comparator = config.build_comparator(args.no_default_matchers)?;
    tracing::debug!(matchers = ?comparator.registry().names(), "comparator ready");

    let needle = read_document(&args.needle, Document::Needle)?;
    let haystack = read_document(&args.haystack, Document::Haystack)?;

    let outcome = comparator.compare(&needle, &haystack);
    match args.format {
        OutputFormat::Json => report::print_json(&outcome)?,
        OutputFormat::Text => report::print_text(&outcome, args.verbose),
    }
    Ok(outcome.is_ok())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_tracing(&args) {
        eprintln!("{RED}{BOLD}error:{RESET} {e:#}");
        return ExitCode::from(2);
    }

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("{RED}{BOLD}error:{RESET} {e:#}");
            ExitCode::from(2)
        }
    }
}
