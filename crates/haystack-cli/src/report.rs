//! Comparison outcome rendering (text and JSON).

use haystack::value::render;
use haystack::{ComparisonError, ErrorKind, PathSegment};
use serde::Serialize;
use serde_json::Value;

// ANSI color codes
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Machine-readable outcome of one comparison.
#[derive(Debug, Serialize)]
pub struct Report {
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<PathSegment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matcher_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needle: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub haystack: Option<Value>,
}

impl Report {
    pub fn from_outcome(outcome: &Result<(), ComparisonError>) -> Self {
        match outcome {
            Ok(()) => Self {
                matched: true,
                kind: None,
                path: None,
                segments: Vec::new(),
                message: None,
                matcher_error: None,
                needle: None,
                haystack: None,
            },
            Err(err) => Self {
                matched: false,
                kind: Some(err.kind()),
                path: Some(err.path_string()),
                segments: err.path().to_vec(),
                message: Some(err.message().to_string()),
                matcher_error: err.matcher_error().map(ToString::to_string),
                needle: Some(err.needle().clone()),
                haystack: Some(err.haystack().clone()),
            },
        }
    }
}

pub fn print_json(outcome: &Result<(), ComparisonError>) -> Result<(), anyhow::Error> {
    let output = serde_json::to_string_pretty(&Report::from_outcome(outcome))?;
    println!("{output}");
    Ok(())
}

pub fn print_text(outcome: &Result<(), ComparisonError>, verbose: bool) {
    match outcome {
        Ok(()) => println!("{GREEN}{BOLD}✓ Needle is contained in the haystack{RESET}"),
        Err(err) => print!("{}", render_failure(err, verbose)),
    }
}

fn render_failure(err: &ComparisonError, verbose: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{RED}{BOLD}✗ {}{RESET} {}\n",
        err.kind(),
        err.message()
    ));
    if !err.path().is_empty() {
        out.push_str(&format!("  {DIM}at:{RESET} {CYAN}{}{RESET}\n", err.path_string()));
    }
    if verbose {
        if let Some(cause) = err.matcher_error() {
            out.push_str(&format!("  {DIM}cause:{RESET} {YELLOW}{cause}{RESET}\n"));
        }
    }

    out.push_str(&format!("\n{BOLD}Needle{RESET}\n"));
    push_indented(&mut out, &render(err.needle()));
    out.push_str(&format!("\n{BOLD}Haystack{RESET}\n"));
    push_indented(&mut out, &render(err.haystack()));
    out
}

fn push_indented(out: &mut String, text: &str) {
    for line in text.lines() {
        out.push_str(&format!("  {DIM}│{RESET} {line}\n"));
    }
}
