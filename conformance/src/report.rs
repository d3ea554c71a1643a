//! Run summaries for people and machines.

use crate::exit::ExitCode;
use crate::runner::RunSummary;
use crate::TestResult;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

/// Renders the summary as a plain-text table.
#[must_use]
pub fn render_table(summary: &RunSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "seed {}, pattern period {}, simulated infinity {}, {} repetitions",
        summary.seed, summary.pattern_period, summary.simulated_infinity, summary.repetitions
    );
    let _ = writeln!(
        out,
        "{:>3}  {:<16} {:<11} {:>5}  result",
        "#", "case", "category", "reps"
    );
    for case in &summary.cases {
        let result = match &case.result {
            TestResult::Passed => "passed".to_owned(),
            TestResult::Failed(failure) => format!("failed: {failure}"),
            TestResult::SetupError(message) => format!("setup error: {message}"),
        };
        let _ = writeln!(
            out,
            "{:>3}  {:<16} {:<11} {:>5}  {}",
            case.id,
            case.name,
            case.category.to_string(),
            case.repetitions,
            result
        );
    }
    if summary.not_run() > 0 {
        let _ = writeln!(out, "{} case(s) not run", summary.not_run());
    }

    let latency = match summary.latency_confirmed {
        Some(true) => "confirmed",
        Some(false) => "declined",
        None => "not asked",
    };
    let _ = writeln!(out, "latency: {latency}");

    let code = summary.exit_code();
    let _ = writeln!(
        out,
        "{}/{} passed in {} ms, exit {} ({})",
        summary.passed,
        summary.total,
        summary.duration_ms,
        code,
        ExitCode::description(code)
    );
    out
}

/// Writes the summary as pretty-printed JSON, creating parent directories.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json_report(summary: &RunSummary, path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(summary)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))?;
    fs::write(path, json)
}

/// Reads a summary written by [`write_json_report`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_json_report(path: &Path) -> io::Result<RunSummary> {
    let data = fs::read(path)?;
    serde_json::from_slice(&data)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))
}
