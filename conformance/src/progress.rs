//! Progress reporting for testbed runs.
//!
//! Provides streaming progress updates that work for both human and machine
//! consumers. Human output redraws repetition counters in place; JSON output
//! emits one event per line.

use serde::Serialize;
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Output format for progress events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Terminal-friendly lines.
    #[default]
    Human,
    /// One JSON object per line.
    Json,
}

/// Progress update types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressKind {
    /// Informational line (banner, settings).
    Note,

    /// A case started.
    Started,

    /// Repetition counter update.
    Update,

    /// A case completed successfully.
    Completed,

    /// A case failed.
    Failed,
}

/// A progress update event.
#[derive(Clone, Debug, Serialize)]
pub struct ProgressEvent {
    /// Type of progress event.
    pub kind: ProgressKind,

    /// Current repetition (1-indexed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<u64>,

    /// Total repetitions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,

    /// Human-readable message.
    pub message: String,

    /// Elapsed time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<u64>,

    /// Case identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case: Option<u8>,
}

impl ProgressEvent {
    fn new(kind: ProgressKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            current: None,
            total: None,
            message: message.into(),
            elapsed_ms: None,
            case: None,
        }
    }

    /// Create a note event.
    #[must_use]
    pub fn note(message: impl Into<String>) -> Self {
        Self::new(ProgressKind::Note, message)
    }

    /// Create a new started event.
    #[must_use]
    pub fn started(message: impl Into<String>) -> Self {
        Self::new(ProgressKind::Started, message)
    }

    /// Create a new update event.
    #[must_use]
    pub fn update(current: u64, total: u64, message: impl Into<String>) -> Self {
        Self {
            current: Some(current),
            total: Some(total),
            ..Self::new(ProgressKind::Update, message)
        }
    }

    /// Create a completed event.
    #[must_use]
    pub fn completed(message: impl Into<String>) -> Self {
        Self::new(ProgressKind::Completed, message)
    }

    /// Create a failed event.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(ProgressKind::Failed, message)
    }

    /// Set the case identifier.
    #[must_use]
    pub const fn case(mut self, id: u8) -> Self {
        self.case = Some(id);
        self
    }

    /// Set elapsed time.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn elapsed(mut self, duration: Duration) -> Self {
        self.elapsed_ms = Some(duration.as_millis() as u64);
        self
    }
}

/// Progress reporter that handles output formatting.
pub struct ProgressReporter {
    format: OutputFormat,
    color: bool,
    start_time: Instant,
    writer: Box<dyn Write>,
    last_line_length: usize,
}

impl ProgressReporter {
    /// Create a reporter writing to standard error.
    #[must_use]
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: true,
            start_time: Instant::now(),
            writer: Box::new(io::stderr()),
            last_line_length: 0,
        }
    }

    /// Create with a custom writer. Colors start disabled.
    #[must_use]
    pub fn with_writer<W: Write + 'static>(format: OutputFormat, writer: W) -> Self {
        Self {
            format,
            color: false,
            start_time: Instant::now(),
            writer: Box::new(writer),
            last_line_length: 0,
        }
    }

    /// Enable or disable ANSI colors in human output.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Report a progress event.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    #[allow(clippy::cast_possible_truncation)]
    pub fn report(&mut self, mut event: ProgressEvent) -> io::Result<()> {
        if event.elapsed_ms.is_none() {
            event.elapsed_ms = Some(self.start_time.elapsed().as_millis() as u64);
        }

        match self.format {
            OutputFormat::Human => self.report_human(&event),
            OutputFormat::Json => self.report_json(&event),
        }
    }

    fn report_human(&mut self, event: &ProgressEvent) -> io::Result<()> {
        // Clear the previous counter before drawing anything over it.
        if self.last_line_length > 0 {
            write!(self.writer, "\r{}\r", " ".repeat(self.last_line_length))?;
            self.last_line_length = 0;
        }

        let mut line = String::new();
        let paint = |line: &mut String, code: &str, text: &str| {
            if self.color {
                line.push_str(code);
                line.push_str(text);
                line.push_str("\x1b[0m");
            } else {
                line.push_str(text);
            }
        };

        match event.kind {
            ProgressKind::Note => line.push_str(&event.message),
            ProgressKind::Started => line.push_str(&event.message),
            ProgressKind::Update => {
                if let (Some(current), Some(total)) = (event.current, event.total) {
                    use std::fmt::Write;
                    let _ = write!(line, "{current}/{total}");
                }
            }
            ProgressKind::Completed => {
                paint(&mut line, "\x1b[92m", &event.message);
            }
            ProgressKind::Failed => {
                paint(&mut line, "\x1b[91m", &event.message);
            }
        }

        if event.kind == ProgressKind::Update {
            self.last_line_length = line.len();
            write!(self.writer, "{line}")?;
        } else {
            writeln!(self.writer, "{line}")?;
        }

        self.writer.flush()
    }

    fn report_json(&mut self, event: &ProgressEvent) -> io::Result<()> {
        let json = serde_json::to_string(event)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writeln!(self.writer, "{json}")?;
        self.writer.flush()
    }

    /// Report an informational line.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn note(&mut self, message: impl Into<String>) -> io::Result<()> {
        self.report(ProgressEvent::note(message))
    }

    /// Report that a case has started.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn start(&mut self, case: u8, message: impl Into<String>) -> io::Result<()> {
        self.report(ProgressEvent::started(message).case(case))
    }

    /// Report a repetition counter.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn update(&mut self, case: u8, current: u64, total: u64) -> io::Result<()> {
        self.report(ProgressEvent::update(current, total, "repetition").case(case))
    }

    /// Report success.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn complete(&mut self, message: impl Into<String>) -> io::Result<()> {
        self.report(ProgressEvent::completed(message))
    }

    /// Report failure.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn fail(&mut self, message: impl Into<String>) -> io::Result<()> {
        self.report(ProgressEvent::failed(message))
    }
}
