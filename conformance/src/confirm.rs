//! The manual latency confirmation.
//!
//! Whether a design can, in principle, predict within bounded time is not
//! something a black-box test can observe. The runner asks an operator
//! instead, once every automated case has passed.

use std::io::{self, BufRead, Write};

/// Question put to the operator.
pub const LATENCY_QUESTION: &str =
    "#13 Latency (Is the design, in principle, capable of predicting the next input in bounded time?) [y/N] ";

/// Source of the operator's answer.
pub trait Confirmation {
    /// Asks `question` and returns whether it was confirmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the question cannot be asked or answered.
    fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

/// Asks on standard error and reads the answer from standard input.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinConfirmation;

impl StdinConfirmation {
    /// Creates a confirmation reading standard input.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Confirmation for StdinConfirmation {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let mut stderr = io::stderr();
        write!(stderr, "{question}")?;
        stderr.flush()?;
        read_answer(io::stdin().lock())
    }
}

/// A fixed answer, for unattended runs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetConfirmation(pub bool);

impl Confirmation for PresetConfirmation {
    fn confirm(&mut self, _question: &str) -> io::Result<bool> {
        Ok(self.0)
    }
}

/// Reads one answer. Only a first character of `y` or `Y` confirms; end of
/// input declines.
///
/// # Errors
///
/// Returns an error if reading fails.
pub fn read_answer<R: BufRead>(mut reader: R) -> io::Result<bool> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(matches!(line.chars().next(), Some('y' | 'Y')))
}
