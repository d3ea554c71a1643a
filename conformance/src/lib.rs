//! AGITB Conformance Battery
//!
//! This crate holds the twelve behavioural invariants every candidate model
//! is checked against, and the runner that executes them.
//!
//! # Architecture
//!
//! The battery is model-agnostic. A model implements [`agitb::Cortex`] and
//! every case is a plain function generic over it, so the same cases validate
//! any implementation. Cases draw their randomness from a shared
//! [`TestContext`], which owns the seeded [`Oracle`].
//!
//! # Test Categories
//!
//! - `State`: how the model's state reacts to input (cases 1 to 5)
//! - `Adaptation`: what the model can and cannot learn (cases 6 to 8)
//! - `Hypothesis`: randomised null-hypothesis rejections (cases 9 to 12)
//!
//! # Outcomes
//!
//! A case either passes, fails an [`ensure!`] assertion, or cannot be set up
//! because a bounded input search came up empty ([`setup!`]). The two
//! negative outcomes are reported separately.

#![forbid(unsafe_code)]

use agitb::{Oracle, SequenceGenerator};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use agitb::Cortex;

pub mod confirm;
pub mod exit;
pub mod progress;
pub mod report;
pub mod runner;
pub mod tests;

#[cfg(test)]
pub(crate) mod test_utils;

pub use confirm::{Confirmation, PresetConfirmation, StdinConfirmation};
pub use exit::ExitCode;
pub use progress::{OutputFormat, ProgressEvent, ProgressKind, ProgressReporter};
pub use runner::{CaseReport, RunError, RunSummary, Runner};

// ============================================================================
// Test Result Types
// ============================================================================

/// A violated invariant: the failing expression and where it lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// Source text of the assertion.
    pub expression: String,
    /// Source file of the assertion.
    pub file: String,
    /// Source line of the assertion.
    pub line: u32,
    /// Optional diagnostic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Failure {
    /// A failure without a diagnostic.
    pub fn new(expression: &str, file: &str, line: u32) -> Self {
        Self {
            expression: expression.to_owned(),
            file: file.to_owned(),
            line,
            detail: None,
        }
    }

    /// Attaches a diagnostic.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}:{}", self.expression, self.file, self.line)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({detail})")?;
        }
        Ok(())
    }
}

/// Outcome of one case execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum TestResult {
    /// Every assertion held.
    Passed,
    /// An assertion did not hold.
    Failed(Failure),
    /// Inputs for the case could not be built.
    SetupError(String),
}

impl TestResult {
    /// True for [`TestResult::Passed`].
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => write!(f, "passed"),
            Self::Failed(failure) => write!(f, "assertion failed: {failure}"),
            Self::SetupError(message) => write!(f, "setup error: {message}"),
        }
    }
}

// ============================================================================
// Test Categories
// ============================================================================

/// Categories of conformance cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestCategory {
    /// State reacts to input.
    State,
    /// Learnability limits.
    Adaptation,
    /// Randomised null-hypothesis rejections.
    Hypothesis,
}

impl fmt::Display for TestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestCategory::State => write!(f, "state"),
            TestCategory::Adaptation => write!(f, "adaptation"),
            TestCategory::Hypothesis => write!(f, "hypothesis"),
        }
    }
}

// ============================================================================
// Test Metadata
// ============================================================================

/// Metadata for a conformance case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TestMeta {
    /// Position in the battery, starting at 1.
    pub id: u8,
    /// Short name.
    pub name: &'static str,
    /// The invariant in one sentence.
    pub rationale: &'static str,
    /// Category of the case.
    pub category: TestCategory,
}

impl fmt::Display for TestMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} ({})", self.id, self.name, self.rationale)
    }
}

// ============================================================================
// Test Context
// ============================================================================

/// Shared state handed to every case: the seeded oracle and the resolved
/// pattern period.
pub struct TestContext<C: Cortex> {
    oracle: Oracle<C, StdRng>,
    pattern_period: usize,
}

impl<C: Cortex> TestContext<C> {
    /// Creates a context.
    pub fn new(oracle: Oracle<C, StdRng>, pattern_period: usize) -> Self {
        Self {
            oracle,
            pattern_period,
        }
    }

    /// A context with a fixed seed, for driving single cases.
    pub fn seeded(seed: u64, simulated_infinity: usize, pattern_period: usize) -> Self {
        Self::new(Oracle::seeded(seed, simulated_infinity), pattern_period)
    }

    /// The oracle.
    pub fn oracle(&mut self) -> &mut Oracle<C, StdRng> {
        &mut self.oracle
    }

    /// The oracle's sequence generator.
    pub fn generator(&mut self) -> &mut SequenceGenerator<StdRng> {
        self.oracle.generator()
    }

    /// Period of the patterns used by the adaptation cases.
    pub const fn pattern_period(&self) -> usize {
        self.pattern_period
    }

    /// Cap on every bounded search.
    pub const fn simulated_infinity(&self) -> usize {
        self.oracle.simulated_infinity()
    }
}

// ============================================================================
// Test Registration
// ============================================================================

/// A registered conformance case.
pub struct ConformanceTest<C: Cortex> {
    /// Case metadata.
    pub meta: TestMeta,
    /// The case body.
    pub test_fn: fn(&mut TestContext<C>) -> TestResult,
}

impl<C: Cortex> ConformanceTest<C> {
    /// Create a new conformance case.
    pub const fn new(meta: TestMeta, test_fn: fn(&mut TestContext<C>) -> TestResult) -> Self {
        Self { meta, test_fn }
    }

    /// Run the case once.
    pub fn run(&self, ctx: &mut TestContext<C>) -> TestResult {
        (self.test_fn)(ctx)
    }
}

/// The full battery in execution order.
pub fn collect_tests<C: Cortex>() -> Vec<ConformanceTest<C>> {
    tests::all_tests()
}

/// Macro for defining conformance cases.
///
/// # Example
///
/// ```ignore
/// conformance_test! {
///     id: 1,
///     name: "Genesis",
///     rationale: "All cortices begin in a completely blank, bias-free state.",
///     category: TestCategory::State,
///     test: |ctx| {
///         // case body, returning a TestResult
///         TestResult::Passed
///     }
/// }
/// ```
#[macro_export]
macro_rules! conformance_test {
    (
        id: $id:literal,
        name: $name:literal,
        rationale: $rationale:literal,
        category: $cat:expr,
        test: |$ctx:ident| $body:expr
    ) => {{
        fn test_fn<C: $crate::Cortex>($ctx: &mut $crate::TestContext<C>) -> $crate::TestResult {
            $body
        }

        $crate::ConformanceTest::new(
            $crate::TestMeta {
                id: $id,
                name: $name,
                rationale: $rationale,
                category: $cat,
            },
            test_fn,
        )
    }};
}

/// Returns [`TestResult::Failed`] from the enclosing case unless the
/// condition holds. Extra arguments format a diagnostic.
#[macro_export]
macro_rules! ensure {
    ($cond:expr $(,)?) => {
        if !$cond {
            return $crate::TestResult::Failed($crate::Failure::new(
                stringify!($cond),
                file!(),
                line!(),
            ));
        }
    };
    ($cond:expr, $($detail:tt)+) => {
        if !$cond {
            return $crate::TestResult::Failed(
                $crate::Failure::new(stringify!($cond), file!(), line!())
                    .with_detail(format!($($detail)+)),
            );
        }
    };
}

/// Unwraps a setup result, returning [`TestResult::SetupError`] from the
/// enclosing case on error.
#[macro_export]
macro_rules! setup {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(err) => return $crate::TestResult::SetupError(err.to_string()),
        }
    };
}
