//! Error types for the testbed.
//!
//! Two different things can go wrong while checking a model:
//!
//! - An invariant does not hold. That is an ordinary outcome reported by the
//!   conformance cases, never an [`Error`].
//! - A bounded search that only builds inputs for a check finds nothing
//!   usable within its cap. The check cannot be carried out, so this is
//!   surfaced as [`Error::SearchExhausted`].
//!
//! Configuration problems are reported as [`ConfigError`].

use std::fmt;

/// Errors raised while setting up or running a check.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A bounded search hit its cap without finding a satisfying instance.
    #[error("search for {what} exhausted after {attempts} attempts")]
    SearchExhausted {
        /// What was being searched for.
        what: &'static str,
        /// Number of candidates tried.
        attempts: usize,
    },

    /// Patterns shorter than two inputs cannot be non-trivial and circular.
    #[error("pattern period {0} is too short, need at least 2")]
    InvalidPatternPeriod(usize),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A value could not be parsed.
    Parse(String),
    /// An environment override names an unknown key.
    InvalidOverride(String),
    /// The search cap must be positive.
    ZeroSimulatedInfinity,
    /// Every case must run at least once.
    ZeroRepetitions,
    /// A fixed pattern period below two.
    PatternPeriodTooShort(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "config parse error: {err}"),
            Self::InvalidOverride(key) => write!(f, "invalid override: {key}"),
            Self::ZeroSimulatedInfinity => write!(f, "simulated_infinity must be > 0"),
            Self::ZeroRepetitions => write!(f, "repetitions must be > 0"),
            Self::PatternPeriodTooShort(period) => {
                write!(f, "pattern_period must be >= 2, got {period}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
