//! Testbed configuration.
//!
//! [`TestbedConfig`] uses the same fluent, move-based builder style
//! throughout: each method consumes `self` and returns the updated value.
//!
//! ```
//! use agitb::config::{FailurePolicy, PatternPeriod, TestbedConfig};
//!
//! let config = TestbedConfig::default()
//!     .simulated_infinity(1_000)
//!     .repetitions(10)
//!     .pattern_period(PatternPeriod::Fixed(5))
//!     .seed(42)
//!     .failure_policy(FailurePolicy::RunAll);
//! assert!(config.validate().is_ok());
//! ```
//!
//! # Environment overrides
//!
//! [`TestbedConfig::from_env`] layers `AGITB_*` variables over the defaults:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `AGITB_SIMULATED_INFINITY` | `simulated_infinity` |
//! | `AGITB_REPETITIONS` | `repetitions` |
//! | `AGITB_PATTERN_PERIOD` | `pattern_period` (`auto` or a number) |
//! | `AGITB_SEED` | `seed` |
//! | `AGITB_CORTEX_STRENGTH` | `cortex_strength` |
//! | `AGITB_FAILURE_POLICY` | `failure_policy` (`stop` or `all`) |
//! | `AGITB_CONFIRM_LATENCY` | `confirm_latency` |
//! | `AGITB_COLOR` | `color` |
//! | `AGITB_REPORT` | `report_path` |

use crate::error::ConfigError;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Default cap on every bounded search.
pub const DEFAULT_SIMULATED_INFINITY: usize = 5000;

/// Default number of repetitions per case.
pub const DEFAULT_REPETITIONS: usize = 100;

/// Default pattern period.
pub const DEFAULT_PATTERN_PERIOD: usize = 7;

/// Default number of random inputs used to pre-seed a random model.
pub const DEFAULT_CORTEX_STRENGTH: usize = 10;

const ENV_PREFIX: &str = "AGITB_";

/// How the pattern period used by the adaptation cases is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternPeriod {
    /// A fixed period.
    Fixed(usize),
    /// Search the blank model for the longest circular pattern it adapts to.
    Estimated,
}

impl Default for PatternPeriod {
    fn default() -> Self {
        Self::Fixed(DEFAULT_PATTERN_PERIOD)
    }
}

/// What the runner does after a case fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the run at the first failing case.
    #[default]
    StopOnFirst,
    /// Keep going and report every case.
    RunAll,
}

/// Configuration for a testbed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestbedConfig {
    /// Cap on every bounded search and adaptation budget.
    pub simulated_infinity: usize,
    /// Times each case is repeated.
    pub repetitions: usize,
    /// Pattern period for the adaptation cases.
    pub pattern_period: PatternPeriod,
    /// Seed for the randomness source. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Random inputs fed to build a random, non-blank model.
    pub cortex_strength: usize,
    /// Behaviour after a failing case.
    pub failure_policy: FailurePolicy,
    /// Whether to ask the operator for the latency confirmation.
    pub confirm_latency: bool,
    /// ANSI colors in human progress output.
    pub color: bool,
    /// Where to write the JSON run summary.
    pub report_path: Option<PathBuf>,
}

impl Default for TestbedConfig {
    fn default() -> Self {
        Self {
            simulated_infinity: DEFAULT_SIMULATED_INFINITY,
            repetitions: DEFAULT_REPETITIONS,
            pattern_period: PatternPeriod::default(),
            seed: None,
            cortex_strength: DEFAULT_CORTEX_STRENGTH,
            failure_policy: FailurePolicy::default(),
            confirm_latency: true,
            color: true,
            report_path: None,
        }
    }
}

impl TestbedConfig {
    /// Sets the search cap.
    #[must_use]
    pub const fn simulated_infinity(mut self, cap: usize) -> Self {
        self.simulated_infinity = cap;
        self
    }

    /// Sets the repetition count.
    #[must_use]
    pub const fn repetitions(mut self, repetitions: usize) -> Self {
        self.repetitions = repetitions;
        self
    }

    /// Sets how the pattern period is chosen.
    #[must_use]
    pub const fn pattern_period(mut self, period: PatternPeriod) -> Self {
        self.pattern_period = period;
        self
    }

    /// Fixes the random seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the random model strength.
    #[must_use]
    pub const fn cortex_strength(mut self, strength: usize) -> Self {
        self.cortex_strength = strength;
        self
    }

    /// Sets the failure policy.
    #[must_use]
    pub const fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Enables or disables the latency confirmation.
    #[must_use]
    pub const fn confirm_latency(mut self, value: bool) -> Self {
        self.confirm_latency = value;
        self
    }

    /// Enables or disables ANSI colors.
    #[must_use]
    pub const fn color(mut self, value: bool) -> Self {
        self.color = value;
        self
    }

    /// Writes the JSON summary to `path`.
    #[must_use]
    pub fn report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = Some(path.into());
        self
    }

    /// Checks the configuration for values no run can work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simulated_infinity == 0 {
            return Err(ConfigError::ZeroSimulatedInfinity);
        }
        if self.repetitions == 0 {
            return Err(ConfigError::ZeroRepetitions);
        }
        if let PatternPeriod::Fixed(period) = self.pattern_period {
            if period < 2 {
                return Err(ConfigError::PatternPeriodTooShort(period));
            }
        }
        Ok(())
    }

    /// Defaults with `AGITB_*` environment overrides applied, validated.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `AGITB_*` environment variables on top of `self`.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        let mut overrides = BTreeMap::new();
        for (key, value) in std::env::vars() {
            if key.starts_with(ENV_PREFIX) {
                overrides.insert(key, value);
            }
        }
        self.apply_overrides(&overrides)
    }

    /// Applies explicit `AGITB_*` key/value overrides.
    pub fn apply_overrides(
        &mut self,
        overrides: &BTreeMap<String, String>,
    ) -> Result<(), ConfigError> {
        for (key, value) in overrides {
            self.apply_override(key, value)?;
        }
        Ok(())
    }

    fn apply_override(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "AGITB_SIMULATED_INFINITY" => self.simulated_infinity = parse_usize(value, key)?,
            "AGITB_REPETITIONS" => self.repetitions = parse_usize(value, key)?,
            "AGITB_PATTERN_PERIOD" => {
                self.pattern_period = if value.eq_ignore_ascii_case("auto") {
                    PatternPeriod::Estimated
                } else {
                    PatternPeriod::Fixed(parse_usize(value, key)?)
                };
            }
            "AGITB_SEED" => self.seed = Some(parse_u64(value, key)?),
            "AGITB_CORTEX_STRENGTH" => self.cortex_strength = parse_usize(value, key)?,
            "AGITB_FAILURE_POLICY" => {
                self.failure_policy = match value.to_lowercase().as_str() {
                    "stop" | "stop_on_first" => FailurePolicy::StopOnFirst,
                    "all" | "run_all" => FailurePolicy::RunAll,
                    _ => {
                        return Err(ConfigError::Parse(format!(
                            "invalid failure policy for {key}: {value}"
                        )))
                    }
                };
            }
            "AGITB_CONFIRM_LATENCY" => self.confirm_latency = parse_bool(value, key)?,
            "AGITB_COLOR" => self.color = parse_bool(value, key)?,
            "AGITB_REPORT" => {
                self.report_path = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            _ => return Err(ConfigError::InvalidOverride(key.to_owned())),
        }
        Ok(())
    }
}

fn parse_u64(value: &str, key: &str) -> Result<u64, ConfigError> {
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::Parse(format!("invalid u64 for {key}: {value}")))
}

fn parse_usize(value: &str, key: &str) -> Result<usize, ConfigError> {
    value
        .parse::<usize>()
        .map_err(|_| ConfigError::Parse(format!("invalid usize for {key}: {value}")))
}

fn parse_bool(value: &str, key: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::Parse(format!(
            "invalid bool for {key}: {value}"
        ))),
    }
}
