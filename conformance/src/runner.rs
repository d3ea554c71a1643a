//! Battery runner.
//!
//! Runs every registered case the configured number of times, in order,
//! reporting live progress. A case stops at its first non-passing
//! repetition; the run stops at the first non-passing case unless the
//! failure policy says otherwise. The latency confirmation is only asked
//! once every automated case has passed.

use crate::confirm::{Confirmation, StdinConfirmation, LATENCY_QUESTION};
use crate::exit::ExitCode;
use crate::progress::{OutputFormat, ProgressEvent, ProgressReporter};
use crate::report::write_json_report;
use crate::{collect_tests, ConformanceTest, Cortex, TestCategory, TestContext, TestResult};
use agitb::{FailurePolicy, Oracle, PatternPeriod, TestbedConfig};
use serde::{Deserialize, Serialize};
use std::io;
use std::time::Instant;
use tracing::{error, info, warn};

/// Errors that abort a run before a summary can be produced.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// Invalid configuration or an unusable pattern period.
    #[error(transparent)]
    Testbed(#[from] agitb::Error),

    /// Progress, prompt or report output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl RunError {
    /// Exit code matching the error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Testbed(agitb::Error::Config(_)) => ExitCode::USER_ERROR,
            Self::Testbed(_) => ExitCode::SETUP_FAILURE,
            Self::Io(_) => ExitCode::INTERNAL_ERROR,
        }
    }
}

/// Result of running one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseReport {
    /// Position in the battery, starting at 1.
    pub id: u8,
    /// Short case name.
    pub name: String,
    /// Category of the case.
    pub category: TestCategory,
    /// Repetitions that passed before the case finished.
    pub repetitions: usize,
    /// Outcome of the last repetition run.
    pub result: TestResult,
    /// Wall time across all repetitions.
    pub duration_ms: u64,
}

/// Summary of a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Seed the oracle was built from, drawn or configured.
    pub seed: u64,
    /// Resolved period of the adaptation patterns.
    pub pattern_period: usize,
    /// Cap on every bounded search.
    pub simulated_infinity: usize,
    /// Repetitions requested per case.
    pub repetitions: usize,
    /// Registered cases.
    pub total: usize,
    /// Cases whose every repetition passed.
    pub passed: usize,
    /// Cases stopped by an assertion.
    pub failed: usize,
    /// Cases whose inputs could not be built.
    pub setup_errors: usize,
    /// `None` when the question was not asked.
    pub latency_confirmed: Option<bool>,
    /// Wall time of the whole run.
    pub duration_ms: u64,
    /// Reports of the cases that ran, in order.
    pub cases: Vec<CaseReport>,
}

impl RunSummary {
    /// Create an empty summary.
    pub fn new(config: &TestbedConfig, seed: u64, pattern_period: usize) -> Self {
        Self {
            seed,
            pattern_period,
            simulated_infinity: config.simulated_infinity,
            repetitions: config.repetitions,
            total: 0,
            passed: 0,
            failed: 0,
            setup_errors: 0,
            latency_confirmed: None,
            duration_ms: 0,
            cases: Vec::new(),
        }
    }

    /// Records a finished case.
    pub fn record(&mut self, case: CaseReport) {
        match case.result {
            TestResult::Passed => self.passed += 1,
            TestResult::Failed(_) => self.failed += 1,
            TestResult::SetupError(_) => self.setup_errors += 1,
        }
        self.cases.push(case);
    }

    /// True when every registered case ran and passed.
    pub fn all_cases_passed(&self) -> bool {
        self.passed == self.total
    }

    /// Registered cases that never ran.
    pub fn not_run(&self) -> usize {
        self.total - self.cases.len()
    }

    /// The run's exit code, decided by the first non-passing case, then by
    /// the latency confirmation.
    pub fn exit_code(&self) -> i32 {
        for case in &self.cases {
            match case.result {
                TestResult::Passed => {}
                TestResult::Failed(_) => return ExitCode::TEST_FAILURE,
                TestResult::SetupError(_) => return ExitCode::SETUP_FAILURE,
            }
        }
        if self.latency_confirmed == Some(false) {
            ExitCode::CONFIRMATION_DECLINED
        } else {
            ExitCode::SUCCESS
        }
    }
}

/// Runs the battery against model type `C`.
pub struct Runner<C: Cortex> {
    config: TestbedConfig,
    tests: Vec<ConformanceTest<C>>,
    progress: ProgressReporter,
    confirmation: Box<dyn Confirmation>,
}

impl<C: Cortex> Runner<C> {
    /// A runner for the full battery, reporting to standard error and asking
    /// on standard input.
    pub fn new(config: TestbedConfig) -> Self {
        let progress = ProgressReporter::new(OutputFormat::Human).with_color(config.color);
        Self {
            config,
            tests: collect_tests(),
            progress,
            confirmation: Box::new(StdinConfirmation::new()),
        }
    }

    /// Replaces the registered cases.
    #[must_use]
    pub fn with_tests(mut self, tests: Vec<ConformanceTest<C>>) -> Self {
        self.tests = tests;
        self
    }

    /// Replaces the progress reporter.
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// Replaces the source of the latency confirmation.
    #[must_use]
    pub fn with_confirmation(mut self, confirmation: impl Confirmation + 'static) -> Self {
        self.confirmation = Box::new(confirmation);
        self
    }

    /// The configuration.
    pub const fn config(&self) -> &TestbedConfig {
        &self.config
    }

    /// Runs the battery.
    ///
    /// Without a configured seed one is drawn and recorded in the summary,
    /// so any run can be replayed.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration, an estimated pattern period below
    /// two, or output errors. Case failures are not errors; they are
    /// recorded in the summary.
    #[allow(clippy::cast_possible_truncation)]
    pub fn run(&mut self) -> Result<RunSummary, RunError> {
        self.config.validate().map_err(agitb::Error::from)?;
        let start = Instant::now();

        let seed = self.config.seed.unwrap_or_else(rand::random);
        let resolved = self.config.clone().seed(seed);
        let mut oracle = Oracle::<C>::from_config(&resolved);
        let period = match resolved.pattern_period {
            PatternPeriod::Fixed(period) => period,
            PatternPeriod::Estimated => oracle.estimate_pattern_period(),
        };
        if period < 2 {
            return Err(agitb::Error::InvalidPatternPeriod(period).into());
        }

        info!(
            seed,
            period,
            simulated_infinity = resolved.simulated_infinity,
            repetitions = resolved.repetitions,
            "testbed run started"
        );
        self.progress.note("Artificial General Intelligence Testbed")?;
        self.progress.note(format!(
            "Testing with temporal patterns of {period} inputs (seed {seed}):"
        ))?;

        let mut ctx = TestContext::new(oracle, period);
        let mut summary = RunSummary::new(&resolved, seed, period);
        summary.total = self.tests.len();

        for test in &self.tests {
            let case = run_case(test, &mut ctx, resolved.repetitions, &mut self.progress)?;
            let passed = case.result.is_passed();
            summary.record(case);
            if !passed && resolved.failure_policy == FailurePolicy::StopOnFirst {
                break;
            }
        }

        if summary.all_cases_passed() {
            self.progress
                .complete(format!("{} automated cases passed", summary.passed))?;
            if resolved.confirm_latency {
                let confirmed = self.confirmation.confirm(LATENCY_QUESTION)?;
                info!(confirmed, "latency confirmation answered");
                summary.latency_confirmed = Some(confirmed);
            }
        }

        if ExitCode::is_success(summary.exit_code()) {
            self.progress.complete("PASS")?;
        } else {
            self.progress.fail("FAIL")?;
        }

        summary.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            passed = summary.passed,
            failed = summary.failed,
            setup_errors = summary.setup_errors,
            duration_ms = summary.duration_ms,
            "testbed run finished"
        );

        if let Some(path) = &resolved.report_path {
            write_json_report(&summary, path)?;
        }
        Ok(summary)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn run_case<C: Cortex>(
    test: &ConformanceTest<C>,
    ctx: &mut TestContext<C>,
    repetitions: usize,
    progress: &mut ProgressReporter,
) -> io::Result<CaseReport> {
    let meta = test.meta;
    info!(case = meta.id, name = meta.name, "case started");
    progress.start(meta.id, meta.to_string())?;

    let start = Instant::now();
    let mut result = TestResult::Passed;
    let mut completed = 0;
    for repetition in 1..=repetitions {
        progress.update(meta.id, repetition as u64, repetitions as u64)?;
        result = test.run(ctx);
        if !result.is_passed() {
            break;
        }
        completed = repetition;
    }

    match &result {
        TestResult::Passed => {
            info!(case = meta.id, repetitions = completed, "case passed");
        }
        TestResult::Failed(failure) => {
            error!(
                case = meta.id,
                repetition = completed + 1,
                expression = %failure.expression,
                file = %failure.file,
                line = failure.line,
                "assertion failed"
            );
            progress.report(
                ProgressEvent::failed(format!("Assertion failed in {failure}"))
                    .case(meta.id)
                    .elapsed(start.elapsed()),
            )?;
        }
        TestResult::SetupError(message) => {
            warn!(case = meta.id, repetition = completed + 1, %message, "case setup failed");
            progress.report(
                ProgressEvent::failed(format!("Setup error: {message}"))
                    .case(meta.id)
                    .elapsed(start.elapsed()),
            )?;
        }
    }

    Ok(CaseReport {
        id: meta.id,
        name: meta.name.to_owned(),
        category: meta.category,
        repetitions: completed,
        result,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::PresetConfirmation;
    use crate::progress::tests::SharedBuffer;
    use crate::tests::state;
    use crate::Failure;
    use agitb::testing::TransitionMemory;
    use agitb::Spikes;

    type Memory = TransitionMemory<Spikes<6>>;

    fn config() -> TestbedConfig {
        TestbedConfig::default()
            .simulated_infinity(50)
            .repetitions(2)
            .pattern_period(PatternPeriod::Fixed(4))
            .seed(17)
            .color(false)
    }

    fn quiet_runner(config: TestbedConfig) -> (Runner<Memory>, SharedBuffer) {
        let buffer = SharedBuffer::default();
        let runner = Runner::<Memory>::new(config)
            .with_tests(state::tests())
            .with_progress(ProgressReporter::with_writer(
                OutputFormat::Human,
                buffer.clone(),
            ));
        (runner, buffer)
    }

    #[test]
    fn passing_battery_asks_for_confirmation() {
        crate::test_utils::init_test_logging();
        crate::test_phase!("passing_battery_asks_for_confirmation");
        let (runner, buffer) = quiet_runner(config());
        let mut runner = runner.with_confirmation(PresetConfirmation(true));
        let summary = runner.run().unwrap();

        crate::assert_with_log!(
            summary.exit_code() == ExitCode::SUCCESS,
            "exit code",
            ExitCode::SUCCESS,
            summary.exit_code()
        );
        assert_eq!(summary.total, 5);
        assert_eq!(summary.passed, 5);
        assert_eq!(summary.latency_confirmed, Some(true));
        assert!(summary.cases.iter().all(|case| case.repetitions == 2));
        let out = buffer.contents();
        assert!(out.starts_with("Artificial General Intelligence Testbed\n"));
        assert!(out.contains("#3 Determinism (Identical experiences produce an identical state.)"));
        assert!(out.ends_with("PASS\n"));
        crate::test_complete!("passing_battery_asks_for_confirmation");
    }

    #[test]
    fn declined_confirmation_has_its_own_exit_code() {
        let (runner, _) = quiet_runner(config());
        let mut runner = runner.with_confirmation(PresetConfirmation(false));
        let summary = runner.run().unwrap();
        assert_eq!(summary.latency_confirmed, Some(false));
        assert_eq!(summary.exit_code(), ExitCode::CONFIRMATION_DECLINED);
    }

    #[test]
    fn confirmation_can_be_skipped() {
        let (runner, _) = quiet_runner(config().confirm_latency(false));
        let mut runner = runner.with_confirmation(PresetConfirmation(false));
        let summary = runner.run().unwrap();
        assert_eq!(summary.latency_confirmed, None);
        assert_eq!(summary.exit_code(), ExitCode::SUCCESS);
    }

    #[test]
    fn drawn_seed_is_recorded_in_the_report() {
        let path = std::env::temp_dir()
            .join(format!("agitb-runner-{}", std::process::id()))
            .join("summary.json");
        let mut config = config().confirm_latency(false).report_path(&path);
        config.seed = None;
        let (mut runner, _) = quiet_runner(config);
        let summary = runner.run().unwrap();

        let written: RunSummary =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, summary);
        assert_eq!(written.pattern_period, 4);
        assert_eq!(written.simulated_infinity, 50);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn failed_case_event_names_the_case() {
        crate::test_utils::init_test_logging();
        crate::test_phase!("failed_case_event_names_the_case");
        let buffer = SharedBuffer::default();
        let mut runner = Runner::<agitb::testing::Amnesiac<Spikes<6>>>::new(config())
            .with_tests(state::tests())
            .with_progress(ProgressReporter::with_writer(
                OutputFormat::Json,
                buffer.clone(),
            ));
        let summary = runner.run().unwrap();
        assert!(ExitCode::is_failure(summary.exit_code()));

        let out = buffer.contents();
        let failed: Vec<serde_json::Value> = out
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .filter(|event: &serde_json::Value| event["kind"] == "failed")
            .collect();
        crate::assert_with_log!(
            failed.first().is_some_and(|event| event["case"] == 4),
            "first failure names Sensitivity",
            4,
            failed.first()
        );
        crate::test_complete!("failed_case_event_names_the_case");
    }

    #[test]
    fn invalid_config_is_a_user_error() {
        let (mut runner, _) = quiet_runner(config().repetitions(0));
        let err = runner.run().unwrap_err();
        assert_eq!(err.exit_code(), ExitCode::USER_ERROR);
    }

    #[test]
    fn exit_code_follows_first_non_passing_case() {
        let mut summary = RunSummary::new(&config(), 1, 4);
        summary.total = 3;
        let case = |id: u8, result: TestResult| CaseReport {
            id,
            name: format!("case {id}"),
            category: TestCategory::State,
            repetitions: 0,
            result,
            duration_ms: 0,
        };
        summary.record(case(1, TestResult::Passed));
        summary.record(case(2, TestResult::SetupError("none".into())));
        summary.record(case(
            3,
            TestResult::Failed(Failure::new("false", "x.rs", 1)),
        ));
        assert_eq!(summary.exit_code(), ExitCode::SETUP_FAILURE);
        assert_eq!((summary.passed, summary.failed, summary.setup_errors), (1, 1, 1));
        assert!(!summary.all_cases_passed());
        assert_eq!(summary.not_run(), 0);
    }
}
