//! End-to-end runs of the full battery against the reference models.
//!
//! Run with: `cargo test -p agitb-conformance --test runner_e2e`

use agitb::testing::{Amnesiac, Bounded, TransitionMemory};
use agitb::{CanonicalInput, FailurePolicy, PatternPeriod, TestbedConfig};
use agitb_conformance::report::render_table;
use agitb_conformance::{
    ExitCode, OutputFormat, PresetConfirmation, ProgressReporter, RunSummary, Runner, TestResult,
};
use std::io;

fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_test_writer()
        .try_init();
}

macro_rules! test_phase {
    ($name:expr) => {
        tracing::info!(test = $name, "=== TEST START ===");
    };
}

fn config(seed: u64) -> TestbedConfig {
    TestbedConfig::default()
        .simulated_infinity(60)
        .repetitions(3)
        .pattern_period(PatternPeriod::Fixed(7))
        .seed(seed)
        .color(false)
}

type Frozen = Bounded<CanonicalInput, 12>;

fn run<C: agitb::Cortex>(config: TestbedConfig) -> RunSummary {
    run_confirming::<C>(config, true)
}

fn run_confirming<C: agitb::Cortex>(config: TestbedConfig, answer: bool) -> RunSummary {
    Runner::<C>::new(config)
        .with_progress(ProgressReporter::with_writer(OutputFormat::Json, io::sink()))
        .with_confirmation(PresetConfirmation(answer))
        .run()
        .unwrap()
}

#[test]
fn frozen_memory_passes_every_case() {
    init_test_logging();
    test_phase!("frozen_memory_passes_every_case");
    let summary = run_confirming::<Frozen>(config(7).simulated_infinity(100), true);

    assert_eq!(summary.cases.len(), 12);
    assert_eq!(summary.passed, 12);
    assert!(summary.cases.iter().all(|case| case.repetitions == 3));
    assert!(summary.all_cases_passed());
    assert_eq!(summary.latency_confirmed, Some(true));
    assert_eq!(summary.exit_code(), ExitCode::SUCCESS);
    assert!(render_table(&summary).contains("latency: confirmed"));
}

#[test]
fn declined_latency_fails_an_otherwise_clean_run() {
    init_test_logging();
    test_phase!("declined_latency_fails_an_otherwise_clean_run");
    let summary = run_confirming::<Frozen>(config(7).simulated_infinity(100), false);

    assert_eq!(summary.passed, 12);
    assert_eq!(summary.latency_confirmed, Some(false));
    assert_eq!(summary.exit_code(), ExitCode::CONFIRMATION_DECLINED);
    assert_eq!(summary.exit_code(), 11);
    assert!(render_table(&summary).contains("latency: declined"));
}

#[test]
fn reference_memory_stops_at_stagnation() {
    init_test_logging();
    test_phase!("reference_memory_stops_at_stagnation");
    let summary = run::<TransitionMemory<CanonicalInput>>(config(7));

    assert_eq!(summary.total, 12);
    assert_eq!(summary.cases.len(), 8);
    assert!(summary.cases[..7].iter().all(|case| case.result.is_passed()));
    assert!(summary.cases[..7].iter().all(|case| case.repetitions == 3));
    let stagnation = &summary.cases[7];
    assert_eq!(stagnation.name, "Stagnation");
    assert!(matches!(stagnation.result, TestResult::Failed(_)));
    assert_eq!(summary.latency_confirmed, None);
    assert_eq!(summary.exit_code(), ExitCode::TEST_FAILURE);

    let table = render_table(&summary);
    assert!(table.contains("4 case(s) not run"));
}

#[test]
fn amnesiac_fails_sensitivity_first() {
    init_test_logging();
    test_phase!("amnesiac_fails_sensitivity_first");
    let summary = run::<Amnesiac<CanonicalInput>>(config(3));

    assert_eq!(summary.cases.len(), 4);
    assert_eq!(summary.passed, 3);
    let sensitivity = &summary.cases[3];
    assert_eq!(sensitivity.id, 4);
    assert_eq!(sensitivity.repetitions, 0);
    match &sensitivity.result {
        TestResult::Failed(failure) => assert_eq!(failure.expression, "c != d"),
        other => panic!("expected an assertion failure, got {other:?}"),
    }
}

#[test]
fn run_all_reports_every_case() {
    init_test_logging();
    test_phase!("run_all_reports_every_case");
    let summary = run::<Amnesiac<CanonicalInput>>(
        config(3).failure_policy(FailurePolicy::RunAll),
    );

    assert_eq!(summary.cases.len(), 12);
    let ids: Vec<u8> = summary.cases.iter().map(|case| case.id).collect();
    assert_eq!(ids, (1..=12).collect::<Vec<u8>>());
    assert!(matches!(summary.cases[7].result, TestResult::SetupError(_)));
    assert!(matches!(summary.cases[9].result, TestResult::SetupError(_)));
    assert!(summary.cases[10].result.is_passed());
    assert_eq!(
        summary.passed + summary.failed + summary.setup_errors,
        summary.total
    );
    // The first non-passing case is an assertion failure.
    assert_eq!(summary.exit_code(), ExitCode::TEST_FAILURE);
    assert_eq!(summary.latency_confirmed, None);
}

#[test]
fn estimated_period_is_reported() {
    init_test_logging();
    test_phase!("estimated_period_is_reported");
    let summary = run::<TransitionMemory<CanonicalInput>>(
        config(5)
            .simulated_infinity(30)
            .repetitions(1)
            .pattern_period(PatternPeriod::Estimated),
    );
    assert!((2..=30).contains(&summary.pattern_period));
}

#[test]
fn a_model_that_learns_nothing_cannot_estimate_a_period() {
    init_test_logging();
    test_phase!("a_model_that_learns_nothing_cannot_estimate_a_period");
    let err = Runner::<Amnesiac<CanonicalInput>>::new(
        config(5).pattern_period(PatternPeriod::Estimated),
    )
    .with_progress(ProgressReporter::with_writer(OutputFormat::Json, io::sink()))
    .run()
    .unwrap_err();
    assert_eq!(err.exit_code(), ExitCode::SETUP_FAILURE);
}
