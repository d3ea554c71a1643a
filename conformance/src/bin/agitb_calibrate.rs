//! Runs the conformance battery against the reference transition-memory
//! model.
//!
//! The reference model fails Stagnation by construction, so a healthy
//! calibration run ends with exit code 10 after case #8. Any earlier
//! failure points at the testbed, not the model.

use agitb::testing::TransitionMemory;
use agitb::{CanonicalInput, FailurePolicy, PatternPeriod, TestbedConfig};
use agitb_conformance::report::render_table;
use agitb_conformance::{
    ExitCode, OutputFormat, PresetConfirmation, ProgressReporter, RunSummary, Runner,
};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "agitb-calibrate",
    version,
    about = "Run the agitb battery against the reference model"
)]
struct Cli {
    /// Seed for the randomness source
    #[arg(long)]
    seed: Option<u64>,

    /// Repetitions per case
    #[arg(short = 'n', long)]
    repetitions: Option<usize>,

    /// Cap on searches and adaptation budgets
    #[arg(long = "simulated-infinity")]
    simulated_infinity: Option<usize>,

    /// Pattern period, or "auto" to estimate it
    #[arg(short = 'p', long = "pattern-period")]
    pattern_period: Option<String>,

    /// Keep running after a failing case
    #[arg(long = "run-all", action = ArgAction::SetTrue)]
    run_all: bool,

    /// Answer the latency question without prompting: y or n
    #[arg(long = "latency")]
    latency: Option<char>,

    /// Emit progress as JSON lines
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Disable colors
    #[arg(long = "no-color", action = ArgAction::SetTrue)]
    no_color: bool,

    /// Write the run summary as JSON
    #[arg(long)]
    report: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbosity: u8,
}

impl Cli {
    fn config(&self) -> Result<TestbedConfig, agitb::ConfigError> {
        let mut config = TestbedConfig::from_env()?;
        if let Some(seed) = self.seed {
            config = config.seed(seed);
        }
        if let Some(repetitions) = self.repetitions {
            config = config.repetitions(repetitions);
        }
        if let Some(cap) = self.simulated_infinity {
            config = config.simulated_infinity(cap);
        }
        if let Some(period) = &self.pattern_period {
            config = config.pattern_period(parse_period(period)?);
        }
        if self.run_all {
            config = config.failure_policy(FailurePolicy::RunAll);
        }
        if self.no_color {
            config = config.color(false);
        }
        if let Some(path) = &self.report {
            config = config.report_path(path);
        }
        config.validate()?;
        Ok(config)
    }

    fn log_filter(&self) -> EnvFilter {
        let level = match self.verbosity {
            0 => "warn",
            1 => "info",
            _ => "debug",
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    }
}

fn parse_period(value: &str) -> Result<PatternPeriod, agitb::ConfigError> {
    if value.eq_ignore_ascii_case("auto") {
        return Ok(PatternPeriod::Estimated);
    }
    value
        .parse()
        .map(PatternPeriod::Fixed)
        .map_err(|_| agitb::ConfigError::Parse(format!("invalid pattern period: {value}")))
}

fn main() {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(cli.log_filter())
        .with_writer(std::io::stderr)
        .init();

    let config = match cli.config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("agitb-calibrate: {err}");
            std::process::exit(ExitCode::USER_ERROR);
        }
    };

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };
    let color = config.color;
    let mut runner = Runner::<TransitionMemory<CanonicalInput>>::new(config)
        .with_progress(ProgressReporter::new(format).with_color(color));
    if let Some(answer) = cli.latency {
        runner = runner.with_confirmation(PresetConfirmation(matches!(answer, 'y' | 'Y')));
    }

    match runner.run() {
        Ok(summary) => finish(&summary, cli.json),
        Err(err) => {
            eprintln!("agitb-calibrate: {err}");
            std::process::exit(err.exit_code());
        }
    }
}

fn finish(summary: &RunSummary, json: bool) -> ! {
    if json {
        match serde_json::to_string(summary) {
            Ok(line) => println!("{line}"),
            Err(err) => {
                eprintln!("agitb-calibrate: {err}");
                std::process::exit(ExitCode::INTERNAL_ERROR);
            }
        }
    } else {
        print!("{}", render_table(summary));
    }
    let code = summary.exit_code();
    if ExitCode::is_failure(code) {
        eprintln!("agitb-calibrate: {}", ExitCode::description(code));
    }
    std::process::exit(code)
}
