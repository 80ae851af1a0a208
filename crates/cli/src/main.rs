mod cli;
mod report;
mod runner;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use logeval_cases::{resolve_patterns, CaseLoader};
use logeval_core::config::{load_dotenv, EvalConfig};
use logeval_detector::LogreduceDetector;
use logeval_scoring::Status;

use crate::cli::CliArgs;
use crate::runner::Runner;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Initialize tracing
    let default_filter = if args.debug { "debug" } else { "warn" };
    let filter = if args.debug {
        tracing_subscriber::EnvFilter::new(default_filter)
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(Status::Success) => ExitCode::SUCCESS,
        Ok(Status::Failed) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<Status> {
    load_dotenv();
    let config = EvalConfig::from_env();
    config.log_summary();

    // Every pattern must match before anything is evaluated.
    let patterns = args.patterns(&config);
    let dirs = resolve_patterns(&patterns)?;

    let options = args.run_options(&config);
    let detector = LogreduceDetector::new(args.detector_bin(&config))
        .with_stderr_passthrough(options.debug);
    let loader = CaseLoader::new(args.case_file(&config));
    let runner = Runner::new(detector, loader, options);

    let cases = runner.load_cases(&dirs)?;
    let models = args.models();
    info!(cases = cases.len(), variants = models.len(), jobs = options.jobs, "starting run");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let verdict = runner.run(&models, &cases, &mut out)?;

    if let Some(path) = &args.report {
        report::write_json(path, &verdict)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
    }

    Ok(verdict.overall())
}
