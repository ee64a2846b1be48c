//! # fatigue CLI entry point
//!
//! Parses command-line arguments, installs logging, loads the policy, and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fatigue_cli::config::{load_engine, run_policy, PolicyArgs};
use fatigue_cli::evaluate::{run_dry_run, run_evaluate, EvaluateArgs};
use fatigue_cli::exception::{run_exception, ExceptionArgs};
use fatigue_cli::schedule::{run_schedule, ScheduleArgs};

/// Fatigue-compliance rule engine for shift scheduling.
///
/// Evaluates candidate shifts against RP-755 fatigue limits, predicts
/// whether a shift could be scheduled, and walks exception requests
/// through review.
#[derive(Parser, Debug)]
#[command(name = "fatigue", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Policy file (YAML, or JSON by extension) overriding default limits.
    #[arg(long, global = true)]
    policy: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every violation for a candidate shift.
    Evaluate(EvaluateArgs),

    /// Predict whether a candidate shift could be scheduled.
    DryRun(EvaluateArgs),

    /// Validate exception requests or run the exception workflow.
    Exception(ExceptionArgs),

    /// Commit a candidate shift through the schedule gate.
    Schedule(ScheduleArgs),

    /// Print the effective policy.
    Policy(PolicyArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = load_engine(cli.policy.as_deref()).and_then(|engine| match &cli.command {
        Commands::Evaluate(args) => run_evaluate(args, &engine),
        Commands::DryRun(args) => run_dry_run(args, &engine),
        Commands::Exception(args) => run_exception(args, &engine),
        Commands::Schedule(args) => run_schedule(args, engine),
        Commands::Policy(args) => run_policy(args, engine.policy()),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
