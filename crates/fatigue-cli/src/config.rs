//! # Policy Configuration
//!
//! Loads a [`FatiguePolicy`] from `--policy <file>`. Files ending in
//! `.json` are read as JSON, anything else as YAML. Omitted limits keep
//! their RP-755 defaults, and the result is validated before any engine
//! sees it.

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use fatigue_rules::{ComplianceEngine, FatiguePolicy};

use crate::{print_json, EXIT_OK};

/// Load the effective policy: the file's overrides, or the defaults.
pub fn load_policy(path: Option<&Path>) -> Result<FatiguePolicy> {
    let Some(path) = path else {
        tracing::debug!("no policy file given; using defaults");
        return Ok(FatiguePolicy::default());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read policy file {}", path.display()))?;
    let policy: FatiguePolicy = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse policy file {}", path.display()))?
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse policy file {}", path.display()))?
    };
    policy
        .validate()
        .with_context(|| format!("invalid policy in {}", path.display()))?;

    tracing::info!(path = %path.display(), "loaded fatigue policy");
    Ok(policy)
}

/// Build an engine for the effective policy.
pub fn load_engine(path: Option<&Path>) -> Result<ComplianceEngine> {
    let policy = load_policy(path)?;
    ComplianceEngine::with_policy(policy).context("invalid policy")
}

/// Output format for `fatigue policy`.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PolicyFormat {
    #[default]
    Yaml,
    Json,
}

/// Arguments for the `fatigue policy` subcommand.
#[derive(Args, Debug)]
pub struct PolicyArgs {
    /// Output format.
    #[arg(long, value_enum, default_value_t = PolicyFormat::Yaml)]
    pub format: PolicyFormat,
}

/// Print the effective policy.
pub fn run_policy(args: &PolicyArgs, policy: &FatiguePolicy) -> Result<u8> {
    match args.format {
        PolicyFormat::Json => print_json(policy)?,
        PolicyFormat::Yaml => {
            let out = serde_yaml::to_string(policy).context("failed to serialize policy")?;
            print!("{out}");
        }
    }
    Ok(EXIT_OK)
}
