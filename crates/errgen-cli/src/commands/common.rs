//! Shared helpers for CLI commands.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use errgen_ir::{Circuit, GateSet};
use errgen_prop::{CovarianceSpec, NoiseModel, PropagatorConfig, QuasistaticCovariance};

/// A propagation job: everything needed for one run.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Job {
    pub circuit: Circuit,
    pub noise_model: NoiseModel,
    #[serde(default)]
    pub config: PropagatorConfig,
    /// Quasistatic covariances for non-Markovian runs.
    #[serde(default)]
    pub covariances: Option<Vec<CovarianceSpec>>,
    /// Extra gate names, mapped onto standard gate names.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

impl Job {
    /// The standard gate set plus this job's aliases.
    pub fn gate_set(&self) -> Result<GateSet> {
        self.aliases
            .iter()
            .try_fold(GateSet::standard(), |gates, (alias, target)| {
                gates
                    .with_alias(alias.as_str(), target)
                    .with_context(|| format!("Invalid gate alias '{alias}' -> '{target}'"))
            })
    }

    /// The covariance function, if the job declares one.
    pub fn covariance(&self) -> Result<Option<QuasistaticCovariance>> {
        self.covariances
            .clone()
            .map(QuasistaticCovariance::new)
            .transpose()
            .context("Invalid covariance specification")
    }
}

/// Load a job from a JSON or YAML file (chosen by extension, JSON otherwise).
pub fn load_job(path: &str) -> Result<Job> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        anyhow::bail!("File not found: {path}");
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;

    let ext = path_obj.extension().and_then(|e| e.to_str()).unwrap_or("");
    debug!(path, bytes = source.len(), ext, "loading job");

    match ext.to_lowercase().as_str() {
        "yaml" | "yml" => serde_yaml_ng::from_str(&source)
            .with_context(|| format!("Failed to parse YAML job: {path}")),
        _ => serde_json::from_str(&source)
            .with_context(|| format!("Failed to parse JSON job: {path}")),
    }
}
