//! Propagate command implementation.

use anyhow::{Context, Result};
use console::style;
use std::fs;
use tracing::{debug, info};

use errgen_prop::{ErrorPropagator, PropagationOutput, PropagatorConfig};

use super::common::load_job;

/// Command-line overrides for the job's configuration.
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub bch_order: Option<usize>,
    pub layerwise: bool,
    pub nonmarkovian: bool,
    pub truncation_threshold: Option<f64>,
}

impl ConfigOverrides {
    fn apply(&self, mut config: PropagatorConfig) -> PropagatorConfig {
        if let Some(order) = self.bch_order {
            config = config.with_bch_order(order);
        }
        if self.layerwise {
            config = config.with_bch_layerwise(true);
        }
        if self.nonmarkovian {
            config = config.with_nonmarkovian(true);
        }
        if let Some(threshold) = self.truncation_threshold {
            config = config.with_truncation_threshold(threshold);
        }
        config
    }
}

/// Execute the propagate command.
pub fn execute(input: &str, output: Option<&str>, overrides: &ConfigOverrides, pretty: bool) -> Result<()> {
    let job = load_job(input)?;
    let gate_set = job.gate_set()?;
    let covariance = job.covariance()?;
    let config = overrides.apply(job.config.clone());
    debug!(?config, ?overrides, "resolved propagation config");

    eprintln!(
        "{} Propagating {} ({} qubits, {} layers, {:?} mode)",
        style("→").cyan().bold(),
        style(input).green(),
        job.circuit.num_qubits(),
        job.circuit.depth(),
        config.mode()
    );

    let propagator = ErrorPropagator::new(job.noise_model, gate_set, config)?;
    let result = match &covariance {
        Some(covariance) => propagator.propagate_with_covariance(&job.circuit, covariance)?,
        None => propagator.propagate(&job.circuit)?,
    };

    let terms = match &result {
        PropagationOutput::EndOfCircuit(layer) => layer.len(),
        PropagationOutput::PerTimestep(layers) => layers.iter().map(|l| l.len()).sum(),
    };

    info!(terms, "propagation finished");

    let json = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };

    match output {
        Some(path) => {
            fs::write(path, &json).with_context(|| format!("Failed to write output: {path}"))?;
            eprintln!(
                "{} Wrote {} error generator terms to {}",
                style("✓").green().bold(),
                terms,
                style(path).green()
            );
        }
        None => println!("{json}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_on_top_of_job_config() {
        let overrides = ConfigOverrides {
            bch_order: Some(2),
            layerwise: true,
            ..Default::default()
        };
        let config = overrides.apply(PropagatorConfig::default().with_truncation_threshold(1e-10));
        assert_eq!(config.bch_order, 2);
        assert!(config.bch_layerwise);
        assert!(!config.nonmarkovian);
        assert_eq!(config.truncation_threshold, 1e-10);
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let config = PropagatorConfig::default().with_nonmarkovian(true);
        assert_eq!(ConfigOverrides::default().apply(config.clone()), config);
    }
}
