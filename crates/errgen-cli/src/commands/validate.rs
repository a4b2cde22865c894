//! Validate command implementation.

use anyhow::{Context, Result};
use console::style;

use errgen_prop::ErrorPropagator;

use super::common::load_job;

/// Execute the validate command: load the job and build everything a
/// propagation run needs, without propagating.
pub fn execute(input: &str) -> Result<()> {
    let job = load_job(input)?;
    let gate_set = job.gate_set()?;
    let covariance = job.covariance()?;

    let propagator = ErrorPropagator::new(job.noise_model, gate_set, job.config)
        .context("Invalid propagator configuration")?;
    propagator
        .layer_tableaus(&job.circuit)
        .context("Circuit uses gates outside the gate set")?;
    let layers = propagator
        .error_layers(&job.circuit)
        .context("Noise model does not cover the circuit")?;

    println!("{} {} is valid", style("✓").green().bold(), style(input).green());
    println!(
        "  Circuit: {} qubits, {} layers",
        job.circuit.num_qubits(),
        job.circuit.depth()
    );
    println!(
        "  Error terms: {}",
        layers.iter().map(|layer| layer.len()).sum::<usize>()
    );
    println!("  Mode: {:?}", propagator.config().mode());
    if let Some(covariance) = covariance {
        println!("  Covariance parameters: {}", covariance.num_params());
    }

    Ok(())
}
