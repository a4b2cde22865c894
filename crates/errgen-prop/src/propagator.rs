//! End-to-end error propagation through a Clifford circuit.
//!
//! The error layer inserted after circuit layer `i` is pushed through layers
//! `i+1..` (the "remaining circuit"), so every result is expressed at the
//! end of the circuit. Layer 0's own tableau is never needed.

use errgen_ir::{Circuit, CliffordTableau, GateSet};
use serde::Serialize;
use tracing::{debug, info};

use crate::bch::BchCombiner;
use crate::config::{PropagationMode, PropagatorConfig};
use crate::covariance::CovarianceFunction;
use crate::cumulant::CumulantExpansion;
use crate::error::{PropError, PropResult};
use crate::layer::{ErrorGeneratorLayer, SignCorrectionMap, sum_orders};
use crate::noise::NoiseModel;
use crate::propagate::propagate_layer;

/// Result of a propagation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropagationOutput {
    /// One layer at the end of the circuit (plain and layerwise BCH modes).
    EndOfCircuit(ErrorGeneratorLayer),
    /// One effective layer per timestep (non-Markovian mode).
    PerTimestep(Vec<ErrorGeneratorLayer>),
}

impl PropagationOutput {
    /// The end-of-circuit layer, if this is one.
    pub fn end_of_circuit(&self) -> Option<&ErrorGeneratorLayer> {
        match self {
            Self::EndOfCircuit(layer) => Some(layer),
            Self::PerTimestep(_) => None,
        }
    }

    /// The per-timestep layers, if these are them.
    pub fn per_timestep(&self) -> Option<&[ErrorGeneratorLayer]> {
        match self {
            Self::EndOfCircuit(_) => None,
            Self::PerTimestep(layers) => Some(layers),
        }
    }

    /// All layers, one for end-of-circuit output.
    pub fn into_layers(self) -> Vec<ErrorGeneratorLayer> {
        match self {
            Self::EndOfCircuit(layer) => vec![layer],
            Self::PerTimestep(layers) => layers,
        }
    }
}

/// Tableau of layers `i+1..` for every layer `i`; the last entry is the
/// identity.
pub fn remaining_circuit_tableaus(tableaus: &[CliffordTableau]) -> PropResult<Vec<CliffordTableau>> {
    let Some(last) = tableaus.last() else {
        return Ok(Vec::new());
    };
    let mut remaining = vec![CliffordTableau::identity(last.num_qubits()); tableaus.len()];
    for i in (0..tableaus.len() - 1).rev() {
        remaining[i] = tableaus[i + 1].then(&remaining[i + 1])?;
    }
    Ok(remaining)
}

/// Propagates gate errors of a noise model through Clifford circuits.
///
/// ```rust
/// use errgen_ir::{Circuit, CircuitLayer, GateInstance, GateSet};
/// use errgen_prop::{ErrorPropagator, GateErrorModel, NoiseModel, PropagatorConfig};
///
/// let noise = NoiseModel::new()
///     .with_gate("Gcnot", GateErrorModel::new().with_term("H(XI)", 0.01).unwrap())
///     .with_gate("Gi", GateErrorModel::new());
/// let circuit = Circuit::with_layers(2, vec![
///     CircuitLayer::new(vec![GateInstance::new("Gcnot", vec![0, 1])]),
///     CircuitLayer::new(vec![GateInstance::new("Gcnot", vec![0, 1])]),
/// ]).unwrap();
///
/// let propagator =
///     ErrorPropagator::new(noise, GateSet::standard(), PropagatorConfig::default()).unwrap();
/// let output = propagator.propagate(&circuit).unwrap();
/// let layer = output.end_of_circuit().unwrap();
///
/// // H(XI) from the first CNOT spreads to H(XX); the second is inserted last.
/// let xx = "H(XX)".parse().unwrap();
/// let xi = "H(XI)".parse().unwrap();
/// assert_eq!(layer.rate(&xx), 0.01);
/// assert_eq!(layer.rate(&xi), 0.01);
/// ```
#[derive(Debug, Clone)]
pub struct ErrorPropagator {
    noise_model: NoiseModel,
    gate_set: GateSet,
    config: PropagatorConfig,
}

impl ErrorPropagator {
    /// Fails if `config` does not validate.
    pub fn new(noise_model: NoiseModel, gate_set: GateSet, config: PropagatorConfig) -> PropResult<Self> {
        config.validate()?;
        Ok(Self {
            noise_model,
            gate_set,
            config,
        })
    }

    /// The per-gate error model.
    pub fn noise_model(&self) -> &NoiseModel {
        &self.noise_model
    }

    /// Gate names the circuit may use.
    pub fn gate_set(&self) -> &GateSet {
        &self.gate_set
    }

    /// The validated configuration.
    pub fn config(&self) -> &PropagatorConfig {
        &self.config
    }

    /// Replace the configuration, keeping the old one if the new one is
    /// rejected.
    pub fn set_config(&mut self, config: PropagatorConfig) -> PropResult<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Error layers of the noise model, one per circuit layer.
    pub fn error_layers(&self, circuit: &Circuit) -> PropResult<Vec<ErrorGeneratorLayer>> {
        self.noise_model.error_layers(circuit)
    }

    /// One tableau per circuit layer.
    pub fn layer_tableaus(&self, circuit: &Circuit) -> PropResult<Vec<CliffordTableau>> {
        Ok(self.gate_set.circuit_tableaus(circuit)?)
    }

    /// Every noise-model error layer pushed to the end of the circuit, with
    /// the sign each term picked up on the way.
    pub fn propagated_layers(
        &self,
        circuit: &Circuit,
    ) -> PropResult<(Vec<ErrorGeneratorLayer>, Vec<SignCorrectionMap>)> {
        let errors = self.error_layers(circuit)?;
        let remaining = remaining_circuit_tableaus(&self.layer_tableaus(circuit)?)?;
        propagate_to_end(&errors, &remaining)
    }

    /// Propagate the noise model's errors through `circuit`.
    pub fn propagate(&self, circuit: &Circuit) -> PropResult<PropagationOutput> {
        self.run(circuit, None, None)
    }

    /// Non-Markovian propagation with cumulant corrections from `covariance`.
    pub fn propagate_with_covariance(
        &self,
        circuit: &Circuit,
        covariance: &dyn CovarianceFunction,
    ) -> PropResult<PropagationOutput> {
        self.run(circuit, None, Some(covariance))
    }

    /// Propagate caller-supplied error layers instead of the noise model's.
    /// There must be one layer per circuit layer.
    pub fn propagate_custom(
        &self,
        circuit: &Circuit,
        error_layers: Vec<ErrorGeneratorLayer>,
        covariance: Option<&dyn CovarianceFunction>,
    ) -> PropResult<PropagationOutput> {
        self.run(circuit, Some(error_layers), covariance)
    }

    fn run(
        &self,
        circuit: &Circuit,
        custom: Option<Vec<ErrorGeneratorLayer>>,
        covariance: Option<&dyn CovarianceFunction>,
    ) -> PropResult<PropagationOutput> {
        self.config.validate()?;
        let mode = self.config.mode();
        if covariance.is_some() && mode != PropagationMode::NonMarkovian {
            return Err(PropError::InvalidConfig(
                "a covariance function requires nonmarkovian = true".into(),
            ));
        }
        if circuit.depth() == 0 {
            return Err(PropError::EmptyCircuit);
        }

        let tableaus = self.layer_tableaus(circuit)?;
        let errors = match custom {
            Some(layers) if layers.len() != circuit.depth() => {
                return Err(PropError::LayerCountMismatch {
                    expected: circuit.depth(),
                    got: layers.len(),
                });
            }
            Some(layers) => layers,
            None => self.error_layers(circuit)?,
        };
        info!(
            num_qubits = circuit.num_qubits(),
            depth = circuit.depth(),
            ?mode,
            "propagating error generators"
        );

        let output = match mode {
            PropagationMode::Plain => {
                let remaining = remaining_circuit_tableaus(&tableaus)?;
                let (propagated, _) = propagate_to_end(&errors, &remaining)?;
                PropagationOutput::EndOfCircuit(sum_orders(&propagated))
            }
            PropagationMode::LayerwiseBch => {
                PropagationOutput::EndOfCircuit(self.fold_layerwise(&errors, &tableaus)?)
            }
            PropagationMode::NonMarkovian => {
                let remaining = remaining_circuit_tableaus(&tableaus)?;
                let (propagated, signs) = propagate_to_end(&errors, &remaining)?;
                match covariance {
                    Some(covariance) => {
                        let engine = CumulantExpansion::new(
                            covariance,
                            self.config.cumulant_order,
                            self.config.truncation_threshold,
                        )?;
                        PropagationOutput::PerTimestep(engine.expand(&propagated, &signs)?)
                    }
                    None => PropagationOutput::PerTimestep(propagated),
                }
            }
        };
        Ok(output)
    }

    /// `acc = [E₀]`, then `acc = combine([E_k], propagate(acc, T_k))`.
    fn fold_layerwise(
        &self,
        errors: &[ErrorGeneratorLayer],
        tableaus: &[CliffordTableau],
    ) -> PropResult<ErrorGeneratorLayer> {
        let bch = BchCombiner::new(self.config.bch_order, self.config.truncation_threshold)?;
        let mut acc = vec![errors[0].clone()];
        for (k, (error, tableau)) in errors.iter().zip(tableaus).enumerate().skip(1) {
            let pushed = acc
                .iter()
                .map(|order| propagate_layer(order, tableau).map(|(layer, _)| layer))
                .collect::<PropResult<Vec<_>>>()?;
            acc = bch.combine(std::slice::from_ref(error), &pushed)?;
            debug!(
                layer = k,
                terms = acc.iter().map(ErrorGeneratorLayer::len).sum::<usize>(),
                "combined error layer"
            );
        }
        Ok(sum_orders(&acc))
    }
}

fn propagate_to_end(
    errors: &[ErrorGeneratorLayer],
    remaining: &[CliffordTableau],
) -> PropResult<(Vec<ErrorGeneratorLayer>, Vec<SignCorrectionMap>)> {
    if errors.len() != remaining.len() {
        return Err(PropError::LayerCountMismatch {
            expected: remaining.len(),
            got: errors.len(),
        });
    }
    let (layers, signs): (Vec<_>, Vec<_>) = errors
        .iter()
        .zip(remaining)
        .map(|(layer, tableau)| propagate_layer(layer, tableau))
        .collect::<PropResult<Vec<_>>>()?
        .into_iter()
        .unzip();
    debug!(layers = layers.len(), "propagated error layers to end of circuit");
    Ok((layers, signs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errorgen::ElementaryErrorgen;
    use crate::noise::GateErrorModel;
    use errgen_ir::{CircuitLayer, CliffordGate, GateInstance};

    fn g(s: &str) -> ElementaryErrorgen {
        s.parse().unwrap()
    }

    fn cnot_then_idle() -> Circuit {
        Circuit::with_layers(
            2,
            vec![
                CircuitLayer::new(vec![GateInstance::new("Gcnot", vec![0, 1])]),
                CircuitLayer::new(vec![
                    GateInstance::new("Gi", vec![0]),
                    GateInstance::new("Gi", vec![1]),
                ]),
            ],
        )
        .unwrap()
    }

    fn noise() -> NoiseModel {
        NoiseModel::new()
            .with_gate("Gcnot", GateErrorModel::new().with_term("H(XI)", 0.01).unwrap())
            .with_gate("Gi", GateErrorModel::new())
    }

    #[test]
    fn test_remaining_tableaus() {
        let cx = CliffordTableau::from_gate(CliffordGate::CX, &[0, 1], 2).unwrap();
        let h = CliffordTableau::from_gate(CliffordGate::H, &[0], 2).unwrap();
        let remaining = remaining_circuit_tableaus(&[cx.clone(), h.clone(), cx.clone()]).unwrap();
        assert_eq!(remaining.len(), 3);
        assert!(remaining[2].is_identity());
        assert_eq!(remaining[1], cx);
        assert_eq!(remaining[0], h.then(&cx).unwrap());
        assert!(remaining_circuit_tableaus(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_error_after_last_layer_is_unchanged() {
        let propagator =
            ErrorPropagator::new(noise(), GateSet::standard(), PropagatorConfig::default()).unwrap();
        let circuit = Circuit::with_layers(
            2,
            vec![CircuitLayer::new(vec![GateInstance::new("Gcnot", vec![0, 1])])],
        )
        .unwrap();
        let output = propagator.propagate(&circuit).unwrap();
        let layer = output.end_of_circuit().unwrap();
        assert_eq!(layer.len(), 1);
        assert_eq!(layer.rate(&g("H(XI)")), 0.01);
    }

    #[test]
    fn test_idle_layer_keeps_generator() {
        let propagator =
            ErrorPropagator::new(noise(), GateSet::standard(), PropagatorConfig::default()).unwrap();
        let output = propagator.propagate(&cnot_then_idle()).unwrap();
        assert_eq!(output.end_of_circuit().unwrap().rate(&g("H(XI)")), 0.01);
    }

    #[test]
    fn test_covariance_requires_nonmarkovian() {
        let propagator =
            ErrorPropagator::new(noise(), GateSet::standard(), PropagatorConfig::default()).unwrap();
        let zero = |_: &ElementaryErrorgen, _: &GateInstance, _: usize, _: &ElementaryErrorgen, _: &GateInstance, _: usize| 0.0;
        assert!(matches!(
            propagator.propagate_with_covariance(&cnot_then_idle(), &zero),
            Err(PropError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_empty_circuit() {
        let propagator =
            ErrorPropagator::new(noise(), GateSet::standard(), PropagatorConfig::default()).unwrap();
        assert!(matches!(
            propagator.propagate(&Circuit::new(2)),
            Err(PropError::EmptyCircuit)
        ));
    }

    #[test]
    fn test_set_config_keeps_old_on_error() {
        let mut propagator =
            ErrorPropagator::new(noise(), GateSet::standard(), PropagatorConfig::default()).unwrap();
        assert!(propagator.set_config(PropagatorConfig::new().with_bch_order(0)).is_err());
        assert_eq!(propagator.config(), &PropagatorConfig::default());
    }

    #[test]
    fn test_propagator_accessors() {
        let propagator = ErrorPropagator::new(
            noise(),
            GateSet::standard(),
            PropagatorConfig::default().with_bch_layerwise(true),
        )
        .unwrap();
        assert_eq!(propagator.noise_model(), &noise());
        assert!(propagator.gate_set().contains("Gcnot"));
        assert_eq!(propagator.config().mode(), PropagationMode::LayerwiseBch);
    }

    #[test]
    fn test_output_accessors() {
        let layer: ErrorGeneratorLayer = [(g("H(X)"), 0.1)].into_iter().collect();
        let end = PropagationOutput::EndOfCircuit(layer.clone());
        assert!(end.per_timestep().is_none());
        assert_eq!(end.clone().into_layers(), vec![layer.clone()]);
        let steps = PropagationOutput::PerTimestep(vec![layer.clone(), layer]);
        assert!(steps.end_of_circuit().is_none());
        assert_eq!(steps.into_layers().len(), 2);
    }
}
