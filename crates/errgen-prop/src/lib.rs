//! `errgen-prop`: sparse error-generator propagation for Clifford circuits.
//!
//! Gate noise is described by elementary error generators (Hamiltonian,
//! stochastic, correlation and active terms) inserted after every circuit
//! layer. Instead of simulating dense channels, this crate pushes those
//! generators through the remaining Clifford layers by conjugation and
//! combines them at the end of the circuit:
//!
//! - **Plain** propagation sums every propagated layer (first-order BCH)
//! - **Layerwise BCH** folds layers pairwise with the first commutator term
//! - **Non-Markovian** propagation returns per-timestep layers with
//!   second-order cumulant corrections from a [`CovarianceFunction`]
//!
//! # Quick start
//!
//! ```rust
//! use errgen_ir::{Circuit, CircuitLayer, GateInstance, GateSet};
//! use errgen_prop::{ErrorPropagator, GateErrorModel, NoiseModel, PropagatorConfig};
//!
//! let noise = NoiseModel::new()
//!     .with_gate("Gh", GateErrorModel::new().with_term("S(Z)", 1e-3).unwrap());
//! let circuit = Circuit::with_layers(1, vec![
//!     CircuitLayer::new(vec![GateInstance::new("Gh", vec![0])]),
//!     CircuitLayer::new(vec![GateInstance::new("Gh", vec![0])]),
//! ]).unwrap();
//!
//! let propagator =
//!     ErrorPropagator::new(noise, GateSet::standard(), PropagatorConfig::default()).unwrap();
//! let layer = propagator.propagate(&circuit).unwrap().into_layers().remove(0);
//!
//! // Dephasing after the first H becomes bit-flip noise after the second.
//! assert_eq!(layer.rate(&"S(X)".parse().unwrap()), 1e-3);
//! assert_eq!(layer.rate(&"S(Z)".parse().unwrap()), 1e-3);
//! ```
//!
//! # Generator conventions
//!
//! `H_P[ρ] = -i[P, ρ]`, `S_P[ρ] = PρP - ρ`,
//! `C_{P,Q}[ρ] = PρQ + QρP - ½{{P,Q}, ρ}`,
//! `A_{P,Q}[ρ] = i(PρQ - QρP + ½{[P,Q], ρ})`.

pub mod algebra;
pub mod bch;
pub mod config;
pub mod covariance;
pub mod cumulant;
pub mod dense;
pub mod error;
pub mod errorgen;
pub mod layer;
pub mod noise;
pub mod propagate;
pub mod propagator;

pub use bch::BchCombiner;
pub use config::{PropagationMode, PropagatorConfig};
pub use covariance::{CovarianceFunction, CovarianceSpec, CovarianceTerm, QuasistaticCovariance};
pub use cumulant::CumulantExpansion;
pub use dense::OperatorBasis;
pub use error::{PropError, PropResult};
pub use errorgen::{ElementaryErrorgen, ErrorGeneratorLabel, ErrorgenKind, Provenance};
pub use layer::{ErrorGeneratorLayer, SignCorrectionMap, sum_orders};
pub use noise::{GateErrorModel, GateErrorTerm, LocalErrorgen, NoiseModel};
pub use propagate::{PropagatedErrorgen, propagate_errorgen, propagate_layer};
pub use propagator::{ErrorPropagator, PropagationOutput, remaining_circuit_tableaus};
