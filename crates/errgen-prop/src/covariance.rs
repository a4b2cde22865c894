//! Covariance functions for non-Markovian noise.
//!
//! A covariance function returns `E[r₁(t₁) r₂(t₂)]` for the rates of two
//! error generators, identified by their pre-propagation form, the gate that
//! produced them and the circuit time. Pairs it knows nothing about have zero
//! covariance.

use errgen_ir::GateInstance;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{PropError, PropResult};
use crate::errorgen::ElementaryErrorgen;

/// Covariance between two error-generator rates.
///
/// Implementations must be symmetric under swapping the two
/// `(errgen, gate, time)` triples. Any closure with the same signature is a
/// covariance function.
pub trait CovarianceFunction {
    /// `cov(errgen1 @ gate1, time1; errgen2 @ gate2, time2)`.
    fn covariance(
        &self,
        errgen1: &ElementaryErrorgen,
        gate1: &GateInstance,
        time1: usize,
        errgen2: &ElementaryErrorgen,
        gate2: &GateInstance,
        time2: usize,
    ) -> f64;
}

impl<F> CovarianceFunction for F
where
    F: Fn(&ElementaryErrorgen, &GateInstance, usize, &ElementaryErrorgen, &GateInstance, usize) -> f64,
{
    fn covariance(
        &self,
        errgen1: &ElementaryErrorgen,
        gate1: &GateInstance,
        time1: usize,
        errgen2: &ElementaryErrorgen,
        gate2: &GateInstance,
        time2: usize,
    ) -> f64 {
        self(errgen1, gate1, time1, errgen2, gate2, time2)
    }
}

/// One covariance entry: a single generator (autocorrelation over time) or
/// a pair (cross-correlation), with its variance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CovarianceTerm {
    /// One or two full-width generators.
    pub errgens: Vec<ElementaryErrorgen>,
    /// `σ²`.
    #[serde(default)]
    pub variance: f64,
}

/// Covariances attached to one gate, or shared between two gates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CovarianceSpec {
    /// One or two gate instances.
    pub gates: Vec<GateInstance>,
    /// The correlated generators.
    pub terms: Vec<CovarianceTerm>,
}

/// All orderings of one or two items.
fn symmetric_pairs<T: Clone>(items: &[T], what: &str) -> PropResult<Vec<(T, T)>> {
    match items {
        [a] => Ok(vec![(a.clone(), a.clone())]),
        [a, b] => Ok(vec![(a.clone(), b.clone()), (b.clone(), a.clone())]),
        _ => Err(PropError::InvalidCovariance(format!(
            "expected one or two {what}, got {}",
            items.len()
        ))),
    }
}

type CovarianceKey = (GateInstance, ElementaryErrorgen, GateInstance, ElementaryErrorgen);

/// Covariance of a quasistatic (DC) noise process: `cov = σ²` regardless of
/// the two circuit times.
///
/// ```rust
/// use errgen_ir::GateInstance;
/// use errgen_prop::{CovarianceFunction, CovarianceSpec, CovarianceTerm, QuasistaticCovariance};
///
/// let gate = GateInstance::new("Gcnot", vec![0, 1]);
/// let hx = "H(XI)".parse().unwrap();
/// let cov = QuasistaticCovariance::new(vec![CovarianceSpec {
///     gates: vec![gate.clone()],
///     terms: vec![CovarianceTerm { errgens: vec![hx], variance: 1e-4 }],
/// }])
/// .unwrap();
///
/// let hx = "H(XI)".parse().unwrap();
/// assert_eq!(cov.covariance(&hx, &gate, 0, &hx, &gate, 7), 1e-4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct QuasistaticCovariance {
    param_index: FxHashMap<CovarianceKey, usize>,
    variances: Vec<f64>,
}

impl QuasistaticCovariance {
    /// Register every term of every spec. Each term owns one variance
    /// parameter, shared by all symmetric orderings of its gates and
    /// generators.
    pub fn new(specs: Vec<CovarianceSpec>) -> PropResult<Self> {
        let mut cov = Self::default();
        for spec in specs {
            let gate_pairs = symmetric_pairs(&spec.gates, "gate labels")?;
            for term in spec.terms {
                let errgen_pairs = symmetric_pairs(&term.errgens, "error generators per term")?;
                if !term.variance.is_finite() {
                    return Err(PropError::InvalidCovariance(format!(
                        "variance {} is not finite",
                        term.variance
                    )));
                }
                let idx = cov.variances.len();
                for (g1, g2) in &gate_pairs {
                    for (e1, e2) in &errgen_pairs {
                        cov.param_index
                            .insert((g1.clone(), e1.clone(), g2.clone(), e2.clone()), idx);
                    }
                }
                cov.variances.push(term.variance);
            }
        }
        Ok(cov)
    }

    /// Number of variance parameters.
    pub fn num_params(&self) -> usize {
        self.variances.len()
    }

    /// Current variances, in registration order.
    pub fn to_vector(&self) -> &[f64] {
        &self.variances
    }

    /// Replace all variances.
    pub fn from_vector(&mut self, values: &[f64]) -> PropResult<()> {
        if values.len() != self.variances.len() {
            return Err(PropError::InvalidCovariance(format!(
                "expected {} parameters, got {}",
                self.variances.len(),
                values.len()
            )));
        }
        self.variances.copy_from_slice(values);
        Ok(())
    }
}

impl CovarianceFunction for QuasistaticCovariance {
    fn covariance(
        &self,
        errgen1: &ElementaryErrorgen,
        gate1: &GateInstance,
        _time1: usize,
        errgen2: &ElementaryErrorgen,
        gate2: &GateInstance,
        _time2: usize,
    ) -> f64 {
        let key = (gate1.clone(), errgen1.clone(), gate2.clone(), errgen2.clone());
        self.param_index
            .get(&key)
            .map_or(0.0, |&idx| self.variances[idx])
    }
}
