//! Per-gate error models and error-layer construction.
//!
//! A [`NoiseModel`] maps gate names to a [`GateErrorModel`]: a list of
//! gate-local error generators with rates. Building the error layer for a
//! circuit layer embeds each gate's local patterns at the gate's target
//! qubits, with identity on every other qubit.
//!
//! In job files a noise model reads:
//!
//! ```json
//! {
//!   "Gcnot": [
//!     { "errgen": "H(XI)", "rate": 0.01 },
//!     { "errgen": "C(XI,IZ)", "rate": 0.002 }
//!   ],
//!   "Gi": [{ "errgen": "S(Z)", "rate": 0.001 }]
//! }
//! ```

use errgen_ir::{Circuit, CircuitLayer, GateInstance, PauliString};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::{PropError, PropResult};
use crate::errorgen::{ElementaryErrorgen, ErrorGeneratorLabel, ErrorgenKind, parse_errgen_syntax};
use crate::layer::ErrorGeneratorLayer;

/// A gate-local error generator: Pauli patterns over the gate's own qubits,
/// in the gate's argument order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LocalErrorgen {
    /// Hamiltonian error.
    H(PauliString),
    /// Stochastic error.
    S(PauliString),
    /// Correlation error between two patterns.
    C(PauliString, PauliString),
    /// Active error between two patterns.
    A(PauliString, PauliString),
}

impl LocalErrorgen {
    /// Build a validated local generator.
    pub fn new(kind: ErrorgenKind, first: PauliString, second: Option<PauliString>) -> PropResult<Self> {
        let errgen = match (kind, second) {
            (ErrorgenKind::H, None) => LocalErrorgen::H(first),
            (ErrorgenKind::S, None) => LocalErrorgen::S(first),
            (ErrorgenKind::C, Some(second)) => LocalErrorgen::C(first, second),
            (ErrorgenKind::A, Some(second)) => LocalErrorgen::A(first, second),
            (kind, _) => {
                return Err(PropError::InvalidErrorgen(format!(
                    "{} errors take {} pattern(s)",
                    kind.as_char(),
                    kind.arity()
                )));
            }
        };
        errgen.validate()?;
        Ok(errgen)
    }

    /// Generator type.
    pub fn kind(&self) -> ErrorgenKind {
        match self {
            LocalErrorgen::H(_) => ErrorgenKind::H,
            LocalErrorgen::S(_) => ErrorgenKind::S,
            LocalErrorgen::C(..) => ErrorgenKind::C,
            LocalErrorgen::A(..) => ErrorgenKind::A,
        }
    }

    /// The one or two patterns.
    pub fn patterns(&self) -> (&PauliString, Option<&PauliString>) {
        match self {
            LocalErrorgen::H(p) | LocalErrorgen::S(p) => (p, None),
            LocalErrorgen::C(p, q) | LocalErrorgen::A(p, q) => (p, Some(q)),
        }
    }

    fn validate(&self) -> PropResult<()> {
        let (first, second) = self.patterns();
        for pattern in std::iter::once(first).chain(second) {
            if pattern.is_identity() {
                return Err(PropError::InvalidErrorgen(format!(
                    "error pattern '{pattern}' in {self} is the identity"
                )));
            }
        }
        if let Some(second) = second {
            if second.num_qubits() != first.num_qubits() {
                return Err(PropError::InvalidErrorgen(format!(
                    "patterns of {self} have different lengths"
                )));
            }
            if second == first {
                return Err(PropError::InvalidErrorgen(format!(
                    "patterns of {self} are equal"
                )));
            }
        }
        Ok(())
    }

    /// Embed at a gate's qubits in a `num_qubits`-wide register. Returns
    /// the full-width generator and the rate sign from canonical ordering.
    pub fn embed(&self, gate: &GateInstance, num_qubits: usize) -> PropResult<(ElementaryErrorgen, f64)> {
        let embed_one = |pattern: &PauliString| -> PropResult<PauliString> {
            if pattern.num_qubits() != gate.qubits.len() {
                return Err(PropError::PatternArity {
                    gate: gate.to_string(),
                    pattern: pattern.to_string(),
                    expected: gate.qubits.len(),
                    got: pattern.num_qubits(),
                });
            }
            if let Some(&qubit) = gate.qubits.iter().find(|&&q| q >= num_qubits) {
                return Err(PropError::QubitOutOfRange {
                    gate: gate.to_string(),
                    qubit,
                    num_qubits,
                });
            }
            let ops = gate.qubits.iter().copied().zip(pattern.ops().iter().copied());
            Ok(PauliString::from_sparse(num_qubits, ops)?)
        };
        let (first, second) = self.patterns();
        ElementaryErrorgen::from_parts(self.kind(), embed_one(first)?, second.map(embed_one).transpose()?)
    }
}

impl fmt::Display for LocalErrorgen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.patterns() {
            (p, None) => write!(f, "{}({p})", self.kind().as_char()),
            (p, Some(q)) => write!(f, "{}({p},{q})", self.kind().as_char()),
        }
    }
}

impl FromStr for LocalErrorgen {
    type Err = PropError;

    fn from_str(s: &str) -> PropResult<Self> {
        let (kind, first, second) = parse_errgen_syntax(s)?;
        Self::new(kind, first, second)
    }
}

impl TryFrom<String> for LocalErrorgen {
    type Error = PropError;

    fn try_from(s: String) -> PropResult<Self> {
        s.parse()
    }
}

impl From<LocalErrorgen> for String {
    fn from(errgen: LocalErrorgen) -> Self {
        errgen.to_string()
    }
}

/// One error term of a gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateErrorTerm {
    /// The gate-local generator.
    pub errgen: LocalErrorgen,
    /// Its rate.
    pub rate: f64,
}

/// All error terms attached to one gate name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GateErrorModel {
    terms: Vec<GateErrorTerm>,
}

impl GateErrorModel {
    /// A gate without errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a term.
    #[must_use]
    pub fn with(mut self, errgen: LocalErrorgen, rate: f64) -> Self {
        self.terms.push(GateErrorTerm { errgen, rate });
        self
    }

    /// Parse and add a term, e.g. `with_term("H(XI)", 0.01)`.
    pub fn with_term(self, errgen: &str, rate: f64) -> PropResult<Self> {
        Ok(self.with(errgen.parse()?, rate))
    }

    /// The terms.
    pub fn terms(&self) -> &[GateErrorTerm] {
        &self.terms
    }
}

/// Gate name → error model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoiseModel {
    gates: BTreeMap<String, GateErrorModel>,
}

impl NoiseModel {
    /// An empty noise model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the model for a gate name.
    pub fn insert(&mut self, gate: impl Into<String>, model: GateErrorModel) {
        self.gates.insert(gate.into(), model);
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with_gate(mut self, gate: impl Into<String>, model: GateErrorModel) -> Self {
        self.insert(gate, model);
        self
    }

    /// Model for a gate name.
    pub fn get(&self, gate: &str) -> Option<&GateErrorModel> {
        self.gates.get(gate)
    }

    /// Registered gate names.
    pub fn gate_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.gates.keys().map(String::as_str)
    }

    /// Error generators inserted after one circuit layer.
    pub fn error_layer(
        &self,
        layer: &CircuitLayer,
        circuit_time: usize,
        num_qubits: usize,
    ) -> PropResult<ErrorGeneratorLayer> {
        let mut errors = ErrorGeneratorLayer::new();
        for gate in layer.gates() {
            let model = self
                .get(&gate.name)
                .ok_or_else(|| PropError::UnknownGate(gate.name.clone()))?;
            for term in model.terms() {
                let (generator, sign) = term.errgen.embed(gate, num_qubits)?;
                errors.add(
                    ErrorGeneratorLabel::inserted(generator, gate.clone(), circuit_time),
                    sign * term.rate,
                );
            }
        }
        Ok(errors)
    }

    /// One error layer per circuit layer.
    pub fn error_layers(&self, circuit: &Circuit) -> PropResult<Vec<ErrorGeneratorLayer>> {
        let layers = circuit
            .layers()
            .iter()
            .enumerate()
            .map(|(time, layer)| self.error_layer(layer, time, circuit.num_qubits()))
            .collect::<PropResult<Vec<_>>>()?;
        debug!(
            depth = layers.len(),
            terms = layers.iter().map(ErrorGeneratorLayer::len).sum::<usize>(),
            "built error layers"
        );
        Ok(layers)
    }
}
