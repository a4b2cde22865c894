//! Layered Clifford circuits.
//!
//! A [`Circuit`] is a fixed-width sequence of [`CircuitLayer`]s. Each layer
//! holds gate instances acting on disjoint qubits; qubits not touched by a
//! layer are idle during it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};

/// One gate acting on specific qubits, e.g. `Gcnot:0:1`.
///
/// The gate name is resolved against a [`GateSet`](crate::GateSet) when the
/// circuit is converted to tableaus; the instance itself is also the key
/// noise models use to attach errors to gates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GateInstance {
    /// Gate name.
    pub name: String,
    /// Target qubits, in the gate's argument order.
    pub qubits: Vec<usize>,
}

impl GateInstance {
    /// Create a gate instance.
    pub fn new(name: impl Into<String>, qubits: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            qubits,
        }
    }
}

impl fmt::Display for GateInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for q in &self.qubits {
            write!(f, ":{q}")?;
        }
        Ok(())
    }
}

/// The gates applied simultaneously in one time step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CircuitLayer {
    gates: Vec<GateInstance>,
}

impl CircuitLayer {
    /// Create a layer from its gates.
    pub fn new(gates: Vec<GateInstance>) -> Self {
        Self { gates }
    }

    /// A layer in which every qubit idles.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Gates in this layer.
    pub fn gates(&self) -> &[GateInstance] {
        &self.gates
    }

    /// True if the layer contains no gates.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Check qubit ranges and that no qubit is used twice.
    fn validate(&self, num_qubits: usize) -> IrResult<()> {
        let mut used = vec![false; num_qubits];
        for gate in &self.gates {
            for &q in &gate.qubits {
                let slot = used.get_mut(q).ok_or_else(|| IrError::QubitOutOfRange {
                    qubit: q,
                    num_qubits,
                    gate_name: Some(gate.name.clone()),
                })?;
                if *slot {
                    return Err(IrError::DuplicateQubit {
                        qubit: q,
                        gate_name: Some(gate.name.clone()),
                    });
                }
                *slot = true;
            }
        }
        Ok(())
    }
}

impl FromIterator<GateInstance> for CircuitLayer {
    fn from_iter<T: IntoIterator<Item = GateInstance>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[derive(Deserialize)]
struct RawCircuit {
    num_qubits: usize,
    #[serde(default)]
    layers: Vec<CircuitLayer>,
}

/// A fixed-width layered circuit.
///
/// Every layer is validated against the width when added.
///
/// ```rust
/// use errgen_ir::{Circuit, CircuitLayer, GateInstance};
///
/// let mut circuit = Circuit::new(2);
/// circuit
///     .push_layer(CircuitLayer::new(vec![GateInstance::new("Gcnot", vec![0, 1])]))
///     .unwrap();
/// circuit.push_layer(CircuitLayer::idle()).unwrap();
/// assert_eq!(circuit.depth(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCircuit")]
pub struct Circuit {
    num_qubits: usize,
    layers: Vec<CircuitLayer>,
}

impl Circuit {
    /// An empty circuit on `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            layers: Vec::new(),
        }
    }

    /// Build a circuit from layers, validating each one.
    pub fn with_layers(num_qubits: usize, layers: Vec<CircuitLayer>) -> IrResult<Self> {
        let mut circuit = Self::new(num_qubits);
        for layer in layers {
            circuit.push_layer(layer)?;
        }
        Ok(circuit)
    }

    /// Append a layer.
    pub fn push_layer(&mut self, layer: CircuitLayer) -> IrResult<&mut Self> {
        layer.validate(self.num_qubits)?;
        self.layers.push(layer);
        Ok(self)
    }

    /// Layer at index `idx`.
    pub fn layer(&self, idx: usize) -> Option<&CircuitLayer> {
        self.layers.get(idx)
    }

    /// All layers in circuit order.
    pub fn layers(&self) -> &[CircuitLayer] {
        &self.layers
    }

    /// Number of layers.
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }
}

impl TryFrom<RawCircuit> for Circuit {
    type Error = IrError;

    fn try_from(raw: RawCircuit) -> IrResult<Self> {
        Self::with_layers(raw.num_qubits, raw.layers)
    }
}
