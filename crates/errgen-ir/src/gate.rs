//! Clifford gate types and the gate-name lookup table.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::circuit::{Circuit, CircuitLayer};
use crate::error::{IrError, IrResult};
use crate::tableau::CliffordTableau;

/// Clifford gates with known conjugation action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CliffordGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// sqrt(X) gate.
    SX,
    /// sqrt(X)-dagger gate.
    SXdg,
    /// sqrt(Y) gate.
    SY,
    /// sqrt(Y)-dagger gate.
    SYdg,

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// SWAP gate.
    Swap,
    /// iSWAP gate.
    ISwap,
}

impl CliffordGate {
    /// Get the canonical (OpenQASM-style) name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            CliffordGate::I => "id",
            CliffordGate::X => "x",
            CliffordGate::Y => "y",
            CliffordGate::Z => "z",
            CliffordGate::H => "h",
            CliffordGate::S => "s",
            CliffordGate::Sdg => "sdg",
            CliffordGate::SX => "sx",
            CliffordGate::SXdg => "sxdg",
            CliffordGate::SY => "sy",
            CliffordGate::SYdg => "sydg",
            CliffordGate::CX => "cx",
            CliffordGate::CY => "cy",
            CliffordGate::CZ => "cz",
            CliffordGate::Swap => "swap",
            CliffordGate::ISwap => "iswap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        match self {
            CliffordGate::I
            | CliffordGate::X
            | CliffordGate::Y
            | CliffordGate::Z
            | CliffordGate::H
            | CliffordGate::S
            | CliffordGate::Sdg
            | CliffordGate::SX
            | CliffordGate::SXdg
            | CliffordGate::SY
            | CliffordGate::SYdg => 1,

            CliffordGate::CX
            | CliffordGate::CY
            | CliffordGate::CZ
            | CliffordGate::Swap
            | CliffordGate::ISwap => 2,
        }
    }

    /// Images `G · X_k · G†` and `G · Z_k · G†` of the local generators,
    /// written as signed Pauli strings over the gate's own qubits.
    pub(crate) fn generator_images(&self) -> (&'static [&'static str], &'static [&'static str]) {
        match self {
            CliffordGate::I => (&["+X"], &["+Z"]),
            CliffordGate::X => (&["+X"], &["-Z"]),
            CliffordGate::Y => (&["-X"], &["-Z"]),
            CliffordGate::Z => (&["-X"], &["+Z"]),
            CliffordGate::H => (&["+Z"], &["+X"]),
            CliffordGate::S => (&["+Y"], &["+Z"]),
            CliffordGate::Sdg => (&["-Y"], &["+Z"]),
            CliffordGate::SX => (&["+X"], &["-Y"]),
            CliffordGate::SXdg => (&["+X"], &["+Y"]),
            CliffordGate::SY => (&["-Z"], &["+X"]),
            CliffordGate::SYdg => (&["+Z"], &["-X"]),
            CliffordGate::CX => (&["+XX", "+IX"], &["+ZI", "+ZZ"]),
            CliffordGate::CY => (&["+XY", "+ZX"], &["+ZI", "+ZZ"]),
            CliffordGate::CZ => (&["+XZ", "+ZX"], &["+ZI", "+IZ"]),
            CliffordGate::Swap => (&["+IX", "+XI"], &["+IZ", "+ZI"]),
            CliffordGate::ISwap => (&["+ZY", "+YZ"], &["+IZ", "+ZI"]),
        }
    }

    /// The tableau of this gate on its own `num_qubits()` qubits.
    pub fn tableau(&self) -> IrResult<CliffordTableau> {
        let (x_images, z_images) = self.generator_images();
        let parse = |images: &[&str]| {
            images
                .iter()
                .map(|s| s.parse())
                .collect::<IrResult<Vec<_>>>()
        };
        CliffordTableau::from_images(parse(x_images)?, parse(z_images)?)
    }
}

/// Explicit table from gate names to Clifford gates.
///
/// Circuits name their gates freely (`"Gcnot"`, `"cx"`, a device-specific
/// alias, …); the gate set resolves those names when a circuit layer is
/// converted to a tableau.
///
/// ```rust
/// use errgen_ir::{CliffordGate, GateSet};
///
/// let gates = GateSet::standard()
///     .with_alias("Gcr", "Gcnot")
///     .unwrap();
/// assert_eq!(gates.resolve("Gcr").unwrap(), CliffordGate::CX);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GateSet {
    gates: FxHashMap<String, CliffordGate>,
}

impl GateSet {
    /// A gate set with no registered names.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Standard gate names: the `G*` names used by gate-set tomography
    /// models plus the lowercase OpenQASM names.
    pub fn standard() -> Self {
        let mut set = Self::empty();
        let table = [
            ("Gi", CliffordGate::I),
            ("Gxpi", CliffordGate::X),
            ("Gypi", CliffordGate::Y),
            ("Gzpi", CliffordGate::Z),
            ("Gxpi2", CliffordGate::SX),
            ("Gypi2", CliffordGate::SY),
            ("Gzpi2", CliffordGate::S),
            ("Gxmpi2", CliffordGate::SXdg),
            ("Gympi2", CliffordGate::SYdg),
            ("Gzmpi2", CliffordGate::Sdg),
            ("Gh", CliffordGate::H),
            ("Gp", CliffordGate::S),
            ("Gcnot", CliffordGate::CX),
            ("Gcphase", CliffordGate::CZ),
            ("Gswap", CliffordGate::Swap),
            ("Giswap", CliffordGate::ISwap),
        ];
        for (name, gate) in table {
            set.insert(name, gate);
        }
        for gate in [
            CliffordGate::I,
            CliffordGate::X,
            CliffordGate::Y,
            CliffordGate::Z,
            CliffordGate::H,
            CliffordGate::S,
            CliffordGate::Sdg,
            CliffordGate::SX,
            CliffordGate::SXdg,
            CliffordGate::SY,
            CliffordGate::SYdg,
            CliffordGate::CX,
            CliffordGate::CY,
            CliffordGate::CZ,
            CliffordGate::Swap,
            CliffordGate::ISwap,
        ] {
            set.insert(gate.name(), gate);
        }
        set
    }

    /// Register (or replace) a gate name.
    pub fn insert(&mut self, name: impl Into<String>, gate: CliffordGate) {
        self.gates.insert(name.into(), gate);
    }

    /// Register `alias` as another name for the already registered `target`.
    pub fn with_alias(mut self, alias: impl Into<String>, target: &str) -> IrResult<Self> {
        let gate = self.resolve(target)?;
        self.insert(alias, gate);
        Ok(self)
    }

    /// Look up a gate name.
    pub fn get(&self, name: &str) -> Option<CliffordGate> {
        self.gates.get(name).copied()
    }

    /// Look up a gate name, failing on unknown names.
    pub fn resolve(&self, name: &str) -> IrResult<CliffordGate> {
        self.get(name)
            .ok_or_else(|| IrError::UnknownGate(name.to_string()))
    }

    /// True if the name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.gates.contains_key(name)
    }

    /// All registered names, sorted.
    pub fn names(&self) -> BTreeSet<&str> {
        self.gates.keys().map(String::as_str).collect()
    }

    /// The tableau implementing one circuit layer on `num_qubits` qubits.
    ///
    /// Qubits without a gate are idle (identity).
    pub fn layer_tableau(
        &self,
        layer: &CircuitLayer,
        num_qubits: usize,
    ) -> IrResult<CliffordTableau> {
        let mut tableau = CliffordTableau::identity(num_qubits);
        for gate in layer.gates() {
            let clifford = self.resolve(&gate.name)?;
            if clifford.num_qubits() != gate.qubits.len() {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name.clone(),
                    expected: clifford.num_qubits(),
                    got: gate.qubits.len(),
                });
            }
            tableau.apply_gate(clifford, &gate.qubits)?;
        }
        Ok(tableau)
    }

    /// One tableau per circuit layer, in circuit order.
    pub fn circuit_tableaus(&self, circuit: &Circuit) -> IrResult<Vec<CliffordTableau>> {
        circuit
            .layers()
            .iter()
            .map(|layer| self.layer_tableau(layer, circuit.num_qubits()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::GateInstance;

    #[test]
    fn test_gate_names_resolve() {
        let gates = GateSet::standard();
        assert_eq!(gates.resolve("Gcnot").unwrap(), CliffordGate::CX);
        assert_eq!(gates.resolve("cx").unwrap(), CliffordGate::CX);
        assert_eq!(gates.resolve("Gxpi2").unwrap(), CliffordGate::SX);
        assert!(matches!(
            gates.resolve("Gt"),
            Err(IrError::UnknownGate(name)) if name == "Gt"
        ));
    }

    #[test]
    fn test_alias_requires_known_target() {
        assert!(GateSet::standard().with_alias("Gfoo", "Gbar").is_err());
        let gates = GateSet::standard().with_alias("Gcr", "Gcnot").unwrap();
        assert!(gates.contains("Gcr"));
    }

    #[test]
    fn test_every_gate_tableau_is_valid() {
        for name in GateSet::standard().names() {
            let gate = GateSet::standard().resolve(name).unwrap();
            let tableau = gate.tableau().unwrap();
            assert_eq!(tableau.num_qubits(), gate.num_qubits());
        }
    }

    #[test]
    fn test_layer_arity_mismatch() {
        let gates = GateSet::standard();
        let layer = CircuitLayer::new(vec![GateInstance::new("Gcnot", vec![0])]);
        assert!(matches!(
            gates.layer_tableau(&layer, 2),
            Err(IrError::QubitCountMismatch { expected: 2, got: 1, .. })
        ));
    }
}
