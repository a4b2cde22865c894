//! Pauli operators and fixed-width Pauli strings.
//!
//! A [`PauliString`] is a dense tensor product `P_0 ⊗ P_1 ⊗ … ⊗ P_{n-1}` over
//! all qubits of a circuit, written left to right with qubit 0 first
//! (`"XIZ"` is X on qubit 0, Z on qubit 2). Products of Pauli strings carry a
//! [`Phase`] in `{1, i, -1, -i}`.
//!
//! # Example
//!
//! ```rust
//! use errgen_ir::pauli::{PauliString, Phase};
//!
//! let x: PauliString = "XI".parse().unwrap();
//! let y: PauliString = "YI".parse().unwrap();
//! let (phase, z) = x.multiply(&y);
//! assert_eq!(phase, Phase::I);
//! assert_eq!(z.to_string(), "ZI");
//! ```

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{IrError, IrResult};

/// Single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PauliOp {
    /// Identity.
    I,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
}

impl PauliOp {
    /// All four operators in basis order.
    pub const ALL: [PauliOp; 4] = [PauliOp::I, PauliOp::X, PauliOp::Y, PauliOp::Z];

    /// Parse a single character. `_` is accepted as identity.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'I' | '_' => Some(PauliOp::I),
            'X' => Some(PauliOp::X),
            'Y' => Some(PauliOp::Y),
            'Z' => Some(PauliOp::Z),
            _ => None,
        }
    }

    /// The character used when printing this operator.
    pub fn as_char(self) -> char {
        match self {
            PauliOp::I => 'I',
            PauliOp::X => 'X',
            PauliOp::Y => 'Y',
            PauliOp::Z => 'Z',
        }
    }

    /// Index of this operator in [`PauliOp::ALL`].
    pub fn index(self) -> usize {
        match self {
            PauliOp::I => 0,
            PauliOp::X => 1,
            PauliOp::Y => 2,
            PauliOp::Z => 3,
        }
    }

    /// Single-qubit product `self · other = phase · result`.
    pub fn multiply(self, other: PauliOp) -> (Phase, PauliOp) {
        use PauliOp::{I, X, Y, Z};
        match (self, other) {
            (I, p) | (p, I) => (Phase::ONE, p),
            (a, b) if a == b => (Phase::ONE, I),
            (X, Y) => (Phase::I, Z),
            (Y, X) => (Phase::MINUS_I, Z),
            (Y, Z) => (Phase::I, X),
            (Z, Y) => (Phase::MINUS_I, X),
            (Z, X) => (Phase::I, Y),
            (X, Z) => (Phase::MINUS_I, Y),
            _ => unreachable!("all Pauli pairs are covered"),
        }
    }

    /// True if the two single-qubit operators anticommute.
    pub fn anticommutes_with(self, other: PauliOp) -> bool {
        self != PauliOp::I && other != PauliOp::I && self != other
    }
}

/// A phase `i^k` with `k ∈ {0, 1, 2, 3}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Phase(u8);

impl Phase {
    /// `+1`
    pub const ONE: Phase = Phase(0);
    /// `+i`
    pub const I: Phase = Phase(1);
    /// `-1`
    pub const MINUS_ONE: Phase = Phase(2);
    /// `-i`
    pub const MINUS_I: Phase = Phase(3);

    /// Construct `i^exponent`.
    pub fn from_exponent(exponent: u8) -> Self {
        Phase(exponent % 4)
    }

    /// The exponent `k` of `i^k`.
    pub fn exponent(self) -> u8 {
        self.0
    }

    /// Product of two phases.
    #[must_use]
    pub fn times(self, other: Phase) -> Phase {
        Phase((self.0 + other.0) % 4)
    }

    /// True for `±1`.
    pub fn is_real(self) -> bool {
        self.0 % 2 == 0
    }

    /// The phase as a complex number.
    pub fn to_complex(self) -> Complex64 {
        match self.0 {
            0 => Complex64::new(1.0, 0.0),
            1 => Complex64::new(0.0, 1.0),
            2 => Complex64::new(-1.0, 0.0),
            _ => Complex64::new(0.0, -1.0),
        }
    }
}

/// A dense Pauli string on a fixed number of qubits.
///
/// Ordering is lexicographic over qubits with `I < X < Y < Z`; it is used to
/// put two-operator error generators into canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PauliString {
    ops: Vec<PauliOp>,
}

impl PauliString {
    /// The identity string on `num_qubits` qubits.
    pub fn identity(num_qubits: usize) -> Self {
        Self {
            ops: vec![PauliOp::I; num_qubits],
        }
    }

    /// Build from an explicit list of operators, one per qubit.
    pub fn from_vec(ops: Vec<PauliOp>) -> Self {
        Self { ops }
    }

    /// Build a `num_qubits`-wide string from sparse `(qubit, op)` pairs.
    pub fn from_sparse(
        num_qubits: usize,
        ops: impl IntoIterator<Item = (usize, PauliOp)>,
    ) -> IrResult<Self> {
        let mut pauli = Self::identity(num_qubits);
        for (qubit, op) in ops {
            pauli.set(qubit, op)?;
        }
        Ok(pauli)
    }

    /// Build the string with `op` on `qubit` and identity elsewhere.
    pub fn single(num_qubits: usize, qubit: usize, op: PauliOp) -> IrResult<Self> {
        Self::from_sparse(num_qubits, [(qubit, op)])
    }

    /// Number of qubits (including identity positions).
    pub fn num_qubits(&self) -> usize {
        self.ops.len()
    }

    /// The operator on every qubit, qubit 0 first.
    pub fn ops(&self) -> &[PauliOp] {
        &self.ops
    }

    /// The operator on one qubit.
    pub fn get(&self, qubit: usize) -> Option<PauliOp> {
        self.ops.get(qubit).copied()
    }

    /// Overwrite the operator on one qubit.
    pub fn set(&mut self, qubit: usize, op: PauliOp) -> IrResult<()> {
        let num_qubits = self.ops.len();
        let slot = self.ops.get_mut(qubit).ok_or(IrError::QubitOutOfRange {
            qubit,
            num_qubits,
            gate_name: None,
        })?;
        *slot = op;
        Ok(())
    }

    /// True if every position is the identity.
    pub fn is_identity(&self) -> bool {
        self.ops.iter().all(|op| *op == PauliOp::I)
    }

    /// Number of non-identity positions.
    pub fn weight(&self) -> usize {
        self.ops.iter().filter(|op| **op != PauliOp::I).count()
    }

    /// Non-identity `(qubit, op)` pairs in qubit order.
    pub fn support(&self) -> impl Iterator<Item = (usize, PauliOp)> + '_ {
        self.ops
            .iter()
            .enumerate()
            .filter(|(_, op)| **op != PauliOp::I)
            .map(|(q, op)| (q, *op))
    }

    /// The operators on a subset of qubits, in the order given.
    pub fn restrict(&self, qubits: &[usize]) -> IrResult<PauliString> {
        qubits
            .iter()
            .map(|&q| {
                self.get(q).ok_or(IrError::QubitOutOfRange {
                    qubit: q,
                    num_qubits: self.num_qubits(),
                    gate_name: None,
                })
            })
            .collect::<IrResult<Vec<_>>>()
            .map(PauliString::from_vec)
    }

    /// Product `self · other = phase · result`.
    ///
    /// # Panics
    ///
    /// Panics if the two strings have different widths.
    pub fn multiply(&self, other: &PauliString) -> (Phase, PauliString) {
        assert_eq!(
            self.num_qubits(),
            other.num_qubits(),
            "Pauli strings must have equal width"
        );
        let mut phase = Phase::ONE;
        let ops = self
            .ops
            .iter()
            .zip(&other.ops)
            .map(|(a, b)| {
                let (p, op) = a.multiply(*b);
                phase = phase.times(p);
                op
            })
            .collect();
        (phase, PauliString { ops })
    }

    /// True if the two strings commute.
    pub fn commutes_with(&self, other: &PauliString) -> bool {
        self.ops
            .iter()
            .zip(&other.ops)
            .filter(|(a, b)| a.anticommutes_with(**b))
            .count()
            % 2
            == 0
    }

    /// Index of this string in the `4^n` lexicographic Pauli basis
    /// (qubit 0 is the most significant base-4 digit).
    pub fn basis_index(&self) -> usize {
        self.ops.iter().fold(0, |acc, op| acc * 4 + op.index())
    }

    /// Inverse of [`PauliString::basis_index`].
    pub fn from_basis_index(num_qubits: usize, mut index: usize) -> Self {
        let mut ops = vec![PauliOp::I; num_qubits];
        for slot in ops.iter_mut().rev() {
            *slot = PauliOp::ALL[index % 4];
            index /= 4;
        }
        Self { ops }
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in &self.ops {
            write!(f, "{}", op.as_char())?;
        }
        Ok(())
    }
}

impl FromStr for PauliString {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .map(PauliOp::from_char)
            .collect::<Option<Vec<_>>>()
            .map(PauliString::from_vec)
            .ok_or_else(|| IrError::InvalidPauli(s.to_string()))
    }
}

impl TryFrom<String> for PauliString {
    type Error = IrError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PauliString> for String {
    fn from(value: PauliString) -> Self {
        value.to_string()
    }
}

/// A Pauli string with a `±1` sign, e.g. the image of a Pauli under a
/// Clifford conjugation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignedPauli {
    /// True when the sign is `-1`.
    pub negative: bool,
    /// The unsigned Pauli string.
    pub pauli: PauliString,
}

impl SignedPauli {
    /// A positive signed Pauli.
    pub fn positive(pauli: PauliString) -> Self {
        Self {
            negative: false,
            pauli,
        }
    }

    /// The sign as `±1.0`.
    pub fn sign(&self) -> f64 {
        if self.negative { -1.0 } else { 1.0 }
    }

    /// The sign as a [`Phase`].
    pub fn phase(&self) -> Phase {
        if self.negative {
            Phase::MINUS_ONE
        } else {
            Phase::ONE
        }
    }
}

impl fmt::Display for SignedPauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.negative { '-' } else { '+' };
        write!(f, "{sign}{}", self.pauli)
    }
}

impl FromStr for SignedPauli {
    type Err = IrError;

    /// Parse `"+XZ"`, `"-Y"` or an unsigned string (taken as positive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        Ok(Self {
            negative,
            pauli: body.parse()?,
        })
    }
}
