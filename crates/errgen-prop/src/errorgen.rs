//! Elementary error generators and their labels.
//!
//! Four generator types act on a density matrix `ρ`:
//!
//! | Type | Action |
//! |------|--------|
//! | `H_P` | `-i[P, ρ]` |
//! | `S_P` | `PρP - ρ` |
//! | `C_{P,Q}` | `PρQ + QρP - ½{{P,Q}, ρ}` |
//! | `A_{P,Q}` | `i(PρQ - QρP + ½{[P,Q], ρ})` |
//!
//! Two-operand generators are stored with `P < Q`. `C` is symmetric in its
//! operands; `A` is antisymmetric, so swapping its operands negates the rate.

use errgen_ir::{GateInstance, PauliString};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::{PropError, PropResult};

/// Generator type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ErrorgenKind {
    /// Hamiltonian.
    H,
    /// Stochastic (Pauli).
    S,
    /// Pauli correlation.
    C,
    /// Active (antisymmetric).
    A,
}

impl ErrorgenKind {
    /// Number of Pauli operands.
    pub fn arity(self) -> usize {
        match self {
            ErrorgenKind::H | ErrorgenKind::S => 1,
            ErrorgenKind::C | ErrorgenKind::A => 2,
        }
    }

    /// Single-letter tag.
    pub fn as_char(self) -> char {
        match self {
            ErrorgenKind::H => 'H',
            ErrorgenKind::S => 'S',
            ErrorgenKind::C => 'C',
            ErrorgenKind::A => 'A',
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            'H' => Some(ErrorgenKind::H),
            'S' => Some(ErrorgenKind::S),
            'C' => Some(ErrorgenKind::C),
            'A' => Some(ErrorgenKind::A),
            _ => None,
        }
    }
}

/// An elementary error generator over full-width Pauli strings.
///
/// Use the checked constructors; they reject identity operands, equal
/// operands for `C`/`A`, width mismatches, and bring two-operand generators
/// into canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ElementaryErrorgen {
    /// `H_P`.
    Hamiltonian(PauliString),
    /// `S_P`.
    Stochastic(PauliString),
    /// `C_{P,Q}` with `P < Q`.
    Correlation(PauliString, PauliString),
    /// `A_{P,Q}` with `P < Q`.
    Active(PauliString, PauliString),
}

impl ElementaryErrorgen {
    /// `H_P`.
    pub fn hamiltonian(pauli: PauliString) -> PropResult<Self> {
        check_operand(&pauli)?;
        Ok(ElementaryErrorgen::Hamiltonian(pauli))
    }

    /// `S_P`.
    pub fn stochastic(pauli: PauliString) -> PropResult<Self> {
        check_operand(&pauli)?;
        Ok(ElementaryErrorgen::Stochastic(pauli))
    }

    /// `C_{P,Q}` (operand order does not matter).
    pub fn correlation(p: PauliString, q: PauliString) -> PropResult<Self> {
        check_pair(&p, &q)?;
        Ok(Self::ordered_pair(ErrorgenKind::C, p, q).0)
    }

    /// `A_{P,Q}` together with the sign the rate picks up if the operands
    /// had to be swapped into canonical order.
    pub fn active(p: PauliString, q: PauliString) -> PropResult<(Self, f64)> {
        check_pair(&p, &q)?;
        Ok(Self::ordered_pair(ErrorgenKind::A, p, q))
    }

    /// Build a generator of any kind. `second` must be present exactly for
    /// `C` and `A`. Returns the canonicalisation sign alongside.
    pub fn from_parts(
        kind: ErrorgenKind,
        first: PauliString,
        second: Option<PauliString>,
    ) -> PropResult<(Self, f64)> {
        match (kind, second) {
            (ErrorgenKind::H, None) => Ok((Self::hamiltonian(first)?, 1.0)),
            (ErrorgenKind::S, None) => Ok((Self::stochastic(first)?, 1.0)),
            (ErrorgenKind::C, Some(second)) => Ok((Self::correlation(first, second)?, 1.0)),
            (ErrorgenKind::A, Some(second)) => Self::active(first, second),
            (kind, _) => Err(PropError::InvalidErrorgen(format!(
                "{} generators take {} Pauli operand(s)",
                kind.as_char(),
                kind.arity()
            ))),
        }
    }

    /// Canonical ordering for already-validated operands. The sign is `-1`
    /// only for an `A` generator whose operands were swapped.
    pub(crate) fn ordered_pair(kind: ErrorgenKind, p: PauliString, q: PauliString) -> (Self, f64) {
        let (p, q, swapped) = if p <= q { (p, q, false) } else { (q, p, true) };
        match kind {
            ErrorgenKind::A => (
                ElementaryErrorgen::Active(p, q),
                if swapped { -1.0 } else { 1.0 },
            ),
            _ => (ElementaryErrorgen::Correlation(p, q), 1.0),
        }
    }

    /// Generator type.
    pub fn kind(&self) -> ErrorgenKind {
        match self {
            ElementaryErrorgen::Hamiltonian(_) => ErrorgenKind::H,
            ElementaryErrorgen::Stochastic(_) => ErrorgenKind::S,
            ElementaryErrorgen::Correlation(..) => ErrorgenKind::C,
            ElementaryErrorgen::Active(..) => ErrorgenKind::A,
        }
    }

    /// Pauli operands (one or two).
    pub fn basis_elements(&self) -> (&PauliString, Option<&PauliString>) {
        match self {
            ElementaryErrorgen::Hamiltonian(p) | ElementaryErrorgen::Stochastic(p) => (p, None),
            ElementaryErrorgen::Correlation(p, q) | ElementaryErrorgen::Active(p, q) => {
                (p, Some(q))
            }
        }
    }

    /// Width of the operands.
    pub fn num_qubits(&self) -> usize {
        self.basis_elements().0.num_qubits()
    }

    /// Re-check the structural rules (used after deserialisation).
    pub fn validate(&self) -> PropResult<()> {
        match self {
            ElementaryErrorgen::Hamiltonian(p) | ElementaryErrorgen::Stochastic(p) => {
                check_operand(p)
            }
            ElementaryErrorgen::Correlation(p, q) | ElementaryErrorgen::Active(p, q) => {
                check_pair(p, q)?;
                if p < q {
                    Ok(())
                } else {
                    Err(PropError::InvalidErrorgen(format!(
                        "{self} is not in canonical operand order"
                    )))
                }
            }
        }
    }
}

fn check_operand(p: &PauliString) -> PropResult<()> {
    if p.is_identity() {
        return Err(PropError::InvalidErrorgen(format!(
            "operand {p} is the identity"
        )));
    }
    Ok(())
}

fn check_pair(p: &PauliString, q: &PauliString) -> PropResult<()> {
    check_operand(p)?;
    check_operand(q)?;
    if p.num_qubits() != q.num_qubits() {
        return Err(errgen_ir::IrError::WidthMismatch {
            expected: p.num_qubits(),
            got: q.num_qubits(),
        }
        .into());
    }
    if p == q {
        return Err(PropError::InvalidErrorgen(format!(
            "two-operand generator with equal operands {p}"
        )));
    }
    Ok(())
}

/// Parse `K(P)` or `K(P,Q)` into its kind and raw operands.
pub(crate) fn parse_errgen_syntax(
    s: &str,
) -> PropResult<(ErrorgenKind, PauliString, Option<PauliString>)> {
    let invalid = || PropError::InvalidErrorgen(format!("cannot parse '{s}', expected e.g. H(XI) or C(XI,IZ)"));
    let s = s.trim();
    let mut chars = s.chars();
    let kind = chars
        .next()
        .and_then(ErrorgenKind::from_char)
        .ok_or_else(invalid)?;
    let body = chars
        .as_str()
        .trim()
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(invalid)?;
    let mut operands = body.split(',').map(str::trim);
    let first: PauliString = operands.next().ok_or_else(invalid)?.parse()?;
    let second = operands.next().map(str::parse::<PauliString>).transpose()?;
    if operands.next().is_some() {
        return Err(invalid());
    }
    Ok((kind, first, second))
}

impl fmt::Display for ElementaryErrorgen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.basis_elements() {
            (p, None) => write!(f, "{}({p})", self.kind().as_char()),
            (p, Some(q)) => write!(f, "{}({p},{q})", self.kind().as_char()),
        }
    }
}

/// Parses `H(XI)`, `S(XI)`, `C(XI,IZ)`, `A(XI,IZ)`. `A` operands must
/// already be in canonical order since parsing cannot return a sign.
impl FromStr for ElementaryErrorgen {
    type Err = PropError;

    fn from_str(s: &str) -> PropResult<Self> {
        let (kind, first, second) = parse_errgen_syntax(s)?;
        let (errgen, sign) = Self::from_parts(kind, first, second)?;
        if sign < 0.0 {
            return Err(PropError::InvalidErrorgen(format!(
                "'{s}' is not in canonical operand order"
            )));
        }
        Ok(errgen)
    }
}

impl TryFrom<String> for ElementaryErrorgen {
    type Error = PropError;

    fn try_from(s: String) -> PropResult<Self> {
        s.parse()
    }
}

impl From<ElementaryErrorgen> for String {
    fn from(errgen: ElementaryErrorgen) -> Self {
        errgen.to_string()
    }
}

/// Where a propagated generator came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Provenance {
    /// The generator as it was when inserted, before any propagation.
    pub initial: ElementaryErrorgen,
    /// The gate whose error model produced it.
    pub gate: GateInstance,
    /// Index of the circuit layer it was inserted after.
    pub circuit_time: usize,
}

/// An elementary error generator with optional provenance.
///
/// Equality and hashing look at the generator only, so labels with
/// different histories collide (and their rates are summed) in an
/// [`ErrorGeneratorLayer`](crate::ErrorGeneratorLayer).
#[derive(Debug, Clone)]
pub struct ErrorGeneratorLabel {
    generator: ElementaryErrorgen,
    provenance: Option<Provenance>,
}

impl ErrorGeneratorLabel {
    /// A label without provenance.
    pub fn new(generator: ElementaryErrorgen) -> Self {
        Self {
            generator,
            provenance: None,
        }
    }

    /// A freshly inserted label; its provenance points at itself.
    pub fn inserted(generator: ElementaryErrorgen, gate: GateInstance, circuit_time: usize) -> Self {
        let provenance = Provenance {
            initial: generator.clone(),
            gate,
            circuit_time,
        };
        Self {
            generator,
            provenance: Some(provenance),
        }
    }

    /// A new label for `generator` carrying this label's provenance.
    pub fn with_generator(&self, generator: ElementaryErrorgen) -> Self {
        Self {
            generator,
            provenance: self.provenance.clone(),
        }
    }

    /// The generator.
    pub fn generator(&self) -> &ElementaryErrorgen {
        &self.generator
    }

    /// Provenance, if tracked.
    pub fn provenance(&self) -> Option<&Provenance> {
        self.provenance.as_ref()
    }

    /// The pre-propagation generator, or the current one if untracked.
    pub fn initial(&self) -> &ElementaryErrorgen {
        self.provenance
            .as_ref()
            .map_or(&self.generator, |p| &p.initial)
    }
}

impl From<ElementaryErrorgen> for ErrorGeneratorLabel {
    fn from(generator: ElementaryErrorgen) -> Self {
        Self::new(generator)
    }
}

impl PartialEq for ErrorGeneratorLabel {
    fn eq(&self, other: &Self) -> bool {
        self.generator == other.generator
    }
}

impl Eq for ErrorGeneratorLabel {}

impl Hash for ErrorGeneratorLabel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.generator.hash(state);
    }
}

impl Borrow<ElementaryErrorgen> for ErrorGeneratorLabel {
    fn borrow(&self) -> &ElementaryErrorgen {
        &self.generator
    }
}

impl fmt::Display for ErrorGeneratorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.generator, f)
    }
}
