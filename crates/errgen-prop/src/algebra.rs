//! Exact composition and commutators of elementary error generators.
//!
//! Every generator is a superoperator of the form `Σ c · A ρ B` over Pauli
//! pairs `(A, B)`. Composing two such sums is Pauli multiplication on both
//! sides; the result is read back in H/S/C/A coordinates:
//!
//! | entry | contribution |
//! |-------|--------------|
//! | `(P, I)` | `h_P -= Im c / 2` |
//! | `(I, P)` | `h_P += Im c / 2` |
//! | `(P, P)` | `s_P += Re c` |
//! | `(P, Q)`, `P < Q` | `c_{P,Q} += Re c / 2`, `a_{P,Q} += Im c / 2` |
//! | `(Q, P)`, `P < Q` | `c_{P,Q} += Re c / 2`, `a_{P,Q} -= Im c / 2` |
//!
//! Entries `(I, I)` and the real parts of `(P, I)`, `(I, P)` are fixed by
//! trace preservation and carry no extra information.

use errgen_ir::{IrError, PauliString};
use num_complex::Complex64;
use rustc_hash::FxHashMap;

use crate::error::PropResult;
use crate::errorgen::ElementaryErrorgen;

/// Magnitude below which a decomposed coefficient is treated as zero.
pub const COEFFICIENT_EPSILON: f64 = 1e-15;

/// One term `coeff · left ρ right` of a process-matrix expansion.
#[derive(Debug, Clone, PartialEq)]
pub struct ChiTerm {
    /// Operator applied from the left.
    pub left: PauliString,
    /// Operator applied from the right.
    pub right: PauliString,
    /// Complex weight.
    pub coeff: Complex64,
}

impl ChiTerm {
    fn new(left: PauliString, right: PauliString, coeff: Complex64) -> Self {
        Self { left, right, coeff }
    }
}

/// Expand a generator as `Σ c · A ρ B`.
pub fn process_matrix(errgen: &ElementaryErrorgen) -> Vec<ChiTerm> {
    let i = Complex64::i();
    let one = Complex64::new(1.0, 0.0);
    let identity = PauliString::identity(errgen.num_qubits());
    match errgen {
        ElementaryErrorgen::Hamiltonian(p) => vec![
            ChiTerm::new(p.clone(), identity.clone(), -i),
            ChiTerm::new(identity, p.clone(), i),
        ],
        ElementaryErrorgen::Stochastic(p) => vec![
            ChiTerm::new(p.clone(), p.clone(), one),
            ChiTerm::new(identity.clone(), identity, -one),
        ],
        ElementaryErrorgen::Correlation(p, q) => {
            let mut terms = vec![
                ChiTerm::new(p.clone(), q.clone(), one),
                ChiTerm::new(q.clone(), p.clone(), one),
            ];
            // ½{{P,Q},ρ} survives only when P and Q commute: {P,Q} = 2·PQ.
            if p.commutes_with(q) {
                let (phase, r) = p.multiply(q);
                let ph = phase.to_complex();
                terms.push(ChiTerm::new(r.clone(), identity.clone(), -ph));
                terms.push(ChiTerm::new(identity, r, -ph));
            }
            terms
        }
        ElementaryErrorgen::Active(p, q) => {
            let mut terms = vec![
                ChiTerm::new(p.clone(), q.clone(), i),
                ChiTerm::new(q.clone(), p.clone(), -i),
            ];
            // ½{[P,Q],ρ} survives only when P and Q anticommute: [P,Q] = 2·PQ.
            if !p.commutes_with(q) {
                let (phase, r) = p.multiply(q);
                let ph = i * phase.to_complex();
                terms.push(ChiTerm::new(r.clone(), identity.clone(), ph));
                terms.push(ChiTerm::new(identity, r, ph));
            }
            terms
        }
    }
}

type ChiMap = FxHashMap<(PauliString, PauliString), Complex64>;

/// Accumulate `weight · (E1 ∘ E2)` at the process-matrix level.
fn accumulate_composition(chi: &mut ChiMap, e1: &[ChiTerm], e2: &[ChiTerm], weight: f64) {
    // (A ρ' B) with ρ' = C ρ D gives (A C) ρ (D B).
    for outer in e1 {
        for inner in e2 {
            let (left_phase, left) = outer.left.multiply(&inner.left);
            let (right_phase, right) = inner.right.multiply(&outer.right);
            let phase = left_phase.times(right_phase);
            let coeff = outer.coeff * inner.coeff * phase.to_complex() * weight;
            *chi.entry((left, right)).or_default() += coeff;
        }
    }
}

/// Read a trace-annihilating, Hermiticity-preserving process matrix back as
/// elementary generators.
fn decompose(chi: ChiMap) -> Vec<(ElementaryErrorgen, f64)> {
    let mut coords: FxHashMap<ElementaryErrorgen, f64> = FxHashMap::default();
    let mut add = |errgen: ElementaryErrorgen, value: f64| {
        *coords.entry(errgen).or_default() += value;
    };
    for ((left, right), c) in chi {
        match (left.is_identity(), right.is_identity()) {
            (true, true) => {}
            (false, true) => add(ElementaryErrorgen::Hamiltonian(left), -c.im / 2.0),
            (true, false) => add(ElementaryErrorgen::Hamiltonian(right), c.im / 2.0),
            (false, false) if left == right => add(ElementaryErrorgen::Stochastic(left), c.re),
            (false, false) => {
                let (p, q, a_sign) = if left < right {
                    (left, right, 1.0)
                } else {
                    (right, left, -1.0)
                };
                add(ElementaryErrorgen::Correlation(p.clone(), q.clone()), c.re / 2.0);
                add(ElementaryErrorgen::Active(p, q), a_sign * c.im / 2.0);
            }
        }
    }
    let mut terms: Vec<_> = coords
        .into_iter()
        .filter(|(_, value)| value.abs() >= COEFFICIENT_EPSILON)
        .collect();
    terms.sort_by(|a, b| a.0.cmp(&b.0));
    terms
}

fn check_widths(e1: &ElementaryErrorgen, e2: &ElementaryErrorgen) -> PropResult<()> {
    if e1.num_qubits() != e2.num_qubits() {
        return Err(IrError::WidthMismatch {
            expected: e1.num_qubits(),
            got: e2.num_qubits(),
        }
        .into());
    }
    Ok(())
}

/// `E1 ∘ E2` (apply `E2` first) in elementary-generator coordinates.
///
/// ```rust
/// use errgen_prop::{algebra::compose, ElementaryErrorgen};
///
/// let sx: ElementaryErrorgen = "S(X)".parse().unwrap();
/// assert_eq!(compose(&sx, &sx).unwrap(), vec![(sx.clone(), -2.0)]);
/// ```
pub fn compose(
    e1: &ElementaryErrorgen,
    e2: &ElementaryErrorgen,
) -> PropResult<Vec<(ElementaryErrorgen, f64)>> {
    check_widths(e1, e2)?;
    let mut chi = ChiMap::default();
    accumulate_composition(&mut chi, &process_matrix(e1), &process_matrix(e2), 1.0);
    Ok(decompose(chi))
}

/// `[E1, E2] = E1 ∘ E2 - E2 ∘ E1` in elementary-generator coordinates.
///
/// ```rust
/// use errgen_prop::{algebra::commutator, ElementaryErrorgen};
///
/// let hx: ElementaryErrorgen = "H(X)".parse().unwrap();
/// let hy: ElementaryErrorgen = "H(Y)".parse().unwrap();
/// let hz: ElementaryErrorgen = "H(Z)".parse().unwrap();
/// assert_eq!(commutator(&hx, &hy).unwrap(), vec![(hz, 2.0)]);
/// ```
pub fn commutator(
    e1: &ElementaryErrorgen,
    e2: &ElementaryErrorgen,
) -> PropResult<Vec<(ElementaryErrorgen, f64)>> {
    check_widths(e1, e2)?;
    let chi1 = process_matrix(e1);
    let chi2 = process_matrix(e2);
    let mut chi = ChiMap::default();
    accumulate_composition(&mut chi, &chi1, &chi2, 1.0);
    accumulate_composition(&mut chi, &chi2, &chi1, -1.0);
    Ok(decompose(chi))
}
