//! Stabilizer tableaus.
//!
//! A [`CliffordTableau`] stores the conjugation action `U · P · U†` of a
//! Clifford unitary `U` on the generators `X_k`, `Z_k` of the Pauli group.
//! The image of any other Pauli string follows by multiplying generator
//! images, with `Y_k = i · X_k · Z_k`.
//!
//! # Example
//!
//! ```rust
//! use errgen_ir::{CliffordGate, CliffordTableau};
//!
//! let mut cnot = CliffordTableau::identity(2);
//! cnot.apply_gate(CliffordGate::CX, &[0, 1]).unwrap();
//!
//! let image = cnot.image(&"XI".parse().unwrap()).unwrap();
//! assert_eq!(image.to_string(), "+XX");
//! ```

use crate::error::{IrError, IrResult};
use crate::gate::CliffordGate;
use crate::pauli::{PauliOp, PauliString, Phase, SignedPauli};

/// Conjugation action of an `n`-qubit Clifford unitary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliffordTableau {
    /// `U · X_k · U†` for every qubit `k`.
    x_images: Vec<SignedPauli>,
    /// `U · Z_k · U†` for every qubit `k`.
    z_images: Vec<SignedPauli>,
}

impl CliffordTableau {
    /// The identity tableau on `num_qubits` qubits.
    pub fn identity(num_qubits: usize) -> Self {
        let generator = |op| {
            (0..num_qubits)
                .map(|q| {
                    let mut pauli = PauliString::identity(num_qubits);
                    // In range by construction.
                    let _ = pauli.set(q, op);
                    SignedPauli::positive(pauli)
                })
                .collect()
        };
        Self {
            x_images: generator(PauliOp::X),
            z_images: generator(PauliOp::Z),
        }
    }

    /// Build a tableau from explicit generator images.
    ///
    /// The images must have the tableau's width and satisfy the Pauli
    /// commutation relations (`X_j`, `Z_k` anticommute iff `j == k`, all other
    /// pairs commute).
    pub fn from_images(x_images: Vec<SignedPauli>, z_images: Vec<SignedPauli>) -> IrResult<Self> {
        let n = x_images.len();
        if z_images.len() != n {
            return Err(IrError::WidthMismatch {
                expected: n,
                got: z_images.len(),
            });
        }
        for image in x_images.iter().chain(&z_images) {
            if image.pauli.num_qubits() != n {
                return Err(IrError::WidthMismatch {
                    expected: n,
                    got: image.pauli.num_qubits(),
                });
            }
            if image.pauli.is_identity() {
                return Err(IrError::InvalidTableau(
                    "generator image is the identity".into(),
                ));
            }
        }
        for j in 0..n {
            for k in 0..n {
                let anticommute = !x_images[j].pauli.commutes_with(&z_images[k].pauli);
                if anticommute != (j == k) {
                    return Err(IrError::InvalidTableau(format!(
                        "images of X{j} and Z{k} have the wrong commutation relation"
                    )));
                }
                if j < k
                    && (!x_images[j].pauli.commutes_with(&x_images[k].pauli)
                        || !z_images[j].pauli.commutes_with(&z_images[k].pauli))
                {
                    return Err(IrError::InvalidTableau(format!(
                        "images of qubits {j} and {k} do not commute"
                    )));
                }
            }
        }
        Ok(Self { x_images, z_images })
    }

    /// The tableau of a single gate embedded in a `num_qubits`-wide register.
    pub fn from_gate(gate: CliffordGate, qubits: &[usize], num_qubits: usize) -> IrResult<Self> {
        let mut tableau = Self::identity(num_qubits);
        tableau.apply_gate(gate, qubits)?;
        Ok(tableau)
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.x_images.len()
    }

    /// `U · X_k · U†`.
    pub fn image_x(&self, qubit: usize) -> Option<&SignedPauli> {
        self.x_images.get(qubit)
    }

    /// `U · Z_k · U†`.
    pub fn image_z(&self, qubit: usize) -> Option<&SignedPauli> {
        self.z_images.get(qubit)
    }

    /// True if this tableau is the identity.
    pub fn is_identity(&self) -> bool {
        *self == Self::identity(self.num_qubits())
    }

    /// Conjugate a Pauli string: `U · P · U† = sign · P'`.
    pub fn image(&self, pauli: &PauliString) -> IrResult<SignedPauli> {
        self.check_width(pauli)?;
        let mut phase = Phase::ONE;
        let mut acc = PauliString::identity(self.num_qubits());
        for (q, op) in pauli.support() {
            let x = &self.x_images[q];
            let z = &self.z_images[q];
            let (factor_phase, factor) = match op {
                PauliOp::X => (x.phase(), x.pauli.clone()),
                PauliOp::Z => (z.phase(), z.pauli.clone()),
                PauliOp::Y => {
                    let (xz_phase, xz) = x.pauli.multiply(&z.pauli);
                    (
                        Phase::I.times(xz_phase).times(x.phase()).times(z.phase()),
                        xz,
                    )
                }
                PauliOp::I => continue,
            };
            let (product_phase, product) = acc.multiply(&factor);
            phase = phase.times(factor_phase).times(product_phase);
            acc = product;
        }
        match phase {
            Phase::ONE => Ok(SignedPauli::positive(acc)),
            Phase::MINUS_ONE => Ok(SignedPauli {
                negative: true,
                pauli: acc,
            }),
            _ => Err(IrError::InvalidTableau(format!(
                "image of {pauli} is not Hermitian"
            ))),
        }
    }

    /// Conjugate a Pauli string by the inverse: `U† · P · U`.
    pub fn preimage(&self, pauli: &PauliString) -> IrResult<SignedPauli> {
        self.inverse()?.image(pauli)
    }

    /// The tableau of "apply `self`, then `next`", i.e. `V · U` for
    /// `self = U`, `next = V`.
    pub fn then(&self, next: &CliffordTableau) -> IrResult<CliffordTableau> {
        let push = |images: &[SignedPauli]| {
            images
                .iter()
                .map(|image| {
                    let mut pushed = next.image(&image.pauli)?;
                    pushed.negative ^= image.negative;
                    Ok(pushed)
                })
                .collect::<IrResult<Vec<_>>>()
        };
        Ok(CliffordTableau {
            x_images: push(&self.x_images)?,
            z_images: push(&self.z_images)?,
        })
    }

    /// The inverse tableau `U†`.
    ///
    /// The preimage `P` of a generator `g` is read off from commutation
    /// relations, which conjugation preserves: `P` has an X component on
    /// qubit `m` iff `g` anticommutes with `U Z_m U†`, and a Z component iff
    /// `g` anticommutes with `U X_m U†`. The sign is fixed by mapping `P`
    /// forward once.
    pub fn inverse(&self) -> IrResult<CliffordTableau> {
        let n = self.num_qubits();
        let preimage_of = |generator: PauliString| -> IrResult<SignedPauli> {
            let ops = (0..n)
                .map(|m| {
                    let has_x = !generator.commutes_with(&self.z_images[m].pauli);
                    let has_z = !generator.commutes_with(&self.x_images[m].pauli);
                    match (has_x, has_z) {
                        (false, false) => PauliOp::I,
                        (true, false) => PauliOp::X,
                        (true, true) => PauliOp::Y,
                        (false, true) => PauliOp::Z,
                    }
                })
                .collect();
            let candidate = PauliString::from_vec(ops);
            let forward = self.image(&candidate)?;
            if forward.pauli != generator {
                return Err(IrError::InvalidTableau(format!(
                    "no preimage found for {generator}"
                )));
            }
            Ok(SignedPauli {
                negative: forward.negative,
                pauli: candidate,
            })
        };
        let generators = |op| {
            (0..n)
                .map(|q| PauliString::single(n, q, op).and_then(preimage_of))
                .collect::<IrResult<Vec<_>>>()
        };
        Ok(CliffordTableau {
            x_images: generators(PauliOp::X)?,
            z_images: generators(PauliOp::Z)?,
        })
    }

    /// Left-multiply by a gate: afterwards the tableau describes "apply the
    /// previous operation, then `gate` on `qubits`".
    pub fn apply_gate(&mut self, gate: CliffordGate, qubits: &[usize]) -> IrResult<()> {
        let n = self.num_qubits();
        if qubits.len() != gate.num_qubits() {
            return Err(IrError::QubitCountMismatch {
                gate_name: gate.name().to_string(),
                expected: gate.num_qubits(),
                got: qubits.len(),
            });
        }
        for (i, &q) in qubits.iter().enumerate() {
            if q >= n {
                return Err(IrError::QubitOutOfRange {
                    qubit: q,
                    num_qubits: n,
                    gate_name: Some(gate.name().to_string()),
                });
            }
            if qubits[..i].contains(&q) {
                return Err(IrError::DuplicateQubit {
                    qubit: q,
                    gate_name: Some(gate.name().to_string()),
                });
            }
        }

        let local = gate.tableau()?;
        for image in self.x_images.iter_mut().chain(self.z_images.iter_mut()) {
            let restricted = image.pauli.restrict(qubits)?;
            if restricted.is_identity() {
                continue;
            }
            let local_image = local.image(&restricted)?;
            for (&q, &op) in qubits.iter().zip(local_image.pauli.ops()) {
                image.pauli.set(q, op)?;
            }
            image.negative ^= local_image.negative;
        }
        Ok(())
    }

    fn check_width(&self, pauli: &PauliString) -> IrResult<()> {
        if pauli.num_qubits() == self.num_qubits() {
            Ok(())
        } else {
            Err(IrError::WidthMismatch {
                expected: self.num_qubits(),
                got: pauli.num_qubits(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> PauliString {
        s.parse().unwrap()
    }

    fn image(tableau: &CliffordTableau, s: &str) -> String {
        tableau.image(&p(s)).unwrap().to_string()
    }

    #[test]
    fn test_cnot_images() {
        let cx = CliffordTableau::from_gate(CliffordGate::CX, &[0, 1], 2).unwrap();
        assert_eq!(image(&cx, "XI"), "+XX");
        assert_eq!(image(&cx, "IZ"), "+ZZ");
        assert_eq!(image(&cx, "ZI"), "+ZI");
        assert_eq!(image(&cx, "IX"), "+IX");
        // Y⊗I = i X Z on qubit 0 → i (XX)(ZI) = YX
        assert_eq!(image(&cx, "YI"), "+YX");
    }

    #[test]
    fn test_reversed_cnot() {
        let cx = CliffordTableau::from_gate(CliffordGate::CX, &[1, 0], 2).unwrap();
        assert_eq!(image(&cx, "IX"), "+XX");
        assert_eq!(image(&cx, "ZI"), "+ZZ");
    }

    #[test]
    fn test_single_qubit_signs() {
        let h = CliffordTableau::from_gate(CliffordGate::H, &[0], 1).unwrap();
        assert_eq!(image(&h, "Y"), "-Y");
        let s = CliffordTableau::from_gate(CliffordGate::S, &[0], 1).unwrap();
        assert_eq!(image(&s, "Y"), "-X");
        let x = CliffordTableau::from_gate(CliffordGate::X, &[0], 1).unwrap();
        assert_eq!(image(&x, "Y"), "-Y");
    }

    #[test]
    fn test_sqrt_gates_compose_to_paulis() {
        let mut sx2 = CliffordTableau::identity(1);
        sx2.apply_gate(CliffordGate::SX, &[0]).unwrap();
        sx2.apply_gate(CliffordGate::SX, &[0]).unwrap();
        assert_eq!(sx2, CliffordTableau::from_gate(CliffordGate::X, &[0], 1).unwrap());

        let mut s2 = CliffordTableau::identity(1);
        s2.apply_gate(CliffordGate::S, &[0]).unwrap();
        s2.apply_gate(CliffordGate::S, &[0]).unwrap();
        assert_eq!(s2, CliffordTableau::from_gate(CliffordGate::Z, &[0], 1).unwrap());
    }

    #[test]
    fn test_then_matches_sequential_application() {
        let h = CliffordTableau::from_gate(CliffordGate::H, &[0], 2).unwrap();
        let cx = CliffordTableau::from_gate(CliffordGate::CX, &[0, 1], 2).unwrap();
        let composed = h.then(&cx).unwrap();

        let mut sequential = CliffordTableau::identity(2);
        sequential.apply_gate(CliffordGate::H, &[0]).unwrap();
        sequential.apply_gate(CliffordGate::CX, &[0, 1]).unwrap();
        assert_eq!(composed, sequential);
        // Z0 → X0 → X0 X1
        assert_eq!(image(&composed, "ZI"), "+XX");
    }

    #[test]
    fn test_inverse_undoes_tableau() {
        let mut t = CliffordTableau::identity(3);
        t.apply_gate(CliffordGate::H, &[0]).unwrap();
        t.apply_gate(CliffordGate::CY, &[0, 2]).unwrap();
        t.apply_gate(CliffordGate::S, &[1]).unwrap();
        t.apply_gate(CliffordGate::ISwap, &[1, 2]).unwrap();
        let inv = t.inverse().unwrap();
        assert!(t.then(&inv).unwrap().is_identity());
        assert!(inv.then(&t).unwrap().is_identity());
    }

    #[test]
    fn test_preimage_roundtrip() {
        let t = CliffordTableau::from_gate(CliffordGate::CZ, &[0, 1], 2).unwrap();
        let forward = t.image(&p("XY")).unwrap();
        let back = t.preimage(&forward.pauli).unwrap();
        assert_eq!(back.pauli, p("XY"));
        assert_eq!(back.negative, forward.negative);
    }

    #[test]
    fn test_invalid_images_rejected() {
        let x = vec![SignedPauli::positive(p("X"))];
        let z = vec![SignedPauli::positive(p("X"))];
        assert!(matches!(
            CliffordTableau::from_images(x, z),
            Err(IrError::InvalidTableau(_))
        ));
    }

    #[test]
    fn test_apply_gate_validation() {
        let mut t = CliffordTableau::identity(2);
        assert!(matches!(
            t.apply_gate(CliffordGate::CX, &[0, 0]),
            Err(IrError::DuplicateQubit { qubit: 0, .. })
        ));
        assert!(matches!(
            t.apply_gate(CliffordGate::H, &[4]),
            Err(IrError::QubitOutOfRange { qubit: 4, .. })
        ));
        assert!(matches!(
            t.image(&p("XXX")),
            Err(IrError::WidthMismatch { expected: 2, got: 3 })
        ));
    }
}
