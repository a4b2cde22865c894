//! Property-based tests for Clifford tableaus.
//!
//! Random Clifford circuits must yield valid tableaus whose inverse and
//! preimage operations undo the forward conjugation.

use errgen_ir::{CliffordGate, CliffordTableau, PauliOp, PauliString};
use proptest::prelude::*;

const SINGLE_QUBIT: [CliffordGate; 11] = [
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
];

const TWO_QUBIT: [CliffordGate; 5] = [
    CliffordGate::CX,
    CliffordGate::CY,
    CliffordGate::CZ,
    CliffordGate::Swap,
    CliffordGate::ISwap,
];

/// A gate together with its target qubits.
#[derive(Debug, Clone)]
struct GateOp {
    gate: CliffordGate,
    qubits: Vec<usize>,
}

fn arb_gate_op(num_qubits: usize) -> impl Strategy<Value = GateOp> {
    let single = (prop::sample::select(SINGLE_QUBIT.to_vec()), 0..num_qubits)
        .prop_map(|(gate, q)| GateOp {
            gate,
            qubits: vec![q],
        });
    let pair = (
        prop::sample::select(TWO_QUBIT.to_vec()),
        0..num_qubits,
        1..num_qubits.max(2),
    )
        .prop_map(move |(gate, a, offset)| GateOp {
            gate,
            qubits: vec![a, (a + offset) % num_qubits.max(2)],
        });
    if num_qubits >= 2 {
        prop_oneof![single, pair].boxed()
    } else {
        single.boxed()
    }
}

/// Random tableaus on 1-4 qubits built from up to 12 gates.
fn arb_tableau() -> impl Strategy<Value = CliffordTableau> {
    (1_usize..=4).prop_flat_map(|n| {
        prop::collection::vec(arb_gate_op(n), 0..=12).prop_map(move |ops| {
            let mut tableau = CliffordTableau::identity(n);
            for op in ops {
                tableau
                    .apply_gate(op.gate, &op.qubits)
                    .expect("generated gates are valid");
            }
            tableau
        })
    })
}

fn arb_pauli(n: usize) -> impl Strategy<Value = PauliString> {
    prop::collection::vec(prop::sample::select(PauliOp::ALL.to_vec()), n)
        .prop_map(PauliString::from_vec)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Composing a tableau with its inverse gives the identity.
    #[test]
    fn inverse_composes_to_identity(tableau in arb_tableau()) {
        let inverse = tableau.inverse().unwrap();
        prop_assert!(tableau.then(&inverse).unwrap().is_identity());
        prop_assert!(inverse.then(&tableau).unwrap().is_identity());
    }

    /// `preimage(image(P))` returns `P` with a positive sign.
    #[test]
    fn preimage_undoes_image(
        (tableau, pauli) in arb_tableau().prop_flat_map(|t| {
            let n = t.num_qubits();
            (Just(t), arb_pauli(n))
        })
    ) {
        let forward = tableau.image(&pauli).unwrap();
        let back = tableau.preimage(&forward.pauli).unwrap();
        prop_assert_eq!(&back.pauli, &pauli);
        prop_assert_eq!(back.negative, forward.negative);
    }

    /// Conjugation preserves weight-zero-ness and commutation relations.
    #[test]
    fn image_preserves_commutation(
        (tableau, a, b) in arb_tableau().prop_flat_map(|t| {
            let n = t.num_qubits();
            (Just(t), arb_pauli(n), arb_pauli(n))
        })
    ) {
        let ia = tableau.image(&a).unwrap();
        let ib = tableau.image(&b).unwrap();
        prop_assert_eq!(a.commutes_with(&b), ia.pauli.commutes_with(&ib.pauli));
        prop_assert_eq!(a.is_identity(), ia.pauli.is_identity());
    }

    /// The image of a product is the product of images (signs included).
    #[test]
    fn image_is_multiplicative(
        (tableau, a, b) in arb_tableau().prop_flat_map(|t| {
            let n = t.num_qubits();
            (Just(t), arb_pauli(n), arb_pauli(n))
        })
    ) {
        let (phase, product) = a.multiply(&b);
        let image_product = tableau.image(&product).unwrap();
        let ia = tableau.image(&a).unwrap();
        let ib = tableau.image(&b).unwrap();
        let (image_phase, image_ab) = ia.pauli.multiply(&ib.pauli);

        prop_assert_eq!(&image_ab, &image_product.pauli);
        let lhs = phase.times(image_product.phase());
        let rhs = image_phase.times(ia.phase()).times(ib.phase());
        prop_assert_eq!(lhs, rhs);
    }
}
