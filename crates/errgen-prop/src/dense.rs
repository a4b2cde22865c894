//! Dense superoperator matrices for error generators.
//!
//! Sparse propagation never needs these; they exist for checking results
//! against dense simulation and for handing effective generators to code
//! that exponentiates them.

use errgen_ir::{PauliOp, PauliString};
use ndarray::{Array2, linalg::kron};
use num_complex::Complex64;

use crate::algebra::process_matrix;
use crate::error::{PropError, PropResult};
use crate::errorgen::ElementaryErrorgen;
use crate::layer::ErrorGeneratorLayer;

/// Largest register for which dense matrices are built (`4⁵ × 4⁵`).
pub const MAX_DENSE_QUBITS: usize = 5;

/// Basis for superoperator matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperatorBasis {
    /// Normalised Pauli basis: `M[k][j] = Tr(P_k E(P_j)) / 2ⁿ`.
    #[default]
    Pauli,
    /// Matrix units with column-stacking `vec`: `A ρ B ↦ Bᵀ ⊗ A`.
    Standard,
}

fn check_size(num_qubits: usize) -> PropResult<()> {
    if num_qubits > MAX_DENSE_QUBITS {
        return Err(PropError::DenseTooLarge {
            num_qubits,
            max: MAX_DENSE_QUBITS,
        });
    }
    Ok(())
}

/// The `2ⁿ × 2ⁿ` matrix of a Pauli string (qubit 0 is the leftmost factor).
pub fn pauli_matrix(pauli: &PauliString) -> Array2<Complex64> {
    let zero = Complex64::new(0.0, 0.0);
    let one = Complex64::new(1.0, 0.0);
    let i = Complex64::i();
    pauli
        .ops()
        .iter()
        .fold(Array2::from_elem((1, 1), one), |acc, op| {
            let factor = match op {
                PauliOp::I => [[one, zero], [zero, one]],
                PauliOp::X => [[zero, one], [one, zero]],
                PauliOp::Y => [[zero, -i], [i, zero]],
                PauliOp::Z => [[one, zero], [zero, -one]],
            };
            kron(&acc, &Array2::from(factor.to_vec()))
        })
}

/// Dense `4ⁿ × 4ⁿ` superoperator of one unit-rate generator.
pub fn basis_matrix(errgen: &ElementaryErrorgen, basis: OperatorBasis) -> PropResult<Array2<Complex64>> {
    let n = errgen.num_qubits();
    check_size(n)?;
    let dim = 1usize << (2 * n);
    let mut matrix = Array2::<Complex64>::zeros((dim, dim));
    let chi = process_matrix(errgen);
    match basis {
        OperatorBasis::Pauli => {
            for j in 0..dim {
                let input = PauliString::from_basis_index(n, j);
                for term in &chi {
                    let (left_phase, left) = term.left.multiply(&input);
                    let (right_phase, output) = left.multiply(&term.right);
                    matrix[[output.basis_index(), j]] +=
                        term.coeff * left_phase.times(right_phase).to_complex();
                }
            }
        }
        OperatorBasis::Standard => {
            for term in &chi {
                let left = pauli_matrix(&term.left);
                let right_t = pauli_matrix(&term.right).t().to_owned();
                matrix.scaled_add(term.coeff, &kron(&right_t, &left));
            }
        }
    }
    Ok(matrix)
}

/// `rate ·` [`basis_matrix`].
pub fn weighted_basis_matrix(
    errgen: &ElementaryErrorgen,
    rate: f64,
    basis: OperatorBasis,
) -> PropResult<Array2<Complex64>> {
    Ok(basis_matrix(errgen, basis)? * Complex64::new(rate, 0.0))
}

/// Sum of the weighted matrices of every term of a layer.
pub fn layer_matrix(
    layer: &ErrorGeneratorLayer,
    num_qubits: usize,
    basis: OperatorBasis,
) -> PropResult<Array2<Complex64>> {
    check_size(num_qubits)?;
    let dim = 1usize << (2 * num_qubits);
    let mut total = Array2::<Complex64>::zeros((dim, dim));
    for (label, rate) in layer.iter() {
        let width = label.generator().num_qubits();
        if width != num_qubits {
            return Err(errgen_ir::IrError::WidthMismatch {
                expected: num_qubits,
                got: width,
            }
            .into());
        }
        total.scaled_add(Complex64::new(rate, 0.0), &basis_matrix(label.generator(), basis)?);
    }
    Ok(total)
}

/// Dense per-timestep non-Markovian generators
///
///   K_m = ½ c_mm A_m A_m + Σ_{n<m} c_mn A_m A_n
///
/// for layers in chronological order, with `A_m` the [`layer_matrix`] of
/// propagated layer `m` and `c` the layer-by-layer correlation matrix.
pub fn nonmarkovian_generator_matrices(
    correlations: &Array2<f64>,
    layers: &[ErrorGeneratorLayer],
    num_qubits: usize,
    basis: OperatorBasis,
) -> PropResult<Vec<Array2<Complex64>>> {
    let count = layers.len();
    if correlations.dim() != (count, count) {
        return Err(PropError::InvalidCovariance(format!(
            "correlation matrix is {:?}, expected {count}x{count}",
            correlations.dim()
        )));
    }
    let dense = layers
        .iter()
        .map(|layer| layer_matrix(layer, num_qubits, basis))
        .collect::<PropResult<Vec<_>>>()?;

    let mut generators = Vec::with_capacity(count);
    for (m, a_m) in dense.iter().enumerate() {
        let mut k_m = a_m.dot(a_m) * Complex64::new(0.5 * correlations[[m, m]], 0.0);
        for (n, a_n) in dense.iter().enumerate().take(m) {
            k_m.scaled_add(Complex64::new(correlations[[m, n]], 0.0), &a_m.dot(a_n));
        }
        generators.push(k_m);
    }
    Ok(generators)
}
