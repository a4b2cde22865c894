//! Error types for the IR crate.

use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A gate or Pauli references a qubit outside the circuit.
    #[error("Qubit {qubit} is out of range for a {num_qubits}-qubit circuit{}", format_gate_context(.gate_name))]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: usize,
        /// Width of the circuit.
        num_qubits: usize,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// The same qubit appears twice within one gate or one layer.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: usize,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Gate requires different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: usize,
        /// Actual number of qubits provided.
        got: usize,
    },

    /// Gate name is not registered in the gate set.
    #[error("Gate '{0}' is not a recognised Clifford gate")]
    UnknownGate(String),

    /// A Pauli string could not be parsed.
    #[error("Invalid Pauli string '{0}'")]
    InvalidPauli(String),

    /// Two operands have different widths.
    #[error("Width mismatch: expected {expected} qubits, got {got}")]
    WidthMismatch {
        /// Expected width.
        expected: usize,
        /// Actual width.
        got: usize,
    },

    /// A tableau does not describe a Clifford operation.
    #[error("Invalid tableau: {0}")]
    InvalidTableau(String),
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
