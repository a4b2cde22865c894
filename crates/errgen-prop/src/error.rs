//! Error types for the propagation crate.

use thiserror::Error;

/// Errors produced by error-generator construction and propagation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PropError {
    /// A configuration the engine does not support (higher BCH or cumulant
    /// orders). Raised before any work starts.
    #[error("Not implemented: {feature}")]
    NotImplemented {
        /// Description of the unsupported request.
        feature: String,
    },

    /// Configuration values are malformed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A circuit gate has no entry in the noise model.
    #[error("Gate '{0}' has no entry in the noise model")]
    UnknownGate(String),

    /// A gate targets a qubit outside the circuit.
    #[error("Gate '{gate}' targets qubit {qubit} but the circuit only has {num_qubits} qubits")]
    QubitOutOfRange {
        /// Gate label.
        gate: String,
        /// The offending qubit index.
        qubit: usize,
        /// Circuit width.
        num_qubits: usize,
    },

    /// A gate-local Pauli pattern does not match the gate's arity.
    #[error("Error pattern '{pattern}' has length {got}, but gate '{gate}' acts on {expected} qubits")]
    PatternArity {
        /// Gate label.
        gate: String,
        /// The pattern.
        pattern: String,
        /// Gate arity.
        expected: usize,
        /// Pattern length.
        got: usize,
    },

    /// An elementary error generator violates its structural rules.
    #[error("Invalid error generator: {0}")]
    InvalidErrorgen(String),

    /// Custom error layers do not line up with the circuit.
    #[error("Expected {expected} error layers (one per circuit layer), got {got}")]
    LayerCountMismatch {
        /// Circuit depth.
        expected: usize,
        /// Supplied layers.
        got: usize,
    },

    /// A propagated label is missing the provenance the cumulant expansion needs.
    #[error("Error generator {0} carries no provenance (initial generator, gate, circuit time)")]
    MissingProvenance(String),

    /// A propagated label has no entry in its layer's sign-correction map.
    #[error("No sign correction recorded for error generator {0}")]
    MissingSignCorrection(String),

    /// Covariance registrations are malformed.
    #[error("Invalid covariance: {0}")]
    InvalidCovariance(String),

    /// A dense matrix would exceed the supported size.
    #[error("Dense matrices are limited to {max} qubits, got {num_qubits}")]
    DenseTooLarge {
        /// Requested width.
        num_qubits: usize,
        /// Largest supported width.
        max: usize,
    },

    /// The circuit has no layers.
    #[error("Circuit has no layers")]
    EmptyCircuit,

    /// Pauli, tableau or circuit error.
    #[error("IR error: {0}")]
    Ir(#[from] errgen_ir::IrError),
}

impl PropError {
    /// Shorthand for [`PropError::NotImplemented`].
    pub(crate) fn not_implemented(feature: impl Into<String>) -> Self {
        PropError::NotImplemented {
            feature: feature.into(),
        }
    }
}

/// Result type for propagation operations.
pub type PropResult<T> = Result<T, PropError>;
