//! Errgen Pauli and Clifford Intermediate Representation
//!
//! This crate provides the data structures the error-generator propagator is
//! built on: Pauli strings with exact phase tracking, Clifford tableaus, and
//! layered circuits of named Clifford gates.
//!
//! # Core Components
//!
//! - **Paulis**: [`PauliOp`], [`PauliString`] and [`SignedPauli`], plus the
//!   exact [`Phase`] group `{1, i, -1, -i}` produced by Pauli products
//! - **Tableaus**: [`CliffordTableau`] for the conjugation action of a
//!   Clifford unitary, with composition, inverse and preimages
//! - **Gates**: [`CliffordGate`] for built-in Clifford gates and [`GateSet`]
//!   for resolving circuit gate names
//! - **Circuits**: [`Circuit`], [`CircuitLayer`] and [`GateInstance`]
//!
//! # Example: Pushing a Pauli Through a Circuit
//!
//! ```rust
//! use errgen_ir::{Circuit, CircuitLayer, GateInstance, GateSet, PauliString};
//!
//! let circuit = Circuit::with_layers(
//!     2,
//!     vec![
//!         CircuitLayer::new(vec![GateInstance::new("Gh", vec![0])]),
//!         CircuitLayer::new(vec![GateInstance::new("Gcnot", vec![0, 1])]),
//!     ],
//! )
//! .unwrap();
//!
//! let gates = GateSet::standard();
//! let mut total = errgen_ir::CliffordTableau::identity(2);
//! for tableau in gates.circuit_tableaus(&circuit).unwrap() {
//!     total = total.then(&tableau).unwrap();
//! }
//!
//! // Z ⊗ I → X ⊗ I → X ⊗ X
//! let z0: PauliString = "ZI".parse().unwrap();
//! assert_eq!(total.image(&z0).unwrap().to_string(), "+XX");
//! ```
//!
//! # Conventions
//!
//! Pauli strings are written qubit 0 first: `"XZ"` is `X` on qubit 0 and `Z`
//! on qubit 1. Both `I` and `_` parse as identity.
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Standard names |
//! |------|--------|----------------|
//! | `I` | 1 | `Gi`, `id` |
//! | `X`, `Y`, `Z` | 1 | `Gxpi`, `Gypi`, `Gzpi`, `x`, `y`, `z` |
//! | `H` | 1 | `Gh`, `h` |
//! | `S`, `Sdg` | 1 | `Gzpi2`, `Gp`, `Gzmpi2`, `s`, `sdg` |
//! | `SX`, `SXdg` | 1 | `Gxpi2`, `Gxmpi2`, `sx`, `sxdg` |
//! | `SY`, `SYdg` | 1 | `Gypi2`, `Gympi2`, `sy`, `sydg` |
//! | `CX` | 2 | `Gcnot`, `cx` |
//! | `CY` | 2 | `cy` |
//! | `CZ` | 2 | `Gcphase`, `cz` |
//! | `Swap` | 2 | `Gswap`, `swap` |
//! | `ISwap` | 2 | `Giswap`, `iswap` |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod pauli;
pub mod tableau;

pub use circuit::{Circuit, CircuitLayer, GateInstance};
pub use error::{IrError, IrResult};
pub use gate::{CliffordGate, GateSet};
pub use pauli::{PauliOp, PauliString, Phase, SignedPauli};
pub use tableau::CliffordTableau;
