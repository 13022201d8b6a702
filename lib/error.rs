//! Error types shared by the lattice, simulator, and analysis modules.

use thiserror::Error;

/// Result alias for fallible operations in this crate.
pub type ToricResult<T> = Result<T, ToricError>;

/// Errors arising from bad lattice geometry, bad qubit indices, resource
/// limits, or malformed analysis inputs.
///
/// Numerical edge cases (vanishing mutual information, eigenvalues below the
/// entropy cutoff) are handled by policy and never show up here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToricError {
    /// Lattice dimensions must both be at least 1.
    #[error("lattice dimensions must be positive: got {lx} × {ly}")]
    InvalidLattice { lx: usize, ly: usize },

    /// A qubit index falls outside the register.
    #[error("qubit index {index} out of range for a register of {n} qubits")]
    QubitOutOfRange { index: usize, n: usize },

    /// A qubit index appears more than once in a subsystem.
    #[error("qubit index {0} appears more than once in subsystem")]
    DuplicateQubit(usize),

    /// A Hamiltonian term index falls outside the term list.
    #[error("term index {index} out of range for {len} terms")]
    TermOutOfRange { index: usize, len: usize },

    /// An operator acts on a different number of qubits than the register.
    #[error("operator acts on {actual} qubits, but the register holds {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    /// The requested register is too large to allocate safely.
    #[error("{n} qubits exceeds the supported maximum of {max} for {what}")]
    TooManyQubits { n: usize, max: usize, what: &'static str },

    /// A matrix argument was expected to be square.
    #[error("expected a square matrix, got {rows} × {cols}")]
    NotSquare { rows: usize, cols: usize },

    /// A matrix argument was expected to be symmetric.
    #[error("matrix is not symmetric at ({i}, {j}): {a} vs {b}")]
    NotSymmetric { i: usize, j: usize, a: f64, b: f64 },

    /// A matrix argument contains a NaN or infinity.
    #[error("non-finite entry at ({0}, {1})")]
    NonFinite(usize, usize),

    /// Catch-all for out-of-domain configuration values.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl ToricError {
    pub(crate) fn invalid_parameter<S>(name: &'static str, reason: S) -> Self
    where S: Into<String>
    {
        Self::InvalidParameter { name, reason: reason.into() }
    }
}
