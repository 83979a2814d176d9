//! Error types for symtensors.

use thiserror::Error;

/// Errors that can occur in codec, storage and contraction operations.
///
/// Every variant is detected before any summation loop runs. Numeric problems
/// (overflow, NaN) are never reported here; they flow through as values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TensorError {
    /// Index out of bounds.
    #[error("index out of bounds: index {index} is out of range for dimension {dim_size}")]
    IndexOutOfBounds { index: usize, dim_size: usize },

    /// Wrong number of indices provided.
    #[error("wrong number of indices: expected {expected}, got {actual}")]
    WrongNumberOfIndices { expected: usize, actual: usize },

    /// Component buffer length does not match the space dimension.
    #[error("shape mismatch: expected {expected} components, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Invalid construction argument (null buffer, zero dimension, ...).
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// An abstract-index expression is not well formed.
    #[error("structural mismatch: {0}")]
    StructuralMismatch(#[from] MismatchReason),

    /// Attempt to write through an alternating multi-index with a repeated
    /// entry.
    #[error("multi-index {indices:?} is a structural zero and cannot be written")]
    WriteToStructuralZero { indices: Vec<usize> },

    /// Operation requires a space with exactly two tensor factors.
    #[error("expected a two-factor tensor product, got {factors} factors")]
    NotAMatrix { factors: usize },
}

/// Why an abstract-index expression was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MismatchReason {
    #[error("index '{index}' occurs more than twice")]
    TooManyOccurrences { index: char },

    #[error("index '{index}' pairs two slots with the same variance")]
    SameVariance { index: char },

    #[error("index '{index}' pairs dimensions {left} and {right}")]
    DimensionMismatch {
        index: char,
        left: usize,
        right: usize,
    },

    #[error("index '{index}' pairs spaces that are not dual to each other")]
    NotDual { index: char },

    #[error("operand has {expected} index slots, got {actual} indices")]
    LeafArity { expected: usize, actual: usize },

    #[error("summands expose different free indices")]
    SummandIndices,

    #[error("index '{index}' is not free in the operand")]
    NotFree { index: char },

    #[error("index '{index}' ranges over a space with no factor decomposition")]
    NotComposite { index: char },

    #[error("factor decomposition needs {expected} indices, got {actual}")]
    FactorCount { expected: usize, actual: usize },

    #[error("index '{index}' does not range over the matching factor space")]
    FactorMismatch { index: char },

    #[error("{count} indices remain free where a scalar was expected")]
    FreeIndicesRemain { count: usize },

    #[error("target indices do not match the expression's free indices")]
    TargetIndices,
}

/// Explicit opt-out for runtime validation at a call site.
///
/// No `Default`: every caller states whether the check runs. `Elided` is for
/// values that already came out of a valid iteration; an invalid value on
/// that path panics or yields garbage instead of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Validate and return an error on failure.
    Enforced,
    /// Skip validation.
    Elided,
}

impl Check {
    #[inline]
    pub(crate) fn enforced(self) -> bool {
        matches!(self, Check::Enforced)
    }
}
