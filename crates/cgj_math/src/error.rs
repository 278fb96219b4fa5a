use thiserror::Error;

/// Errors raised by the math types.
///
/// All of these are local, synchronous failures caused by the input values;
/// the only recovery is for the caller to supply different input.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MathError {
    #[error("index {index} out of range for length {len}")]
    InvalidIndex { index: usize, len: usize },

    #[error("matrix is singular (determinant is zero)")]
    SingularMatrix,

    #[error("cannot normalize a zero-length value")]
    ZeroLength,
}

/// Result type for fallible math operations.
pub type MathResult<T> = Result<T, MathError>;
