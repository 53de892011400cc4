//! Dense, row-major matrices with a no-pivoting LU engine and the FastMap
//! pairwise-distance dimensionality reduction built on top of them.
//!
//! * [`matrix::Matrix`] owns a single contiguous buffer and provides arithmetic.
//! * [`echelon`] adds the in-place Doolittle decomposition, echelon forms and determinants.
//! * [`fastmap`] projects the rows of a matrix onto a handful of axes using only pairwise distances.

use thiserror::Error;

pub mod echelon;
pub mod fastmap;
pub mod matrix;
pub mod scalar;

pub use echelon::LuDecomposition;
pub use fastmap::{reduce_with_fastmap, FastMap, FastMapOutput};
pub use matrix::{dot_product, matmul, Matrix};
pub use scalar::Scalar;

/// Contract violations reported by matrix operations.
/// None of these are transient, retrying with the same inputs fails the same way.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LinalgError {
    /// Shapes are incompatible for the requested arithmetic.
    #[error("dimension mismatch: lhs is {lhs:?}, rhs is {rhs:?}")]
    DimensionMismatch {
        lhs: (usize, usize),
        rhs: (usize, usize),
    },

    /// Nested rows passed to [`Matrix::from_rows`] do not all have the same length.
    #[error("non-uniform rows: row {row} has length {found}, expected {expected}")]
    NonUniformRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("operation requires a square matrix, got {rows}x{cols}")]
    NonSquareMatrix { rows: usize, cols: usize },

    #[error("vector lengths differ: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    /// The no-pivoting LU pass would have divided by a zero diagonal entry.
    #[error("zero pivot at diagonal index {index}")]
    ZeroPivot { index: usize },
}

pub type Result<T> = std::result::Result<T, LinalgError>;
