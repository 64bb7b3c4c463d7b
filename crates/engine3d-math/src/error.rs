use std::fmt;

use thiserror::Error;

/// Size of a vector or shape of a matrix, as reported in errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Vector length.
    Len(usize),
    /// Matrix `rows x cols`.
    Grid(usize, usize),
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Len(n) => write!(f, "{n}"),
            Shape::Grid(r, c) => write!(f, "{r}x{c}"),
        }
    }
}

/// Errors reported by vector and matrix operations.
///
/// Every check runs before the receiver is touched, so an `Err` always means
/// the operands are exactly as they were before the call.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    /// Operand sizes or shapes are incompatible.
    #[error("{op}: dimension mismatch (expected {expected}, found {found})")]
    DimensionMismatch {
        op: &'static str,
        expected: Shape,
        found: Shape,
    },

    /// The operation has no meaningful result for these operands
    /// (zero-length vector, non-square matrix, ...).
    #[error("{op}: degenerate operation ({reason})")]
    DegenerateOperation {
        op: &'static str,
        reason: &'static str,
    },
}

impl MathError {
    pub(crate) fn mismatch(op: &'static str, expected: Shape, found: Shape) -> Self {
        log::trace!("{op}: dimension mismatch, expected {expected}, found {found}");
        MathError::DimensionMismatch { op, expected, found }
    }

    pub(crate) fn degenerate(op: &'static str, reason: &'static str) -> Self {
        log::trace!("{op}: degenerate operation, {reason}");
        MathError::DegenerateOperation { op, reason }
    }

    /// Returns `true` for [`MathError::DimensionMismatch`].
    pub fn is_dimension_mismatch(&self) -> bool {
        matches!(self, MathError::DimensionMismatch { .. })
    }

    /// Returns `true` for [`MathError::DegenerateOperation`].
    pub fn is_degenerate(&self) -> bool {
        matches!(self, MathError::DegenerateOperation { .. })
    }
}

pub type Result<T> = std::result::Result<T, MathError>;
