//! Kernel Errors
//!
//! Every failure the kernel can report. Errors surface immediately and
//! are never retried or downgraded: a caller receives either a fully
//! valid result or one of these variants, never a value carrying NaN or
//! Inf from arithmetic that was allowed to continue.

/// Errors raised by the spatial search and QR factorization routines.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KernelError {
    /// Input dimensions do not fit the operation.
    ///
    /// Raised for ragged point lists, zero-dimensional points, non-square
    /// matrices and point matrices with more rows (dimensions) than
    /// columns (points).
    #[error("Invalid shape: expected {expected}, found {found}")]
    InvalidShape {
        /// Description of the accepted shape
        expected: String,
        /// Description of the shape received
        found: String,
    },

    /// A pairwise search needs at least two points.
    #[error("Insufficient points: pairwise search needs at least 2, found {found}")]
    InsufficientPoints {
        /// Number of points received
        found: usize,
    },

    /// Gram-Schmidt produced a residual column with (near) zero norm.
    #[error("Degenerate matrix: residual of column {column} has norm {norm:e}")]
    DegenerateMatrix {
        /// Column whose residual collapsed (0-based)
        column: usize,
        /// Norm of the residual before normalization
        norm: f64,
    },

    /// The triangular factor cannot be inverted.
    #[error("Singular matrix: pivot {index} is {pivot:e}")]
    SingularMatrix {
        /// Diagonal index of the offending pivot (0-based)
        index: usize,
        /// Value of the pivot
        pivot: f64,
    },

    /// Input contains NaN or infinite entries.
    #[error("Non-finite input in {context}")]
    NonFinite {
        /// Where the value was found
        context: String,
    },
}

impl KernelError {
    /// Shorthand for building an [`KernelError::InvalidShape`].
    pub fn invalid_shape(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::InvalidShape {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Check if the error was caused by malformed input rather than by
    /// the numerics of a well-formed input.
    #[inline]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidShape { .. } | Self::InsufficientPoints { .. } | Self::NonFinite { .. }
        )
    }

    /// Check if the error reflects rank deficiency of a matrix.
    #[inline]
    pub fn is_numerical_error(&self) -> bool {
        matches!(
            self,
            Self::DegenerateMatrix { .. } | Self::SingularMatrix { .. }
        )
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, KernelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(KernelError::InsufficientPoints { found: 1 }.is_input_error());
        assert!(KernelError::invalid_shape("square", "2x3").is_input_error());
        assert!(KernelError::SingularMatrix { index: 0, pivot: 0.0 }.is_numerical_error());
        assert!(!KernelError::DegenerateMatrix { column: 1, norm: 0.0 }.is_input_error());
    }

    #[test]
    fn test_display() {
        let err = KernelError::invalid_shape("rows <= columns", "3 rows x 2 columns");
        assert_eq!(
            err.to_string(),
            "Invalid shape: expected rows <= columns, found 3 rows x 2 columns"
        );
    }
}
