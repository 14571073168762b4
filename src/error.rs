//! Error type shared by the numeric checks and the covariance regularizer.

/// Errors from the finiteness checks and covariance regularization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NumericError {
    /// A value contained NaN or infinity.
    #[error("`{expression}` contains NaN or infinite values")]
    NotFinite {
        /// Source text of the offending expression.
        expression: &'static str,
    },
    /// A square matrix was required.
    #[error("matrix is {rows}x{cols}, expected a square matrix")]
    NotSquare { rows: usize, cols: usize },
    /// Regularization epsilon must be finite and strictly positive.
    #[error("regularization epsilon must be finite and positive")]
    InvalidEpsilon,
    /// The regularized matrix is still not positive definite.
    #[error("matrix is not positive definite after eigenvalue clamping")]
    RegularizationFailed,
}
