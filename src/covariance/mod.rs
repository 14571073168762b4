//! Covariance regularization.
//!
//! Repeated `J · P · Jᵀ` products slowly erode the symmetry and definiteness
//! of a covariance. [`assure_positive_definite`] repairs a matrix by clamping
//! its eigenvalues from below; [`is_positive_definite`] is the matching test.
//!
//! ```
//! use manifold_ad::covariance::{assure_positive_definite, is_positive_definite};
//! use nalgebra::Matrix2;
//!
//! // eigenvalues 3 and -1
//! let mut p = Matrix2::new(1.0_f64, 2.0, 2.0, 1.0);
//! assert!(!is_positive_definite(&p));
//!
//! let clamped = assure_positive_definite(&mut p, 1e-6).unwrap();
//! assert_eq!(clamped, 1);
//! assert!(is_positive_definite(&p));
//! ```

use nalgebra::{
    Cholesky, DMatrix, Dim, Matrix, RawStorage, RealField, StorageMut, SymmetricEigen,
};

use crate::error::NumericError;
use crate::finite::Finite;
use crate::traits::FloatScalar;


/// Default lower bound for clamped eigenvalues.
pub const DEFAULT_EPSILON: f64 = 1e-10;

/// Settings for covariance regularization after a reference change.
#[derive(Debug, Clone, Copy)]
pub struct RegularizationSettings<T> {
    /// Eigenvalues below this are raised to it.
    pub epsilon: T,
    /// Whether to regularize at all.
    pub enabled: bool,
}

impl Default for RegularizationSettings<f64> {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            enabled: true,
        }
    }
}

impl Default for RegularizationSettings<f32> {
    fn default() -> Self {
        Self {
            epsilon: 1e-6,
            enabled: true,
        }
    }
}

fn to_dynamic<T, R, C, S>(m: &Matrix<T, R, C, S>) -> DMatrix<T>
where
    T: FloatScalar,
    R: Dim,
    C: Dim,
    S: RawStorage<T, R, C>,
{
    DMatrix::from_fn(m.nrows(), m.ncols(), |i, j| m[(i, j)])
}

/// Whether `m` is (numerically) symmetric positive definite.
///
/// Decided by a Cholesky factorization of the lower triangle: true iff it
/// succeeds with a strictly positive diagonal. Non-square, empty or
/// non-finite input gives `false`.
pub fn is_positive_definite<T, R, C, S>(m: &Matrix<T, R, C, S>) -> bool
where
    T: FloatScalar,
    R: Dim,
    C: Dim,
    S: RawStorage<T, R, C>,
{
    if m.nrows() != m.ncols() || m.is_empty() || !m.is_all_finite() {
        return false;
    }
    match Cholesky::new(to_dynamic(m)) {
        Some(chol) => chol
            .l_dirty()
            .diagonal()
            .iter()
            .all(|&d| d.is_finite() && d > T::zero()),
        None => false,
    }
}

/// Force `covariance` to be symmetric positive definite.
///
/// Computes the symmetric eigen-decomposition `V · Λ · Vᵀ`. If any eigenvalue
/// is below `epsilon`, every eigenvalue under `epsilon` plus a rounding margin
/// (`16 · n · machine epsilon` times the largest eigenvalue) is raised to that
/// level and the symmetrized recomposition is written back in place. A matrix
/// whose eigenvalues are all at least `epsilon` is left untouched, so a second
/// call on the output returns `Ok(0)` and changes nothing.
///
/// Returns the number of eigenvalues that were below `epsilon`.
///
/// # Errors
///
/// - [`NumericError::NotSquare`] for a non-square matrix
/// - [`NumericError::InvalidEpsilon`] unless `epsilon` is finite and positive
/// - [`NumericError::NotFinite`] if `covariance` contains NaN or infinity
/// - [`NumericError::RegularizationFailed`] if the result still fails
///   [`is_positive_definite`]; this also panics in debug builds and with the
///   `strict-asserts` feature
pub fn assure_positive_definite<T, R, C, S>(
    covariance: &mut Matrix<T, R, C, S>,
    epsilon: T,
) -> Result<usize, NumericError>
where
    T: FloatScalar,
    R: Dim,
    C: Dim,
    S: StorageMut<T, R, C>,
{
    let (rows, cols) = covariance.shape();
    if rows != cols {
        return Err(NumericError::NotSquare { rows, cols });
    }
    if !epsilon.is_finite() || epsilon <= T::zero() {
        return Err(NumericError::InvalidEpsilon);
    }
    crate::check_finite!(covariance)?;

    let mut eigen = SymmetricEigen::new(to_dynamic(covariance));
    let clamped = eigen.eigenvalues.iter().filter(|&&l| l < epsilon).count();
    if clamped == 0 {
        return Ok(0);
    }

    // Rebuilding perturbs every eigenvalue by a few ulps of the largest one.
    // Everything near the bound is lifted past that so the result passes the
    // `< epsilon` test above unchanged.
    let scale = eigen
        .eigenvalues
        .iter()
        .fold(epsilon, |m, &l| RealField::max(m, l.abs()));
    let rounding: T = nalgebra::convert(16.0 * rows as f64);
    let floor = epsilon + rounding * T::default_epsilon() * scale;
    for lambda in eigen.eigenvalues.iter_mut() {
        if *lambda < floor {
            *lambda = floor;
        }
    }

    // V is orthonormal, so Vᵀ stands in for V⁻¹
    let rebuilt = eigen.recompose();
    let half: T = nalgebra::convert(0.5);
    for i in 0..rows {
        for j in 0..cols {
            covariance[(i, j)] = (rebuilt[(i, j)] + rebuilt[(j, i)]) * half;
        }
    }
    tracing::debug!(clamped, dim = rows, "clamped covariance eigenvalues");

    if !is_positive_definite(covariance) {
        if crate::finite::strict_checks_enabled() {
            panic!("{}", NumericError::RegularizationFailed);
        }
        return Err(NumericError::RegularizationFailed);
    }
    Ok(clamped)
}
