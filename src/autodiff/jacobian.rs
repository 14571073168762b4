use nalgebra::{RealField, SMatrix, SVector, Scalar};

use crate::jet::Jet;
use crate::traits::{FloatScalar, RealScalar};

use super::auto_matrix::AutoMatrix;
use super::derivator::derivator;

/// Read the Jacobian out of a vector of jets.
///
/// Row `j` of the result is the derivative vector of `result[j]`. `result` is
/// normally the output of a function evaluated at a point seeded with
/// [`derivator`].
///
/// ```
/// use manifold_ad::autodiff::{derivator, extract_jacobian};
/// use nalgebra::Vector2;
///
/// // f(x) = [x0 * x1, 3 x0] at x = (2, 5)
/// let x = Vector2::new(2.0_f64, 5.0);
/// let d = derivator::<f64, 2>();
/// let (x0, x1) = (d[0] + x[0], d[1] + x[1]);
/// let y = Vector2::new(x0 * x1, x0 * 3.0);
///
/// let j = extract_jacobian(&y).to_fixed();
/// assert_eq!(j, nalgebra::Matrix2::new(5.0, 2.0, 3.0, 0.0));
/// ```
pub fn extract_jacobian<T: RealScalar, const L: usize, const R: usize>(
    result: &SVector<Jet<T, R>, L>,
) -> AutoMatrix<T, L, R> {
    AutoMatrix::from_fn(|j, k| result[j].v[k])
}

/// Jacobian of `f` at `x` by forward-mode differentiation.
///
/// `f` receives `x` seeded with the `N`-dimensional basis and must be written
/// against jets; one evaluation yields all `M × N` partial derivatives.
///
/// ```
/// use manifold_ad::autodiff::jacobian;
/// use manifold_ad::{Jet, RealScalar};
/// use nalgebra::{SVector, Vector1, Vector2};
///
/// let x = Vector2::new(0.3_f64, 2.0);
/// let j = jacobian(
///     |x: &SVector<Jet<f64, 2>, 2>| Vector1::new(x[0].dsin() * x[1]),
///     &x,
/// );
/// assert!((j[(0, 0)] - 0.3_f64.cos() * 2.0).abs() < 1e-15);
/// assert!((j[(0, 1)] - 0.3_f64.sin()).abs() < 1e-15);
/// ```
pub fn jacobian<T, F, const M: usize, const N: usize>(f: F, x: &SVector<T, N>) -> AutoMatrix<T, M, N>
where
    T: RealScalar,
    F: FnOnce(&SVector<Jet<T, N>, N>) -> SVector<Jet<T, N>, M>,
{
    let basis = derivator::<T, N>();
    let seeded = SVector::from_fn(|i, _| basis[i] + x[i]);
    extract_jacobian(&f(&seeded))
}

/// Numerical Jacobian of a plain-float function, for checking jet results.
///
/// Column `k` is the forward difference along the `k`-th tangent direction,
/// stepped by `sqrt(machine epsilon)` scaled to the magnitude of `x[k]`. Agreement
/// with [`jacobian`] or a reference-change Jacobian is only to about
/// `1e-7` relative.
pub fn finite_difference_jacobian<T: FloatScalar, const M: usize, const N: usize>(
    mut f: impl FnMut(&SVector<T, N>) -> SVector<T, M>,
    x: &SVector<T, N>,
) -> SMatrix<T, M, N> {
    let base = f(x);
    let root_eps = T::default_epsilon().sqrt();

    let mut columns = SMatrix::<T, M, N>::zeros();
    for k in 0..N {
        let step = root_eps * RealField::max(x[k].abs(), T::one());
        let mut stepped = *x;
        stepped[k] += step;
        columns.set_column(k, &((f(&stepped) - base) / step));
    }
    columns
}

/// Owned copy of `v[start..start + LEN]`.
///
/// Panics if the segment runs past the end of `v`.
///
/// ```
/// use manifold_ad::autodiff::segment;
/// use nalgebra::{Vector2, Vector4};
///
/// let noise = Vector4::new(1.0, 2.0, 3.0, 4.0);
/// assert_eq!(segment::<_, 2, 4>(&noise, 1), Vector2::new(2.0, 3.0));
/// ```
#[inline]
pub fn segment<T: Scalar, const LEN: usize, const N: usize>(
    v: &SVector<T, N>,
    start: usize,
) -> SVector<T, LEN> {
    v.fixed_rows::<LEN>(start).into_owned()
}
