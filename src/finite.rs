//! NaN / infinity checks for scalars, jets and matrices.
//!
//! [`check_finite!`](crate::check_finite) returns an error naming the first
//! offending expression; [`assert_finite!`](crate::assert_finite) panics
//! instead, but only in debug builds or with the `strict-asserts` feature.
//!
//! ```
//! use manifold_ad::{check_finite, NumericError};
//! use nalgebra::Vector2;
//!
//! let good = Vector2::new(1.0_f64, 2.0);
//! let bad = Vector2::new(1.0_f64, f64::NAN);
//! assert_eq!(check_finite!(good), Ok(()));
//! assert_eq!(
//!     check_finite!(good, bad),
//!     Err(NumericError::NotFinite { expression: "bad" })
//! );
//! ```

use nalgebra::{Dim, Matrix, RawStorage, Scalar};

use crate::autodiff::AutoMatrix;
use crate::jet::Jet;

/// Values that can be checked for NaN and infinity.
pub trait Finite {
    /// `true` if no component is NaN or infinite.
    fn is_all_finite(&self) -> bool;
}

macro_rules! impl_finite_float {
    ($($t:ty),*) => {
        $(
            impl Finite for $t {
                #[inline]
                fn is_all_finite(&self) -> bool {
                    self.is_finite()
                }
            }
        )*
    };
}

impl_finite_float!(f32, f64);

impl<T: Finite, const N: usize> Finite for Jet<T, N> {
    #[inline]
    fn is_all_finite(&self) -> bool {
        self.a.is_all_finite() && self.v.iter().all(Finite::is_all_finite)
    }
}

impl<T, R, C, S> Finite for Matrix<T, R, C, S>
where
    T: Scalar + Finite,
    R: Dim,
    C: Dim,
    S: RawStorage<T, R, C>,
{
    fn is_all_finite(&self) -> bool {
        self.iter().all(Finite::is_all_finite)
    }
}

impl<T: Scalar + Finite, const R: usize, const C: usize> Finite for AutoMatrix<T, R, C> {
    fn is_all_finite(&self) -> bool {
        self.iter().all(Finite::is_all_finite)
    }
}

impl<T: Finite + ?Sized> Finite for &T {
    #[inline]
    fn is_all_finite(&self) -> bool {
        (**self).is_all_finite()
    }
}

impl<T: Finite + ?Sized> Finite for &mut T {
    #[inline]
    fn is_all_finite(&self) -> bool {
        (**self).is_all_finite()
    }
}

/// Whether [`assert_finite!`](crate::assert_finite) is active in this build.
///
/// True with debug assertions or the `strict-asserts` feature.
#[inline]
pub const fn strict_checks_enabled() -> bool {
    cfg!(any(debug_assertions, feature = "strict-asserts"))
}

/// Check every argument for NaN / infinity.
///
/// Evaluates to `Result<(), NumericError>`; the error names the first
/// non-finite argument by its source text. With no arguments it is `Ok(())`.
#[macro_export]
macro_rules! check_finite {
    () => {
        ::core::result::Result::<(), $crate::NumericError>::Ok(())
    };
    ($($e:expr),+ $(,)?) => {{
        let mut result: ::core::result::Result<(), $crate::NumericError> =
            ::core::result::Result::Ok(());
        $(
            if result.is_ok() && !$crate::finite::Finite::is_all_finite(&$e) {
                result = ::core::result::Result::Err($crate::NumericError::NotFinite {
                    expression: ::core::stringify!($e),
                });
            }
        )+
        result
    }};
}

/// Panic if any argument contains NaN / infinity.
///
/// Active with debug assertions or the `strict-asserts` feature of this
/// crate; a no-op otherwise.
#[macro_export]
macro_rules! assert_finite {
    ($($e:expr),* $(,)?) => {
        if $crate::finite::strict_checks_enabled() {
            if let ::core::result::Result::Err(err) = $crate::check_finite!($($e),*) {
                ::core::panic!("{}", err);
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NumericError;
    use nalgebra::{DMatrix, Matrix2, Vector3};

    #[test]
    fn floats() {
        assert!(1.5_f64.is_all_finite());
        assert!(!f64::NAN.is_all_finite());
        assert!(!f32::INFINITY.is_all_finite());
        assert!(!f64::NEG_INFINITY.is_all_finite());
    }

    #[test]
    fn jets_check_derivatives_too() {
        assert!(Jet::<f64, 2>::variable(1.0, 0).is_all_finite());
        let bad = Jet::<f64, 2>::new(1.0, [0.0, f64::NAN]);
        assert!(!bad.is_all_finite());
        let nested = Jet::<Jet<f64, 1>, 1>::constant(Jet::new(0.0, [f64::INFINITY]));
        assert!(!nested.is_all_finite());
    }

    #[test]
    fn matrices_and_views() {
        let mut m = Matrix2::new(1.0, 2.0, 3.0, 4.0);
        assert!(m.is_all_finite());
        m[(1, 0)] = f64::NAN;
        assert!(!m.is_all_finite());
        assert!(m.row(0).is_all_finite());
        assert!(!m.column(0).is_all_finite());
        assert!(DMatrix::<f64>::zeros(3, 5).is_all_finite());
        assert!(AutoMatrix::<f64, 3, 3>::identity().is_all_finite());
    }

    #[test]
    fn check_reports_first_offender() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(f64::NAN, 0.0, 0.0);
        let c = f64::INFINITY;
        assert_eq!(check_finite!(a), Ok(()));
        assert_eq!(
            check_finite!(a, b, c),
            Err(NumericError::NotFinite { expression: "b" })
        );
        assert_eq!(
            check_finite!(a, c, b),
            Err(NumericError::NotFinite { expression: "c" })
        );
    }

    #[test]
    fn check_with_no_arguments_passes() {
        assert_eq!(check_finite!(), Ok(()));
    }

    #[test]
    fn check_accepts_references() {
        let v = Vector3::new(0.0, 1.0, 2.0);
        let r = &v;
        assert_eq!(check_finite!(r, &v), Ok(()));
    }

    #[test]
    fn assert_passes_on_finite_values() {
        let x = 2.0_f64;
        assert_finite!(x, Matrix2::<f64>::identity());
        assert_finite!();
    }

    #[test]
    #[cfg(any(debug_assertions, feature = "strict-asserts"))]
    #[should_panic(expected = "contains NaN")]
    fn assert_panics_in_strict_builds() {
        let x = f64::NAN;
        assert_finite!(x);
    }
}
