use core::fmt::Debug;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use nalgebra::RealField;
use num_traits::{One, Zero};

use crate::finite::Finite;

/// Trait for scalars that can flow through a differentiated expression.
///
/// Covers the real floats (`f32`, `f64`) and dual numbers built on top of
/// them ([`Jet<T, N>`](crate::Jet)), including nested jets. Manifold
/// operators written against `RealScalar` can be evaluated both on plain
/// values and on dual numbers carrying derivatives.
///
/// The elementary functions carry a `d` prefix so they never clash with the
/// methods `nalgebra::ComplexField` provides on the float types.
pub trait RealScalar:
    nalgebra::Scalar
    + Copy
    + Send
    + Sync
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
{
    /// The underlying real float (`Self` for floats, `T::Real` for `Jet<T, N>`).
    type Real: FloatScalar;

    /// Promote a real value into `Self` with zero derivative.
    fn from_value(r: Self::Real) -> Self;

    /// The real value, with all derivative information dropped.
    fn value(self) -> Self::Real;

    /// Convert an `f64` literal.
    #[inline]
    fn cast(x: f64) -> Self {
        Self::from_value(nalgebra::convert(x))
    }

    fn dsqrt(self) -> Self;
    fn dsin(self) -> Self;
    fn dcos(self) -> Self;
    fn dexp(self) -> Self;
    fn dln(self) -> Self;

    /// Four-quadrant arctangent of `self / x`.
    fn datan2(self, x: Self) -> Self;
}

/// Trait for plain real floats.
///
/// Required by the decompositions (Cholesky, symmetric eigen) and by anything
/// that compares values. Implies `RealScalar<Real = Self>`.
pub trait FloatScalar: RealScalar<Real = Self> + RealField + Finite + Copy + Debug {}

impl<T: RealScalar<Real = T> + RealField + Finite + Copy + Debug> FloatScalar for T {}

macro_rules! impl_real_scalar_float {
    ($($t:ty),*) => {
        $(
            impl RealScalar for $t {
                type Real = $t;

                #[inline] fn from_value(r: $t) -> $t { r }
                #[inline] fn value(self) -> $t { self }
                #[inline] fn dsqrt(self) -> $t { <$t>::sqrt(self) }
                #[inline] fn dsin(self) -> $t { <$t>::sin(self) }
                #[inline] fn dcos(self) -> $t { <$t>::cos(self) }
                #[inline] fn dexp(self) -> $t { <$t>::exp(self) }
                #[inline] fn dln(self) -> $t { <$t>::ln(self) }
                #[inline] fn datan2(self, x: $t) -> $t { <$t>::atan2(self, x) }
            }
        )*
    };
}

impl_real_scalar_float!(f32, f64);
