//! Forward-mode dual numbers.
//!
//! A [`Jet<T, N>`] is a value `a` together with its derivatives `v` with
//! respect to `N` independent infinitesimal inputs. Arithmetic propagates the
//! derivatives by the chain rule, so evaluating a function on jets seeded with
//! [`derivator`](crate::autodiff::derivator) yields the function value and
//! its full Jacobian in a single pass.

use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num_traits::{One, Zero};

use crate::traits::RealScalar;

/// Dual number with `N` derivative components.
///
/// # Example
///
/// ```
/// use manifold_ad::Jet;
///
/// // d/dx (x * x) at x = 3
/// let x = Jet::<f64, 1>::variable(3.0, 0);
/// let y = x * x;
/// assert_eq!(y.a, 9.0);
/// assert_eq!(y.v, [6.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jet<T, const N: usize> {
    /// Scalar part.
    pub a: T,
    /// Infinitesimal part: `v[i] = ∂a/∂xᵢ`.
    pub v: [T; N],
}

impl<T: RealScalar, const N: usize> Jet<T, N> {
    /// A jet with value `a` and the given derivatives.
    #[inline]
    pub fn new(a: T, v: [T; N]) -> Self {
        Self { a, v }
    }

    /// A constant: value `a`, all derivatives zero.
    #[inline]
    pub fn constant(a: T) -> Self {
        Self {
            a,
            v: [T::zero(); N],
        }
    }

    /// The `i`-th independent variable evaluated at `a` (`v = eᵢ`).
    ///
    /// Panics if `i >= N`.
    #[inline]
    pub fn variable(a: T, i: usize) -> Self {
        let mut v = [T::zero(); N];
        v[i] = T::one();
        Self { a, v }
    }

    /// Apply a scalar function with known value `fa` and derivative `dfa`.
    #[inline]
    fn chain(self, fa: T, dfa: T) -> Self {
        Self {
            a: fa,
            v: self.v.map(|d| d * dfa),
        }
    }
}

// ---------------------------------------------------------------------------
// Jet ⊕ Jet
// ---------------------------------------------------------------------------

impl<T: RealScalar, const N: usize> Add for Jet<T, N> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            a: self.a + rhs.a,
            v: core::array::from_fn(|i| self.v[i] + rhs.v[i]),
        }
    }
}

impl<T: RealScalar, const N: usize> Sub for Jet<T, N> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            a: self.a - rhs.a,
            v: core::array::from_fn(|i| self.v[i] - rhs.v[i]),
        }
    }
}

impl<T: RealScalar, const N: usize> Mul for Jet<T, N> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self {
            a: self.a * rhs.a,
            v: core::array::from_fn(|i| self.a * rhs.v[i] + rhs.a * self.v[i]),
        }
    }
}

impl<T: RealScalar, const N: usize> Div for Jet<T, N> {
    type Output = Self;
    #[inline]
    fn div(self, rhs: Self) -> Self {
        // (a + u)/(b + w) = a/b + (u - (a/b) w) / b
        let inv = T::one() / rhs.a;
        let q = self.a * inv;
        Self {
            a: q,
            v: core::array::from_fn(|i| (self.v[i] - q * rhs.v[i]) * inv),
        }
    }
}

impl<T: RealScalar, const N: usize> Neg for Jet<T, N> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self {
            a: -self.a,
            v: self.v.map(|d| -d),
        }
    }
}

// ---------------------------------------------------------------------------
// Jet ⊕ T
// ---------------------------------------------------------------------------

impl<T: RealScalar, const N: usize> Add<T> for Jet<T, N> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: T) -> Self {
        Self {
            a: self.a + rhs,
            v: self.v,
        }
    }
}

impl<T: RealScalar, const N: usize> Sub<T> for Jet<T, N> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: T) -> Self {
        Self {
            a: self.a - rhs,
            v: self.v,
        }
    }
}

impl<T: RealScalar, const N: usize> Mul<T> for Jet<T, N> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: T) -> Self {
        Self {
            a: self.a * rhs,
            v: self.v.map(|d| d * rhs),
        }
    }
}

impl<T: RealScalar, const N: usize> Div<T> for Jet<T, N> {
    type Output = Self;
    #[inline]
    fn div(self, rhs: T) -> Self {
        let inv = T::one() / rhs;
        self * inv
    }
}

macro_rules! impl_jet_assign {
    ($($trait:ident :: $method:ident => $op:tt),*) => {
        $(
            impl<T: RealScalar, const N: usize> $trait for Jet<T, N> {
                #[inline]
                fn $method(&mut self, rhs: Self) {
                    *self = *self $op rhs;
                }
            }
        )*
    };
}

impl_jet_assign!(
    AddAssign::add_assign => +,
    SubAssign::sub_assign => -,
    MulAssign::mul_assign => *,
    DivAssign::div_assign => /
);

impl<T: RealScalar, const N: usize> Zero for Jet<T, N> {
    #[inline]
    fn zero() -> Self {
        Self::constant(T::zero())
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.a.is_zero() && self.v.iter().all(Zero::is_zero)
    }
}

impl<T: RealScalar, const N: usize> One for Jet<T, N> {
    #[inline]
    fn one() -> Self {
        Self::constant(T::one())
    }
}

impl<T: RealScalar, const N: usize> RealScalar for Jet<T, N> {
    type Real = T::Real;

    #[inline]
    fn from_value(r: T::Real) -> Self {
        Self::constant(T::from_value(r))
    }

    #[inline]
    fn value(self) -> T::Real {
        self.a.value()
    }

    #[inline]
    fn dsqrt(self) -> Self {
        let s = self.a.dsqrt();
        self.chain(s, T::one() / (s + s))
    }

    #[inline]
    fn dsin(self) -> Self {
        self.chain(self.a.dsin(), self.a.dcos())
    }

    #[inline]
    fn dcos(self) -> Self {
        self.chain(self.a.dcos(), -self.a.dsin())
    }

    #[inline]
    fn dexp(self) -> Self {
        let e = self.a.dexp();
        self.chain(e, e)
    }

    #[inline]
    fn dln(self) -> Self {
        self.chain(self.a.dln(), T::one() / self.a)
    }

    #[inline]
    fn datan2(self, x: Self) -> Self {
        // d atan2(y, x) = (x dy - y dx) / (x² + y²)
        let inv = T::one() / (x.a * x.a + self.a * self.a);
        Self {
            a: self.a.datan2(x.a),
            v: core::array::from_fn(|i| (x.a * self.v[i] - self.a * x.v[i]) * inv),
        }
    }
}

impl<T: core::fmt::Display, const N: usize> core::fmt::Display for Jet<T, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} + [", self.a)?;
        for (i, d) in self.v.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", d)?;
        }
        write!(f, "]ε")
    }
}
