//! Compile-time classification of state types.
//!
//! Every type that can appear in a filter state, or inside a composite
//! manifold, resolves to a [`StateDescriptor`]: its scalar type, its degrees
//! of freedom (tangent-space dimension) and its global size (number of stored
//! coordinates). Resolution follows a fixed priority:
//!
//! 1. `&T` / `&mut T` resolve to `T`.
//! 2. Manifold types implement [`StateInfo`] themselves.
//! 3. Fixed-size nalgebra column vectors (owned or views) have
//!    `DOF = GLOBAL_SIZE = N`.
//! 4. `f32`, `f64` and dual numbers are one-dimensional.
//!
//! Any other type simply has no `StateInfo` impl, so using it where a state
//! is expected is a compile error.
//!
//! ```
//! use manifold_ad::state::{describe, dof_of, StateInfo};
//! use nalgebra::Vector3;
//!
//! assert_eq!(dof_of::<f64>(), 1);
//! assert_eq!(dof_of::<&Vector3<f32>>(), 3);
//!
//! let d = describe::<Vector3<f64>>();
//! assert_eq!((d.dof, d.global_size), (3, 3));
//! assert_eq!(d.scalar, "f64");
//! ```

use nalgebra::{Const, Matrix, RawStorage, SMatrix, SVector, U1};

use crate::jet::Jet;
use crate::traits::RealScalar;


/// Runtime summary of a [`StateInfo`] impl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateDescriptor {
    /// Name of the scalar type, as given by `core::any::type_name`.
    pub scalar: &'static str,
    /// Degrees of freedom: dimension of the tangent space.
    pub dof: usize,
    /// Number of stored (ambient) coordinates. Always `>= dof`.
    pub global_size: usize,
}

impl core::fmt::Display for StateDescriptor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} state, {} DOF, global size {}",
            self.scalar, self.dof, self.global_size
        )
    }
}

/// Scalar type, degrees of freedom and global size of a state type.
pub trait StateInfo {
    /// Scalar type of the coordinates.
    type Scalar: RealScalar;
    /// Plain owned type that values of `Self` represent (strips references
    /// and vector views).
    type Canonical: StateInfo<Scalar = Self::Scalar>;
    /// Tangent-space dimension.
    const DOF: usize;
    /// Ambient coordinate count used for storage.
    const GLOBAL_SIZE: usize;

    /// Descriptor of this type.
    ///
    /// Fails to compile (post-monomorphization) if `GLOBAL_SIZE < DOF`.
    fn describe() -> StateDescriptor {
        const {
            assert!(
                Self::GLOBAL_SIZE >= Self::DOF,
                "global size of a state must be at least its DOF"
            )
        };
        StateDescriptor {
            scalar: core::any::type_name::<Self::Scalar>(),
            dof: Self::DOF,
            global_size: Self::GLOBAL_SIZE,
        }
    }
}

/// Scalar type of a state type.
pub type ScalarOf<T> = <T as StateInfo>::Scalar;

/// Covariance matrix over an `N`-DOF state.
pub type Covariance<T, const N: usize> = SMatrix<T, N, N>;

/// Descriptor of `T`.
#[inline]
pub fn describe<T: StateInfo + ?Sized>() -> StateDescriptor {
    T::describe()
}

/// Descriptor of the type of `value`, for use where the type is not spelled out.
#[inline]
pub fn describe_value<T: StateInfo + ?Sized>(_value: &T) -> StateDescriptor {
    T::describe()
}

/// Degrees of freedom of `T`.
#[inline]
pub const fn dof_of<T: StateInfo + ?Sized>() -> usize {
    T::DOF
}

/// Global size of `T`.
#[inline]
pub const fn global_size_of<T: StateInfo + ?Sized>() -> usize {
    T::GLOBAL_SIZE
}

impl<T: StateInfo + ?Sized> StateInfo for &T {
    type Scalar = T::Scalar;
    type Canonical = T::Canonical;
    const DOF: usize = T::DOF;
    const GLOBAL_SIZE: usize = T::GLOBAL_SIZE;
}

impl<T: StateInfo + ?Sized> StateInfo for &mut T {
    type Scalar = T::Scalar;
    type Canonical = T::Canonical;
    const DOF: usize = T::DOF;
    const GLOBAL_SIZE: usize = T::GLOBAL_SIZE;
}

macro_rules! impl_state_info_float {
    ($($t:ty),*) => {
        $(
            impl StateInfo for $t {
                type Scalar = $t;
                type Canonical = $t;
                const DOF: usize = 1;
                const GLOBAL_SIZE: usize = 1;
            }
        )*
    };
}

impl_state_info_float!(f32, f64);

impl<T: RealScalar, const N: usize> StateInfo for Jet<T, N> {
    type Scalar = Jet<T, N>;
    type Canonical = Jet<T, N>;
    const DOF: usize = 1;
    const GLOBAL_SIZE: usize = 1;
}

impl<T, const N: usize, S> StateInfo for Matrix<T, Const<N>, U1, S>
where
    T: RealScalar,
    S: RawStorage<T, Const<N>, U1>,
{
    type Scalar = T;
    type Canonical = SVector<T, N>;
    const DOF: usize = N;
    const GLOBAL_SIZE: usize = N;
}
