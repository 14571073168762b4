//! Manifold capability traits.
//!
//! A [`Manifold`] is a state type with a retraction `⊞` ([`Manifold::boxplus`],
//! global ⊕ tangent → global) and local coordinates `⊟`
//! ([`Manifold::boxminus`], global ⊖ global → tangent). To take part in
//! automatic differentiation a manifold also names its [`Manifold::Dual`]
//! type: the same manifold with coordinates in [`Jet<Scalar, DOF>`], which
//! `to_dual` lifts values into. Manifold types are therefore normally generic
//! over their scalar, with `⊞`/`⊟` written against [`RealScalar`].
//!
//! A [`CompoundManifold`] is made of sub-manifolds whose tangent spaces are
//! independent. It walks its components in declared order through a
//! [`ComponentVisitor`], which lets the reference-change Jacobian be built
//! block by block (see
//! [`compound_reference_jacobian`](crate::transform::compound_reference_jacobian)).
//!
//! Scalars (`f32`, `f64`, jets) and fixed-size vectors are flat manifolds
//! whose `⊞`/`⊟` are plain addition and subtraction.
//!
//! # Example
//!
//! ```
//! use manifold_ad::manifold::{ComponentVisitor, CompoundManifold, Manifold, ScalarManifold};
//! use manifold_ad::state::StateInfo;
//! use manifold_ad::transform::transform_reference_jacobian;
//! use manifold_ad::{AutoMatrix, Jet};
//! use nalgebra::{SVector, Vector2, Vector3};
//!
//! /// Heading plus planar position.
//! #[derive(Debug, Clone, Copy)]
//! struct Track<T> {
//!     heading: T,
//!     position: Vector2<T>,
//! }
//!
//! impl<T: ScalarManifold> StateInfo for Track<T> {
//!     type Scalar = T;
//!     type Canonical = Self;
//!     const DOF: usize = 3;
//!     const GLOBAL_SIZE: usize = 3;
//! }
//!
//! impl<T: ScalarManifold> Manifold<3> for Track<T> {
//!     type Dual = Track<Jet<T, 3>>;
//!
//!     fn to_dual(&self) -> Track<Jet<T, 3>> {
//!         Track {
//!             heading: Jet::constant(self.heading),
//!             position: self.position.map(Jet::constant),
//!         }
//!     }
//!
//!     fn boxplus(&self, delta: &Vector3<T>) -> Self {
//!         Track {
//!             heading: self.heading + delta[0],
//!             position: self.position + Vector2::new(delta[1], delta[2]),
//!         }
//!     }
//!
//!     fn boxminus(&self, other: &Self) -> Vector3<T> {
//!         let dp = self.position - other.position;
//!         Vector3::new(self.heading - other.heading, dp[0], dp[1])
//!     }
//!
//!     fn reference_jacobian(&self, target: &Self, er1: &SVector<T, 3>) -> AutoMatrix<T, 3, 3> {
//!         self.blockwise_reference_jacobian(target, er1)
//!     }
//! }
//!
//! impl<T: ScalarManifold> CompoundManifold<3> for Track<T> {
//!     fn for_each_component_paired<V: ComponentVisitor<T>>(&self, other: &Self, visitor: &mut V) {
//!         visitor.visit(&self.heading, &other.heading);
//!         visitor.visit(&self.position, &other.position);
//!     }
//! }
//!
//! let a = Track { heading: 0.1_f64, position: Vector2::new(1.0, 2.0) };
//! let b = Track { heading: 0.4_f64, position: Vector2::new(-1.0, 0.5) };
//! let j = transform_reference_jacobian(&a, &b);
//! assert_eq!(j.to_fixed(), nalgebra::Matrix3::identity());
//! ```

use nalgebra::SVector;

use crate::autodiff::AutoMatrix;
use crate::jet::Jet;
use crate::state::StateInfo;
use crate::traits::RealScalar;

/// A state type with `⊞` / `⊟` operators over a `DOF`-dimensional tangent space.
pub trait Manifold<const DOF: usize>: StateInfo + Clone {
    /// The same manifold with coordinates in `Jet<Self::Scalar, DOF>`.
    type Dual: Manifold<DOF, Scalar = Jet<Self::Scalar, DOF>>;

    /// Lift into the dual manifold with all derivatives zero.
    fn to_dual(&self) -> Self::Dual;

    /// Retraction: `self ⊞ delta`.
    fn boxplus(&self, delta: &SVector<Self::Scalar, DOF>) -> Self;

    /// Local coordinates of `self` relative to `other`: `self ⊟ other`.
    fn boxminus(&self, other: &Self) -> SVector<Self::Scalar, DOF>;

    /// Jacobian converting an error anchored at `self` into one anchored at
    /// `target`, given the error mean `er1` relative to `self`.
    ///
    /// The default differentiates the whole manifold at once
    /// ([`atomic_reference_jacobian`](crate::transform::atomic_reference_jacobian)).
    /// Compound manifolds override it with
    /// [`CompoundManifold::blockwise_reference_jacobian`].
    fn reference_jacobian(
        &self,
        target: &Self,
        er1: &SVector<Self::Scalar, DOF>,
    ) -> AutoMatrix<Self::Scalar, DOF, DOF> {
        crate::transform::atomic_reference_jacobian(self, target, er1)
    }
}

/// A manifold composed of independent sub-manifolds.
///
/// The sub-manifold DOFs must sum to `DOF`.
///
/// Implementing this trait does not change how reference Jacobians are
/// computed: [`Manifold::reference_jacobian`] must be overridden to return
/// [`blockwise_reference_jacobian`](Self::blockwise_reference_jacobian),
/// otherwise the whole manifold is differentiated at once.
pub trait CompoundManifold<const DOF: usize>: Manifold<DOF> {
    /// Call `visitor.visit(component, other_component)` for every
    /// sub-manifold, in declaration order.
    fn for_each_component_paired<V: ComponentVisitor<Self::Scalar>>(
        &self,
        other: &Self,
        visitor: &mut V,
    );

    /// Reference-change Jacobian assembled from one block per component.
    fn blockwise_reference_jacobian(
        &self,
        target: &Self,
        er1: &SVector<Self::Scalar, DOF>,
    ) -> AutoMatrix<Self::Scalar, DOF, DOF> {
        crate::transform::compound_reference_jacobian(self, target, er1)
    }
}

/// Callback for [`CompoundManifold::for_each_component_paired`].
pub trait ComponentVisitor<T: RealScalar> {
    /// Visit one sub-manifold of `D` degrees of freedom together with its
    /// counterpart in the other compound value.
    fn visit<C, const D: usize>(&mut self, component: &C, other: &C)
    where
        C: Manifold<D, Scalar = T>;
}

/// Scalars that are themselves one-dimensional manifolds.
///
/// Use as the scalar bound of generic compound manifolds that store bare
/// scalar components.
pub trait ScalarManifold: RealScalar + Manifold<1, Scalar = Self> {}

impl<T: RealScalar + Manifold<1, Scalar = T>> ScalarManifold for T {}

macro_rules! impl_manifold_float {
    ($($t:ty),*) => {
        $(
            impl Manifold<1> for $t {
                type Dual = Jet<$t, 1>;

                #[inline]
                fn to_dual(&self) -> Jet<$t, 1> {
                    Jet::constant(*self)
                }

                #[inline]
                fn boxplus(&self, delta: &SVector<$t, 1>) -> $t {
                    *self + delta[0]
                }

                #[inline]
                fn boxminus(&self, other: &$t) -> SVector<$t, 1> {
                    SVector::from_element(*self - *other)
                }
            }
        )*
    };
}

impl_manifold_float!(f32, f64);

impl<T: RealScalar, const N: usize> Manifold<1> for Jet<T, N> {
    type Dual = Jet<Jet<T, N>, 1>;

    #[inline]
    fn to_dual(&self) -> Self::Dual {
        Jet::constant(*self)
    }

    #[inline]
    fn boxplus(&self, delta: &SVector<Self, 1>) -> Self {
        *self + delta[0]
    }

    #[inline]
    fn boxminus(&self, other: &Self) -> SVector<Self, 1> {
        SVector::from_element(*self - *other)
    }
}

impl<T: RealScalar, const N: usize> Manifold<N> for SVector<T, N> {
    type Dual = SVector<Jet<T, N>, N>;

    #[inline]
    fn to_dual(&self) -> Self::Dual {
        self.map(Jet::constant)
    }

    #[inline]
    fn boxplus(&self, delta: &SVector<T, N>) -> Self {
        self.zip_map(delta, |x, d| x + d)
    }

    #[inline]
    fn boxminus(&self, other: &Self) -> SVector<T, N> {
        self.zip_map(other, |x, y| x - y)
    }
}
