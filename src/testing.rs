//! Manifolds used by the unit tests.

use nalgebra::{SVector, Vector1, Vector2, Vector3};

use crate::autodiff::AutoMatrix;
use crate::jet::Jet;
use crate::manifold::{ComponentVisitor, CompoundManifold, Manifold, ScalarManifold};
use crate::state::StateInfo;
use crate::traits::RealScalar;

/// Squared norms below this use the series expansions in SO(3) exp / log.
const SMALL_ANGLE_SQ: f64 = 1e-12;

// ── Pair: two scalars ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub(crate) struct Pair<T> {
    pub first: T,
    pub second: T,
}

impl<T> Pair<T> {
    pub fn new(first: T, second: T) -> Self {
        Self { first, second }
    }
}

impl<T: ScalarManifold> StateInfo for Pair<T> {
    type Scalar = T;
    type Canonical = Self;
    const DOF: usize = 2;
    const GLOBAL_SIZE: usize = 2;
}

impl<T: ScalarManifold> Manifold<2> for Pair<T> {
    type Dual = Pair<Jet<T, 2>>;

    fn to_dual(&self) -> Self::Dual {
        Pair::new(Jet::constant(self.first), Jet::constant(self.second))
    }

    fn boxplus(&self, delta: &Vector2<T>) -> Self {
        Pair::new(self.first + delta[0], self.second + delta[1])
    }

    fn boxminus(&self, other: &Self) -> Vector2<T> {
        Vector2::new(self.first - other.first, self.second - other.second)
    }

    fn reference_jacobian(&self, target: &Self, er1: &Vector2<T>) -> AutoMatrix<T, 2, 2> {
        self.blockwise_reference_jacobian(target, er1)
    }
}

impl<T: ScalarManifold> CompoundManifold<2> for Pair<T> {
    fn for_each_component_paired<V: ComponentVisitor<T>>(&self, other: &Self, visitor: &mut V) {
        visitor.visit(&self.first, &other.first);
        visitor.visit(&self.second, &other.second);
    }
}

// ── SO(2) as a unit complex number ──────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub(crate) struct So2<T> {
    pub re: T,
    pub im: T,
}

impl<T: RealScalar> So2<T> {
    pub fn from_angle(theta: T) -> Self {
        Self {
            re: theta.dcos(),
            im: theta.dsin(),
        }
    }

    pub fn angle(&self) -> T {
        self.im.datan2(self.re)
    }

    pub fn lift<const N: usize>(&self) -> So2<Jet<T, N>> {
        So2 {
            re: Jet::constant(self.re),
            im: Jet::constant(self.im),
        }
    }
}

impl<T: RealScalar> StateInfo for So2<T> {
    type Scalar = T;
    type Canonical = Self;
    const DOF: usize = 1;
    const GLOBAL_SIZE: usize = 2;
}

impl<T: RealScalar> Manifold<1> for So2<T> {
    type Dual = So2<Jet<T, 1>>;

    fn to_dual(&self) -> Self::Dual {
        self.lift()
    }

    fn boxplus(&self, delta: &Vector1<T>) -> Self {
        let d = So2::from_angle(delta[0]);
        So2 {
            re: self.re * d.re - self.im * d.im,
            im: self.re * d.im + self.im * d.re,
        }
    }

    fn boxminus(&self, other: &Self) -> Vector1<T> {
        // conj(other) * self
        let re = other.re * self.re + other.im * self.im;
        let im = other.re * self.im - other.im * self.re;
        Vector1::new(im.datan2(re))
    }
}

// ── SO(3) as a unit quaternion [w, x, y, z] ─────────────────────────

#[derive(Debug, Clone, Copy)]
pub(crate) struct So3<T> {
    pub w: T,
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T: RealScalar> So3<T> {
    pub fn identity() -> Self {
        Self {
            w: T::one(),
            x: T::zero(),
            y: T::zero(),
            z: T::zero(),
        }
    }

    pub fn lift<const N: usize>(&self) -> So3<Jet<T, N>> {
        So3 {
            w: Jet::constant(self.w),
            x: Jet::constant(self.x),
            y: Jet::constant(self.y),
            z: Jet::constant(self.z),
        }
    }

    fn vec(&self) -> Vector3<T> {
        Vector3::new(self.x, self.y, self.z)
    }

    fn from_parts(w: T, v: Vector3<T>) -> Self {
        Self {
            w,
            x: v[0],
            y: v[1],
            z: v[2],
        }
    }

    fn conjugate(&self) -> Self {
        Self::from_parts(self.w, -self.vec())
    }

    /// Hamilton product `self ⊗ rhs`.
    fn compose(&self, rhs: &Self) -> Self {
        let (a, b) = (self.vec(), rhs.vec());
        Self::from_parts(
            self.w * rhs.w - a.dot(&b),
            b * self.w + a * rhs.w + a.cross(&b),
        )
    }

    /// Quaternion of the rotation vector `phi`.
    pub fn exp(phi: &Vector3<T>) -> Self {
        let theta_sq = phi.dot(phi);
        let half = T::cast(0.5);
        if theta_sq.value() < T::cast(SMALL_ANGLE_SQ).value() {
            let w = T::one() - theta_sq * T::cast(0.125);
            return Self::from_parts(w, phi * (half - theta_sq * T::cast(1.0 / 48.0)));
        }
        let theta = theta_sq.dsqrt();
        let half_theta = theta * half;
        Self::from_parts(half_theta.dcos(), phi * (half_theta.dsin() / theta))
    }

    /// Rotation vector of this quaternion, with angle in `[0, π]`.
    pub fn log(&self) -> Vector3<T> {
        let (w, v) = if self.w.value() < T::zero().value() {
            (-self.w, -self.vec())
        } else {
            (self.w, self.vec())
        };
        let n_sq = v.dot(&v);
        if n_sq.value() < T::cast(SMALL_ANGLE_SQ).value() {
            return v * (T::cast(2.0) / w);
        }
        let n = n_sq.dsqrt();
        v * (T::cast(2.0) * n.datan2(w) / n)
    }
}

impl<T: RealScalar> StateInfo for So3<T> {
    type Scalar = T;
    type Canonical = Self;
    const DOF: usize = 3;
    const GLOBAL_SIZE: usize = 4;
}

impl<T: RealScalar> Manifold<3> for So3<T> {
    type Dual = So3<Jet<T, 3>>;

    fn to_dual(&self) -> Self::Dual {
        self.lift()
    }

    fn boxplus(&self, delta: &Vector3<T>) -> Self {
        self.compose(&So3::exp(delta))
    }

    fn boxminus(&self, other: &Self) -> Vector3<T> {
        other.conjugate().compose(self).log()
    }
}

// ── Pose2: SO(2) rotation + planar translation ──────────────────────

#[derive(Debug, Clone, Copy)]
pub(crate) struct Pose2<T> {
    pub rotation: So2<T>,
    pub translation: Vector2<T>,
}

impl<T: RealScalar> Pose2<T> {
    pub fn new(angle: T, x: T, y: T) -> Self {
        Self {
            rotation: So2::from_angle(angle),
            translation: Vector2::new(x, y),
        }
    }

    pub fn lift<const N: usize>(&self) -> Pose2<Jet<T, N>> {
        Pose2 {
            rotation: self.rotation.lift(),
            translation: self.translation.map(Jet::constant),
        }
    }
}

impl<T: RealScalar> StateInfo for Pose2<T> {
    type Scalar = T;
    type Canonical = Self;
    const DOF: usize = 3;
    const GLOBAL_SIZE: usize = 4;
}

impl<T: RealScalar> Manifold<3> for Pose2<T> {
    type Dual = Pose2<Jet<T, 3>>;

    fn to_dual(&self) -> Self::Dual {
        self.lift()
    }

    fn boxplus(&self, delta: &Vector3<T>) -> Self {
        Pose2 {
            rotation: self.rotation.boxplus(&Vector1::new(delta[0])),
            translation: self.translation + Vector2::new(delta[1], delta[2]),
        }
    }

    fn boxminus(&self, other: &Self) -> Vector3<T> {
        let dr = self.rotation.boxminus(&other.rotation);
        let dt = self.translation - other.translation;
        Vector3::new(dr[0], dt[0], dt[1])
    }

    fn reference_jacobian(&self, target: &Self, er1: &Vector3<T>) -> AutoMatrix<T, 3, 3> {
        self.blockwise_reference_jacobian(target, er1)
    }
}

impl<T: RealScalar> CompoundManifold<3> for Pose2<T> {
    fn for_each_component_paired<V: ComponentVisitor<T>>(&self, other: &Self, visitor: &mut V) {
        visitor.visit(&self.rotation, &other.rotation);
        visitor.visit(&self.translation, &other.translation);
    }
}

// ── Body: nested compound (pose, velocity, scalar bias) ─────────────

#[derive(Debug, Clone, Copy)]
pub(crate) struct Body<T> {
    pub pose: Pose2<T>,
    pub velocity: Vector2<T>,
    pub bias: T,
}

impl<T: ScalarManifold> StateInfo for Body<T> {
    type Scalar = T;
    type Canonical = Self;
    const DOF: usize = 6;
    const GLOBAL_SIZE: usize = 7;
}

impl<T: ScalarManifold> Manifold<6> for Body<T> {
    type Dual = Body<Jet<T, 6>>;

    fn to_dual(&self) -> Self::Dual {
        Body {
            pose: self.pose.lift(),
            velocity: self.velocity.map(Jet::constant),
            bias: Jet::constant(self.bias),
        }
    }

    fn boxplus(&self, delta: &SVector<T, 6>) -> Self {
        Body {
            pose: self.pose.boxplus(&Vector3::new(delta[0], delta[1], delta[2])),
            velocity: self.velocity + Vector2::new(delta[3], delta[4]),
            bias: self.bias + delta[5],
        }
    }

    fn boxminus(&self, other: &Self) -> SVector<T, 6> {
        let dp = self.pose.boxminus(&other.pose);
        let dv = self.velocity - other.velocity;
        SVector::from([dp[0], dp[1], dp[2], dv[0], dv[1], self.bias - other.bias])
    }

    fn reference_jacobian(&self, target: &Self, er1: &SVector<T, 6>) -> AutoMatrix<T, 6, 6> {
        self.blockwise_reference_jacobian(target, er1)
    }
}

impl<T: ScalarManifold> CompoundManifold<6> for Body<T> {
    fn for_each_component_paired<V: ComponentVisitor<T>>(&self, other: &Self, visitor: &mut V) {
        visitor.visit(&self.pose, &other.pose);
        visitor.visit(&self.velocity, &other.velocity);
        visitor.visit(&self.bias, &other.bias);
    }
}
