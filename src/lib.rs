//! # manifold-ad
//!
//! Forward-mode automatic differentiation for Kalman filtering on manifolds.
//! An error-state filter on rotations, poses or composite states needs
//! Jacobians of its `⊞` / `⊟` operators; this crate computes them from dual
//! numbers instead of hand-derived formulas, and keeps the propagated
//! covariances symmetric positive definite.
//!
//! ## Quick start
//!
//! ```
//! use manifold_ad::covariance::RegularizationSettings;
//! use manifold_ad::transform::{transform_covariance, transform_reference_jacobian};
//! use nalgebra::{Matrix3, Vector3};
//!
//! // Vectors are flat manifolds: moving the reference leaves the error unchanged.
//! let ref1 = Vector3::new(1.0_f64, 2.0, 3.0);
//! let ref2 = Vector3::new(1.5_f64, 1.0, 3.0);
//! assert_eq!(transform_reference_jacobian(&ref1, &ref2), Matrix3::identity());
//!
//! let p = Matrix3::from_diagonal(&Vector3::new(0.1, 0.2, 0.3));
//! let moved = transform_covariance(&ref1, &ref2, None, &p, &RegularizationSettings::default())?;
//! assert_eq!(moved, p);
//! # Ok::<(), manifold_ad::NumericError>(())
//! ```
//!
//! ## Modules
//!
//! - [`state`]: compile-time classification of state types
//!   ([`StateInfo`]): scalar type, degrees of freedom, global size.
//!   References, nalgebra vectors and views, floats and jets resolve
//!   automatically; manifolds implement it themselves.
//!
//! - [`manifold`]: the [`Manifold`] capability (`⊞`, `⊟`, dual lifting) and
//!   [`CompoundManifold`] for states made of independent sub-manifolds.
//!   Implemented here for `f32`, `f64`, [`Jet`] and `SVector`.
//!
//! - [`autodiff`]: the cached derivator basis that seeds dual numbers,
//!   Jacobian extraction into [`AutoMatrix`] (stack or heap storage by size),
//!   and a finite-difference Jacobian for cross-checks.
//!
//! - [`transform`]: reference-change Jacobians
//!   `∂((ref1 ⊞ (Er1 + ε)) ⊟ ref2)/∂ε`, block-diagonal for compound
//!   manifolds, and covariance transport `J · P · Jᵀ`.
//!
//! - [`covariance`]: positive-definiteness test and eigenvalue-clamping
//!   regularizer.
//!
//! - [`finite`]: NaN / infinity checks: the [`Finite`](finite::Finite)
//!   trait and the [`check_finite!`] / [`assert_finite!`] macros.
//!
//! - [`jet`]: the [`Jet`] dual number.
//!
//! - [`traits`]: scalar trait hierarchy:
//!   - [`RealScalar`]: anything that flows through a differentiated
//!     expression (floats and jets, nested or not)
//!   - [`FloatScalar`]: plain real floats, used by the decompositions
//!
//! ## Logging
//!
//! Diagnostics go through [`tracing`] (`trace` for cache fills and block
//! assembly, `debug` for eigenvalue clamping, `warn` when a transformed
//! covariance needed regularization). No subscriber is installed.
//!
//! ## Cargo features
//!
//! | Feature          | Default | Description |
//! |------------------|---------|-------------|
//! | `strict-asserts` | no      | Keep `assert_finite!` and regularizer postcondition panics in release builds |
//!
//! The build-time environment variable `MANIFOLD_AD_DYNAMIC_THRESHOLD` sets
//! the element count above which Jacobians are heap-allocated (default 400).

pub mod autodiff;
pub mod covariance;
pub mod error;
pub mod finite;
pub mod jet;
pub mod manifold;
pub mod state;
pub mod traits;
pub mod transform;

#[cfg(test)]
mod testing;

pub use autodiff::{AutoMatrix, DYNAMIC_THRESHOLD};
pub use covariance::RegularizationSettings;
pub use error::NumericError;
pub use jet::Jet;
pub use manifold::{ComponentVisitor, CompoundManifold, Manifold, ScalarManifold};
pub use state::{Covariance, StateDescriptor, StateInfo};
pub use traits::{FloatScalar, RealScalar};
pub use transform::{
    transform_covariance, transform_reference_jacobian, transform_reference_jacobian_with_error,
};
