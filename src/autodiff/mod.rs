//! Forward-mode differentiation primitives.
//!
//! # Derivator
//!
//! - [`derivator_basis`]: the `N`-dimensional identity seed (jets with zero
//!   value and unit derivative vectors)
//! - [`derivator`]: process-wide cached copy, built once per `(T, N)`
//!
//! # Jacobians
//!
//! - [`extract_jacobian`]: read a dense Jacobian out of a vector of jets
//! - [`jacobian`]: seed, evaluate and extract in one call
//! - [`finite_difference_jacobian`]: forward-difference approximation, for
//!   cross-checking
//!
//! Jacobians are returned as [`AutoMatrix`], stack-allocated up to
//! [`DYNAMIC_THRESHOLD`] elements and heap-allocated beyond.
//!
//! ```
//! use manifold_ad::autodiff::jacobian;
//! use manifold_ad::Jet;
//! use nalgebra::{Matrix2x3, SVector, Vector3};
//!
//! // f(x) = A x is linear, so its Jacobian is A everywhere.
//! let a = Matrix2x3::new(1.0_f64, 2.0, 3.0, -1.0, 0.5, 4.0);
//! let x = Vector3::new(0.2, -0.7, 1.1);
//! let j = jacobian(
//!     |x: &SVector<Jet<f64, 3>, 3>| {
//!         SVector::<Jet<f64, 3>, 2>::from_fn(|r, _| {
//!             (0..3).fold(Jet::constant(0.0), |acc, c| acc + x[c] * a[(r, c)])
//!         })
//!     },
//!     &x,
//! );
//! assert_eq!(j.to_fixed(), a);
//! ```

mod auto_matrix;
mod derivator;
mod jacobian;


pub use auto_matrix::{uses_dynamic_storage, AutoMatrix, DYNAMIC_THRESHOLD};
pub use derivator::{derivator, derivator_basis};
pub use jacobian::{extract_jacobian, finite_difference_jacobian, jacobian, segment};
