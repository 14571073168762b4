//! Reference-change Jacobians for manifold states.
//!
//! An error-state filter keeps its Gaussian relative to a reference point
//! (the linearization point). Moving the reference from `ref1` to `ref2`
//! maps an error `ε` expressed at `ref1` to
//!
//! ```text
//! g(ε) = (ref1 ⊞ (Er1 + ε)) ⊟ ref2
//! ```
//!
//! where `Er1` is the error mean relative to `ref1`. The covariance follows
//! through `J = ∂g/∂ε |ε=0`, computed here by forward-mode differentiation:
//! `ε` is seeded with the derivator basis, `g` is evaluated on jets, and the
//! Jacobian is read off the result.
//!
//! Compound manifolds are differentiated per component: each sub-manifold
//! contributes one diagonal block, and off-diagonal blocks are zero because
//! the components' `⊞`/`⊟` act on disjoint tangent slices.
//!
//! ```
//! use manifold_ad::transform::transform_reference_jacobian;
//!
//! // Flat scalar: ⊟ is subtraction, so the Jacobian is 1 for any references.
//! let j = transform_reference_jacobian(&3.0_f64, &5.0_f64);
//! assert_eq!(j[(0, 0)], 1.0);
//! ```

use nalgebra::{SMatrix, SVector};

use crate::autodiff::{derivator, extract_jacobian, segment, AutoMatrix};
use crate::covariance::{assure_positive_definite, RegularizationSettings};
use crate::error::NumericError;
use crate::jet::Jet;
use crate::manifold::{ComponentVisitor, CompoundManifold, Manifold};
use crate::traits::{FloatScalar, RealScalar};


/// Jacobian moving an error anchored at `ref1` with zero mean to `ref2`.
#[inline]
pub fn transform_reference_jacobian<M, const DOF: usize>(
    ref1: &M,
    ref2: &M,
) -> AutoMatrix<M::Scalar, DOF, DOF>
where
    M: Manifold<DOF>,
{
    ref1.reference_jacobian(ref2, &SVector::zeros())
}

/// Jacobian moving an error with mean `er1` (relative to `ref1`) to `ref2`.
#[inline]
pub fn transform_reference_jacobian_with_error<M, const DOF: usize>(
    ref1: &M,
    ref2: &M,
    er1: &SVector<M::Scalar, DOF>,
) -> AutoMatrix<M::Scalar, DOF, DOF>
where
    M: Manifold<DOF>,
{
    ref1.reference_jacobian(ref2, er1)
}

/// Differentiate `(ref1 ⊞ (er1 + ε)) ⊟ ref2` over the whole manifold at once.
///
/// This is the default [`Manifold::reference_jacobian`].
pub fn atomic_reference_jacobian<M, const DOF: usize>(
    ref1: &M,
    ref2: &M,
    er1: &SVector<M::Scalar, DOF>,
) -> AutoMatrix<M::Scalar, DOF, DOF>
where
    M: Manifold<DOF>,
{
    const {
        assert!(
            M::DOF == DOF,
            "StateInfo::DOF disagrees with the manifold's tangent dimension"
        )
    };

    let basis = derivator::<M::Scalar, DOF>();
    let delta: SVector<Jet<M::Scalar, DOF>, DOF> = SVector::from_fn(|i, _| basis[i] + er1[i]);
    let moved = ref1.to_dual().boxplus(&delta).boxminus(&ref2.to_dual());
    extract_jacobian(&moved)
}

/// Block-diagonal reference Jacobian of a compound manifold.
///
/// Starts from the `DOF × DOF` identity, then visits the components of
/// `ref1` paired with those of `ref2` in declaration order. Each component of
/// dimension `d` at tangent offset `o` receives `er1[o..o + d]` and writes its
/// own [`Manifold::reference_jacobian`] into the block at `(o, o)`; nested
/// compound components recurse the same way.
pub fn compound_reference_jacobian<M, const DOF: usize>(
    ref1: &M,
    ref2: &M,
    er1: &SVector<M::Scalar, DOF>,
) -> AutoMatrix<M::Scalar, DOF, DOF>
where
    M: CompoundManifold<DOF>,
{
    let mut assembler = BlockAssembler {
        jacobian: AutoMatrix::identity(),
        er1,
        offset: 0,
    };
    ref1.for_each_component_paired(ref2, &mut assembler);
    debug_assert_eq!(
        assembler.offset, DOF,
        "component DOFs of a compound manifold must sum to its DOF"
    );
    assembler.jacobian
}

/// Visitor that writes one diagonal block per component.
struct BlockAssembler<'a, T: RealScalar, const DOF: usize> {
    jacobian: AutoMatrix<T, DOF, DOF>,
    er1: &'a SVector<T, DOF>,
    offset: usize,
}

impl<T: RealScalar, const DOF: usize> ComponentVisitor<T> for BlockAssembler<'_, T, DOF> {
    fn visit<C, const D: usize>(&mut self, component: &C, other: &C)
    where
        C: Manifold<D, Scalar = T>,
    {
        debug_assert!(
            self.offset + D <= DOF,
            "component at offset {} with {} DOF overruns compound DOF {}",
            self.offset,
            D,
            DOF
        );
        let local_error = segment::<T, D, DOF>(self.er1, self.offset);
        let block = component.reference_jacobian(other, &local_error);
        tracing::trace!(offset = self.offset, dof = D, "reference jacobian block");
        self.jacobian.set_block(self.offset, self.offset, &block);
        self.offset += D;
    }
}

/// Move a covariance from reference `ref1` to reference `ref2`.
///
/// Computes `J · P · Jᵀ` with `J` the reference Jacobian for error mean
/// `er1` (zero when `None`), then, if `settings.enabled`, clamps its
/// eigenvalues to at least `settings.epsilon`.
///
/// Returns [`NumericError::NotFinite`] if the input covariance, the error
/// mean or the Jacobian contain NaN or infinity.
///
/// ```
/// use manifold_ad::covariance::RegularizationSettings;
/// use manifold_ad::transform::transform_covariance;
/// use nalgebra::{Matrix2, Vector2};
///
/// let p = Matrix2::new(0.5, 0.1, 0.1, 0.2);
/// let a = Vector2::new(1.0_f64, 2.0);
/// let b = Vector2::new(3.0_f64, 4.0);
/// let moved = transform_covariance(&a, &b, None, &p, &RegularizationSettings::default()).unwrap();
/// assert_eq!(moved, p);
/// ```
pub fn transform_covariance<M, const DOF: usize>(
    ref1: &M,
    ref2: &M,
    er1: Option<&SVector<M::Scalar, DOF>>,
    covariance: &SMatrix<M::Scalar, DOF, DOF>,
    settings: &RegularizationSettings<M::Scalar>,
) -> Result<SMatrix<M::Scalar, DOF, DOF>, NumericError>
where
    M: Manifold<DOF>,
    M::Scalar: FloatScalar,
{
    let zero = SVector::zeros();
    let er1 = er1.unwrap_or(&zero);
    crate::check_finite!(covariance, er1)?;

    let j = ref1.reference_jacobian(ref2, er1).to_fixed();
    crate::check_finite!(j)?;

    let mut moved = j * covariance * j.transpose();
    if settings.enabled {
        let clamped = assure_positive_definite(&mut moved, settings.epsilon)?;
        if clamped > 0 {
            tracing::warn!(
                clamped,
                dof = DOF,
                "transformed covariance lost positive definiteness"
            );
        }
    }
    Ok(moved)
}
