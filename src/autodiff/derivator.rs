use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::OnceLock;

use nalgebra::SVector;
use parking_lot::RwLock;

use crate::jet::Jet;
use crate::traits::RealScalar;

type BasisCache = RwLock<HashMap<TypeId, &'static (dyn Any + Send + Sync)>>;

static CACHE: OnceLock<BasisCache> = OnceLock::new();

/// The `N`-dimensional identity seed for forward-mode differentiation.
///
/// Element `i` has scalar part zero and derivative vector `eᵢ`. Adding it to
/// a point `x` gives jets whose derivatives track all `N` inputs at once.
///
/// ```
/// use manifold_ad::autodiff::derivator_basis;
///
/// let d = derivator_basis::<f64, 3>();
/// assert_eq!(d[1].a, 0.0);
/// assert_eq!(d[1].v, [0.0, 1.0, 0.0]);
/// ```
pub fn derivator_basis<T: RealScalar, const N: usize>() -> SVector<Jet<T, N>, N> {
    SVector::from_fn(|i, _| Jet::variable(T::zero(), i))
}

/// Process-wide cached copy of [`derivator_basis`].
///
/// Each `(T, N)` basis is built once, on first request, and shared for the
/// rest of the process. Concurrent first requests are serialized on a write
/// lock, so every caller observes the same fully initialized basis.
pub fn derivator<T: RealScalar, const N: usize>() -> &'static SVector<Jet<T, N>, N> {
    let cache = CACHE.get_or_init(|| RwLock::new(HashMap::new()));
    let key = TypeId::of::<SVector<Jet<T, N>, N>>();

    let cached = cache.read().get(&key).copied();
    let entry = match cached {
        Some(entry) => entry,
        None => *cache.write().entry(key).or_insert_with(|| {
            tracing::trace!(
                scalar = core::any::type_name::<T>(),
                dim = N,
                "building derivator basis"
            );
            let basis: &'static SVector<Jet<T, N>, N> = Box::leak(Box::new(derivator_basis()));
            basis as &'static (dyn Any + Send + Sync)
        }),
    };

    match entry.downcast_ref::<SVector<Jet<T, N>, N>>() {
        Some(basis) => basis,
        None => unreachable!("derivator cache entry keyed by its own TypeId"),
    }
}
