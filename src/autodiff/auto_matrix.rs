use core::ops::{Index, IndexMut};

use nalgebra::{DMatrix, SMatrix, Scalar};
use num_traits::{One, Zero};

/// Maximum number of elements held in stack-allocated Jacobian storage.
///
/// Set at build time with the `MANIFOLD_AD_DYNAMIC_THRESHOLD` environment
/// variable (a decimal element count); defaults to 400 (20 × 20).
pub const DYNAMIC_THRESHOLD: usize = match option_env!("MANIFOLD_AD_DYNAMIC_THRESHOLD") {
    Some(s) => parse_threshold(s),
    None => 400,
};

const fn parse_threshold(s: &str) -> usize {
    let bytes = s.as_bytes();
    assert!(!bytes.is_empty(), "MANIFOLD_AD_DYNAMIC_THRESHOLD is empty");
    let mut n = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        assert!(
            b.is_ascii_digit(),
            "MANIFOLD_AD_DYNAMIC_THRESHOLD must be a decimal integer"
        );
        n = n * 10 + (b - b'0') as usize;
        i += 1;
    }
    n
}

/// Whether an `rows × cols` Jacobian is stored on the heap.
#[inline]
pub const fn uses_dynamic_storage(rows: usize, cols: usize) -> bool {
    rows * cols > DYNAMIC_THRESHOLD
}

/// Dense `R × C` matrix whose storage is picked from its size.
///
/// Jacobians up to [`DYNAMIC_THRESHOLD`] elements are `Fixed` nalgebra
/// matrices; larger ones are `Dynamic`. The choice never affects values:
/// indexing, equality and conversions behave identically for both.
///
/// ```
/// use manifold_ad::AutoMatrix;
///
/// let mut m = AutoMatrix::<f64, 3, 3>::identity();
/// m[(0, 2)] = 4.0;
/// assert!(!m.is_dynamic());
/// assert_eq!(m.to_fixed()[(0, 2)], 4.0);
/// ```
#[derive(Debug, Clone)]
pub enum AutoMatrix<T: Scalar, const R: usize, const C: usize> {
    /// Stack-allocated storage.
    Fixed(SMatrix<T, R, C>),
    /// Heap-allocated storage, always `R × C`.
    Dynamic(DMatrix<T>),
}

impl<T: Scalar, const R: usize, const C: usize> AutoMatrix<T, R, C> {
    /// Build from a function of `(row, col)`.
    pub fn from_fn(mut f: impl FnMut(usize, usize) -> T) -> Self {
        if uses_dynamic_storage(R, C) {
            AutoMatrix::Dynamic(DMatrix::from_fn(R, C, &mut f))
        } else {
            AutoMatrix::Fixed(SMatrix::from_fn(f))
        }
    }

    /// Number of rows.
    #[inline]
    pub const fn nrows(&self) -> usize {
        R
    }

    /// Number of columns.
    #[inline]
    pub const fn ncols(&self) -> usize {
        C
    }

    /// Whether the matrix lives on the heap.
    #[inline]
    pub fn is_dynamic(&self) -> bool {
        matches!(self, AutoMatrix::Dynamic(_))
    }

    /// Copy into a fixed-size matrix.
    pub fn to_fixed(&self) -> SMatrix<T, R, C> {
        match self {
            AutoMatrix::Fixed(m) => m.clone(),
            AutoMatrix::Dynamic(m) => SMatrix::from_fn(|i, j| m[(i, j)].clone()),
        }
    }

    /// Convert into a heap-allocated matrix.
    pub fn into_dynamic(self) -> DMatrix<T> {
        match self {
            AutoMatrix::Fixed(m) => DMatrix::from_fn(R, C, |i, j| m[(i, j)].clone()),
            AutoMatrix::Dynamic(m) => m,
        }
    }

    /// Overwrite the `BR × BC` block starting at `(row, col)` with `block`.
    ///
    /// Panics if the block does not fit.
    pub fn set_block<const BR: usize, const BC: usize>(
        &mut self,
        row: usize,
        col: usize,
        block: &AutoMatrix<T, BR, BC>,
    ) {
        assert!(
            row + BR <= R && col + BC <= C,
            "{}x{} block at ({}, {}) exceeds {}x{} matrix",
            BR,
            BC,
            row,
            col,
            R,
            C
        );
        for i in 0..BR {
            for j in 0..BC {
                self[(row + i, col + j)] = block[(i, j)].clone();
            }
        }
    }

    /// Iterate over all elements in column-major order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let slice: &[T] = match self {
            AutoMatrix::Fixed(m) => m.as_slice(),
            AutoMatrix::Dynamic(m) => m.as_slice(),
        };
        slice.iter()
    }
}

impl<T: Scalar + Zero, const R: usize, const C: usize> AutoMatrix<T, R, C> {
    /// All zeros.
    pub fn zeros() -> Self {
        Self::from_fn(|_, _| T::zero())
    }
}

impl<T: Scalar + Zero + One, const R: usize, const C: usize> AutoMatrix<T, R, C> {
    /// Ones on the main diagonal, zeros elsewhere.
    pub fn identity() -> Self {
        Self::from_fn(|i, j| if i == j { T::one() } else { T::zero() })
    }
}

impl<T: Scalar, const R: usize, const C: usize> Index<(usize, usize)> for AutoMatrix<T, R, C> {
    type Output = T;

    #[inline]
    fn index(&self, idx: (usize, usize)) -> &T {
        match self {
            AutoMatrix::Fixed(m) => &m[idx],
            AutoMatrix::Dynamic(m) => &m[idx],
        }
    }
}

impl<T: Scalar, const R: usize, const C: usize> IndexMut<(usize, usize)> for AutoMatrix<T, R, C> {
    #[inline]
    fn index_mut(&mut self, idx: (usize, usize)) -> &mut T {
        match self {
            AutoMatrix::Fixed(m) => &mut m[idx],
            AutoMatrix::Dynamic(m) => &mut m[idx],
        }
    }
}

impl<T: Scalar, const R: usize, const C: usize> PartialEq for AutoMatrix<T, R, C> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Scalar, const R: usize, const C: usize> PartialEq<SMatrix<T, R, C>> for AutoMatrix<T, R, C> {
    fn eq(&self, other: &SMatrix<T, R, C>) -> bool {
        self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Scalar, const R: usize, const C: usize> From<SMatrix<T, R, C>> for AutoMatrix<T, R, C> {
    fn from(m: SMatrix<T, R, C>) -> Self {
        if uses_dynamic_storage(R, C) {
            AutoMatrix::Dynamic(DMatrix::from_fn(R, C, |i, j| m[(i, j)].clone()))
        } else {
            AutoMatrix::Fixed(m)
        }
    }
}

impl<T: Scalar + core::fmt::Display, const R: usize, const C: usize> core::fmt::Display
    for AutoMatrix<T, R, C>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AutoMatrix::Fixed(m) => write!(f, "{}", m),
            AutoMatrix::Dynamic(m) => write!(f, "{}", m),
        }
    }
}
