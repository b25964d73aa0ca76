use crate::dynmatrix::{DynMatrix, DynVector};
use crate::linalg::LinalgError;
use crate::traits::{FloatScalar, MatrixRef};

/// Which triangle of a square matrix holds the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Triangle {
    Lower,
    Upper,
}

// ---------------------------------------------------------------------------
// Substitution kernels
// ---------------------------------------------------------------------------

/// Solve `L x = b` in place by forward substitution.
///
/// Reads only the lower triangle of `l`. With `unit_diagonal` the diagonal
/// is taken to be 1 and never read.
#[inline]
pub(crate) fn forward_substitute<T: FloatScalar>(
    l: &impl MatrixRef<T>,
    x: &mut [T],
    unit_diagonal: bool,
) {
    let n = l.nrows();
    for i in 0..n {
        let mut sum = x[i];
        for j in 0..i {
            sum = sum - *l.get(i, j) * x[j];
        }
        x[i] = if unit_diagonal { sum } else { sum / *l.get(i, i) };
    }
}

/// Solve `U x = b` in place by back substitution over the leading
/// `x.len()` rows and columns of `u`.
#[inline]
pub(crate) fn back_substitute<T: FloatScalar>(u: &impl MatrixRef<T>, x: &mut [T]) {
    let n = x.len();
    for i in (0..n).rev() {
        let mut sum = x[i];
        for j in (i + 1)..n {
            sum = sum - *u.get(i, j) * x[j];
        }
        x[i] = sum / *u.get(i, i);
    }
}

/// Solve `L^T x = b` in place, reading `L`'s lower triangle.
#[inline]
pub(crate) fn back_substitute_transposed<T: FloatScalar>(l: &impl MatrixRef<T>, x: &mut [T]) {
    let n = l.nrows();
    for i in (0..n).rev() {
        let mut sum = x[i];
        for j in (i + 1)..n {
            sum = sum - *l.get(j, i) * x[j];
        }
        x[i] = sum / *l.get(i, i);
    }
}

/// First exactly-zero diagonal entry among the leading `n`.
fn zero_diagonal<T: FloatScalar>(t: &impl MatrixRef<T>, n: usize) -> Option<usize> {
    (0..n).find(|&i| *t.get(i, i) == T::zero())
}

// ---------------------------------------------------------------------------
// Public solvers
// ---------------------------------------------------------------------------

/// Solve `T x = b` for square triangular `T`.
///
/// Only the triangle named by `kind` is read. Fails with
/// [`LinalgError::SingularTriangular`] when any diagonal entry is exactly
/// zero; small diagonal entries are used as they are.
///
/// # Panics
///
/// If `t` is not square or `b` has the wrong length.
///
/// ```
/// use denselin::{DynMatrix, DynVector};
/// use denselin::linalg::{triangular_solve, Triangle};
///
/// let l = DynMatrix::from_rows(2, 2, &[2.0_f64, 0.0, 1.0, 4.0]);
/// let b = DynVector::from_slice(&[2.0, 9.0]);
/// let x = triangular_solve(&l, &b, Triangle::Lower).unwrap();
/// assert_eq!(x.as_slice(), &[1.0, 2.0]);
/// ```
pub fn triangular_solve<T: FloatScalar>(
    t: &DynMatrix<T>,
    b: &DynVector<T>,
    kind: Triangle,
) -> Result<DynVector<T>, LinalgError> {
    assert!(t.is_square(), "triangular solve requires a square matrix");
    assert_eq!(b.len(), t.nrows(), "rhs length mismatch");
    if let Some(index) = zero_diagonal(t, t.nrows()) {
        log::debug!("triangular solve: zero diagonal at {}", index);
        return Err(LinalgError::SingularTriangular { index });
    }
    let mut x = b.clone();
    match kind {
        Triangle::Lower => forward_substitute(t, x.as_mut_slice(), false),
        Triangle::Upper => back_substitute(t, x.as_mut_slice()),
    }
    Ok(x)
}

/// Solve `T X = B` column by column.
pub fn triangular_solve_matrix<T: FloatScalar>(
    t: &DynMatrix<T>,
    b: &DynMatrix<T>,
    kind: Triangle,
) -> Result<DynMatrix<T>, LinalgError> {
    assert!(t.is_square(), "triangular solve requires a square matrix");
    assert_eq!(b.nrows(), t.nrows(), "rhs row count mismatch");
    if let Some(index) = zero_diagonal(t, t.nrows()) {
        return Err(LinalgError::SingularTriangular { index });
    }
    let mut x = b.clone();
    for j in 0..x.ncols() {
        match kind {
            Triangle::Lower => forward_substitute(t, x.col_mut(j), false),
            Triangle::Upper => back_substitute(t, x.col_mut(j)),
        }
    }
    Ok(x)
}

// ---------------------------------------------------------------------------
// Factor types
// ---------------------------------------------------------------------------

/// Unit-lower-triangular factor, the `L` of `PA = LU`.
///
/// Diagonal entries are exactly 1; entries above the diagonal are exactly 0.
/// The strictly-lower entries are the elimination multipliers.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitLowerTriangular<T>(DynMatrix<T>);

/// Lower-triangular factor with a strictly positive diagonal, the `L` of
/// `A = L L^T`.
///
/// Not interchangeable with [`UnitLowerTriangular`]: the diagonal carries
/// the square roots of the pivots rather than ones.
#[derive(Debug, Clone, PartialEq)]
pub struct LowerTriangular<T>(DynMatrix<T>);

/// Square upper-triangular factor (`U` of PLU, `R̂` of a reduced QR).
///
/// Entries below the diagonal are exactly 0. The diagonal may contain
/// zeros, in which case [`UpperTriangular::solve`] fails.
#[derive(Debug, Clone, PartialEq)]
pub struct UpperTriangular<T>(DynMatrix<T>);

macro_rules! impl_factor_common {
    ($name:ident) => {
        impl<T: FloatScalar> $name<T> {
            /// Borrow the dense matrix.
            #[inline]
            pub fn as_matrix(&self) -> &DynMatrix<T> {
                &self.0
            }

            /// Unwrap into the dense matrix.
            #[inline]
            pub fn into_inner(self) -> DynMatrix<T> {
                self.0
            }

            /// Order of the (square) factor.
            #[inline]
            pub fn dim(&self) -> usize {
                self.0.nrows()
            }

            /// The diagonal entries.
            pub fn diagonal(&self) -> DynVector<T> {
                self.0.diagonal()
            }
        }
    };
}

impl_factor_common!(UnitLowerTriangular);
impl_factor_common!(LowerTriangular);
impl_factor_common!(UpperTriangular);

impl<T: FloatScalar> UnitLowerTriangular<T> {
    /// Wrap `m` if it is square, lower triangular, and has a unit diagonal.
    pub fn try_from_matrix(m: DynMatrix<T>) -> Option<Self> {
        let ok = m.is_square()
            && m.is_lower_triangular()
            && (0..m.nrows()).all(|i| m[(i, i)] == T::one());
        ok.then_some(Self(m))
    }

    pub(crate) fn new_unchecked(m: DynMatrix<T>) -> Self {
        debug_assert!(m.is_lower_triangular());
        Self(m)
    }

    /// Solve `L x = b`. Never fails: the diagonal is 1.
    pub fn solve(&self, b: &DynVector<T>) -> DynVector<T> {
        assert_eq!(b.len(), self.dim(), "rhs length mismatch");
        let mut x = b.clone();
        forward_substitute(&self.0, x.as_mut_slice(), true);
        x
    }
}

impl<T: FloatScalar> LowerTriangular<T> {
    /// Wrap `m` if it is square, lower triangular, and has a strictly
    /// positive diagonal.
    pub fn try_from_matrix(m: DynMatrix<T>) -> Option<Self> {
        let ok = m.is_square()
            && m.is_lower_triangular()
            && (0..m.nrows()).all(|i| m[(i, i)] > T::zero());
        ok.then_some(Self(m))
    }

    pub(crate) fn new_unchecked(m: DynMatrix<T>) -> Self {
        debug_assert!(m.is_lower_triangular());
        Self(m)
    }

    /// Solve `L x = b`. Never fails: the diagonal is positive.
    pub fn solve(&self, b: &DynVector<T>) -> DynVector<T> {
        assert_eq!(b.len(), self.dim(), "rhs length mismatch");
        let mut x = b.clone();
        forward_substitute(&self.0, x.as_mut_slice(), false);
        x
    }

    /// Solve `L^T x = b` without forming the transpose.
    pub fn solve_transposed(&self, b: &DynVector<T>) -> DynVector<T> {
        assert_eq!(b.len(), self.dim(), "rhs length mismatch");
        let mut x = b.clone();
        back_substitute_transposed(&self.0, x.as_mut_slice());
        x
    }
}

impl<T: FloatScalar> UpperTriangular<T> {
    /// Wrap `m` if it is square and upper triangular.
    pub fn try_from_matrix(m: DynMatrix<T>) -> Option<Self> {
        (m.is_square() && m.is_upper_triangular()).then_some(Self(m))
    }

    pub(crate) fn new_unchecked(m: DynMatrix<T>) -> Self {
        debug_assert!(m.is_upper_triangular());
        Self(m)
    }

    /// Solve `U x = b`, failing on an exactly zero diagonal entry.
    pub fn solve(&self, b: &DynVector<T>) -> Result<DynVector<T>, LinalgError> {
        triangular_solve(&self.0, b, Triangle::Upper)
    }
}
