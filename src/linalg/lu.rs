use alloc::vec::Vec;

use crate::dynmatrix::{DynMatrix, DynVector};
use crate::linalg::permutation::Permutation;
use crate::linalg::triangular::{
    back_substitute, forward_substitute, UnitLowerTriangular, UpperTriangular,
};
use crate::linalg::{axpy_neg, LinalgError};
use crate::traits::{FloatScalar, MatrixMut};

/// Gaussian elimination with partial pivoting, in place.
///
/// On return, `a` contains both factors of `PA = LU` packed together:
/// - Upper triangle (including diagonal): U
/// - Lower triangle (excluding diagonal): the multipliers of L (its
///   diagonal is implicitly 1)
///
/// `perm` must be the identity on entry; each row exchange is recorded in it.
///
/// Every column is pivoted to the row of largest magnitude, even when the
/// diagonal entry is already nonzero. Ties keep the upper row. Fails with
/// [`LinalgError::SingularMatrix`] only when the selected pivot is exactly
/// zero; small pivots are accepted.
pub fn lu_in_place<T: FloatScalar>(
    a: &mut impl MatrixMut<T>,
    perm: &mut Permutation,
) -> Result<(), LinalgError> {
    let n = a.nrows();
    assert_eq!(n, a.ncols(), "PLU decomposition requires a square matrix");
    assert_eq!(n, perm.len(), "permutation length must match matrix size");

    let mut multipliers: Vec<T> = Vec::with_capacity(n);

    for col in 0..n {
        let mut max_row = col;
        let mut max_val = a.get(col, col).abs();
        for row in (col + 1)..n {
            let val = a.get(row, col).abs();
            if val > max_val {
                max_val = val;
                max_row = row;
            }
        }

        if max_val == T::zero() {
            log::debug!("PLU: zero pivot in column {}", col);
            return Err(LinalgError::SingularMatrix { column: col });
        }

        // Whole-row exchange: already-stored multipliers travel with their row
        if max_row != col {
            log::trace!("PLU: column {} swaps rows {} and {}", col, col, max_row);
            perm.swap(col, max_row);
            for j in 0..n {
                let tmp = *a.get(col, j);
                *a.get_mut(col, j) = *a.get(max_row, j);
                *a.get_mut(max_row, j) = tmp;
            }
        }

        let pivot = *a.get(col, col);
        {
            let sub_col = a.col_as_mut_slice(col, col + 1);
            for x in sub_col.iter_mut() {
                *x = *x / pivot;
            }
        }

        // Rank-1 update of the trailing block, one column at a time
        multipliers.clear();
        multipliers.extend_from_slice(a.col_as_slice(col, col + 1));
        for j in (col + 1)..n {
            let u_col_j = *a.get(col, j);
            axpy_neg(a.col_as_mut_slice(j, col + 1), u_col_j, &multipliers);
        }
    }

    Ok(())
}

/// PLU decomposition `PA = LU` of a square matrix.
///
/// Stores the packed L/U factors, the row permutation, and the largest
/// input magnitude (for [`Plu::growth_factor`]).
///
/// Partial pivoting bounds the multipliers by 1 but not the growth of U:
/// matrices exist for which the last column of U doubles at every step.
/// Such factorizations complete normally; inspect [`Plu::growth_factor`]
/// or [`Plu::pivots`] to detect them.
///
/// # Example
///
/// ```
/// use denselin::{DynMatrix, DynVector};
///
/// let a = DynMatrix::from_rows(2, 2, &[2.0_f64, 1.0, 5.0, 3.0]);
/// let plu = a.plu().unwrap();
///
/// let b = DynVector::from_slice(&[4.0, 11.0]);
/// let x = plu.solve(&b);
/// assert!((x[0] - 1.0).abs() < 1e-12);
/// assert!((x[1] - 2.0).abs() < 1e-12);
/// assert!((plu.det() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct Plu<T> {
    lu: DynMatrix<T>,
    perm: Permutation,
    input_max: T,
}

impl<T: FloatScalar> Plu<T> {
    /// Decompose a square matrix. The input is not modified.
    ///
    /// # Panics
    ///
    /// If `a` is not square.
    pub fn new(a: &DynMatrix<T>) -> Result<Self, LinalgError> {
        assert!(a.is_square(), "PLU decomposition requires a square matrix");
        let mut lu = a.clone();
        let mut perm = Permutation::identity(a.nrows());
        lu_in_place(&mut lu, &mut perm)?;
        Ok(Self {
            lu,
            perm,
            input_max: a.max_abs(),
        })
    }

    /// Order of the factored matrix.
    #[inline]
    pub fn dim(&self) -> usize {
        self.lu.nrows()
    }

    /// The row permutation `P`.
    #[inline]
    pub fn p(&self) -> &Permutation {
        &self.perm
    }

    /// The unit-lower-triangular factor `L`.
    pub fn l(&self) -> UnitLowerTriangular<T> {
        let n = self.dim();
        UnitLowerTriangular::new_unchecked(DynMatrix::from_fn(n, n, |i, j| {
            if i == j {
                T::one()
            } else if i > j {
                self.lu[(i, j)]
            } else {
                T::zero()
            }
        }))
    }

    /// The upper-triangular factor `U`.
    pub fn u(&self) -> UpperTriangular<T> {
        let n = self.dim();
        UpperTriangular::new_unchecked(DynMatrix::from_fn(n, n, |i, j| {
            if i <= j {
                self.lu[(i, j)]
            } else {
                T::zero()
            }
        }))
    }

    /// Split into `(P, L, U)`.
    pub fn into_parts(self) -> (Permutation, UnitLowerTriangular<T>, UpperTriangular<T>) {
        let l = self.l();
        let u = self.u();
        (self.perm, l, u)
    }

    /// Diagonal of `U`, the pivots actually used.
    pub fn pivots(&self) -> DynVector<T> {
        self.lu.diagonal()
    }

    /// Growth factor `max |U_ij| / max |A_ij|`.
    pub fn growth_factor(&self) -> T {
        let n = self.dim();
        let mut u_max = T::zero();
        for j in 0..n {
            for i in 0..=j {
                let v = self.lu[(i, j)].abs();
                if v > u_max {
                    u_max = v;
                }
            }
        }
        if self.input_max == T::zero() {
            return T::one();
        }
        u_max / self.input_max
    }

    /// `x <- U^{-1} (L^{-1} x)` for an already permuted right-hand side.
    fn substitute(&self, x: &mut [T]) {
        forward_substitute(&self.lu, x, true);
        back_substitute(&self.lu, x);
    }

    /// Solve `Ax = b` as `x = U^{-1} (L^{-1} (P b))`.
    pub fn solve(&self, b: &DynVector<T>) -> DynVector<T> {
        assert_eq!(b.len(), self.dim(), "rhs length mismatch");
        let mut x = self.perm.apply_vector(b);
        self.substitute(x.as_mut_slice());
        x
    }

    /// Solve `AX = B` for every column of `B`.
    pub fn solve_matrix(&self, b: &DynMatrix<T>) -> DynMatrix<T> {
        let n = self.dim();
        assert_eq!(b.nrows(), n, "rhs row count mismatch");
        let mut x = DynMatrix::zeros(n, b.ncols());
        for j in 0..b.ncols() {
            let col = x.col_mut(j);
            col.copy_from_slice(&self.perm.apply(b.col(j)));
            self.substitute(col);
        }
        x
    }

    /// Compute the matrix inverse.
    pub fn inverse(&self) -> DynMatrix<T> {
        self.solve_matrix(&DynMatrix::eye(self.dim()))
    }

    /// Compute the determinant.
    pub fn det(&self) -> T {
        let mut d = if self.perm.is_even() {
            T::one()
        } else {
            -T::one()
        };
        for i in 0..self.dim() {
            d = d * self.lu[(i, i)];
        }
        d
    }
}
