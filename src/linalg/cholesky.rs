use alloc::vec::Vec;

use crate::dynmatrix::{DynMatrix, DynVector};
use crate::linalg::triangular::{back_substitute_transposed, forward_substitute, LowerTriangular};
use crate::linalg::{axpy_neg, LinalgError};
use crate::traits::{FloatScalar, MatrixMut};

/// Cholesky decomposition in place: A = L * L^T.
///
/// Right-looking: each step takes the square root of the leading diagonal
/// entry, scales the column below it, and subtracts the rank-1 outer
/// product from the trailing block. Only the lower triangle (including the
/// diagonal) is read or written; the upper triangle is left unchanged.
///
/// A candidate pivot fails unless it exceeds `eps * |a_kk|` of the input
/// diagonal, which also rejects NaN.
#[inline]
pub fn cholesky_in_place<T: FloatScalar>(a: &mut impl MatrixMut<T>) -> Result<(), LinalgError> {
    let n = a.nrows();
    assert_eq!(n, a.ncols(), "Cholesky decomposition requires a square matrix");

    let original_diag: Vec<T> = (0..n).map(|k| *a.get(k, k)).collect();
    let mut col_k: Vec<T> = Vec::with_capacity(n);

    for k in 0..n {
        let alpha = *a.get(k, k);
        let threshold = T::epsilon() * original_diag[k].abs();
        if !(alpha > threshold) {
            log::debug!("Cholesky: non-positive pivot {:?} at column {}", alpha, k);
            return Err(LinalgError::NotPositiveDefinite { column: k });
        }

        let lkk = alpha.sqrt();
        *a.get_mut(k, k) = lkk;
        let inv_lkk = T::one() / lkk;
        for x in a.col_as_mut_slice(k, k + 1).iter_mut() {
            *x = *x * inv_lkk;
        }

        // Trailing lower triangle: A[j.., j] -= L[j, k] * L[j.., k]
        col_k.clear();
        col_k.extend_from_slice(a.col_as_slice(k, k + 1));
        for (offset, j) in ((k + 1)..n).enumerate() {
            let ljk = col_k[offset];
            axpy_neg(a.col_as_mut_slice(j, j), ljk, &col_k[offset..]);
        }
    }

    Ok(())
}

/// `true` when `a` is symmetric positive definite.
///
/// Positive-definiteness is decided by attempting the factorization: a
/// symmetric matrix is positive definite exactly when Cholesky completes
/// without a non-positive pivot.
///
/// ```
/// use denselin::DynMatrix;
/// use denselin::linalg::is_positive_definite;
///
/// let spd = DynMatrix::from_rows(2, 2, &[4.0_f64, 2.0, 2.0, 3.0]);
/// let indefinite = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 2.0, 1.0]);
/// assert!(is_positive_definite(&spd));
/// assert!(!is_positive_definite(&indefinite));
/// ```
pub fn is_positive_definite<T: FloatScalar>(a: &DynMatrix<T>) -> bool {
    a.is_square() && a.is_symmetric() && Cholesky::new(a).is_ok()
}

/// Cholesky decomposition of a symmetric positive-definite matrix.
///
/// The factor is a [`LowerTriangular`] with a strictly positive diagonal,
/// a different contract from the unit-diagonal `L` of [`Plu`](super::Plu).
///
/// # Example
///
/// ```
/// use denselin::{DynMatrix, DynVector};
///
/// let a = DynMatrix::from_rows(2, 2, &[4.0_f64, 2.0, 2.0, 3.0]);
/// let chol = a.cholesky().unwrap();
///
/// let b = DynVector::from_slice(&[8.0, 7.0]);
/// let x = chol.solve(&b);
/// assert!((x[0] - 1.25).abs() < 1e-12);
/// assert!((x[1] - 1.5).abs() < 1e-12);
/// assert!((chol.det() - 8.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct Cholesky<T> {
    l: LowerTriangular<T>,
}

impl<T: FloatScalar> Cholesky<T> {
    /// Decompose a symmetric positive-definite matrix. Only the lower
    /// triangle of `a` is read; `a` itself is not modified.
    ///
    /// # Panics
    ///
    /// If `a` is not square.
    pub fn new(a: &DynMatrix<T>) -> Result<Self, LinalgError> {
        let mut l = a.clone();
        cholesky_in_place(&mut l)?;
        let n = l.nrows();
        for j in 1..n {
            for x in l.col_mut(j)[..j].iter_mut() {
                *x = T::zero();
            }
        }
        Ok(Self {
            l: LowerTriangular::new_unchecked(l),
        })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.l.dim()
    }

    /// The lower-triangular factor `L`, zero above the diagonal.
    #[inline]
    pub fn l(&self) -> &LowerTriangular<T> {
        &self.l
    }

    pub fn into_l(self) -> LowerTriangular<T> {
        self.l
    }

    fn solve_slice(&self, x: &mut [T]) {
        forward_substitute(self.l.as_matrix(), x, false);
        back_substitute_transposed(self.l.as_matrix(), x);
    }

    /// Solve `Ax = b` as `x = L^{-T} (L^{-1} b)`.
    pub fn solve(&self, b: &DynVector<T>) -> DynVector<T> {
        assert_eq!(b.len(), self.dim(), "rhs length mismatch");
        let mut x = b.clone();
        self.solve_slice(x.as_mut_slice());
        x
    }

    /// Solve `AX = B` for every column of `B`.
    pub fn solve_matrix(&self, b: &DynMatrix<T>) -> DynMatrix<T> {
        assert_eq!(b.nrows(), self.dim(), "rhs row count mismatch");
        let mut x = b.clone();
        for j in 0..x.ncols() {
            self.solve_slice(x.col_mut(j));
        }
        x
    }

    /// Compute `A^{-1}`.
    pub fn inverse(&self) -> DynMatrix<T> {
        self.solve_matrix(&DynMatrix::eye(self.dim()))
    }

    /// Determinant, the squared product of the diagonal of `L`.
    pub fn det(&self) -> T {
        let mut d = T::one();
        for i in 0..self.dim() {
            d = d * self.l.as_matrix()[(i, i)];
        }
        d * d
    }

    /// Natural log of the determinant, without overflow for large `n`.
    pub fn ln_det(&self) -> T {
        let mut s = T::zero();
        for i in 0..self.dim() {
            s = s + self.l.as_matrix()[(i, i)].ln();
        }
        s + s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ones_plus_identity(n: usize) -> DynMatrix<f64> {
        DynMatrix::from_fn(n, n, |i, j| if i == j { 2.0 } else { 1.0 })
    }

    #[test]
    fn two_on_diagonal_one_elsewhere() {
        let a = ones_plus_identity(4);
        let chol = Cholesky::new(&a).unwrap();
        let l = chol.l().as_matrix();

        assert!((l[(0, 0)] - 2.0_f64.sqrt()).abs() < 1e-14);
        assert!((l[(1, 0)] - 1.0 / 2.0_f64.sqrt()).abs() < 1e-14);
        assert!((l[(1, 1)] - 1.5_f64.sqrt()).abs() < 1e-14);
        assert!(l.is_lower_triangular());
        for i in 0..4 {
            assert!(l[(i, i)] > 0.0);
        }

        let llt = l.matmul(&l.transpose());
        assert!(llt.sub(&a).max_abs() < 1e-14);
        // det(I + J) = 1 + n
        assert!((chol.det() - 5.0).abs() < 1e-12);
        assert!((chol.ln_det() - 5.0_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn negative_eigenvalue_fails() {
        let a = DynMatrix::<f64>::from_rows(2, 2, &[1.0, 2.0, 2.0, 1.0]);
        assert_eq!(
            Cholesky::new(&a).unwrap_err(),
            LinalgError::NotPositiveDefinite { column: 1 }
        );

        let b = DynMatrix::from_fn(4, 4, |i, j| if i == j { 2.0 } else { 3.0 });
        assert_eq!(
            Cholesky::new(&b).unwrap_err(),
            LinalgError::NotPositiveDefinite { column: 1 }
        );

        let c = DynMatrix::<f64>::from_rows(2, 2, &[-1.0, 0.0, 0.0, 1.0]);
        assert_eq!(
            Cholesky::new(&c).unwrap_err(),
            LinalgError::NotPositiveDefinite { column: 0 }
        );
    }

    #[test]
    fn singular_semidefinite_fails() {
        // rank 1: [1 1; 1 1]
        let a = DynMatrix::fill(2, 2, 1.0);
        assert!(Cholesky::new(&a).is_err());
    }

    #[test]
    fn nan_is_rejected() {
        let a = DynMatrix::<f64>::from_rows(2, 2, &[f64::NAN, 0.0, 0.0, 1.0]);
        assert_eq!(
            Cholesky::new(&a).unwrap_err(),
            LinalgError::NotPositiveDefinite { column: 0 }
        );
    }

    #[test]
    fn upper_triangle_is_ignored() {
        let sym = DynMatrix::<f64>::from_rows(3, 3, &[4.0, 2.0, 1.0, 2.0, 5.0, 3.0, 1.0, 3.0, 6.0]);
        let mut lower_only = sym.clone();
        lower_only[(0, 1)] = 99.0;
        lower_only[(0, 2)] = -7.0;
        lower_only[(1, 2)] = 0.0;
        let a = Cholesky::new(&sym).unwrap();
        let b = Cholesky::new(&lower_only).unwrap();
        assert_eq!(a.l(), b.l());
    }

    #[test]
    fn solve_and_inverse() {
        let a = DynMatrix::<f64>::from_rows(3, 3, &[4.0, 2.0, 1.0, 2.0, 5.0, 3.0, 1.0, 3.0, 6.0]);
        let chol = Cholesky::new(&a).unwrap();
        let b = DynVector::<f64>::from_slice(&[1.0, 2.0, 3.0]);
        let x = chol.solve(&b);
        assert!(a.matvec(&x).sub(&b).max_abs() < 1e-12);

        let inv = chol.inverse();
        assert!(a.matmul(&inv).sub(&DynMatrix::eye(3)).max_abs() < 1e-12);
    }

    #[test]
    fn is_positive_definite_matches_factorization() {
        assert!(is_positive_definite(&ones_plus_identity(5)));
        assert!(!is_positive_definite(&DynMatrix::<f64>::from_rows(
            2,
            2,
            &[1.0, 2.0, 2.0, 1.0]
        )));
        // non-symmetric input is never reported positive definite
        assert!(!is_positive_definite(&DynMatrix::<f64>::from_rows(
            2,
            2,
            &[2.0, 1.0, 0.0, 2.0]
        )));
        assert!(!is_positive_definite(&DynMatrix::<f64>::zeros(2, 3)));
    }

    #[test]
    #[should_panic(expected = "square")]
    fn rectangular_panics() {
        let _ = Cholesky::new(&DynMatrix::<f64>::zeros(2, 3));
    }
}
