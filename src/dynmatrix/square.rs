use crate::traits::Scalar;

use super::vector::DynVector;
use super::DynMatrix;

impl<T: Scalar> DynMatrix<T> {
    /// Extract the main diagonal as a `DynVector`.
    ///
    /// Works for rectangular matrices too (length `min(nrows, ncols)`).
    ///
    /// ```
    /// use denselin::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// assert_eq!(m.diagonal().as_slice(), &[1.0, 4.0]);
    /// ```
    pub fn diagonal(&self) -> DynVector<T> {
        let n = self.nrows.min(self.ncols);
        DynVector::from_fn(n, |i| self[(i, i)])
    }

    /// Check if the matrix is symmetric (`A == A^T`), exactly.
    pub fn is_symmetric(&self) -> bool {
        if !self.is_square() {
            return false;
        }
        let n = self.nrows;
        for j in 0..n {
            for i in (j + 1)..n {
                if self[(i, j)] != self[(j, i)] {
                    return false;
                }
            }
        }
        true
    }

    /// Every entry strictly below the diagonal is zero.
    ///
    /// Applies to rectangular matrices as well (e.g. a full `R` from QR).
    pub fn is_upper_triangular(&self) -> bool {
        for j in 0..self.ncols {
            for i in (j + 1)..self.nrows {
                if self[(i, j)] != T::zero() {
                    return false;
                }
            }
        }
        true
    }

    /// Every entry strictly above the diagonal is zero.
    pub fn is_lower_triangular(&self) -> bool {
        for j in 0..self.ncols {
            for i in 0..j.min(self.nrows) {
                if self[(i, j)] != T::zero() {
                    return false;
                }
            }
        }
        true
    }
}
