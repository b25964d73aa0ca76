use alloc::vec;
use core::ops::{Mul, Sub};

use crate::traits::Scalar;

use super::vector::DynVector;
use super::DynMatrix;

// ── Explicit operations ─────────────────────────────────────────────

impl<T: Scalar> DynMatrix<T> {
    /// Matrix product `self * rhs`.
    ///
    /// Panics if the inner dimensions disagree.
    ///
    /// ```
    /// use denselin::DynMatrix;
    /// let a = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// let b = DynMatrix::from_rows(2, 2, &[5.0, 6.0, 7.0, 8.0]);
    /// let c = a.matmul(&b);
    /// assert_eq!(c[(0, 0)], 19.0);
    /// assert_eq!(c[(1, 1)], 50.0);
    /// ```
    pub fn matmul(&self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
        assert_eq!(
            self.ncols, rhs.nrows,
            "dimension mismatch: {}x{} * {}x{}",
            self.nrows, self.ncols, rhs.nrows, rhs.ncols,
        );
        let m = self.nrows;
        let mut out = DynMatrix::zeros(m, rhs.ncols);
        // j-k-i order keeps both the output and the left operand column-contiguous
        for j in 0..rhs.ncols {
            for k in 0..self.ncols {
                let b_kj = rhs[(k, j)];
                let a_col = &self.data[k * m..(k + 1) * m];
                let out_col = &mut out.data[j * m..(j + 1) * m];
                for (o, &a) in out_col.iter_mut().zip(a_col.iter()) {
                    *o = *o + a * b_kj;
                }
            }
        }
        out
    }

    /// Matrix-vector product `self * v`.
    pub fn matvec(&self, v: &DynVector<T>) -> DynVector<T> {
        assert_eq!(
            self.ncols,
            v.len(),
            "dimension mismatch: {}x{} * vector of length {}",
            self.nrows,
            self.ncols,
            v.len(),
        );
        let m = self.nrows;
        let mut out = vec![T::zero(); m];
        for k in 0..self.ncols {
            let vk = v[k];
            for (o, &a) in out.iter_mut().zip(self.data[k * m..(k + 1) * m].iter()) {
                *o = *o + a * vk;
            }
        }
        DynVector::from_vec(out)
    }

    /// Transpose: (M×N) → (N×M).
    ///
    /// ```
    /// use denselin::DynMatrix;
    /// let a = DynMatrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// let t = a.transpose();
    /// assert_eq!(t.nrows(), 3);
    /// assert_eq!(t[(2, 1)], 6.0);
    /// ```
    pub fn transpose(&self) -> DynMatrix<T> {
        DynMatrix::from_fn(self.ncols, self.nrows, |i, j| self[(j, i)])
    }

    /// `self^T * rhs` without forming the transpose.
    pub fn tr_matmul(&self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
        assert_eq!(
            self.nrows, rhs.nrows,
            "dimension mismatch: ({}x{})^T * {}x{}",
            self.nrows, self.ncols, rhs.nrows, rhs.ncols,
        );
        DynMatrix::from_fn(self.ncols, rhs.ncols, |i, j| {
            super::vector::dot(self.col(i), rhs.col(j))
        })
    }

    /// `self^T * v` without forming the transpose.
    pub fn tr_matvec(&self, v: &DynVector<T>) -> DynVector<T> {
        assert_eq!(self.nrows, v.len(), "dimension mismatch");
        DynVector::from_fn(self.ncols, |j| super::vector::dot(self.col(j), v.as_slice()))
    }

    /// Element-wise difference `self - rhs`.
    pub fn sub(&self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
        assert_eq!(
            (self.nrows, self.ncols),
            (rhs.nrows, rhs.ncols),
            "dimension mismatch: {}x{} - {}x{}",
            self.nrows, self.ncols, rhs.nrows, rhs.ncols,
        );
        let data = self
            .data
            .iter()
            .zip(rhs.data.iter())
            .map(|(&a, &b)| a - b)
            .collect();
        DynMatrix {
            data,
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }

    /// Multiply every entry by `s`.
    pub fn scale(&self, s: T) -> DynMatrix<T> {
        DynMatrix {
            data: self.data.iter().map(|&x| x * s).collect(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }
}

// ── Operator sugar ──────────────────────────────────────────────────

impl<T: Scalar> Mul<&DynMatrix<T>> for &DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn mul(self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
        self.matmul(rhs)
    }
}

impl<T: Scalar> Mul<&DynVector<T>> for &DynMatrix<T> {
    type Output = DynVector<T>;

    fn mul(self, rhs: &DynVector<T>) -> DynVector<T> {
        self.matvec(rhs)
    }
}

impl<T: Scalar> Sub<&DynMatrix<T>> for &DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn sub(self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
        DynMatrix::sub(self, rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_multiply_non_square() {
        let a = DynMatrix::<f64>::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = DynMatrix::<f64>::from_rows(3, 2, &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
        let c = &a * &b;
        assert_eq!(c.nrows(), 2);
        assert_eq!(c.ncols(), 2);
        assert_eq!(c[(0, 0)], 58.0);
        assert_eq!(c[(0, 1)], 64.0);
        assert_eq!(c[(1, 0)], 139.0);
        assert_eq!(c[(1, 1)], 154.0);
    }

    #[test]
    #[should_panic(expected = "dimension mismatch")]
    fn multiply_dim_mismatch() {
        let a = DynMatrix::<f64>::zeros(2, 3);
        let b = DynMatrix::<f64>::zeros(2, 2);
        let _ = &a * &b;
    }

    #[test]
    fn matvec() {
        let a = DynMatrix::<f64>::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let v = DynVector::<f64>::from_slice(&[1.0, 0.0, -1.0]);
        assert_eq!((&a * &v).as_slice(), &[-2.0, -2.0]);
    }

    #[test]
    fn transposed_products_match_explicit_transpose() {
        let a = DynMatrix::<f64>::from_rows(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = DynMatrix::<f64>::from_rows(3, 2, &[0.5, -1.0, 2.0, 0.0, 1.0, 3.0]);
        assert_eq!(a.tr_matmul(&b), a.transpose().matmul(&b));

        let v = DynVector::<f64>::from_slice(&[1.0, 1.0, 1.0]);
        assert_eq!(a.tr_matvec(&v).as_slice(), &[9.0, 12.0]);
    }

    #[test]
    fn sub_and_scale() {
        let a = DynMatrix::<f64>::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let b = a.scale(2.0);
        let d = &b - &a;
        assert_eq!(d, a);
    }

    #[test]
    fn identity_multiply() {
        let a = DynMatrix::<f64>::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let id = DynMatrix::eye(2);
        assert_eq!(&a * &id, a);
        assert_eq!(&id * &a, a);
    }
}
