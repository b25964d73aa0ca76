use crate::traits::FloatScalar;

use super::DynMatrix;

impl<T: FloatScalar> DynMatrix<T> {
    /// Frobenius norm (square root of the sum of squared entries).
    ///
    /// ```
    /// use denselin::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
    /// assert!((m.frobenius_norm() - 30.0_f64.sqrt()).abs() < 1e-12);
    /// ```
    pub fn frobenius_norm(&self) -> T {
        let mut sum = T::zero();
        for &x in &self.data {
            sum = sum + x * x;
        }
        sum.sqrt()
    }

    /// Infinity norm (maximum absolute row sum).
    ///
    /// ```
    /// use denselin::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[1.0_f64, -2.0, 3.0, 4.0]);
    /// assert!((m.norm_inf() - 7.0).abs() < 1e-12);
    /// ```
    pub fn norm_inf(&self) -> T {
        let mut max = T::zero();
        for i in 0..self.nrows {
            let mut row_sum = T::zero();
            for j in 0..self.ncols {
                row_sum = row_sum + self[(i, j)].abs();
            }
            if row_sum > max {
                max = row_sum;
            }
        }
        max
    }

    /// Largest absolute entry.
    pub fn max_abs(&self) -> T {
        self.data
            .iter()
            .fold(T::zero(), |acc, &x| if x.abs() > acc { x.abs() } else { acc })
    }
}
