use crate::traits::Scalar;

use super::DynMatrix;

impl<T: Scalar> DynMatrix<T> {
    /// Extract a sub-matrix of size `rows x cols` starting at `(i, j)`.
    ///
    /// Panics if the block extends beyond the matrix bounds.
    ///
    /// ```
    /// use denselin::DynMatrix;
    /// let m = DynMatrix::from_fn(3, 3, |i, j| (i * 3 + j) as f64);
    /// let b = m.block(1, 1, 2, 2);
    /// assert_eq!(b[(0, 0)], 4.0);
    /// assert_eq!(b[(1, 1)], 8.0);
    /// ```
    pub fn block(&self, i: usize, j: usize, rows: usize, cols: usize) -> Self {
        assert!(
            i + rows <= self.nrows && j + cols <= self.ncols,
            "block ({},{}) size {}x{} out of bounds for {}x{} matrix",
            i, j, rows, cols, self.nrows, self.ncols,
        );
        DynMatrix::from_fn(rows, cols, |r, c| self[(i + r, j + c)])
    }

    /// Extract the first `n` rows.
    pub fn top_rows(&self, n: usize) -> Self {
        self.block(0, 0, n, self.ncols)
    }

    /// Extract the first `n` columns.
    pub fn left_cols(&self, n: usize) -> Self {
        assert!(n <= self.ncols, "left_cols({}) out of bounds for {} columns", n, self.ncols);
        let data = self.data[..n * self.nrows].to_vec();
        DynMatrix {
            data,
            nrows: self.nrows,
            ncols: n,
        }
    }
}
