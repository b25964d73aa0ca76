use crate::linalg::{
    solve, Cholesky, GramSchmidtQr, GramSchmidtVariant, HouseholderQr, LinalgError, Plu,
    Solution, SolveOptions,
};
use crate::traits::FloatScalar;

use super::vector::DynVector;
use super::DynMatrix;

// ── Convenience methods on DynMatrix ────────────────────────────────

impl<T: FloatScalar> DynMatrix<T> {
    /// PLU decomposition with partial pivoting.
    pub fn plu(&self) -> Result<Plu<T>, LinalgError> {
        Plu::new(self)
    }

    /// Cholesky decomposition (`A = L * L^T`).
    pub fn cholesky(&self) -> Result<Cholesky<T>, LinalgError> {
        Cholesky::new(self)
    }

    /// QR decomposition using Householder reflections.
    pub fn householder_qr(&self) -> HouseholderQr<T> {
        HouseholderQr::new(self)
    }

    /// Reduced QR decomposition by Gram–Schmidt orthogonalization.
    pub fn gram_schmidt_qr(
        &self,
        variant: GramSchmidtVariant,
    ) -> Result<GramSchmidtQr<T>, LinalgError> {
        GramSchmidtQr::new(self, variant)
    }

    /// Solve `Ax = b` (least squares for tall `A`) with the default options.
    ///
    /// ```
    /// use denselin::{DynMatrix, DynVector};
    /// let a = DynMatrix::from_rows(2, 2, &[2.0_f64, 1.0, 5.0, 3.0]);
    /// let b = DynVector::from_slice(&[4.0, 11.0]);
    /// let x = a.solve(&b).unwrap();
    /// assert!((x[0] - 1.0).abs() < 1e-12);
    /// assert!((x[1] - 2.0).abs() < 1e-12);
    /// ```
    pub fn solve(&self, b: &DynVector<T>) -> Result<DynVector<T>, LinalgError> {
        Ok(solve(self, b, &SolveOptions::default())?.x)
    }

    /// Solve with explicit options, keeping the method and residual.
    pub fn solve_with(
        &self,
        b: &DynVector<T>,
        options: &SolveOptions,
    ) -> Result<Solution<T>, LinalgError> {
        solve(self, b, options)
    }

    /// Matrix inverse via PLU decomposition.
    ///
    /// ```
    /// use denselin::DynMatrix;
    /// let a = DynMatrix::from_rows(2, 2, &[4.0_f64, 7.0, 2.0, 6.0]);
    /// let a_inv = a.inverse().unwrap();
    /// let id = &a * &a_inv;
    /// assert!((id[(0, 0)] - 1.0).abs() < 1e-12);
    /// assert!((id[(0, 1)]).abs() < 1e-12);
    /// ```
    pub fn inverse(&self) -> Result<DynMatrix<T>, LinalgError> {
        Ok(self.plu()?.inverse())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::{MatrixStructure, SolveMethod};

    #[test]
    fn convenience_methods_agree() {
        let a = DynMatrix::<f64>::from_rows(3, 3, &[4.0, 2.0, 1.0, 2.0, 5.0, 3.0, 1.0, 3.0, 6.0]);
        let b = DynVector::<f64>::from_slice(&[7.0, 10.0, 10.0]);

        let x = a.solve(&b).unwrap();
        let x_chol = a.cholesky().unwrap().solve(&b);
        let x_qr = a.householder_qr().solve(&b).unwrap();
        let x_gs = a
            .gram_schmidt_qr(GramSchmidtVariant::Modified)
            .unwrap()
            .solve(&b);
        for i in 0..3 {
            assert!((x[i] - 1.0).abs() < 1e-12);
            assert!((x_chol[i] - 1.0).abs() < 1e-12);
            assert!((x_qr[i] - 1.0).abs() < 1e-12);
            assert!((x_gs[i] - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn solve_with_reports_method() {
        let a = DynMatrix::<f64>::from_rows(2, 2, &[2.0, 1.0, 1.0, 2.0]);
        let b = DynVector::<f64>::from_slice(&[3.0, 3.0]);
        let opts = SolveOptions::default().with_structure(MatrixStructure::SymmetricPositiveDefinite);
        let sol = a.solve_with(&b, &opts).unwrap();
        assert_eq!(sol.method, SolveMethod::Cholesky);
        assert!((sol.x[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn singular_inverse_fails() {
        let a = DynMatrix::<f64>::from_rows(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        assert_eq!(
            a.inverse().unwrap_err(),
            LinalgError::SingularMatrix { column: 1 }
        );
    }
}
