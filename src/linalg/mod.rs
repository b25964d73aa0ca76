pub(crate) mod cholesky;
pub(crate) mod gram_schmidt;
pub(crate) mod lu;
pub(crate) mod permutation;
pub(crate) mod qr;
pub(crate) mod solve;
pub(crate) mod triangular;

pub use cholesky::{cholesky_in_place, is_positive_definite, Cholesky};
pub use gram_schmidt::{GramSchmidtQr, GramSchmidtVariant};
pub use lu::{lu_in_place, Plu};
pub use permutation::Permutation;
pub use qr::{householder_in_place, householder_qr_dense, reflector_matrix, HouseholderQr};
pub use solve::{solve, solve_many, MatrixStructure, Solution, SolveMethod, SolveOptions};
pub use triangular::{
    triangular_solve, triangular_solve_matrix, LowerTriangular, Triangle, UnitLowerTriangular,
    UpperTriangular,
};

use crate::traits::{FloatScalar, Scalar};

/// Errors from the factorizations and solvers.
///
/// Every variant is terminal for the call that produced it: the inputs are
/// pure data, so retrying yields the same failure. The index fields are the
/// 0-based position at which the failure was detected.
///
/// ```
/// use denselin::DynMatrix;
/// use denselin::linalg::LinalgError;
///
/// let singular = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 2.0, 4.0]);
/// assert_eq!(
///     singular.plu().unwrap_err(),
///     LinalgError::SingularMatrix { column: 1 },
/// );
///
/// let not_pd = DynMatrix::from_rows(2, 2, &[1.0_f64, 5.0, 5.0, 1.0]);
/// assert_eq!(
///     not_pd.cholesky().unwrap_err(),
///     LinalgError::NotPositiveDefinite { column: 1 },
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LinalgError {
    /// A triangular system has an exactly zero diagonal entry.
    #[error("triangular matrix has a zero diagonal entry at index {index}")]
    SingularTriangular { index: usize },

    /// QR met a column that is numerically dependent on its predecessors.
    #[error("matrix is rank deficient: column {column} is numerically dependent on earlier columns")]
    RankDeficient { column: usize },

    /// PLU found an exactly zero pivot after row selection.
    #[error("matrix is singular: no nonzero pivot available in column {column}")]
    SingularMatrix { column: usize },

    /// Cholesky met a non-positive diagonal candidate.
    #[error("matrix is not positive definite: non-positive pivot at column {column}")]
    NotPositiveDefinite { column: usize },

    /// A least-squares solve was asked for with fewer rows than columns.
    #[error("least-squares solve needs at least as many rows as columns, got {nrows}x{ncols}")]
    Underdetermined { nrows: usize, ncols: usize },
}

/// `y -= alpha * x`, element-wise over equal-length slices.
#[inline]
pub(crate) fn axpy_neg<T: Scalar>(y: &mut [T], alpha: T, x: &[T]) {
    debug_assert_eq!(y.len(), x.len());
    for (yi, &xi) in y.iter_mut().zip(x.iter()) {
        *yi = *yi - alpha * xi;
    }
}

/// Dimension as a float, for tolerances that scale with size.
#[inline]
pub(crate) fn dim_as<T: FloatScalar>(n: usize) -> T {
    num_traits::cast(n).unwrap_or_else(T::max_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axpy_neg_updates_in_place() {
        let mut y = [1.0, 2.0, 3.0];
        axpy_neg(&mut y, 2.0, &[1.0, 1.0, 0.5]);
        assert_eq!(y, [-1.0, 0.0, 2.0]);
    }

    #[test]
    fn error_messages_name_the_position() {
        let msg = LinalgError::SingularTriangular { index: 3 }.to_string();
        assert!(msg.contains("index 3"), "{}", msg);
        let msg = LinalgError::Underdetermined { nrows: 2, ncols: 5 }.to_string();
        assert!(msg.contains("2x5"), "{}", msg);
    }
}
