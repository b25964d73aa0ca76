use crate::dynmatrix::vector::{dot, norm2};
use crate::dynmatrix::{DynMatrix, DynVector};
use crate::linalg::triangular::{back_substitute, UpperTriangular};
use crate::linalg::{axpy_neg, dim_as, LinalgError};
use crate::traits::FloatScalar;

/// Which Gram–Schmidt recurrence to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GramSchmidtVariant {
    /// Project the original column `a_j` onto every earlier `q_k`.
    #[default]
    Classical,
    /// Project the running residual instead, one `q_k` at a time.
    Modified,
}

/// Reduced QR decomposition `A = Q̂ R̂` by Gram–Schmidt orthogonalization.
///
/// `Q̂` is `m x n` with orthonormal columns and `R̂` is `n x n` upper
/// triangular with a positive diagonal.
///
/// Rounding makes `Q̂` lose orthogonality as `A` becomes ill conditioned
/// or large. This is a property of the method; [`HouseholderQr`](super::HouseholderQr)
/// is the stable alternative.
///
/// ```
/// use denselin::DynMatrix;
/// use denselin::linalg::GramSchmidtVariant;
///
/// let a = DynMatrix::from_rows(3, 2, &[3.0_f64, 1.0, 4.0, 2.0, 0.0, 5.0]);
/// let qr = a.gram_schmidt_qr(GramSchmidtVariant::Classical).unwrap();
/// assert!((qr.r().as_matrix()[(0, 0)] - 5.0).abs() < 1e-12);
/// let qtq = qr.q().tr_matmul(qr.q());
/// assert!((qtq[(0, 1)]).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct GramSchmidtQr<T> {
    q: DynMatrix<T>,
    r: UpperTriangular<T>,
    variant: GramSchmidtVariant,
}

impl<T: FloatScalar> GramSchmidtQr<T> {
    /// Orthogonalize the columns of `a` in order.
    ///
    /// Fails with [`LinalgError::RankDeficient`] at the first column whose
    /// residual norm is at most `m * eps * ||a_j||`.
    ///
    /// # Panics
    ///
    /// If `a` has fewer rows than columns.
    pub fn new(a: &DynMatrix<T>, variant: GramSchmidtVariant) -> Result<Self, LinalgError> {
        let m = a.nrows();
        let n = a.ncols();
        assert!(m >= n, "QR decomposition requires nrows >= ncols");

        let mut q = DynMatrix::zeros(m, n);
        let mut r = DynMatrix::zeros(n, n);
        let scale = dim_as::<T>(m) * T::epsilon();

        for j in 0..n {
            let a_j = a.col(j);
            let mut v = a_j.to_vec();
            for k in 0..j {
                let r_kj = match variant {
                    GramSchmidtVariant::Classical => dot(q.col(k), a_j),
                    GramSchmidtVariant::Modified => dot(q.col(k), &v),
                };
                r[(k, j)] = r_kj;
                axpy_neg(&mut v, r_kj, q.col(k));
            }

            let r_jj = norm2(&v);
            if !(r_jj > scale * norm2(a_j)) {
                log::debug!("Gram-Schmidt: column {} is dependent on earlier columns", j);
                return Err(LinalgError::RankDeficient { column: j });
            }
            r[(j, j)] = r_jj;
            let inv = T::one() / r_jj;
            for (qi, vi) in q.col_mut(j).iter_mut().zip(v.iter()) {
                *qi = *vi * inv;
            }
        }

        Ok(Self {
            q,
            r: UpperTriangular::new_unchecked(r),
            variant,
        })
    }

    /// The `m x n` factor with orthonormal columns.
    #[inline]
    pub fn q(&self) -> &DynMatrix<T> {
        &self.q
    }

    /// The `n x n` upper-triangular factor.
    #[inline]
    pub fn r(&self) -> &UpperTriangular<T> {
        &self.r
    }

    #[inline]
    pub fn variant(&self) -> GramSchmidtVariant {
        self.variant
    }

    pub fn into_parts(self) -> (DynMatrix<T>, UpperTriangular<T>) {
        (self.q, self.r)
    }

    /// Least-squares solution `x = R̂^{-1} (Q̂^T b)`.
    ///
    /// Only as accurate as the orthogonality of `Q̂`.
    pub fn solve(&self, b: &DynVector<T>) -> DynVector<T> {
        assert_eq!(b.len(), self.q.nrows(), "rhs length mismatch");
        let mut x = self.q.tr_matvec(b);
        back_substitute(self.r.as_matrix(), x.as_mut_slice());
        x
    }
}
