use alloc::vec::Vec;

use crate::dynmatrix::vector::{dot, norm2};
use crate::dynmatrix::{DynMatrix, DynVector};
use crate::linalg::triangular::{back_substitute, UpperTriangular};
use crate::linalg::{axpy_neg, LinalgError};
use crate::traits::{FloatScalar, MatrixMut, MatrixRef};

/// Unit reflection vector for the active sub-column `x`.
///
/// Returns `(w, r)` with `(I - 2ww^T) x = r e_1`, or `None` when `x` is
/// exactly zero. The sign of the shift follows `x[0]` (with `+` for zero) so
/// the leading entry never cancels. `x` is scaled by its largest magnitude
/// first, so tiny columns do not underflow in the norm.
fn make_reflector<T: FloatScalar>(x: &[T]) -> Option<(Vec<T>, T)> {
    if x.iter().all(|&v| v == T::zero()) {
        return None;
    }
    let scale = x.iter().fold(T::zero(), |m, v| m.max(v.abs()));
    let inv_scale = T::one() / scale;
    let mut w: Vec<T> = x.iter().map(|&v| v * inv_scale).collect();
    let norm_x = norm2(&w);
    let shift = if w[0] >= T::zero() { norm_x } else { -norm_x };
    w[0] = w[0] + shift;
    let inv = T::one() / norm2(&w);
    for v in w.iter_mut() {
        *v = *v * inv;
    }
    Some((w, -shift * scale))
}

/// `x -= 2 w (w^T x)`.
#[inline]
fn reflect<T: FloatScalar>(w: &[T], x: &mut [T]) {
    let s = dot(w, x);
    axpy_neg(x, s + s, w);
}

/// Householder triangularization in place.
///
/// On return `a` holds `R`: the diagonal and above are the triangular
/// factor, everything below the diagonal is exactly zero. Each reflection
/// is applied implicitly as `R[j.., j..] -= 2 w (w^T R[j.., j..])`, for
/// `O(mn^2)` total work.
///
/// The returned vector has one entry per column: the unit reflection
/// vector `w_j` (length `m - j`), or `None` when the active sub-column was
/// exactly zero and the step was skipped. A skipped step leaves an exact
/// zero on the diagonal of `R`. Small but nonzero columns are always
/// reflected.
///
/// # Panics
///
/// If `a` has fewer rows than columns.
pub fn householder_in_place<T: FloatScalar>(
    a: &mut impl MatrixMut<T>,
) -> Vec<Option<DynVector<T>>> {
    let m = a.nrows();
    let n = a.ncols();
    assert!(m >= n, "QR decomposition requires nrows >= ncols");

    let mut reflectors = Vec::with_capacity(n);

    for j in 0..n {
        match make_reflector(a.col_as_slice(j, j)) {
            None => {
                log::trace!("Householder QR: skipping reflection at column {}", j);
                reflectors.push(None);
            }
            Some((w, r_jj)) => {
                for c in (j + 1)..n {
                    reflect(&w, a.col_as_mut_slice(c, j));
                }
                // The reflected column is known in closed form
                let col = a.col_as_mut_slice(j, j);
                col[0] = r_jj;
                for x in col[1..].iter_mut() {
                    *x = T::zero();
                }
                reflectors.push(Some(DynVector::from_vec(w)));
            }
        }
    }

    reflectors
}

/// Dense `m x m` reflector: the identity, with `I - 2ww^T` in the trailing
/// block starting at `offset`.
///
/// Only a reference for checking the implicit path; multiplying by it
/// costs `O(m^2)` per column instead of `O(m)`.
///
/// # Panics
///
/// If `offset + w.len() != m`.
pub fn reflector_matrix<T: FloatScalar>(w: &DynVector<T>, m: usize, offset: usize) -> DynMatrix<T> {
    assert_eq!(offset + w.len(), m, "reflector does not fit an {}x{} matrix", m, m);
    let two = T::one() + T::one();
    DynMatrix::from_fn(m, m, |i, j| {
        let id = if i == j { T::one() } else { T::zero() };
        if i >= offset && j >= offset {
            id - two * (w[i - offset] * w[j - offset])
        } else {
            id
        }
    })
}

/// Householder QR with every reflector materialized, returning full
/// `(Q, R)`.
///
/// Each step forms `H_j` densely and computes `R = H_j R`, `Q = Q H_j` by
/// full matrix products, for `O(n m^3)` work. Numerically equivalent to
/// [`HouseholderQr`]; kept as a correctness reference and benchmark
/// baseline.
pub fn householder_qr_dense<T: FloatScalar>(a: &DynMatrix<T>) -> (DynMatrix<T>, DynMatrix<T>) {
    let m = a.nrows();
    let n = a.ncols();
    assert!(m >= n, "QR decomposition requires nrows >= ncols");

    let mut r = a.clone();
    let mut q = DynMatrix::eye(m);
    for j in 0..n {
        if let Some((w, _)) = make_reflector(r.col_as_slice(j, j)) {
            let h = reflector_matrix(&DynVector::from_vec(w), m, j);
            r = h.matmul(&r);
            q = q.matmul(&h);
        }
    }
    (q, r)
}

/// QR decomposition by Householder reflections, `A = QR`, for `m >= n`.
///
/// Stores `R` (m x n) and the reflection vectors; `Q` is only formed on
/// request. Construction never fails: an exactly dependent column skips
/// its reflection and is reported by [`HouseholderQr::rank_deficient_column`],
/// and [`HouseholderQr::solve`] then returns [`LinalgError::RankDeficient`].
///
/// # Example
///
/// ```
/// use denselin::{DynMatrix, DynVector};
///
/// // Least-squares fit: y = c0 + c1*x to points (0,1), (1,2), (2,4)
/// let a = DynMatrix::from_rows(3, 2, &[1.0_f64, 0.0, 1.0, 1.0, 1.0, 2.0]);
/// let b = DynVector::from_slice(&[1.0, 2.0, 4.0]);
/// let x = a.householder_qr().solve(&b).unwrap();
/// assert!((x[0] - 5.0 / 6.0).abs() < 1e-10);
/// assert!((x[1] - 3.0 / 2.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct HouseholderQr<T> {
    r: DynMatrix<T>,
    reflectors: Vec<Option<DynVector<T>>>,
}

impl<T: FloatScalar> HouseholderQr<T> {
    /// Decompose `a`. The input is not modified.
    ///
    /// # Panics
    ///
    /// If `a` has fewer rows than columns.
    pub fn new(a: &DynMatrix<T>) -> Self {
        let mut r = a.clone();
        let reflectors = householder_in_place(&mut r);
        Self { r, reflectors }
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.r.nrows()
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.r.ncols()
    }

    /// First column whose reflection was skipped, if any.
    pub fn rank_deficient_column(&self) -> Option<usize> {
        self.reflectors.iter().position(Option::is_none)
    }

    /// The reflection vectors, one per column.
    pub fn reflectors(&self) -> &[Option<DynVector<T>>] {
        &self.reflectors
    }

    /// The full `m x n` right-triangular factor.
    #[inline]
    pub fn r(&self) -> &DynMatrix<T> {
        &self.r
    }

    /// The full `m x m` orthogonal factor.
    ///
    /// Accumulated by right-multiplying the identity with each reflection,
    /// `Q[:, j..] -= 2 (Q[:, j..] w) w^T`.
    pub fn q(&self) -> DynMatrix<T> {
        let m = self.nrows();
        let mut q = DynMatrix::eye(m);
        let mut qw = Vec::with_capacity(m);
        for (j, w) in self.reflectors.iter().enumerate() {
            let Some(w) = w else { continue };
            qw.clear();
            qw.resize(m, T::zero());
            for (k, &wk) in w.as_slice().iter().enumerate() {
                axpy_neg(&mut qw, -wk, q.col(j + k));
            }
            for (k, &wk) in w.as_slice().iter().enumerate() {
                axpy_neg(q.col_mut(j + k), wk + wk, &qw);
            }
        }
        q
    }

    /// Reduced factors `(Q̂, R̂)`: the first `n` columns of `Q` and the first
    /// `n` rows of `R`.
    pub fn reduced(&self) -> (DynMatrix<T>, UpperTriangular<T>) {
        let n = self.ncols();
        let q_hat = self.q().left_cols(n);
        let r_hat = UpperTriangular::new_unchecked(self.r.top_rows(n));
        (q_hat, r_hat)
    }

    fn apply_qt_slice(&self, x: &mut [T]) {
        for (j, w) in self.reflectors.iter().enumerate() {
            if let Some(w) = w {
                reflect(w.as_slice(), &mut x[j..]);
            }
        }
    }

    /// Compute `Q^T b` without forming `Q`.
    pub fn apply_qt(&self, b: &DynVector<T>) -> DynVector<T> {
        assert_eq!(b.len(), self.nrows(), "rhs length mismatch");
        let mut x = b.clone();
        self.apply_qt_slice(x.as_mut_slice());
        x
    }

    fn check_full_rank(&self) -> Result<(), LinalgError> {
        let column = self
            .rank_deficient_column()
            .or_else(|| (0..self.ncols()).find(|&i| self.r[(i, i)] == T::zero()));
        match column {
            Some(column) => {
                log::debug!("Householder QR: rank deficient at column {}", column);
                Err(LinalgError::RankDeficient { column })
            }
            None => Ok(()),
        }
    }

    fn solve_slice(&self, b: &[T]) -> Vec<T> {
        let mut y = b.to_vec();
        self.apply_qt_slice(&mut y);
        y.truncate(self.ncols());
        back_substitute(&self.r, &mut y);
        y
    }

    /// Least-squares solution of `min ||Ax - b||`, as `x = R̂^{-1} (Q̂^T b)`.
    ///
    /// Rows of `Q^T b` past `n` meet the zero block of `R` and are dropped.
    pub fn solve(&self, b: &DynVector<T>) -> Result<DynVector<T>, LinalgError> {
        assert_eq!(b.len(), self.nrows(), "rhs length mismatch");
        self.check_full_rank()?;
        Ok(DynVector::from_vec(self.solve_slice(b.as_slice())))
    }

    /// Least-squares solve for every column of `B`.
    pub fn solve_matrix(&self, b: &DynMatrix<T>) -> Result<DynMatrix<T>, LinalgError> {
        assert_eq!(b.nrows(), self.nrows(), "rhs row count mismatch");
        self.check_full_rank()?;
        let n = self.ncols();
        let mut x = DynMatrix::zeros(n, b.ncols());
        for j in 0..b.ncols() {
            let col = self.solve_slice(b.col(j));
            x.col_mut(j).copy_from_slice(&col);
        }
        Ok(x)
    }

    /// Determinant of a square input: each applied reflection has
    /// determinant -1.
    pub fn det(&self) -> T {
        assert_eq!(self.nrows(), self.ncols(), "determinant requires a square matrix");
        let applied = self.reflectors.iter().filter(|w| w.is_some()).count();
        let mut d = if applied % 2 == 0 { T::one() } else { -T::one() };
        for i in 0..self.ncols() {
            d = d * self.r[(i, i)];
        }
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    fn assert_mat_near(a: &DynMatrix<f64>, b: &DynMatrix<f64>, tol: f64, msg: &str) {
        assert_eq!((a.nrows(), a.ncols()), (b.nrows(), b.ncols()), "{}", msg);
        let diff = a.sub(b).max_abs();
        assert!(diff < tol, "{}: max diff {}", msg, diff);
    }

    fn textbook() -> DynMatrix<f64> {
        DynMatrix::<f64>::from_rows(
            3,
            3,
            &[12.0, -51.0, 4.0, 6.0, 167.0, -68.0, -4.0, 24.0, -41.0],
        )
    }

    #[test]
    fn square_3x3() {
        let a = textbook();
        let qr = HouseholderQr::new(&a);
        let q = qr.q();
        let r = qr.r();

        assert_mat_near(&q.matmul(r), &a, TOL, "QR");
        assert_mat_near(&q.tr_matmul(&q), &DynMatrix::eye(3), TOL, "QtQ");

        // x0 = 12 > 0, so R00 = -||x||
        assert!((r[(0, 0)] + 14.0).abs() < TOL);
        assert!((r[(1, 1)].abs() - 175.0).abs() < TOL);
        assert!((r[(2, 2)].abs() - 35.0).abs() < TOL);
    }

    #[test]
    fn below_diagonal_is_exactly_zero() {
        let a = DynMatrix::<f64>::from_rows(
            4,
            3,
            &[1.0, -1.0, 4.0, 1.0, 4.0, -2.0, 1.0, 4.0, 2.0, 1.0, -1.0, 0.0],
        );
        let qr = HouseholderQr::new(&a);
        assert!(qr.r().is_upper_triangular());
        for j in 0..3 {
            for i in (j + 1)..4 {
                assert_eq!(qr.r()[(i, j)], 0.0);
            }
        }
    }

    #[test]
    fn rectangular_full_and_reduced() {
        let a = DynMatrix::<f64>::from_rows(
            4,
            3,
            &[1.0, -1.0, 4.0, 1.0, 4.0, -2.0, 1.0, 4.0, 2.0, 1.0, -1.0, 0.0],
        );
        let qr = HouseholderQr::new(&a);

        let q = qr.q();
        assert_eq!((q.nrows(), q.ncols()), (4, 4));
        assert_mat_near(&q.tr_matmul(&q), &DynMatrix::eye(4), TOL, "full QtQ");
        assert_mat_near(&q.matmul(qr.r()), &a, TOL, "full QR");

        let (q_hat, r_hat) = qr.reduced();
        assert_eq!((q_hat.nrows(), q_hat.ncols()), (4, 3));
        assert_eq!(r_hat.dim(), 3);
        assert_mat_near(&q_hat.tr_matmul(&q_hat), &DynMatrix::eye(3), TOL, "thin QtQ");
        assert_mat_near(&q_hat.matmul(r_hat.as_matrix()), &a, TOL, "reduced QR");
    }

    #[test]
    fn zero_leading_entry_shifts_positive() {
        let a = DynMatrix::<f64>::from_rows(3, 1, &[0.0, 3.0, 4.0]);
        let qr = HouseholderQr::new(&a);
        assert!((qr.r()[(0, 0)] + 5.0).abs() < 1e-14);
        assert_mat_near(&qr.q().matmul(qr.r()), &a, 1e-13, "QR");
    }

    #[test]
    fn least_squares_residual_orthogonal() {
        let a = DynMatrix::<f64>::from_rows(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let b = DynVector::<f64>::from_slice(&[1.0, 2.0, 4.0]);
        let x = HouseholderQr::new(&a).solve(&b).unwrap();

        assert!((x[0] - 5.0 / 6.0).abs() < TOL);
        assert!((x[1] - 1.5).abs() < TOL);

        let r = b.sub(&a.matvec(&x));
        let atr = a.tr_matvec(&r);
        assert!(atr.max_abs() < TOL);
    }

    #[test]
    fn apply_qt_matches_explicit_q() {
        let a = textbook();
        let qr = HouseholderQr::new(&a);
        let b = DynVector::<f64>::from_slice(&[1.0, -2.0, 3.0]);
        let implicit = qr.apply_qt(&b);
        let explicit = qr.q().tr_matvec(&b);
        assert!(implicit.sub(&explicit).max_abs() < TOL);
    }

    #[test]
    fn implicit_matches_dense_reference() {
        let a = DynMatrix::from_fn(6, 4, |i, j| {
            1.0 / (i + j + 1) as f64 + if i == j { 1.0 } else { 0.0 }
        });
        let qr = HouseholderQr::new(&a);
        let (q_dense, r_dense) = householder_qr_dense(&a);
        assert_mat_near(&qr.q(), &q_dense, 1e-12, "Q");
        assert_mat_near(qr.r(), &r_dense, 1e-12, "R");
    }

    #[test]
    fn reflector_matrix_is_symmetric_orthogonal() {
        let w = DynVector::<f64>::from_slice(&[0.6, 0.8]);
        let h = reflector_matrix(&w, 3, 1);
        assert!(h.is_symmetric());
        assert_mat_near(&h.matmul(&h), &DynMatrix::eye(3), 1e-14, "HH");
        assert_eq!(h[(0, 0)], 1.0);
        assert_eq!(h[(0, 1)], 0.0);
    }

    #[test]
    fn exact_rank_deficiency() {
        let a = DynMatrix::<f64>::from_rows(3, 2, &[1.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
        let qr = HouseholderQr::new(&a);
        assert_eq!(qr.rank_deficient_column(), Some(1));
        assert_eq!(qr.r()[(1, 1)], 0.0);
        // the factorization itself still reproduces A
        assert_mat_near(&qr.q().matmul(qr.r()), &a, 1e-14, "QR");

        let b = DynVector::<f64>::from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(
            qr.solve(&b).unwrap_err(),
            LinalgError::RankDeficient { column: 1 }
        );
    }

    #[test]
    fn tiny_independent_column_is_kept() {
        let a = DynMatrix::<f64>::from_rows(3, 2, &[1.0, 0.0, 0.0, 1e-17, 0.0, 0.0]);
        let qr = HouseholderQr::new(&a);
        assert_eq!(qr.rank_deficient_column(), None);
        assert_eq!(qr.r()[(1, 1)], -1e-17);
        assert_eq!(qr.q().matmul(qr.r()), a);

        let b = DynVector::<f64>::from_slice(&[1.0, 1e-17, 0.0]);
        let x = qr.solve(&b).unwrap();
        assert_eq!(x.as_slice(), &[1.0, 1.0]);
    }

    #[test]
    fn column_below_square_root_of_min_positive() {
        // the plain sum of squares underflows to zero here
        let a = DynMatrix::<f64>::from_rows(3, 2, &[1.0, 0.0, 0.0, 1e-170, 0.0, 1e-170]);
        let qr = HouseholderQr::new(&a);
        assert_eq!(qr.rank_deficient_column(), None);
        let expected = 2.0_f64.sqrt() * 1e-170;
        assert!((qr.r()[(1, 1)].abs() - expected).abs() < 1e-184);
        assert_eq!(qr.r()[(2, 1)], 0.0);
    }

    #[test]
    fn zero_matrix_skips_every_column() {
        let qr = HouseholderQr::new(&DynMatrix::<f64>::zeros(3, 2));
        assert_eq!(qr.rank_deficient_column(), Some(0));
        assert!(qr.reflectors().iter().all(Option::is_none));
        assert_eq!(qr.q(), DynMatrix::eye(3));
    }

    #[test]
    fn det_matches_known_value() {
        let a = DynMatrix::<f64>::from_rows(3, 3, &[6.0, 1.0, 1.0, 4.0, -2.0, 5.0, 2.0, 8.0, 7.0]);
        let qr = HouseholderQr::new(&a);
        assert!((qr.det() - (-306.0)).abs() < 1e-9);
    }

    #[test]
    fn solve_matrix_square() {
        let a = DynMatrix::<f64>::from_rows(3, 3, &[2.0, 1.0, -1.0, -3.0, -1.0, 2.0, -2.0, 1.0, 2.0]);
        let x = HouseholderQr::new(&a).solve_matrix(&DynMatrix::eye(3)).unwrap();
        assert_mat_near(&a.matmul(&x), &DynMatrix::eye(3), TOL, "A * A^-1");
    }

    #[test]
    #[should_panic(expected = "nrows >= ncols")]
    fn wide_matrix_panics() {
        let _ = HouseholderQr::new(&DynMatrix::<f64>::zeros(2, 3));
    }
}
