use crate::dynmatrix::{DynMatrix, DynVector};
use crate::linalg::{Cholesky, HouseholderQr, LinalgError, Plu};
use crate::traits::FloatScalar;

/// What the caller knows about `A` beyond its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatrixStructure {
    #[default]
    General,
    /// Symmetric positive definite; square inputs take the Cholesky path.
    SymmetricPositiveDefinite,
}

/// Factorization used to produce a [`Solution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveMethod {
    Cholesky,
    Plu,
    HouseholderQr,
}

/// Options for [`solve()`] and [`solve_many()`].
///
/// ```
/// use denselin::linalg::{MatrixStructure, SolveMethod, SolveOptions};
///
/// let opts = SolveOptions::default().with_structure(MatrixStructure::SymmetricPositiveDefinite);
/// assert_eq!(opts.method, None);
///
/// let forced = SolveOptions::default().with_method(SolveMethod::HouseholderQr);
/// assert_eq!(forced.method, Some(SolveMethod::HouseholderQr));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolveOptions {
    pub structure: MatrixStructure,
    /// Overrides the shape-based choice when set.
    pub method: Option<SolveMethod>,
}

impl SolveOptions {
    pub fn with_structure(mut self, structure: MatrixStructure) -> Self {
        self.structure = structure;
        self
    }

    pub fn with_method(mut self, method: SolveMethod) -> Self {
        self.method = Some(method);
        self
    }
}

/// Result of a solve, with the method used and `||A x - b||_2`.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<T, X = DynVector<T>> {
    pub x: X,
    pub method: SolveMethod,
    pub residual_norm: T,
}

fn select_method<T: FloatScalar>(
    a: &DynMatrix<T>,
    options: &SolveOptions,
) -> Result<SolveMethod, LinalgError> {
    let (m, n) = (a.nrows(), a.ncols());
    if m < n {
        log::debug!("solve: {}x{} system is underdetermined", m, n);
        return Err(LinalgError::Underdetermined { nrows: m, ncols: n });
    }

    let method = match (options.method, options.structure) {
        (Some(method), _) => {
            if method != SolveMethod::HouseholderQr {
                assert!(a.is_square(), "{:?} requires a square matrix", method);
            }
            method
        }
        (None, MatrixStructure::SymmetricPositiveDefinite) if m == n => SolveMethod::Cholesky,
        (None, _) if m == n => SolveMethod::Plu,
        (None, _) => SolveMethod::HouseholderQr,
    };
    log::debug!("solve: {}x{} system using {:?}", m, n, method);
    Ok(method)
}

/// Solve `Ax = b`, or the least-squares problem `min ||Ax - b||_2` when
/// `A` has more rows than columns.
///
/// Square inputs use Cholesky when flagged
/// [`MatrixStructure::SymmetricPositiveDefinite`] and PLU otherwise;
/// tall inputs use Householder QR. A forced method replaces this choice.
/// Failures of the chosen factorization are returned unchanged.
///
/// # Panics
///
/// If `b` does not have `a.nrows()` entries, or a forced PLU/Cholesky is
/// given a non-square matrix.
///
/// ```
/// use denselin::{DynMatrix, DynVector};
/// use denselin::linalg::{solve, SolveMethod, SolveOptions};
///
/// let a = DynMatrix::from_rows(2, 2, &[2.0_f64, 1.0, 1.0, 3.0]);
/// let b = DynVector::from_slice(&[3.0, 5.0]);
/// let sol = solve(&a, &b, &SolveOptions::default()).unwrap();
/// assert_eq!(sol.method, SolveMethod::Plu);
/// assert!((sol.x[0] - 0.8).abs() < 1e-12);
/// assert!((sol.x[1] - 1.4).abs() < 1e-12);
/// assert!(sol.residual_norm < 1e-12);
/// ```
pub fn solve<T: FloatScalar>(
    a: &DynMatrix<T>,
    b: &DynVector<T>,
    options: &SolveOptions,
) -> Result<Solution<T>, LinalgError> {
    assert_eq!(b.len(), a.nrows(), "rhs length mismatch");
    let method = select_method(a, options)?;
    let x = match method {
        SolveMethod::Cholesky => Cholesky::new(a)?.solve(b),
        SolveMethod::Plu => Plu::new(a)?.solve(b),
        SolveMethod::HouseholderQr => HouseholderQr::new(a).solve(b)?,
    };
    let residual_norm = a.matvec(&x).sub(b).norm();
    Ok(Solution {
        x,
        method,
        residual_norm,
    })
}

/// [`solve()`] for every column of `B`, factoring `A` once.
///
/// The residual is the Frobenius norm of `AX - B`.
pub fn solve_many<T: FloatScalar>(
    a: &DynMatrix<T>,
    b: &DynMatrix<T>,
    options: &SolveOptions,
) -> Result<Solution<T, DynMatrix<T>>, LinalgError> {
    assert_eq!(b.nrows(), a.nrows(), "rhs row count mismatch");
    let method = select_method(a, options)?;
    let x = match method {
        SolveMethod::Cholesky => Cholesky::new(a)?.solve_matrix(b),
        SolveMethod::Plu => Plu::new(a)?.solve_matrix(b),
        SolveMethod::HouseholderQr => HouseholderQr::new(a).solve_matrix(b)?,
    };
    let residual_norm = a.matmul(&x).sub(b).frobenius_norm();
    Ok(Solution {
        x,
        method,
        residual_norm,
    })
}
