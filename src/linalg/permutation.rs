use alloc::vec;
use alloc::vec::Vec;

use crate::dynmatrix::{DynMatrix, DynVector};
use crate::traits::Scalar;

/// Row permutation stored as an index array.
///
/// `indices[i] = k` means row `i` of `P * A` is row `k` of `A`. The dense
/// 0/1 matrix is never needed by the factorizations; [`Permutation::to_matrix`]
/// exists only for verification.
///
/// ```
/// use denselin::linalg::Permutation;
///
/// let mut p = Permutation::identity(3);
/// p.swap(0, 2);
/// assert_eq!(p.as_slice(), &[2, 1, 0]);
/// assert_eq!(p.apply(&[10.0, 20.0, 30.0]), vec![30.0, 20.0, 10.0]);
/// assert_eq!(p.swaps(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    indices: Vec<usize>,
    swaps: usize,
}

impl Permutation {
    /// The identity permutation on `n` elements.
    pub fn identity(n: usize) -> Self {
        Self {
            indices: (0..n).collect(),
            swaps: 0,
        }
    }

    /// Build from an explicit index array.
    ///
    /// Returns `None` unless `indices` is a bijection on `0..indices.len()`.
    pub fn from_indices(indices: Vec<usize>) -> Option<Self> {
        let n = indices.len();
        let mut seen = vec![false; n];
        for &k in &indices {
            if k >= n || seen[k] {
                return None;
            }
            seen[k] = true;
        }
        // parity from the cycle decomposition: a cycle of length c is c - 1 swaps
        let mut visited = vec![false; n];
        let mut swaps = 0;
        for start in 0..n {
            let mut len = 0;
            let mut i = start;
            while !visited[i] {
                visited[i] = true;
                i = indices[i];
                len += 1;
            }
            if len > 0 {
                swaps += len - 1;
            }
        }
        Some(Self { indices, swaps })
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The index array.
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    /// Compose with the transposition of positions `a` and `b`.
    pub fn swap(&mut self, a: usize, b: usize) {
        if a != b {
            self.indices.swap(a, b);
            self.swaps += 1;
        }
    }

    /// Number of transpositions recorded.
    #[inline]
    pub fn swaps(&self) -> usize {
        self.swaps
    }

    /// `true` when the permutation is even (determinant `+1`).
    #[inline]
    pub fn is_even(&self) -> bool {
        self.swaps % 2 == 0
    }

    pub fn is_identity(&self) -> bool {
        self.indices.iter().enumerate().all(|(i, &k)| i == k)
    }

    /// The inverse permutation: `p.inverse().apply(&p.apply(v)) == v`.
    pub fn inverse(&self) -> Self {
        let mut inv = vec![0; self.len()];
        for (i, &k) in self.indices.iter().enumerate() {
            inv[k] = i;
        }
        Self {
            indices: inv,
            swaps: self.swaps,
        }
    }

    /// Permute a slice: `out[i] = v[indices[i]]`.
    pub fn apply<T: Copy>(&self, v: &[T]) -> Vec<T> {
        assert_eq!(v.len(), self.len(), "permutation length mismatch");
        self.indices.iter().map(|&k| v[k]).collect()
    }

    /// Permute a vector, `P * v`.
    pub fn apply_vector<T: Scalar>(&self, v: &DynVector<T>) -> DynVector<T> {
        DynVector::from_vec(self.apply(v.as_slice()))
    }

    /// Permute the rows of a matrix, `P * A`.
    pub fn apply_rows<T: Scalar>(&self, a: &DynMatrix<T>) -> DynMatrix<T> {
        assert_eq!(a.nrows(), self.len(), "permutation length mismatch");
        DynMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[(self.indices[i], j)])
    }

    /// Dense 0/1 matrix of the permutation.
    pub fn to_matrix<T: Scalar>(&self) -> DynMatrix<T> {
        let n = self.len();
        let mut p = DynMatrix::zeros(n, n);
        for (i, &k) in self.indices.iter().enumerate() {
            p[(i, k)] = T::one();
        }
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity() {
        let p = Permutation::identity(4);
        assert!(p.is_identity());
        assert!(p.is_even());
        assert_eq!(p.apply(&[1, 2, 3, 4]), vec![1, 2, 3, 4]);
    }

    #[test]
    fn from_indices_validates() {
        assert!(Permutation::from_indices(vec![0, 0, 1]).is_none());
        assert!(Permutation::from_indices(vec![0, 3, 1]).is_none());

        let p = Permutation::from_indices(vec![1, 2, 0]).unwrap();
        // a 3-cycle is two transpositions
        assert_eq!(p.swaps(), 2);
        assert!(p.is_even());
    }

    #[test]
    fn inverse_undoes_apply() {
        let mut p = Permutation::identity(5);
        p.swap(0, 3);
        p.swap(1, 4);
        p.swap(3, 2);
        let v = [1.0, 2.0, 3.0, 4.0, 5.0];
        let back = p.inverse().apply(&p.apply(&v));
        assert_eq!(back, v.to_vec());
        assert_eq!(p.swaps(), 3);
        assert!(!p.is_even());
    }

    #[test]
    fn apply_rows_matches_dense_product() {
        let p = Permutation::from_indices(vec![2, 0, 1]).unwrap();
        let a = DynMatrix::<f64>::from_rows(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let dense: DynMatrix<f64> = p.to_matrix();
        assert_eq!(p.apply_rows(&a), dense.matmul(&a));
        assert_eq!(p.apply_rows(&a).row(0), vec![5.0, 6.0]);
    }

    #[test]
    fn apply_vector_reorders_entries() {
        let p = Permutation::from_indices(vec![2, 0, 1]).unwrap();
        let v = DynVector::<f64>::from_slice(&[10.0, 20.0, 30.0]);
        assert_eq!(p.apply_vector(&v).as_slice(), &[30.0, 10.0, 20.0]);
    }

    #[test]
    fn swap_same_index_is_not_recorded() {
        let mut p = Permutation::identity(3);
        p.swap(1, 1);
        assert_eq!(p.swaps(), 0);
    }
}
