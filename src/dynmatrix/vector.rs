use alloc::vec;
use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use crate::traits::{FloatScalar, Scalar};

/// Dynamically-sized vector.
///
/// Used for right-hand sides and solutions. Single-index access `v[i]`.
///
/// # Examples
///
/// ```
/// use denselin::DynVector;
///
/// let v = DynVector::from_slice(&[1.0_f64, 2.0, 3.0]);
/// assert_eq!(v[0], 1.0);
/// assert_eq!(v.len(), 3);
/// assert!((v.dot(&v) - 14.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DynVector<T> {
    data: Vec<T>,
}

impl<T: Scalar> DynVector<T> {
    /// Create a vector from a flat slice.
    pub fn from_slice(data: &[T]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    /// Create a vector from an owned `Vec`.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    /// Create a zero vector of length `n`.
    pub fn zeros(n: usize) -> Self {
        Self {
            data: vec![T::zero(); n],
        }
    }

    /// Create a vector by calling `f(i)` for each element.
    pub fn from_fn(n: usize, f: impl FnMut(usize) -> T) -> Self {
        Self {
            data: (0..n).map(f).collect(),
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the vector is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Dot product.
    ///
    /// ```
    /// use denselin::DynVector;
    /// let a = DynVector::from_slice(&[1.0, 2.0, 3.0]);
    /// let b = DynVector::from_slice(&[4.0, 5.0, 6.0]);
    /// assert_eq!(a.dot(&b), 32.0);
    /// ```
    pub fn dot(&self, rhs: &Self) -> T {
        assert_eq!(self.len(), rhs.len(), "vector length mismatch");
        dot(&self.data, &rhs.data)
    }

    /// Element-wise difference `self - rhs`.
    pub fn sub(&self, rhs: &Self) -> Self {
        assert_eq!(self.len(), rhs.len(), "vector length mismatch");
        Self {
            data: self
                .data
                .iter()
                .zip(rhs.data.iter())
                .map(|(&a, &b)| a - b)
                .collect(),
        }
    }

    /// View the vector data as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// View the vector data as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T: FloatScalar> DynVector<T> {
    /// L2 (Euclidean) norm.
    ///
    /// ```
    /// use denselin::DynVector;
    /// let v = DynVector::from_slice(&[3.0_f64, 4.0]);
    /// assert!((v.norm() - 5.0).abs() < 1e-12);
    /// ```
    pub fn norm(&self) -> T {
        norm2(&self.data)
    }

    /// Largest absolute entry.
    pub fn max_abs(&self) -> T {
        self.data
            .iter()
            .fold(T::zero(), |acc, &x| if x.abs() > acc { x.abs() } else { acc })
    }
}

/// Plain dot product of two equal-length slices.
#[inline]
pub(crate) fn dot<T: Scalar>(a: &[T], b: &[T]) -> T {
    debug_assert_eq!(a.len(), b.len());
    let mut sum = T::zero();
    for (&x, &y) in a.iter().zip(b.iter()) {
        sum = sum + x * y;
    }
    sum
}

/// Euclidean norm of a slice, without scaling.
#[inline]
pub(crate) fn norm2<T: FloatScalar>(a: &[T]) -> T {
    dot(a, a).sqrt()
}

// ── Index ───────────────────────────────────────────────────────────

impl<T> Index<usize> for DynVector<T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

impl<T> IndexMut<usize> for DynVector<T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }
}

impl<T> From<Vec<T>> for DynVector<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slice() {
        let v = DynVector::<f64>::from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(v.len(), 3);
        assert_eq!(v[0], 1.0);
        assert_eq!(v[2], 3.0);
    }

    #[test]
    fn zeros_and_index_mut() {
        let mut v = DynVector::<f64>::zeros(3);
        v[1] = 42.0;
        assert_eq!(v.as_slice(), &[0.0, 42.0, 0.0]);
    }

    #[test]
    fn dot_and_norm() {
        let a = DynVector::<f64>::from_slice(&[1.0_f64, 2.0, 2.0]);
        assert_eq!(a.dot(&a), 9.0);
        assert!((a.norm() - 3.0).abs() < 1e-15);
        assert_eq!(a.max_abs(), 2.0);
    }

    #[test]
    fn sub() {
        let a = DynVector::<f64>::from_slice(&[5.0, 7.0]);
        let b = DynVector::<f64>::from_slice(&[1.0, 2.0]);
        assert_eq!(a.sub(&b).as_slice(), &[4.0, 5.0]);
    }

    #[test]
    #[should_panic(expected = "vector length mismatch")]
    fn dot_length_mismatch() {
        let a = DynVector::<f64>::from_slice(&[1.0, 2.0]);
        let b = DynVector::<f64>::from_slice(&[1.0]);
        let _ = a.dot(&b);
    }
}
