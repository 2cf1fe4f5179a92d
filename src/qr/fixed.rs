//! Stack-allocated square matrices for factorization hot loops.
//!
//! Tangent-space orthogonalization factorizes a D×D Jacobian at every
//! step of an orbit, with D rarely above 10. These types keep the whole
//! factorization on the stack and let the compiler unroll over `D`.

use crate::error::{KernelError, Result};
use ndarray::{Array1, Array2};
use std::ops::{Index, IndexMut};

/// Largest absolute value, 0.0 for an empty sequence
#[inline]
pub(crate) fn max_abs(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0, |m, x| m.max(x.abs()))
}

/// Euclidean norm with the entries scaled by their largest magnitude
/// before squaring, so squares of entries above ~1e154 do not overflow
#[inline]
pub(crate) fn euclidean_norm<I>(values: I) -> f64
where
    I: Iterator<Item = f64> + Clone,
{
    let scale = max_abs(values.clone());
    if scale == 0.0 || !scale.is_finite() {
        return scale;
    }
    let sum: f64 = values.map(|x| (x / scale) * (x / scale)).sum();
    scale * sum.sqrt()
}

/// Stack-allocated vector of dimension `D`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedVector<const D: usize> {
    pub data: [f64; D],
}

/// Stack-allocated D×D matrix stored in column-major order
///
/// `cols[c][r]` = element at row r, column c
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedMatrix<const D: usize> {
    pub cols: [[f64; D]; D],
}

impl<const D: usize> FixedVector<D> {
    /// Zero vector
    #[inline(always)]
    pub fn zeros() -> Self {
        Self { data: [0.0; D] }
    }

    /// Wrap an array
    #[inline(always)]
    pub fn new(data: [f64; D]) -> Self {
        Self { data }
    }

    /// Inner product
    #[inline(always)]
    pub fn dot(&self, other: &Self) -> f64 {
        let mut sum = 0.0;
        for i in 0..D {
            sum += self.data[i] * other.data[i];
        }
        sum
    }

    /// Euclidean norm, finite for every finite vector whose norm is
    /// representable
    #[inline(always)]
    pub fn norm(&self) -> f64 {
        euclidean_norm(self.data.iter().copied())
    }

    /// Largest absolute entry
    #[inline(always)]
    pub fn max_abs(&self) -> f64 {
        max_abs(self.data.iter().copied())
    }

    /// `self * s`
    #[inline(always)]
    pub fn scale(&self, s: f64) -> Self {
        let mut out = *self;
        for x in out.data.iter_mut() {
            *x *= s;
        }
        out
    }

    /// `self - s * other`
    #[inline(always)]
    pub fn sub_scaled(&self, other: &Self, s: f64) -> Self {
        let mut out = *self;
        for i in 0..D {
            out.data[i] -= s * other.data[i];
        }
        out
    }

    /// Copy into a heap-allocated `Array1`
    pub fn to_array1(&self) -> Array1<f64> {
        Array1::from(self.data.to_vec())
    }
}

impl<const D: usize> Index<usize> for FixedVector<D> {
    type Output = f64;

    #[inline(always)]
    fn index(&self, i: usize) -> &f64 {
        &self.data[i]
    }
}

impl<const D: usize> IndexMut<usize> for FixedVector<D> {
    #[inline(always)]
    fn index_mut(&mut self, i: usize) -> &mut f64 {
        &mut self.data[i]
    }
}

impl<const D: usize> FixedMatrix<D> {
    /// Zero matrix
    #[inline(always)]
    pub fn zeros() -> Self {
        Self {
            cols: [[0.0; D]; D],
        }
    }

    /// Identity matrix
    #[inline(always)]
    pub fn identity() -> Self {
        let mut m = Self::zeros();
        for i in 0..D {
            m.cols[i][i] = 1.0;
        }
        m
    }

    /// Build from row-major literals, `rows[r][c]`
    pub fn from_rows(rows: [[f64; D]; D]) -> Self {
        let mut m = Self::zeros();
        for (r, row) in rows.iter().enumerate() {
            for (c, &x) in row.iter().enumerate() {
                m.cols[c][r] = x;
            }
        }
        m
    }

    /// Build from column arrays, `cols[c][r]`
    pub fn from_columns(cols: [[f64; D]; D]) -> Self {
        Self { cols }
    }

    /// Copy out of a dynamic matrix of matching shape
    pub fn from_array2(a: &Array2<f64>) -> Result<Self> {
        if a.dim() != (D, D) {
            return Err(KernelError::invalid_shape(
                format!("{}x{} matrix", D, D),
                format!("{}x{} matrix", a.nrows(), a.ncols()),
            ));
        }
        let mut m = Self::zeros();
        for ((r, c), &x) in a.indexed_iter() {
            m.cols[c][r] = x;
        }
        Ok(m)
    }

    /// Copy into a heap-allocated `Array2`
    pub fn to_array2(&self) -> Array2<f64> {
        Array2::from_shape_fn((D, D), |(r, c)| self.cols[c][r])
    }

    /// Element at `(row, col)`
    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cols[col][row]
    }

    /// Overwrite the element at `(row, col)`
    #[inline(always)]
    pub fn set(&mut self, row: usize, col: usize, val: f64) {
        self.cols[col][row] = val;
    }

    /// Column `c` as a vector
    #[inline(always)]
    pub fn column(&self, c: usize) -> FixedVector<D> {
        FixedVector::new(self.cols[c])
    }

    /// Overwrite column `c`
    #[inline(always)]
    pub fn set_column(&mut self, c: usize, v: &FixedVector<D>) {
        self.cols[c] = v.data;
    }

    /// Main diagonal
    pub fn diagonal(&self) -> FixedVector<D> {
        let mut d = FixedVector::zeros();
        for i in 0..D {
            d.data[i] = self.cols[i][i];
        }
        d
    }

    /// `self * v`
    #[inline(always)]
    pub fn mul_vec(&self, v: &FixedVector<D>) -> FixedVector<D> {
        let mut result = FixedVector::zeros();
        for k in 0..D {
            let vk = v.data[k];
            for i in 0..D {
                result.data[i] += self.cols[k][i] * vk;
            }
        }
        result
    }

    /// `self * other`
    #[inline(always)]
    pub fn matmul(&self, other: &Self) -> Self {
        let mut out = Self::zeros();
        for c in 0..D {
            out.set_column(c, &self.mul_vec(&other.column(c)));
        }
        out
    }

    /// Transpose
    #[inline(always)]
    pub fn transpose(&self) -> Self {
        let mut out = Self::zeros();
        for c in 0..D {
            for r in 0..D {
                out.cols[r][c] = self.cols[c][r];
            }
        }
        out
    }

    /// True when no entry is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.cols.iter().flatten().all(|x| x.is_finite())
    }
}

impl<const D: usize> Index<(usize, usize)> for FixedMatrix<D> {
    type Output = f64;

    #[inline(always)]
    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.cols[col][row]
    }
}

impl<const D: usize> IndexMut<(usize, usize)> for FixedMatrix<D> {
    #[inline(always)]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.cols[col][row]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_layout() {
        let m = FixedMatrix::from_rows([[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(m.get(0, 1), 2.0);
        assert_eq!(m[(1, 0)], 3.0);
        assert_eq!(m.column(1).data, [2.0, 4.0]);
        assert_eq!(m.to_array2(), array![[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(FixedMatrix::<2>::from_array2(&m.to_array2()).unwrap(), m);
    }

    #[test]
    fn test_products() {
        let a = FixedMatrix::from_rows([[1.0, 2.0], [3.0, 4.0]]);
        let v = FixedVector::new([1.0, -1.0]);
        assert_eq!(a.mul_vec(&v).data, [-1.0, -1.0]);
        assert_eq!(a.matmul(&FixedMatrix::identity()), a);
        assert_eq!(a.transpose().get(0, 1), 3.0);
        assert_eq!(a.diagonal().data, [1.0, 4.0]);
    }

    #[test]
    fn test_norm_of_huge_entries() {
        assert_eq!(FixedVector::new([3.0, 4.0]).norm(), 5.0);
        assert_eq!(FixedVector::<3>::zeros().norm(), 0.0);

        let v = FixedVector::new([1e200, -1e200]);
        assert!(v.dot(&v).is_infinite());
        assert!((v.norm() / (2.0f64.sqrt() * 1e200) - 1.0).abs() < 1e-15);
        assert_eq!(v.max_abs(), 1e200);
    }

    #[test]
    fn test_shape_mismatch() {
        let a = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        assert!(FixedMatrix::<2>::from_array2(&a).is_err());
    }
}
