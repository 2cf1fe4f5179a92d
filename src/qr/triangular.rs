//! Upper-Triangular Inversion
//!
//! For upper-triangular R, X = R⁻¹ is upper triangular and follows from
//! back substitution column by column:
//!
//!   x_jj = 1 / r_jj
//!   x_ij = −(Σ_{k=i+1..j} r_ik x_kj) / r_ii,   i = j−1, ..., 0
//!
//! This is the single place where a rank-deficient Householder factor
//! surfaces. A pivot with |r_ii| ≤ tol · max_j |r_jj| (or an exact zero)
//! fails with `SingularMatrix` instead of dividing through.

use super::fixed::FixedMatrix;
use crate::error::{KernelError, Result};
use ndarray::Array2;
use tracing::warn;

fn check_pivots<F>(n: usize, pivot: F, tolerance: f64) -> Result<()>
where
    F: Fn(usize) -> f64,
{
    let scale = (0..n).map(|i| pivot(i).abs()).fold(0.0, f64::max);

    for i in 0..n {
        let p = pivot(i);
        if p == 0.0 || !p.is_finite() || p.abs() <= tolerance * scale {
            warn!(index = i, pivot = p, scale, "Singular triangular factor");
            return Err(KernelError::SingularMatrix { index: i, pivot: p });
        }
    }
    Ok(())
}

fn smallest_pivot<F>(n: usize, pivot: F) -> (usize, f64)
where
    F: Fn(usize) -> f64,
{
    (0..n)
        .map(|i| (i, pivot(i)))
        .fold((0, f64::INFINITY), |acc, (i, p)| {
            if p.abs() < acc.1.abs() {
                (i, p)
            } else {
                acc
            }
        })
}

/// Invert an upper-triangular matrix
///
/// Entries below the diagonal are ignored.
///
/// # Errors
/// `InvalidShape` for non-square input, `SingularMatrix` for a zero or
/// relatively negligible pivot, or when the inverse overflows.
pub fn invert_upper_triangular(r: &Array2<f64>, tolerance: f64) -> Result<Array2<f64>> {
    let (n, m) = r.dim();
    if n != m {
        return Err(KernelError::invalid_shape(
            "square matrix",
            format!("{}x{} matrix", n, m),
        ));
    }
    check_pivots(n, |i| r[[i, i]], tolerance)?;

    let mut inv = Array2::<f64>::zeros((n, n));
    for j in 0..n {
        inv[[j, j]] = 1.0 / r[[j, j]];
        for i in (0..j).rev() {
            let mut sum = 0.0;
            for k in i + 1..=j {
                sum += r[[i, k]] * inv[[k, j]];
            }
            inv[[i, j]] = -sum / r[[i, i]];
        }
    }

    if inv.iter().any(|x| !x.is_finite()) {
        let (index, pivot) = smallest_pivot(n, |i| r[[i, i]]);
        return Err(KernelError::SingularMatrix { index, pivot });
    }
    Ok(inv)
}

impl<const D: usize> FixedMatrix<D> {
    /// Invert an upper-triangular matrix without leaving the stack
    ///
    /// Same contract as [`invert_upper_triangular`].
    pub fn invert_upper_triangular(&self, tolerance: f64) -> Result<Self> {
        check_pivots(D, |i| self.get(i, i), tolerance)?;

        let mut inv = Self::zeros();
        for j in 0..D {
            inv.set(j, j, 1.0 / self.get(j, j));
            for i in (0..j).rev() {
                let mut sum = 0.0;
                for k in i + 1..=j {
                    sum += self.get(i, k) * inv.get(k, j);
                }
                inv.set(i, j, -sum / self.get(i, i));
            }
        }

        if !inv.is_finite() {
            let (index, pivot) = smallest_pivot(D, |i| self.get(i, i));
            return Err(KernelError::SingularMatrix { index, pivot });
        }
        Ok(inv)
    }
}
