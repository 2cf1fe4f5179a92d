//! Householder QR: Full Q and R
//!
//! For i = 0, ..., D−2 the working matrix R (initially a copy of A) is
//! multiplied by the elementary reflector
//!
//!   T = I − (2/w) v vᵗ,   v = R[i.., i] + σ √(Σ R[i.., i]²) e_i,   w = ‖v‖²
//!
//! which zeroes column i below the diagonal. Entries of v above i are zero,
//! so T acts as the identity on the rows and columns already finished.
//!
//! ## Reflection Sign
//!
//! σ = +1 if R[0, i] ≥ 0 else −1: the sign of the top entry of the current
//! column, not of the pivot R[i, i]. Results are reproducible against
//! existing tangent-space computations only with this choice.
//!
//! ## Recovering Q
//!
//! Reflectors are not accumulated. After the last stage every entry of R
//! below the diagonal is set to exactly 0.0 and Q = A·R⁻¹, which follows
//! from A = Q·R. A singular R fails with `SingularMatrix`.

use super::decompose::check_square;
use super::fixed::{euclidean_norm, max_abs, FixedMatrix, FixedVector};
use super::triangular::invert_upper_triangular;
use crate::config::KernelConfig;
use crate::error::{KernelError, Result};
use ndarray::{s, Array1, Array2, Axis};
use tracing::trace;

/// Reflection direction: +1 for x ≥ 0 (including +0 and −0), −1 otherwise
#[inline(always)]
pub fn reflection_sign(x: f64) -> f64 {
    if x >= 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// T depends only on the direction of v, so v is divided by its largest
/// entry before w is formed
fn check_scale(stage: usize, scale: f64) -> Result<f64> {
    if !scale.is_finite() {
        return Err(KernelError::NonFinite {
            context: format!("Householder vector at stage {}", stage),
        });
    }
    Ok(scale)
}

/// Householder QR of a dynamically sized square matrix
///
/// Returns `(Q, R)` with R exactly zero below the diagonal.
///
/// # Errors
/// `InvalidShape` for empty or non-square input, `NonFinite` for NaN/Inf
/// entries or a reflector beyond the `f64` range, `SingularMatrix` when R
/// cannot be inverted.
pub fn householder(a: &Array2<f64>, config: &KernelConfig) -> Result<(Array2<f64>, Array2<f64>)> {
    let n = check_square(a)?;

    let mut r = a.to_owned();
    let mut v = Array1::<f64>::zeros(n);
    let identity = Array2::<f64>::eye(n);

    for i in 0..n - 1 {
        v.fill(0.0);
        v.slice_mut(s![i..]).assign(&r.slice(s![i.., i]));

        v[i] += reflection_sign(r[[0, i]]) * euclidean_norm(v.iter().copied());
        let scale = check_scale(i, max_abs(v.iter().copied()))?;
        if scale == 0.0 {
            trace!(stage = i, "Zero column tail, reflection skipped");
            continue;
        }
        v /= scale;
        let w = v.dot(&v);

        let column = v.view().insert_axis(Axis(1));
        let t = &identity - &(column.dot(&column.t()) * (2.0 / w));

        // R ← T·R, one column at a time
        for mut col in r.columns_mut() {
            let reflected = t.dot(&col);
            col.assign(&reflected);
        }
        trace!(stage = i, pivot = r[[i, i]], "Applied Householder reflection");
    }

    for ((row, col), x) in r.indexed_iter_mut() {
        if row > col {
            *x = 0.0;
        }
    }

    let r_inv = invert_upper_triangular(&r, config.singular_tolerance)?;
    let q = a.dot(&r_inv);
    Ok((q, r))
}

/// Householder QR of a stack-allocated D×D matrix
///
/// Allocation-free counterpart of [`householder`]; same results and errors.
pub fn householder_fixed<const D: usize>(
    a: &FixedMatrix<D>,
    config: &KernelConfig,
) -> Result<(FixedMatrix<D>, FixedMatrix<D>)> {
    if D == 0 {
        return Err(KernelError::invalid_shape("matrix of size >= 1", "0x0 matrix"));
    }
    if !a.is_finite() {
        return Err(KernelError::NonFinite {
            context: "Householder input".to_string(),
        });
    }

    let mut r = *a;

    for i in 0..D - 1 {
        let mut v = FixedVector::<D>::zeros();
        for k in i..D {
            v[k] = r.get(k, i);
        }

        v[i] += reflection_sign(r.get(0, i)) * v.norm();
        let scale = check_scale(i, v.max_abs())?;
        if scale == 0.0 {
            trace!(stage = i, "Zero column tail, reflection skipped");
            continue;
        }
        for k in i..D {
            v[k] /= scale;
        }
        let w = v.dot(&v);

        let mut t = FixedMatrix::<D>::identity();
        let factor = 2.0 / w;
        for c in 0..D {
            for row in 0..D {
                t[(row, c)] -= factor * v[row] * v[c];
            }
        }

        for c in 0..D {
            let reflected = t.mul_vec(&r.column(c));
            r.set_column(c, &reflected);
        }
        trace!(stage = i, pivot = r.get(i, i), "Applied Householder reflection");
    }

    for c in 0..D {
        for row in c + 1..D {
            r.set(row, c, 0.0);
        }
    }

    let r_inv = r.invert_upper_triangular(config.singular_tolerance)?;
    let q = a.matmul(&r_inv);
    Ok((q, r))
}
