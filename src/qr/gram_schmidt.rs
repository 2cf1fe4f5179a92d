//! Modified Gram-Schmidt: Q and the Diagonal of R
//!
//! Column k of A is orthogonalized against the finished basis vectors
//! e₁, ..., e_{k−1} one at a time, each projection taken from the running
//! residual (the modified variant), then normalized:
//!
//!   u ← a_k;  u ← u − ⟨u, e_j⟩ e_j  for j < k;  e_k = u / ‖u‖
//!
//! Only the diagonal r_kk = ⟨a_k, e_k⟩ of R is formed. That is all a
//! Lyapunov growth-rate estimate needs: λ_k ≈ (1/T) Σ_t ln |r_kk(t)|.
//!
//! A residual norm below the configured epsilon means column k lies in the
//! span of the previous columns; the routine fails with `DegenerateMatrix`
//! rather than dividing by it.

use super::decompose::check_square;
use super::fixed::{euclidean_norm, FixedMatrix, FixedVector};
use crate::error::{KernelError, Result};
use ndarray::{Array1, Array2};
use tracing::warn;

fn degenerate(column: usize, norm: f64) -> KernelError {
    warn!(column, norm, "Gram-Schmidt residual collapsed");
    KernelError::DegenerateMatrix { column, norm }
}

fn check_norm(column: usize, norm: f64, epsilon: f64) -> Result<()> {
    // A NaN norm fails here too
    if !(norm >= epsilon) {
        return Err(degenerate(column, norm));
    }
    if norm.is_infinite() {
        return Err(KernelError::NonFinite {
            context: format!("Gram-Schmidt residual norm of column {}", column),
        });
    }
    Ok(())
}

/// Gram-Schmidt on a stack-allocated D×D matrix
///
/// Returns Q (orthonormal columns) and the diagonal of R.
///
/// # Errors
/// `DegenerateMatrix` when a residual norm is below `epsilon`;
/// `InvalidShape` for D = 0; `NonFinite` for NaN/Inf entries or a
/// residual norm beyond the `f64` range.
pub fn gram_schmidt_fixed<const D: usize>(
    a: &FixedMatrix<D>,
    epsilon: f64,
) -> Result<(FixedMatrix<D>, FixedVector<D>)> {
    if D == 0 {
        return Err(KernelError::invalid_shape("matrix of size >= 1", "0x0 matrix"));
    }
    if !a.is_finite() {
        return Err(KernelError::NonFinite {
            context: "Gram-Schmidt input".to_string(),
        });
    }

    let mut q = FixedMatrix::<D>::zeros();
    let mut r = FixedVector::<D>::zeros();

    for k in 0..D {
        let original = a.column(k);
        let mut residual = original;
        for j in 0..k {
            let e = q.column(j);
            let projection = residual.dot(&e);
            residual = residual.sub_scaled(&e, projection);
        }

        let norm = residual.norm();
        check_norm(k, norm, epsilon)?;

        let e = residual.scale(1.0 / norm);
        r[k] = original.dot(&e);
        q.set_column(k, &e);
    }

    Ok((q, r))
}

/// Gram-Schmidt on a dynamically sized square matrix
///
/// Same algorithm and errors as [`gram_schmidt_fixed`].
pub fn gram_schmidt(a: &Array2<f64>, epsilon: f64) -> Result<(Array2<f64>, Array1<f64>)> {
    let n = check_square(a)?;

    let mut q = Array2::<f64>::zeros((n, n));
    let mut r = Array1::<f64>::zeros(n);

    for k in 0..n {
        let original = a.column(k);
        let mut residual = original.to_owned();
        for j in 0..k {
            let e = q.column(j);
            let projection = residual.dot(&e);
            residual.scaled_add(-projection, &e);
        }

        let norm = euclidean_norm(residual.iter().copied());
        check_norm(k, norm, epsilon)?;

        residual /= norm;
        r[k] = original.dot(&residual);
        q.column_mut(k).assign(&residual);
    }

    Ok((q, r))
}
