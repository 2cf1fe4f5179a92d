//! QR Dispatcher: One Entry Point for Both Algorithms and Both Regimes
//!
//! `qr_decompose(&a, method)` selects the algorithm at run time through
//! [`QrMethod`] and the storage regime at compile time through the type of
//! `a`: an `Array2<f64>` goes through the heap-allocated path, a
//! `FixedMatrix<D>` through the stack-allocated one.

use super::fixed::{FixedMatrix, FixedVector};
use super::gram_schmidt::{gram_schmidt, gram_schmidt_fixed};
use super::householder::{householder, householder_fixed};
use crate::config::KernelConfig;
use crate::error::{KernelError, Result};
use ndarray::{Array1, Array2};
use tracing::debug;

/// Factorization algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QrMethod {
    /// Modified Gram-Schmidt; R is returned as its diagonal only
    GramSchmidtDiagonal,
    /// Householder reflections; full R
    HouseholderFull,
}

/// The triangular factor, in full or as its diagonal
#[derive(Debug, Clone, PartialEq)]
pub enum RFactor<M, V> {
    /// Full upper-triangular R
    Full(M),
    /// Diagonal of R only
    Diagonal(V),
}

/// Q and R of a square matrix
#[derive(Debug, Clone, PartialEq)]
pub struct QrDecomposition<M, V> {
    /// Orthogonal factor
    pub q: M,
    /// Triangular factor
    pub r: RFactor<M, V>,
}

impl<M, V> QrDecomposition<M, V> {
    /// Full R, when the method produced one
    pub fn r_full(&self) -> Option<&M> {
        match &self.r {
            RFactor::Full(r) => Some(r),
            RFactor::Diagonal(_) => None,
        }
    }
}

impl QrDecomposition<Array2<f64>, Array1<f64>> {
    /// Diagonal of R, whichever method produced it
    pub fn r_diagonal(&self) -> Array1<f64> {
        match &self.r {
            RFactor::Full(r) => r.diag().to_owned(),
            RFactor::Diagonal(d) => d.clone(),
        }
    }
}

impl<const D: usize> QrDecomposition<FixedMatrix<D>, FixedVector<D>> {
    /// Diagonal of R, whichever method produced it
    pub fn r_diagonal(&self) -> FixedVector<D> {
        match &self.r {
            RFactor::Full(r) => r.diagonal(),
            RFactor::Diagonal(d) => *d,
        }
    }
}

/// Square matrices the kernel can factorize
pub trait QrDecompose {
    /// Matrix type of Q and of a full R
    type Matrix;
    /// Vector type of a diagonal-only R
    type Vector;

    /// Factorize with the given method and tolerances
    fn qr_with(
        &self,
        method: QrMethod,
        config: &KernelConfig,
    ) -> Result<QrDecomposition<Self::Matrix, Self::Vector>>;
}

impl QrDecompose for Array2<f64> {
    type Matrix = Array2<f64>;
    type Vector = Array1<f64>;

    fn qr_with(
        &self,
        method: QrMethod,
        config: &KernelConfig,
    ) -> Result<QrDecomposition<Array2<f64>, Array1<f64>>> {
        debug!(?method, dimension = self.nrows(), "QR decomposition (dynamic)");
        match method {
            QrMethod::GramSchmidtDiagonal => {
                let (q, d) = gram_schmidt(self, config.degeneracy_epsilon)?;
                Ok(QrDecomposition {
                    q,
                    r: RFactor::Diagonal(d),
                })
            }
            QrMethod::HouseholderFull => {
                let (q, r) = householder(self, config)?;
                Ok(QrDecomposition {
                    q,
                    r: RFactor::Full(r),
                })
            }
        }
    }
}

impl<const D: usize> QrDecompose for FixedMatrix<D> {
    type Matrix = FixedMatrix<D>;
    type Vector = FixedVector<D>;

    fn qr_with(
        &self,
        method: QrMethod,
        config: &KernelConfig,
    ) -> Result<QrDecomposition<FixedMatrix<D>, FixedVector<D>>> {
        debug!(?method, dimension = D, "QR decomposition (fixed)");
        match method {
            QrMethod::GramSchmidtDiagonal => {
                let (q, d) = gram_schmidt_fixed(self, config.degeneracy_epsilon)?;
                Ok(QrDecomposition {
                    q,
                    r: RFactor::Diagonal(d),
                })
            }
            QrMethod::HouseholderFull => {
                let (q, r) = householder_fixed(self, config)?;
                Ok(QrDecomposition {
                    q,
                    r: RFactor::Full(r),
                })
            }
        }
    }
}

/// Factorize `a` with default tolerances
pub fn qr_decompose<A>(a: &A, method: QrMethod) -> Result<QrDecomposition<A::Matrix, A::Vector>>
where
    A: QrDecompose + ?Sized,
{
    a.qr_with(method, &KernelConfig::default())
}

/// Factorize `a` with explicit tolerances
pub fn qr_decompose_with<A>(
    a: &A,
    method: QrMethod,
    config: &KernelConfig,
) -> Result<QrDecomposition<A::Matrix, A::Vector>>
where
    A: QrDecompose + ?Sized,
{
    a.qr_with(method, config)
}

/// Validate a dynamic input: non-empty, square, finite. Returns its size.
pub(crate) fn check_square(a: &Array2<f64>) -> Result<usize> {
    let (n, m) = a.dim();
    if n != m || n == 0 {
        return Err(KernelError::invalid_shape(
            "non-empty square matrix",
            format!("{}x{} matrix", n, m),
        ));
    }
    if let Some(((r, c), _)) = a.indexed_iter().find(|(_, x)| !x.is_finite()) {
        return Err(KernelError::NonFinite {
            context: format!("matrix entry ({}, {})", r, c),
        });
    }
    Ok(n)
}

/// ‖QᵗQ − I‖_F
pub fn orthogonality_error(q: &Array2<f64>) -> f64 {
    let gram = q.t().dot(q) - Array2::<f64>::eye(q.ncols());
    gram.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// ‖Q·R − A‖_F
pub fn reconstruction_error(a: &Array2<f64>, q: &Array2<f64>, r: &Array2<f64>) -> f64 {
    let residual = q.dot(r) - a;
    residual.iter().map(|x| x * x).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_dispatch_dynamic() {
        let a = array![[2.0, -1.0], [1.0, 3.0]];

        let hh = qr_decompose(&a, QrMethod::HouseholderFull).unwrap();
        let r = hh.r_full().unwrap();
        assert!(orthogonality_error(&hh.q) < 1e-12);
        assert!(reconstruction_error(&a, &hh.q, r) < 1e-12);

        let gs = qr_decompose(&a, QrMethod::GramSchmidtDiagonal).unwrap();
        assert!(gs.r_full().is_none());

        // Both diagonals agree in magnitude
        for (x, y) in hh.r_diagonal().iter().zip(gs.r_diagonal().iter()) {
            assert!((x.abs() - y.abs()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_dispatch_fixed() {
        let a = FixedMatrix::from_rows([[1.0, 0.5, 0.0], [0.0, 2.0, 1.0], [1.0, 0.0, 3.0]]);
        let hh = qr_decompose(&a, QrMethod::HouseholderFull).unwrap();
        let r = hh.r_full().unwrap().to_array2();
        assert!(reconstruction_error(&a.to_array2(), &hh.q.to_array2(), &r) < 1e-12);

        let gs = qr_decompose(&a, QrMethod::GramSchmidtDiagonal).unwrap();
        let d = gs.r_diagonal();
        for k in 0..3 {
            assert!((d[k].abs() - hh.r_diagonal()[k].abs()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_shape_errors() {
        let rect = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        assert!(matches!(
            qr_decompose(&rect, QrMethod::HouseholderFull),
            Err(KernelError::InvalidShape { .. })
        ));

        let empty = Array2::<f64>::zeros((0, 0));
        assert!(qr_decompose(&empty, QrMethod::GramSchmidtDiagonal).is_err());

        let nan = array![[1.0, f64::NAN], [0.0, 1.0]];
        assert!(matches!(
            qr_decompose(&nan, QrMethod::HouseholderFull),
            Err(KernelError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_custom_tolerance() {
        // Nearly parallel columns pass the default floor but not a strict one
        let a = array![[1.0, 1.0], [0.0, 1e-9]];
        assert!(qr_decompose(&a, QrMethod::GramSchmidtDiagonal).is_ok());

        let strict = KernelConfig::default().with_degeneracy_epsilon(1e-6);
        let err = qr_decompose_with(&a, QrMethod::GramSchmidtDiagonal, &strict).unwrap_err();
        assert!(matches!(err, KernelError::DegenerateMatrix { column: 1, .. }));
    }
}
