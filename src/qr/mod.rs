//! QR Module: Orthogonal-Triangular Factorization of Square Matrices
//!
//! Factorizes A = Q·R with Q orthogonal and R upper triangular. The main
//! consumer is tangent-space orthogonalization: along an orbit x(t) the
//! Jacobian J(x(t)) (supplied by the caller) is applied to the current
//! orthonormal frame and re-factorized, and the logarithms of the
//! diagonal of R accumulate into Lyapunov exponent estimates.
//!
//! ## Two Algorithms
//!
//! - `gram_schmidt.rs`: Modified Gram-Schmidt. Produces Q and only the
//!   diagonal of R. Cheap; fails on (near) dependent columns.
//!
//! - `householder.rs`: Householder reflections. Produces Q and the full
//!   R, exactly zero below the diagonal. Numerically preferred.
//!
//! ## Two Storage Regimes
//!
//! Each algorithm exists for `ndarray::Array2<f64>` (any size) and for the
//! stack-allocated `FixedMatrix<D>` (size fixed at compile time, no heap
//! traffic in per-step loops). Both regimes give the same factors up to
//! rounding.

mod fixed;
mod triangular;
mod gram_schmidt;
mod householder;
mod decompose;

pub use fixed::{FixedMatrix, FixedVector};
pub use triangular::invert_upper_triangular;
pub use gram_schmidt::{gram_schmidt, gram_schmidt_fixed};
pub use householder::{householder, householder_fixed, reflection_sign};
pub use decompose::{
    QrMethod,
    RFactor,
    QrDecomposition,
    QrDecompose,
    qr_decompose,
    qr_decompose_with,
    orthogonality_error,
    reconstruction_error,
};
