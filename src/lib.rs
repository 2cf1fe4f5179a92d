//! # chaos-kernel
//!
//! Numerical kernels for the analysis of discrete dynamical systems
//!
//!   x_{n+1} = f(x_n),   x ∈ ℝ^D
//!
//! ## Components
//!
//! 1. **Spatial Extremum Search**: closest (and farthest) pair of distinct
//!    points in a point cloud, e.g. the closest return of an orbit, via a
//!    k-d tree built once per call.
//!
//! 2. **QR Factorizer**: A = Q·R for square matrices by modified
//!    Gram-Schmidt (Q and diag R) or by Householder reflections (Q and full
//!    R), on heap-allocated `ndarray` matrices or stack-allocated
//!    `FixedMatrix<D>`.
//!
//! ## Tangent-Space Orthogonalization
//!
//! Lyapunov exponents follow from repeatedly re-orthogonalizing the frame
//! Y_{n+1} = J(x_n)·Q_n, where J is the Jacobian of f:
//!
//!   Q_{n+1} R_{n+1} = J(x_n) Q_n,   λ_k ≈ (1/N) Σ_n ln |R_{n+1}[k, k]|
//!
//! The kernel provides the factorization; the orbit and the Jacobian come
//! from the caller as plain functions (see `src/bin/henon_lyapunov.rs`).
//!
//! ## Errors and Logging
//!
//! Every operation returns [`Result`] with a [`KernelError`]; failures are
//! never masked as NaN or Inf. Diagnostics go through `tracing`; the
//! library never installs a subscriber.

pub mod error;
pub mod config;
pub mod spatial;
pub mod qr;

pub use error::{KernelError, Result};
pub use config::KernelConfig;

// Re-exports from spatial
pub use spatial::{
    PointSet,
    PointCloud,
    KdTree,
    Neighbor,
    PairDistance,
    min_pairwise_distance,
    max_pairwise_distance,
    min_pairwise_distance_brute,
    max_pairwise_distance_brute,
};

// Re-exports from qr
pub use qr::{
    // Storage
    FixedMatrix,
    FixedVector,
    // Algorithms
    gram_schmidt,
    gram_schmidt_fixed,
    householder,
    householder_fixed,
    invert_upper_triangular,
    // Dispatch
    QrMethod,
    RFactor,
    QrDecomposition,
    QrDecompose,
    qr_decompose,
    qr_decompose_with,
    orthogonality_error,
    reconstruction_error,
};
