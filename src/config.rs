//! Numerical Tolerances
//!
//! The kernel has no files or environment to read; its only
//! configuration is the pair of thresholds that decide when a matrix is
//! too close to rank deficient to factorize.

/// Tolerances used by the QR routines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelConfig {
    /// Gram-Schmidt fails when a residual column norm falls below this
    pub degeneracy_epsilon: f64,
    /// Triangular inversion fails when |r_ii| <= tolerance · max |r_jj|
    pub singular_tolerance: f64,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            degeneracy_epsilon: 1e-12,
            singular_tolerance: 1e-12,
        }
    }
}

impl KernelConfig {
    /// Create configuration with default tolerances
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the Gram-Schmidt residual floor
    pub fn with_degeneracy_epsilon(self, degeneracy_epsilon: f64) -> Self {
        Self {
            degeneracy_epsilon,
            ..self
        }
    }

    /// Override the relative pivot tolerance for triangular inversion
    pub fn with_singular_tolerance(self, singular_tolerance: f64) -> Self {
        Self {
            singular_tolerance,
            ..self
        }
    }
}
