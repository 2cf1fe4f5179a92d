//! Property-based tests for the spatial search and QR factorization.
//!
//! The k-d tree search is checked against the exhaustive search, and the
//! factorizations against the defining identities A = Q·R and QᵗQ = I.

use chaos_kernel::{
    gram_schmidt,
    householder,
    householder_fixed,
    max_pairwise_distance,
    max_pairwise_distance_brute,
    min_pairwise_distance,
    min_pairwise_distance_brute,
    orthogonality_error,
    reconstruction_error,
    FixedMatrix,
    KernelConfig,
    PointSet,
};
use ndarray::Array2;
use proptest::prelude::*;

/// Point lists on a coarse integer grid, so duplicates and ties are common.
fn arb_grid_points() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (1usize..=4).prop_flat_map(|dim| {
        proptest::collection::vec(
            proptest::collection::vec((-4i32..=4).prop_map(f64::from), dim),
            2..60,
        )
    })
}

/// Point lists with continuous coordinates.
fn arb_points() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (1usize..=5).prop_flat_map(|dim| {
        proptest::collection::vec(proptest::collection::vec(-100.0f64..100.0, dim), 2..120)
    })
}

/// Diagonally dominant, hence well-conditioned, square matrices.
fn arb_well_conditioned() -> impl Strategy<Value = Array2<f64>> {
    (1usize..=7).prop_flat_map(|n| {
        proptest::collection::vec(-1.0f64..1.0, n * n).prop_map(move |data| {
            let mut a = Array2::from_shape_vec((n, n), data).unwrap();
            for i in 0..n {
                a[[i, i]] += if a[[i, i]] >= 0.0 { n as f64 } else { -(n as f64) };
            }
            a
        })
    })
}

fn arb_fixed3() -> impl Strategy<Value = [[f64; 3]; 3]> {
    proptest::array::uniform3(proptest::array::uniform3(-1.0f64..1.0)).prop_map(|mut rows| {
        for (i, row) in rows.iter_mut().enumerate() {
            row[i] += 3.0 * row[i].signum();
        }
        rows
    })
}

fn brute_min_squared(points: &[Vec<f64>]) -> f64 {
    let mut best = f64::INFINITY;
    for i in 0..points.len() {
        for j in i + 1..points.len() {
            let d: f64 = points[i]
                .iter()
                .zip(&points[j])
                .map(|(a, b)| (a - b) * (a - b))
                .sum();
            best = best.min(d);
        }
    }
    best
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 200,
        ..ProptestConfig::default()
    })]

    // ─────────────────────────────────────────────────────────────────────
    // Closest / farthest pair
    // ─────────────────────────────────────────────────────────────────────

    /// No pair of distinct points is strictly closer than the reported one.
    #[test]
    fn closest_pair_is_minimal(points in arb_points()) {
        let result = min_pairwise_distance(&points).unwrap();
        let (i, j) = result.pair;

        prop_assert_ne!(i, j);
        prop_assert!(i < points.len() && j < points.len());
        prop_assert!(result.distance.powi(2) <= brute_min_squared(&points) * (1.0 + 1e-12));
    }

    /// With ties and duplicates the tree reports the same pair as the
    /// exhaustive search.
    #[test]
    fn closest_pair_matches_exhaustive(points in arb_grid_points()) {
        let tree = min_pairwise_distance(&points).unwrap();
        let brute = min_pairwise_distance_brute(&points).unwrap();
        prop_assert_eq!(tree, brute);
    }

    #[test]
    fn farthest_pair_matches_exhaustive(points in arb_grid_points()) {
        let tree = max_pairwise_distance(&points).unwrap();
        let brute = max_pairwise_distance_brute(&points).unwrap();
        prop_assert_eq!(tree, brute);
    }

    /// Duplicated points always produce an exact zero distance.
    #[test]
    fn duplicates_give_zero(mut points in arb_points(), pick in any::<prop::sample::Index>()) {
        let dup = points[pick.index(points.len())].clone();
        points.push(dup);
        let result = min_pairwise_distance(&points).unwrap();
        prop_assert_eq!(result.distance, 0.0);
    }

    /// Matrix (columns) and list forms give the same answer.
    #[test]
    fn matrix_and_list_forms_agree(points in arb_points()) {
        let set = PointSet::from_vectors(&points).unwrap();
        prop_assume!(set.dimension() <= set.len());
        let columns = set.to_columns();
        prop_assert_eq!(
            min_pairwise_distance(&columns).unwrap(),
            min_pairwise_distance(&points).unwrap()
        );
    }

    // ─────────────────────────────────────────────────────────────────────
    // QR
    // ─────────────────────────────────────────────────────────────────────

    /// Q orthogonal, R exactly upper triangular, Q·R = A.
    #[test]
    fn householder_factors_are_valid(a in arb_well_conditioned()) {
        let (q, r) = householder(&a, &KernelConfig::default()).unwrap();
        let n = a.nrows();

        prop_assert!(orthogonality_error(&q) < 1e-10);
        prop_assert!(reconstruction_error(&a, &q, &r) < 1e-10);
        for i in 0..n {
            for j in 0..i {
                prop_assert_eq!(r[[i, j]], 0.0);
            }
        }
    }

    /// Re-factorizing Q·R gives the same factors up to a sign per column
    /// of Q (and the matching row of R).
    #[test]
    fn householder_refactorization_is_stable(a in arb_well_conditioned()) {
        let config = KernelConfig::default();
        let (q, r) = householder(&a, &config).unwrap();
        let (q2, r2) = householder(&q.dot(&r), &config).unwrap();
        let n = a.nrows();

        for k in 0..n {
            let s = q.column(k).dot(&q2.column(k)).signum();
            for i in 0..n {
                prop_assert!((q2[[i, k]] - s * q[[i, k]]).abs() < 1e-9);
                prop_assert!((r2[[k, i]] - s * r[[k, i]]).abs() < 1e-9);
            }
        }
    }

    /// The stack-allocated path agrees with the dynamic one.
    #[test]
    fn fixed_and_dynamic_householder_agree(rows in arb_fixed3()) {
        let fixed = FixedMatrix::from_rows(rows);
        let config = KernelConfig::default();
        let (qf, rf) = householder_fixed(&fixed, &config).unwrap();
        let (qd, rd) = householder(&fixed.to_array2(), &config).unwrap();

        for i in 0..3 {
            for j in 0..3 {
                prop_assert!((qf.get(i, j) - qd[[i, j]]).abs() < 1e-12);
                prop_assert!((rf.get(i, j) - rd[[i, j]]).abs() < 1e-12);
            }
        }
    }

    /// Gram-Schmidt on an orthonormal matrix returns it with unit diagonal.
    #[test]
    fn gram_schmidt_on_orthonormal_input(a in arb_well_conditioned()) {
        let (q, _) = householder(&a, &KernelConfig::default()).unwrap();
        let (q2, d) = gram_schmidt(&q, 1e-12).unwrap();

        for k in 0..q.ncols() {
            prop_assert!((d[k] - 1.0).abs() < 1e-10);
            for i in 0..q.nrows() {
                prop_assert!((q2[[i, k]] - q[[i, k]]).abs() < 1e-10);
            }
        }
    }

    /// |diag R| from both algorithms coincide.
    #[test]
    fn algorithms_agree_on_diagonal_magnitudes(a in arb_well_conditioned()) {
        let (_, r) = householder(&a, &KernelConfig::default()).unwrap();
        let (_, d) = gram_schmidt(&a, 1e-12).unwrap();

        for k in 0..a.nrows() {
            prop_assert!((r[[k, k]].abs() - d[k].abs()).abs() < 1e-9);
        }
    }
}
