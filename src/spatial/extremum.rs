//! Pairwise Extremum Search
//!
//! Closest and farthest pair of distinct points in a point cloud:
//!
//!   d_min = min_{i≠j} ‖xᵢ − xⱼ‖,   d_max = max_{i≠j} ‖xᵢ − xⱼ‖
//!
//! A k-d tree is built once per call and every point is queried for its
//! nearest (farthest) neighbour other than itself. The running extremum
//! is replaced only on a strict improvement, so among tied pairs the one
//! discovered first in point order is reported. The tree lives for the
//! duration of the call.

use super::kdtree::KdTree;
use super::point_set::{PointCloud, PointSet};
use crate::error::{KernelError, Result};
use tracing::debug;

/// A pair of distinct point indices and the distance between them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairDistance {
    /// 0-based indices (query point, matched point)
    pub pair: (usize, usize),
    /// Euclidean distance between the two points
    pub distance: f64,
}

fn ensure_pairs(set: &PointSet) -> Result<()> {
    if set.len() < 2 {
        return Err(KernelError::InsufficientPoints { found: set.len() });
    }
    Ok(())
}

/// Closest pair of distinct points
///
/// Accepts a D×N matrix of columns, a list of vectors or fixed arrays, or
/// a [`PointSet`]. Coincident points are distinct points at distance
/// exactly 0.0.
///
/// # Errors
/// `InsufficientPoints` for fewer than two points; `InvalidShape` when a
/// matrix has more rows than columns or a list is ragged.
pub fn min_pairwise_distance<P>(points: &P) -> Result<PairDistance>
where
    P: PointCloud + ?Sized,
{
    let set = points.to_point_set()?;
    ensure_pairs(&set)?;

    let tree = KdTree::build(&set);
    let mut best: Option<(usize, usize, f64)> = None;

    for i in 0..set.len() {
        let Some(found) = tree.nearest_excluding_self(i) else {
            continue;
        };
        if best.map_or(true, |(_, _, d)| found.squared_distance < d) {
            best = Some((i, found.index, found.squared_distance));
            if found.squared_distance == 0.0 {
                break;
            }
        }
    }

    let (i, j, d) = best.ok_or(KernelError::InsufficientPoints { found: set.len() })?;
    let result = PairDistance {
        pair: (i, j),
        distance: d.sqrt(),
    };
    debug!(i, j, distance = result.distance, n = set.len(), "Closest pair");
    Ok(result)
}

/// Farthest pair of distinct points
///
/// Same inputs, errors and tie rule as [`min_pairwise_distance`].
pub fn max_pairwise_distance<P>(points: &P) -> Result<PairDistance>
where
    P: PointCloud + ?Sized,
{
    let set = points.to_point_set()?;
    ensure_pairs(&set)?;

    let tree = KdTree::build(&set);
    let mut best: Option<(usize, usize, f64)> = None;

    for (i, p) in set.iter().enumerate() {
        let Some(found) = tree.farthest(p, |j| j == i) else {
            continue;
        };
        if best.map_or(true, |(_, _, d)| found.squared_distance > d) {
            best = Some((i, found.index, found.squared_distance));
        }
    }

    let (i, j, d) = best.ok_or(KernelError::InsufficientPoints { found: set.len() })?;
    let result = PairDistance {
        pair: (i, j),
        distance: d.sqrt(),
    };
    debug!(i, j, distance = result.distance, n = set.len(), "Farthest pair");
    Ok(result)
}

/// Closest pair by exhaustive O(N²) comparison
///
/// Reference for small point sets; reports the same pair as
/// [`min_pairwise_distance`].
pub fn min_pairwise_distance_brute<P>(points: &P) -> Result<PairDistance>
where
    P: PointCloud + ?Sized,
{
    brute_force(points, |d, best| d < best)
}

/// Farthest pair by exhaustive O(N²) comparison
pub fn max_pairwise_distance_brute<P>(points: &P) -> Result<PairDistance>
where
    P: PointCloud + ?Sized,
{
    brute_force(points, |d, best| d > best)
}

fn brute_force<P, F>(points: &P, improves: F) -> Result<PairDistance>
where
    P: PointCloud + ?Sized,
    F: Fn(f64, f64) -> bool,
{
    let set = points.to_point_set()?;
    ensure_pairs(&set)?;

    let n = set.len();
    let mut best = (0, 1, set.squared_distance(0, 1));

    for i in 0..n {
        for j in i + 1..n {
            let d = set.squared_distance(i, j);
            if improves(d, best.2) {
                best = (i, j, d);
            }
        }
    }

    Ok(PairDistance {
        pair: (best.0, best.1),
        distance: best.2.sqrt(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_matrix_scenario() {
        // Points as columns: (0,0), (0,0), (1,1)
        let m = array![[0.0, 0.0, 1.0], [0.0, 0.0, 1.0]];
        let result = min_pairwise_distance(&m).unwrap();
        assert_eq!(result.pair, (0, 1));
        assert_eq!(result.distance, 0.0);
    }

    #[test]
    fn test_one_dimensional_duplicates() {
        let points = vec![vec![0.7], vec![0.7]];
        let result = min_pairwise_distance(&points).unwrap();
        assert_eq!(result.distance, 0.0);
        assert_eq!(result.pair, (0, 1));
    }

    #[test]
    fn test_insufficient_points() {
        let err = min_pairwise_distance(&[[1.0, 2.0]]).unwrap_err();
        assert_eq!(err, KernelError::InsufficientPoints { found: 1 });

        let empty: Vec<Vec<f64>> = Vec::new();
        assert_eq!(
            max_pairwise_distance(&empty).unwrap_err(),
            KernelError::InsufficientPoints { found: 0 }
        );

        let empty: Vec<[f64; 2]> = Vec::new();
        assert_eq!(
            min_pairwise_distance(&empty).unwrap_err(),
            KernelError::InsufficientPoints { found: 0 }
        );
        assert_eq!(
            min_pairwise_distance(&[[0.5f64; 3]; 1]).unwrap_err(),
            KernelError::InsufficientPoints { found: 1 }
        );
    }

    #[test]
    fn test_tall_matrix_rejected() {
        let m = array![[0.0, 1.0], [0.0, 1.0], [0.0, 1.0]];
        assert!(matches!(
            min_pairwise_distance(&m),
            Err(KernelError::InvalidShape { .. })
        ));
    }

    #[test]
    fn test_first_discovered_tie() {
        // Pairs (0,1) and (2,3) are both at distance 1
        let points = [[0.0, 0.0], [1.0, 0.0], [10.0, 0.0], [11.0, 0.0]];
        let result = min_pairwise_distance(&points).unwrap();
        assert_eq!(result.pair, (0, 1));
        assert_eq!(result.distance, 1.0);
        assert_eq!(min_pairwise_distance_brute(&points).unwrap(), result);
    }

    #[test]
    fn test_farthest_pair() {
        let points = [[0.0, 0.0], [1.0, 1.0], [-2.0, 0.5], [3.0, -1.0]];
        let result = max_pairwise_distance(&points).unwrap();
        assert_eq!(result.pair, (2, 3));
        assert!((result.distance - (25.0f64 + 2.25).sqrt()).abs() < 1e-12);
        assert_eq!(max_pairwise_distance_brute(&points).unwrap(), result);
    }

    #[test]
    fn test_named_point_set() {
        let set = PointSet::from_vectors(&[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.5, 0.0]])
            .unwrap()
            .with_name("orbit");
        let result = min_pairwise_distance(&set).unwrap();
        assert_eq!(result.pair, (0, 2));
        assert_eq!(result.distance, 0.5);
    }
}
