//! k-d Tree: Static Spatial Index over a Point Set
//!
//! The tree is built once by recursive median splitting: at depth ℓ the
//! points are partitioned on axis ℓ mod D with `select_nth_unstable`, the
//! median becomes the node and the halves become its subtrees. Every node
//! also records the bounding box of its subtree, which bounds both the
//! smallest and the largest distance a query can have to anything below
//! it. Construction is O(N log N); a nearest-neighbour query is
//! O(log N) expected.
//!
//! ## Exclusion
//!
//! Queries take an index predicate. Candidates it rejects are skipped but
//! their subtrees are still searched, so excluding a query point's own
//! index never hides a distinct point sitting at the same coordinates.
//!
//! ## Ties
//!
//! Among candidates at equal distance the lower point index wins. Subtrees
//! are pruned only when they are strictly worse than the current best,
//! so the winner does not depend on the tree layout.

use super::point_set::{squared_distance, PointSet};
use tracing::debug;

/// Result of a single-point query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Index of the matched point in the point set
    pub index: usize,
    /// Squared Euclidean distance to the query
    pub squared_distance: f64,
    /// Euclidean distance to the query
    pub distance: f64,
}

impl Neighbor {
    fn new(index: usize, squared_distance: f64) -> Self {
        Self {
            index,
            squared_distance,
            distance: squared_distance.sqrt(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Node {
    /// Point stored at this node
    index: usize,
    /// Split axis
    axis: usize,
    left: Option<usize>,
    right: Option<usize>,
}

/// Balanced k-d tree borrowing a [`PointSet`]
#[derive(Debug)]
pub struct KdTree<'a> {
    points: &'a PointSet,
    nodes: Vec<Node>,
    /// Subtree bounding boxes, `dimension` entries per node
    lower: Vec<f64>,
    upper: Vec<f64>,
    root: Option<usize>,
}

impl<'a> KdTree<'a> {
    /// Build the index over every point of the set
    pub fn build(points: &'a PointSet) -> Self {
        let n = points.len();
        let dim = points.dimension();

        let mut tree = Self {
            points,
            nodes: Vec::with_capacity(n),
            lower: Vec::with_capacity(n * dim),
            upper: Vec::with_capacity(n * dim),
            root: None,
        };

        let mut indices: Vec<usize> = (0..n).collect();
        tree.root = tree.build_recursive(&mut indices, 0);

        debug!(points = n, dimension = dim, "Built k-d tree");
        tree
    }

    fn build_recursive(&mut self, indices: &mut [usize], depth: usize) -> Option<usize> {
        if indices.is_empty() {
            return None;
        }

        let points = self.points;
        let dim = points.dimension();
        let axis = depth % dim;
        let mid = indices.len() / 2;

        // Partition around the median for this axis
        indices.select_nth_unstable_by(mid, |&a, &b| {
            points.point(a)[axis].total_cmp(&points.point(b)[axis])
        });

        let id = self.nodes.len();
        self.nodes.push(Node {
            index: indices[mid],
            axis,
            left: None,
            right: None,
        });

        // Bounding box of the whole subtree
        let first = points.point(indices[0]);
        let mut lo = first.to_vec();
        let mut hi = first.to_vec();
        for &i in indices[1..].iter() {
            for (d, &x) in points.point(i).iter().enumerate() {
                lo[d] = lo[d].min(x);
                hi[d] = hi[d].max(x);
            }
        }
        self.lower.extend_from_slice(&lo);
        self.upper.extend_from_slice(&hi);

        let (left, rest) = indices.split_at_mut(mid);
        let right = &mut rest[1..];

        let left = self.build_recursive(left, depth + 1);
        let right = self.build_recursive(right, depth + 1);
        self.nodes[id].left = left;
        self.nodes[id].right = right;

        Some(id)
    }

    /// The indexed point set
    pub fn points(&self) -> &'a PointSet {
        self.points
    }

    /// Number of indexed points
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the tree indexes no points
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn bounds(&self, node: usize) -> (&[f64], &[f64]) {
        let dim = self.points.dimension();
        let range = node * dim..(node + 1) * dim;
        (&self.lower[range.clone()], &self.upper[range])
    }

    /// Smallest squared distance from `query` to the node's bounding box
    fn min_box_distance(&self, node: usize, query: &[f64]) -> f64 {
        let (lo, hi) = self.bounds(node);
        query
            .iter()
            .zip(lo.iter().zip(hi))
            .map(|(&q, (&l, &h))| {
                let gap = if q < l {
                    l - q
                } else if q > h {
                    q - h
                } else {
                    0.0
                };
                gap * gap
            })
            .sum()
    }

    /// Largest squared distance from `query` to the node's bounding box
    fn max_box_distance(&self, node: usize, query: &[f64]) -> f64 {
        let (lo, hi) = self.bounds(node);
        query
            .iter()
            .zip(lo.iter().zip(hi))
            .map(|(&q, (&l, &h))| {
                let far = (q - l).abs().max((h - q).abs());
                far * far
            })
            .sum()
    }

    /// Nearest indexed point to `query` among those `exclude` does not reject
    ///
    /// Returns `None` when every point is excluded.
    ///
    /// # Panics
    /// If `query` does not have the tree's dimension.
    pub fn nearest<F>(&self, query: &[f64], exclude: F) -> Option<Neighbor>
    where
        F: Fn(usize) -> bool,
    {
        assert_eq!(query.len(), self.points.dimension(), "query dimension mismatch");

        let mut best = None;
        if let Some(root) = self.root {
            self.nearest_recursive(root, query, &exclude, &mut best);
        }
        best
    }

    /// Nearest neighbour of point `i`, excluding `i` itself
    pub fn nearest_excluding_self(&self, i: usize) -> Option<Neighbor> {
        self.nearest(self.points.point(i), |j| j == i)
    }

    fn nearest_recursive<F>(
        &self,
        node: usize,
        query: &[f64],
        exclude: &F,
        best: &mut Option<Neighbor>,
    ) where
        F: Fn(usize) -> bool,
    {
        if let Some(b) = *best {
            if self.min_box_distance(node, query) > b.squared_distance {
                return;
            }
        }

        let Node {
            index,
            axis,
            left,
            right,
        } = self.nodes[node];

        if !exclude(index) {
            let d = squared_distance(query, self.points.point(index));
            let better = match *best {
                None => true,
                Some(b) => d < b.squared_distance || (d == b.squared_distance && index < b.index),
            };
            if better {
                *best = Some(Neighbor::new(index, d));
            }
        }

        // Descend into the side containing the query first
        let (near, far) = if query[axis] < self.points.point(index)[axis] {
            (left, right)
        } else {
            (right, left)
        };
        for child in [near, far].into_iter().flatten() {
            self.nearest_recursive(child, query, exclude, best);
        }
    }

    /// Farthest indexed point from `query` among those `exclude` does not reject
    ///
    /// # Panics
    /// If `query` does not have the tree's dimension.
    pub fn farthest<F>(&self, query: &[f64], exclude: F) -> Option<Neighbor>
    where
        F: Fn(usize) -> bool,
    {
        assert_eq!(query.len(), self.points.dimension(), "query dimension mismatch");

        let mut best = None;
        if let Some(root) = self.root {
            self.farthest_recursive(root, query, &exclude, &mut best);
        }
        best
    }

    fn farthest_recursive<F>(
        &self,
        node: usize,
        query: &[f64],
        exclude: &F,
        best: &mut Option<Neighbor>,
    ) where
        F: Fn(usize) -> bool,
    {
        if let Some(b) = *best {
            if self.max_box_distance(node, query) < b.squared_distance {
                return;
            }
        }

        let Node {
            index,
            axis,
            left,
            right,
        } = self.nodes[node];

        if !exclude(index) {
            let d = squared_distance(query, self.points.point(index));
            let better = match *best {
                None => true,
                Some(b) => d > b.squared_distance || (d == b.squared_distance && index < b.index),
            };
            if better {
                *best = Some(Neighbor::new(index, d));
            }
        }

        // The far side is the more promising one here
        let (near, far) = if query[axis] < self.points.point(index)[axis] {
            (left, right)
        } else {
            (right, left)
        };
        for child in [far, near].into_iter().flatten() {
            self.farthest_recursive(child, query, exclude, best);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n: usize) -> PointSet {
        let points: Vec<Vec<f64>> = (0..n)
            .flat_map(|i| (0..n).map(move |j| vec![i as f64, j as f64]))
            .collect();
        PointSet::from_vectors(&points).unwrap()
    }

    #[test]
    fn test_nearest_matches_linear_scan() {
        let set = grid(7);
        let tree = KdTree::build(&set);
        assert_eq!(tree.len(), 49);

        let query = [2.3, 4.6];
        let found = tree.nearest(&query, |_| false).unwrap();
        assert_eq!(set.point(found.index), &[2.0, 5.0]);
        assert!((found.distance - (0.09f64 + 0.16).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_excluding_self_keeps_coincident_points() {
        let set = PointSet::from_vectors(&[[1.0, 1.0], [5.0, 5.0], [1.0, 1.0]]).unwrap();
        let tree = KdTree::build(&set);

        let n0 = tree.nearest_excluding_self(0).unwrap();
        assert_eq!(n0.index, 2);
        assert_eq!(n0.distance, 0.0);

        let n2 = tree.nearest_excluding_self(2).unwrap();
        assert_eq!(n2.index, 0);
    }

    #[test]
    fn test_ties_prefer_lower_index() {
        // 0 sits between 1 and 2 at equal distance
        let set = PointSet::from_vectors(&[[0.0], [1.0], [-1.0], [3.0]]).unwrap();
        let tree = KdTree::build(&set);
        assert_eq!(tree.nearest_excluding_self(0).unwrap().index, 1);
    }

    #[test]
    fn test_everything_excluded() {
        let set = PointSet::from_vectors(&[[0.0], [1.0]]).unwrap();
        let tree = KdTree::build(&set);
        assert!(tree.nearest(&[0.5], |_| true).is_none());
    }

    #[test]
    fn test_farthest() {
        let set = grid(5);
        let tree = KdTree::build(&set);
        let found = tree.farthest(&[0.0, 0.0], |_| false).unwrap();
        assert_eq!(set.point(found.index), &[4.0, 4.0]);
        assert_eq!(found.squared_distance, 32.0);
    }
}
