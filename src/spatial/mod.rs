//! Spatial Module: Point Sets and Pairwise Extremum Search
//!
//! Geometry on finite point clouds sampled from a dynamical system, e.g.
//! the states x(t₀), ..., x(t_N) of an orbit:
//! - Point set container with uniform iteration and per-dimension extrema
//! - Balanced k-d tree for nearest/farthest neighbour queries
//! - Closest and farthest pair of distinct points
//!
//! ## Accepted Inputs
//!
//! Searches take any [`PointCloud`]: a D×N `Array2<f64>` with one point
//! per column (D ≤ N enforced), a list of `Vec<f64>` or `[f64; D]`, or a
//! named [`PointSet`] (used as is, without copying).

mod point_set;
mod kdtree;
mod extremum;

pub use point_set::{PointSet, PointCloud, squared_distance};
pub use kdtree::{KdTree, Neighbor};
pub use extremum::{
    PairDistance,
    min_pairwise_distance,
    max_pairwise_distance,
    min_pairwise_distance_brute,
    max_pairwise_distance_brute,
};
