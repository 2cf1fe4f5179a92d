//! Point Sets: Contiguous Storage for Point Clouds
//!
//! A point cloud X = {x₁, ..., x_N} ⊂ ℝ^D is stored point-major in a
//! single buffer, so point i occupies `data[i·D .. (i+1)·D]`. The
//! dimension is fixed at construction and every coordinate is finite.
//!
//! Callers hand point clouds to the kernel in whatever shape they already
//! hold them: a D×N matrix of columns, a list of vectors, a list of fixed
//! arrays, or a named [`PointSet`]. The [`PointCloud`] trait adapts each
//! of these into a `PointSet`, borrowing when no conversion is needed.

use crate::error::{KernelError, Result};
use ndarray::Array2;
use std::borrow::Cow;
use std::ops::Index;

/// Ordered, optionally named collection of same-dimensional points
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    /// Optional label (e.g. the orbit or observable it came from)
    name: Option<String>,
    /// Dimension D of every point
    dimension: usize,
    /// Coordinates, point-major
    data: Vec<f64>,
}

impl PointSet {
    /// Create from a flat point-major buffer
    pub fn from_flat(dimension: usize, data: Vec<f64>) -> Result<Self> {
        if dimension == 0 {
            return Err(KernelError::invalid_shape(
                "points of dimension >= 1",
                "dimension 0",
            ));
        }
        if data.len() % dimension != 0 {
            return Err(KernelError::invalid_shape(
                format!("a multiple of {} coordinates", dimension),
                format!("{} coordinates", data.len()),
            ));
        }
        if let Some(pos) = data.iter().position(|x| !x.is_finite()) {
            return Err(KernelError::NonFinite {
                context: format!("point {} coordinate {}", pos / dimension, pos % dimension),
            });
        }

        Ok(Self {
            name: None,
            dimension,
            data,
        })
    }

    /// Create from a D×N matrix whose columns are the points
    ///
    /// The dimension must not exceed the number of points. A wider-than-tall
    /// requirement catches matrices passed with points as rows instead of
    /// transposing them silently.
    pub fn from_columns(matrix: &Array2<f64>) -> Result<Self> {
        let (dimension, n) = matrix.dim();
        if dimension > n {
            return Err(KernelError::invalid_shape(
                "dimension (rows) <= number of points (columns)",
                format!("{} rows x {} columns", dimension, n),
            ));
        }

        let data: Vec<f64> = matrix.t().iter().copied().collect();
        Self::from_flat(dimension, data)
    }

    /// Create from an N×D matrix whose rows are the points
    pub fn from_rows(matrix: &Array2<f64>) -> Result<Self> {
        let dimension = matrix.ncols();
        let data: Vec<f64> = matrix.iter().copied().collect();
        Self::from_flat(dimension, data)
    }

    /// Create from a list of equally long vectors
    pub fn from_vectors<V: AsRef<[f64]>>(points: &[V]) -> Result<Self> {
        let dimension = points.first().map_or(0, |p| p.as_ref().len());
        let mut data = Vec::with_capacity(points.len() * dimension);

        for (i, p) in points.iter().enumerate() {
            let p = p.as_ref();
            if p.len() != dimension {
                return Err(KernelError::invalid_shape(
                    format!("every point of dimension {}", dimension),
                    format!("point {} of dimension {}", i, p.len()),
                ));
            }
            data.extend_from_slice(p);
        }

        Self::from_flat(dimension, data)
    }

    /// Create from fixed-size arrays; the dimension comes from the type,
    /// so an empty slice gives an empty set of dimension `D`
    pub fn from_arrays<const D: usize>(points: &[[f64; D]]) -> Result<Self> {
        Self::from_flat(D, points.iter().flatten().copied().collect())
    }

    /// Attach a name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name, if one was attached
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Number of points N
    pub fn len(&self) -> usize {
        self.data.len() / self.dimension
    }

    /// True when the set holds no points
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Dimension D
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Coordinates of point i
    ///
    /// # Panics
    /// If `i >= self.len()`.
    #[inline]
    pub fn point(&self, i: usize) -> &[f64] {
        &self.data[i * self.dimension..(i + 1) * self.dimension]
    }

    /// Iterate over points in order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.dimension)
    }

    /// Flat point-major coordinates
    pub fn as_flat(&self) -> &[f64] {
        &self.data
    }

    /// Squared Euclidean distance between points i and j
    #[inline]
    pub fn squared_distance(&self, i: usize, j: usize) -> f64 {
        squared_distance(self.point(i), self.point(j))
    }

    /// Per-dimension minimum over all points (empty set → empty vector)
    pub fn minima(&self) -> Vec<f64> {
        self.fold_extrema(f64::min)
    }

    /// Per-dimension maximum over all points (empty set → empty vector)
    pub fn maxima(&self) -> Vec<f64> {
        self.fold_extrema(f64::max)
    }

    fn fold_extrema(&self, pick: fn(f64, f64) -> f64) -> Vec<f64> {
        let mut points = self.iter();
        let Some(first) = points.next() else {
            return Vec::new();
        };

        let mut acc = first.to_vec();
        for p in points {
            for (a, &x) in acc.iter_mut().zip(p) {
                *a = pick(*a, x);
            }
        }
        acc
    }

    /// Back to a D×N matrix of columns
    pub fn to_columns(&self) -> Array2<f64> {
        let n = self.len();
        Array2::from_shape_fn((self.dimension, n), |(d, i)| self.data[i * self.dimension + d])
    }
}

impl Index<usize> for PointSet {
    type Output = [f64];

    fn index(&self, i: usize) -> &[f64] {
        self.point(i)
    }
}

/// Squared Euclidean distance between two coordinate slices
///
/// Coincident points give exactly 0.0: every difference is an exact zero.
#[inline]
pub fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let diff = x - y;
            diff * diff
        })
        .sum()
}

/// Anything that can be viewed as a [`PointSet`]
pub trait PointCloud {
    /// Validate and adapt into a point set, borrowing where possible
    fn to_point_set(&self) -> Result<Cow<'_, PointSet>>;
}

impl PointCloud for PointSet {
    fn to_point_set(&self) -> Result<Cow<'_, PointSet>> {
        Ok(Cow::Borrowed(self))
    }
}

/// Matrix form: D rows × N columns, one point per column
impl PointCloud for Array2<f64> {
    fn to_point_set(&self) -> Result<Cow<'_, PointSet>> {
        PointSet::from_columns(self).map(Cow::Owned)
    }
}

impl PointCloud for [Vec<f64>] {
    fn to_point_set(&self) -> Result<Cow<'_, PointSet>> {
        // No point to take the dimension from
        if self.is_empty() {
            return Err(KernelError::InsufficientPoints { found: 0 });
        }
        PointSet::from_vectors(self).map(Cow::Owned)
    }
}

impl PointCloud for Vec<Vec<f64>> {
    fn to_point_set(&self) -> Result<Cow<'_, PointSet>> {
        self.as_slice().to_point_set()
    }
}

impl<const D: usize> PointCloud for [[f64; D]] {
    fn to_point_set(&self) -> Result<Cow<'_, PointSet>> {
        PointSet::from_arrays(self).map(Cow::Owned)
    }
}

impl<const D: usize> PointCloud for Vec<[f64; D]> {
    fn to_point_set(&self) -> Result<Cow<'_, PointSet>> {
        self.as_slice().to_point_set()
    }
}

impl<const D: usize, const N: usize> PointCloud for [[f64; D]; N] {
    fn to_point_set(&self) -> Result<Cow<'_, PointSet>> {
        self.as_slice().to_point_set()
    }
}
