//! Column-wise (structure-of-arrays) storage of coordinates, weights and the
//! per-point scratch fields the pipeline computes.

use crate::errors::ClueError;
use crate::NONE;

/// Holds the point set and every field the clustering pipeline derives from it.
///
/// Coordinates are stored dimension-major: `coords[i + d * n]` is the coordinate of
/// point `i` along dimension `d`. All derived columns (`rho`, `delta`, `nh`,
/// `cluster`, `is_seed`) have length `n` and are reset at the start of every
/// `make_clusters` call.
#[derive(Debug, Clone)]
pub struct PointStore {
    n: usize,
    dim: usize,
    coords: Vec<f64>,
    weights: Vec<f64>,
    rho: Vec<f64>,
    delta: Vec<f64>,
    nh: Vec<i64>,
    cluster: Vec<i32>,
    is_seed: Vec<bool>,
}

impl PointStore {
    /// Allocates an empty point store for `n` points in `dim` dimensions.
    ///
    /// Fails with [`ClueError::InvalidParameter`] if `n == 0` or `dim == 0`.
    pub fn new(n: usize, dim: usize) -> Result<PointStore, ClueError> {
        if n == 0 || dim == 0 {
            return Err(ClueError::InvalidParameter {
                reason: format!("n and dim must both be positive, got n={n}, dim={dim}"),
            });
        }
        Ok(PointStore {
            n,
            dim,
            coords: vec![0.0; n * dim],
            weights: vec![0.0; n],
            rho: vec![0.0; n],
            delta: vec![f64::INFINITY; n],
            nh: vec![NONE; n],
            cluster: vec![-1; n],
            is_seed: vec![false; n],
        })
    }

    /// Builds a point store from a dimension-major coordinate buffer and a weight
    /// buffer, validating both.
    ///
    /// Fails with [`ClueError::InvalidParameter`] if `coords.len() != n * dim`,
    /// `weights.len() != n`, any coordinate or weight is non-finite, or any weight
    /// is negative.
    pub fn load(n: usize, dim: usize, coords: Vec<f64>, weights: Vec<f64>) -> Result<PointStore, ClueError> {
        if n == 0 || dim == 0 {
            return Err(ClueError::InvalidParameter {
                reason: format!("n and dim must both be positive, got n={n}, dim={dim}"),
            });
        }
        if coords.len() != n * dim {
            return Err(ClueError::InvalidParameter {
                reason: format!(
                    "coordinate buffer has {} entries, expected n*dim = {}",
                    coords.len(),
                    n * dim
                ),
            });
        }
        if weights.len() != n {
            return Err(ClueError::InvalidParameter {
                reason: format!("weight buffer has {} entries, expected n = {}", weights.len(), n),
            });
        }
        if let Some((idx, bad)) = coords.iter().enumerate().find(|(_, c)| !c.is_finite()) {
            return Err(ClueError::InvalidParameter {
                reason: format!("non-finite coordinate {bad} at flat index {idx}"),
            });
        }
        for (i, w) in weights.iter().enumerate() {
            if !w.is_finite() {
                return Err(ClueError::InvalidParameter {
                    reason: format!("non-finite weight {w} at point {i}"),
                });
            }
            if *w < 0.0 {
                return Err(ClueError::InvalidParameter {
                    reason: format!("negative weight {w} at point {i}"),
                });
            }
        }
        Ok(PointStore {
            n,
            dim,
            coords,
            weights,
            rho: vec![0.0; n],
            delta: vec![f64::INFINITY; n],
            nh: vec![NONE; n],
            cluster: vec![-1; n],
            is_seed: vec![false; n],
        })
    }

    /// Builds a point store from a single fused buffer: `dim` coordinate columns
    /// followed by one weight column, each of length `n`, concatenated in that
    /// order.
    pub fn load_fused(n: usize, dim: usize, fused: Vec<f64>) -> Result<PointStore, ClueError> {
        if fused.len() != n * (dim + 1) {
            return Err(ClueError::InvalidParameter {
                reason: format!(
                    "fused buffer has {} entries, expected n*(dim+1) = {}",
                    fused.len(),
                    n * (dim + 1)
                ),
            });
        }
        let coords = fused[..n * dim].to_vec();
        let weights = fused[n * dim..].to_vec();
        Self::load(n, dim, coords, weights)
    }

    /// Resets all derived columns (`rho`, `delta`, `nh`, `cluster`, `is_seed`) to
    /// their initial state. Called at the start of every `make_clusters` run.
    pub fn reset_derived(&mut self) {
        self.rho.iter_mut().for_each(|v| *v = 0.0);
        self.delta.iter_mut().for_each(|v| *v = f64::INFINITY);
        self.nh.iter_mut().for_each(|v| *v = NONE);
        self.cluster.iter_mut().for_each(|v| *v = -1);
        self.is_seed.iter_mut().for_each(|v| *v = false);
    }

    /// Number of points.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of spatial dimensions.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Coordinate of point `i` along dimension `d`.
    #[inline]
    pub fn coord(&self, i: usize, d: usize) -> f64 {
        self.coords[i + d * self.n]
    }

    /// The full dimension-major coordinate buffer.
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    /// Per-point weights.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Per-point local density, written by the density pass.
    pub fn rho(&self) -> &[f64] {
        &self.rho
    }

    /// Replaces the density column in bulk (used by the density pass).
    pub fn set_rho(&mut self, rho: Vec<f64>) {
        debug_assert_eq!(rho.len(), self.n);
        self.rho = rho;
    }

    /// Distance to the nearest point of strictly higher density, written by the
    /// nearest-higher pass. `+inf` when no such point exists within the search
    /// radius.
    pub fn delta(&self) -> &[f64] {
        &self.delta
    }

    /// Index of the nearest higher-density point, written by the nearest-higher
    /// pass. [`crate::NONE`] when no such point exists.
    pub fn nh(&self) -> &[i64] {
        &self.nh
    }

    /// Replaces the delta and nearest-higher columns in bulk.
    pub fn set_delta_nh(&mut self, delta: Vec<f64>, nh: Vec<i64>) {
        debug_assert_eq!(delta.len(), self.n);
        debug_assert_eq!(nh.len(), self.n);
        self.delta = delta;
        self.nh = nh;
    }

    /// Final cluster assignment, `-1` for outliers / unassigned points.
    pub fn read_clusters(&self) -> &[i32] {
        &self.cluster
    }

    /// Whether each point is a cluster seed.
    pub fn read_seeds(&self) -> &[bool] {
        &self.is_seed
    }

    /// Replaces the `is_seed` and `cluster` columns in bulk (used by labeling and
    /// propagation).
    pub fn set_seeds_and_clusters(&mut self, is_seed: Vec<bool>, cluster: Vec<i32>) {
        debug_assert_eq!(is_seed.len(), self.n);
        debug_assert_eq!(cluster.len(), self.n);
        self.is_seed = is_seed;
        self.cluster = cluster;
    }

    /// Mutable access to the cluster column, used by the propagation BFS.
    pub fn cluster_mut(&mut self) -> &mut [i32] {
        &mut self.cluster
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_zero_n_or_dim() {
        assert!(PointStore::new(0, 2).is_err());
        assert!(PointStore::new(5, 0).is_err());
    }

    #[test]
    fn load_rejects_mismatched_lengths() {
        let err = PointStore::load(3, 2, vec![0.0; 5], vec![1.0; 3]);
        assert!(err.is_err());
    }

    #[test]
    fn load_rejects_non_finite_coordinate() {
        let err = PointStore::load(2, 1, vec![0.0, f64::NAN], vec![1.0, 1.0]);
        assert!(err.is_err());
    }

    #[test]
    fn load_rejects_negative_weight() {
        let err = PointStore::load(2, 1, vec![0.0, 1.0], vec![1.0, -1.0]);
        assert!(err.is_err());
    }

    #[test]
    fn coord_indexes_dimension_major() {
        let store = PointStore::load(2, 2, vec![0.0, 1.0, 10.0, 11.0], vec![1.0, 1.0]).unwrap();
        assert_eq!(store.coord(0, 0), 0.0);
        assert_eq!(store.coord(1, 0), 1.0);
        assert_eq!(store.coord(0, 1), 10.0);
        assert_eq!(store.coord(1, 1), 11.0);
    }

    #[test]
    fn reset_derived_clears_all_scratch_columns() {
        let mut store = PointStore::new(3, 1).unwrap();
        store.set_rho(vec![1.0, 2.0, 3.0]);
        store.set_delta_nh(vec![0.5, 0.5, 0.5], vec![1, 2, 0]);
        store.set_seeds_and_clusters(vec![true, false, false], vec![0, 0, 0]);
        store.reset_derived();
        assert_eq!(store.rho(), &[0.0, 0.0, 0.0]);
        assert_eq!(store.delta(), &[f64::INFINITY, f64::INFINITY, f64::INFINITY]);
        assert_eq!(store.nh(), &[NONE, NONE, NONE]);
        assert_eq!(store.read_clusters(), &[-1, -1, -1]);
        assert_eq!(store.read_seeds(), &[false, false, false]);
    }
}
