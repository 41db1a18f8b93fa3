//! N-dimensional uniform tile grid used to bound the neighbor search in
//! [`crate::density`] and [`crate::nearest_higher`] to nearby points only.

use std::collections::BTreeSet;

use crate::errors::ClueError;
use crate::points::PointStore;

/// A uniform grid partitioning the bounding box of a point set into tiles, each
/// holding the (point-index sorted) list of points that fall into it.
///
/// Built by a two-pass count → prefix-sum → scatter construction rather than a
/// sort of `(tile_id, point_index)` pairs: scattering points in ascending index
/// order yields per-tile lists that are already sorted by point index, with no
/// extra sort pass and no atomics.
#[derive(Debug, Clone)]
pub struct TileGrid {
    dim: usize,
    min: Vec<f64>,
    max: Vec<f64>,
    n_tiles: Vec<usize>,
    tile_size: Vec<f64>,
    wrapped: Vec<bool>,
    starts: Vec<usize>,
    point_ids: Vec<usize>,
}

impl TileGrid {
    /// Creates an unconfigured grid over `dim` dimensions: a single tile spanning
    /// `[0, 1)` along every axis, not wrapped. Call [`configure`](Self::configure)
    /// (or [`auto_configure`](Self::auto_configure)) before [`fill`](Self::fill).
    pub fn new(dim: usize) -> TileGrid {
        TileGrid {
            dim,
            min: vec![0.0; dim],
            max: vec![1.0; dim],
            n_tiles: vec![1; dim],
            tile_size: vec![1.0; dim],
            wrapped: vec![false; dim],
            starts: vec![0; 1],
            point_ids: Vec::new(),
        }
    }

    /// Sets the bounding box, per-axis tile counts and periodic flags explicitly.
    ///
    /// Fails with [`ClueError::InvalidParameter`] if any slice's length does not
    /// match `dim`, if any `min_d >= max_d`, or if any `n_tiles_per_dim[d] == 0`.
    pub fn configure(
        &mut self,
        min: Vec<f64>,
        max: Vec<f64>,
        n_tiles_per_dim: Vec<usize>,
        wrapped: Vec<bool>,
    ) -> Result<(), ClueError> {
        if min.len() != self.dim || max.len() != self.dim || n_tiles_per_dim.len() != self.dim || wrapped.len() != self.dim {
            return Err(ClueError::InvalidParameter {
                reason: format!("tile grid configuration must supply {} values per slice", self.dim),
            });
        }
        let mut tile_size = vec![0.0; self.dim];
        for d in 0..self.dim {
            if n_tiles_per_dim[d] == 0 {
                return Err(ClueError::InvalidParameter {
                    reason: format!("n_tiles_per_dim[{d}] must be positive"),
                });
            }
            if min[d] > max[d] {
                return Err(ClueError::InvalidParameter {
                    reason: format!("min[{d}] = {} must not exceed max[{d}] = {}", min[d], max[d]),
                });
            }
            let span = max[d] - min[d];
            tile_size[d] = if span.abs() < f64::EPSILON {
                1e-9
            } else {
                span / n_tiles_per_dim[d] as f64
            };
        }
        self.min = min;
        self.max = max;
        self.n_tiles = n_tiles_per_dim;
        self.tile_size = tile_size;
        self.wrapped = wrapped;
        self.starts = vec![0; self.total_tiles() + 1];
        self.point_ids.clear();
        Ok(())
    }

    /// Derives a bounding box and per-axis tile resolution from `points` so that
    /// the total tile count is approximately `n / p_per_bin`, then configures the
    /// grid. Degenerate axes (`min_d == max_d`) collapse to a single tile with a
    /// small positive `tile_size`. Periodic flags are preserved if previously set
    /// to the same dimensionality, otherwise reset to all-`false`.
    ///
    /// Fails with [`ClueError::InvalidParameter`] if `p_per_bin == 0` or the point
    /// set is empty.
    pub fn auto_configure(&mut self, points: &PointStore, p_per_bin: usize) -> Result<(), ClueError> {
        if p_per_bin == 0 {
            return Err(ClueError::InvalidParameter {
                reason: "p_per_bin must be positive".to_string(),
            });
        }
        let n = points.n();
        if n == 0 {
            return Err(ClueError::InvalidParameter {
                reason: "cannot build a tile grid over an empty point set".to_string(),
            });
        }
        let dim = self.dim;
        let mut min = vec![f64::INFINITY; dim];
        let mut max = vec![f64::NEG_INFINITY; dim];
        for i in 0..n {
            for d in 0..dim {
                let c = points.coord(i, d);
                if c < min[d] { min[d] = c; }
                if c > max[d] { max[d] = c; }
            }
        }

        let target_total = if p_per_bin >= n { 1.0 } else { (n as f64 / p_per_bin as f64).max(1.0) };
        let n_tiles_per_dim = if target_total <= 1.0 {
            1
        } else {
            target_total.powf(1.0 / dim as f64).round().max(1.0) as usize
        };

        let mut n_tiles = vec![n_tiles_per_dim; dim];
        let mut tile_size = vec![0.0; dim];
        for d in 0..dim {
            let span = max[d] - min[d];
            if span.abs() < f64::EPSILON {
                n_tiles[d] = 1;
                tile_size[d] = 1e-9;
            } else {
                tile_size[d] = span / n_tiles_per_dim as f64;
            }
        }

        let wrapped = if self.wrapped.len() == dim { self.wrapped.clone() } else { vec![false; dim] };

        self.min = min;
        self.max = max;
        self.n_tiles = n_tiles;
        self.tile_size = tile_size;
        self.wrapped = wrapped;
        self.starts = vec![0; self.total_tiles() + 1];
        self.point_ids.clear();
        Ok(())
    }

    /// Overrides the per-axis periodic flags. Takes effect on the next
    /// [`auto_configure`](Self::auto_configure) or [`fill`](Self::fill) call.
    pub fn set_wrapped(&mut self, wrapped: Vec<bool>) -> Result<(), ClueError> {
        if wrapped.len() != self.dim {
            return Err(ClueError::InvalidParameter {
                reason: format!("wrapped flags must have {} entries", self.dim),
            });
        }
        self.wrapped = wrapped;
        Ok(())
    }

    /// Assigns every point to a tile and builds the CSR-style per-tile index.
    pub fn fill(&mut self, points: &PointStore) -> Result<(), ClueError> {
        let n = points.n();
        let total = self.total_tiles();

        let mut tile_of = Vec::with_capacity(n);
        tile_of.try_reserve(n).map_err(|_| ClueError::ResourceExhausted { what: "tile assignment buffer".to_string() })?;
        let mut counts = vec![0usize; total];
        for i in 0..n {
            let t = self.tile_of(points, i);
            tile_of.push(t);
            counts[t] += 1;
        }

        let mut starts = vec![0usize; total + 1];
        for t in 0..total {
            starts[t + 1] = starts[t] + counts[t];
        }

        let mut cursor = starts.clone();
        let mut point_ids = vec![0usize; n];
        for (i, &t) in tile_of.iter().enumerate() {
            point_ids[cursor[t]] = i;
            cursor[t] += 1;
        }

        self.starts = starts;
        self.point_ids = point_ids;
        Ok(())
    }

    /// Number of dimensions.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Total number of tiles `T = prod(n_tiles_d)`.
    pub fn total_tiles(&self) -> usize {
        self.n_tiles.iter().product()
    }

    /// Point indices assigned to `tile_id`, sorted ascending.
    pub fn points_in(&self, tile_id: usize) -> &[usize] {
        &self.point_ids[self.starts[tile_id]..self.starts[tile_id + 1]]
    }

    /// The tile containing point `i`.
    pub fn tile_of(&self, points: &PointStore, i: usize) -> usize {
        let mut coords = vec![0usize; self.dim];
        for d in 0..self.dim {
            let c = points.coord(i, d);
            let raw = ((c - self.min[d]) / self.tile_size[d]).floor();
            let clamped = if raw.is_nan() {
                0
            } else {
                (raw as i64).clamp(0, self.n_tiles[d] as i64 - 1)
            };
            coords[d] = clamped as usize;
        }
        self.linear_index(&coords)
    }

    /// All tiles within Chebyshev reach `ceil(radius / tile_size_d)` (per axis) of
    /// `tile_id`, honoring periodic wrap on wrapped axes.
    pub fn neighbors(&self, tile_id: usize, radius: f64) -> Vec<usize> {
        let center = self.tile_coords(tile_id);
        let mut per_axis: Vec<Vec<usize>> = Vec::with_capacity(self.dim);
        for d in 0..self.dim {
            // A degenerate axis (tile_size_d clamped to a tiny epsilon, n_tiles_d == 1)
            // would otherwise blow `reach` up to billions of iterations that all
            // collapse onto the single tile; clamping to n_tiles_d bounds it to the
            // number of tiles that can possibly exist along this axis.
            let reach = ((radius / self.tile_size[d]).ceil() as i64).min(self.n_tiles[d] as i64);
            per_axis.push(axis_candidates(center[d], reach, self.n_tiles[d], self.wrapped[d]));
        }

        let mut combos: Vec<Vec<usize>> = vec![Vec::new()];
        for candidates in &per_axis {
            let mut next = Vec::with_capacity(combos.len() * candidates.len());
            for combo in &combos {
                for &c in candidates {
                    let mut extended = combo.clone();
                    extended.push(c);
                    next.push(extended);
                }
            }
            combos = next;
        }
        combos.into_iter().map(|coords| self.linear_index(&coords)).collect()
    }

    /// Euclidean distance between points `i` and `j`, honoring periodic wrap on
    /// wrapped axes: `D_d(a, b) = min(|a-b|, L_d - |a-b|)` where `L_d = max_d - min_d`.
    pub fn distance(&self, points: &PointStore, i: usize, j: usize) -> f64 {
        let mut sum_sq = 0.0;
        for d in 0..self.dim {
            let a = points.coord(i, d);
            let b = points.coord(j, d);
            let diff = (a - b).abs();
            let dd = if self.wrapped[d] {
                let l = self.max[d] - self.min[d];
                diff.min(l - diff)
            } else {
                diff
            };
            sum_sq += dd * dd;
        }
        sum_sq.sqrt()
    }

    /// Per-axis tile size.
    pub fn tile_size(&self) -> &[f64] {
        &self.tile_size
    }

    fn linear_index(&self, coords: &[usize]) -> usize {
        let mut idx = 0usize;
        for d in 0..self.dim {
            idx = idx * self.n_tiles[d] + coords[d];
        }
        idx
    }

    fn tile_coords(&self, tile_id: usize) -> Vec<usize> {
        let mut coords = vec![0usize; self.dim];
        let mut rem = tile_id;
        for d in (0..self.dim).rev() {
            coords[d] = rem % self.n_tiles[d];
            rem /= self.n_tiles[d];
        }
        coords
    }
}

/// Candidate tile indices along one axis within `reach` tiles of `idx`, honoring
/// periodic wrap when `wrapped`. Deduplicated and sorted.
fn axis_candidates(idx: usize, reach: i64, n_tiles_d: usize, wrapped: bool) -> Vec<usize> {
    let mut set = BTreeSet::new();
    let n = n_tiles_d as i64;
    for off in -reach..=reach {
        let v = idx as i64 + off;
        if wrapped {
            let wrapped_v = ((v % n) + n) % n;
            set.insert(wrapped_v as usize);
        } else if v >= 0 && v < n {
            set.insert(v as usize);
        }
    }
    set.into_iter().collect()
}
