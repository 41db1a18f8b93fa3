//! Orchestrates the tile-grid, density, nearest-higher, labeling and propagation
//! passes behind a small parameter-validating driver.

use log::debug;

use crate::density::compute_density;
use crate::errors::ClueError;
use crate::kernel::Kernel;
use crate::labeling::label_points;
use crate::nearest_higher::compute_nearest_higher;
use crate::points::PointStore;
use crate::propagation::propagate;
use crate::tile_grid::TileGrid;

/// Drives the end-to-end CLUE pipeline over a [`PointStore`].
///
/// Parameter validation happens once, at construction, and again at the entry of
/// every [`make_clusters`](Self::make_clusters) call; a rejected call leaves no
/// partial state in the point store (classification/propagation columns are only
/// written after every upstream pass has already succeeded).
#[derive(Debug, Clone)]
pub struct Clusterer {
    d_c: f64,
    rho_c: f64,
    delta_m: f64,
    delta_seed: f64,
    p_per_bin: usize,
    wrapped: Option<Vec<bool>>,
}

impl Clusterer {
    /// Default target number of points per tile when none is supplied.
    pub const DEFAULT_P_PER_BIN: usize = 128;

    /// Builds a clusterer from the configuration surface: `d_c` (density-pass /
    /// neighbor-search radius), `rho_c` (seed density cut), `delta_m` (max search
    /// radius in the nearest-higher pass, also used as the outlier-δ threshold),
    /// `delta_seed` (seed separation threshold, defaults to `d_c`), and
    /// `p_per_bin` (target points per tile, defaults to 128).
    ///
    /// `delta_seed` follows the upstream CLUEstering convention where `-1` is the
    /// sentinel for "use `d_c`": any explicitly-supplied non-positive value (not
    /// just `None`) falls back to `d_c` rather than being rejected, so a caller
    /// forwarding the documented `-1` sentinel (e.g. the CLI's `--seed-dc -1`)
    /// gets the default instead of an error.
    ///
    /// Fails with [`ClueError::InvalidParameter`] if `d_c <= 0`, `rho_c < 0`,
    /// `delta_m < 0`, or `p_per_bin == Some(0)`.
    pub fn new(
        d_c: f64,
        rho_c: f64,
        delta_m: f64,
        delta_seed: Option<f64>,
        p_per_bin: Option<usize>,
    ) -> Result<Clusterer, ClueError> {
        if !(d_c > 0.0) {
            return Err(ClueError::InvalidParameter {
                reason: format!("d_c must be positive, got {d_c}"),
            });
        }
        if rho_c < 0.0 {
            return Err(ClueError::InvalidParameter {
                reason: format!("rho_c must not be negative, got {rho_c}"),
            });
        }
        if delta_m < 0.0 {
            return Err(ClueError::InvalidParameter {
                reason: format!("delta_m must not be negative, got {delta_m}"),
            });
        }
        let p_per_bin = p_per_bin.unwrap_or(Self::DEFAULT_P_PER_BIN);
        if p_per_bin == 0 {
            return Err(ClueError::InvalidParameter {
                reason: "p_per_bin must be positive".to_string(),
            });
        }
        // A non-positive explicit value (including the documented `-1` sentinel)
        // falls back to `d_c`, same as `None`.
        let delta_seed = match delta_seed {
            Some(v) if v > 0.0 => v,
            _ => d_c,
        };

        Ok(Clusterer {
            d_c,
            rho_c,
            delta_m,
            delta_seed,
            p_per_bin,
            wrapped: None,
        })
    }

    /// Sets the periodic flag per axis. Takes effect on the next
    /// [`make_clusters`](Self::make_clusters) call.
    pub fn set_wrapped_coordinates(&mut self, wrapped: &[bool]) {
        self.wrapped = Some(wrapped.to_vec());
    }

    /// Runs the full pipeline (C3 through C7), allocating a fresh tile grid.
    pub fn make_clusters(&self, points: &mut PointStore, kernel: &Kernel) -> Result<(), ClueError> {
        let mut grid = TileGrid::new(points.dim());
        self.make_clusters_with_grid(points, kernel, &mut grid)
    }

    /// Runs the full pipeline reusing a caller-supplied tile grid's allocation.
    ///
    /// Fails with [`ClueError::InvalidParameter`] if `grid`'s dimensionality does
    /// not match `points`'.
    pub fn make_clusters_with_grid(
        &self,
        points: &mut PointStore,
        kernel: &Kernel,
        grid: &mut TileGrid,
    ) -> Result<(), ClueError> {
        if grid.dim() != points.dim() {
            return Err(ClueError::InvalidParameter {
                reason: format!(
                    "tile grid has {} dimensions but the point store has {}",
                    grid.dim(),
                    points.dim()
                ),
            });
        }

        points.reset_derived();

        debug!("building tile grid for {} points, {} dims", points.n(), points.dim());
        grid.auto_configure(points, self.p_per_bin)?;
        if let Some(wrapped) = &self.wrapped {
            grid.set_wrapped(wrapped.clone())?;
        }
        grid.fill(points)?;

        debug!("computing density over {} tiles", grid.total_tiles());
        let rho = compute_density(points, grid, kernel, self.d_c)?;

        debug!("computing nearest-higher neighbors");
        let (delta, nh) = compute_nearest_higher(points, grid, &rho, self.delta_m);

        debug!("labeling seeds, followers and outliers");
        let (is_seed, is_outlier, cluster) = label_points(&rho, &delta, self.rho_c, self.delta_seed, self.delta_m);

        debug!("propagating cluster ids from seeds");
        let cluster = propagate(&nh, &is_seed, &is_outlier, cluster);

        points.set_rho(rho);
        points.set_delta_nh(delta, nh);
        points.set_seeds_and_clusters(is_seed, cluster);

        Ok(())
    }

    /// Groups point indices by final cluster id; outliers are excluded.
    pub fn get_clusters(&self, points: &PointStore) -> Vec<Vec<i32>> {
        let clusters = points.read_clusters();
        let k = clusters.iter().filter(|&&c| c >= 0).map(|&c| c as usize + 1).max().unwrap_or(0);
        let mut groups: Vec<Vec<i32>> = vec![Vec::new(); k];
        for (i, &c) in clusters.iter().enumerate() {
            if c >= 0 {
                groups[c as usize].push(i as i32);
            }
        }
        groups
    }
}
