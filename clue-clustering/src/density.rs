//! Local density estimation by kernel convolution over neighboring tiles.

use rayon::prelude::*;

use crate::errors::ClueError;
use crate::kernel::Kernel;
use crate::points::PointStore;
use crate::tile_grid::TileGrid;

/// Computes the per-point density column ρ and returns it as a fresh `Vec`.
///
/// For each point `i`, density accumulates `w[j] * kernel(dist(i,j), i, j)` over
/// every point `j` (including `i` itself) found in tiles within Chebyshev distance
/// `d_c` of `i`'s tile, restricted to `dist(i,j) <= d_c`. The pass is expressed as
/// a `rayon` parallel map producing a fresh output buffer rather than mutating a
/// shared column in place, so no cross-thread contention on ρ is possible.
///
/// Fails with [`ClueError::NumericError`] if any resulting density is non-finite.
pub fn compute_density(points: &PointStore, grid: &TileGrid, kernel: &Kernel, d_c: f64) -> Result<Vec<f64>, ClueError> {
    let n = points.n();
    let weights = points.weights();

    let rho: Vec<f64> = (0..n)
        .into_par_iter()
        .map(|i| {
            let home_tile = grid.tile_of(points, i);
            let mut acc = 0.0;
            for tile in grid.neighbors(home_tile, d_c) {
                for &j in grid.points_in(tile) {
                    let dist = grid.distance(points, i, j);
                    if dist <= d_c {
                        acc += weights[j] * kernel.eval(dist, i, j);
                    }
                }
            }
            acc
        })
        .collect();

    if let Some(bad) = rho.iter().find(|v| !v.is_finite()) {
        return Err(ClueError::NumericError {
            reason: format!("density pass produced non-finite value {bad}"),
        });
    }

    Ok(rho)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_points(coords: &[f64]) -> PointStore {
        PointStore::load(coords.len(), 1, coords.to_vec(), vec![1.0; coords.len()]).unwrap()
    }

    #[test]
    fn density_is_at_least_self_weight_under_flat_kernel() {
        let points = uniform_points(&[0.0, 5.0, 10.0, 15.0, 20.0]);
        let mut grid = TileGrid::new(1);
        grid.auto_configure(&points, 2).unwrap();
        grid.fill(&points).unwrap();
        let kernel = Kernel::flat(0.5).unwrap();
        let rho = compute_density(&points, &grid, &kernel, 1.0).unwrap();
        for (i, w) in points.weights().iter().enumerate() {
            assert!(rho[i] >= *w - 1e-12, "rho[{i}] = {} should be >= weight {w}", rho[i]);
        }
    }

    #[test]
    fn nearby_points_raise_each_others_density() {
        let points = uniform_points(&[0.0, 0.1, 0.2, 100.0]);
        let mut grid = TileGrid::new(1);
        grid.auto_configure(&points, 2).unwrap();
        grid.fill(&points).unwrap();
        let kernel = Kernel::flat(0.5).unwrap();
        let rho = compute_density(&points, &grid, &kernel, 1.0).unwrap();
        assert!(rho[1] > rho[3]);
    }
}
