//! For each point, find the closest point with strictly greater density within a
//! bounded search radius.

use rayon::prelude::*;

use crate::points::PointStore;
use crate::tile_grid::TileGrid;
use crate::NONE;

/// Returns `true` if `j` is considered "higher density" than `i` under the tie-break
/// rule: `(rho[j] > rho[i]) || (rho[j] == rho[i] && j < i)`. Point-index tie-breaking
/// makes the nearest-higher relation a well-defined total order regardless of tile
/// traversal order or the number of `rayon` worker threads.
#[inline]
fn higher(rho: &[f64], j: usize, i: usize) -> bool {
    rho[j] > rho[i] || (rho[j] == rho[i] && j < i)
}

/// Computes, for every point, the distance to and index of its nearest
/// higher-density neighbor within `delta_m`.
///
/// Returns `(delta, nh)`: `delta[i]` is `+inf` and `nh[i]` is [`crate::NONE`] when no
/// higher-density point exists within the radius. Ties in distance are broken toward
/// the lower point index, for the same determinism reason as the density tie-break.
pub fn compute_nearest_higher(points: &PointStore, grid: &TileGrid, rho: &[f64], delta_m: f64) -> (Vec<f64>, Vec<i64>) {
    let n = points.n();

    let results: Vec<(f64, i64)> = (0..n)
        .into_par_iter()
        .map(|i| {
            let home_tile = grid.tile_of(points, i);
            let mut best_delta = f64::INFINITY;
            let mut best_nh = NONE;
            for tile in grid.neighbors(home_tile, delta_m) {
                for &j in grid.points_in(tile) {
                    if j == i {
                        continue;
                    }
                    let dist = grid.distance(points, i, j);
                    if dist > delta_m {
                        continue;
                    }
                    if !higher(rho, j, i) {
                        continue;
                    }
                    let better = dist < best_delta || (dist == best_delta && (j as i64) < best_nh);
                    if better {
                        best_delta = dist;
                        best_nh = j as i64;
                    }
                }
            }
            (best_delta, best_nh)
        })
        .collect();

    let mut delta = Vec::with_capacity(n);
    let mut nh = Vec::with_capacity(n);
    for (d, h) in results {
        delta.push(d);
        nh.push(h);
    }
    (delta, nh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::Kernel;
    use crate::density::compute_density;

    fn pipeline(coords: &[f64], d_c: f64, delta_m: f64) -> (PointStore, Vec<f64>, Vec<f64>, Vec<i64>) {
        let points = PointStore::load(coords.len(), 1, coords.to_vec(), vec![1.0; coords.len()]).unwrap();
        let mut grid = TileGrid::new(1);
        grid.auto_configure(&points, 2).unwrap();
        grid.fill(&points).unwrap();
        let kernel = Kernel::flat(0.5).unwrap();
        let rho = compute_density(&points, &grid, &kernel, d_c).unwrap();
        let (delta, nh) = compute_nearest_higher(&points, &grid, &rho, delta_m);
        (points, rho, delta, nh)
    }

    #[test]
    fn nearest_higher_target_actually_has_higher_density() {
        let (_points, rho, _delta, nh) = pipeline(&[0.0, 1.0, 2.0, 3.0, 100.0], 2.0, 5.0);
        for (i, &h) in nh.iter().enumerate() {
            if h != NONE {
                assert!(rho[h as usize] > rho[i] || (rho[h as usize] == rho[i] && (h as usize) < i));
            }
        }
    }

    #[test]
    fn ties_break_toward_lower_index() {
        // All three points equidistant and equal weight => equal rho. Point 1's
        // only strictly-index-lower candidate of equal density is point 0.
        let (_points, _rho, _delta, nh) = pipeline(&[0.0, 1.0, 2.0], 5.0, 5.0);
        assert_eq!(nh[1], 0);
    }

    #[test]
    fn global_maximum_has_no_nearest_higher() {
        let (_points, rho, delta, nh) = pipeline(&[0.0, 0.1, 0.2, 0.3], 2.0, 5.0);
        let argmax = (0..rho.len()).max_by(|&a, &b| rho[a].partial_cmp(&rho[b]).unwrap()).unwrap();
        assert_eq!(nh[argmax], NONE);
        assert!(delta[argmax].is_infinite());
    }
}
