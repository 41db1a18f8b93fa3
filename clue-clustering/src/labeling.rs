//! Classifies points as seed, follower, or outlier by thresholds on (ρ, δ), and
//! assigns deterministic cluster ids to seeds.

use rayon::prelude::*;

/// The three possible roles a point can take before propagation (C7) fills in
/// follower cluster ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PointKind {
    Seed,
    Follower,
    Outlier,
}

fn classify_one(rho: f64, delta: f64, rho_c: f64, delta_c: f64, delta_o: f64) -> PointKind {
    if rho < rho_c && delta > delta_o {
        PointKind::Outlier
    } else if delta > delta_c && rho >= rho_c {
        PointKind::Seed
    } else {
        PointKind::Follower
    }
}

/// Classifies every point and assigns seed cluster ids.
///
/// Classification itself is a parallel map (no point's role depends on another's);
/// seed numbering is then a second, strictly sequential pass in ascending point
/// index order, since which integer id a seed receives depends on a total order
/// across all points and cannot be parallelized without losing determinism.
///
/// Returns `(is_seed, is_outlier, cluster)`: `cluster[i]` is the seed's own id for
/// a seed, and `-1` for both followers and outliers. `is_outlier` distinguishes the
/// two: only followers (`!is_seed[i] && !is_outlier[i]`) are eligible to join the
/// follower graph built by [`crate::propagation`] — per the data-model invariant
/// that cluster propagation only reaches "every non-seed non-outlier" point,
/// outliers never receive a cluster id even if their nearest-higher chain would
/// otherwise lead into a seed's tree.
pub fn label_points(rho: &[f64], delta: &[f64], rho_c: f64, delta_c: f64, delta_o: f64) -> (Vec<bool>, Vec<bool>, Vec<i32>) {
    let n = rho.len();

    let kinds: Vec<PointKind> = (0..n)
        .into_par_iter()
        .map(|i| classify_one(rho[i], delta[i], rho_c, delta_c, delta_o))
        .collect();

    let mut is_seed = vec![false; n];
    let mut is_outlier = vec![false; n];
    let mut cluster = vec![-1i32; n];
    let mut next_id = 0i32;
    for i in 0..n {
        match kinds[i] {
            PointKind::Seed => {
                is_seed[i] = true;
                cluster[i] = next_id;
                next_id += 1;
            }
            PointKind::Outlier => {
                is_outlier[i] = true;
            }
            PointKind::Follower => {}
        }
    }
    (is_seed, is_outlier, cluster)
}
