//! Builds the inverse nearest-higher adjacency (the "followers" graph) and
//! propagates seed cluster ids over it by breadth-first search.

use std::collections::VecDeque;

use crate::NONE;

/// CSR-encoded followers graph: `children[starts[u]..starts[u+1]]` are the
/// point indices that follow `u` (i.e. whose nearest-higher neighbor is `u`),
/// sorted ascending by point index.
struct FollowersGraph {
    starts: Vec<usize>,
    children: Vec<usize>,
}

/// Builds the followers graph from `nh` and `is_outlier`, restricted to points
/// that are neither seeds nor outliers (`eligible[i]`). Built by the same
/// counting pass + exclusive prefix-sum + scatter pattern as the tile grid: no
/// atomics, and scattering in ascending point-index order yields per-parent lists
/// that are already sorted.
fn build_followers_graph(n: usize, nh: &[i64], eligible: &[bool]) -> FollowersGraph {
    let mut counts = vec![0usize; n];
    for i in 0..n {
        if eligible[i] {
            let parent = nh[i];
            if parent != NONE {
                counts[parent as usize] += 1;
            }
        }
    }

    let mut starts = vec![0usize; n + 1];
    for u in 0..n {
        starts[u + 1] = starts[u] + counts[u];
    }

    let mut cursor = starts.clone();
    let mut children = vec![0usize; starts[n]];
    for i in 0..n {
        if eligible[i] {
            let parent = nh[i];
            if parent != NONE {
                let slot = parent as usize;
                children[cursor[slot]] = i;
                cursor[slot] += 1;
            }
        }
    }

    FollowersGraph { starts, children }
}

/// Propagates each seed's cluster id to every point reachable from it through
/// the follower graph, by breadth-first search from every seed in ascending seed
/// index order. An explicit `VecDeque` work-list is used instead of recursion: a
/// forest over up to millions of points would risk a stack overflow under a
/// recursive traversal.
///
/// `cluster` must already carry each seed's own id (as written by
/// [`crate::labeling::label_points`]) and `-1` everywhere else. `is_outlier[i]`
/// marks points that must never receive a cluster id even if `nh` would
/// otherwise route them into a seed's tree. Returns the final cluster column.
pub fn propagate(nh: &[i64], is_seed: &[bool], is_outlier: &[bool], mut cluster: Vec<i32>) -> Vec<i32> {
    let n = nh.len();
    let eligible: Vec<bool> = (0..n).map(|i| !is_seed[i] && !is_outlier[i]).collect();
    let graph = build_followers_graph(n, nh, &eligible);

    let mut seeds: Vec<usize> = (0..n).filter(|&i| is_seed[i]).collect();
    seeds.sort_by_key(|&i| cluster[i]);

    let mut queue: VecDeque<usize> = VecDeque::new();
    for &s in &seeds {
        queue.push_back(s);
        while let Some(u) = queue.pop_front() {
            let id = cluster[u];
            let children = &graph.children[graph.starts[u]..graph.starts[u + 1]];
            for &v in children {
                cluster[v] = id;
                queue.push_back(v);
            }
        }
    }

    cluster
}
