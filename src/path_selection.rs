/// Choosing between competing paths and removing the ones that lose.

use rand::Rng;
use std::collections::HashSet;

use crate::assembly_graph::AssemblyGraph;

/// Arithmetic mean of the edge weights along `path`.
///
/// # Panics
/// If the path has fewer than two nodes or uses an edge missing from the graph.
pub fn path_average_weight(graph: &AssemblyGraph, path: &[String]) -> f64 {
    assert!(
        path.len() >= 2,
        "average weight needs a path of at least two nodes, got {}",
        path.len()
    );
    let total: u64 = path
        .windows(2)
        .map(|w| match graph.edge_weight(&w[0], &w[1]) {
            Some(weight) => weight as u64,
            None => panic!("path uses missing edge {} -> {}", w[0], w[1]),
        })
        .sum();
    total as f64 / (path.len() - 1) as f64
}

/// Pick the best of several candidate paths and return its index.
///
/// Highest average weight wins, then the most nodes; remaining ties are drawn uniformly from `rng`.
/// `rng` is only consumed when such a tie actually occurs.
pub fn select_best<R: Rng>(
    paths: &[Vec<String>],
    sizes: &[usize],
    weights: &[f64],
    rng: &mut R,
) -> usize {
    assert!(!paths.is_empty(), "select_best needs at least one path");
    assert!(
        paths.len() == sizes.len() && paths.len() == weights.len(),
        "paths, sizes and weights must have equal lengths"
    );

    let max_weight = weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let heaviest: Vec<usize> = (0..paths.len()).filter(|&i| weights[i] == max_weight).collect();

    let max_size = heaviest.iter().map(|&i| sizes[i]).max().unwrap_or(0);
    let longest: Vec<usize> = heaviest.into_iter().filter(|&i| sizes[i] == max_size).collect();

    match longest.as_slice() {
        [only] => *only,
        tied => tied[rng.gen_range(0..tied.len())],
    }
}

/// Remove a losing path from the graph.
///
/// Interior nodes are always removed; the first and last node only when `drop_first` / `drop_last`
/// is set. Nodes on `winner` are never touched and nodes already gone are skipped. If the loser has
/// no removable node at all, the edges it does not share with `winner` are removed instead.
///
/// Returns the number of nodes and edges removed.
pub fn remove_path(
    graph: &mut AssemblyGraph,
    path: &[String],
    winner: &[String],
    drop_first: bool,
    drop_last: bool,
) -> usize {
    if path.len() < 2 {
        return 0;
    }
    let keep: HashSet<&str> = winner.iter().map(String::as_str).collect();
    let last = path.len() - 1;

    let to_remove: Vec<&String> = path
        .iter()
        .enumerate()
        .filter(|&(i, _)| (i != 0 || drop_first) && (i != last || drop_last))
        .map(|(_, n)| n)
        .filter(|n| !keep.contains(n.as_str()))
        .collect();

    if to_remove.is_empty() {
        let kept_edges: HashSet<(&str, &str)> = winner
            .windows(2)
            .map(|w| (w[0].as_str(), w[1].as_str()))
            .collect();
        let mut removed = 0;
        for w in path.windows(2) {
            if kept_edges.contains(&(w[0].as_str(), w[1].as_str())) {
                continue;
            }
            if graph.edge_weight(&w[0], &w[1]).is_some() {
                graph.remove_edge(&w[0], &w[1]);
                removed += 1;
            }
        }
        return removed;
    }

    let mut removed = 0;
    for node in to_remove {
        if graph.contains(node) {
            graph.remove_node(node);
            removed += 1;
        }
    }
    removed
}

/// Remove every path except `best`.
pub fn remove_losers(
    graph: &mut AssemblyGraph,
    paths: &[Vec<String>],
    best: usize,
    drop_first: bool,
    drop_last: bool,
) -> usize {
    paths
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != best)
        .map(|(_, path)| remove_path(graph, path, &paths[best], drop_first, drop_last))
        .sum()
}
