use log::debug;
use rand::Rng;

use crate::assembly_graph::AssemblyGraph;
use crate::graph_queries::{lowest_common_ancestor, simple_paths};
use crate::path_selection::{path_average_weight, remove_losers, select_best};

/// Bubble removal.
///
/// Public API:
/// - remove_bubbles(graph, rng) -> usize
///
/// Behavior summary:
/// - Scan nodes in graph order. For a node `d` with at least two predecessors, consider every
///   unordered pair of predecessors (p1, p2) and look up their lowest common ancestor `a`.
/// - Skip the pair if there is none or if it is p1 or p2 itself (a plain fork, not a bubble).
/// - Otherwise enumerate all simple paths a -> d, score each by average edge weight and node count,
///   keep the best and remove the interior of every other path. `a` and `d` always survive.
/// - Any removal changes ancestor relations, so the scan restarts from scratch until a full scan
///   resolves nothing.

/// Resolve one bubble between `ancestor` and `descendant`. Returns the number of graph elements removed.
pub fn solve_bubble<R: Rng>(
    graph: &mut AssemblyGraph,
    ancestor: &str,
    descendant: &str,
    rng: &mut R,
) -> usize {
    let paths: Vec<Vec<String>> = simple_paths(graph, ancestor, descendant).collect();
    if paths.len() < 2 {
        return 0;
    }

    let sizes: Vec<usize> = paths.iter().map(|p| p.len()).collect();
    let weights: Vec<f64> = paths.iter().map(|p| path_average_weight(graph, p)).collect();
    let best = select_best(&paths, &sizes, &weights, rng);

    debug!(
        "Bubble {} -> {}: {} paths, keeping {:?} (avg weight {:.2})",
        ancestor,
        descendant,
        paths.len(),
        paths[best],
        weights[best]
    );
    remove_losers(graph, &paths, best, false, false)
}

/// Find and resolve the first bubble in scan order.
fn resolve_first_bubble<R: Rng>(graph: &mut AssemblyGraph, rng: &mut R) -> Option<usize> {
    let nodes: Vec<String> = graph.nodes().map(str::to_owned).collect();

    for descendant in nodes.iter() {
        let preds: Vec<String> = graph
            .predecessors(descendant)
            .into_iter()
            .map(str::to_owned)
            .collect();
        if preds.len() < 2 {
            continue;
        }

        for i in 0..preds.len() {
            for j in (i + 1)..preds.len() {
                let ancestor = match lowest_common_ancestor(graph, &preds[i], &preds[j]) {
                    Some(a) => a.to_owned(),
                    None => continue,
                };
                if ancestor == preds[i] || ancestor == preds[j] {
                    continue;
                }

                let removed = solve_bubble(graph, &ancestor, descendant, rng);
                if removed > 0 {
                    return Some(removed);
                }
            }
        }
    }
    None
}

/// Remove bubbles until none are left. Returns the number of bubbles resolved.
pub fn remove_bubbles<R: Rng>(graph: &mut AssemblyGraph, rng: &mut R) -> usize {
    let mut resolved = 0;
    while let Some(removed) = resolve_first_bubble(graph, rng) {
        resolved += 1;
        debug!("Bubble {} removed {} graph elements", resolved, removed);
    }
    resolved
}
