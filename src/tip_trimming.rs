use log::debug;
use rand::Rng;

use crate::assembly_graph::AssemblyGraph;
use crate::path_selection::{path_average_weight, remove_path, select_best};

/// Tip trimming for the assembly graph.
/// - Entry tips hang off a node with several predecessors and start at a source.
/// - Exit tips hang off a node with several successors and end at a sink.
/// A tip is only trimmed when a longer or continuing branch leaves the same junction, and only if
/// it also loses the weight comparison against that branch; otherwise the branch it was compared
/// with is removed. Both passes rescan the graph after every change until nothing is left to do.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TipSide {
    Entry,
    Exit,
}

impl TipSide {

    /// Neighbours away from the junction
    fn ahead<'g>(self, graph: &'g AssemblyGraph, node: &str) -> Vec<&'g str> {
        match self {
            TipSide::Entry => graph.predecessors(node),
            TipSide::Exit => graph.successors(node),
        }
    }

    /// Number of edges back towards the junction
    fn behind_degree(self, graph: &AssemblyGraph, node: &str) -> usize {
        match self {
            TipSide::Entry => graph.out_degree(node),
            TipSide::Exit => graph.in_degree(node),
        }
    }
}

/// One branch leaving a junction, oriented along the edges.
#[derive(Debug)]
struct Branch {
    path: Vec<String>,
    // the branch ends at a source/sink only reachable through it
    dead_end: bool,
}

// walk away from the junction through nodes with exactly one edge on each side
fn trace_branch(graph: &AssemblyGraph, junction: &str, first: &str, side: TipSide) -> Branch {
    let mut path = vec![junction.to_owned(), first.to_owned()];
    let mut cur = first.to_owned();

    let dead_end = loop {
        if side.behind_degree(graph, &cur) != 1 {
            break false;
        }
        let ahead = side.ahead(graph, &cur);
        match ahead.as_slice() {
            [] => break true,
            [next] if !path.iter().any(|n| n == next) => {
                let next = next.to_string();
                path.push(next.clone());
                cur = next;
            }
            _ => break false,
        }
    };

    if side == TipSide::Entry {
        path.reverse();
    }
    Branch { path, dead_end }
}

/// Find and resolve the first tip in scan order.
fn resolve_first_tip<R: Rng>(
    graph: &mut AssemblyGraph,
    side: TipSide,
    rng: &mut R,
) -> Option<usize> {
    let nodes: Vec<String> = graph.nodes().map(str::to_owned).collect();

    for junction in nodes.iter() {
        let neighbours: Vec<String> = side
            .ahead(graph, junction)
            .into_iter()
            .map(str::to_owned)
            .collect();
        if neighbours.len() < 2 {
            continue;
        }
        let branches: Vec<Branch> = neighbours
            .iter()
            .map(|n| trace_branch(graph, junction, n, side))
            .collect();

        // shortest dead end is the tip
        let Some((tip_idx, tip)) = branches
            .iter()
            .enumerate()
            .filter(|(_, b)| b.dead_end)
            .min_by_key(|(_, b)| b.path.len())
        else {
            continue;
        };

        // longest other branch is the main path, continuing branches outrank every dead end
        let mut main: Option<&Branch> = None;
        for (i, b) in branches.iter().enumerate() {
            if i == tip_idx {
                continue;
            }
            let better = match main {
                None => true,
                Some(m) => (!b.dead_end, b.path.len()) > (!m.dead_end, m.path.len()),
            };
            if better {
                main = Some(b);
            }
        }
        let Some(main) = main else { continue };
        if main.dead_end && main.path.len() <= tip.path.len() {
            continue;
        }

        let candidates = [main, tip];
        let paths: Vec<Vec<String>> = candidates.iter().map(|b| b.path.clone()).collect();
        let sizes: Vec<usize> = paths.iter().map(|p| p.len()).collect();
        let weights: Vec<f64> = paths.iter().map(|p| path_average_weight(graph, p)).collect();
        let best = select_best(&paths, &sizes, &weights, rng);
        let loser = 1 - best;

        // the outer end only goes when nothing else reaches it
        let drop_outer = candidates[loser].dead_end;
        let (drop_first, drop_last) = match side {
            TipSide::Entry => (drop_outer, false),
            TipSide::Exit => (false, drop_outer),
        };

        debug!(
            "{:?} tip at {}: keeping {:?} (avg weight {:.2}), removing {:?} (avg weight {:.2})",
            side, junction, paths[best], weights[best], paths[loser], weights[loser]
        );
        let removed = remove_path(graph, &paths[loser], &paths[best], drop_first, drop_last);
        if removed > 0 {
            return Some(removed);
        }
    }
    None
}

/// Trim tips on one side until none are left. Returns the number of tips resolved.
pub fn trim_tips<R: Rng>(graph: &mut AssemblyGraph, side: TipSide, rng: &mut R) -> usize {
    let mut resolved = 0;
    while let Some(removed) = resolve_first_tip(graph, side, rng) {
        resolved += 1;
        debug!("{:?} tip {} removed {} graph elements", side, resolved, removed);
    }
    resolved
}

pub fn remove_entry_tips<R: Rng>(graph: &mut AssemblyGraph, rng: &mut R) -> usize {
    trim_tips(graph, TipSide::Entry, rng)
}

pub fn remove_exit_tips<R: Rng>(graph: &mut AssemblyGraph, rng: &mut R) -> usize {
    trim_tips(graph, TipSide::Exit, rng)
}
