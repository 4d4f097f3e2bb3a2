/// Graph simplification driver
/// alternate bubble removal and tip trimming until a whole round leaves the graph untouched

use log::info;
use rand::Rng;

use crate::assembly_graph::AssemblyGraph;
use crate::bubble_removal::remove_bubbles;
use crate::tip_trimming::{remove_entry_tips, remove_exit_tips};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimplificationStats {
    pub rounds: usize,
    pub bubbles: usize,
    pub entry_tips: usize,
    pub exit_tips: usize,
}

impl SimplificationStats {
    pub fn total(&self) -> usize {
        self.bubbles + self.entry_tips + self.exit_tips
    }
}

/// Remove bubbles and tips until the graph no longer changes.
pub fn simplify_graph<R: Rng>(graph: &mut AssemblyGraph, rng: &mut R) -> SimplificationStats {
    info!("=== GRAPH SIMPLIFICATION ===");
    let mut stats = SimplificationStats::default();

    loop {
        stats.rounds += 1;
        let bubbles = remove_bubbles(graph, rng);
        let entry_tips = remove_entry_tips(graph, rng);
        let exit_tips = remove_exit_tips(graph, rng);
        info!(
            "Round {}: {} bubbles, {} entry tips, {} exit tips; graph has {} nodes, {} edges",
            stats.rounds,
            bubbles,
            entry_tips,
            exit_tips,
            graph.node_count(),
            graph.edge_count()
        );

        stats.bubbles += bubbles;
        stats.entry_tips += entry_tips;
        stats.exit_tips += exit_tips;
        if bubbles + entry_tips + exit_tips == 0 {
            break;
        }
    }

    info!("=== GRAPH SIMPLIFICATION FINISHED ({} artifacts resolved) ===", stats.total());
    stats
}
