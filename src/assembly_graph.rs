/// Assembly graph module
/// nodes are the (k-1)-mer prefixes and suffixes of the counted k-mers, every distinct k-mer is one weighted edge

use log::info;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};

use crate::kmer_index::KmerCounts;

/// Outgoing edge, weight is the number of times the k-mer was observed
#[derive(Clone, Debug)]
struct Edge {
    target: usize,
    weight: u32,
}

/// A node in the assembly graph, identified by its sequence
#[derive(Clone, Debug)]
struct Node {
    seq: String,
    successors: Vec<Edge>,
    predecessors: Vec<usize>,
}

impl Node {

    fn new(seq: String) -> Self {
        Self {
            seq,
            successors: Vec::new(),
            predecessors: Vec::new(),
        }
    }
}

/// Directed weighted graph with at most one edge per ordered node pair.
///
/// Nodes live in an arena in insertion order; removed nodes leave an empty slot so the
/// order of the remaining nodes never changes. Every public method addresses nodes by
/// their sequence.
#[derive(Clone, Debug, Default)]
pub struct AssemblyGraph {
    nodes: Vec<Option<Node>>,
    index: HashMap<String, usize>,
    edge_count: usize,
}

impl AssemblyGraph {

    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the de Bruijn graph of a k-mer table: one edge prefix -> suffix per distinct k-mer.
    pub fn from_kmer_counts(counts: &KmerCounts) -> Self {
        let mut graph = Self::new();
        if counts.kmer_size() < 2 {
            return graph;
        }
        for (kmer, count) in counts.iter() {
            // k-mers are ASCII, so byte slicing is safe
            graph.add_edge(&kmer[..kmer.len() - 1], &kmer[1..], count);
        }
        info!(
            "Graph nodes: {}, edges: {}",
            graph.node_count(),
            graph.edge_count()
        );
        graph
    }

    fn id(&self, seq: &str) -> Option<usize> {
        self.index.get(seq).copied()
    }

    fn node(&self, seq: &str) -> Option<&Node> {
        self.id(seq).and_then(|id| self.nodes[id].as_ref())
    }

    fn seq_of(&self, id: usize) -> &str {
        match &self.nodes[id] {
            Some(node) => &node.seq,
            None => panic!("edge references removed node slot {}", id),
        }
    }

    /// Add a node if it does not already exist, returns its slot
    fn add_node(&mut self, seq: &str) -> usize {
        if let Some(id) = self.id(seq) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(Some(Node::new(seq.to_owned())));
        self.index.insert(seq.to_owned(), id);
        id
    }

    /// Add a directed edge, creating missing nodes. Adding an existing edge accumulates its weight.
    pub fn add_edge(&mut self, from: &str, to: &str, weight: u32) {
        assert!(weight >= 1, "edge weight must be at least 1");
        let from_id = self.add_node(from);
        let to_id = self.add_node(to);

        let Some(from_node) = self.nodes[from_id].as_mut() else {
            unreachable!("freshly indexed node is present");
        };
        if let Some(edge) = from_node.successors.iter_mut().find(|e| e.target == to_id) {
            edge.weight += weight;
            return;
        }
        from_node.successors.push(Edge { target: to_id, weight });
        if let Some(to_node) = self.nodes[to_id].as_mut() {
            to_node.predecessors.push(from_id);
        }
        self.edge_count += 1;
    }

    /// Remove a node and every edge touching it.
    ///
    /// # Panics
    /// If the node is not in the graph.
    pub fn remove_node(&mut self, seq: &str) {
        let Some(id) = self.index.remove(seq) else {
            panic!("remove_node: node {} is not in the graph", seq);
        };
        let Some(node) = self.nodes[id].take() else {
            panic!("remove_node: indexed node {} has an empty slot", seq);
        };

        let mut removed_edges = node.successors.len() + node.predecessors.len();
        for edge in &node.successors {
            if edge.target == id {
                // a self loop is both an outgoing and an incoming edge
                removed_edges -= 1;
            } else if let Some(target) = self.nodes[edge.target].as_mut() {
                target.predecessors.retain(|&p| p != id);
            }
        }
        for &p in node.predecessors.iter().filter(|&&p| p != id) {
            if let Some(source) = self.nodes[p].as_mut() {
                source.successors.retain(|e| e.target != id);
            }
        }
        self.edge_count -= removed_edges;
    }

    /// Remove the edge from -> to, nodes are kept even if they become isolated.
    ///
    /// # Panics
    /// If the edge is not in the graph.
    pub fn remove_edge(&mut self, from: &str, to: &str) {
        let (Some(from_id), Some(to_id)) = (self.id(from), self.id(to)) else {
            panic!("remove_edge: {} -> {} references a missing node", from, to);
        };
        let removed = match self.nodes[from_id].as_mut() {
            Some(node) => {
                let before = node.successors.len();
                node.successors.retain(|e| e.target != to_id);
                before != node.successors.len()
            }
            None => false,
        };
        if !removed {
            panic!("remove_edge: edge {} -> {} is not in the graph", from, to);
        }
        if let Some(node) = self.nodes[to_id].as_mut() {
            node.predecessors.retain(|&p| p != from_id);
        }
        self.edge_count -= 1;
    }

    /// The graph's own copy of a node sequence
    pub fn get(&self, seq: &str) -> Option<&str> {
        self.node(seq).map(|n| n.seq.as_str())
    }

    pub fn contains(&self, seq: &str) -> bool {
        self.index.contains_key(seq)
    }

    pub fn node_count(&self) -> usize {
        self.index.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Weight of the edge from -> to, if present
    pub fn edge_weight(&self, from: &str, to: &str) -> Option<u32> {
        let to_id = self.id(to)?;
        self.node(from)?
            .successors
            .iter()
            .find(|e| e.target == to_id)
            .map(|e| e.weight)
    }

    /// All node sequences in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes.iter().flatten().map(|n| n.seq.as_str())
    }

    /// Nodes with an edge into `seq`, in edge insertion order. Empty for a source or a missing node.
    pub fn predecessors(&self, seq: &str) -> Vec<&str> {
        match self.node(seq) {
            Some(node) => node.predecessors.iter().map(|&p| self.seq_of(p)).collect(),
            None => Vec::new(),
        }
    }

    /// Nodes with an edge out of `seq`, in edge insertion order. Empty for a sink or a missing node.
    pub fn successors(&self, seq: &str) -> Vec<&str> {
        match self.node(seq) {
            Some(node) => node.successors.iter().map(|e| self.seq_of(e.target)).collect(),
            None => Vec::new(),
        }
    }

    pub fn in_degree(&self, seq: &str) -> usize {
        self.node(seq).map_or(0, |n| n.predecessors.len())
    }

    pub fn out_degree(&self, seq: &str) -> usize {
        self.node(seq).map_or(0, |n| n.successors.len())
    }

    /// Nodes without incoming edges, in insertion order
    pub fn sources(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .flatten()
            .filter(|n| n.predecessors.is_empty())
            .map(|n| n.seq.as_str())
            .collect()
    }

    /// Nodes without outgoing edges, in insertion order
    pub fn sinks(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .flatten()
            .filter(|n| n.successors.is_empty())
            .map(|n| n.seq.as_str())
            .collect()
    }

    /// Check that every edge points at a live node and that successor and predecessor lists agree.
    ///
    /// # Panics
    /// On the first inconsistency found.
    pub fn validate(&self) {
        let mut edges = 0;
        for (id, slot) in self.nodes.iter().enumerate() {
            let Some(node) = slot else { continue };
            assert_eq!(self.id(&node.seq), Some(id), "index out of sync for {}", node.seq);
            for edge in &node.successors {
                assert!(edge.weight >= 1, "zero weight edge out of {}", node.seq);
                let target = self.nodes[edge.target]
                    .as_ref()
                    .unwrap_or_else(|| panic!("dangling edge out of {}", node.seq));
                assert!(
                    target.predecessors.contains(&id),
                    "{} -> {} missing from predecessor list",
                    node.seq,
                    target.seq
                );
            }
            for &p in &node.predecessors {
                let source = self.nodes[p]
                    .as_ref()
                    .unwrap_or_else(|| panic!("dangling edge into {}", node.seq));
                assert!(
                    source.successors.iter().any(|e| e.target == id),
                    "{} -> {} missing from successor list",
                    source.seq,
                    node.seq
                );
            }
            edges += node.successors.len();
        }
        assert_eq!(self.index.len(), self.nodes.iter().flatten().count());
        assert_eq!(edges, self.edge_count, "edge count out of sync");
    }

    /// Write the assembly graph to a DOT file for visualization
    pub fn write_dot<P: AsRef<std::path::Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut w = BufWriter::new(file);
        self.write_dot_to(&mut w)?;
        w.flush()
    }

    pub fn write_dot_to<W: Write>(&self, w: &mut W) -> std::io::Result<()> {

        fn degree_color(degree: usize) -> &'static str {
            match degree {
                0 => "gray",
                1 => "black",
                2 => "blue",
                3..=4 => "orange",
                _ => "red",
            }
        }

        writeln!(w, "digraph AssemblyGraph {{")?;
        writeln!(w, "  rankdir=LR;")?;
        writeln!(w, "  node [shape=box fontname=\"Helvetica\"];")?;
        writeln!(w, "  edge [fontname=\"Helvetica\"];")?;
        writeln!(w)?;

        for node in self.nodes.iter().flatten() {
            writeln!(
                w,
                "  \"{}\" [style=filled fillcolor={}];",
                node.seq,
                degree_color(node.successors.len())
            )?;
        }

        writeln!(w)?;

        for node in self.nodes.iter().flatten() {
            for e in &node.successors {
                writeln!(
                    w,
                    "  \"{}\" -> \"{}\" [label=\"{}\"];",
                    node.seq,
                    self.seq_of(e.target),
                    e.weight
                )?;
            }
        }

        writeln!(w, "}}")?;
        Ok(())
    }
}
