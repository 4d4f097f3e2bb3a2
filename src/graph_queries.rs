/// Graph traversal primitives used by the simplification passes and contig extraction.
/// Successors are always visited in edge insertion order, so every result here is deterministic.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::assembly_graph::AssemblyGraph;
use crate::errors::AssemblyError;

/// Lazy depth-first enumeration of the simple paths between two nodes.
pub struct SimplePaths<'g> {
    graph: &'g AssemblyGraph,
    target: String,
    path: Vec<&'g str>,
    on_path: HashSet<&'g str>,
    stack: Vec<std::vec::IntoIter<&'g str>>,
}

impl Iterator for SimplePaths<'_> {
    type Item = Vec<String>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(children) = self.stack.last_mut() {
            match children.next() {
                None => {
                    self.stack.pop();
                    if let Some(done) = self.path.pop() {
                        self.on_path.remove(done);
                    }
                }
                Some(child) if self.on_path.contains(child) => continue,
                Some(child) if child == self.target => {
                    let mut found: Vec<String> = self.path.iter().map(|n| n.to_string()).collect();
                    found.push(child.to_string());
                    return Some(found);
                }
                Some(child) => {
                    self.path.push(child);
                    self.on_path.insert(child);
                    self.stack.push(self.graph.successors(child).into_iter());
                }
            }
        }
        None
    }
}

/// All simple paths from `start` to `end`, each with at least two nodes.
/// Empty when `start == end`, when either node is missing, or when `end` is unreachable.
pub fn simple_paths<'g>(graph: &'g AssemblyGraph, start: &str, end: &str) -> SimplePaths<'g> {
    let mut paths = SimplePaths {
        graph,
        target: end.to_owned(),
        path: Vec::new(),
        on_path: HashSet::new(),
        stack: Vec::new(),
    };
    if start == end || !graph.contains(end) {
        return paths;
    }
    if let Some(start) = graph.get(start) {
        paths.path.push(start);
        paths.on_path.insert(start);
        paths.stack.push(graph.successors(start).into_iter());
    }
    paths
}

/// Path with the fewest edges from `start` to `end`, found by breadth-first search.
pub fn shortest_path(
    graph: &AssemblyGraph,
    start: &str,
    end: &str,
) -> Result<Vec<String>, AssemblyError> {
    let no_path = || AssemblyError::NoPath {
        from: start.to_owned(),
        to: end.to_owned(),
    };
    if !graph.contains(start) || !graph.contains(end) {
        return Err(no_path());
    }
    if start == end {
        return Ok(vec![start.to_owned()]);
    }

    let mut parent: HashMap<&str, &str> = HashMap::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    let Some(start) = graph.get(start) else {
        return Err(no_path());
    };
    seen.insert(start);
    queue.push_back(start);

    while let Some(cur) = queue.pop_front() {
        for next in graph.successors(cur) {
            if !seen.insert(next) {
                continue;
            }
            parent.insert(next, cur);
            if next == end {
                let mut path = vec![next.to_owned()];
                let mut node = next;
                while let Some(&p) = parent.get(node) {
                    path.push(p.to_owned());
                    node = p;
                }
                path.reverse();
                return Ok(path);
            }
            queue.push_back(next);
        }
    }
    Err(no_path())
}

fn reachable<'g, F>(graph: &'g AssemblyGraph, from: &str, next: F) -> HashSet<&'g str>
where
    F: Fn(&'g AssemblyGraph, &str) -> Vec<&'g str>,
{
    let mut seen: HashSet<&str> = HashSet::new();
    let Some(from) = graph.get(from) else {
        return seen;
    };
    let mut stack = vec![from];
    seen.insert(from);
    while let Some(cur) = stack.pop() {
        for n in next(graph, cur) {
            if seen.insert(n) {
                stack.push(n);
            }
        }
    }
    seen
}

/// `node` and every node that can reach it.
pub fn ancestors<'g>(graph: &'g AssemblyGraph, node: &str) -> HashSet<&'g str> {
    reachable(graph, node, |g, n| g.predecessors(n))
}

/// `node` and every node reachable from it.
pub fn descendants<'g>(graph: &'g AssemblyGraph, node: &str) -> HashSet<&'g str> {
    reachable(graph, node, |g, n| g.successors(n))
}

/// Lowest common ancestor of `a` and `b`: a node reaching both of them that has no
/// successor which also reaches both.
///
/// Returns `None` when there is no such node, and also when the lowest common ancestor is `a` or `b`
/// itself. When several nodes qualify the first one in node order is returned.
pub fn lowest_common_ancestor<'g>(
    graph: &'g AssemblyGraph,
    a: &str,
    b: &str,
) -> Option<&'g str> {
    let ancestors_a = ancestors(graph, a);
    let ancestors_b = ancestors(graph, b);
    let common: HashSet<&str> = ancestors_a.intersection(&ancestors_b).copied().collect();
    if common.is_empty() {
        return None;
    }

    // common ancestors are closed under "is an ancestor of", so a node with a strict descendant in
    // `common` also has a direct successor in it
    let lowest = graph.nodes().find(|n| {
        common.contains(n)
            && graph
                .successors(n)
                .iter()
                .all(|s| s == n || !common.contains(s))
    })?;

    if lowest == a || lowest == b {
        None
    } else {
        Some(lowest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_of(edges: &[(&str, &str, u32)]) -> AssemblyGraph {
        let mut graph = AssemblyGraph::new();
        for &(u, v, w) in edges {
            graph.add_edge(u, v, w);
        }
        graph
    }

    fn diamond() -> AssemblyGraph {
        graph_of(&[
            ("S", "A", 1),
            ("A", "B", 1),
            ("A", "C", 1),
            ("B", "D", 1),
            ("C", "D", 1),
            ("D", "E", 1),
        ])
    }

    #[test]
    fn simple_paths_in_diamond() {
        let graph = diamond();
        let paths: Vec<_> = simple_paths(&graph, "A", "D").collect();
        assert_eq!(
            paths,
            vec![vec!["A", "B", "D"], vec!["A", "C", "D"]]
        );
        let paths: Vec<_> = simple_paths(&graph, "S", "E").collect();
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| p.first().unwrap() == "S" && p.last().unwrap() == "E"));
    }

    #[test]
    fn simple_paths_empty_cases() {
        let graph = diamond();
        assert_eq!(simple_paths(&graph, "A", "A").count(), 0);
        assert_eq!(simple_paths(&graph, "D", "A").count(), 0);
        assert_eq!(simple_paths(&graph, "X", "D").count(), 0);
        assert_eq!(simple_paths(&graph, "A", "X").count(), 0);
    }

    #[test]
    fn simple_paths_survive_cycles() {
        let graph = graph_of(&[
            ("A", "B", 1),
            ("B", "C", 1),
            ("C", "A", 1),
            ("C", "D", 1),
            ("B", "B", 1),
        ]);
        let paths: Vec<_> = simple_paths(&graph, "A", "D").collect();
        assert_eq!(paths, vec![vec!["A", "B", "C", "D"]]);
    }

    #[test]
    fn simple_paths_is_lazy() {
        let graph = diamond();
        let mut paths = simple_paths(&graph, "S", "E");
        assert_eq!(paths.next().unwrap(), vec!["S", "A", "B", "D", "E"]);
    }

    #[test]
    fn shortest_path_prefers_fewest_edges() {
        let graph = graph_of(&[
            ("A", "B", 9),
            ("B", "C", 9),
            ("C", "D", 9),
            ("A", "X", 1),
            ("X", "D", 1),
        ]);
        assert_eq!(shortest_path(&graph, "A", "D").unwrap(), vec!["A", "X", "D"]);
    }

    #[test]
    fn shortest_path_ties_follow_edge_order() {
        let graph = diamond();
        assert_eq!(shortest_path(&graph, "A", "D").unwrap(), vec!["A", "B", "D"]);
    }

    #[test]
    fn shortest_path_not_found() {
        let graph = diamond();
        assert!(matches!(
            shortest_path(&graph, "E", "S"),
            Err(AssemblyError::NoPath { .. })
        ));
        assert!(shortest_path(&graph, "S", "missing").is_err());
    }

    #[test]
    fn reachability() {
        let graph = diamond();
        assert!(descendants(&graph, "S").contains("E"));
        assert!(!descendants(&graph, "B").contains("C"));
        assert_eq!(ancestors(&graph, "D").len(), 5);
        assert_eq!(descendants(&graph, "C").len(), 3);
        assert!(ancestors(&graph, "missing").is_empty());
    }

    #[test]
    fn lca_of_diamond_branches() {
        let graph = diamond();
        assert_eq!(lowest_common_ancestor(&graph, "B", "C"), Some("A"));
    }

    #[test]
    fn lca_degenerate_cases() {
        let graph = graph_of(&[
            ("A", "B", 1),
            ("B", "C", 1),
            ("A", "C", 1),
            ("X", "Y", 1),
        ]);
        // A reaches B directly, so the lowest common ancestor of A and B is A itself
        assert_eq!(lowest_common_ancestor(&graph, "A", "B"), None);
        assert_eq!(lowest_common_ancestor(&graph, "B", "A"), None);
        // unrelated components
        assert_eq!(lowest_common_ancestor(&graph, "B", "Y"), None);
    }

    #[test]
    fn lca_picks_the_lowest_of_nested_forks() {
        let graph = graph_of(&[
            ("R", "A", 1),
            ("R", "Z", 1),
            ("A", "B", 1),
            ("A", "C", 1),
            ("Z", "C", 1),
        ]);
        assert_eq!(lowest_common_ancestor(&graph, "B", "C"), Some("A"));
    }

    #[test]
    fn lca_on_cycle_is_none() {
        let graph = graph_of(&[
            ("A", "B", 1),
            ("A", "C", 1),
            ("B", "D", 1),
            ("C", "D", 1),
            ("D", "A", 1),
        ]);
        // every node is an ancestor of every other, none is lowest
        assert_eq!(lowest_common_ancestor(&graph, "B", "C"), None);
    }

    #[test]
    fn lca_prefers_first_inserted() {
        let graph = graph_of(&[
            ("P", "B", 1),
            ("Q", "B", 1),
            ("P", "C", 1),
            ("Q", "C", 1),
        ]);
        assert_eq!(lowest_common_ancestor(&graph, "B", "C"), Some("P"));
    }
}
