use crate::types::NetworkGraph;
use petgraph::algo::has_path_connecting;
use petgraph::graph::NodeIndex;
use std::collections::{HashSet, VecDeque};

/// Default bound on path length, in edges
pub const DEFAULT_MAX_HOPS: usize = 5;

/// Ordered node sequence through the network
pub type NodePath = Vec<NodeIndex>;

/// Enumerates simple directed paths through the network.
///
/// Enumeration is depth-first: destinations in the order given (terminals in
/// node insertion order), successors in edge insertion order. The same graph
/// always yields the same sequence.
#[derive(Debug, Clone, Copy)]
pub struct PathFinder<'a> {
    graph: &'a NetworkGraph,
    max_hops: usize,
}

impl<'a> PathFinder<'a> {
    pub fn new(graph: &'a NetworkGraph) -> Self {
        Self {
            graph,
            max_hops: DEFAULT_MAX_HOPS,
        }
    }

    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    pub fn max_hops(&self) -> usize {
        self.max_hops
    }

    /// All simple paths from `origin` to any terminal (max-stage) node.
    pub fn find_all_paths(&self, origin: &str) -> Vec<NodePath> {
        self.find_paths_to(origin, &self.graph.terminals())
    }

    /// All simple paths of at most `max_hops` edges from `origin` to each
    /// destination, concatenated per destination.
    ///
    /// An origin that is itself a destination yields the single-node path.
    /// Unknown origins and unreachable destinations yield nothing.
    pub fn find_paths_to(&self, origin: &str, destinations: &[NodeIndex]) -> Vec<NodePath> {
        let Some(start) = self.graph.index_of(origin) else {
            log::debug!("Origin {origin} is not in the network");
            return Vec::new();
        };

        let mut paths = Vec::new();
        let mut on_path = vec![false; self.graph.node_count()];
        for dest in unique(destinations) {
            let mut path = vec![start];
            on_path[start.index()] = true;
            self.extend_paths(dest, &mut path, &mut on_path, &mut paths);
            on_path[start.index()] = false;
        }
        paths
    }

    fn extend_paths(
        &self,
        dest: NodeIndex,
        path: &mut NodePath,
        on_path: &mut [bool],
        out: &mut Vec<NodePath>,
    ) {
        let Some(&current) = path.last() else {
            return;
        };
        if current == dest {
            out.push(path.clone());
            return;
        }
        if path.len() > self.max_hops {
            return;
        }

        for next in self.graph.successors(current) {
            if on_path[next.index()] {
                continue;
            }
            on_path[next.index()] = true;
            path.push(next);
            self.extend_paths(dest, path, on_path, out);
            path.pop();
            on_path[next.index()] = false;
        }
    }

    /// Up to `k` shortest simple paths per destination, ascending by edge
    /// count; equal lengths keep discovery order. Ignores the hop bound.
    ///
    /// Destinations unreachable from `origin` are skipped before any search.
    /// Paths come from Yen's algorithm over breadth-first shortest paths, so
    /// the work is bounded by `k` rather than by the number of simple paths.
    pub fn find_k_shortest_paths(
        &self,
        origin: &str,
        destinations: &[NodeIndex],
        k: usize,
    ) -> Vec<NodePath> {
        let Some(start) = self.graph.index_of(origin) else {
            return Vec::new();
        };
        if k == 0 {
            return Vec::new();
        }

        let mut shortest = Vec::new();
        for dest in unique(destinations) {
            if !has_path_connecting(self.graph.inner(), start, dest, None) {
                log::debug!("No path from {origin} to node #{}", dest.index());
                continue;
            }
            shortest.extend(self.yen(start, dest, k));
        }
        shortest
    }

    fn yen(&self, start: NodeIndex, dest: NodeIndex, k: usize) -> Vec<NodePath> {
        let node_count = self.graph.node_count();
        let unblocked = vec![false; node_count];
        let Some(first) = self.shortest_path(start, dest, &unblocked, &HashSet::new()) else {
            return Vec::new();
        };

        let mut accepted = vec![first];
        let mut candidates: Vec<NodePath> = Vec::new();
        while accepted.len() < k {
            let Some(previous) = accepted.last().cloned() else {
                break;
            };
            for i in 0..previous.len().saturating_sub(1) {
                let root = &previous[..=i];

                let removed: HashSet<(NodeIndex, NodeIndex)> = accepted
                    .iter()
                    .filter(|path| path.len() > i + 1 && path[..=i] == *root)
                    .map(|path| (path[i], path[i + 1]))
                    .collect();
                let mut blocked = vec![false; node_count];
                for node in &root[..i] {
                    blocked[node.index()] = true;
                }

                let Some(spur) = self.shortest_path(previous[i], dest, &blocked, &removed) else {
                    continue;
                };
                let mut candidate = root[..i].to_vec();
                candidate.extend(spur);
                if !accepted.contains(&candidate) && !candidates.contains(&candidate) {
                    candidates.push(candidate);
                }
            }

            let Some(next) = candidates
                .iter()
                .enumerate()
                .min_by_key(|(i, path)| (path.len(), *i))
                .map(|(i, _)| i)
            else {
                break;
            };
            accepted.push(candidates.remove(next));
        }
        accepted
    }

    /// Fewest-edge path avoiding `blocked` nodes and `removed` edges;
    /// successors are expanded in edge insertion order.
    fn shortest_path(
        &self,
        from: NodeIndex,
        to: NodeIndex,
        blocked: &[bool],
        removed: &HashSet<(NodeIndex, NodeIndex)>,
    ) -> Option<NodePath> {
        let mut parent: Vec<Option<NodeIndex>> = vec![None; self.graph.node_count()];
        let mut seen = blocked.to_vec();
        seen[from.index()] = true;
        let mut queue = VecDeque::from([from]);

        while let Some(current) = queue.pop_front() {
            if current == to {
                let mut path = vec![to];
                let mut node = to;
                while let Some(prev) = parent[node.index()] {
                    path.push(prev);
                    node = prev;
                }
                path.reverse();
                return Some(path);
            }
            for next in self.graph.successors(current) {
                if seen[next.index()] || removed.contains(&(current, next)) {
                    continue;
                }
                seen[next.index()] = true;
                parent[next.index()] = Some(current);
                queue.push_back(next);
            }
        }
        None
    }

    /// True iff the path has at least two nodes and every hop is an edge.
    pub fn validate_path(&self, path: &[NodeIndex]) -> bool {
        path.len() >= 2
            && path_edges(path)
                .into_iter()
                .all(|(from, to)| self.graph.edge(from, to).is_some())
    }
}

/// Consecutive node pairs of a path
pub fn path_edges(path: &[NodeIndex]) -> Vec<(NodeIndex, NodeIndex)> {
    path.windows(2).map(|pair| (pair[0], pair[1])).collect()
}

fn unique(nodes: &[NodeIndex]) -> Vec<NodeIndex> {
    let mut seen = Vec::with_capacity(nodes.len());
    for &node in nodes {
        if !seen.contains(&node) {
            seen.push(node);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NetworkBuilder;
    use pretty_assertions::assert_eq;
    use supplyroute_model::{EdgeRecord, NodeRecord};

    /// S -> A -> FC, S -> B -> FC, S -> A -> B, S -> FC2 (stage 4)
    fn diamond() -> NetworkGraph {
        let nodes = vec![
            NodeRecord::new("S", "Supplier", 1, "Source"),
            NodeRecord::new("A", "Source Port", 2, "CN"),
            NodeRecord::new("B", "Destination Port", 3, "US_West"),
            NodeRecord::new("FC", "FC", 4, "US_West"),
            NodeRecord::new("FC2", "FC", 4, "US_East"),
        ];
        let edges = vec![
            EdgeRecord::new("S", "A"),
            EdgeRecord::new("S", "B"),
            EdgeRecord::new("A", "FC"),
            EdgeRecord::new("A", "B"),
            EdgeRecord::new("B", "FC"),
            EdgeRecord::new("S", "FC2"),
        ];
        NetworkBuilder::new().build(&nodes, &edges).unwrap()
    }

    fn names(graph: &NetworkGraph, paths: &[NodePath]) -> Vec<Vec<String>> {
        paths.iter().map(|p| graph.path_names(p)).collect()
    }

    #[test]
    fn test_find_all_paths_depth_first_order() {
        let graph = diamond();
        let paths = PathFinder::new(&graph).find_all_paths("S");
        assert_eq!(
            names(&graph, &paths),
            vec![
                vec!["S", "A", "FC"],
                vec!["S", "A", "B", "FC"],
                vec!["S", "B", "FC"],
                vec!["S", "FC2"],
            ]
        );
    }

    #[test]
    fn test_hop_bound() {
        let graph = diamond();
        let paths = PathFinder::new(&graph).with_max_hops(2).find_all_paths("S");
        assert_eq!(
            names(&graph, &paths),
            vec![vec!["S", "A", "FC"], vec!["S", "B", "FC"], vec!["S", "FC2"]]
        );

        let paths = PathFinder::new(&graph).with_max_hops(0).find_all_paths("S");
        assert!(paths.is_empty());
    }

    #[test]
    fn test_origin_is_terminal() {
        let graph = diamond();
        let finder = PathFinder::new(&graph).with_max_hops(0);
        let paths = finder.find_all_paths("FC");
        assert_eq!(names(&graph, &paths), vec![vec!["FC"]]);
    }

    #[test]
    fn test_unreachable_and_unknown_origin() {
        let graph = diamond();
        let finder = PathFinder::new(&graph);
        let fc2 = graph.index_of("FC2").unwrap();
        assert!(finder.find_paths_to("A", &[fc2]).is_empty());
        assert!(finder.find_all_paths("Nowhere").is_empty());
    }

    #[test]
    fn test_k_shortest_paths() {
        let graph = diamond();
        let finder = PathFinder::new(&graph);
        let fc = graph.index_of("FC").unwrap();

        let paths = finder.find_k_shortest_paths("S", &[fc], 2);
        assert_eq!(
            names(&graph, &paths),
            vec![vec!["S", "A", "FC"], vec!["S", "B", "FC"]]
        );

        let paths = finder.find_k_shortest_paths("S", &[fc, fc], 10);
        assert_eq!(paths.len(), 3);
        assert_eq!(graph.path_names(&paths[2]), vec!["S", "A", "B", "FC"]);

        assert!(finder.find_k_shortest_paths("S", &[fc], 0).is_empty());
    }

    /// N0..N(n-1) fully connected; FC reachable only through `feeders`
    fn dense_with_fc(n: usize, feeders: &[usize]) -> NetworkGraph {
        let mut nodes: Vec<NodeRecord> = (0..n)
            .map(|i| NodeRecord::new(format!("N{i}"), "Port", if i == 0 { 1 } else { 2 }, "C"))
            .collect();
        nodes.push(NodeRecord::new("FC", "FC", 3, "US"));
        let mut edges = Vec::new();
        for from in 0..n {
            for to in 0..n {
                if from != to {
                    edges.push(EdgeRecord::new(format!("N{from}"), format!("N{to}")));
                }
            }
        }
        for feeder in feeders {
            edges.push(EdgeRecord::new(format!("N{feeder}"), "FC"));
        }
        NetworkBuilder::new().build(&nodes, &edges).unwrap()
    }

    #[test]
    fn test_k_shortest_skips_unreachable_destination() {
        let graph = dense_with_fc(12, &[]);
        let fc = graph.index_of("FC").unwrap();
        let finder = PathFinder::new(&graph);
        assert!(finder.find_k_shortest_paths("N0", &[fc], 3).is_empty());

        let diamond = diamond();
        let fc2 = diamond.index_of("FC2").unwrap();
        assert!(PathFinder::new(&diamond).find_k_shortest_paths("A", &[fc2], 5).is_empty());
    }

    #[test]
    fn test_k_shortest_in_dense_graph() {
        let graph = dense_with_fc(12, &[1]);
        let n1 = graph.index_of("N1").unwrap();
        let fc = graph.index_of("FC").unwrap();

        let paths = PathFinder::new(&graph).find_k_shortest_paths("N0", &[fc], 3);
        let lengths: Vec<usize> = paths.iter().map(Vec::len).collect();
        assert_eq!(lengths, vec![3, 4, 4]);
        assert_eq!(graph.path_names(&paths[0]), vec!["N0", "N1", "FC"]);
        assert!(paths.iter().all(|p| p[p.len() - 2] == n1));
        assert_ne!(paths[1], paths[2]);
    }

    #[test]
    fn test_validate_path_and_edges() {
        let graph = diamond();
        let finder = PathFinder::new(&graph);
        let path = graph.resolve_path(&["S", "A", "B"]).unwrap();
        assert!(finder.validate_path(&path));
        assert_eq!(path_edges(&path), vec![(path[0], path[1]), (path[1], path[2])]);

        let broken = graph.resolve_path(&["S", "FC"]).unwrap();
        assert!(!finder.validate_path(&broken));
        assert!(!finder.validate_path(&path[..1]));
    }
}
