use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::collections::HashMap;
use supplyroute_model::MethodSet;

/// Facility in the distribution network
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkNode {
    /// Unique identifier (e.g., "Shanghai", "Supplier")
    pub name: String,

    /// Node type label (e.g., "Source Port", "FC")
    pub node_group: String,

    /// Position in the network, supplier = 1
    pub stage: u8,

    /// Geographic/operational grouping used by cluster lookups
    pub cluster: String,

    /// Resolved cost, feasibility and lead-time methods
    pub methods: MethodSet,
}

/// Directed lane between two facilities
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkEdge {
    pub methods: MethodSet,
}

/// Directed network with an identifier index.
///
/// Read-only once built; share it behind `&` or `Arc` across workers.
#[derive(Debug, Clone)]
pub struct NetworkGraph {
    pub(crate) graph: DiGraph<NetworkNode, NetworkEdge>,

    /// Node identifier -> NodeIndex mapping for fast lookup
    pub(crate) name_index: HashMap<String, NodeIndex>,
}

impl NetworkGraph {
    pub(crate) fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            name_index: HashMap::new(),
        }
    }

    /// Add node to graph; the caller guarantees the name is new.
    pub(crate) fn add_node(&mut self, node: NetworkNode) -> NodeIndex {
        let name = node.name.clone();
        let idx = self.graph.add_node(node);
        self.name_index.insert(name, idx);
        idx
    }

    /// Add edge, replacing the methods of an existing edge between the same pair.
    pub(crate) fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, edge: NetworkEdge) {
        self.graph.update_edge(from, to, edge);
    }

    /// Underlying petgraph structure
    pub fn inner(&self) -> &DiGraph<NetworkNode, NetworkEdge> {
        &self.graph
    }

    /// Find node by identifier
    pub fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.name_index.get(name).copied()
    }

    /// Get node data
    pub fn node(&self, idx: NodeIndex) -> Option<&NetworkNode> {
        self.graph.node_weight(idx)
    }

    pub fn node_by_name(&self, name: &str) -> Option<&NetworkNode> {
        self.index_of(name).and_then(|idx| self.node(idx))
    }

    /// Get edge data between two nodes
    pub fn edge(&self, from: NodeIndex, to: NodeIndex) -> Option<&NetworkEdge> {
        self.graph
            .find_edge(from, to)
            .and_then(|e| self.graph.edge_weight(e))
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &NetworkNode)> {
        self.graph
            .node_indices()
            .filter_map(move |idx| self.graph.node_weight(idx).map(|node| (idx, node)))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
