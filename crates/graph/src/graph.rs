use crate::error::{GraphError, Result};
use crate::types::NetworkGraph;
use petgraph::algo::{connected_components, has_path_connecting};
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use supplyroute_model::MIN_STAGE;

/// Diagnostic summary of the network; not used by allocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkStats {
    pub total_nodes: usize,
    pub total_edges: usize,

    /// Stage -> node identifiers at that stage, in insertion order
    pub stages: BTreeMap<u8, Vec<String>>,

    /// True when the graph is weakly connected
    pub is_connected: bool,
}

impl fmt::Display for NetworkStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nodes, {} edges, connected: {}",
            self.total_nodes, self.total_edges, self.is_connected
        )?;
        for (stage, names) in &self.stages {
            write!(f, "\n  stage {stage}: {}", names.join(", "))?;
        }
        Ok(())
    }
}

impl NetworkGraph {
    /// Direct successors in edge insertion order
    pub fn successors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        // petgraph walks adjacency newest-first; sort to keep enumeration stable.
        let mut out: Vec<_> = self
            .graph
            .edges(node)
            .map(|e| (e.id(), e.target()))
            .collect();
        out.sort_by_key(|&(id, _)| id);
        out.into_iter().map(|(_, target)| target).collect()
    }

    /// Highest stage value present, if any node exists
    pub fn max_stage(&self) -> Option<u8> {
        self.nodes().map(|(_, node)| node.stage).max()
    }

    pub fn nodes_at_stage(&self, stage: u8) -> Vec<NodeIndex> {
        self.nodes()
            .filter(|(_, node)| node.stage == stage)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Terminal set: every node at the maximum stage
    pub fn terminals(&self) -> Vec<NodeIndex> {
        self.max_stage()
            .map(|stage| self.nodes_at_stage(stage))
            .unwrap_or_default()
    }

    /// Convert an index path into node identifiers
    pub fn path_names(&self, path: &[NodeIndex]) -> Vec<String> {
        path.iter()
            .filter_map(|&idx| self.node(idx))
            .map(|node| node.name.clone())
            .collect()
    }

    /// Resolve identifiers into an index path
    pub fn resolve_path<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<NodeIndex>> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.index_of(name)
                    .ok_or_else(|| GraphError::NodeNotFound(name.to_string()))
            })
            .collect()
    }

    /// Check that suppliers and FCs exist and at least one supplier reaches an FC
    pub fn validate_connectivity(&self) -> Result<()> {
        let suppliers = self.nodes_at_stage(MIN_STAGE);
        if suppliers.is_empty() {
            return Err(GraphError::NoSupplierNodes);
        }

        let Some(max_stage) = self.max_stage() else {
            return Err(GraphError::NoTerminalNodes);
        };
        let terminals = self.nodes_at_stage(max_stage);
        if terminals.is_empty() {
            return Err(GraphError::NoTerminalNodes);
        }

        let reachable = suppliers.iter().any(|&supplier| {
            terminals
                .iter()
                .any(|&fc| has_path_connecting(&self.graph, supplier, fc, None))
        });
        if !reachable {
            return Err(GraphError::Disconnected(max_stage));
        }

        Ok(())
    }

    pub fn stats(&self) -> NetworkStats {
        let mut stages: BTreeMap<u8, Vec<String>> = BTreeMap::new();
        for (_, node) in self.nodes() {
            stages.entry(node.stage).or_default().push(node.name.clone());
        }

        NetworkStats {
            total_nodes: self.node_count(),
            total_edges: self.edge_count(),
            stages,
            // Undirected component count over a directed graph = weak connectivity
            is_connected: self.node_count() > 0 && connected_components(&self.graph) == 1,
        }
    }
}
