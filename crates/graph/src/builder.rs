use crate::error::{GraphError, Result};
use crate::types::{NetworkEdge, NetworkGraph, NetworkNode};
use supplyroute_model::{EdgeRecord, NodeRecord};

/// Build the network graph from loaded node and edge records
#[derive(Debug, Clone, Default)]
pub struct NetworkBuilder {
    require_connectivity: bool,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also run [`NetworkGraph::validate_connectivity`] as part of `build`.
    pub fn require_connectivity(mut self, enabled: bool) -> Self {
        self.require_connectivity = enabled;
        self
    }

    /// Build graph from records.
    ///
    /// Fails when a record is invalid, a node identifier repeats, or an edge
    /// references a node that is not in `nodes`. Method identifiers are
    /// resolved into descriptors here, once.
    pub fn build(&self, nodes: &[NodeRecord], edges: &[EdgeRecord]) -> Result<NetworkGraph> {
        if nodes.is_empty() {
            return Err(GraphError::EmptyNetwork);
        }

        let mut graph = NetworkGraph::new();

        // Phase 1: nodes
        for record in nodes {
            let record = record.clone().normalize()?;
            if graph.index_of(&record.name).is_some() {
                return Err(GraphError::DuplicateNode(record.name));
            }
            let methods = record.methods();
            graph.add_node(NetworkNode {
                name: record.name,
                node_group: record.node_group,
                stage: record.stage,
                cluster: record.cluster,
                methods,
            });
        }

        // Phase 2: edges, with integrity check on both endpoints
        for record in edges {
            let record = record.clone().normalize()?;
            let endpoint = |name: &str| {
                graph.index_of(name).ok_or_else(|| GraphError::UnknownNode {
                    from: record.node1.clone(),
                    to: record.node2.clone(),
                    missing: name.to_string(),
                })
            };
            let from = endpoint(&record.node1)?;
            let to = endpoint(&record.node2)?;

            if graph.edge(from, to).is_some() {
                log::debug!(
                    "Edge {} -> {} repeated; keeping the last definition",
                    record.node1,
                    record.node2
                );
            }
            graph.add_edge(
                from,
                to,
                NetworkEdge {
                    methods: record.methods(),
                },
            );
        }

        log::info!(
            "Built network graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        if self.require_connectivity {
            graph.validate_connectivity()?;
        }

        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use supplyroute_model::{MethodSpec, ModelError};

    fn nodes() -> Vec<NodeRecord> {
        vec![
            NodeRecord::new("", "Supplier", 1, "Source"),
            NodeRecord::new("Port1", "Source Port", 2, "CN").with_cost_method("wh_cost"),
            NodeRecord::new("FC", "FC", 4, "US"),
        ]
    }

    #[test]
    fn test_build_resolves_methods() {
        let edges = vec![
            EdgeRecord::new("Supplier", "Port1").with_lt_method("7"),
            EdgeRecord::new("Port1", "FC").with_cost_method("cluster_costs"),
        ];
        let graph = NetworkBuilder::new().build(&nodes(), &edges).unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);

        let port = graph.node_by_name("Port1").unwrap();
        assert_eq!(port.methods.cost, MethodSpec::Named("wh_cost".to_string()));
        assert!(port.methods.feasibility.is_noop());

        let supplier = graph.index_of("Supplier").unwrap();
        let port = graph.index_of("Port1").unwrap();
        let edge = graph.edge(supplier, port).unwrap();
        assert_eq!(edge.methods.lead_time, MethodSpec::Fixed(7.0));
        assert!(edge.methods.cost.is_noop());
    }

    #[test]
    fn test_unknown_edge_endpoint() {
        let edges = vec![EdgeRecord::new("Supplier", "Ghost")];
        let err = NetworkBuilder::new().build(&nodes(), &edges).unwrap_err();
        assert_eq!(
            err,
            GraphError::UnknownNode {
                from: "Supplier".to_string(),
                to: "Ghost".to_string(),
                missing: "Ghost".to_string(),
            }
        );
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut nodes = nodes();
        nodes.push(NodeRecord::new("FC", "FC", 4, "US_East"));
        let err = NetworkBuilder::new().build(&nodes, &[]).unwrap_err();
        assert_eq!(err, GraphError::DuplicateNode("FC".to_string()));
    }

    #[test]
    fn test_invalid_record_rejected() {
        let mut nodes = nodes();
        nodes.push(NodeRecord::new("Bad", "FC", 9, "US"));
        let err = NetworkBuilder::new().build(&nodes, &[]).unwrap_err();
        assert!(matches!(err, GraphError::InvalidRecord(ModelError::InvalidNode { .. })));
    }

    #[test]
    fn test_empty_network_rejected() {
        assert_eq!(
            NetworkBuilder::new().build(&[], &[]).unwrap_err(),
            GraphError::EmptyNetwork
        );
    }

    #[test]
    fn test_repeated_edge_keeps_last() {
        let edges = vec![
            EdgeRecord::new("Supplier", "FC").with_cost_method("10"),
            EdgeRecord::new("Supplier", "FC").with_cost_method("20"),
        ];
        let graph = NetworkBuilder::new().build(&nodes(), &edges).unwrap();
        assert_eq!(graph.edge_count(), 1);

        let from = graph.index_of("Supplier").unwrap();
        let to = graph.index_of("FC").unwrap();
        assert_eq!(graph.edge(from, to).unwrap().methods.cost, MethodSpec::Fixed(20.0));
    }

    #[test]
    fn test_require_connectivity() {
        let builder = NetworkBuilder::new().require_connectivity(true);
        assert_eq!(
            builder.build(&nodes(), &[]).unwrap_err(),
            GraphError::Disconnected(4)
        );
        assert!(builder
            .build(&nodes(), &[EdgeRecord::new("Supplier", "FC")])
            .is_ok());
    }
}
