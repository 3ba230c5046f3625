use supplyroute_model::ModelError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error(transparent)]
    InvalidRecord(#[from] ModelError),

    #[error("Network has no nodes")]
    EmptyNetwork,

    #[error("Duplicate node identifier: {0}")]
    DuplicateNode(String),

    #[error("Edge {from} -> {to} references unknown node: {missing}")]
    UnknownNode {
        from: String,
        to: String,
        missing: String,
    },

    #[error("No supplier nodes found (stage 1)")]
    NoSupplierNodes,

    #[error("No FC nodes found (highest stage)")]
    NoTerminalNodes,

    #[error("No path exists from suppliers to FCs (stage {0})")]
    Disconnected(u8),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("No edge between {from} and {to}")]
    MissingEdge { from: String, to: String },
}
