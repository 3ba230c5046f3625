use supplyroute_evaluators::EvaluatorError;
use supplyroute_graph::GraphError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AllocationError>;

/// Setup and evaluation failures
#[derive(Error, Debug)]
pub enum AllocationError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Evaluator(#[from] EvaluatorError),

    #[error("Invalid allocation config: {0}")]
    InvalidConfig(String),
}

/// Why a chunk produced no allocation. Not fatal; the run continues.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AllocationMiss {
    #[error("Chunk {chunk_id}: origin {origin} is not in the network")]
    UnknownOrigin { chunk_id: String, origin: String },

    #[error("No paths found for chunk {chunk_id}")]
    NoPath { chunk_id: String },

    #[error("No feasible path found for chunk {chunk_id} ({candidates} candidates)")]
    NoFeasiblePath { chunk_id: String, candidates: usize },

    /// A candidate path could not be evaluated
    #[error("Chunk {chunk_id}: {source}")]
    Evaluation {
        chunk_id: String,
        #[source]
        source: GraphError,
    },
}

impl AllocationMiss {
    pub fn chunk_id(&self) -> &str {
        match self {
            Self::UnknownOrigin { chunk_id, .. }
            | Self::NoPath { chunk_id }
            | Self::NoFeasiblePath { chunk_id, .. }
            | Self::Evaluation { chunk_id, .. } => chunk_id,
        }
    }
}
