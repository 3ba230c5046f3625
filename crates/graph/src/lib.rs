//! # SupplyRoute Graph
//!
//! Staged distribution network and bounded path enumeration.
//!
//! ## Architecture
//!
//! ```text
//! NodeRecord[] + EdgeRecord[]
//!     │
//!     ├──> Network Builder
//!     │      ├─ Normalize and validate records
//!     │      ├─ Reject unknown edge endpoints
//!     │      └─ Resolve method identifiers once
//!     │
//!     ├──> Network Graph (petgraph)
//!     │      ├─ Nodes: facilities (stage, cluster, methods)
//!     │      └─ Edges: lanes (methods)
//!     │
//!     └──> Path Finder
//!            ├─ Terminal set = max-stage nodes
//!            ├─ Depth-first simple paths, hop bounded
//!            └─ k-shortest paths per destination
//! ```

mod builder;
mod error;
mod graph;
mod paths;
mod types;

pub use builder::NetworkBuilder;
pub use error::{GraphError, Result};
pub use graph::NetworkStats;
pub use paths::{path_edges, NodePath, PathFinder, DEFAULT_MAX_HOPS};
pub use petgraph::graph::NodeIndex;
pub use types::{NetworkEdge, NetworkGraph, NetworkNode};
