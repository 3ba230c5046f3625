//! # SupplyRoute Model
//!
//! Records and value types shared by every layer of the allocation engine.
//!
//! ## Records
//!
//! ```text
//! ProductRecord ──validate──> Product ──Arc──> Chunk
//! NodeRecord / EdgeRecord ──normalize──> MethodSet (resolved once)
//!
//! PathEvaluation ──select──> AllocationResult
//! ```
//!
//! Raw records mirror the normalized columns produced by the loading layer.
//! Method identifiers stay strings on the records and are resolved into
//! [`MethodSpec`] descriptors when the network is built.

mod error;
mod evaluation;
mod network;
mod product;

pub use error::{ModelError, Result};
pub use evaluation::{cm3_score, AllocationResult, EvalValue, PathEvaluation, StepEntity, TraceStep};
pub use network::{
    EdgeRecord, MethodSet, MethodSpec, MetricKind, NodeRecord, MAX_STAGE, MIN_STAGE,
};
pub use product::{Chunk, Product, ProductRecord, DEFAULT_ORIGIN};
