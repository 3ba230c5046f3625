//! # SupplyRoute Allocation
//!
//! Picks, for every inventory chunk, the feasible path from its origin to a
//! fulfillment center with the highest cm3 score.
//!
//! ```text
//! Chunk ──PathFinder──> candidate paths
//!        ──PathEvaluator (cached evaluator calls)──> PathEvaluation[]
//!        ──select_best (feasible, max score, tie-break)──> AllocationResult
//! ```
//!
//! Chunks with no path or no feasible path produce an [`AllocationMiss`]
//! instead of a result; the run carries on.

mod allocator;
mod config;
mod error;
mod path_eval;

pub use allocator::{select_best, AllocationReport, Allocator};
pub use config::{AllocationConfig, TieBreak, MAX_HOPS_LIMIT};
pub use error::{AllocationError, AllocationMiss, Result};
pub use path_eval::PathEvaluator;
