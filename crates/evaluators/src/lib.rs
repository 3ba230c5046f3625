//! # SupplyRoute Evaluators
//!
//! Method dispatch for cost, feasibility and lead time, plus the result cache.
//!
//! ```text
//! EvaluatorConfig ──> EvaluatorRegistry::create ──> Box<dyn Evaluator>
//!                                                      │
//! EvaluationContext (chunk, method, node|edge) ────────┤
//!                                                      ▼
//!                        EvaluationCache::get_or_compute(cache_key)
//! ```
//!
//! The registry is an ordinary value: construct it at startup, register any
//! additional evaluator types, then create the evaluator named in the config.

mod cache;
mod config;
mod context;
mod error;
mod evaluator;
mod registry;
mod simple;

pub use cache::{CacheStats, EvaluationCache};
pub use config::{EvaluatorConfig, MethodDescription};
pub use context::{keys, EvalTarget, EvaluationContext};
pub use error::{EvaluatorError, Result};
pub use evaluator::Evaluator;
pub use registry::EvaluatorRegistry;
pub use simple::{methods, SimpleEvaluator, SimpleParams};
