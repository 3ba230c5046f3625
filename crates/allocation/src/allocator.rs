use crate::config::{AllocationConfig, TieBreak};
use crate::error::{AllocationMiss, Result};
use crate::path_eval::PathEvaluator;
use chrono::{DateTime, Duration, Utc};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use supplyroute_evaluators::{EvaluationCache, Evaluator, EvaluatorConfig, EvaluatorRegistry};
use supplyroute_graph::{NetworkGraph, NodeIndex, PathFinder};
use supplyroute_model::{AllocationResult, Chunk, PathEvaluation, Product};

/// Outcome of one allocation run
#[derive(Debug, Clone, Default)]
pub struct AllocationReport {
    /// One result per allocated chunk, in chunk order
    pub results: Vec<AllocationResult>,
    /// Chunks that produced no result, in chunk order
    pub misses: Vec<AllocationMiss>,
}

impl AllocationReport {
    pub fn allocated(&self) -> usize {
        self.results.len()
    }

    pub fn total_cost(&self) -> f64 {
        self.results.iter().map(|r| r.total_cost).sum()
    }

    /// Mean lead time in days over allocated chunks, 0 when none
    pub fn average_lead_time(&self) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        let total: u64 = self.results.iter().map(|r| u64::from(r.total_lead_time)).sum();
        total as f64 / self.results.len() as f64
    }
}

/// Selects the best feasible path for each chunk.
///
/// Owns the evaluator and the evaluation cache; the network is shared and
/// read-only.
pub struct Allocator {
    graph: Arc<NetworkGraph>,
    evaluator: Box<dyn Evaluator>,
    cache: EvaluationCache,
    config: AllocationConfig,
}

impl fmt::Debug for Allocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Allocator")
            .field("nodes", &self.graph.node_count())
            .field("evaluator", &self.evaluator.type_name())
            .field("cache", &self.cache.stats())
            .field("config", &self.config)
            .finish()
    }
}

impl Allocator {
    pub fn new(
        graph: Arc<NetworkGraph>,
        evaluator: Box<dyn Evaluator>,
        config: AllocationConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            graph,
            evaluator,
            cache: EvaluationCache::new(),
            config,
        })
    }

    /// Build the evaluator named in `evaluator_config` through `registry`
    pub fn from_registry(
        graph: Arc<NetworkGraph>,
        registry: &EvaluatorRegistry,
        evaluator_config: &EvaluatorConfig,
        config: AllocationConfig,
    ) -> Result<Self> {
        let evaluator = registry.create(evaluator_config)?;
        Self::new(graph, evaluator, config)
    }

    pub fn graph(&self) -> &NetworkGraph {
        &self.graph
    }

    pub fn evaluator(&self) -> &dyn Evaluator {
        self.evaluator.as_ref()
    }

    pub fn cache(&self) -> &EvaluationCache {
        &self.cache
    }

    pub fn config(&self) -> &AllocationConfig {
        &self.config
    }

    /// Chunk every product (origin `Supplier`, ready today) and allocate to
    /// the network's terminal set.
    pub fn allocate_products(&self, products: &[Arc<Product>]) -> Vec<AllocationResult> {
        let chunks: Vec<Chunk> = products
            .iter()
            .map(|product| Chunk::from_product(Arc::clone(product)))
            .collect();
        self.allocate(&chunks, &self.graph.terminals())
    }

    /// Allocate chunks to `terminals`; chunks without a feasible path are
    /// logged and skipped.
    pub fn allocate(&self, chunks: &[Chunk], terminals: &[NodeIndex]) -> Vec<AllocationResult> {
        self.allocate_at(chunks, terminals, Utc::now())
    }

    /// Like [`Allocator::allocate`], with an explicit clock for ETAs
    pub fn allocate_at(
        &self,
        chunks: &[Chunk],
        terminals: &[NodeIndex],
        now: DateTime<Utc>,
    ) -> Vec<AllocationResult> {
        self.run(chunks, terminals, now).results
    }

    /// Allocate and keep the per-chunk misses
    pub fn run(
        &self,
        chunks: &[Chunk],
        terminals: &[NodeIndex],
        now: DateTime<Utc>,
    ) -> AllocationReport {
        let outcomes: Vec<std::result::Result<AllocationResult, AllocationMiss>> =
            if self.config.parallel {
                chunks
                    .par_iter()
                    .map(|chunk| self.allocate_chunk(chunk, terminals, now))
                    .collect()
            } else {
                chunks
                    .iter()
                    .map(|chunk| self.allocate_chunk(chunk, terminals, now))
                    .collect()
            };

        let mut report = AllocationReport::default();
        for outcome in outcomes {
            match outcome {
                Ok(result) => report.results.push(result),
                Err(miss) => {
                    log::warn!("{miss}");
                    report.misses.push(miss);
                }
            }
        }
        log::info!(
            "Allocated {} of {} chunks ({})",
            report.allocated(),
            chunks.len(),
            self.cache.stats()
        );
        report
    }

    /// Evaluate every candidate path for one chunk and pick the winner
    pub fn allocate_chunk(
        &self,
        chunk: &Chunk,
        terminals: &[NodeIndex],
        now: DateTime<Utc>,
    ) -> std::result::Result<AllocationResult, AllocationMiss> {
        if self.graph.index_of(chunk.origin()).is_none() {
            return Err(AllocationMiss::UnknownOrigin {
                chunk_id: chunk.chunk_id().to_string(),
                origin: chunk.origin().to_string(),
            });
        }

        let candidates = self.evaluate_candidates(chunk, terminals)?;
        if candidates.is_empty() {
            return Err(AllocationMiss::NoPath {
                chunk_id: chunk.chunk_id().to_string(),
            });
        }

        let total = candidates.len();
        let best = select_best(candidates, self.config.tie_break).ok_or_else(|| {
            AllocationMiss::NoFeasiblePath {
                chunk_id: chunk.chunk_id().to_string(),
                candidates: total,
            }
        })?;
        log::debug!(
            "Chunk {} ({}): selected {} out of {} candidates, score {}",
            chunk.chunk_id(),
            chunk.sku(),
            best.path.join(" -> "),
            total,
            best.cm3_score
        );

        let eta = now
            .checked_add_signed(Duration::days(i64::from(best.total_lead_time)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Ok(AllocationResult {
            chunk_id: chunk.chunk_id().to_string(),
            sku: chunk.sku().to_string(),
            eta,
            selected_path: best.path,
            total_cost: best.total_cost,
            total_lead_time: best.total_lead_time,
            cm3_score: best.cm3_score,
            feasible: true,
            stockout_risk: false,
        })
    }

    /// Enumerate and evaluate all bounded paths from the chunk's origin
    pub fn evaluate_candidates(
        &self,
        chunk: &Chunk,
        terminals: &[NodeIndex],
    ) -> std::result::Result<Vec<PathEvaluation>, AllocationMiss> {
        let paths = PathFinder::new(&self.graph)
            .with_max_hops(self.config.max_hops)
            .find_paths_to(chunk.origin(), terminals);

        let evaluator = PathEvaluator::new(&self.graph, self.evaluator.as_ref(), &self.cache);
        paths
            .iter()
            .map(|path| {
                evaluator
                    .evaluate_path(chunk, path)
                    .map_err(|source| AllocationMiss::Evaluation {
                        chunk_id: chunk.chunk_id().to_string(),
                        source,
                    })
            })
            .collect()
    }
}

/// Feasible path with the greatest score; ties resolved by `tie_break`.
/// NaN scores never win.
pub fn select_best(
    candidates: Vec<PathEvaluation>,
    tie_break: TieBreak,
) -> Option<PathEvaluation> {
    let mut best: Option<PathEvaluation> = None;
    for candidate in candidates {
        if !candidate.feasible || candidate.cm3_score.is_nan() {
            continue;
        }
        let replace = match &best {
            None => true,
            Some(current) => match candidate.cm3_score.partial_cmp(&current.cm3_score) {
                Some(Ordering::Greater) => true,
                Some(Ordering::Equal) => match tie_break {
                    TieBreak::Lexicographic => candidate.path < current.path,
                    TieBreak::FirstEncountered => false,
                },
                _ => false,
            },
        };
        if replace {
            best = Some(candidate);
        }
    }
    best
}
