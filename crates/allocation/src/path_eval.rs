use supplyroute_evaluators::{keys, EvaluationCache, EvaluationContext, Evaluator};
use supplyroute_graph::{GraphError, NetworkGraph, NodeIndex, Result};
use supplyroute_model::{
    cm3_score, Chunk, MethodSet, MethodSpec, MetricKind, PathEvaluation, StepEntity, TraceStep,
};

/// Running totals while walking a path
#[derive(Debug)]
struct Totals {
    cost: f64,
    lead_time: u32,
    feasible: bool,
    trace: Vec<TraceStep>,
}

impl Default for Totals {
    fn default() -> Self {
        Self {
            cost: 0.0,
            lead_time: 0,
            feasible: true,
            trace: Vec::new(),
        }
    }
}

/// Aggregates cost, lead time and feasibility along a path.
///
/// Nodes are evaluated first, in path order, then edges in path order. For
/// each entity the metrics run in cost, feasibility, lead-time order and
/// no-op methods are skipped. Feasibility does not short-circuit: the trace
/// always covers every non-no-op method.
pub struct PathEvaluator<'a> {
    graph: &'a NetworkGraph,
    evaluator: &'a dyn Evaluator,
    cache: &'a EvaluationCache,
}

impl<'a> PathEvaluator<'a> {
    pub fn new(
        graph: &'a NetworkGraph,
        evaluator: &'a dyn Evaluator,
        cache: &'a EvaluationCache,
    ) -> Self {
        Self {
            graph,
            evaluator,
            cache,
        }
    }

    pub fn evaluate_path(&self, chunk: &Chunk, path: &[NodeIndex]) -> Result<PathEvaluation> {
        let mut totals = Totals::default();

        for &idx in path {
            let node = self
                .graph
                .node(idx)
                .ok_or_else(|| GraphError::NodeNotFound(format!("#{}", idx.index())))?;
            self.apply_methods(
                &mut totals,
                &node.methods,
                StepEntity::Node {
                    name: node.name.clone(),
                },
                |method, metric| {
                    EvaluationContext::for_node(chunk, &node.name, method, metric)
                        .with_data(keys::NODE_GROUP, &node.node_group)
                        .with_data(keys::CLUSTER, &node.cluster)
                },
            );
        }

        for pair in path.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let (Some(from_node), Some(to_node)) = (self.graph.node(from), self.graph.node(to))
            else {
                return Err(GraphError::NodeNotFound(format!(
                    "#{} or #{}",
                    from.index(),
                    to.index()
                )));
            };
            let edge = self
                .graph
                .edge(from, to)
                .ok_or_else(|| GraphError::MissingEdge {
                    from: from_node.name.clone(),
                    to: to_node.name.clone(),
                })?;
            self.apply_methods(
                &mut totals,
                &edge.methods,
                StepEntity::Edge {
                    from: from_node.name.clone(),
                    to: to_node.name.clone(),
                },
                |method, metric| {
                    let (from, to) = (from_node.name.as_str(), to_node.name.as_str());
                    EvaluationContext::for_edge(chunk, from, to, method, metric)
                        .with_data(keys::FROM_CLUSTER, &from_node.cluster)
                        .with_data(keys::TO_CLUSTER, &to_node.cluster)
                },
            );
        }

        Ok(PathEvaluation {
            path: self.graph.path_names(path),
            total_cost: totals.cost,
            total_lead_time: totals.lead_time,
            feasible: totals.feasible,
            cm3_score: cm3_score(chunk.cm3(), totals.cost),
            evaluations: totals.trace,
        })
    }

    /// Evaluate a path given by node identifiers
    pub fn evaluate_named<S: AsRef<str>>(
        &self,
        chunk: &Chunk,
        path: &[S],
    ) -> Result<PathEvaluation> {
        let indices = self.graph.resolve_path(path)?;
        self.evaluate_path(chunk, &indices)
    }

    fn apply_methods<'m, F>(
        &self,
        totals: &mut Totals,
        methods: &'m MethodSet,
        entity: StepEntity,
        context_for: F,
    ) where
        F: Fn(&'m MethodSpec, MetricKind) -> EvaluationContext<'m>,
    {
        for metric in MetricKind::ALL {
            let method = methods.get(metric);
            if method.is_noop() {
                continue;
            }
            let context = context_for(method, metric);
            let value = self
                .cache
                .get_or_compute(&context.cache_key(), || self.evaluator.evaluate(&context));

            match metric {
                MetricKind::Cost => totals.cost += value.as_f64(),
                MetricKind::Feasibility => totals.feasible &= value.as_bool(),
                MetricKind::LeadTime => {
                    totals.lead_time = totals.lead_time.saturating_add(value.as_days())
                }
            }
            totals.trace.push(TraceStep {
                entity: entity.clone(),
                metric,
                method: method.to_string(),
                value,
            });
        }
    }
}
