use crate::context::EvaluationContext;
use supplyroute_model::EvalValue;

/// Computes cost, feasibility or lead time for one node or edge.
///
/// Implementations must be deterministic for a given cache key, since the
/// engine memoizes results by [`EvaluationContext::cache_key`].
pub trait Evaluator: Send + Sync {
    /// Registry type name this evaluator was built from
    fn type_name(&self) -> &str;

    fn evaluate(&self, context: &EvaluationContext<'_>) -> EvalValue;

    /// Number of evaluations that fell back to a default value because the
    /// method name was not recognized.
    fn fallback_count(&self) -> u64 {
        0
    }
}
