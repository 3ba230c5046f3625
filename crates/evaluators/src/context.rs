use std::collections::BTreeMap;
use supplyroute_model::{Chunk, MethodSpec, MetricKind};

/// Supplemental data keys filled in by the path evaluator
pub mod keys {
    pub const NODE_GROUP: &str = "node_group";
    pub const CLUSTER: &str = "cluster";
    pub const FROM_CLUSTER: &str = "from_cluster";
    pub const TO_CLUSTER: &str = "to_cluster";
}

/// Entity a method is evaluated on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalTarget<'a> {
    Node(&'a str),
    Edge { from: &'a str, to: &'a str },
}

/// One evaluator invocation. Built fresh per call and dropped afterwards.
#[derive(Debug, Clone)]
pub struct EvaluationContext<'a> {
    pub chunk: &'a Chunk,
    pub method: &'a MethodSpec,
    pub metric: MetricKind,
    pub target: EvalTarget<'a>,
    supplemental: BTreeMap<&'static str, &'a str>,
}

impl<'a> EvaluationContext<'a> {
    pub fn for_node(
        chunk: &'a Chunk,
        node: &'a str,
        method: &'a MethodSpec,
        metric: MetricKind,
    ) -> Self {
        Self {
            chunk,
            method,
            metric,
            target: EvalTarget::Node(node),
            supplemental: BTreeMap::new(),
        }
    }

    pub fn for_edge(
        chunk: &'a Chunk,
        from: &'a str,
        to: &'a str,
        method: &'a MethodSpec,
        metric: MetricKind,
    ) -> Self {
        Self {
            chunk,
            method,
            metric,
            target: EvalTarget::Edge { from, to },
            supplemental: BTreeMap::new(),
        }
    }

    pub fn with_data(mut self, key: &'static str, value: &'a str) -> Self {
        self.supplemental.insert(key, value);
        self
    }

    /// Supplemental value, empty when absent
    pub fn data(&self, key: &str) -> &'a str {
        self.supplemental.get(key).copied().unwrap_or("")
    }

    /// Deterministic memoization key:
    /// `method:entity[:entity]:qty:oversize:sku`.
    ///
    /// Two chunks of the same SKU and quantity share keys; supplemental data
    /// is derived from the entity and is not part of the key.
    pub fn cache_key(&self) -> String {
        let product = self.chunk.product();
        let entity = match self.target {
            EvalTarget::Node(node) => node.to_string(),
            EvalTarget::Edge { from, to } => format!("{from}:{to}"),
        };
        format!(
            "{}:{}:{}:{}:{}",
            self.method,
            entity,
            product.qty(),
            u8::from(product.is_oversize()),
            product.sku()
        )
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::chunk;
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_cache_key_format() {
        let chunk = chunk("TEST1", 100, false);
        let method = MethodSpec::Named("cluster_costs".to_string());

        let ctx = EvaluationContext::for_edge(&chunk, "Port1", "Port2", &method, MetricKind::Cost);
        assert_eq!(ctx.cache_key(), "cluster_costs:Port1:Port2:100:0:TEST1");

        let fixed = MethodSpec::Fixed(21.0);
        let ctx = EvaluationContext::for_node(&chunk, "Port1", &fixed, MetricKind::LeadTime);
        assert_eq!(ctx.cache_key(), "21:Port1:100:0:TEST1");
    }

    #[test]
    fn test_cache_key_ignores_chunk_identity() {
        let a = chunk("SKU", 5, true);
        let b = Chunk::new("other-id", Arc::new(a.product().clone()));
        let method = MethodSpec::Named("wh_cost".to_string());
        let key_a = EvaluationContext::for_node(&a, "WH", &method, MetricKind::Cost).cache_key();
        let key_b = EvaluationContext::for_node(&b, "WH", &method, MetricKind::Cost).cache_key();
        assert_eq!(key_a, key_b);
        assert!(key_a.ends_with(":5:1:SKU"));
    }

    #[test]
    fn test_supplemental_data() {
        let chunk = chunk("S", 1, false);
        let method = MethodSpec::NoOp;
        let ctx = EvaluationContext::for_edge(&chunk, "A", "B", &method, MetricKind::Cost)
            .with_data(keys::FROM_CLUSTER, "CN")
            .with_data(keys::TO_CLUSTER, "US_West");
        assert_eq!(ctx.data(keys::FROM_CLUSTER), "CN");
        assert_eq!(ctx.data(keys::TO_CLUSTER), "US_West");
        assert_eq!(ctx.data(keys::CLUSTER), "");
    }
}
