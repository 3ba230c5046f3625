use crate::error::{ModelError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest valid stage (supplier).
pub const MIN_STAGE: u8 = 1;
/// Highest valid stage (fulfillment center).
pub const MAX_STAGE: u8 = 5;

const SUPPLIER_GROUP: &str = "Supplier";

fn default_zero_method() -> String {
    "0".to_string()
}

fn default_one_method() -> String {
    "1".to_string()
}

/// Which quantity a method computes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Cost,
    Feasibility,
    LeadTime,
}

impl MetricKind {
    /// Evaluation order within a node or edge
    pub const ALL: [MetricKind; 3] = [Self::Cost, Self::Feasibility, Self::LeadTime];

    /// Raw identifier meaning "contributes nothing" for this metric.
    pub fn noop_token(self) -> &'static str {
        match self {
            Self::Cost | Self::LeadTime => "0",
            Self::Feasibility => "1",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cost => "cost",
            Self::Feasibility => "feasibility",
            Self::LeadTime => "lead_time",
        };
        f.write_str(name)
    }
}

/// Method descriptor resolved from a raw method identifier.
///
/// Exactly `"0"` resolves to [`MethodSpec::NoOp`] for cost and lead time,
/// exactly `"1"` for feasibility. Any other plain non-negative integer literal
/// is [`MethodSpec::Fixed`]; everything else, the empty string included,
/// names a policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MethodSpec {
    NoOp,
    Fixed(f64),
    Named(String),
}

impl MethodSpec {
    pub fn resolve(raw: &str, metric: MetricKind) -> Self {
        if raw == metric.noop_token() {
            return Self::NoOp;
        }
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(value) = raw.parse::<f64>() {
                return Self::Fixed(value);
            }
        }
        Self::Named(raw.to_string())
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp)
    }
}

impl fmt::Display for MethodSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoOp => f.write_str("noop"),
            Self::Fixed(value) => write!(f, "{value}"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Cost, feasibility and lead-time methods of one node or edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodSet {
    pub cost: MethodSpec,
    pub feasibility: MethodSpec,
    pub lead_time: MethodSpec,
}

impl MethodSet {
    pub fn resolve(cost: &str, feasibility: &str, lead_time: &str) -> Self {
        Self {
            cost: MethodSpec::resolve(cost, MetricKind::Cost),
            feasibility: MethodSpec::resolve(feasibility, MetricKind::Feasibility),
            lead_time: MethodSpec::resolve(lead_time, MetricKind::LeadTime),
        }
    }

    pub fn get(&self, metric: MetricKind) -> &MethodSpec {
        match metric {
            MetricKind::Cost => &self.cost,
            MetricKind::Feasibility => &self.feasibility,
            MetricKind::LeadTime => &self.lead_time,
        }
    }
}

impl Default for MethodSet {
    fn default() -> Self {
        Self {
            cost: MethodSpec::NoOp,
            feasibility: MethodSpec::NoOp,
            lead_time: MethodSpec::NoOp,
        }
    }
}

/// Node row as it arrives from the loading layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Node identifier; may be empty for the implicit supplier
    #[serde(default, alias = "node")]
    pub name: String,

    pub node_group: String,

    /// Position in the network, 1 (supplier) through 5 (fulfillment center)
    pub stage: u8,

    pub cluster: String,

    #[serde(default = "default_zero_method")]
    pub cost_method: String,

    #[serde(default = "default_one_method")]
    pub feasibility_method: String,

    #[serde(default = "default_zero_method")]
    pub lt_method: String,
}

impl NodeRecord {
    pub fn new(
        name: impl Into<String>,
        node_group: impl Into<String>,
        stage: u8,
        cluster: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            node_group: node_group.into(),
            stage,
            cluster: cluster.into(),
            cost_method: default_zero_method(),
            feasibility_method: default_one_method(),
            lt_method: default_zero_method(),
        }
    }

    pub fn with_cost_method(mut self, method: impl Into<String>) -> Self {
        self.cost_method = method.into();
        self
    }

    pub fn with_feasibility_method(mut self, method: impl Into<String>) -> Self {
        self.feasibility_method = method.into();
        self
    }

    pub fn with_lt_method(mut self, method: impl Into<String>) -> Self {
        self.lt_method = method.into();
        self
    }

    /// Trim the identifier, fill in the implicit supplier name and check
    /// the stage range.
    pub fn normalize(mut self) -> Result<Self> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            if self.node_group == SUPPLIER_GROUP {
                self.name = SUPPLIER_GROUP.to_string();
            } else {
                return Err(ModelError::node("", "node name cannot be empty"));
            }
        }
        if !(MIN_STAGE..=MAX_STAGE).contains(&self.stage) {
            return Err(ModelError::node(
                &self.name,
                format!(
                    "stage must be within {MIN_STAGE}..={MAX_STAGE}, got {}",
                    self.stage
                ),
            ));
        }
        Ok(self)
    }

    pub fn methods(&self) -> MethodSet {
        MethodSet::resolve(&self.cost_method, &self.feasibility_method, &self.lt_method)
    }
}

/// Edge row as it arrives from the loading layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    #[serde(alias = "node_1")]
    pub node1: String,

    #[serde(alias = "node_2")]
    pub node2: String,

    #[serde(default = "default_zero_method")]
    pub cost_method: String,

    #[serde(default = "default_one_method")]
    pub feasibility_method: String,

    #[serde(default = "default_zero_method")]
    pub lt_method: String,
}

impl EdgeRecord {
    pub fn new(node1: impl Into<String>, node2: impl Into<String>) -> Self {
        Self {
            node1: node1.into(),
            node2: node2.into(),
            cost_method: default_zero_method(),
            feasibility_method: default_one_method(),
            lt_method: default_zero_method(),
        }
    }

    pub fn with_cost_method(mut self, method: impl Into<String>) -> Self {
        self.cost_method = method.into();
        self
    }

    pub fn with_feasibility_method(mut self, method: impl Into<String>) -> Self {
        self.feasibility_method = method.into();
        self
    }

    pub fn with_lt_method(mut self, method: impl Into<String>) -> Self {
        self.lt_method = method.into();
        self
    }

    pub fn normalize(mut self) -> Result<Self> {
        self.node1 = self.node1.trim().to_string();
        self.node2 = self.node2.trim().to_string();
        if self.node1.is_empty() || self.node2.is_empty() {
            return Err(ModelError::edge(
                &self.node1,
                &self.node2,
                "edge endpoints cannot be empty",
            ));
        }
        Ok(self)
    }

    pub fn methods(&self) -> MethodSet {
        MethodSet::resolve(&self.cost_method, &self.feasibility_method, &self.lt_method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_resolution() {
        assert_eq!(MethodSpec::resolve("0", MetricKind::Cost), MethodSpec::NoOp);
        assert_eq!(MethodSpec::resolve("0", MetricKind::LeadTime), MethodSpec::NoOp);
        assert_eq!(MethodSpec::resolve("1", MetricKind::Feasibility), MethodSpec::NoOp);

        assert_eq!(MethodSpec::resolve("1", MetricKind::Cost), MethodSpec::Fixed(1.0));
        assert_eq!(MethodSpec::resolve("21", MetricKind::LeadTime), MethodSpec::Fixed(21.0));
        assert_eq!(MethodSpec::resolve("0", MetricKind::Feasibility), MethodSpec::Fixed(0.0));

        assert_eq!(
            MethodSpec::resolve("cluster_costs", MetricKind::Cost),
            MethodSpec::Named("cluster_costs".to_string())
        );
        assert_eq!(
            MethodSpec::resolve("-5", MetricKind::Cost),
            MethodSpec::Named("-5".to_string())
        );
        assert_eq!(
            MethodSpec::resolve("2.5", MetricKind::Cost),
            MethodSpec::Named("2.5".to_string())
        );
    }

    #[test]
    fn test_only_exact_sentinels_are_noops() {
        assert_eq!(
            MethodSpec::resolve("", MetricKind::Feasibility),
            MethodSpec::Named(String::new())
        );
        assert_eq!(MethodSpec::resolve("", MetricKind::Cost), MethodSpec::Named(String::new()));
        assert_eq!(
            MethodSpec::resolve(" 0", MetricKind::LeadTime),
            MethodSpec::Named(" 0".to_string())
        );
        assert_eq!(
            MethodSpec::resolve("1 ", MetricKind::Feasibility),
            MethodSpec::Named("1 ".to_string())
        );

        let methods = NodeRecord::new("FC", "FC", 5, "US_West")
            .with_feasibility_method("")
            .methods();
        assert_eq!(methods.feasibility, MethodSpec::Named(String::new()));
        assert!(methods.cost.is_noop());
    }

    #[test]
    fn test_method_display_is_identifier() {
        assert_eq!(MethodSpec::Fixed(21.0).to_string(), "21");
        assert_eq!(MethodSpec::Named("wh_cost".into()).to_string(), "wh_cost");
    }

    #[test]
    fn test_node_defaults_and_supplier_name() {
        let json = r#"{"name":"","node_group":"Supplier","stage":1,"cluster":"Source"}"#;
        let node: NodeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(node.cost_method, "0");
        assert_eq!(node.feasibility_method, "1");
        assert_eq!(node.lt_method, "0");

        let node = node.normalize().unwrap();
        assert_eq!(node.name, "Supplier");
        assert_eq!(node.methods(), MethodSet::default());
    }

    #[test]
    fn test_node_validation() {
        assert!(NodeRecord::new("Shanghai", "Source Port", 2, "CN").normalize().is_ok());
        assert!(NodeRecord::new("", "Warehouse", 4, "US").normalize().is_err());
        assert!(NodeRecord::new("X", "Warehouse", 0, "US").normalize().is_err());
        assert!(NodeRecord::new("X", "Warehouse", 6, "US").normalize().is_err());
    }

    #[test]
    fn test_edge_validation() {
        let edge = EdgeRecord::new(" Shanghai ", "Los Angeles")
            .with_cost_method("cluster_costs")
            .with_lt_method("21")
            .normalize()
            .unwrap();
        assert_eq!(edge.node1, "Shanghai");
        assert_eq!(edge.node2, "Los Angeles");
        assert_eq!(edge.methods().lead_time, MethodSpec::Fixed(21.0));

        assert!(EdgeRecord::new("", "B").normalize().is_err());
        assert!(EdgeRecord::new("A", "   ").normalize().is_err());
    }
}
