use crate::config::EvaluatorConfig;
use crate::context::{keys, EvaluationContext};
use crate::error::{EvaluatorError, Result};
use crate::evaluator::Evaluator;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use supplyroute_model::{EvalValue, MethodSpec, MetricKind};

/// Named policies understood by [`SimpleEvaluator`]
pub mod methods {
    pub const CLUSTER_COSTS: &str = "cluster_costs";
    pub const CLUSTER_LTS: &str = "cluster_LTs";
    pub const CLUSTER_FEAS: &str = "cluster_feas";
    pub const WH_COST: &str = "wh_cost";
}

/// Base freight rate per thousand units, by (from, to) cluster
const CLUSTER_RATES: &[(&str, &str, f64)] = &[
    ("CN", "US_West", 1200.0),
    ("CN", "US_East", 1500.0),
    ("US_West", "US_East", 300.0),
    ("3PL_East", "US_East", 50.0),
];
const DEFAULT_CLUSTER_RATE: f64 = 100.0;

/// Transit days by (from, to) cluster
const CLUSTER_TRANSIT_DAYS: &[(&str, &str, u32)] = &[
    ("CN", "US_West", 21),
    ("CN", "US_East", 28),
    ("US_West", "US_East", 5),
    ("3PL_East", "US_East", 2),
];
const DEFAULT_TRANSIT_DAYS: u32 = 7;

fn lookup<T: Copy>(table: &[(&str, &str, T)], from: &str, to: &str) -> Option<T> {
    table
        .iter()
        .find(|(f, t, _)| *f == from && *t == to)
        .map(|&(_, _, value)| value)
}

/// Type-specific parameters of the simple evaluator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimpleParams {
    /// Storage cost per unit per day
    pub storage_rate: f64,

    /// Assumed warehouse dwell, in days
    pub storage_days: f64,

    /// Destination clusters able to receive oversize product
    pub oversize_clusters: Vec<String>,
}

impl Default for SimpleParams {
    fn default() -> Self {
        Self {
            storage_rate: 0.10,
            storage_days: 7.0,
            oversize_clusters: vec!["US_West".to_string(), "US_East".to_string()],
        }
    }
}

impl SimpleParams {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.storage_rate.is_finite() || self.storage_rate < 0.0 {
            return Err(format!(
                "storage_rate must be a non-negative number, got {}",
                self.storage_rate
            ));
        }
        if !self.storage_days.is_finite() || self.storage_days < 0.0 {
            return Err(format!(
                "storage_days must be a non-negative number, got {}",
                self.storage_days
            ));
        }
        Ok(())
    }
}

/// Fixed values plus four built-in cluster/warehouse policies.
///
/// Dispatch order: fixed literal, no-op sentinel, named policy, then a
/// silent `0.0` fallback for unrecognized names. Fallbacks are logged once
/// per name and counted.
#[derive(Debug)]
pub struct SimpleEvaluator {
    params: SimpleParams,
    fallbacks: AtomicU64,
    unknown_methods: Mutex<HashSet<String>>,
}

impl SimpleEvaluator {
    pub const TYPE_NAME: &'static str = "simple";

    pub fn new(params: SimpleParams) -> Self {
        Self {
            params,
            fallbacks: AtomicU64::new(0),
            unknown_methods: Mutex::new(HashSet::new()),
        }
    }

    pub fn from_config(config: &EvaluatorConfig) -> Result<Self> {
        let params: SimpleParams = config.params()?;
        params.validate().map_err(EvaluatorError::invalid_config)?;
        Ok(Self::new(params))
    }

    pub fn params(&self) -> &SimpleParams {
        &self.params
    }

    fn cluster_cost(&self, context: &EvaluationContext<'_>) -> f64 {
        let from = context.data(keys::FROM_CLUSTER);
        let to = context.data(keys::TO_CLUSTER);
        let rate = lookup(CLUSTER_RATES, from, to).unwrap_or(DEFAULT_CLUSTER_RATE);
        rate * (f64::from(context.chunk.qty()) / 1000.0)
    }

    fn cluster_lead_time(&self, context: &EvaluationContext<'_>) -> f64 {
        let from = context.data(keys::FROM_CLUSTER);
        let to = context.data(keys::TO_CLUSTER);
        f64::from(lookup(CLUSTER_TRANSIT_DAYS, from, to).unwrap_or(DEFAULT_TRANSIT_DAYS))
    }

    fn cluster_feasible(&self, context: &EvaluationContext<'_>) -> bool {
        if !context.chunk.product().is_oversize() {
            return true;
        }
        let to = context.data(keys::TO_CLUSTER);
        self.params.oversize_clusters.iter().any(|c| c == to)
    }

    fn warehouse_cost(&self, context: &EvaluationContext<'_>) -> f64 {
        f64::from(context.chunk.qty()) * self.params.storage_rate * self.params.storage_days
    }

    fn fallback(&self, name: &str) -> EvalValue {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
        let first_time = self
            .unknown_methods
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string());
        if first_time {
            log::warn!("Unknown evaluator method {name:?}; using default value 0.0");
        }
        EvalValue::Number(0.0)
    }
}

impl Default for SimpleEvaluator {
    fn default() -> Self {
        Self::new(SimpleParams::default())
    }
}

impl Evaluator for SimpleEvaluator {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn evaluate(&self, context: &EvaluationContext<'_>) -> EvalValue {
        match context.method {
            MethodSpec::Fixed(value) => EvalValue::Number(*value),
            MethodSpec::NoOp => match context.metric {
                MetricKind::Feasibility => EvalValue::Flag(true),
                MetricKind::Cost | MetricKind::LeadTime => EvalValue::Number(0.0),
            },
            MethodSpec::Named(name) => match name.as_str() {
                methods::CLUSTER_COSTS => self.cluster_cost(context).into(),
                methods::CLUSTER_LTS => self.cluster_lead_time(context).into(),
                methods::CLUSTER_FEAS => self.cluster_feasible(context).into(),
                methods::WH_COST => self.warehouse_cost(context).into(),
                other => self.fallback(other),
            },
        }
    }

    fn fallback_count(&self) -> u64 {
        self.fallbacks.load(Ordering::Relaxed)
    }
}
