use crate::network::MetricKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Output of a single evaluator invocation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EvalValue {
    Flag(bool),
    Number(f64),
}

impl EvalValue {
    /// Numeric view; flags count as 1/0.
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Flag(flag) => f64::from(u8::from(flag)),
            Self::Number(value) => value,
        }
    }

    /// Truthiness; numbers are true when non-zero.
    pub fn as_bool(self) -> bool {
        match self {
            Self::Flag(flag) => flag,
            Self::Number(value) => value != 0.0,
        }
    }

    /// Whole days; fractions truncate and negatives clamp to zero.
    pub fn as_days(self) -> u32 {
        // Float-to-int `as` truncates and saturates.
        self.as_f64() as u32
    }
}

impl From<f64> for EvalValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for EvalValue {
    fn from(flag: bool) -> Self {
        Self::Flag(flag)
    }
}

/// Node or edge a trace step was evaluated on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepEntity {
    Node { name: String },
    Edge { from: String, to: String },
}

/// One per-step contribution recorded while evaluating a path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    #[serde(flatten)]
    pub entity: StepEntity,
    pub metric: MetricKind,
    pub method: String,
    pub value: EvalValue,
}

/// Contribution margin per unit of path cost; +inf for free paths.
pub fn cm3_score(cm3: f64, total_cost: f64) -> f64 {
    if total_cost > 0.0 {
        cm3 / total_cost
    } else {
        f64::INFINITY
    }
}

/// Aggregated evaluation of one candidate path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathEvaluation {
    pub path: Vec<String>,
    pub total_cost: f64,
    pub total_lead_time: u32,
    pub feasible: bool,
    #[serde(with = "score_serde")]
    pub cm3_score: f64,
    /// Diagnostic trace; not used for selection
    #[serde(default)]
    pub evaluations: Vec<TraceStep>,
}

/// Winning path for a chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    pub chunk_id: String,

    #[serde(rename = "razin")]
    pub sku: String,

    pub selected_path: Vec<String>,
    pub total_cost: f64,
    pub total_lead_time: u32,

    #[serde(with = "score_serde")]
    pub cm3_score: f64,

    /// Estimated arrival: allocation time plus total lead time
    pub eta: DateTime<Utc>,

    pub feasible: bool,

    /// Reserved; never computed by the engine
    #[serde(default)]
    pub stockout_risk: bool,
}

/// JSON has no infinity: infinite scores are written as `null` and read back
/// as `+inf`.
mod score_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(score: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if score.is_finite() {
            serializer.serialize_f64(*score)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}
