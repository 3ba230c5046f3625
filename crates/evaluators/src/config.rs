use crate::error::{EvaluatorError, Result};
use crate::simple::{methods, SimpleEvaluator};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Descriptive entry for a named method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescription {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub description: String,
}

impl MethodDescription {
    fn new(kind: &str, description: &str) -> Self {
        Self {
            kind: kind.to_string(),
            description: description.to_string(),
        }
    }
}

/// Evaluator configuration, usually loaded from `config/evaluators.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    #[serde(default = "default_evaluator_type")]
    pub evaluator_type: String,

    /// Documentation of the named methods; not consulted during dispatch
    #[serde(default)]
    pub evaluators: BTreeMap<String, MethodDescription>,

    /// Type-specific parameters
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub params: serde_json::Value,
}

fn default_evaluator_type() -> String {
    SimpleEvaluator::TYPE_NAME.to_string()
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        let evaluators = BTreeMap::from([
            (
                methods::CLUSTER_COSTS.to_string(),
                MethodDescription::new("expression", "Calculate cost based on cluster pair"),
            ),
            (
                methods::CLUSTER_LTS.to_string(),
                MethodDescription::new("lookup", "Look up lead time by cluster pair"),
            ),
            (
                methods::CLUSTER_FEAS.to_string(),
                MethodDescription::new("rule", "Check feasibility rules"),
            ),
            (
                methods::WH_COST.to_string(),
                MethodDescription::new("calculation", "Calculate warehouse storage cost"),
            ),
        ]);
        Self {
            evaluator_type: default_evaluator_type(),
            evaluators,
            params: serde_json::Value::Null,
        }
    }
}

impl EvaluatorConfig {
    /// Load from a JSON file. A path that does not exist yields the default
    /// configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!(
                "Evaluator config {} not found, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|source| EvaluatorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&raw).map_err(|e| match e {
            EvaluatorError::InvalidConfig(msg) => {
                EvaluatorError::InvalidConfig(format!("{}: {msg}", path.display()))
            }
            other => other,
        })?;
        log::debug!(
            "Loaded evaluator config from {} (type {})",
            path.display(),
            config.evaluator_type
        );
        Ok(config)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| EvaluatorError::invalid_config(e.to_string()))
    }

    /// Deserialize `params` into a type-specific struct. Absent params yield
    /// `T::default()`.
    pub fn params<T: DeserializeOwned + Default>(&self) -> Result<T> {
        if self.params.is_null() {
            return Ok(T::default());
        }
        T::deserialize(&self.params)
            .map_err(|e| EvaluatorError::invalid_config(format!("params: {e}")))
    }
}
