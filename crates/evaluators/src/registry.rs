use crate::config::EvaluatorConfig;
use crate::error::{EvaluatorError, Result};
use crate::evaluator::Evaluator;
use crate::simple::SimpleEvaluator;
use std::collections::HashMap;
use std::fmt;

type Factory = Box<dyn Fn(&EvaluatorConfig) -> Result<Box<dyn Evaluator>> + Send + Sync>;

/// Maps evaluator type names to factories.
///
/// Built once at startup and passed to whoever constructs the evaluator.
pub struct EvaluatorRegistry {
    factories: HashMap<String, Factory>,
}

impl EvaluatorRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry with the built-in `simple` evaluator
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(SimpleEvaluator::TYPE_NAME, |config| {
            Ok(Box::new(SimpleEvaluator::from_config(config)?) as Box<dyn Evaluator>)
        });
        registry
    }

    /// Register a factory; a later registration under the same name replaces
    /// the earlier one.
    pub fn register<F>(&mut self, type_name: impl Into<String>, factory: F)
    where
        F: Fn(&EvaluatorConfig) -> Result<Box<dyn Evaluator>> + Send + Sync + 'static,
    {
        let type_name = type_name.into();
        if self.factories.contains_key(&type_name) {
            log::debug!("Replacing evaluator factory {type_name}");
        }
        self.factories.insert(type_name, Box::new(factory));
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    /// Construct the evaluator named by `config.evaluator_type`
    pub fn create(&self, config: &EvaluatorConfig) -> Result<Box<dyn Evaluator>> {
        let factory = self
            .factories
            .get(&config.evaluator_type)
            .ok_or_else(|| EvaluatorError::UnknownType(config.evaluator_type.clone()))?;
        let evaluator = factory(config)?;
        log::debug!("Created {} evaluator", evaluator.type_name());
        Ok(evaluator)
    }

    pub fn list_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.factories.keys().cloned().collect();
        types.sort();
        types
    }
}

impl Default for EvaluatorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for EvaluatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluatorRegistry")
            .field("types", &self.list_types())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{test_support::chunk, EvaluationContext};
    use supplyroute_model::{EvalValue, MethodSpec, MetricKind};

    struct Constant(f64);

    impl Evaluator for Constant {
        fn type_name(&self) -> &str {
            "constant"
        }

        fn evaluate(&self, _context: &EvaluationContext<'_>) -> EvalValue {
            EvalValue::Number(self.0)
        }
    }

    #[test]
    fn test_default_registry_creates_simple() {
        let registry = EvaluatorRegistry::with_defaults();
        assert_eq!(registry.list_types(), vec!["simple"]);
        let evaluator = registry.create(&EvaluatorConfig::default()).unwrap();
        assert_eq!(evaluator.type_name(), "simple");
    }

    #[test]
    fn test_unknown_type() {
        let registry = EvaluatorRegistry::with_defaults();
        let config = EvaluatorConfig {
            evaluator_type: "ml".to_string(),
            ..EvaluatorConfig::default()
        };
        match registry.create(&config) {
            Err(EvaluatorError::UnknownType(name)) => assert_eq!(name, "ml"),
            Err(other) => panic!("expected unknown type, got {other}"),
            Ok(_) => panic!("expected unknown type"),
        }
    }

    #[test]
    fn test_register_custom_type() {
        let mut registry = EvaluatorRegistry::with_defaults();
        registry.register("constant", |_| Ok(Box::new(Constant(4.0)) as Box<dyn Evaluator>));
        assert_eq!(registry.list_types(), vec!["constant", "simple"]);
        assert!(registry.contains("constant"));

        let config = EvaluatorConfig {
            evaluator_type: "constant".to_string(),
            ..EvaluatorConfig::default()
        };
        let evaluator = registry.create(&config).unwrap();
        let chunk = chunk("S", 1, false);
        let method = MethodSpec::NoOp;
        let ctx = EvaluationContext::for_node(&chunk, "N", &method, MetricKind::Cost);
        assert_eq!(evaluator.evaluate(&ctx), EvalValue::Number(4.0));
        assert_eq!(evaluator.fallback_count(), 0);
    }
}
