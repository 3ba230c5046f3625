use rayon::prelude::*;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use supplyroute_evaluators::{
    EvaluationCache, EvaluatorConfig, EvaluatorError, EvaluatorRegistry, SimpleEvaluator,
};
use supplyroute_model::EvalValue;
use tempfile::NamedTempFile;

#[test]
fn test_missing_config_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = EvaluatorConfig::load(dir.path().join("evaluators.json")).unwrap();
    assert_eq!(config, EvaluatorConfig::default());
}

#[test]
fn test_load_config_with_params() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "evaluator_type": "simple",
            "evaluators": {{"wh_cost": {{"type": "calculation"}}}},
            "params": {{"storage_days": 14, "oversize_clusters": ["US_West"]}}
        }}"#
    )
    .unwrap();

    let config = EvaluatorConfig::load(file.path()).unwrap();
    assert_eq!(config.evaluators["wh_cost"].kind, "calculation");

    let evaluator = SimpleEvaluator::from_config(&config).unwrap();
    assert_eq!(evaluator.params().storage_days, 14.0);
    assert_eq!(evaluator.params().storage_rate, 0.10);
    assert_eq!(evaluator.params().oversize_clusters, vec!["US_West".to_string()]);

    let created = EvaluatorRegistry::with_defaults().create(&config).unwrap();
    assert_eq!(created.type_name(), "simple");
}

#[test]
fn test_malformed_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();

    let err = EvaluatorConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, EvaluatorError::InvalidConfig(_)));
    assert!(err.to_string().contains(&file.path().display().to_string()));
}

#[test]
fn test_unknown_evaluator_type_in_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"evaluator_type": "ml"}}"#).unwrap();

    let config = EvaluatorConfig::load(file.path()).unwrap();
    assert!(matches!(
        EvaluatorRegistry::with_defaults().create(&config),
        Err(EvaluatorError::UnknownType(_))
    ));
}

#[test]
fn test_concurrent_cache_access_first_writer_wins() {
    let cache = EvaluationCache::new();
    let computed = AtomicUsize::new(0);

    let values: Vec<EvalValue> = (0..64)
        .into_par_iter()
        .map(|i| {
            cache.get_or_compute("shared", || {
                computed.fetch_add(1, Ordering::SeqCst);
                EvalValue::Number(f64::from(i))
            })
        })
        .collect();

    let first = values[0];
    assert!(values.iter().all(|v| *v == first));
    assert_eq!(cache.len(), 1);

    let stats = cache.stats();
    assert_eq!(stats.hits + stats.misses, 64);
    assert_eq!(stats.misses as usize, computed.load(Ordering::SeqCst));
}

#[test]
fn test_concurrent_distinct_keys() {
    let cache = EvaluationCache::new();
    (0..100u32).into_par_iter().for_each(|i| {
        cache.set(format!("key:{}", i % 10), EvalValue::Number(f64::from(i % 10)));
    });
    assert_eq!(cache.len(), 10);
    assert_eq!(cache.get("key:7"), Some(EvalValue::Number(7.0)));
}
