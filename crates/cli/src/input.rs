use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use supplyroute_model::{EdgeRecord, NodeRecord, Product};

fn load_records<T: DeserializeOwned>(path: &Path, kind: &str) -> Result<Vec<T>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {kind} from {}", path.display()))?;
    let records: Vec<T> = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid {kind} JSON in {}", path.display()))?;
    log::debug!("Loaded {} {kind} from {}", records.len(), path.display());
    Ok(records)
}

/// Product records; each row is validated while parsing
pub fn load_products(path: &Path) -> Result<Vec<Arc<Product>>> {
    let products: Vec<Product> = load_records(path, "products")?;
    Ok(products.into_iter().map(Arc::new).collect())
}

pub fn load_nodes(path: &Path) -> Result<Vec<NodeRecord>> {
    load_records(path, "nodes")
}

pub fn load_edges(path: &Path) -> Result<Vec<EdgeRecord>> {
    load_records(path, "edges")
}
