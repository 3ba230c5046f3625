use crate::error::{ModelError, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Origin assigned to chunks that do not name one.
pub const DEFAULT_ORIGIN: &str = "Supplier";

const DEFAULT_CURRENCY: &str = "USD";

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

/// Product row as it arrives from the loading layer.
///
/// Field names follow the normalized column names of the product table.
/// Convert into [`Product`] to validate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub razin: String,
    pub asin: String,
    pub qty: i64,
    pub cm3: f64,
    pub mc_volume: f64,
    pub is_oversize: i64,
    pub parcels_per_mc: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

/// Validated product (SKU) definition. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProductRecord", into = "ProductRecord")]
pub struct Product {
    sku: String,
    catalog_id: String,
    qty: u32,
    cm3: f64,
    mc_volume: f64,
    is_oversize: bool,
    parcels_per_mc: u32,
    currency: String,
}

impl Product {
    pub fn sku(&self) -> &str {
        &self.sku
    }

    /// External catalog identifier (ASIN).
    pub fn catalog_id(&self) -> &str {
        &self.catalog_id
    }

    pub fn qty(&self) -> u32 {
        self.qty
    }

    /// Contribution margin used as the numerator of the path score.
    pub fn cm3(&self) -> f64 {
        self.cm3
    }

    pub fn mc_volume(&self) -> f64 {
        self.mc_volume
    }

    pub fn is_oversize(&self) -> bool {
        self.is_oversize
    }

    pub fn parcels_per_mc(&self) -> u32 {
        self.parcels_per_mc
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }
}

impl TryFrom<ProductRecord> for Product {
    type Error = ModelError;

    fn try_from(record: ProductRecord) -> Result<Self> {
        let sku = record.razin.trim().to_string();
        if sku.is_empty() {
            return Err(ModelError::product(&record.razin, "SKU cannot be empty"));
        }
        let catalog_id = record.asin.trim().to_string();
        if catalog_id.is_empty() {
            return Err(ModelError::product(&sku, "catalog id cannot be empty"));
        }

        let qty = u32::try_from(record.qty)
            .ok()
            .filter(|&q| q > 0)
            .ok_or_else(|| ModelError::product(&sku, format!("qty must be > 0, got {}", record.qty)))?;

        if !(record.mc_volume > 0.0) {
            return Err(ModelError::product(
                &sku,
                format!("mc_volume must be > 0, got {}", record.mc_volume),
            ));
        }

        let is_oversize = match record.is_oversize {
            0 => false,
            1 => true,
            other => {
                return Err(ModelError::product(
                    &sku,
                    format!("is_oversize must be 0 or 1, got {other}"),
                ))
            }
        };

        let parcels_per_mc = u32::try_from(record.parcels_per_mc)
            .ok()
            .filter(|&p| p > 0)
            .ok_or_else(|| {
                ModelError::product(
                    &sku,
                    format!("parcels_per_mc must be > 0, got {}", record.parcels_per_mc),
                )
            })?;

        Ok(Self {
            sku,
            catalog_id,
            qty,
            cm3: record.cm3,
            mc_volume: record.mc_volume,
            is_oversize,
            parcels_per_mc,
            currency: record.currency,
        })
    }
}

impl From<Product> for ProductRecord {
    fn from(product: Product) -> Self {
        Self {
            razin: product.sku,
            asin: product.catalog_id,
            qty: i64::from(product.qty),
            cm3: product.cm3,
            mc_volume: product.mc_volume,
            is_oversize: i64::from(product.is_oversize),
            parcels_per_mc: i64::from(product.parcels_per_mc),
            currency: product.currency,
        }
    }
}

/// One allocation unit derived from a [`Product`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chunk {
    chunk_id: String,
    product: Arc<Product>,
    origin: String,
    ready_date: Option<NaiveDate>,
}

impl Chunk {
    /// Chunk starting at the default supplier origin.
    pub fn new(chunk_id: impl Into<String>, product: Arc<Product>) -> Self {
        Self {
            chunk_id: chunk_id.into(),
            product,
            origin: DEFAULT_ORIGIN.to_string(),
            ready_date: None,
        }
    }

    /// Chunk with a generated 8-character id, ready today.
    pub fn from_product(product: Arc<Product>) -> Self {
        let id = uuid::Uuid::new_v4().simple().to_string();
        Self::new(&id[..8], product).with_ready_date(Local::now().date_naive())
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    pub fn with_ready_date(mut self, ready_date: NaiveDate) -> Self {
        self.ready_date = Some(ready_date);
        self
    }

    pub fn chunk_id(&self) -> &str {
        &self.chunk_id
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn ready_date(&self) -> Option<NaiveDate> {
        self.ready_date
    }

    pub fn sku(&self) -> &str {
        self.product.sku()
    }

    pub fn qty(&self) -> u32 {
        self.product.qty()
    }

    pub fn cm3(&self) -> f64 {
        self.product.cm3()
    }
}
