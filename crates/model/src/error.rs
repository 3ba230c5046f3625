use thiserror::Error;

/// Result type for record validation
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors raised while validating loaded records
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Product failed a field constraint
    #[error("Invalid product {sku:?}: {reason}")]
    InvalidProduct { sku: String, reason: String },

    /// Node failed a field constraint
    #[error("Invalid node {name:?}: {reason}")]
    InvalidNode { name: String, reason: String },

    /// Edge failed a field constraint
    #[error("Invalid edge {from:?} -> {to:?}: {reason}")]
    InvalidEdge {
        from: String,
        to: String,
        reason: String,
    },
}

impl ModelError {
    pub fn product(sku: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidProduct {
            sku: sku.into(),
            reason: reason.into(),
        }
    }

    pub fn node(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNode {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn edge(from: impl Into<String>, to: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEdge {
            from: from.into(),
            to: to.into(),
            reason: reason.into(),
        }
    }
}
