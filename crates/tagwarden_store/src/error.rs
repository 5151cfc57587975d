use rust_decimal::Decimal;
use std::path::PathBuf;
use tagwarden_protocol::ResourceId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Inventory not found: {}", .0.display())]
    InventoryNotFound(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse inventory {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize inventory: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Duplicate resource id: {0}")]
    DuplicateId(ResourceId),

    #[error("Resource {id} has a negative monthly cost ({cost})")]
    NegativeCost { id: ResourceId, cost: Decimal },

    #[error("Unsupported store URL: {0}")]
    UnsupportedUrl(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
