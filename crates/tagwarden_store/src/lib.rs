//! Tagwarden resource store.
//!
//! The canonical resource set lives in an [`InMemoryResourceStore`]. A
//! [`ResourceStore`] pairs it with an optional JSON inventory file that it was
//! loaded from and is written back to.

pub mod error;
pub mod inventory;
pub mod repository;

use std::path::PathBuf;

pub use error::{Result, StoreError};
pub use inventory::{load_inventory, save_inventory};
pub use repository::{BatchOutcome, InMemoryResourceStore, ResourceRepository};

use tracing::info;

/// Parsed store URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreUrl {
    /// Empty, process-local store.
    Memory,
    /// JSON inventory file.
    Json(PathBuf),
}

impl StoreUrl {
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw == "memory:" || raw == "memory" {
            return Ok(Self::Memory);
        }
        if let Some(rest) = raw.strip_prefix("json:") {
            let path = rest.trim();
            if path.is_empty() {
                return Err(StoreError::UnsupportedUrl(format!(
                    "json URL missing path: {raw}"
                )));
            }
            return Ok(Self::Json(PathBuf::from(path)));
        }
        Err(StoreError::UnsupportedUrl(raw.to_string()))
    }
}

/// A repository plus where it persists to.
pub struct ResourceStore {
    repository: InMemoryResourceStore,
    backing_file: Option<PathBuf>,
}

impl ResourceStore {
    pub fn open(raw: &str) -> Result<Self> {
        Self::from_url(StoreUrl::parse(raw)?)
    }

    pub fn from_url(url: StoreUrl) -> Result<Self> {
        match url {
            StoreUrl::Memory => Ok(Self {
                repository: InMemoryResourceStore::empty(),
                backing_file: None,
            }),
            StoreUrl::Json(path) => {
                let resources = load_inventory(&path)?;
                let repository = InMemoryResourceStore::new(resources)?;
                info!(path = %path.display(), resources = repository.len(), "Opened inventory");
                Ok(Self {
                    repository,
                    backing_file: Some(path),
                })
            }
        }
    }

    pub fn repository(&self) -> &InMemoryResourceStore {
        &self.repository
    }

    pub fn repository_mut(&mut self) -> &mut InMemoryResourceStore {
        &mut self.repository
    }

    pub fn backing_file(&self) -> Option<&PathBuf> {
        self.backing_file.as_ref()
    }

    /// Write current state back to the inventory file, if there is one.
    pub fn persist(&self) -> Result<()> {
        match &self.backing_file {
            Some(path) => save_inventory(path, self.repository.as_slice()),
            None => Ok(()),
        }
    }
}
