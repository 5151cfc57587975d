//! Opening the resource inventory for a command

use std::path::Path;

use tagwarden_core::TagService;
use tagwarden_store::ResourceStore;
use tracing::info;

use crate::cli::config::{default_config_path, load_config, resolve_store_url};
use crate::cli::error::HelpfulError;

/// The loaded inventory plus where it writes back to.
pub struct Inventory {
    store: ResourceStore,
}

impl Inventory {
    /// Resolve the store URL from flag/config/defaults and load it.
    pub fn open(inventory_flag: Option<&Path>) -> anyhow::Result<Self> {
        let config = load_config(&default_config_path())?;
        let (url, source) = resolve_store_url(inventory_flag, &config);
        let store = ResourceStore::open(&url).map_err(|e| HelpfulError::from_store_error(&e))?;
        info!(url = %url, source = source.as_str(), "Loaded inventory");
        Ok(Self { store })
    }

    pub fn service(&mut self) -> TagService<'_> {
        TagService::new(self.store.repository_mut())
    }

    /// Write committed changes back to the inventory file.
    pub fn save(&self) -> anyhow::Result<()> {
        self.store
            .persist()
            .map_err(|e| HelpfulError::from_store_error(&e))?;
        if let Some(path) = self.store.backing_file() {
            info!(path = %path.display(), "Saved inventory");
        }
        Ok(())
    }
}
