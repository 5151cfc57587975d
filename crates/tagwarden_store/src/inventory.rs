//! JSON inventory files: a top-level array of resources.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tagwarden_protocol::Resource;
use tracing::debug;

use crate::error::{Result, StoreError};

/// Read an inventory file.
pub fn load_inventory(path: &Path) -> Result<Vec<Resource>> {
    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            StoreError::InventoryNotFound(path.to_path_buf())
        } else {
            StoreError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let resources: Vec<Resource> =
        serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(path = %path.display(), count = resources.len(), "Loaded inventory");
    Ok(resources)
}

/// Write an inventory file, replacing it through a sibling temp file.
pub fn save_inventory(path: &Path, resources: &[Resource]) -> Result<()> {
    let content = serde_json::to_string_pretty(resources).map_err(StoreError::Serialize)?;
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, content).map_err(io_err)?;
    fs::rename(&tmp_path, path).map_err(io_err)?;

    debug!(path = %path.display(), count = resources.len(), "Saved inventory");
    Ok(())
}
