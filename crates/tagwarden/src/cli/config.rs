//! Configuration for Tagwarden
//!
//! Paths default to ~/.tagwarden/. An optional `config.toml` there can point
//! at the inventory:
//!
//! ```toml
//! inventory = "/srv/cloud/inventory.json"
//! # or
//! store = "json:/srv/cloud/inventory.json"
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub use tagwarden_protocol::paths::{
    default_config_path, default_inventory_path, default_logs_dir, tagwarden_home,
};

/// Contents of `config.toml`. Every entry is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagwardenConfig {
    /// Path to the inventory JSON file.
    #[serde(default)]
    pub inventory: Option<PathBuf>,
    /// Store URL (`memory:` or `json:<path>`). Wins over `inventory`.
    #[serde(default)]
    pub store: Option<String>,
}

/// Load `path`, or the defaults if it does not exist.
pub fn load_config(path: &Path) -> anyhow::Result<TagwardenConfig> {
    if !path.exists() {
        return Ok(TagwardenConfig::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&content).map_err(|e| {
        anyhow::anyhow!(
            "Failed to parse config file {}: {}. Delete this file to reset.",
            path.display(),
            e
        )
    })
}

/// Where the store URL came from, for `tagwarden config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreSource {
    Flag,
    ConfigStore,
    ConfigInventory,
    Default,
}

impl StoreSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreSource::Flag => "--inventory / TAGWARDEN_INVENTORY",
            StoreSource::ConfigStore => "config.toml (store)",
            StoreSource::ConfigInventory => "config.toml (inventory)",
            StoreSource::Default => "default",
        }
    }
}

/// Resolve the store URL.
///
/// Priority:
/// 1. `--inventory` flag (or TAGWARDEN_INVENTORY)
/// 2. `store` in config.toml
/// 3. `inventory` in config.toml
/// 4. ~/.tagwarden/inventory.json
pub fn resolve_store_url(flag: Option<&Path>, config: &TagwardenConfig) -> (String, StoreSource) {
    if let Some(path) = flag {
        return (json_url(path), StoreSource::Flag);
    }
    if let Some(store) = &config.store {
        return (store.clone(), StoreSource::ConfigStore);
    }
    if let Some(path) = &config.inventory {
        return (json_url(path), StoreSource::ConfigInventory);
    }
    (json_url(&default_inventory_path()), StoreSource::Default)
}

fn json_url(path: &Path) -> String {
    format!("json:{}", path.display())
}

/// Arguments for the config command
#[derive(Debug, clap::Args)]
pub struct ConfigArgs {
    /// Show resolved settings in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Run the config command - shows resolved paths
pub fn run(args: ConfigArgs, inventory_flag: Option<&Path>) -> anyhow::Result<()> {
    let home = tagwarden_home();
    let config_path = default_config_path();
    let config = load_config(&config_path)?;
    let (store_url, source) = resolve_store_url(inventory_flag, &config);
    let logs = default_logs_dir();

    if args.json {
        let value = serde_json::json!({
            "home": home.to_string_lossy(),
            "config": {
                "path": config_path.to_string_lossy(),
                "exists": config_path.exists(),
            },
            "store": {
                "url": store_url,
                "source": source,
            },
            "logs": logs.to_string_lossy(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("TAGWARDEN CONFIGURATION");
        println!("=======================");
        println!();
        println!("Home:     {}", home.display());
        println!(
            "Config:   {} ({})",
            config_path.display(),
            if config_path.exists() { "exists" } else { "not found" }
        );
        println!("Store:    {}", store_url);
        println!("          from: {}", source.as_str());
        println!("Logs:     {}", logs.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_is_default() {
        let dir = TempDir::new().unwrap();
        let config = load_config(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, TagwardenConfig::default());
    }

    #[test]
    fn test_parse_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "inventory = \"/data/inv.json\"\n").unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.inventory, Some(PathBuf::from("/data/inv.json")));
        assert_eq!(config.store, None);
    }

    #[test]
    fn test_unknown_config_key_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "inventroy = \"x\"\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_store_url_precedence() {
        let config = TagwardenConfig {
            inventory: Some(PathBuf::from("/cfg/inv.json")),
            store: Some("memory:".to_string()),
        };
        assert_eq!(
            resolve_store_url(Some(Path::new("/flag.json")), &config),
            ("json:/flag.json".to_string(), StoreSource::Flag)
        );
        assert_eq!(
            resolve_store_url(None, &config),
            ("memory:".to_string(), StoreSource::ConfigStore)
        );

        let config = TagwardenConfig {
            inventory: Some(PathBuf::from("/cfg/inv.json")),
            store: None,
        };
        assert_eq!(
            resolve_store_url(None, &config),
            ("json:/cfg/inv.json".to_string(), StoreSource::ConfigInventory)
        );
    }
}
