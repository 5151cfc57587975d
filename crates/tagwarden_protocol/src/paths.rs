use std::path::PathBuf;
use std::sync::Once;

static CREATE_DIR_WARNED: Once = Once::new();

/// Resolve the Tagwarden home directory.
///
/// Priority:
/// 1) TAGWARDEN_HOME
/// 2) HOME/USERPROFILE
/// 3) ./.tagwarden
pub fn tagwarden_home() -> PathBuf {
    if let Ok(override_path) = std::env::var("TAGWARDEN_HOME") {
        return PathBuf::from(override_path);
    }
    if let Ok(home) = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")) {
        return PathBuf::from(home).join(".tagwarden");
    }
    PathBuf::from(".").join(".tagwarden")
}

fn ensure_home_dir(home: &PathBuf) {
    if let Err(err) = std::fs::create_dir_all(home) {
        CREATE_DIR_WARNED.call_once(|| {
            eprintln!(
                "Warning: failed to create Tagwarden home directory {}: {}. Set TAGWARDEN_HOME or pass --inventory.",
                home.display(),
                err
            );
        });
    }
}

/// Default inventory path: ~/.tagwarden/inventory.json
pub fn default_inventory_path() -> PathBuf {
    let home = tagwarden_home();
    ensure_home_dir(&home);
    home.join("inventory.json")
}

/// Default config file: ~/.tagwarden/config.toml
pub fn default_config_path() -> PathBuf {
    tagwarden_home().join("config.toml")
}

/// Default logs directory: ~/.tagwarden/logs
pub fn default_logs_dir() -> PathBuf {
    let home = tagwarden_home();
    ensure_home_dir(&home);
    home.join("logs")
}
