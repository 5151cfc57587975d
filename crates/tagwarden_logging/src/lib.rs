//! Shared logging setup for Tagwarden binaries.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str = "tagwarden=info,tagwarden_core=info,tagwarden_store=info";
const MAX_LOG_FILES: usize = 5;
const MAX_LOG_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Logging configuration shared by Tagwarden binaries.
pub struct LogConfig<'a> {
    pub app_name: &'a str,
    /// Mirror the file filter on stderr instead of warnings only.
    pub verbose: bool,
    /// Output is machine-readable; keep stderr to errors.
    pub json_mode: bool,
    /// Override for the log directory (defaults to ~/.tagwarden/logs).
    pub log_dir: Option<PathBuf>,
}

/// Initialize tracing with a per-app log file and stderr output.
///
/// If the log directory cannot be prepared, logging falls back to stderr
/// only and the reason is returned so the caller can mention it.
pub fn init_logging(config: LogConfig<'_>) -> Result<Option<String>> {
    let file_filter = env_filter();
    let console_filter = if config.verbose {
        env_filter()
    } else if config.json_mode {
        EnvFilter::new("error")
    } else {
        EnvFilter::new("warn")
    };

    let log_dir = config
        .log_dir
        .clone()
        .unwrap_or_else(tagwarden_protocol::paths::default_logs_dir);

    let (file_layer, fallback_reason) = match open_log_file(&log_dir, config.app_name) {
        Ok(file) => (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_filter(file_filter),
            ),
            None,
        ),
        Err(err) => (None, Some(format!("{:#}", err))),
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(console_filter),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(fallback_reason)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Open `<dir>/<app>.log` for appending.
///
/// Each invocation is short-lived, so rotation happens once, at startup:
/// a log that has reached `MAX_LOG_FILE_SIZE` is shifted to `<app>.log.1`
/// and older generations move up, keeping at most `MAX_LOG_FILES` files.
fn open_log_file(dir: &Path, app_name: &str) -> Result<File> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    let current = log_path(dir, app_name, 0);

    let size = fs::metadata(&current).map(|m| m.len()).unwrap_or(0);
    if size >= MAX_LOG_FILE_SIZE {
        rotate_generations(dir, app_name, MAX_LOG_FILES)
            .with_context(|| format!("Failed to rotate logs in {}", dir.display()))?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&current)
        .with_context(|| format!("Failed to open log file {}", current.display()))
}

fn rotate_generations(dir: &Path, app_name: &str, keep: usize) -> io::Result<()> {
    let oldest = keep.saturating_sub(1);
    if oldest == 0 {
        return match fs::remove_file(log_path(dir, app_name, 0)) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        };
    }
    for generation in (0..oldest).rev() {
        let from = log_path(dir, app_name, generation);
        if from.exists() {
            fs::rename(&from, log_path(dir, app_name, generation + 1))?;
        }
    }
    Ok(())
}

/// Generation 0 is the live file.
fn log_path(dir: &Path, app_name: &str, generation: usize) -> PathBuf {
    let stem: String = app_name
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' { ch } else { '_' })
        .collect();
    match generation {
        0 => dir.join(format!("{stem}.log")),
        n => dir.join(format!("{stem}.log.{n}")),
    }
}
