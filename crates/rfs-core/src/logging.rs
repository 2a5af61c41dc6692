//! Logging init: append to a file under the XDG state dir, or fall back to stderr.
//!
//! `RUST_LOG` overrides the built-in filter in both modes.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,rfs_core=debug,rfs=debug";
const VERBOSE_FILTER: &str = "debug,rfs_core=trace,rfs=trace";

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER })
    })
}

/// `~/.local/state/rfs/rfs.log`, creating the directory if needed.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("rfs")?;
    let path = xdg_dirs
        .place_state_file("rfs.log")
        .context("create log directory")?;
    Ok(path)
}

/// Install the global subscriber writing to [`log_file_path`]. Returns the
/// path in use. On error nothing is installed, so the caller can still fall
/// back to [`init_logging_stderr`].
pub fn init_logging(verbose: bool) -> Result<PathBuf> {
    let path = log_file_path()?;
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install subscriber: {e}"))?;

    tracing::info!("rfs {} logging to {}", env!("CARGO_PKG_VERSION"), path.display());
    Ok(path)
}

/// Log to stderr only. Use when [`init_logging`] fails so the CLI keeps running.
pub fn init_logging_stderr(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
