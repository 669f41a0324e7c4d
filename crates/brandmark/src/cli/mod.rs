//! Command implementations.

pub mod assist;
pub mod config;
pub mod generate;

use brandmark_core::Config;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Load configuration from `--config` or the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config, brandmark_core::ConfigError> {
    match path {
        Some(path) => Config::load_from(&expand_path(path)),
        None => Config::load(),
    }
}

/// Expand a leading `~` in a user-supplied path.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&raw).into_owned())
}

/// Write a value to stdout as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
