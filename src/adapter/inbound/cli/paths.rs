//! Path utilities for tirestock.
//!
//! All data lives under `~/.tirestock/`:
//! - `~/.tirestock/config.toml` - main configuration
//! - `~/.tirestock/local/` - local fallback storage (see `LocalConfig`)

use std::path::PathBuf;

/// Returns the tirestock home directory (`~/.tirestock/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tirestock")
}

/// Returns the default config file path (`~/.tirestock/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}
