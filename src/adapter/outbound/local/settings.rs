//! Local fallback configuration.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::ConfigError;

/// `[local]` configuration section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalConfig {
    /// Directory holding the `tires` and `movements` entries.
    /// Defaults to `~/.tirestock/local`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl LocalConfig {
    /// Resolve the storage directory.
    pub fn resolve_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        dirs::home_dir()
            .map(|home| home.join(".tirestock").join("local"))
            .ok_or(ConfigError::MissingField { field: "local.path" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let config = LocalConfig {
            path: Some(PathBuf::from("/tmp/stock")),
        };
        assert_eq!(config.resolve_path().unwrap(), PathBuf::from("/tmp/stock"));
    }
}
