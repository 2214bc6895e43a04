//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file with environment variable overrides
//! for the hosted backend credentials and the session token.
//!
//! # Example
//!
//! ```no_run
//! use tirestock::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::logging::LoggingConfig;
use crate::adapter::outbound::local::LocalConfig;
use crate::adapter::outbound::session::SessionConfig;
use crate::adapter::outbound::supabase::SupabaseConfig;
use crate::domain::tire::DEFAULT_MIN_STOCK;
use crate::error::{ConfigError, Result};

/// `[ledger]` configuration section.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Roll the stock back when a movement insert fails.
    #[serde(default)]
    pub strict: bool,
    /// Minimum-stock threshold used when a new tire does not give one.
    #[serde(default = "default_min_stock")]
    pub default_min_stock: u32,
}

const fn default_min_stock() -> u32 {
    DEFAULT_MIN_STOCK
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            strict: false,
            default_min_stock: default_min_stock(),
        }
    }
}

/// Main application configuration.
///
/// Every section is optional. Load from a TOML file using [`Config::load`]
/// or parse directly with [`Config::parse_toml`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Hosted backend. No URL means the session runs on local storage.
    #[serde(default)]
    pub supabase: SupabaseConfig,

    /// Local fallback storage.
    #[serde(default)]
    pub local: LocalConfig,

    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Identity of the signed-in user.
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    /// Parse configuration from TOML, apply environment overrides, validate.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.supabase.apply_env();
        config.session.apply_env();
        config.validate()?;
        Ok(config)
    }

    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load `path` when it exists, defaults (plus environment) otherwise.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Self::parse_toml("")
        }
    }

    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        self.logging.validate()?;
        self.supabase.validate()?;
        Ok(())
    }

    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::path::PathBuf;

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.logging.format, "pretty");
        assert!(!config.ledger.strict);
        assert_eq!(config.ledger.default_min_stock, 5);
        assert!(config.session.user().is_none());
    }

    #[test]
    fn full_config_parses() {
        let toml = r#"
            [logging]
            level = "debug"
            format = "json"

            [supabase]
            url = "https://demo.supabase.co"
            anon_key = "anon"
            retry_max_attempts = 2

            [local]
            path = "/var/lib/tirestock"

            [ledger]
            strict = true
            default_min_stock = 3

            [session]
            user_id = "u-1"
            email = "shop@example.com"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        config.validate().unwrap();
        assert!(config.ledger.strict);
        assert_eq!(config.supabase.retry_max_attempts, 2);
        assert_eq!(config.supabase.timeout_ms, 5000);
        assert_eq!(config.local.path, Some(PathBuf::from("/var/lib/tirestock")));
        assert_eq!(config.session.user().unwrap().id, "u-1");
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let config: Config = toml::from_str("[logging]\nformat = \"xml\"").unwrap();
        assert!(matches!(
            config.validate(),
            Err(Error::Config(ConfigError::InvalidValue { field: "logging.format", .. }))
        ));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = toml::from_str::<Config>("[ledger\nstrict = true").unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
