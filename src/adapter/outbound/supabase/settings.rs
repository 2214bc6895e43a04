//! Hosted backend configuration.

use serde::Deserialize;

use crate::error::ConfigError;

/// Environment variable overriding [`SupabaseConfig::url`].
pub const URL_ENV: &str = "SUPABASE_URL";
/// Environment variable overriding [`SupabaseConfig::anon_key`].
pub const ANON_KEY_ENV: &str = "SUPABASE_ANON_KEY";

/// Connection settings for the hosted PostgREST backend.
///
/// An empty `url` means no remote is configured and the session starts on
/// local storage.
#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://abc.supabase.co`.
    #[serde(default)]
    pub url: String,
    /// Public anonymous API key.
    #[serde(default)]
    pub anon_key: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Maximum number of attempts for reads that hit a transient failure.
    /// Writes are always sent once.
    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,
    /// Backoff between retries in milliseconds.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

const fn default_timeout_ms() -> u64 {
    5000
}

const fn default_connect_timeout_ms() -> u64 {
    2000
}

const fn default_retry_max_attempts() -> u32 {
    3
}

const fn default_retry_backoff_ms() -> u64 {
    500
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            retry_max_attempts: default_retry_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl SupabaseConfig {
    /// True when a project URL has been supplied.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
    }

    /// Apply `SUPABASE_URL` / `SUPABASE_ANON_KEY` when set.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(URL_ENV) {
            self.url = url;
        }
        if let Ok(key) = std::env::var(ANON_KEY_ENV) {
            self.anon_key = key;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.is_configured() {
            return Ok(());
        }
        let url = url::Url::parse(&self.url).map_err(|e| ConfigError::InvalidValue {
            field: "supabase.url",
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: "supabase.url",
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if self.anon_key.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "supabase.anon_key",
            });
        }
        if self.retry_max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "supabase.retry_max_attempts",
                reason: "must be at least 1".into(),
            });
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "supabase.timeout_ms",
                reason: "must be greater than 0".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_remote_is_valid() {
        let config = SupabaseConfig::default();
        assert!(!config.is_configured());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn configured_remote_needs_key_and_valid_url() {
        let mut config = SupabaseConfig {
            url: "https://demo.supabase.co".into(),
            ..SupabaseConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField { field: "supabase.anon_key" })
        ));

        config.anon_key = "anon".into();
        assert!(config.validate().is_ok());

        config.url = "not a url".into();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue { .. })));

        config.url = "ftp://demo.supabase.co".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "supabase.url", .. })
        ));
    }
}
