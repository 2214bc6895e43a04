use thiserror::Error;

use crate::domain::error::ValidationError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The intent was rejected before reaching any store.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A mutation targeted a record that no longer exists.
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// The hosted backend could not be reached.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The tire was updated but its movement record was not written.
    #[error("tire '{tire_id}' was updated but its movement was not recorded: {reason}")]
    PartialWrite { tire_id: String, reason: String },

    /// Migration stopped part-way; local storage was left untouched.
    #[error("migration stopped after {migrated} of {total} tires: {reason}")]
    Migration {
        migrated: usize,
        total: usize,
        reason: String,
    },

    #[error("no signed-in user")]
    Unauthenticated,

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("parse error: {0}")]
    Parse(String),
}

impl Error {
    /// Build a `NotFound` for a tire.
    pub fn tire_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity: "tire",
            id: id.to_string(),
        }
    }

    /// True when the error means the hosted backend is unreachable.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        match self {
            Self::BackendUnavailable(_) => true,
            Self::Http(err) => err.is_connect() || err.is_timeout(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        // dialoguer::Error wraps an IO error
        Error::Io(std::io::Error::other(err.to_string()))
    }
}
