//! Domain identifier types with proper encapsulation.
//!
//! Identifiers are opaque strings. The hosted backend may hand out numeric
//! or UUID keys; the local store generates UUID v4 keys.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tire (stock-keeping unit) identifier - newtype for type safety.
///
/// The inner String is private to ensure all construction goes through
/// the defined constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TireId(String);

impl TireId {
    /// Create a `TireId` from an existing key.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create a `TireId` with a generated UUID.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the tire ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TireId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for TireId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Movement record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovementId(String);

impl MovementId {
    /// Create a `MovementId` from an existing key.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create a `MovementId` with a generated UUID.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the movement ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MovementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for MovementId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for MovementId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(TireId::generate(), TireId::generate());
        assert_ne!(MovementId::generate(), MovementId::generate());
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = TireId::from("42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"42\"");
        assert_eq!(id.to_string(), "42");
    }
}
