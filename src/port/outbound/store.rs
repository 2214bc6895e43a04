//! Persistence port for tires and movements.
//!
//! Two adapters implement it: the hosted relational backend and the local
//! key/value fallback. Business logic only ever sees `dyn InventoryStore`.

use std::fmt;

use async_trait::async_trait;

use crate::domain::{Movement, NewMovement, NewTire, Tire, TireId, TirePatch};
use crate::error::Result;

/// Which persistence variant backs a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Hosted relational store reached over the network.
    Remote,
    /// Local key/value storage.
    Local,
}

impl BackendKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Local => "local",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage operations for tires and their movement ledger.
///
/// Listing order is newest-first when the variant can order (remote) and
/// insertion order otherwise (local).
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Variant name for logging and status output.
    fn backend(&self) -> BackendKind;

    /// Check that the store is reachable.
    ///
    /// Fails with [`Error::BackendUnavailable`](crate::error::Error::BackendUnavailable)
    /// when it is not.
    async fn probe(&self) -> Result<()> {
        Ok(())
    }

    /// List every tire.
    async fn list_tires(&self) -> Result<Vec<Tire>>;

    /// List every movement.
    async fn list_movements(&self) -> Result<Vec<Movement>>;

    /// Insert a tire, assigning its identifier and creation timestamp.
    async fn create_tire(&self, tire: &NewTire) -> Result<Tire>;

    /// Apply a partial update. Fails with `NotFound` for unknown ids.
    async fn update_tire(&self, id: &TireId, patch: &TirePatch) -> Result<Tire>;

    /// Delete a tire. Its movements are left in place.
    async fn delete_tire(&self, id: &TireId) -> Result<()>;

    /// Append a movement record.
    async fn create_movement(&self, movement: &NewMovement) -> Result<Movement>;
}

/// A store whose whole contents can be discarded once copied elsewhere.
#[async_trait]
pub trait ClearableStore: InventoryStore {
    /// Remove every tire and movement.
    async fn clear(&self) -> Result<()>;
}
