//! One-shot copy of local tires to the hosted backend.
//!
//! Every local tire is re-created remotely through the stock ledger, which
//! re-synthesises its initial-stock movement. Local movement history is not
//! copied. Stored thresholds are kept as they are, including zero. Local
//! storage is cleared only after every tire made it across;
//! a failure part-way leaves the copied tires on both sides and local
//! storage untouched, so a retry duplicates them.

use std::sync::Arc;

use tracing::{info, warn};

use super::backend::FailoverStore;
use super::ledger::StockLedger;
use crate::domain::{NewTire, Tire};
use crate::error::{Error, Result};
use crate::port::outbound::store::InventoryStore;

/// Outcome of a completed migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationReport {
    pub migrated: usize,
}

/// Copies local tires to the remote store.
pub struct MigrationAgent {
    store: Arc<FailoverStore>,
    strict: bool,
}

impl MigrationAgent {
    #[must_use]
    pub fn new(store: Arc<FailoverStore>) -> Self {
        Self {
            store,
            strict: false,
        }
    }

    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Number of local tires waiting to be copied.
    pub async fn pending(&self) -> Result<usize> {
        Ok(self.store.local().list_tires().await?.len())
    }

    /// Copy every local tire to the remote store, then clear local storage
    /// and move the session onto the remote store.
    ///
    /// `progress` is called after each copied tire with `(done, total)`.
    pub async fn migrate<F>(&self, mut progress: F) -> Result<MigrationReport>
    where
        F: FnMut(usize, usize) + Send,
    {
        let remote = self
            .store
            .remote()
            .cloned()
            .ok_or_else(|| Error::BackendUnavailable("no remote backend configured".into()))?;
        remote.probe().await?;

        let tires = self.store.local().list_tires().await?;
        let total = tires.len();
        info!(total, "Migrating local tires");

        let ledger = StockLedger::new(remote).with_strict(self.strict);
        for (done, tire) in tires.iter().enumerate() {
            if let Err(err) = ledger.create_tire(&as_new(tire)).await {
                warn!(tire_id = %tire.id, migrated = done, total, error = %err, "Migration stopped");
                return Err(Error::Migration {
                    migrated: done,
                    total,
                    reason: err.to_string(),
                });
            }
            progress(done + 1, total);
        }

        self.store.local().clear().await?;
        self.store.switch_to_remote()?;
        info!(migrated = total, "Migration complete");
        Ok(MigrationReport { migrated: total })
    }
}

fn as_new(tire: &Tire) -> NewTire {
    NewTire {
        measure: tire.measure.clone(),
        brand: tire.brand.clone(),
        reference: tire.reference.clone(),
        category: tire.category,
        tire_type: tire.tire_type,
        price: tire.price,
        stock: tire.stock,
        min_stock: tire.min_stock,
    }
}
