//! Application context: the single entry point for inventory commands
//! and queries.
//!
//! Every command validates, persists through the ledger, reports the
//! outcome as a notice, and reloads the snapshot. Errors are returned to
//! the caller after being reported; nothing here panics.

use std::sync::Arc;

use tracing::{error, warn};

use super::backend::FailoverStore;
use super::ledger::{LedgerEntry, StockLedger};
use super::migration::{MigrationAgent, MigrationReport};
use super::repository::{HistoryEntry, InventoryRepository};
use super::session::SessionGate;
use crate::domain::{
    DashboardStats, HistoryFilter, MovementKind, NewTire, Step, Tire, TireFilter, TireId,
    TirePatch, User,
};
use crate::error::{Error, Result};
use crate::port::outbound::notifier::{Notice, Notifier};
use crate::port::outbound::store::{BackendKind, InventoryStore};

/// Inventory session for one signed-in user.
pub struct Inventory {
    user: User,
    store: Arc<FailoverStore>,
    ledger: StockLedger,
    repository: InventoryRepository,
    notifier: Arc<dyn Notifier>,
    strict: bool,
}

impl Inventory {
    /// Authorize the session and load the initial snapshot.
    pub async fn open(
        gate: &SessionGate,
        store: Arc<FailoverStore>,
        notifier: Arc<dyn Notifier>,
        strict: bool,
    ) -> Result<Self> {
        let user = gate.authorize().await?;
        let inventory = Self::new(user, store, notifier, strict);
        inventory.reload().await?;
        Ok(inventory)
    }

    #[must_use]
    pub fn new(
        user: User,
        store: Arc<FailoverStore>,
        notifier: Arc<dyn Notifier>,
        strict: bool,
    ) -> Self {
        let as_store: Arc<dyn InventoryStore> = store.clone();
        Self {
            user,
            ledger: StockLedger::new(as_store.clone()).with_strict(strict),
            repository: InventoryRepository::new(as_store),
            store,
            notifier,
            strict,
        }
    }

    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    #[must_use]
    pub fn backend(&self) -> BackendKind {
        self.store.active()
    }

    #[must_use]
    pub fn repository(&self) -> &InventoryRepository {
        &self.repository
    }

    /// Refresh the snapshot from the active store.
    pub async fn reload(&self) -> Result<()> {
        self.repository.reload().await.map_err(|err| {
            error!(error = %err, "Failed to load inventory");
            self.notifier
                .notify(Notice::error(format!("Failed to load inventory: {err}")));
            err
        })
    }

    pub async fn create_tire(&self, tire: &NewTire) -> Result<LedgerEntry> {
        let result = self.ledger.create_tire(tire).await;
        self.finish(result, "Tire added").await
    }

    pub async fn update_tire(&self, id: &TireId, patch: &TirePatch) -> Result<LedgerEntry> {
        let result = match self.lookup(id) {
            Ok(current) => self.ledger.update_tire(&current, patch).await,
            Err(err) => Err(err),
        };
        self.finish(result, "Tire updated").await
    }

    pub async fn delete_tire(&self, id: &TireId) -> Result<()> {
        let result = self.ledger.delete_tire(id).await;
        self.finish(result, "Tire deleted").await
    }

    /// Quick adjust by `+1` or `-1`.
    pub async fn adjust_stock(&self, id: &TireId, change: i64) -> Result<LedgerEntry> {
        let result = match (self.lookup(id), Step::from_change(change)) {
            (Ok(current), Ok(step)) => self.ledger.adjust_stock(&current, step).await,
            (Err(err), _) => Err(err),
            (_, Err(err)) => Err(err.into()),
        };
        self.finish(result, "Stock updated").await
    }

    pub async fn register_movement(
        &self,
        id: &TireId,
        kind: MovementKind,
        quantity: i64,
        reason: &str,
    ) -> Result<LedgerEntry> {
        let result = match self.lookup(id) {
            Ok(current) => {
                self.ledger
                    .register_movement(&current, kind, quantity, reason)
                    .await
            }
            Err(err) => Err(err),
        };
        self.finish(result, "Movement registered").await
    }

    /// Copy local tires to the hosted backend.
    pub async fn migrate<F>(&self, progress: F) -> Result<MigrationReport>
    where
        F: FnMut(usize, usize) + Send,
    {
        let agent = MigrationAgent::new(self.store.clone()).with_strict(self.strict);
        let result = agent.migrate(progress).await;
        let message = match &result {
            Ok(report) => format!("Migrated {} tires to the hosted backend", report.migrated),
            Err(_) => String::new(),
        };
        self.finish(result, &message).await
    }

    /// Local tires waiting for migration.
    pub async fn pending_migration(&self) -> Result<usize> {
        MigrationAgent::new(self.store.clone()).pending().await
    }

    #[must_use]
    pub fn tires(&self, filter: &TireFilter) -> Vec<Tire> {
        self.repository.filter_tires(filter)
    }

    #[must_use]
    pub fn low_stock(&self, filter: &TireFilter) -> Vec<Tire> {
        self.repository.low_stock(filter)
    }

    #[must_use]
    pub fn history(&self, filter: &HistoryFilter) -> Vec<HistoryEntry> {
        self.repository.history(filter)
    }

    #[must_use]
    pub fn dashboard(&self) -> DashboardStats {
        self.repository.dashboard()
    }

    fn lookup(&self, id: &TireId) -> Result<Tire> {
        self.repository
            .tire(id)
            .ok_or_else(|| Error::tire_not_found(id))
    }

    /// Report the outcome and reload after anything that may have written.
    async fn finish<T>(&self, result: Result<T>, success: &str) -> Result<T> {
        match &result {
            Ok(_) => {
                self.notifier.notify(Notice::success(success));
                self.reload_quietly().await;
            }
            Err(err @ Error::PartialWrite { .. }) => {
                warn!(error = %err, "Partial write");
                self.notifier.notify(Notice::warning(err.to_string()));
                self.reload_quietly().await;
            }
            Err(err @ Error::Migration { .. }) => {
                self.notifier.notify(Notice::error(err.to_string()));
                self.reload_quietly().await;
            }
            Err(err) => {
                self.notifier.notify(Notice::error(err.to_string()));
            }
        }
        result
    }

    async fn reload_quietly(&self) {
        if let Err(err) = self.repository.reload().await {
            warn!(error = %err, "Reload after mutation failed");
        }
    }
}
