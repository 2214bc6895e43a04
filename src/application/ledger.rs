//! Stock ledger orchestration.
//!
//! Pairs every stock change with its movement record. Rules come from
//! [`crate::domain::ledger`]; this service only persists an accepted plan:
//! tire update first, then the movement insert.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ledger::{
    plan_direct_edit, plan_initial_stock, plan_movement, plan_quick_adjust, StockPlan,
};
use crate::domain::{Movement, MovementKind, NewTire, Step, Tire, TireId, TirePatch};
use crate::error::{Error, Result};
use crate::port::outbound::store::InventoryStore;

/// Result of a stock-affecting operation.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub tire: Tire,
    /// `None` when the operation did not change stock.
    pub movement: Option<Movement>,
}

/// Sole writer of stock changes.
pub struct StockLedger {
    store: Arc<dyn InventoryStore>,
    /// Roll the tire back to its old stock when the movement insert fails.
    strict: bool,
}

impl StockLedger {
    #[must_use]
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
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

    /// Create a tire, recording its initial stock as an entrada.
    pub async fn create_tire(&self, tire: &NewTire) -> Result<LedgerEntry> {
        let created = self.store.create_tire(tire).await?;
        info!(tire_id = %created.id, stock = created.stock, "Tire created");

        let Some(plan) = plan_initial_stock(created.stock) else {
            return Ok(LedgerEntry {
                tire: created,
                movement: None,
            });
        };
        let movement = self.record(&created, &plan).await?;
        Ok(LedgerEntry {
            tire: created,
            movement: Some(movement),
        })
    }

    /// Apply an attribute edit. A stock change is recorded as an ajuste.
    pub async fn update_tire(&self, current: &Tire, patch: &TirePatch) -> Result<LedgerEntry> {
        patch.validate()?;
        let plan = patch
            .stock
            .and_then(|target| plan_direct_edit(current.stock, target));

        let updated = self.store.update_tire(&current.id, patch).await?;
        info!(tire_id = %current.id, "Tire updated");

        let movement = match plan {
            Some(plan) => Some(self.record(&updated, &plan).await?),
            None => None,
        };
        Ok(LedgerEntry {
            tire: updated,
            movement,
        })
    }

    /// Add or remove one unit.
    pub async fn adjust_stock(&self, current: &Tire, step: Step) -> Result<LedgerEntry> {
        let plan = plan_quick_adjust(current.stock, step)?;
        self.apply(current, plan).await
    }

    /// Register an explicit movement against a tire.
    pub async fn register_movement(
        &self,
        current: &Tire,
        kind: MovementKind,
        quantity: i64,
        reason: &str,
    ) -> Result<LedgerEntry> {
        let plan = plan_movement(current.stock, kind, quantity)?.with_reason(reason.trim());
        self.apply(current, plan).await
    }

    /// Delete a tire. Its movements stay in the ledger.
    pub async fn delete_tire(&self, id: &TireId) -> Result<()> {
        self.store.delete_tire(id).await?;
        info!(tire_id = %id, "Tire deleted");
        Ok(())
    }

    async fn apply(&self, current: &Tire, plan: StockPlan) -> Result<LedgerEntry> {
        let updated = self
            .store
            .update_tire(&current.id, &TirePatch::stock(plan.new_stock))
            .await?;
        let movement = self.record(&updated, &plan).await?;
        info!(
            tire_id = %current.id,
            kind = %plan.kind,
            old_stock = plan.old_stock,
            new_stock = plan.new_stock,
            "Stock changed"
        );
        Ok(LedgerEntry {
            tire: updated,
            movement: Some(movement),
        })
    }

    /// Insert the movement for an already-applied plan.
    async fn record(&self, tire: &Tire, plan: &StockPlan) -> Result<Movement> {
        match self.store.create_movement(&plan.to_movement(&tire.id)).await {
            Ok(movement) => Ok(movement),
            Err(err) => {
                warn!(tire_id = %tire.id, error = %err, strict = self.strict, "Movement insert failed");
                if self.strict {
                    self.compensate(&tire.id, plan.old_stock).await;
                }
                Err(Error::PartialWrite {
                    tire_id: tire.id.to_string(),
                    reason: err.to_string(),
                })
            }
        }
    }

    async fn compensate(&self, id: &TireId, old_stock: u32) {
        match self.store.update_tire(id, &TirePatch::stock(old_stock)).await {
            Ok(_) => info!(tire_id = %id, old_stock, "Stock rolled back"),
            Err(err) => warn!(tire_id = %id, error = %err, "Stock rollback failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TireCategory, TireType, ValidationError};
    use crate::testkit::store::MemoryStore;
    use rust_decimal_macros::dec;

    fn new_tire(stock: i64) -> NewTire {
        NewTire::builder("120/70-17", "Michelin", "Road 6", TireCategory::Sport, TireType::Front)
            .price(dec!(100))
            .stock(stock)
            .build()
            .unwrap()
    }

    fn ledger(store: &Arc<MemoryStore>) -> StockLedger {
        StockLedger::new(store.clone())
    }

    #[tokio::test]
    async fn initial_stock_synthesises_entrada() {
        let store = Arc::new(MemoryStore::new());
        let entry = ledger(&store).create_tire(&new_tire(8)).await.unwrap();

        let movement = entry.movement.unwrap();
        assert_eq!(movement.kind, MovementKind::Entrada);
        assert_eq!((movement.old_stock, movement.new_stock, movement.quantity), (0, 8, 8));
        assert_eq!(movement.reason, "Initial stock");
    }

    #[tokio::test]
    async fn zero_initial_stock_records_nothing() {
        let store = Arc::new(MemoryStore::new());
        let entry = ledger(&store).create_tire(&new_tire(0)).await.unwrap();
        assert!(entry.movement.is_none());
        assert!(store.movements().is_empty());
    }

    #[tokio::test]
    async fn rejected_salida_touches_no_store() {
        let store = Arc::new(MemoryStore::new());
        let ledger = ledger(&store);
        let tire = ledger.create_tire(&new_tire(3)).await.unwrap().tire;
        let writes = store.write_count();

        let err = ledger
            .register_movement(&tire, MovementKind::Salida, 5, "")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InsufficientStock { requested: 5, available: 3 })
        ));
        assert_eq!(store.write_count(), writes);
        assert_eq!(store.tire(&tire.id).unwrap().stock, 3);
    }

    #[tokio::test]
    async fn quick_adjust_below_zero_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        let ledger = ledger(&store);
        let tire = ledger.create_tire(&new_tire(0)).await.unwrap().tire;
        assert!(matches!(
            ledger.adjust_stock(&tire, Step::Down).await,
            Err(Error::Validation(ValidationError::NegativeStock { .. }))
        ));
    }

    #[tokio::test]
    async fn direct_stock_edit_is_recorded_as_ajuste() {
        let store = Arc::new(MemoryStore::new());
        let ledger = ledger(&store);
        let tire = ledger.create_tire(&new_tire(2)).await.unwrap().tire;

        let entry = ledger.update_tire(&tire, &TirePatch::stock(9)).await.unwrap();
        let movement = entry.movement.unwrap();
        assert_eq!(movement.kind, MovementKind::Ajuste);
        assert_eq!((movement.old_stock, movement.new_stock), (2, 9));

        let rename = TirePatch {
            brand: Some("Pirelli".into()),
            ..TirePatch::default()
        };
        assert!(ledger.update_tire(&entry.tire, &rename).await.unwrap().movement.is_none());
    }

    #[tokio::test]
    async fn failed_movement_insert_leaves_new_stock_by_default() {
        let store = Arc::new(MemoryStore::new());
        let ledger = ledger(&store);
        let tire = ledger.create_tire(&new_tire(4)).await.unwrap().tire;

        store.fail_next_movement();
        let err = ledger.adjust_stock(&tire, Step::Up).await.unwrap_err();
        assert!(matches!(err, Error::PartialWrite { .. }));
        assert_eq!(store.tire(&tire.id).unwrap().stock, 5);
        assert_eq!(store.movements().len(), 1);
    }

    #[tokio::test]
    async fn strict_mode_rolls_stock_back() {
        let store = Arc::new(MemoryStore::new());
        let ledger = ledger(&store).with_strict(true);
        let tire = ledger.create_tire(&new_tire(4)).await.unwrap().tire;

        store.fail_next_movement();
        let err = ledger
            .register_movement(&tire, MovementKind::Transferencia, 4, "to branch")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PartialWrite { .. }));
        assert_eq!(store.tire(&tire.id).unwrap().stock, 4);
    }
}
