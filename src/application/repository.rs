//! Inventory repository: the in-memory snapshot behind every view.
//!
//! The snapshot is replaced wholesale by [`InventoryRepository::reload`],
//! which callers run after every mutation so reads always see their own
//! writes.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Local, NaiveDate, TimeZone};
use parking_lot::RwLock;
use tracing::debug;

use crate::domain::filter::sort_newest_first;
use crate::domain::tire::DELETED_TIRE_LABEL;
use crate::domain::{DashboardStats, HistoryFilter, Movement, Tire, TireFilter, TireId};
use crate::error::Result;
use crate::port::outbound::store::InventoryStore;

/// One row of the movement history.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub movement: Movement,
    /// Current label of the tire, or the deleted-tire placeholder.
    pub tire_label: String,
}

#[derive(Debug, Default)]
struct Snapshot {
    tires: Vec<Tire>,
    /// Newest first.
    movements: Vec<Movement>,
}

/// Cached tires and movements with derived views.
pub struct InventoryRepository {
    store: Arc<dyn InventoryStore>,
    snapshot: RwLock<Snapshot>,
}

impl InventoryRepository {
    #[must_use]
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self {
            store,
            snapshot: RwLock::new(Snapshot::default()),
        }
    }

    /// Replace the snapshot with the store's current contents.
    pub async fn reload(&self) -> Result<()> {
        let tires = self.store.list_tires().await?;
        let mut movements = self.store.list_movements().await?;
        sort_newest_first(&mut movements);
        debug!(
            tires = tires.len(),
            movements = movements.len(),
            backend = %self.store.backend(),
            "Inventory reloaded"
        );
        *self.snapshot.write() = Snapshot { tires, movements };
        Ok(())
    }

    #[must_use]
    pub fn tires(&self) -> Vec<Tire> {
        self.snapshot.read().tires.clone()
    }

    #[must_use]
    pub fn tire(&self, id: &TireId) -> Option<Tire> {
        self.snapshot.read().tires.iter().find(|t| &t.id == id).cloned()
    }

    /// Tires matching the inventory filter, in store order.
    #[must_use]
    pub fn filter_tires(&self, filter: &TireFilter) -> Vec<Tire> {
        self.snapshot
            .read()
            .tires
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect()
    }

    /// Tires matching `filter` that are at or below their minimum stock.
    #[must_use]
    pub fn low_stock(&self, filter: &TireFilter) -> Vec<Tire> {
        self.filter_tires(filter)
            .into_iter()
            .filter(Tire::is_low_stock)
            .collect()
    }

    /// Newest movements, at most `limit`.
    #[must_use]
    pub fn recent_movements(&self, limit: usize) -> Vec<HistoryEntry> {
        let snapshot = self.snapshot.read();
        let labels = labels(&snapshot.tires);
        snapshot
            .movements
            .iter()
            .take(limit)
            .map(|m| entry(m, &labels))
            .collect()
    }

    /// Movement history in the local time zone, newest first.
    #[must_use]
    pub fn history(&self, filter: &HistoryFilter) -> Vec<HistoryEntry> {
        self.history_in(filter, &Local)
    }

    /// Movement history with day bounds taken in `tz`, newest first.
    #[must_use]
    pub fn history_in<Tz: TimeZone>(&self, filter: &HistoryFilter, tz: &Tz) -> Vec<HistoryEntry> {
        let snapshot = self.snapshot.read();
        let labels = labels(&snapshot.tires);
        snapshot
            .movements
            .iter()
            .filter(|m| filter.matches_in(m, tz))
            .map(|m| entry(m, &labels))
            .collect()
    }

    /// Dashboard for today in the local time zone.
    #[must_use]
    pub fn dashboard(&self) -> DashboardStats {
        self.dashboard_on(Local::now().date_naive(), &Local)
    }

    #[must_use]
    pub fn dashboard_on<Tz: TimeZone>(&self, today: NaiveDate, tz: &Tz) -> DashboardStats {
        let snapshot = self.snapshot.read();
        DashboardStats::compute(&snapshot.tires, &snapshot.movements, today, tz)
    }

    /// Label for a tire id, tolerating deleted tires.
    #[must_use]
    pub fn tire_label(&self, id: &TireId) -> String {
        self.tire(id)
            .map_or_else(|| DELETED_TIRE_LABEL.to_string(), |t| t.label())
    }
}

fn labels(tires: &[Tire]) -> HashMap<&TireId, String> {
    tires.iter().map(|t| (&t.id, t.label())).collect()
}

fn entry(movement: &Movement, labels: &HashMap<&TireId, String>) -> HistoryEntry {
    HistoryEntry {
        movement: movement.clone(),
        tire_label: labels
            .get(&movement.tire_id)
            .cloned()
            .or_else(|| movement.tire_label.clone())
            .unwrap_or_else(|| DELETED_TIRE_LABEL.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MovementKind;
    use crate::testkit::domain::{at, movement, tire};
    use crate::testkit::store::MemoryStore;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    async fn repository(store: MemoryStore) -> InventoryRepository {
        let repo = InventoryRepository::new(Arc::new(store));
        repo.reload().await.unwrap();
        repo
    }

    #[tokio::test]
    async fn history_is_newest_first_with_placeholder_for_deleted_tires() {
        let store = MemoryStore::new();
        store.seed(
            vec![tire("t1", "Michelin", dec!(100), 3, 5)],
            vec![
                movement("t1", MovementKind::Entrada, 0, 3, at(2024, 6, 1, 9)),
                movement("gone", MovementKind::Salida, 2, 1, at(2024, 6, 2, 9)),
            ],
        );
        let repo = repository(store).await;

        let history = repo.history_in(&HistoryFilter::default(), &Utc);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].tire_label, DELETED_TIRE_LABEL);
        assert_eq!(history[1].tire_label, "Michelin Road 6 120/70-17");
    }

    #[tokio::test]
    async fn deleted_tire_keeps_its_stored_label() {
        let mut sold = movement("gone", MovementKind::Salida, 2, 1, at(2024, 6, 2, 9));
        sold.tire_label = Some("Bridgestone Battlax 160/60-17".into());
        let mut renamed = movement("t1", MovementKind::Entrada, 0, 3, at(2024, 6, 1, 9));
        renamed.tire_label = Some("old name".into());
        let store = MemoryStore::new();
        store.seed(vec![tire("t1", "Michelin", dec!(100), 3, 5)], vec![sold, renamed]);
        let repo = repository(store).await;

        let history = repo.history_in(&HistoryFilter::default(), &Utc);
        assert_eq!(history[0].tire_label, "Bridgestone Battlax 160/60-17");
        assert_eq!(history[1].tire_label, "Michelin Road 6 120/70-17");
    }

    #[tokio::test]
    async fn history_day_bounds_are_inclusive() {
        let store = MemoryStore::new();
        store.seed(
            vec![],
            vec![
                movement("t1", MovementKind::Entrada, 0, 1, at(2024, 6, 1, 0)),
                movement("t1", MovementKind::Entrada, 1, 2, at(2024, 6, 1, 23)),
                movement("t1", MovementKind::Entrada, 2, 3, at(2024, 6, 2, 0)),
            ],
        );
        let repo = repository(store).await;
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let filter = HistoryFilter {
            from: Some(day),
            to: Some(day),
            kind: None,
        };
        assert_eq!(repo.history_in(&filter, &Utc).len(), 2);
    }

    #[tokio::test]
    async fn dashboard_counts_low_stock_and_value() {
        let store = MemoryStore::new();
        store.seed(
            vec![
                tire("a", "Michelin", dec!(100), 3, 5),
                tire("b", "Pirelli", dec!(50), 1, 0),
            ],
            vec![],
        );
        let repo = repository(store).await;
        let stats = repo.dashboard_on(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), &Utc);
        assert_eq!(stats.low_stock, 1);
        assert_eq!(stats.total_value, dec!(350.00));
        assert_eq!(repo.low_stock(&TireFilter::default()).len(), 1);
    }

    #[tokio::test]
    async fn reload_picks_up_store_changes() {
        let store = Arc::new(MemoryStore::new());
        let repo = InventoryRepository::new(store.clone());
        repo.reload().await.unwrap();
        assert!(repo.tires().is_empty());

        store.seed(vec![tire("x", "Dunlop", dec!(1), 9, 5)], vec![]);
        repo.reload().await.unwrap();
        assert_eq!(repo.tire_label(&TireId::from("x")), "Dunlop Road 6 120/70-17");
        assert_eq!(repo.tire_label(&TireId::from("y")), DELETED_TIRE_LABEL);
    }
}
