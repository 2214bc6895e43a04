//! Local inventory store.
//!
//! Every mutation is a read-modify-write of a whole entry, serialized by a
//! mutex so concurrent callers in one process never lose updates.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, info};

use super::dto::{
    decode_movements, decode_tires, LocalMovementRecord, LocalTireRecord, MOVEMENTS_KEY,
    TIRES_KEY,
};
use super::storage::KeyValueStorage;
use crate::domain::{Movement, MovementId, NewMovement, NewTire, Tire, TireId, TirePatch};
use crate::error::{Error, Result};
use crate::port::outbound::store::{BackendKind, ClearableStore, InventoryStore};

/// Fallback store over [`KeyValueStorage`].
pub struct LocalStore {
    storage: KeyValueStorage,
    write_lock: Mutex<()>,
}

impl LocalStore {
    #[must_use]
    pub fn new(storage: KeyValueStorage) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    /// Remove both entries.
    pub fn clear_entries(&self) -> Result<()> {
        let _guard = self.write_lock.lock();
        self.storage.remove_item(TIRES_KEY)?;
        self.storage.remove_item(MOVEMENTS_KEY)?;
        info!("Local inventory cleared");
        Ok(())
    }

    fn read_tires(&self) -> Result<Vec<LocalTireRecord>> {
        self.read_entry(TIRES_KEY)
    }

    fn read_movements(&self) -> Result<Vec<LocalMovementRecord>> {
        self.read_entry(MOVEMENTS_KEY)
    }

    fn read_entry<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        match self.storage.get_item(key)? {
            Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
            _ => Ok(Vec::new()),
        }
    }

    fn write_entry<T: serde::Serialize>(&self, key: &str, records: &[T]) -> Result<()> {
        let raw = serde_json::to_string(records)?;
        self.storage.set_item(key, &raw)
    }
}

#[async_trait]
impl InventoryStore for LocalStore {
    fn backend(&self) -> BackendKind {
        BackendKind::Local
    }

    async fn list_tires(&self) -> Result<Vec<Tire>> {
        match self.storage.get_item(TIRES_KEY)? {
            Some(raw) if !raw.trim().is_empty() => decode_tires(&raw),
            _ => Ok(Vec::new()),
        }
    }

    async fn list_movements(&self) -> Result<Vec<Movement>> {
        match self.storage.get_item(MOVEMENTS_KEY)? {
            Some(raw) if !raw.trim().is_empty() => decode_movements(&raw),
            _ => Ok(Vec::new()),
        }
    }

    async fn create_tire(&self, tire: &NewTire) -> Result<Tire> {
        let _guard = self.write_lock.lock();
        let mut records = self.read_tires()?;
        let created = Tire {
            id: TireId::generate(),
            measure: tire.measure.clone(),
            brand: tire.brand.clone(),
            reference: tire.reference.clone(),
            category: tire.category,
            tire_type: tire.tire_type,
            price: tire.price,
            stock: tire.stock,
            min_stock: tire.min_stock,
            created_at: Utc::now(),
        };
        records.push(LocalTireRecord::from(&created));
        self.write_entry(TIRES_KEY, &records)?;
        debug!(tire_id = %created.id, "Tire stored locally");
        Ok(created)
    }

    async fn update_tire(&self, id: &TireId, patch: &TirePatch) -> Result<Tire> {
        let _guard = self.write_lock.lock();
        let mut records = self.read_tires()?;
        let slot = records
            .iter_mut()
            .find(|r| r.id == id.as_str())
            .ok_or_else(|| Error::tire_not_found(id))?;
        let updated = Tire::try_from(slot.clone())?.patched(patch);
        *slot = LocalTireRecord::from(&updated);
        self.write_entry(TIRES_KEY, &records)?;
        debug!(tire_id = %id, "Tire updated locally");
        Ok(updated)
    }

    async fn delete_tire(&self, id: &TireId) -> Result<()> {
        let _guard = self.write_lock.lock();
        let mut records = self.read_tires()?;
        let before = records.len();
        records.retain(|r| r.id != id.as_str());
        if records.len() == before {
            return Err(Error::tire_not_found(id));
        }
        self.write_entry(TIRES_KEY, &records)?;
        debug!(tire_id = %id, "Tire deleted locally");
        Ok(())
    }

    async fn create_movement(&self, movement: &NewMovement) -> Result<Movement> {
        let _guard = self.write_lock.lock();
        let tire_label = self
            .read_tires()?
            .into_iter()
            .find(|r| r.id == movement.tire_id.as_str())
            .map(|r| format!("{} {} {}", r.brand, r.reference, r.measure));

        let created = Movement {
            id: MovementId::generate(),
            tire_id: movement.tire_id.clone(),
            tire_label,
            kind: movement.kind,
            quantity: movement.quantity,
            old_stock: movement.old_stock,
            new_stock: movement.new_stock,
            reason: movement.reason.clone(),
            created_at: Utc::now(),
        };
        let mut records = self.read_movements()?;
        records.push(LocalMovementRecord::from(&created));
        self.write_entry(MOVEMENTS_KEY, &records)?;
        debug!(movement_id = %created.id, kind = %created.kind, "Movement stored locally");
        Ok(created)
    }
}

#[async_trait]
impl ClearableStore for LocalStore {
    async fn clear(&self) -> Result<()> {
        self.clear_entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MovementKind, TireCategory, TireType};
    use rust_decimal_macros::dec;

    fn store() -> (tempfile::TempDir, LocalStore) {
        let dir = tempfile::tempdir().unwrap();
        let storage = KeyValueStorage::open(dir.path()).unwrap();
        (dir, LocalStore::new(storage))
    }

    fn new_tire(stock: i64) -> NewTire {
        NewTire::builder("110/70-17", "Dunlop", "Sportmax", TireCategory::Sport, TireType::Front)
            .price(dec!(70))
            .stock(stock)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn tires_list_in_insertion_order() {
        let (_dir, store) = store();
        let first = store.create_tire(&new_tire(1)).await.unwrap();
        let second = store.create_tire(&new_tire(2)).await.unwrap();

        let ids: Vec<_> = store.list_tires().await.unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn update_and_delete_unknown_ids_are_not_found() {
        let (_dir, store) = store();
        let missing = TireId::from("nope");
        assert!(matches!(
            store.update_tire(&missing, &TirePatch::stock(1)).await,
            Err(Error::NotFound { .. })
        ));
        assert!(matches!(store.delete_tire(&missing).await, Err(Error::NotFound { .. })));
    }

    #[tokio::test]
    async fn movements_snapshot_the_tire_label() {
        let (dir, store) = store();
        let tire = store.create_tire(&new_tire(3)).await.unwrap();
        let updated = store.update_tire(&tire.id, &TirePatch::stock(4)).await.unwrap();
        assert_eq!(updated.stock, 4);

        store
            .create_movement(&NewMovement {
                tire_id: tire.id.clone(),
                kind: MovementKind::Entrada,
                quantity: 1,
                old_stock: 3,
                new_stock: 4,
                reason: "restock".into(),
            })
            .await
            .unwrap();

        let raw = std::fs::read_to_string(dir.path().join("movements.json")).unwrap();
        assert!(raw.contains("\"tireName\":\"Dunlop Sportmax 110/70-17\""));
        assert_eq!(store.list_movements().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let (_dir, store) = store();
        store.create_tire(&new_tire(0)).await.unwrap();
        store.clear().await.unwrap();
        assert!(store.list_tires().await.unwrap().is_empty());
        assert!(store.list_movements().await.unwrap().is_empty());
    }
}
