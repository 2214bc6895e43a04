//! In-memory inventory store with fault injection.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use crate::domain::{Movement, MovementId, NewMovement, NewTire, Tire, TireId, TirePatch};
use crate::error::{Error, Result};
use crate::port::outbound::store::{BackendKind, ClearableStore, InventoryStore};

#[derive(Default)]
struct State {
    tires: Vec<Tire>,
    movements: Vec<Movement>,
}

/// [`InventoryStore`] held in memory.
///
/// Lists in insertion order. Faults:
/// - [`fail_next_movement`](Self::fail_next_movement): the next movement
///   insert fails once.
/// - [`set_unavailable`](Self::set_unavailable): every call fails with
///   `BackendUnavailable` until cleared.
pub struct MemoryStore {
    kind: BackendKind,
    state: Mutex<State>,
    unavailable: AtomicBool,
    fail_next_movement: AtomicBool,
    fail_create_after: Mutex<Option<usize>>,
    writes: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// A store reporting itself as the local variant.
    pub fn new() -> Self {
        Self::with_kind(BackendKind::Local)
    }

    /// A store reporting itself as the remote variant.
    pub fn remote() -> Self {
        Self::with_kind(BackendKind::Remote)
    }

    fn with_kind(kind: BackendKind) -> Self {
        Self {
            kind,
            state: Mutex::new(State::default()),
            unavailable: AtomicBool::new(false),
            fail_next_movement: AtomicBool::new(false),
            fail_create_after: Mutex::new(None),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn fail_next_movement(&self) {
        self.fail_next_movement.store(true, Ordering::SeqCst);
    }

    /// Let `n` more tire inserts succeed, then fail the rest.
    pub fn fail_creates_after(&self, n: usize) {
        *self.fail_create_after.lock() = Some(n);
    }

    /// Number of successful mutations so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn tires(&self) -> Vec<Tire> {
        self.state.lock().tires.clone()
    }

    pub fn tire(&self, id: &TireId) -> Option<Tire> {
        self.state.lock().tires.iter().find(|t| &t.id == id).cloned()
    }

    pub fn movements(&self) -> Vec<Movement> {
        self.state.lock().movements.clone()
    }

    /// Seed records without counting writes.
    pub fn seed(&self, tires: Vec<Tire>, movements: Vec<Movement>) {
        let mut state = self.state.lock();
        state.tires.extend(tires);
        state.movements.extend(movements);
    }

    fn check(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Error::BackendUnavailable("memory store offline".into()));
        }
        Ok(())
    }

    fn wrote(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    fn backend(&self) -> BackendKind {
        self.kind
    }

    async fn probe(&self) -> Result<()> {
        self.check()
    }

    async fn list_tires(&self) -> Result<Vec<Tire>> {
        self.check()?;
        Ok(self.tires())
    }

    async fn list_movements(&self) -> Result<Vec<Movement>> {
        self.check()?;
        Ok(self.movements())
    }

    async fn create_tire(&self, tire: &NewTire) -> Result<Tire> {
        self.check()?;
        {
            let mut remaining = self.fail_create_after.lock();
            if let Some(n) = remaining.as_mut() {
                if *n == 0 {
                    return Err(Error::BackendUnavailable("injected create failure".into()));
                }
                *n -= 1;
            }
        }
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
        self.state.lock().tires.push(created.clone());
        self.wrote();
        Ok(created)
    }

    async fn update_tire(&self, id: &TireId, patch: &TirePatch) -> Result<Tire> {
        self.check()?;
        let updated = {
            let mut state = self.state.lock();
            let slot = state
                .tires
                .iter_mut()
                .find(|t| &t.id == id)
                .ok_or_else(|| Error::tire_not_found(id))?;
            *slot = slot.patched(patch);
            slot.clone()
        };
        self.wrote();
        Ok(updated)
    }

    async fn delete_tire(&self, id: &TireId) -> Result<()> {
        self.check()?;
        {
            let mut state = self.state.lock();
            let before = state.tires.len();
            state.tires.retain(|t| &t.id != id);
            if state.tires.len() == before {
                return Err(Error::tire_not_found(id));
            }
        }
        self.wrote();
        Ok(())
    }

    async fn create_movement(&self, movement: &NewMovement) -> Result<Movement> {
        self.check()?;
        if self.fail_next_movement.swap(false, Ordering::SeqCst) {
            return Err(Error::Parse("injected movement failure".into()));
        }
        let created = Movement {
            id: MovementId::generate(),
            tire_id: movement.tire_id.clone(),
            tire_label: None,
            kind: movement.kind,
            quantity: movement.quantity,
            old_stock: movement.old_stock,
            new_stock: movement.new_stock,
            reason: movement.reason.clone(),
            created_at: Utc::now(),
        };
        self.state.lock().movements.push(created.clone());
        self.wrote();
        Ok(created)
    }
}

#[async_trait]
impl ClearableStore for MemoryStore {
    async fn clear(&self) -> Result<()> {
        self.check()?;
        let mut state = self.state.lock();
        state.tires.clear();
        state.movements.clear();
        Ok(())
    }
}
