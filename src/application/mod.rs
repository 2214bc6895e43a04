//! Application services (use cases).
//!
//! These services orchestrate domain rules and coordinate adapters to
//! implement the inventory use cases.

pub mod backend;
pub mod inventory;
pub mod ledger;
pub mod migration;
pub mod repository;
pub mod session;

pub use backend::{BackendSelector, FailoverStore};
pub use inventory::Inventory;
pub use ledger::{LedgerEntry, StockLedger};
pub use migration::{MigrationAgent, MigrationReport};
pub use repository::{HistoryEntry, InventoryRepository};
pub use session::SessionGate;
