//! Tirestock - stock ledger for a motorcycle tire shop.
//!
//! Tires are tracked with their current stock, and every stock change is
//! recorded as a movement (entrada, salida, transferencia or ajuste).
//! Records live on a hosted PostgREST backend when it is reachable and in
//! a local key-value directory otherwise; local records can later be
//! migrated to the hosted backend.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - [`domain`] - Records, stock rules and read-side derivations. No I/O.
//! - [`port`] - Traits the application depends on: stores, session, notices.
//! - [`application`] - Use cases: the stock ledger, backend selection with
//!   failover, the inventory snapshot, migration and the session gate.
//! - [`adapter`] - The CLI and the outbound stores (hosted, local).
//! - [`infrastructure`] - Configuration, logging and wiring.
//!
//! # Example
//!
//! ```
//! use tirestock::domain::ledger::{plan_quick_adjust, Step};
//!
//! let plan = plan_quick_adjust(0, Step::Up).unwrap();
//! assert_eq!(plan.new_stock, 1);
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
