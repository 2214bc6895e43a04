//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`store`] — [`MemoryStore`](store::MemoryStore), an in-memory
//!   [`InventoryStore`](crate::port::InventoryStore) with fault injection.
//! - [`notifier`] — [`RecordingNotifier`](notifier::RecordingNotifier) for
//!   notice assertions.
//! - [`domain`] — Builders for tires and movements.

pub mod domain;
pub mod notifier;
pub mod store;
