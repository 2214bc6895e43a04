//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams where the inventory core meets the outside world:
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!     ┌──────────────┤  Ledger + Repository    ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │ Session │            │   Store     │              │ Notifier  │
//! │ Adapter │            │ (remote or  │              │  Adapter  │
//! └─────────┘            │   local)    │              └───────────┘
//!                        └─────────────┘
//! ```
//!
//! - [`InventoryStore`] - persistence of tires and movements
//! - [`Notifier`] - transient user-visible notices
//! - [`SessionProvider`] - identity collaborator gating initialization

pub mod outbound;

pub use outbound::notifier::{LogNotifier, Notice, NoticeLevel, Notifier, NotifierRegistry};
pub use outbound::session::{AuthCallback, SessionProvider};
pub use outbound::store::{BackendKind, ClearableStore, InventoryStore};
