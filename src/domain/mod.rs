//! Backend-agnostic inventory domain: records, stock rules, and read-side
//! derivations.

pub mod error;
pub mod filter;
pub mod id;
pub mod ledger;
pub mod movement;
pub mod session;
pub mod stats;
pub mod tire;

pub use error::ValidationError;
pub use filter::{HistoryFilter, TireFilter};
pub use id::{MovementId, TireId};
pub use ledger::{StockPlan, Step};
pub use movement::{Movement, MovementKind, NewMovement};
pub use session::{AuthEvent, User};
pub use stats::{DashboardStats, StockBar};
pub use tire::{NewTire, StockLevel, Tire, TireCategory, TirePatch, TireType};
