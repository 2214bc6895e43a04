//! Local fallback persistence.
//!
//! Mirrors browser-style local storage: two named entries, `tires` and
//! `movements`, each holding the full serialized array. Records use the
//! camel-case field names of the local layout (`minStock`, `tireId`, ...).

pub mod dto;
pub mod settings;
pub mod storage;
pub mod store;

pub use settings::LocalConfig;
pub use storage::KeyValueStorage;
pub use store::LocalStore;
