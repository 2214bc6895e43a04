//! Outbound adapters (driven side).

pub mod local;
pub mod session;
pub mod supabase;
