//! Hosted relational backend (Supabase PostgREST).

pub mod client;
pub mod dto;
pub mod settings;
pub mod store;

pub use client::SupabaseClient;
pub use settings::SupabaseConfig;
pub use store::SupabaseStore;
