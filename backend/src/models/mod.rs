//! Domain models for the Warehouse Inventory Management platform
//!
//! Re-exports the shared crate's pure domain types and logic

pub use shared::models::*;
