//! Shared domain logic for the Warehouse Inventory Management platform
//!
//! This crate holds the pure pieces of the system: the low-stock
//! classification rules and field validation helpers. The backend feeds
//! these with data from the store, which keeps the replenishment policy
//! testable without a database.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::*;
