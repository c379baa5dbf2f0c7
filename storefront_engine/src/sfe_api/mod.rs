//! The engine's public API.
//!
//! Specific backends (currently SQLite) implement the traits in [`crate::traits`]; the API structs
//! here wrap a backend and add the cross-cutting logic that is independent of storage: validation,
//! permission checks, the payment verification gate and event emission.

pub mod catalog_api;
pub mod catalog_objects;
pub mod order_flow_api;
pub mod order_objects;
pub mod orders_api;
