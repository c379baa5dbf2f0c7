//! The behaviour contracts that a storage backend must fulfil to drive the storefront.
//!
//! The server and the engine APIs are generic over these traits, so endpoint tests can swap the
//! SQLite backend out for mocks.

mod catalog_management;
mod order_flow_database;
mod order_management;

pub use catalog_management::{CatalogApiError, CatalogManagement};
pub use order_flow_database::{OrderFlowDatabase, OrderFlowError};
pub use order_management::{OrderManagement, OrderQueryError};
