//! ThreadStore Storefront Engine
//!
//! The storefront engine contains the core logic for order creation, payment reconciliation and
//! reviews. It is HTTP-agnostic; the storefront server crate puts an actix-web surface over it.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@sqlite`]). SQLite is the only supported backend at
//!    present. You should never need to access the database directly. Instead, use the public API
//!    provided by the engine. The exception is the data types used in the database. These are
//!    defined in the `db_types` module and are public.
//! 2. The engine public API ([`mod@sfe_api`]). This provides the public-facing functionality of
//!    the storefront: placing orders, moving them through the status state machine, recording
//!    payment confirmations, and reviews. Backends need to implement the traits in [`traits`] in
//!    order to act as a backend for the storefront server.
//!
//! The engine also provides a set of events that can be subscribed to. These events are emitted
//! when certain actions occur within the engine. For example, when a new order is created, an
//! `OrderCreatedEvent` is emitted. A simple actor framework is used so that you can easily hook
//! into these events and perform custom actions.

pub mod db_types;
pub mod events;
mod sfe_api;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use sfe_api::{
    catalog_api::CatalogApi,
    catalog_objects,
    order_flow_api::OrderFlowApi,
    order_objects,
    orders_api::OrderQueryApi,
};
