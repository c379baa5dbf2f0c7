//! # ThreadStore server
//! This crate hosts the HTTP surface of the storefront. It is responsible for:
//! Authenticating callers via the bearer tokens issued by the external auth service.
//! Translating HTTP requests into engine API calls and engine errors into HTTP statuses.
//! Verifying and ingesting payment webhooks from the gateway.
//! Fanning committed orders out to the email and realtime-feed side effects.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The storefront endpoints live under `/api`: orders, products/reviews and payments. A `/health` route
//! returns a 200 OK response for liveness probes.

pub mod auth;
pub mod broadcaster;
pub mod config;
pub mod data_objects;
pub mod errors;

pub mod helpers;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
