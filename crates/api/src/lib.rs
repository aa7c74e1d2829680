//! SIRPOL API server library.
//!
//! Exposes config, state, error handling, routes and handlers so integration
//! tests and the binary entrypoint share the same building blocks.

pub mod cascade;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
