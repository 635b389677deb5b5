//! Wishly engagement API server library.
//!
//! Exposes the building blocks (config, state, error handling, extractors,
//! the engagement service, routes) so integration tests and the binary
//! entrypoint share them.

pub mod auth;
pub mod config;
pub mod engagement;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;
