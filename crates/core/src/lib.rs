//! Domain rules for the wishlist engagement service.
//!
//! Everything in this crate is pure: no I/O, no database access. The `db`
//! and `api` crates build on these types and helpers.

pub mod engagement;
pub mod error;
pub mod reservation;
pub mod slug;
pub mod types;
pub mod validation;
