//! Request handlers.
//!
//! Each submodule provides the async handler functions for one resource.
//! Handlers validate input, delegate to the store or to
//! [`crate::engagement::EngagementService`], and map errors via
//! [`crate::error::AppError`].

pub mod discovery;
pub mod engagement;
pub mod item;
pub mod wishlist;
