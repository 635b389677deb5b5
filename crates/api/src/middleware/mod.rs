//! Request extractors.
//!
//! - [`auth::AuthUser`] -- requires a valid JWT Bearer token.
//! - [`auth::MaybeAuthUser`] -- resolves a Bearer token when one is sent.
//! - [`fingerprint::VisitorFingerprint`] -- anonymous visitor identity for likes and views.
//! - [`json::AppJson`] / [`json::AppPath`] -- `Json`/`Path` with [`crate::error::AppError`] rejections.

pub mod auth;
pub mod fingerprint;
pub mod json;
