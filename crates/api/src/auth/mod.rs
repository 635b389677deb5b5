//! Bearer-token verification.
//!
//! Sessions are issued by the account service; this server only checks the
//! HS256 access tokens it hands out, using the shared `JWT_SECRET`.

pub mod jwt;
