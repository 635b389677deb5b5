use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use wishly_core::engagement::visitor_fingerprint;

/// Anonymous visitor identity used to de-duplicate likes and count unique viewers.
///
/// Taken from the first `X-Forwarded-For` entry, else the peer address
/// (requires serving with `into_make_service_with_connect_info`), else
/// `"unknown"`. Never rejects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitorFingerprint(pub String);

impl<S> FromRequestParts<S> for VisitorFingerprint
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok());
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());

        Ok(VisitorFingerprint(visitor_fingerprint(forwarded, peer)))
    }
}
