//! Likes, views and the visitor fingerprint used to de-duplicate likes and
//! count unique viewers.

use std::net::IpAddr;

use chrono::Duration;

use crate::types::{Day, Timestamp};

/// Fingerprint recorded when neither a forwarded address nor a peer address
/// is available.
pub const UNKNOWN_FINGERPRINT: &str = "unknown";

/// Maximum stored fingerprint length; longer header values are truncated.
pub const MAX_FINGERPRINT_LEN: usize = 128;

/// Maximum stored length of a referrer or user agent.
pub const MAX_VISIT_HEADER_LEN: usize = 512;

/// Number of trailing days covered by the owner analytics series.
pub const ANALYTICS_WINDOW_DAYS: i64 = 30;

/// Referrers listed in owner analytics.
pub const TOP_REFERRERS: i64 = 5;

/// Derive the anonymous visitor fingerprint for a request.
///
/// Prefers the first (client-most) entry of `X-Forwarded-For`, falls back to
/// the peer address of the connection, then to [`UNKNOWN_FINGERPRINT`].
pub fn visitor_fingerprint(forwarded_for: Option<&str>, peer: Option<IpAddr>) -> String {
    let forwarded = forwarded_for
        .and_then(|header| header.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty());

    let fingerprint = match (forwarded, peer) {
        (Some(first), _) => first.to_string(),
        (None, Some(ip)) => ip.to_string(),
        (None, None) => UNKNOWN_FINGERPRINT.to_string(),
    };
    truncate_at_char(fingerprint, MAX_FINGERPRINT_LEN)
}

/// Request facts stored with every counted view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    /// Visitor fingerprint, see [`visitor_fingerprint`].
    pub viewer: String,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

impl Visit {
    /// Blank header values are dropped; long ones are cut to
    /// [`MAX_VISIT_HEADER_LEN`] bytes.
    pub fn new(viewer: impl Into<String>, user_agent: Option<&str>, referrer: Option<&str>) -> Self {
        Self {
            viewer: viewer.into(),
            user_agent: header_value(user_agent),
            referrer: header_value(referrer),
        }
    }
}

fn header_value(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| truncate_at_char(v.to_string(), MAX_VISIT_HEADER_LEN))
}

fn truncate_at_char(mut value: String, max: usize) -> String {
    if value.len() > max {
        let mut cut = max;
        while !value.is_char_boundary(cut) {
            cut -= 1;
        }
        value.truncate(cut);
    }
    value
}

/// Result of a like attempt.
///
/// A repeat like from the same fingerprint is not an error: callers treat
/// [`LikeOutcome::AlreadyLiked`] as success and show the unchanged count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    /// The like was recorded; carries the new `like_count`.
    Liked(i64),
    /// This fingerprint had already liked the wishlist; carries the current count.
    AlreadyLiked(i64),
}

impl LikeOutcome {
    pub fn like_count(self) -> i64 {
        match self {
            LikeOutcome::Liked(count) | LikeOutcome::AlreadyLiked(count) => count,
        }
    }

    pub fn already_liked(self) -> bool {
        matches!(self, LikeOutcome::AlreadyLiked(_))
    }
}

/// Who is looking at a wishlist. Drives the reservation projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Owner,
    Public,
}

/// UTC day bucket a view recorded at `at` belongs to.
pub fn view_day(at: Timestamp) -> Day {
    at.date_naive()
}

/// First day (inclusive) of the analytics window ending on `today`.
pub fn analytics_window_start(today: Day) -> Day {
    today - Duration::days(ANALYTICS_WINDOW_DAYS - 1)
}
