//! Owner-facing engagement analytics.

use serde::Serialize;
use sqlx::FromRow;
use wishly_core::types::{Day, DbId};

/// One bucket of the daily view series.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct DailyViews {
    pub date: Day,
    pub views: i64,
}

/// How often one referrer sent a visitor.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct ReferrerCount {
    pub referrer: String,
    pub count: i64,
}

/// Aggregates over the per-view rows of one wishlist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewStats {
    /// Distinct visitor fingerprints over the wishlist's lifetime.
    pub unique_viewers: i64,
    /// Most frequent referrers, highest count first.
    pub top_referrers: Vec<ReferrerCount>,
}

/// Response for `GET /api/wishlists/{id}/analytics`.
#[derive(Debug, Clone, Serialize)]
pub struct WishlistAnalytics {
    pub wishlist_id: DbId,
    pub title: String,
    pub total_views: i64,
    pub unique_viewers: i64,
    pub like_count: i64,
    /// Trailing window, ascending by date; days without views are omitted.
    pub daily_views: Vec<DailyViews>,
    pub top_referrers: Vec<ReferrerCount>,
}
