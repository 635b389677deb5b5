//! Public discovery feed.

use serde::Serialize;
use sqlx::FromRow;

/// An item definition that appears on several public wishlists.
///
/// Items are grouped on every user-visible field, so two entries only merge
/// when name, links, price and currency all agree.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct TrendingItem {
    pub name: String,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<f64>,
    pub currency: String,
    /// Number of public wishlist items carrying this definition.
    pub occurrences: i64,
}

/// Response for `GET /api/discovery`.
#[derive(Debug, Clone, Serialize)]
pub struct Discovery {
    pub trending: Vec<TrendingItem>,
}
