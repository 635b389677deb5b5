//! Repository for the public discovery feed.

use sqlx::PgPool;

use crate::models::discovery::TrendingItem;

/// Read-only aggregates across public wishlists.
pub struct DiscoveryRepo;

impl DiscoveryRepo {
    /// Item definitions most often found on public wishlists, at most `limit`.
    ///
    /// Ties are broken by name so the feed is stable between requests.
    pub async fn trending(pool: &PgPool, limit: i64) -> Result<Vec<TrendingItem>, sqlx::Error> {
        sqlx::query_as::<_, TrendingItem>(
            "SELECT i.name, i.url, i.image_url, i.price, i.currency, \
                    COUNT(*) AS occurrences \
             FROM wishlist_items i \
             JOIN wishlists w ON w.id = i.wishlist_id \
             WHERE w.is_public \
             GROUP BY i.name, i.url, i.image_url, i.price, i.currency \
             ORDER BY occurrences DESC, i.name ASC \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
