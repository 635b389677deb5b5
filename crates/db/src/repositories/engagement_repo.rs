//! Repository for wishlist engagement: view counters, daily view buckets,
//! per-view facts and likes.
//!
//! All counter changes are single `UPDATE ... SET n = n + 1` statements; no
//! value is read into the application and written back.

use sqlx::PgPool;
use wishly_core::engagement::{LikeOutcome, Visit};
use wishly_core::types::{Day, DbId};

use crate::models::analytics::{DailyViews, ReferrerCount, ViewStats};

/// Provides atomic counter updates for views and likes.
pub struct EngagementRepo;

impl EngagementRepo {
    /// Increment `view_count` and the bucket for `day`, and store `visit`, in
    /// one transaction.
    ///
    /// Returns the new `view_count`, or `None` if the wishlist does not exist.
    pub async fn record_view(
        pool: &PgPool,
        wishlist_id: DbId,
        day: Day,
        visit: &Visit,
    ) -> Result<Option<i64>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let view_count: Option<i64> = sqlx::query_scalar(
            "UPDATE wishlists SET view_count = view_count + 1 \
             WHERE id = $1 \
             RETURNING view_count",
        )
        .bind(wishlist_id)
        .fetch_optional(&mut *tx)
        .await?;

        if view_count.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        sqlx::query(
            "INSERT INTO wishlist_daily_views (wishlist_id, day, views) \
             VALUES ($1, $2, 1) \
             ON CONFLICT (wishlist_id, day) \
             DO UPDATE SET views = wishlist_daily_views.views + 1",
        )
        .bind(wishlist_id)
        .bind(day)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO wishlist_views (wishlist_id, viewer, user_agent, referrer) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(wishlist_id)
        .bind(&visit.viewer)
        .bind(visit.user_agent.as_deref())
        .bind(visit.referrer.as_deref())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(view_count)
    }

    /// Record a like from `fingerprint` at most once per wishlist.
    ///
    /// The `uq_wishlist_likes_wishlist_fingerprint` constraint makes the
    /// insert the arbiter: concurrent requests for the same pair block on the
    /// index and all but one fall through to `DO NOTHING`. `like_count` is
    /// only incremented when the insert actually added a row.
    pub async fn like(
        pool: &PgPool,
        wishlist_id: DbId,
        fingerprint: &str,
    ) -> Result<Option<LikeOutcome>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let inserted = sqlx::query(
            "INSERT INTO wishlist_likes (wishlist_id, fingerprint) \
             SELECT id, $2 FROM wishlists WHERE id = $1 \
             ON CONFLICT (wishlist_id, fingerprint) DO NOTHING",
        )
        .bind(wishlist_id)
        .bind(fingerprint)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            > 0;

        let outcome = if inserted {
            let count: i64 = sqlx::query_scalar(
                "UPDATE wishlists SET like_count = like_count + 1 \
                 WHERE id = $1 \
                 RETURNING like_count",
            )
            .bind(wishlist_id)
            .fetch_one(&mut *tx)
            .await?;
            Some(LikeOutcome::Liked(count))
        } else {
            let count: Option<i64> =
                sqlx::query_scalar("SELECT like_count FROM wishlists WHERE id = $1")
                    .bind(wishlist_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            count.map(LikeOutcome::AlreadyLiked)
        };

        tx.commit().await?;
        Ok(outcome)
    }

    /// Daily view buckets on or after `since`, ascending by date.
    pub async fn daily_views(
        pool: &PgPool,
        wishlist_id: DbId,
        since: Day,
    ) -> Result<Vec<DailyViews>, sqlx::Error> {
        sqlx::query_as::<_, DailyViews>(
            "SELECT day AS date, views FROM wishlist_daily_views \
             WHERE wishlist_id = $1 AND day >= $2 \
             ORDER BY day ASC",
        )
        .bind(wishlist_id)
        .bind(since)
        .fetch_all(pool)
        .await
    }

    /// Distinct viewers and the `referrer_limit` most frequent referrers.
    pub async fn view_stats(
        pool: &PgPool,
        wishlist_id: DbId,
        referrer_limit: i64,
    ) -> Result<ViewStats, sqlx::Error> {
        let unique_viewers: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT viewer) FROM wishlist_views WHERE wishlist_id = $1",
        )
        .bind(wishlist_id)
        .fetch_one(pool)
        .await?;

        let top_referrers = sqlx::query_as::<_, ReferrerCount>(
            "SELECT referrer, COUNT(*) AS count FROM wishlist_views \
             WHERE wishlist_id = $1 AND referrer IS NOT NULL \
             GROUP BY referrer \
             ORDER BY count DESC, referrer ASC \
             LIMIT $2",
        )
        .bind(wishlist_id)
        .bind(referrer_limit)
        .fetch_all(pool)
        .await?;

        Ok(ViewStats {
            unique_viewers,
            top_referrers,
        })
    }
}
