//! Repository for the `wishlists` table.

use sqlx::PgPool;
use wishly_core::types::DbId;

use crate::models::wishlist::{NewWishlist, UpdateWishlist, Wishlist, WishlistSummary};

/// Column list for `wishlists` queries.
const COLUMNS: &str = "\
    id, user_id, title, description, slug, is_public, \
    view_count, like_count, created_at, updated_at";

/// Provides CRUD operations for wishlists.
pub struct WishlistRepo;

impl WishlistRepo {
    /// Insert a new wishlist with zeroed counters.
    pub async fn create(pool: &PgPool, input: &NewWishlist) -> Result<Wishlist, sqlx::Error> {
        let query = format!(
            "INSERT INTO wishlists (user_id, title, description, slug, is_public) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Wishlist>(&query)
            .bind(input.user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.slug)
            .bind(input.is_public)
            .fetch_one(pool)
            .await
    }

    /// Find a wishlist by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Wishlist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM wishlists WHERE id = $1");
        sqlx::query_as::<_, Wishlist>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a wishlist by its public slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Wishlist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM wishlists WHERE slug = $1");
        sqlx::query_as::<_, Wishlist>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List an owner's wishlists, newest first, with their item counts.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<WishlistSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, \
                 (SELECT COUNT(*) FROM wishlist_items i WHERE i.wishlist_id = wishlists.id) \
                     AS item_count \
             FROM wishlists \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, WishlistSummary>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Update title, description and/or visibility. Only non-`None` fields change.
    ///
    /// Returns `None` if no wishlist with the given ID exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWishlist,
    ) -> Result<Option<Wishlist>, sqlx::Error> {
        let query = format!(
            "UPDATE wishlists SET \
                 title = COALESCE($2, title), \
                 description = COALESCE($3, description), \
                 is_public = COALESCE($4, is_public), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Wishlist>(&query)
            .bind(id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(input.is_public)
            .fetch_optional(pool)
            .await
    }

    /// Delete a wishlist. Items, reservations, likes and view buckets cascade.
    ///
    /// Returns `true` if a wishlist was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM wishlists WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Create `target` and copy every item definition of `source_id` into it.
    ///
    /// Reservations, likes and view counters are not copied.
    pub async fn clone_from(
        pool: &PgPool,
        source_id: DbId,
        target: &NewWishlist,
    ) -> Result<Wishlist, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO wishlists (user_id, title, description, slug, is_public) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        let wishlist = sqlx::query_as::<_, Wishlist>(&insert_query)
            .bind(target.user_id)
            .bind(&target.title)
            .bind(&target.description)
            .bind(&target.slug)
            .bind(target.is_public)
            .fetch_one(&mut *tx)
            .await?;

        let copied = sqlx::query(
            "INSERT INTO wishlist_items (wishlist_id, name, price, currency, tag, url, image_url) \
             SELECT $1, name, price, currency, tag, url, image_url \
             FROM wishlist_items \
             WHERE wishlist_id = $2 \
             ORDER BY created_at ASC, id ASC",
        )
        .bind(wishlist.id)
        .bind(source_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            source_id,
            wishlist_id = wishlist.id,
            items = copied.rows_affected(),
            "Wishlist items copied",
        );
        Ok(wishlist)
    }
}
