//! Repository for the `wishlist_items` table.

use sqlx::PgPool;
use wishly_core::types::DbId;
use wishly_core::validation::normalize_currency;

use crate::models::item::{CreateItem, Item, UpdateItem};

/// Column list for `wishlist_items` queries.
const COLUMNS: &str = "\
    id, wishlist_id, name, price, currency, tag, url, image_url, \
    created_at, updated_at";

/// Provides CRUD operations for wishlist items.
pub struct ItemRepo;

impl ItemRepo {
    /// Insert an item. The currency defaults to `NGN` and is stored upper-case.
    pub async fn create(
        pool: &PgPool,
        wishlist_id: DbId,
        input: &CreateItem,
    ) -> Result<Item, sqlx::Error> {
        let query = format!(
            "INSERT INTO wishlist_items \
                (wishlist_id, name, price, currency, tag, url, image_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(wishlist_id)
            .bind(input.name.trim())
            .bind(input.price)
            .bind(normalize_currency(input.currency.as_deref()))
            .bind(&input.tag)
            .bind(&input.url)
            .bind(&input.image_url)
            .fetch_one(pool)
            .await
    }

    /// Find an item by ID, scoped to its wishlist.
    pub async fn find(
        pool: &PgPool,
        wishlist_id: DbId,
        item_id: DbId,
    ) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM wishlist_items WHERE id = $1 AND wishlist_id = $2");
        sqlx::query_as::<_, Item>(&query)
            .bind(item_id)
            .bind(wishlist_id)
            .fetch_optional(pool)
            .await
    }

    /// List a wishlist's items in creation order.
    pub async fn list_by_wishlist(
        pool: &PgPool,
        wishlist_id: DbId,
    ) -> Result<Vec<Item>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM wishlist_items \
             WHERE wishlist_id = $1 \
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(wishlist_id)
            .fetch_all(pool)
            .await
    }

    /// Update an item. Only non-`None` fields are applied.
    ///
    /// Returns `None` if the item does not exist in the given wishlist.
    pub async fn update(
        pool: &PgPool,
        wishlist_id: DbId,
        item_id: DbId,
        input: &UpdateItem,
    ) -> Result<Option<Item>, sqlx::Error> {
        let query = format!(
            "UPDATE wishlist_items SET \
                 name = COALESCE($3, name), \
                 price = COALESCE($4, price), \
                 currency = COALESCE($5, currency), \
                 tag = COALESCE($6, tag), \
                 url = COALESCE($7, url), \
                 image_url = COALESCE($8, image_url), \
                 updated_at = NOW() \
             WHERE id = $1 AND wishlist_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(item_id)
            .bind(wishlist_id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.price)
            .bind(
                input
                    .currency
                    .as_deref()
                    .map(|c| normalize_currency(Some(c))),
            )
            .bind(&input.tag)
            .bind(&input.url)
            .bind(&input.image_url)
            .fetch_optional(pool)
            .await
    }

    /// Delete an item; its reservations cascade.
    ///
    /// Returns `true` if an item was deleted.
    pub async fn delete(pool: &PgPool, wishlist_id: DbId, item_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM wishlist_items WHERE id = $1 AND wishlist_id = $2")
            .bind(item_id)
            .bind(wishlist_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
