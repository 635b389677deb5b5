//! Repository for the `item_reservations` table.
//!
//! Reservations are append-only until removed by name. Removal picks the
//! oldest matching row and deletes it in the same statement, inside a
//! transaction that also recounts what is left.

use sqlx::PgPool;
use wishly_core::reservation::NameMatchPolicy;
use wishly_core::types::DbId;

use crate::models::reservation::{Reservation, Unreserved};

/// Column list for `item_reservations` queries.
const COLUMNS: &str = "id, item_id, name, reserved_at";

/// Provides append/remove/list operations for item reservations.
pub struct ReservationRepo;

impl ReservationRepo {
    /// Append a reservation for `item_id`.
    ///
    /// Returns `None` if the item does not exist. Existing reservations never
    /// block a new one.
    pub async fn add(
        pool: &PgPool,
        item_id: DbId,
        name: &str,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        let query = format!(
            "INSERT INTO item_reservations (item_id, name) \
             SELECT id, $2 FROM wishlist_items WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(item_id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Remove the oldest reservation on `item_id` whose name matches `name`.
    ///
    /// Uses `FOR UPDATE SKIP LOCKED` so two concurrent removals of the same
    /// name never target the same row; the loser sees no match and gets `None`.
    pub async fn remove_oldest_matching(
        pool: &PgPool,
        item_id: DbId,
        name: &str,
        policy: NameMatchPolicy,
    ) -> Result<Option<Unreserved>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let delete_query = format!(
            "DELETE FROM item_reservations \
             WHERE id = ( \
                 SELECT id FROM item_reservations \
                 WHERE item_id = $1 \
                   AND CASE WHEN $3 THEN lower(name) = lower($2) ELSE name = $2 END \
                 ORDER BY reserved_at ASC, id ASC \
                 LIMIT 1 \
                 FOR UPDATE SKIP LOCKED \
             ) \
             RETURNING {COLUMNS}"
        );
        let removed = sqlx::query_as::<_, Reservation>(&delete_query)
            .bind(item_id)
            .bind(name)
            .bind(policy.is_case_insensitive())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(reservation) = removed else {
            tx.rollback().await?;
            return Ok(None);
        };

        let remaining: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM item_reservations WHERE item_id = $1")
                .bind(item_id)
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;
        Ok(Some(Unreserved {
            reservation,
            remaining,
        }))
    }

    /// All reservations for the given items, grouped by item, oldest first.
    pub async fn list_for_items(
        pool: &PgPool,
        item_ids: &[DbId],
    ) -> Result<Vec<Reservation>, sqlx::Error> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM item_reservations \
             WHERE item_id = ANY($1) \
             ORDER BY item_id ASC, reserved_at ASC, id ASC"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(item_ids)
            .fetch_all(pool)
            .await
    }
}
