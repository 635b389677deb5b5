//! Storage port.
//!
//! The API talks to persistence exclusively through [`Store`]. Two adapters
//! are provided:
//!
//! - [`PgStore`] -- PostgreSQL via the repositories in [`crate::repositories`].
//! - [`MemoryStore`] -- process-local state behind a single lock, used for
//!   tests and for running without a database.
//!
//! Every method is a single atomic unit with respect to the counters and
//! reservation sets it touches: implementations must never read a counter
//! and write back a computed value.

use async_trait::async_trait;
use wishly_core::engagement::{LikeOutcome, Visit};
use wishly_core::reservation::NameMatchPolicy;
use wishly_core::types::{Day, DbId};

use crate::models::analytics::{DailyViews, ViewStats};
use crate::models::discovery::TrendingItem;
use crate::models::item::{CreateItem, Item, UpdateItem};
use crate::models::reservation::{Reservation, Unreserved};
use crate::models::user::{CreateUser, User};
use crate::models::wishlist::{NewWishlist, UpdateWishlist, Wishlist, WishlistSummary};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors surfaced by a [`Store`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write (e.g. a slug collision).
    #[error("Duplicate value violates unique constraint: {constraint}")]
    UniqueViolation { constraint: String },

    /// Any other database failure.
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                return StoreError::UniqueViolation {
                    constraint: db_err.constraint().unwrap_or("unknown").to_string(),
                };
            }
        }
        StoreError::Database(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Name of the unique constraint on wishlist slugs (shared by both adapters).
pub const SLUG_CONSTRAINT: &str = "uq_wishlists_slug";

#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Liveness check of the backing storage.
    async fn health_check(&self) -> StoreResult<()>;

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    async fn create_user(&self, input: &CreateUser) -> StoreResult<User>;

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>>;

    // -----------------------------------------------------------------------
    // Wishlists
    // -----------------------------------------------------------------------

    /// Insert a wishlist. Fails with [`StoreError::UniqueViolation`] on a slug clash.
    async fn create_wishlist(&self, input: &NewWishlist) -> StoreResult<Wishlist>;

    async fn find_wishlist_by_id(&self, id: DbId) -> StoreResult<Option<Wishlist>>;

    async fn find_wishlist_by_slug(&self, slug: &str) -> StoreResult<Option<Wishlist>>;

    /// The owner's wishlists, newest first, with item counts.
    async fn list_wishlists_by_owner(&self, owner_id: DbId) -> StoreResult<Vec<WishlistSummary>>;

    /// Patch title/description/visibility. Returns `None` if the wishlist is gone.
    async fn update_wishlist(
        &self,
        id: DbId,
        input: &UpdateWishlist,
    ) -> StoreResult<Option<Wishlist>>;

    /// Delete a wishlist and everything hanging off it. Returns `true` if it existed.
    async fn delete_wishlist(&self, id: DbId) -> StoreResult<bool>;

    /// Create `target` and copy the item definitions of `source_id` into it.
    async fn clone_wishlist(&self, source_id: DbId, target: &NewWishlist) -> StoreResult<Wishlist>;

    // -----------------------------------------------------------------------
    // Items
    // -----------------------------------------------------------------------

    async fn create_item(&self, wishlist_id: DbId, input: &CreateItem) -> StoreResult<Item>;

    /// Find an item, scoped to its wishlist.
    async fn find_item(&self, wishlist_id: DbId, item_id: DbId) -> StoreResult<Option<Item>>;

    /// Items of a wishlist in creation order.
    async fn list_items(&self, wishlist_id: DbId) -> StoreResult<Vec<Item>>;

    async fn update_item(
        &self,
        wishlist_id: DbId,
        item_id: DbId,
        input: &UpdateItem,
    ) -> StoreResult<Option<Item>>;

    /// Delete an item and its reservations. Returns `true` if it existed.
    async fn delete_item(&self, wishlist_id: DbId, item_id: DbId) -> StoreResult<bool>;

    // -----------------------------------------------------------------------
    // Reservations
    // -----------------------------------------------------------------------

    /// Append a reservation. Returns `None` if the item no longer exists.
    async fn add_reservation(&self, item_id: DbId, name: &str) -> StoreResult<Option<Reservation>>;

    /// Remove the oldest reservation on `item_id` whose name matches.
    ///
    /// The match and the delete are one atomic unit; at most one row is
    /// removed. Returns `None` when nothing matched.
    async fn remove_reservation(
        &self,
        item_id: DbId,
        name: &str,
        policy: NameMatchPolicy,
    ) -> StoreResult<Option<Unreserved>>;

    /// Reservations for the given items, ordered by item, then oldest first.
    async fn list_reservations(&self, item_ids: &[DbId]) -> StoreResult<Vec<Reservation>>;

    // -----------------------------------------------------------------------
    // Engagement counters
    // -----------------------------------------------------------------------

    /// Add one view to the wishlist counter and to `day`'s bucket, and keep
    /// `visit` for viewer and referrer analytics.
    ///
    /// Returns the new `view_count`, or `None` if the wishlist is gone.
    async fn record_view(
        &self,
        wishlist_id: DbId,
        day: Day,
        visit: &Visit,
    ) -> StoreResult<Option<i64>>;

    /// Record a like from `fingerprint` unless one already exists.
    ///
    /// Returns `None` if the wishlist is gone.
    async fn like(&self, wishlist_id: DbId, fingerprint: &str) -> StoreResult<Option<LikeOutcome>>;

    /// Daily view buckets on or after `since`, ascending.
    async fn daily_views(&self, wishlist_id: DbId, since: Day) -> StoreResult<Vec<DailyViews>>;

    /// Distinct viewers and the `referrer_limit` most frequent referrers.
    async fn view_stats(&self, wishlist_id: DbId, referrer_limit: i64) -> StoreResult<ViewStats>;

    // -----------------------------------------------------------------------
    // Discovery
    // -----------------------------------------------------------------------

    /// Item definitions most common across public wishlists, most frequent
    /// first, ties by name.
    async fn trending_items(&self, limit: i64) -> StoreResult<Vec<TrendingItem>>;
}
