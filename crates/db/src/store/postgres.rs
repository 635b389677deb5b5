use async_trait::async_trait;
use wishly_core::engagement::{LikeOutcome, Visit};
use wishly_core::reservation::NameMatchPolicy;
use wishly_core::types::{Day, DbId};

use super::{Store, StoreResult};
use crate::models::analytics::{DailyViews, ViewStats};
use crate::models::discovery::TrendingItem;
use crate::models::item::{CreateItem, Item, UpdateItem};
use crate::models::reservation::{Reservation, Unreserved};
use crate::models::user::{CreateUser, User};
use crate::models::wishlist::{NewWishlist, UpdateWishlist, Wishlist, WishlistSummary};
use crate::repositories::{
    DiscoveryRepo, EngagementRepo, ItemRepo, ReservationRepo, UserRepo, WishlistRepo,
};
use crate::DbPool;

/// [`Store`] backed by PostgreSQL.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> StoreResult<()> {
        Ok(crate::health_check(&self.pool).await?)
    }

    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        Ok(UserRepo::create(&self.pool, input).await?)
    }

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(UserRepo::find_by_id(&self.pool, id).await?)
    }

    async fn create_wishlist(&self, input: &NewWishlist) -> StoreResult<Wishlist> {
        Ok(WishlistRepo::create(&self.pool, input).await?)
    }

    async fn find_wishlist_by_id(&self, id: DbId) -> StoreResult<Option<Wishlist>> {
        Ok(WishlistRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_wishlist_by_slug(&self, slug: &str) -> StoreResult<Option<Wishlist>> {
        Ok(WishlistRepo::find_by_slug(&self.pool, slug).await?)
    }

    async fn list_wishlists_by_owner(&self, owner_id: DbId) -> StoreResult<Vec<WishlistSummary>> {
        Ok(WishlistRepo::list_by_owner(&self.pool, owner_id).await?)
    }

    async fn update_wishlist(
        &self,
        id: DbId,
        input: &UpdateWishlist,
    ) -> StoreResult<Option<Wishlist>> {
        Ok(WishlistRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_wishlist(&self, id: DbId) -> StoreResult<bool> {
        Ok(WishlistRepo::delete(&self.pool, id).await?)
    }

    async fn clone_wishlist(&self, source_id: DbId, target: &NewWishlist) -> StoreResult<Wishlist> {
        Ok(WishlistRepo::clone_from(&self.pool, source_id, target).await?)
    }

    async fn create_item(&self, wishlist_id: DbId, input: &CreateItem) -> StoreResult<Item> {
        Ok(ItemRepo::create(&self.pool, wishlist_id, input).await?)
    }

    async fn find_item(&self, wishlist_id: DbId, item_id: DbId) -> StoreResult<Option<Item>> {
        Ok(ItemRepo::find(&self.pool, wishlist_id, item_id).await?)
    }

    async fn list_items(&self, wishlist_id: DbId) -> StoreResult<Vec<Item>> {
        Ok(ItemRepo::list_by_wishlist(&self.pool, wishlist_id).await?)
    }

    async fn update_item(
        &self,
        wishlist_id: DbId,
        item_id: DbId,
        input: &UpdateItem,
    ) -> StoreResult<Option<Item>> {
        Ok(ItemRepo::update(&self.pool, wishlist_id, item_id, input).await?)
    }

    async fn delete_item(&self, wishlist_id: DbId, item_id: DbId) -> StoreResult<bool> {
        Ok(ItemRepo::delete(&self.pool, wishlist_id, item_id).await?)
    }

    async fn add_reservation(&self, item_id: DbId, name: &str) -> StoreResult<Option<Reservation>> {
        Ok(ReservationRepo::add(&self.pool, item_id, name).await?)
    }

    async fn remove_reservation(
        &self,
        item_id: DbId,
        name: &str,
        policy: NameMatchPolicy,
    ) -> StoreResult<Option<Unreserved>> {
        Ok(ReservationRepo::remove_oldest_matching(&self.pool, item_id, name, policy).await?)
    }

    async fn list_reservations(&self, item_ids: &[DbId]) -> StoreResult<Vec<Reservation>> {
        Ok(ReservationRepo::list_for_items(&self.pool, item_ids).await?)
    }

    async fn record_view(
        &self,
        wishlist_id: DbId,
        day: Day,
        visit: &Visit,
    ) -> StoreResult<Option<i64>> {
        Ok(EngagementRepo::record_view(&self.pool, wishlist_id, day, visit).await?)
    }

    async fn like(&self, wishlist_id: DbId, fingerprint: &str) -> StoreResult<Option<LikeOutcome>> {
        Ok(EngagementRepo::like(&self.pool, wishlist_id, fingerprint).await?)
    }

    async fn daily_views(&self, wishlist_id: DbId, since: Day) -> StoreResult<Vec<DailyViews>> {
        Ok(EngagementRepo::daily_views(&self.pool, wishlist_id, since).await?)
    }

    async fn view_stats(&self, wishlist_id: DbId, referrer_limit: i64) -> StoreResult<ViewStats> {
        Ok(EngagementRepo::view_stats(&self.pool, wishlist_id, referrer_limit).await?)
    }

    async fn trending_items(&self, limit: i64) -> StoreResult<Vec<TrendingItem>> {
        Ok(DiscoveryRepo::trending(&self.pool, limit).await?)
    }
}
