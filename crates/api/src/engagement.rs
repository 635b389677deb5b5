//! Engagement and reservation operations.
//!
//! Everything an anonymous visitor can do to a shared wishlist goes through
//! [`EngagementService`]: counting views, liking, reserving and releasing
//! items, plus the owner/public read projections. The service only touches
//! storage through [`Store`], whose methods make each counter change and each
//! reservation removal a single atomic step.

use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;
use wishly_core::engagement::{
    analytics_window_start, view_day, LikeOutcome, Viewer, Visit, TOP_REFERRERS,
};
use wishly_core::error::CoreError;
use wishly_core::reservation::{normalize_reserver_name, NameMatchPolicy};
use wishly_core::slug::is_valid_slug;
use wishly_core::types::DbId;
use wishly_db::models::analytics::WishlistAnalytics;
use wishly_db::models::item::{Item, ItemView};
use wishly_db::models::reservation::{project, Reservation, ReservationView};
use wishly_db::models::wishlist::{Wishlist, WishlistDetail};
use wishly_db::store::Store;

use crate::error::{AppError, AppResult};

/// Response for `POST /api/wishlists/{slug}/like`.
#[derive(Debug, Clone, Serialize)]
pub struct LikeResponse {
    pub like_count: i64,
    pub already_liked: bool,
}

impl From<LikeOutcome> for LikeResponse {
    fn from(outcome: LikeOutcome) -> Self {
        Self {
            like_count: outcome.like_count(),
            already_liked: outcome.already_liked(),
        }
    }
}

/// Response for the claim endpoint: the public projection, never full names.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimResponse {
    pub item_id: DbId,
    pub reservations_count: i64,
    pub reserver_initials: Vec<String>,
    pub is_claimed: bool,
}

/// Response for the unclaim endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct UnclaimResponse {
    pub status: &'static str,
    pub remaining: i64,
    pub is_claimed: bool,
}

pub struct EngagementService<'a> {
    store: &'a dyn Store,
    name_match: NameMatchPolicy,
}

impl<'a> EngagementService<'a> {
    pub fn new(store: &'a dyn Store, name_match: NameMatchPolicy) -> Self {
        Self { store, name_match }
    }

    /// Resolve a slug to a wishlist visible to the public.
    ///
    /// Private wishlists are reported as absent.
    pub async fn public_wishlist(&self, slug: &str) -> AppResult<Wishlist> {
        if !is_valid_slug(slug) {
            return Err(wishlist_not_found(slug));
        }
        self.store
            .find_wishlist_by_slug(slug)
            .await?
            .filter(|w| w.is_public)
            .ok_or_else(|| wishlist_not_found(slug))
    }

    /// Load a wishlist by id for its owner.
    ///
    /// `NotFound` if it does not exist, `Forbidden` if `user_id` does not own it.
    pub async fn owned_wishlist(&self, wishlist_id: DbId, user_id: DbId) -> AppResult<Wishlist> {
        let wishlist = self
            .store
            .find_wishlist_by_id(wishlist_id)
            .await?
            .ok_or_else(|| wishlist_not_found(wishlist_id))?;
        if wishlist.user_id != user_id {
            return Err(AppError::Core(CoreError::Forbidden(
                "You do not own this wishlist".into(),
            )));
        }
        Ok(wishlist)
    }

    /// Count one view of a public wishlist and return it with the new count.
    pub async fn record_view(&self, slug: &str, visit: &Visit) -> AppResult<Wishlist> {
        let mut wishlist = self.public_wishlist(slug).await?;
        let view_count = self
            .store
            .record_view(wishlist.id, view_day(Utc::now()), visit)
            .await?
            .ok_or_else(|| wishlist_not_found(slug))?;
        wishlist.view_count = view_count;
        Ok(wishlist)
    }

    /// Like a public wishlist once per visitor fingerprint.
    pub async fn like(&self, slug: &str, fingerprint: &str) -> AppResult<LikeOutcome> {
        let wishlist = self.public_wishlist(slug).await?;
        let outcome = self
            .store
            .like(wishlist.id, fingerprint)
            .await?
            .ok_or_else(|| wishlist_not_found(slug))?;

        match outcome {
            LikeOutcome::Liked(like_count) => {
                tracing::info!(wishlist_id = wishlist.id, like_count, "Wishlist liked");
            }
            LikeOutcome::AlreadyLiked(like_count) => {
                tracing::debug!(wishlist_id = wishlist.id, like_count, "Repeat like ignored");
            }
        }
        Ok(outcome)
    }

    /// Append a reservation under `raw_name`. Existing reservations never block it.
    pub async fn reserve(
        &self,
        slug: &str,
        item_id: DbId,
        raw_name: &str,
    ) -> AppResult<ClaimResponse> {
        let name = normalize_reserver_name(raw_name)?;
        let wishlist = self.public_wishlist(slug).await?;
        let item = self.item_of(&wishlist, item_id).await?;

        let reservation = self
            .store
            .add_reservation(item.id, &name)
            .await?
            .ok_or_else(|| CoreError::not_found("Item", item_id))?;

        let reservations = self.store.list_reservations(&[item.id]).await?;
        let view = project(&reservations, Viewer::Public);

        tracing::info!(
            wishlist_id = wishlist.id,
            item_id = item.id,
            reservation_id = reservation.id,
            reservations_count = view.reservations_count(),
            "Item reserved",
        );

        match view {
            ReservationView::Public {
                reservations_count,
                is_claimed,
                reserver_initials,
            } => Ok(ClaimResponse {
                item_id: item.id,
                reservations_count,
                reserver_initials,
                is_claimed,
            }),
            ReservationView::Owner { .. } => Err(AppError::InternalError(
                "public projection produced an owner view".into(),
            )),
        }
    }

    /// Remove the oldest reservation on the item whose name matches `raw_name`.
    pub async fn unreserve(
        &self,
        slug: &str,
        item_id: DbId,
        raw_name: &str,
    ) -> AppResult<UnclaimResponse> {
        let name = normalize_reserver_name(raw_name)?;
        let wishlist = self.public_wishlist(slug).await?;
        let item = self.item_of(&wishlist, item_id).await?;

        let removed = self
            .store
            .remove_reservation(item.id, &name, self.name_match)
            .await?
            .ok_or_else(|| {
                CoreError::Mismatch("No reservation under that name for this item".into())
            })?;

        tracing::info!(
            wishlist_id = wishlist.id,
            item_id = item.id,
            reservation_id = removed.reservation.id,
            remaining = removed.remaining,
            "Reservation removed",
        );

        Ok(UnclaimResponse {
            status: "unclaimed",
            remaining: removed.remaining,
            is_claimed: removed.remaining > 0,
        })
    }

    /// Owner projection: full reserver names and timestamps. Records no view.
    pub async fn owner_view(&self, wishlist_id: DbId, owner_id: DbId) -> AppResult<WishlistDetail> {
        let wishlist = self.owned_wishlist(wishlist_id, owner_id).await?;
        self.detail(wishlist, Viewer::Owner).await
    }

    /// Public projection: counts and initials only. Records a view.
    pub async fn public_view(&self, slug: &str, visit: &Visit) -> AppResult<WishlistDetail> {
        let wishlist = self.record_view(slug, visit).await?;
        self.detail(wishlist, Viewer::Public).await
    }

    /// `GET /api/wishlists/{slug}` for an optionally authenticated caller.
    ///
    /// The owner gets the owner projection (private lists included); anyone
    /// else gets the public projection of a public list.
    pub async fn view(
        &self,
        slug: &str,
        caller: Option<DbId>,
        visit: &Visit,
    ) -> AppResult<WishlistDetail> {
        if let Some(user_id) = caller {
            let found = self.store.find_wishlist_by_slug(slug).await?;
            if let Some(wishlist) = found.filter(|w| w.user_id == user_id) {
                return self.owner_view(wishlist.id, user_id).await;
            }
        }
        self.public_view(slug, visit).await
    }

    /// Totals, the trailing daily view series and the top referrers for the
    /// owner's dashboard.
    pub async fn analytics(&self, wishlist_id: DbId, owner_id: DbId) -> AppResult<WishlistAnalytics> {
        let wishlist = self.owned_wishlist(wishlist_id, owner_id).await?;
        let since = analytics_window_start(Utc::now().date_naive());
        let daily_views = self.store.daily_views(wishlist.id, since).await?;
        let stats = self.store.view_stats(wishlist.id, TOP_REFERRERS).await?;

        Ok(WishlistAnalytics {
            wishlist_id: wishlist.id,
            title: wishlist.title,
            total_views: wishlist.view_count,
            unique_viewers: stats.unique_viewers,
            like_count: wishlist.like_count,
            daily_views,
            top_referrers: stats.top_referrers,
        })
    }

    async fn item_of(&self, wishlist: &Wishlist, item_id: DbId) -> AppResult<Item> {
        self.store
            .find_item(wishlist.id, item_id)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::not_found("Item", item_id)))
    }

    async fn detail(&self, wishlist: Wishlist, viewer: Viewer) -> AppResult<WishlistDetail> {
        let items = self.store.list_items(wishlist.id).await?;
        let item_ids: Vec<DbId> = items.iter().map(|i| i.id).collect();

        let mut by_item: HashMap<DbId, Vec<Reservation>> = HashMap::new();
        for reservation in self.store.list_reservations(&item_ids).await? {
            by_item
                .entry(reservation.item_id)
                .or_default()
                .push(reservation);
        }

        let items = items
            .into_iter()
            .map(|item| {
                let reservations = by_item.remove(&item.id).unwrap_or_default();
                ItemView {
                    reservations: project(&reservations, viewer),
                    item,
                }
            })
            .collect();

        let owner_name = self
            .store
            .find_user(wishlist.user_id)
            .await?
            .map(|u| u.name);

        Ok(WishlistDetail {
            wishlist,
            owner_name,
            items,
        })
    }
}

fn wishlist_not_found(key: impl ToString) -> AppError {
    AppError::Core(CoreError::not_found("Wishlist", key))
}
