use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use wishly_core::engagement::{LikeOutcome, Visit};
use wishly_core::reservation::NameMatchPolicy;
use wishly_core::types::{Day, DbId};
use wishly_core::validation::normalize_currency;

use super::{Store, StoreError, StoreResult, SLUG_CONSTRAINT};
use crate::models::analytics::{DailyViews, ReferrerCount, ViewStats};
use crate::models::discovery::TrendingItem;
use crate::models::item::{CreateItem, Item, UpdateItem};
use crate::models::reservation::{Reservation, Unreserved};
use crate::models::user::{CreateUser, User};
use crate::models::wishlist::{NewWishlist, UpdateWishlist, Wishlist, WishlistSummary};

const USER_EMAIL_CONSTRAINT: &str = "uq_users_email";

#[derive(Default)]
struct State {
    next_id: DbId,
    users: BTreeMap<DbId, User>,
    wishlists: BTreeMap<DbId, Wishlist>,
    items: BTreeMap<DbId, Item>,
    reservations: BTreeMap<DbId, Reservation>,
    likes: HashSet<(DbId, String)>,
    daily_views: BTreeMap<(DbId, Day), i64>,
    views: Vec<(DbId, Visit)>,
}

impl State {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn insert_wishlist(&mut self, input: &NewWishlist) -> StoreResult<Wishlist> {
        if self.wishlists.values().any(|w| w.slug == input.slug) {
            return Err(StoreError::UniqueViolation {
                constraint: SLUG_CONSTRAINT.to_string(),
            });
        }
        let now = Utc::now();
        let wishlist = Wishlist {
            id: self.next_id(),
            user_id: input.user_id,
            title: input.title.clone(),
            description: input.description.clone(),
            slug: input.slug.clone(),
            is_public: input.is_public,
            view_count: 0,
            like_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.wishlists.insert(wishlist.id, wishlist.clone());
        Ok(wishlist)
    }

    fn items_of(&self, wishlist_id: DbId) -> Vec<Item> {
        let mut items: Vec<Item> = self
            .items
            .values()
            .filter(|i| i.wishlist_id == wishlist_id)
            .cloned()
            .collect();
        items.sort_by_key(|i| (i.created_at, i.id));
        items
    }

    fn remove_item_cascade(&mut self, item_id: DbId) {
        self.items.remove(&item_id);
        self.reservations.retain(|_, r| r.item_id != item_id);
    }
}

/// [`Store`] holding everything in process memory.
///
/// All state sits behind one `RwLock`; every write method takes the write
/// guard once, so each call is atomic with respect to every other call.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        let mut state = self.state.write().await;
        let email = input.email.trim().to_lowercase();
        if state.users.values().any(|u| u.email == email) {
            return Err(StoreError::UniqueViolation {
                constraint: USER_EMAIL_CONSTRAINT.to_string(),
            });
        }
        let user = User {
            id: state.next_id(),
            email,
            name: input.name.clone(),
            is_admin: input.is_admin,
            created_at: Utc::now(),
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn create_wishlist(&self, input: &NewWishlist) -> StoreResult<Wishlist> {
        self.state.write().await.insert_wishlist(input)
    }

    async fn find_wishlist_by_id(&self, id: DbId) -> StoreResult<Option<Wishlist>> {
        Ok(self.state.read().await.wishlists.get(&id).cloned())
    }

    async fn find_wishlist_by_slug(&self, slug: &str) -> StoreResult<Option<Wishlist>> {
        let state = self.state.read().await;
        Ok(state.wishlists.values().find(|w| w.slug == slug).cloned())
    }

    async fn list_wishlists_by_owner(&self, owner_id: DbId) -> StoreResult<Vec<WishlistSummary>> {
        let state = self.state.read().await;
        let mut summaries: Vec<WishlistSummary> = state
            .wishlists
            .values()
            .filter(|w| w.user_id == owner_id)
            .map(|w| WishlistSummary {
                wishlist: w.clone(),
                item_count: state.items.values().filter(|i| i.wishlist_id == w.id).count() as i64,
            })
            .collect();
        summaries.sort_by(|a, b| {
            (b.wishlist.created_at, b.wishlist.id).cmp(&(a.wishlist.created_at, a.wishlist.id))
        });
        Ok(summaries)
    }

    async fn update_wishlist(
        &self,
        id: DbId,
        input: &UpdateWishlist,
    ) -> StoreResult<Option<Wishlist>> {
        let mut state = self.state.write().await;
        let Some(wishlist) = state.wishlists.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = &input.title {
            wishlist.title = title.trim().to_string();
        }
        if let Some(description) = &input.description {
            wishlist.description = Some(description.clone());
        }
        if let Some(is_public) = input.is_public {
            wishlist.is_public = is_public;
        }
        wishlist.updated_at = Utc::now();
        Ok(Some(wishlist.clone()))
    }

    async fn delete_wishlist(&self, id: DbId) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        if state.wishlists.remove(&id).is_none() {
            return Ok(false);
        }
        let item_ids: Vec<DbId> = state
            .items
            .values()
            .filter(|i| i.wishlist_id == id)
            .map(|i| i.id)
            .collect();
        for item_id in item_ids {
            state.remove_item_cascade(item_id);
        }
        state.likes.retain(|(wishlist_id, _)| *wishlist_id != id);
        state.daily_views.retain(|(wishlist_id, _), _| *wishlist_id != id);
        state.views.retain(|(wishlist_id, _)| *wishlist_id != id);
        Ok(true)
    }

    async fn clone_wishlist(&self, source_id: DbId, target: &NewWishlist) -> StoreResult<Wishlist> {
        let mut state = self.state.write().await;
        let wishlist = state.insert_wishlist(target)?;
        let now = Utc::now();
        for source in state.items_of(source_id) {
            let item = Item {
                id: state.next_id(),
                wishlist_id: wishlist.id,
                created_at: now,
                updated_at: now,
                ..source
            };
            state.items.insert(item.id, item);
        }
        Ok(wishlist)
    }

    async fn create_item(&self, wishlist_id: DbId, input: &CreateItem) -> StoreResult<Item> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let item = Item {
            id: state.next_id(),
            wishlist_id,
            name: input.name.trim().to_string(),
            price: input.price,
            currency: normalize_currency(input.currency.as_deref()),
            tag: input.tag.clone(),
            url: input.url.clone(),
            image_url: input.image_url.clone(),
            created_at: now,
            updated_at: now,
        };
        state.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn find_item(&self, wishlist_id: DbId, item_id: DbId) -> StoreResult<Option<Item>> {
        let state = self.state.read().await;
        Ok(state
            .items
            .get(&item_id)
            .filter(|i| i.wishlist_id == wishlist_id)
            .cloned())
    }

    async fn list_items(&self, wishlist_id: DbId) -> StoreResult<Vec<Item>> {
        Ok(self.state.read().await.items_of(wishlist_id))
    }

    async fn update_item(
        &self,
        wishlist_id: DbId,
        item_id: DbId,
        input: &UpdateItem,
    ) -> StoreResult<Option<Item>> {
        let mut state = self.state.write().await;
        let Some(item) = state
            .items
            .get_mut(&item_id)
            .filter(|i| i.wishlist_id == wishlist_id)
        else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            item.name = name.trim().to_string();
        }
        if input.price.is_some() {
            item.price = input.price;
        }
        if let Some(currency) = &input.currency {
            item.currency = normalize_currency(Some(currency));
        }
        if input.tag.is_some() {
            item.tag = input.tag.clone();
        }
        if input.url.is_some() {
            item.url = input.url.clone();
        }
        if input.image_url.is_some() {
            item.image_url = input.image_url.clone();
        }
        item.updated_at = Utc::now();
        Ok(Some(item.clone()))
    }

    async fn delete_item(&self, wishlist_id: DbId, item_id: DbId) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let exists = state
            .items
            .get(&item_id)
            .is_some_and(|i| i.wishlist_id == wishlist_id);
        if exists {
            state.remove_item_cascade(item_id);
        }
        Ok(exists)
    }

    async fn add_reservation(&self, item_id: DbId, name: &str) -> StoreResult<Option<Reservation>> {
        let mut state = self.state.write().await;
        if !state.items.contains_key(&item_id) {
            return Ok(None);
        }
        let reservation = Reservation {
            id: state.next_id(),
            item_id,
            name: name.to_string(),
            reserved_at: Utc::now(),
        };
        state.reservations.insert(reservation.id, reservation.clone());
        Ok(Some(reservation))
    }

    async fn remove_reservation(
        &self,
        item_id: DbId,
        name: &str,
        policy: NameMatchPolicy,
    ) -> StoreResult<Option<Unreserved>> {
        let mut state = self.state.write().await;
        let oldest = state
            .reservations
            .values()
            .filter(|r| r.item_id == item_id && policy.matches(&r.name, name))
            .min_by_key(|r| (r.reserved_at, r.id))
            .map(|r| r.id);

        let Some(reservation) = oldest.and_then(|id| state.reservations.remove(&id)) else {
            return Ok(None);
        };
        let remaining = state
            .reservations
            .values()
            .filter(|r| r.item_id == item_id)
            .count() as i64;
        Ok(Some(Unreserved {
            reservation,
            remaining,
        }))
    }

    async fn list_reservations(&self, item_ids: &[DbId]) -> StoreResult<Vec<Reservation>> {
        let state = self.state.read().await;
        let mut reservations: Vec<Reservation> = state
            .reservations
            .values()
            .filter(|r| item_ids.contains(&r.item_id))
            .cloned()
            .collect();
        reservations.sort_by_key(|r| (r.item_id, r.reserved_at, r.id));
        Ok(reservations)
    }

    async fn record_view(
        &self,
        wishlist_id: DbId,
        day: Day,
        visit: &Visit,
    ) -> StoreResult<Option<i64>> {
        let mut state = self.state.write().await;
        let Some(wishlist) = state.wishlists.get_mut(&wishlist_id) else {
            return Ok(None);
        };
        wishlist.view_count += 1;
        let view_count = wishlist.view_count;
        *state.daily_views.entry((wishlist_id, day)).or_insert(0) += 1;
        state.views.push((wishlist_id, visit.clone()));
        Ok(Some(view_count))
    }

    async fn like(&self, wishlist_id: DbId, fingerprint: &str) -> StoreResult<Option<LikeOutcome>> {
        let mut state = self.state.write().await;
        if !state.wishlists.contains_key(&wishlist_id) {
            return Ok(None);
        }
        let inserted = state.likes.insert((wishlist_id, fingerprint.to_string()));
        let Some(wishlist) = state.wishlists.get_mut(&wishlist_id) else {
            return Ok(None);
        };
        if inserted {
            wishlist.like_count += 1;
            Ok(Some(LikeOutcome::Liked(wishlist.like_count)))
        } else {
            Ok(Some(LikeOutcome::AlreadyLiked(wishlist.like_count)))
        }
    }

    async fn daily_views(&self, wishlist_id: DbId, since: Day) -> StoreResult<Vec<DailyViews>> {
        let state = self.state.read().await;
        Ok(state
            .daily_views
            .range((wishlist_id, since)..=(wishlist_id, Day::MAX))
            .map(|(&(_, date), &views)| DailyViews { date, views })
            .collect())
    }

    async fn view_stats(&self, wishlist_id: DbId, referrer_limit: i64) -> StoreResult<ViewStats> {
        let state = self.state.read().await;
        let mut viewers = HashSet::new();
        let mut referrers: HashMap<&str, i64> = HashMap::new();
        for (_, visit) in state.views.iter().filter(|(id, _)| *id == wishlist_id) {
            viewers.insert(visit.viewer.as_str());
            if let Some(referrer) = &visit.referrer {
                *referrers.entry(referrer.as_str()).or_insert(0) += 1;
            }
        }

        let mut top_referrers: Vec<ReferrerCount> = referrers
            .into_iter()
            .map(|(referrer, count)| ReferrerCount {
                referrer: referrer.to_string(),
                count,
            })
            .collect();
        top_referrers.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.referrer.cmp(&b.referrer)));
        top_referrers.truncate(usize::try_from(referrer_limit).unwrap_or(0));

        Ok(ViewStats {
            unique_viewers: viewers.len() as i64,
            top_referrers,
        })
    }

    async fn trending_items(&self, limit: i64) -> StoreResult<Vec<TrendingItem>> {
        type Key<'a> = (&'a str, Option<&'a str>, Option<&'a str>, Option<u64>, &'a str);

        let state = self.state.read().await;
        let mut groups: BTreeMap<Key<'_>, (&Item, i64)> = BTreeMap::new();
        for item in state.items.values() {
            let public = state
                .wishlists
                .get(&item.wishlist_id)
                .is_some_and(|w| w.is_public);
            if !public {
                continue;
            }
            let key = (
                item.name.as_str(),
                item.url.as_deref(),
                item.image_url.as_deref(),
                item.price.map(f64::to_bits),
                item.currency.as_str(),
            );
            groups.entry(key).or_insert((item, 0)).1 += 1;
        }

        let mut trending: Vec<TrendingItem> = groups
            .into_values()
            .map(|(item, occurrences)| TrendingItem {
                name: item.name.clone(),
                url: item.url.clone(),
                image_url: item.image_url.clone(),
                price: item.price,
                currency: item.currency.clone(),
                occurrences,
            })
            .collect();
        trending.sort_by(|a, b| {
            b.occurrences
                .cmp(&a.occurrences)
                .then_with(|| a.name.cmp(&b.name))
        });
        trending.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(trending)
    }
}
