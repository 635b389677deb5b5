//! Integration tests for the PostgreSQL store.
//!
//! Exercises the repositories through [`PgStore`] against a real database:
//! - Like idempotency under concurrent requests
//! - Atomic view counters, daily buckets and per-view facts
//! - Trending item definitions across public wishlists
//! - Oldest-first reservation removal
//! - Cascade delete and slug uniqueness
//!
//! `#[sqlx::test]` creates a fresh database per test on the server named by
//! `DATABASE_URL` and applies `./migrations` to it.

use assert_matches::assert_matches;
use chrono::NaiveDate;
use futures::future::join_all;
use sqlx::PgPool;
use wishly_core::engagement::Visit;
use wishly_core::reservation::NameMatchPolicy;
use wishly_db::models::analytics::{DailyViews, ReferrerCount};
use wishly_db::models::item::CreateItem;
use wishly_db::models::user::CreateUser;
use wishly_db::models::wishlist::{NewWishlist, UpdateWishlist, Wishlist};
use wishly_db::store::{PgStore, Store, StoreError, SLUG_CONSTRAINT};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_wishlist(user_id: i64, slug: &str) -> NewWishlist {
    NewWishlist {
        user_id,
        title: "Birthday".to_string(),
        description: Some("Things I'd like".to_string()),
        slug: slug.to_string(),
        is_public: true,
    }
}

fn new_item(name: &str) -> CreateItem {
    CreateItem {
        name: name.to_string(),
        price: Some(45_000.0),
        currency: Some("ngn".to_string()),
        tag: None,
        url: None,
        image_url: None,
    }
}

async fn seed_wishlist(store: &PgStore) -> Wishlist {
    let owner = store
        .create_user(&CreateUser {
            email: "Owner@Example.com".to_string(),
            name: "Ada Obi".to_string(),
            is_admin: false,
        })
        .await
        .unwrap();
    store
        .create_wishlist(&new_wishlist(owner.id, "birthday-1a2b3c4d"))
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Likes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_likes_same_fingerprint(pool: PgPool) {
    let store = PgStore::new(pool);
    let wishlist = seed_wishlist(&store).await;

    let outcomes = join_all((0..10).map(|_| store.like(wishlist.id, "198.51.100.4"))).await;
    let liked = outcomes
        .into_iter()
        .map(|outcome| outcome.unwrap().unwrap())
        .filter(|outcome| !outcome.already_liked())
        .count();
    assert_eq!(liked, 1);

    let stored = store.find_wishlist_by_id(wishlist.id).await.unwrap().unwrap();
    assert_eq!(stored.like_count, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_likes_distinct_fingerprints(pool: PgPool) {
    let store = PgStore::new(pool);
    let wishlist = seed_wishlist(&store).await;

    let fingerprints: Vec<String> = (0..10).map(|n| format!("10.1.0.{n}")).collect();
    join_all(fingerprints.iter().map(|fp| store.like(wishlist.id, fp))).await;

    let stored = store.find_wishlist_by_id(wishlist.id).await.unwrap().unwrap();
    assert_eq!(stored.like_count, 10);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_like_missing_wishlist(pool: PgPool) {
    let store = PgStore::new(pool);
    assert_matches!(store.like(999_999, "10.0.0.1").await, Ok(None));
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_views_increment_counter_and_bucket(pool: PgPool) {
    let store = PgStore::new(pool);
    let wishlist = seed_wishlist(&store).await;
    let day = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();

    let visit = Visit::new("203.0.113.7", Some("Mozilla/5.0"), None);
    join_all((0..5).map(|_| store.record_view(wishlist.id, day, &visit))).await;

    let stored = store.find_wishlist_by_id(wishlist.id).await.unwrap().unwrap();
    assert_eq!(stored.view_count, 5);
    assert_eq!(
        store.daily_views(wishlist.id, day).await.unwrap(),
        vec![DailyViews { date: day, views: 5 }]
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_view_stats_distinct_viewers_and_referrers(pool: PgPool) {
    let store = PgStore::new(pool);
    let wishlist = seed_wishlist(&store).await;
    let day = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();

    let visits = [
        Visit::new("10.0.0.1", None, Some("https://wa.me/x")),
        Visit::new("10.0.0.1", None, Some("https://wa.me/x")),
        Visit::new("10.0.0.2", None, Some("https://t.co/y")),
        Visit::new("10.0.0.3", None, None),
    ];
    for visit in &visits {
        store.record_view(wishlist.id, day, visit).await.unwrap();
    }

    let stats = store.view_stats(wishlist.id, 5).await.unwrap();
    assert_eq!(stats.unique_viewers, 3);
    assert_eq!(
        stats.top_referrers,
        vec![
            ReferrerCount { referrer: "https://wa.me/x".to_string(), count: 2 },
            ReferrerCount { referrer: "https://t.co/y".to_string(), count: 1 },
        ]
    );
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_trending_counts_public_lists_only(pool: PgPool) {
    let store = PgStore::new(pool);
    let wishlist = seed_wishlist(&store).await;
    let second = store
        .create_wishlist(&new_wishlist(wishlist.user_id, "wedding-5e6f7a8b"))
        .await
        .unwrap();
    let hidden = store
        .create_wishlist(&NewWishlist {
            is_public: false,
            ..new_wishlist(wishlist.user_id, "secret-9c0d1e2f")
        })
        .await
        .unwrap();

    for wishlist_id in [wishlist.id, second.id, hidden.id, hidden.id] {
        store.create_item(wishlist_id, &new_item("Kettle")).await.unwrap();
    }
    store.create_item(second.id, &new_item("Blender")).await.unwrap();

    let trending = store.trending_items(10).await.unwrap();
    let ranked: Vec<(&str, i64)> = trending
        .iter()
        .map(|t| (t.name.as_str(), t.occurrences))
        .collect();
    assert_eq!(ranked, vec![("Kettle", 2), ("Blender", 1)]);
    assert_eq!(trending[0].currency, "NGN");

    assert_eq!(store.trending_items(1).await.unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Reservations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_unreserve_removes_oldest_match(pool: PgPool) {
    let store = PgStore::new(pool);
    let wishlist = seed_wishlist(&store).await;
    let item = store.create_item(wishlist.id, &new_item("Kettle")).await.unwrap();
    assert_eq!(item.currency, "NGN");

    let first = store.add_reservation(item.id, "Chioma").await.unwrap().unwrap();
    store.add_reservation(item.id, "Chioma").await.unwrap().unwrap();

    let wrong = store
        .remove_reservation(item.id, "Wrong Name", NameMatchPolicy::Exact)
        .await
        .unwrap();
    assert!(wrong.is_none());

    let removed = store
        .remove_reservation(item.id, "Chioma", NameMatchPolicy::Exact)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(removed.reservation.id, first.id);
    assert_eq!(removed.remaining, 1);

    let relaxed = store
        .remove_reservation(item.id, "CHIOMA", NameMatchPolicy::CaseInsensitive)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(relaxed.remaining, 0);
}

// ---------------------------------------------------------------------------
// Wishlist lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_cascades(pool: PgPool) {
    let store = PgStore::new(pool.clone());
    let wishlist = seed_wishlist(&store).await;
    let item = store.create_item(wishlist.id, &new_item("Kettle")).await.unwrap();
    store.add_reservation(item.id, "Tunde").await.unwrap();
    store.like(wishlist.id, "10.0.0.1").await.unwrap();
    let day = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
    store
        .record_view(wishlist.id, day, &Visit::new("10.0.0.1", None, None))
        .await
        .unwrap();

    assert!(store.delete_wishlist(wishlist.id).await.unwrap());

    assert!(store.find_item(wishlist.id, item.id).await.unwrap().is_none());
    assert!(store.list_reservations(&[item.id]).await.unwrap().is_empty());
    let likes: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM wishlist_likes")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(likes.0, 0);
    let views: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM wishlist_views")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(views.0, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_slug_is_unique_violation(pool: PgPool) {
    let store = PgStore::new(pool);
    let wishlist = seed_wishlist(&store).await;

    let result = store
        .create_wishlist(&new_wishlist(wishlist.user_id, &wishlist.slug))
        .await;
    assert_matches!(
        result,
        Err(StoreError::UniqueViolation { constraint }) if constraint == SLUG_CONSTRAINT
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_keeps_slug_and_clone_copies_items(pool: PgPool) {
    let store = PgStore::new(pool);
    let wishlist = seed_wishlist(&store).await;
    let item = store.create_item(wishlist.id, &new_item("Kettle")).await.unwrap();
    store.add_reservation(item.id, "Tunde").await.unwrap();

    let updated = store
        .update_wishlist(
            wishlist.id,
            &UpdateWishlist {
                title: Some("  Wedding  ".to_string()),
                ..UpdateWishlist::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.title, "Wedding");
    assert_eq!(updated.slug, wishlist.slug);

    let copy = store
        .clone_wishlist(wishlist.id, &new_wishlist(wishlist.user_id, "wedding-copy-0000beef"))
        .await
        .unwrap();
    let items = store.list_items(copy.id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert!(store.list_reservations(&[items[0].id]).await.unwrap().is_empty());

    let summaries = store.list_wishlists_by_owner(wishlist.user_id).await.unwrap();
    assert_eq!(summaries.len(), 2);
    assert!(summaries.iter().all(|s| s.item_count == 1));
}
