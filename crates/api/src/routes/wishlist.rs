//! Route definitions for the `/wishlists` resource.
//!
//! The second path segment is a numeric id on owner routes and a slug on
//! public ones; it is named `{wishlist}` everywhere so the router sees a
//! single parameter at that position.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{engagement, item, wishlist};
use crate::state::AppState;

/// Routes mounted at `/wishlists`.
///
/// ```text
/// GET    /                                      -> list
/// POST   /                                      -> create
/// GET    /{slug}                                -> get_by_slug
/// PUT    /{id}                                  -> update
/// DELETE /{id}                                  -> delete
/// POST   /{slug}/like                           -> like
/// POST   /{slug}/clone                          -> clone
/// GET    /{id}/analytics                        -> analytics
/// POST   /{id}/items                            -> item::create
/// PUT    /{id}/items/{item_id}                  -> item::update
/// DELETE /{id}/items/{item_id}                  -> item::delete
/// POST   /{slug}/items/{item_id}/claim          -> claim
/// POST   /{slug}/items/{item_id}/unclaim        -> unclaim
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::list).post(wishlist::create))
        .route(
            "/{wishlist}",
            get(wishlist::get_by_slug)
                .put(wishlist::update)
                .delete(wishlist::delete),
        )
        .route("/{wishlist}/like", post(engagement::like))
        .route("/{wishlist}/clone", post(wishlist::clone))
        .route("/{wishlist}/analytics", get(wishlist::analytics))
        .route("/{wishlist}/items", post(item::create))
        .route(
            "/{wishlist}/items/{item_id}",
            put(item::update).delete(item::delete),
        )
        .route("/{wishlist}/items/{item_id}/claim", post(engagement::claim))
        .route(
            "/{wishlist}/items/{item_id}/unclaim",
            post(engagement::unclaim),
        )
}
