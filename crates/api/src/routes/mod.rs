pub mod discovery;
pub mod health;
pub mod wishlist;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /discovery                                   trending items (anonymous)
/// /wishlists                                   list own, create (auth)
/// /wishlists/{slug}                            read (public or owner)
/// /wishlists/{id}                              update, delete (owner)
/// /wishlists/{slug}/like                       like (anonymous)
/// /wishlists/{slug}/clone                      clone (auth)
/// /wishlists/{id}/analytics                    engagement analytics (owner)
/// /wishlists/{id}/items                        add item (owner)
/// /wishlists/{id}/items/{item_id}              update, delete item (owner)
/// /wishlists/{slug}/items/{item_id}/claim      reserve (anonymous)
/// /wishlists/{slug}/items/{item_id}/unclaim    release reservation (anonymous)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/discovery", discovery::router())
        .nest("/wishlists", wishlist::router())
}
