//! Wishlist models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use wishly_core::types::{DbId, Timestamp};
use wishly_core::validation::validate_not_blank;

use super::item::ItemView;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `wishlists` table.
///
/// `user_id` is the owner. `slug` is unique and never changes after creation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Wishlist {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub slug: String,
    pub is_public: bool,
    pub view_count: i64,
    pub like_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Wishlist row plus its item count, used by the owner's dashboard listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WishlistSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub wishlist: Wishlist,
    pub item_count: i64,
}

/// Full wishlist as returned by `GET /api/wishlists/{slug}`.
#[derive(Debug, Clone, Serialize)]
pub struct WishlistDetail {
    #[serde(flatten)]
    pub wishlist: Wishlist,
    pub owner_name: Option<String>,
    pub items: Vec<ItemView>,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

fn default_public() -> bool {
    true
}

/// DTO for `POST /api/wishlists`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWishlist {
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[serde(default = "default_public")]
    pub is_public: bool,
}

/// DTO for `PUT /api/wishlists/{id}`. The slug cannot be changed.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateWishlist {
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

impl UpdateWishlist {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.is_public.is_none()
    }
}

/// DTO for `POST /api/wishlists/{slug}/clone`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CloneWishlist {
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub title: String,
}

/// Fully resolved insert, built by the API once the owner and slug are known.
#[derive(Debug, Clone)]
pub struct NewWishlist {
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub slug: String,
    pub is_public: bool,
}
