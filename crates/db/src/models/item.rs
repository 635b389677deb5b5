//! Wishlist item models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use wishly_core::types::{DbId, Timestamp};
use wishly_core::validation::{validate_currency, validate_not_blank, validate_price};

use super::reservation::ReservationView;

/// A row from the `wishlist_items` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Item {
    pub id: DbId,
    pub wishlist_id: DbId,
    pub name: String,
    pub price: Option<f64>,
    pub currency: String,
    pub tag: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An item together with the reservation data its viewer is allowed to see.
#[derive(Debug, Clone, Serialize)]
pub struct ItemView {
    #[serde(flatten)]
    pub item: Item,
    #[serde(flatten)]
    pub reservations: ReservationView,
}

/// DTO for `POST /api/wishlists/{id}/items`. Only `name` is required.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateItem {
    #[validate(length(min = 1, max = 300), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(custom(function = "validate_price"))]
    pub price: Option<f64>,
    #[validate(custom(function = "validate_currency"))]
    pub currency: Option<String>,
    #[validate(length(max = 50))]
    pub tag: Option<String>,
    #[validate(url)]
    pub url: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
}

/// DTO for `PUT /api/wishlists/{id}/items/{item_id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateItem {
    #[validate(length(min = 1, max = 300), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_price"))]
    pub price: Option<f64>,
    #[validate(custom(function = "validate_currency"))]
    pub currency: Option<String>,
    #[validate(length(max = 50))]
    pub tag: Option<String>,
    #[validate(url)]
    pub url: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
}

impl UpdateItem {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.currency.is_none()
            && self.tag.is_none()
            && self.url.is_none()
            && self.image_url.is_none()
    }
}
