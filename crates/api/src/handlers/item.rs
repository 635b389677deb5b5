//! Handlers for items nested under `/wishlists/{id}/items`. Owner only.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;
use wishly_core::error::CoreError;
use wishly_core::types::DbId;
use wishly_db::models::item::{CreateItem, Item, UpdateItem};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::json::{AppJson, AppPath};
use crate::state::AppState;

/// POST /api/wishlists/{id}/items
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(wishlist_id): AppPath<DbId>,
    AppJson(input): AppJson<CreateItem>,
) -> AppResult<(StatusCode, Json<Item>)> {
    input.validate()?;
    state
        .engagement()
        .owned_wishlist(wishlist_id, user.user_id)
        .await?;

    let item = state.store.create_item(wishlist_id, &input).await?;
    tracing::info!(wishlist_id, item_id = item.id, "Item added");
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/wishlists/{id}/items/{item_id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath((wishlist_id, item_id)): AppPath<(DbId, DbId)>,
    AppJson(input): AppJson<UpdateItem>,
) -> AppResult<Json<Item>> {
    input.validate()?;
    if input.is_empty() {
        return Err(AppError::BadRequest("No fields to update".into()));
    }
    state
        .engagement()
        .owned_wishlist(wishlist_id, user.user_id)
        .await?;

    let item = state
        .store
        .update_item(wishlist_id, item_id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Item", item_id))?;
    Ok(Json(item))
}

/// DELETE /api/wishlists/{id}/items/{item_id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath((wishlist_id, item_id)): AppPath<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    state
        .engagement()
        .owned_wishlist(wishlist_id, user.user_id)
        .await?;

    if state.store.delete_item(wishlist_id, item_id).await? {
        tracing::info!(wishlist_id, item_id, "Item deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::not_found("Item", item_id)))
    }
}
