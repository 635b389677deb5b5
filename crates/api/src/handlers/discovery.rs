//! Public discovery feed.

use axum::extract::State;
use axum::Json;
use wishly_db::models::discovery::Discovery;

use crate::error::AppResult;
use crate::state::AppState;

/// Entries in the trending list.
pub const TRENDING_LIMIT: i64 = 10;

/// GET /api/discovery
///
/// Item definitions that appear on the most public wishlists. Needs no
/// authentication and records nothing.
pub async fn trending(State(state): State<AppState>) -> AppResult<Json<Discovery>> {
    let trending = state.store.trending_items(TRENDING_LIMIT).await?;
    Ok(Json(Discovery { trending }))
}
