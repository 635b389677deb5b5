//! Anonymous engagement endpoints: likes and item reservations.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use wishly_core::types::DbId;
use wishly_db::models::reservation::ReserverName;

use crate::engagement::{ClaimResponse, LikeResponse, UnclaimResponse};
use crate::error::AppResult;
use crate::middleware::fingerprint::VisitorFingerprint;
use crate::middleware::json::{AppJson, AppPath};
use crate::state::AppState;

/// POST /api/wishlists/{slug}/like
///
/// A repeat like is not an error: it returns 200 with the unchanged count.
pub async fn like(
    State(state): State<AppState>,
    VisitorFingerprint(fingerprint): VisitorFingerprint,
    AppPath(slug): AppPath<String>,
) -> AppResult<Json<LikeResponse>> {
    let outcome = state.engagement().like(&slug, &fingerprint).await?;
    Ok(Json(outcome.into()))
}

/// POST /api/wishlists/{slug}/items/{item_id}/claim
pub async fn claim(
    State(state): State<AppState>,
    AppPath((slug, item_id)): AppPath<(String, DbId)>,
    AppJson(input): AppJson<ReserverName>,
) -> AppResult<(StatusCode, Json<ClaimResponse>)> {
    let claimed = state
        .engagement()
        .reserve(&slug, item_id, &input.name)
        .await?;
    Ok((StatusCode::CREATED, Json(claimed)))
}

/// POST /api/wishlists/{slug}/items/{item_id}/unclaim
pub async fn unclaim(
    State(state): State<AppState>,
    AppPath((slug, item_id)): AppPath<(String, DbId)>,
    AppJson(input): AppJson<ReserverName>,
) -> AppResult<Json<UnclaimResponse>> {
    let released = state
        .engagement()
        .unreserve(&slug, item_id, &input.name)
        .await?;
    Ok(Json(released))
}
