//! Handlers for the `/wishlists` resource.
//!
//! Owner routes address a wishlist by numeric id; public routes address it
//! by slug. Both share the `{wishlist}` path segment.

use axum::extract::State;
use axum::http::header::{REFERER, USER_AGENT};
use axum::http::{HeaderMap, HeaderName, StatusCode};
use axum::Json;
use validator::Validate;
use wishly_core::engagement::Visit;
use wishly_core::error::CoreError;
use wishly_core::slug::generate_slug;
use wishly_core::types::DbId;
use wishly_db::models::analytics::WishlistAnalytics;
use wishly_db::models::wishlist::{
    CloneWishlist, CreateWishlist, NewWishlist, UpdateWishlist, Wishlist, WishlistDetail,
    WishlistSummary,
};
use wishly_db::store::{StoreError, SLUG_CONSTRAINT};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::middleware::fingerprint::VisitorFingerprint;
use crate::middleware::json::{AppJson, AppPath};
use crate::state::AppState;

/// Attempts at inserting with a freshly generated slug before giving up.
const SLUG_ATTEMPTS: u32 = 2;

/// POST /api/wishlists
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(input): AppJson<CreateWishlist>,
) -> AppResult<(StatusCode, Json<Wishlist>)> {
    input.validate()?;

    let title = input.title.trim().to_string();
    let new = NewWishlist {
        user_id: user.user_id,
        slug: generate_slug(&title),
        title,
        description: input.description,
        is_public: input.is_public,
    };
    let wishlist = insert_with_fresh_slug(&state, None, new).await?;

    tracing::info!(
        wishlist_id = wishlist.id,
        user_id = user.user_id,
        slug = %wishlist.slug,
        "Wishlist created",
    );
    Ok((StatusCode::CREATED, Json(wishlist)))
}

/// GET /api/wishlists
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<WishlistSummary>>> {
    let wishlists = state.store.list_wishlists_by_owner(user.user_id).await?;
    Ok(Json(wishlists))
}

/// GET /api/wishlists/{slug}
///
/// Anonymous and non-owner callers get the public projection and count as a
/// view, recorded with the visitor fingerprint, `User-Agent` and `Referer`.
/// The owner gets the owner projection.
pub async fn get_by_slug(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    VisitorFingerprint(viewer): VisitorFingerprint,
    headers: HeaderMap,
    AppPath(slug): AppPath<String>,
) -> AppResult<Json<WishlistDetail>> {
    let header = |name: HeaderName| headers.get(name).and_then(|v| v.to_str().ok());
    let visit = Visit::new(viewer, header(USER_AGENT), header(REFERER));

    let caller = user.map(|u| u.user_id);
    let detail = state.engagement().view(&slug, caller, &visit).await?;
    Ok(Json(detail))
}

/// PUT /api/wishlists/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateWishlist>,
) -> AppResult<Json<Wishlist>> {
    input.validate()?;
    if input.is_empty() {
        return Err(AppError::BadRequest("No fields to update".into()));
    }

    state.engagement().owned_wishlist(id, user.user_id).await?;
    let wishlist = state
        .store
        .update_wishlist(id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Wishlist", id))?;
    Ok(Json(wishlist))
}

/// DELETE /api/wishlists/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    state.engagement().owned_wishlist(id, user.user_id).await?;
    if state.store.delete_wishlist(id).await? {
        tracing::info!(wishlist_id = id, user_id = user.user_id, "Wishlist deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::not_found("Wishlist", id)))
    }
}

/// POST /api/wishlists/{slug}/clone
///
/// The source must be public or belong to the caller. The copy is public,
/// owned by the caller, and starts with no reservations, likes or views.
pub async fn clone(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(slug): AppPath<String>,
    AppJson(input): AppJson<CloneWishlist>,
) -> AppResult<(StatusCode, Json<Wishlist>)> {
    input.validate()?;

    let source = state
        .store
        .find_wishlist_by_slug(&slug)
        .await?
        .filter(|w| w.is_public || user.owns(w.user_id))
        .ok_or_else(|| CoreError::not_found("Wishlist", &slug))?;

    let title = input.title.trim().to_string();
    let new = NewWishlist {
        user_id: user.user_id,
        slug: generate_slug(&title),
        title,
        description: source.description.clone(),
        is_public: true,
    };
    let wishlist = insert_with_fresh_slug(&state, Some(source.id), new).await?;

    tracing::info!(
        source_id = source.id,
        wishlist_id = wishlist.id,
        user_id = user.user_id,
        "Wishlist cloned",
    );
    Ok((StatusCode::CREATED, Json(wishlist)))
}

/// GET /api/wishlists/{id}/analytics
pub async fn analytics(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<WishlistAnalytics>> {
    let analytics = state.engagement().analytics(id, user.user_id).await?;
    Ok(Json(analytics))
}

/// Insert `new` (or clone `source` into it), regenerating the slug once if
/// it collides with an existing one.
async fn insert_with_fresh_slug(
    state: &AppState,
    source: Option<DbId>,
    mut new: NewWishlist,
) -> AppResult<Wishlist> {
    let mut attempt = 1;
    loop {
        let result = match source {
            Some(source_id) => state.store.clone_wishlist(source_id, &new).await,
            None => state.store.create_wishlist(&new).await,
        };
        match result {
            Err(StoreError::UniqueViolation { constraint })
                if constraint == SLUG_CONSTRAINT && attempt < SLUG_ATTEMPTS =>
            {
                tracing::warn!(slug = %new.slug, attempt, "Slug collision, regenerating");
                new.slug = generate_slug(&new.title);
                attempt += 1;
            }
            other => return Ok(other?),
        }
    }
}
