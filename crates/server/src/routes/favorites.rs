use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use favly_core::domain::product::ProductId;
use favly_db::repositories::FavoriteRepository;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;

use super::products::ProductResponse;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/favorites", get(list_favorites))
        .route("/favorites/{product_id}", axum::routing::post(add_favorite).delete(remove_favorite))
}

#[derive(Debug, Serialize)]
pub struct FavoriteResponse {
    pub product: ProductResponse,
    pub created_at: String,
}

/// List the caller's favorites, refreshing every favorited product through
/// the cache so the listing reflects catalog data within the staleness
/// window.
pub async fn list_favorites(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
) -> Result<Json<Vec<FavoriteResponse>>, ApiError> {
    let favorites = state.favorites.list_for_client(current.id).await?;

    let mut listing = Vec::with_capacity(favorites.len());
    for favorite in favorites {
        let product = state.cache.get_or_refresh(favorite.product_id).await?;
        listing.push(FavoriteResponse {
            product: product.into(),
            created_at: favorite.created_at.to_rfc3339(),
        });
    }
    Ok(Json(listing))
}

/// Favoriting validates the product against the catalog first; an id the
/// catalog does not know cannot be favorited.
pub async fn add_favorite(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Path(product_id): Path<i64>,
) -> Result<(StatusCode, Json<FavoriteResponse>), ApiError> {
    let product_id = ProductId(product_id);

    if state.favorites.find(current.id, product_id).await?.is_some() {
        return Err(ApiError::Conflict("product already favorited".to_string()));
    }

    let product = state.cache.get_or_refresh(product_id).await?;
    let favorite = state.favorites.add(current.id, product_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(FavoriteResponse {
            product: product.into(),
            created_at: favorite.created_at.to_rfc3339(),
        }),
    ))
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Path(product_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !state.favorites.remove(current.id, ProductId(product_id)).await? {
        return Err(ApiError::NotFound("favorite not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
