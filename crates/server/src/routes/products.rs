use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use favly_core::domain::product::{Product, ProductId};

use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/products/{id}", get(get_product))
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub title: String,
    pub image: String,
    pub price: f64,
    pub review: Option<String>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.0,
            title: product.title,
            image: product.image,
            price: product.price,
            review: product.review,
        }
    }
}

/// Serve the product from the local cache, refreshing it from the catalog
/// when absent or stale.
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state.cache.get_or_refresh(ProductId(id)).await?;
    Ok(Json(product.into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::{Path, State};
    use axum::Json;

    use crate::error::ApiError;
    use crate::routes::testing::{sample_payload, test_state, test_state_with_catalog, UnavailableCatalog};

    use super::get_product;

    #[tokio::test]
    async fn known_product_is_fetched_and_served() {
        let state = test_state(Some(sample_payload("Backpack", 109.95))).await;

        let Json(product) = get_product(State(state.clone()), Path(1)).await.expect("get");
        assert_eq!(product.id, 1);
        assert_eq!(product.title, "Backpack");
        assert_eq!(product.price, 109.95);
        assert_eq!(product.review.as_deref(), Some("Rating: 4.5/5 (100 reviews)"));

        // second call is served from the cache and stays identical
        let Json(again) = get_product(State(state), Path(1)).await.expect("cache hit");
        assert_eq!(again.title, product.title);
    }

    #[tokio::test]
    async fn unknown_product_maps_to_not_found() {
        let state = test_state(None).await;
        let result = get_product(State(state), Path(999)).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn catalog_outage_maps_to_upstream_failure() {
        let state = test_state_with_catalog(Arc::new(UnavailableCatalog)).await;
        let result = get_product(State(state), Path(1)).await;
        assert!(matches!(result, Err(ApiError::Upstream(_))));
    }
}
