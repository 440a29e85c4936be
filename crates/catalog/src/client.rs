//! Read-only client for the upstream product catalog.
//!
//! A single `GET {base_url}/{id}` with a bounded timeout; 404 translates to
//! `NotFound`, every other failure (transport, timeout, non-2xx, bad body)
//! to `Unavailable`. No retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use favly_core::domain::product::ProductId;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("product {0} does not exist in the catalog")]
    NotFound(ProductId),
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct CatalogRating {
    pub rate: f64,
    pub count: i64,
}

/// Payload returned by the catalog for a single product. Fields the catalog
/// also ships (description, category) are ignored.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CatalogPayload {
    pub title: String,
    pub image: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub rating: Option<CatalogRating>,
}

impl CatalogPayload {
    /// Freeform review annotation synthesized from the rating metadata.
    /// Written once when a product row is first created, never on refresh.
    pub fn review_summary(&self) -> Option<String> {
        self.rating
            .map(|rating| format!("Rating: {:.1}/5 ({} reviews)", rating.rate, rating.count))
    }
}

#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn fetch(&self, id: ProductId) -> Result<CatalogPayload, CatalogError>;
}

pub struct HttpCatalogClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpCatalogClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self { client: Client::new(), base_url: base_url.into(), timeout }
    }

    fn product_url(&self, id: ProductId) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), id)
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn fetch(&self, id: ProductId) -> Result<CatalogPayload, CatalogError> {
        let url = self.product_url(id);
        debug!(product_id = id.0, url = %url, "fetching product from catalog");

        let response =
            self.client.get(&url).timeout(self.timeout).send().await.map_err(|error| {
                if error.is_timeout() {
                    CatalogError::Unavailable(format!(
                        "catalog request timed out after {}s",
                        self.timeout.as_secs()
                    ))
                } else {
                    CatalogError::Unavailable(format!("catalog request failed: {error}"))
                }
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(id));
        }
        if !status.is_success() {
            return Err(CatalogError::Unavailable(format!("catalog returned {status}")));
        }

        response
            .json::<CatalogPayload>()
            .await
            .map_err(|error| CatalogError::Unavailable(format!("invalid catalog payload: {error}")))
    }
}
