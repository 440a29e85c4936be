//! Read-through cache over the upstream catalog.
//!
//! A product row is served from storage while it is younger than the
//! configured staleness window; otherwise the catalog is consulted, the
//! result merged into the row, and the row returned. Catalog failures are
//! propagated as-is: a stale row is never served in place of an error, and
//! an upstream 404 never invalidates an existing row.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use favly_core::domain::product::{Product, ProductId};
use favly_db::repositories::{ProductRepository, RepositoryError};

use crate::client::{CatalogClient, CatalogError, CatalogPayload};

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub struct ProductCache {
    products: Arc<dyn ProductRepository>,
    catalog: Arc<dyn CatalogClient>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    // Per-product refresh locks; an entry lives only while a refresh for that
    // id is in flight.
    inflight: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl ProductCache {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        catalog: Arc<dyn CatalogClient>,
        ttl: Duration,
    ) -> Self {
        Self::with_clock(products, catalog, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(
        products: Arc<dyn ProductRepository>,
        catalog: Arc<dyn CatalogClient>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { products, catalog, ttl, clock, inflight: Mutex::new(HashMap::new()) }
    }

    /// Return the locally cached product for `id`, refreshing it from the
    /// catalog first when the row is absent or older than the staleness
    /// window.
    pub async fn get_or_refresh(&self, id: ProductId) -> Result<Product, RefreshError> {
        if let Some(product) = self.products.find_by_id(id).await? {
            if product.is_fresh_at(self.clock.now(), self.ttl) {
                debug!(product_id = id.0, "serving product from cache");
                return Ok(product);
            }
        }

        let guard = self.refresh_guard(id).await;
        let result = {
            let _locked = guard.lock().await;
            self.refresh(id).await
        };
        drop(guard);
        self.release_guard(id).await;
        result
    }

    async fn refresh(&self, id: ProductId) -> Result<Product, RefreshError> {
        // A concurrent caller may have refreshed the row while we waited on
        // the per-product lock.
        let existing = self.products.find_by_id(id).await?;
        if let Some(product) = &existing {
            if product.is_fresh_at(self.clock.now(), self.ttl) {
                return Ok(product.clone());
            }
        }

        let payload = self.catalog.fetch(id).await?;
        let refreshed = merge(id, existing, payload, self.clock.now());
        self.products.save(refreshed.clone()).await?;
        debug!(product_id = id.0, "product refreshed from catalog");
        Ok(refreshed)
    }

    async fn refresh_guard(&self, id: ProductId) -> Arc<Mutex<()>> {
        let mut inflight = self.inflight.lock().await;
        inflight.entry(id.0).or_default().clone()
    }

    async fn release_guard(&self, id: ProductId) {
        let mut inflight = self.inflight.lock().await;
        if let Some(entry) = inflight.get(&id.0) {
            // strong_count == 1 means the map holds the only reference left
            if Arc::strong_count(entry) == 1 {
                inflight.remove(&id.0);
            }
        }
    }
}

fn merge(
    id: ProductId,
    existing: Option<Product>,
    payload: CatalogPayload,
    now: DateTime<Utc>,
) -> Product {
    match existing {
        Some(mut product) => {
            // review is intentionally left as-is; only creation sets it
            product.title = payload.title;
            product.image = payload.image;
            product.price = payload.price;
            product.last_sync = now;
            product
        }
        None => {
            let review = payload.review_summary();
            Product {
                id,
                title: payload.title,
                image: payload.image,
                price: payload.price,
                review,
                last_sync: now,
            }
        }
    }
}
