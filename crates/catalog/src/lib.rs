pub mod cache;
pub mod client;

pub use cache::{Clock, ProductCache, RefreshError, SystemClock};
pub use client::{CatalogClient, CatalogError, CatalogPayload, CatalogRating, HttpCatalogClient};
