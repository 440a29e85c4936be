use std::sync::Arc;

use favly_catalog::{HttpCatalogClient, ProductCache};
use favly_core::config::AppConfig;
use favly_db::repositories::{
    ClientRepository, FavoriteRepository, ProductRepository, SqlClientRepository,
    SqlFavoriteRepository, SqlProductRepository,
};
use favly_db::DbPool;

use crate::auth::AuthKeys;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: DbPool,
    pub clients: Arc<dyn ClientRepository>,
    pub favorites: Arc<dyn FavoriteRepository>,
    pub cache: Arc<ProductCache>,
    pub auth: Arc<AuthKeys>,
}

impl AppState {
    pub fn from_config(config: &AppConfig, db_pool: DbPool) -> Self {
        let products: Arc<dyn ProductRepository> =
            Arc::new(SqlProductRepository::new(db_pool.clone()));
        let catalog = Arc::new(HttpCatalogClient::new(
            config.catalog.base_url.clone(),
            config.catalog.request_timeout(),
        ));
        let cache = Arc::new(ProductCache::new(products, catalog, config.catalog.cache_ttl()));

        Self {
            clients: Arc::new(SqlClientRepository::new(db_pool.clone())),
            favorites: Arc::new(SqlFavoriteRepository::new(db_pool.clone())),
            cache,
            auth: Arc::new(AuthKeys::from_config(&config.auth)),
            db_pool,
        }
    }
}
