use std::collections::HashMap;

use tokio::sync::RwLock;

use favly_core::domain::product::{Product, ProductId};

use super::{ProductRepository, RepositoryError};

/// Test double used by the cache engine tests; mirrors the SQL repository
/// contract without a database.
#[derive(Default)]
pub struct InMemoryProductRepository {
    products: RwLock<HashMap<i64, Product>>,
}

#[async_trait::async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let products = self.products.read().await;
        Ok(products.get(&id.0).cloned())
    }

    async fn save(&self, product: Product) -> Result<(), RepositoryError> {
        let mut products = self.products.write().await;
        products.insert(product.id.0, product);
        Ok(())
    }
}
