use async_trait::async_trait;
use thiserror::Error;

use favly_core::domain::client::{Client, ClientId, NewClient};
use favly_core::domain::favorite::Favorite;
use favly_core::domain::product::{Product, ProductId};

pub mod client;
pub mod favorite;
pub mod memory;
pub mod product;

pub use client::SqlClientRepository;
pub use favorite::SqlFavoriteRepository;
pub use memory::InMemoryProductRepository;
pub use product::SqlProductRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn find_by_id(&self, id: ClientId) -> Result<Option<Client>, RepositoryError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Client>, RepositoryError>;
    async fn list(&self) -> Result<Vec<Client>, RepositoryError>;
    async fn create(&self, client: NewClient) -> Result<Client, RepositoryError>;
    async fn update_name(&self, id: ClientId, name: &str)
        -> Result<Option<Client>, RepositoryError>;
    async fn delete(&self, id: ClientId) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;
    async fn save(&self, product: Product) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    async fn list_for_client(&self, client_id: ClientId)
        -> Result<Vec<Favorite>, RepositoryError>;

    async fn find(
        &self,
        client_id: ClientId,
        product_id: ProductId,
    ) -> Result<Option<Favorite>, RepositoryError>;

    async fn add(
        &self,
        client_id: ClientId,
        product_id: ProductId,
    ) -> Result<Favorite, RepositoryError>;

    async fn remove(
        &self,
        client_id: ClientId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError>;
}
