pub mod config;
pub mod domain;
pub mod errors;
pub mod password;

pub use domain::client::{Client, ClientId, NewClient, Role};
pub use domain::favorite::{Favorite, FavoriteId};
pub use domain::product::{Product, ProductId};
pub use errors::DomainError;
