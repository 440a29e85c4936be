use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::client::ClientId;
use crate::domain::product::ProductId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FavoriteId(pub i64);

/// Association between a client and a catalog product they marked as favorite.
/// A client favorites a given product at most once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: FavoriteId,
    pub client_id: ClientId,
    pub product_id: ProductId,
    pub created_at: DateTime<Utc>,
}
