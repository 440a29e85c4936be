use chrono::{DateTime, Utc};
use sqlx::Row;

use favly_core::domain::client::ClientId;
use favly_core::domain::favorite::{Favorite, FavoriteId};
use favly_core::domain::product::ProductId;

use super::{FavoriteRepository, RepositoryError};
use crate::DbPool;

pub struct SqlFavoriteRepository {
    pool: DbPool,
}

impl SqlFavoriteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_favorite(row: &sqlx::sqlite::SqliteRow) -> Result<Favorite, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let client_id: i64 =
        row.try_get("client_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let product_id: i64 =
        row.try_get("product_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let created_at_str: String =
        row.try_get("created_at").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now());

    Ok(Favorite {
        id: FavoriteId(id),
        client_id: ClientId(client_id),
        product_id: ProductId(product_id),
        created_at,
    })
}

#[async_trait::async_trait]
impl FavoriteRepository for SqlFavoriteRepository {
    async fn list_for_client(
        &self,
        client_id: ClientId,
    ) -> Result<Vec<Favorite>, RepositoryError> {
        let rows: Vec<sqlx::sqlite::SqliteRow> = sqlx::query(
            "SELECT id, client_id, product_id, created_at
             FROM favorite WHERE client_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(client_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_favorite).collect::<Result<Vec<_>, _>>()
    }

    async fn find(
        &self,
        client_id: ClientId,
        product_id: ProductId,
    ) -> Result<Option<Favorite>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, client_id, product_id, created_at
             FROM favorite WHERE client_id = ? AND product_id = ?",
        )
        .bind(client_id.0)
        .bind(product_id.0)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_favorite(r)?)),
            None => Ok(None),
        }
    }

    async fn add(
        &self,
        client_id: ClientId,
        product_id: ProductId,
    ) -> Result<Favorite, RepositoryError> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO favorite (client_id, product_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(client_id.0)
        .bind(product_id.0)
        .bind(created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(Favorite { id: FavoriteId(result.last_insert_rowid()), client_id, product_id, created_at })
    }

    async fn remove(
        &self,
        client_id: ClientId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM favorite WHERE client_id = ? AND product_id = ?")
            .bind(client_id.0)
            .bind(product_id.0)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
