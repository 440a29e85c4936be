use chrono::{DateTime, Utc};
use sqlx::Row;

use favly_core::domain::client::{Client, ClientId, NewClient};

use super::{ClientRepository, RepositoryError};
use crate::DbPool;

pub struct SqlClientRepository {
    pool: DbPool,
}

impl SqlClientRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_client(row: &sqlx::sqlite::SqliteRow) -> Result<Client, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let name: String = row.try_get("name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let email: String =
        row.try_get("email").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let password_hash: String =
        row.try_get("password_hash").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let role_str: String =
        row.try_get("role").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let created_at_str: String =
        row.try_get("created_at").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now());

    Ok(Client {
        id: ClientId(id),
        name,
        email,
        password_hash,
        role: role_str.parse().unwrap_or_default(),
        created_at,
    })
}

#[async_trait::async_trait]
impl ClientRepository for SqlClientRepository {
    async fn find_by_id(&self, id: ClientId) -> Result<Option<Client>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, name, email, password_hash, role, created_at
             FROM client WHERE id = ?",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_client(r)?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Client>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, name, email, password_hash, role, created_at
             FROM client WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_client(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Client>, RepositoryError> {
        let rows: Vec<sqlx::sqlite::SqliteRow> = sqlx::query(
            "SELECT id, name, email, password_hash, role, created_at
             FROM client ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_client).collect::<Result<Vec<_>, _>>()
    }

    async fn create(&self, client: NewClient) -> Result<Client, RepositoryError> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO client (name, email, password_hash, role, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.password_hash)
        .bind(client.role.as_str())
        .bind(created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(Client {
            id: ClientId(result.last_insert_rowid()),
            name: client.name,
            email: client.email,
            password_hash: client.password_hash,
            role: client.role,
            created_at,
        })
    }

    async fn update_name(
        &self,
        id: ClientId,
        name: &str,
    ) -> Result<Option<Client>, RepositoryError> {
        let result = sqlx::query("UPDATE client SET name = ? WHERE id = ?")
            .bind(name)
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn delete(&self, id: ClientId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM client WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
