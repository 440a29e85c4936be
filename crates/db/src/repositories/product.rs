use chrono::{DateTime, Utc};
use sqlx::Row;

use favly_core::domain::product::{Product, ProductId};

use super::{ProductRepository, RepositoryError};
use crate::DbPool;

pub struct SqlProductRepository {
    pool: DbPool,
}

impl SqlProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_product(row: &sqlx::sqlite::SqliteRow) -> Result<Product, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let title: String =
        row.try_get("title").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let image: String =
        row.try_get("image").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let price: f64 = row.try_get("price").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let review: Option<String> =
        row.try_get("review").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let last_sync_str: String =
        row.try_get("last_sync").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let last_sync = DateTime::parse_from_rfc3339(&last_sync_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Decode(format!("invalid last_sync timestamp: {e}")))?;

    Ok(Product { id: ProductId(id), title, image, price, review, last_sync })
}

#[async_trait::async_trait]
impl ProductRepository for SqlProductRepository {
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, title, image, price, review, last_sync
             FROM product WHERE id = ?",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_product(r)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, product: Product) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO product (id, title, image, price, review, last_sync)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 title = excluded.title,
                 image = excluded.image,
                 price = excluded.price,
                 review = excluded.review,
                 last_sync = excluded.last_sync",
        )
        .bind(product.id.0)
        .bind(&product.title)
        .bind(&product.image)
        .bind(product.price)
        .bind(&product.review)
        .bind(product.last_sync.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use favly_core::domain::product::{Product, ProductId};

    use super::SqlProductRepository;
    use crate::repositories::ProductRepository;
    use crate::{connect_with_settings, migrations};

    async fn setup() -> sqlx::SqlitePool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        pool
    }

    fn sample_product(id: i64) -> Product {
        Product {
            id: ProductId(id),
            title: "Fjallraven Backpack".to_string(),
            image: "https://example.com/backpack.jpg".to_string(),
            price: 109.95,
            review: Some("Rating: 3.9/5 (120 reviews)".to_string()),
            last_sync: Utc::now(),
        }
    }

    #[tokio::test]
    async fn save_and_find_round_trips_all_fields() {
        let repo = SqlProductRepository::new(setup().await);
        let product = sample_product(1);

        repo.save(product.clone()).await.expect("save");
        let found = repo.find_by_id(ProductId(1)).await.expect("find").expect("exists");

        assert_eq!(found.id, product.id);
        assert_eq!(found.title, product.title);
        assert_eq!(found.image, product.image);
        assert_eq!(found.price, product.price);
        assert_eq!(found.review, product.review);
        // RFC 3339 storage keeps sub-second precision
        assert_eq!(found.last_sync.timestamp_millis(), product.last_sync.timestamp_millis());
    }

    #[tokio::test]
    async fn save_upserts_on_conflict() {
        let repo = SqlProductRepository::new(setup().await);

        let product = sample_product(1);
        repo.save(product.clone()).await.expect("save");

        let mut refreshed = product;
        refreshed.title = "Fjallraven Backpack v2".to_string();
        refreshed.price = 119.5;
        refreshed.last_sync = Utc::now() + Duration::hours(25);
        repo.save(refreshed.clone()).await.expect("upsert");

        let found = repo.find_by_id(ProductId(1)).await.expect("find").expect("exists");
        assert_eq!(found.title, "Fjallraven Backpack v2");
        assert_eq!(found.price, 119.5);
        assert_eq!(found.review, refreshed.review);
    }

    #[tokio::test]
    async fn find_missing_returns_none() {
        let repo = SqlProductRepository::new(setup().await);
        assert!(repo.find_by_id(ProductId(999)).await.expect("find").is_none());
    }
}
