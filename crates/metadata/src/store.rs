//! Catalog store trait and SQLite implementation.

use crate::error::{MetadataError, MetadataResult};
use crate::repos::{ProductRepo, ReviewRepo};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Combined catalog store trait.
#[async_trait]
pub trait CatalogStore: ProductRepo + ReviewRepo + Send + Sync {
    /// Apply the schema.
    async fn migrate(&self) -> MetadataResult<()>;

    /// Check database connectivity and health.
    async fn health_check(&self) -> MetadataResult<()>;
}

/// SQLite-based catalog store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Open (or create) a SQLite store and apply the schema.
    pub async fn new(
        path: impl AsRef<Path>,
        query_timeout_secs: Option<u64>,
    ) -> MetadataResult<Self> {
        let path = path.as_ref();
        let busy_timeout = Duration::from_secs(query_timeout_secs.unwrap_or(5));

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(busy_timeout);

        // A single connection serializes writes and avoids "database is locked"
        // failures under concurrent handlers.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;

        tracing::debug!(path = %path.display(), "SQLite catalog store opened");
        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl CatalogStore for SqliteStore {
    async fn migrate(&self) -> MetadataResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

mod sqlite_impl {
    use super::*;
    use crate::models::*;
    use catalog_core::{NO_RATING, NewProduct, NewReview, ReviewStatus, average_rating};
    use sqlx::SqliteConnection;
    use time::OffsetDateTime;

    #[async_trait]
    impl ProductRepo for SqliteStore {
        async fn create_product(
            &self,
            product: &NewProduct,
            created_at: OffsetDateTime,
        ) -> MetadataResult<ProductRow> {
            let row = sqlx::query_as::<_, ProductRow>(
                r#"
                INSERT INTO products (name, category, price, description, rating, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                RETURNING *
                "#,
            )
            .bind(&product.name)
            .bind(&product.category)
            .bind(product.price)
            .bind(&product.description)
            .bind(NO_RATING)
            .bind(created_at)
            .bind(created_at)
            .fetch_one(&self.pool)
            .await?;
            Ok(row)
        }

        async fn get_product(&self, product_id: i64) -> MetadataResult<Option<ProductRow>> {
            let row =
                sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE product_id = ?")
                    .bind(product_id)
                    .fetch_optional(&self.pool)
                    .await?;
            Ok(row)
        }

        async fn product_exists(&self, product_id: i64) -> MetadataResult<bool> {
            let exists: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM products WHERE product_id = ?)",
            )
            .bind(product_id)
            .fetch_one(&self.pool)
            .await?;
            Ok(exists)
        }

        async fn list_products(&self, category: Option<&str>) -> MetadataResult<Vec<ProductRow>> {
            let rows = match category {
                Some(category) => {
                    sqlx::query_as::<_, ProductRow>(
                        "SELECT * FROM products WHERE category = ? ORDER BY product_id",
                    )
                    .bind(category)
                    .fetch_all(&self.pool)
                    .await?
                }
                None => {
                    sqlx::query_as::<_, ProductRow>("SELECT * FROM products ORDER BY product_id")
                        .fetch_all(&self.pool)
                        .await?
                }
            };
            Ok(rows)
        }

        async fn list_categories(&self) -> MetadataResult<Vec<String>> {
            let rows: Vec<String> =
                sqlx::query_scalar("SELECT DISTINCT category FROM products ORDER BY category")
                    .fetch_all(&self.pool)
                    .await?;
            Ok(rows)
        }

        async fn recompute_product_rating(
            &self,
            product_id: i64,
            updated_at: OffsetDateTime,
        ) -> MetadataResult<f64> {
            let mut tx = self.pool.begin().await?;
            let rating = rerate_product(&mut *tx, product_id, updated_at).await?;
            tx.commit().await?;
            Ok(rating)
        }
    }

    #[async_trait]
    impl ReviewRepo for SqliteStore {
        async fn create_review(
            &self,
            product_id: i64,
            review: &NewReview,
            created_at: OffsetDateTime,
        ) -> MetadataResult<RatedReview> {
            let mut tx = self.pool.begin().await?;

            let result = sqlx::query_as::<_, ReviewRow>(
                r#"
                INSERT INTO reviews (product_id, rating, comment, user_name, status, created_at)
                VALUES (?, ?, ?, ?, ?, ?)
                RETURNING *
                "#,
            )
            .bind(product_id)
            .bind(i64::from(review.rating))
            .bind(&review.comment)
            .bind(&review.user_name)
            .bind(ReviewStatus::Pending.as_str())
            .bind(created_at)
            .fetch_one(&mut *tx)
            .await;

            let review = match result {
                Ok(row) => row,
                Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
                    return Err(MetadataError::NotFound(format!(
                        "product_id {} not found",
                        product_id
                    )));
                }
                Err(e) => return Err(e.into()),
            };

            let product_rating = rerate_product(&mut *tx, product_id, created_at).await?;
            tx.commit().await?;

            Ok(RatedReview {
                review,
                product_rating,
            })
        }

        async fn get_review(&self, review_id: i64) -> MetadataResult<Option<ReviewRow>> {
            let row = sqlx::query_as::<_, ReviewRow>("SELECT * FROM reviews WHERE review_id = ?")
                .bind(review_id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn list_product_reviews(
            &self,
            product_id: i64,
            status: ReviewStatus,
        ) -> MetadataResult<Vec<ReviewRow>> {
            let rows = sqlx::query_as::<_, ReviewRow>(
                r#"
                SELECT * FROM reviews
                WHERE product_id = ? AND status = ?
                ORDER BY created_at DESC, review_id DESC
                "#,
            )
            .bind(product_id)
            .bind(status.as_str())
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }

        async fn list_reviews_by_status(
            &self,
            status: ReviewStatus,
        ) -> MetadataResult<Vec<ReviewRow>> {
            let rows = sqlx::query_as::<_, ReviewRow>(
                "SELECT * FROM reviews WHERE status = ? ORDER BY created_at ASC, review_id ASC",
            )
            .bind(status.as_str())
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }

        async fn update_review_status(
            &self,
            review_id: i64,
            from: ReviewStatus,
            to: ReviewStatus,
            updated_at: OffsetDateTime,
        ) -> MetadataResult<RatedReview> {
            let mut tx = self.pool.begin().await?;

            let updated = sqlx::query_as::<_, ReviewRow>(
                "UPDATE reviews SET status = ? WHERE review_id = ? AND status = ? RETURNING *",
            )
            .bind(to.as_str())
            .bind(review_id)
            .bind(from.as_str())
            .fetch_optional(&mut *tx)
            .await?;

            let Some(review) = updated else {
                let current: Option<String> =
                    sqlx::query_scalar("SELECT status FROM reviews WHERE review_id = ?")
                        .bind(review_id)
                        .fetch_optional(&mut *tx)
                        .await?;
                return match current {
                    None => Err(MetadataError::NotFound(format!(
                        "review_id {} not found",
                        review_id
                    ))),
                    Some(current) => Err(MetadataError::InvalidStateTransition {
                        from: current,
                        to: to.as_str().to_string(),
                    }),
                };
            };

            let product_rating = rerate_product(&mut *tx, review.product_id, updated_at).await?;
            tx.commit().await?;

            Ok(RatedReview {
                review,
                product_rating,
            })
        }
    }

    /// Rescan a product's reviews and write the mean of those that count
    /// toward the rating onto the product row.
    ///
    /// Runs on the caller's transaction; nothing is visible until it commits.
    async fn rerate_product(
        conn: &mut SqliteConnection,
        product_id: i64,
        updated_at: OffsetDateTime,
    ) -> MetadataResult<f64> {
        let reviews = sqlx::query_as::<_, ReviewRow>("SELECT * FROM reviews WHERE product_id = ?")
            .bind(product_id)
            .fetch_all(&mut *conn)
            .await?;

        let mut ratings = Vec::with_capacity(reviews.len());
        for review in &reviews {
            if review.status()?.counts_toward_rating() {
                ratings.push(review.rating()?);
            }
        }
        let rating = average_rating(&ratings);

        let result =
            sqlx::query("UPDATE products SET rating = ?, updated_at = ? WHERE product_id = ?")
                .bind(rating)
                .bind(updated_at)
                .bind(product_id)
                .execute(&mut *conn)
                .await?;

        if result.rows_affected() == 0 {
            return Err(MetadataError::NotFound(format!(
                "product_id {} not found",
                product_id
            )));
        }
        Ok(rating)
    }
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    product_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    category TEXT NOT NULL,
    price REAL NOT NULL DEFAULT 0,
    description TEXT,
    -- Derived: mean of approved review ratings, 0 when there are none
    rating REAL NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_products_category ON products(category);

CREATE TABLE IF NOT EXISTS reviews (
    review_id INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id INTEGER NOT NULL REFERENCES products(product_id) ON DELETE CASCADE,
    rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
    comment TEXT NOT NULL,
    user_name TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending' CHECK (status IN ('pending', 'approved', 'rejected')),
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_reviews_product_status ON reviews(product_id, status, created_at);
CREATE INDEX IF NOT EXISTS idx_reviews_status ON reviews(status, created_at);
"#;
