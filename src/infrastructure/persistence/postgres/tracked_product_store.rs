//! # PostgreSQL Tracked Product Store
//!
//! PostgreSQL implementation of [`TrackedProductStore`] using sqlx.

use crate::domain::entities::TrackedProduct;
use crate::domain::value_objects::{Price, Timestamp, TrackedProductId};
use crate::infrastructure::persistence::traits::{
    RepositoryError, RepositoryResult, TrackedProductStore,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of [`TrackedProductStore`].
#[derive(Debug, Clone)]
pub struct PostgresTrackedProductStore {
    pool: PgPool,
}

impl PostgresTrackedProductStore {
    /// Creates a new PostgreSQL tracked product store.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrackedProductStore for PostgresTrackedProductStore {
    async fn add(&self, product: &TrackedProduct) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO tracked_products (id, product_name, store, current_price, tracked_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(product.id().get())
        .bind(product.product_name())
        .bind(product.store())
        .bind(product.current_price().map(|p| p.get()))
        .bind(*product.tracked_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        Ok(())
    }

    async fn list(&self) -> RepositoryResult<Vec<TrackedProduct>> {
        let rows: Vec<TrackedProductRow> = sqlx::query_as(
            r#"
            SELECT id, product_name, store, current_price, tracked_at
            FROM tracked_products
            ORDER BY tracked_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        rows.into_iter().map(TrackedProductRow::try_into_product).collect()
    }
}

/// Row type for tracked product queries.
#[derive(Debug, sqlx::FromRow)]
struct TrackedProductRow {
    id: Uuid,
    product_name: String,
    store: String,
    current_price: Option<Decimal>,
    tracked_at: DateTime<Utc>,
}

impl TrackedProductRow {
    fn try_into_product(self) -> RepositoryResult<TrackedProduct> {
        let current_price = self
            .current_price
            .map(Price::from_decimal)
            .transpose()
            .map_err(|e| RepositoryError::serialization(e.to_string()))?;
        Ok(TrackedProduct::from_parts(
            TrackedProductId::new(self.id),
            self.product_name,
            self.store,
            current_price,
            Timestamp::from(self.tracked_at),
        ))
    }
}
