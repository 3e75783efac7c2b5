//! # PostgreSQL Snapshot Store
//!
//! PostgreSQL implementation of [`SnapshotStore`] using sqlx.
//!
//! Rows are insert-only. The freshness lookup is served by the
//! `(query_normalized, captured_at)` index.

use crate::domain::entities::{Listing, Snapshot};
use crate::domain::value_objects::{Price, Rating, SnapshotId, Timestamp, VendorId};
use crate::infrastructure::persistence::traits::{
    RepositoryError, RepositoryResult, SnapshotStore,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of [`SnapshotStore`].
///
/// # Examples
///
/// ```ignore
/// use sqlx::PgPool;
/// use pricehawk::infrastructure::persistence::postgres::PostgresSnapshotStore;
///
/// let pool = PgPool::connect("postgres://...").await?;
/// let store = PostgresSnapshotStore::new(pool);
/// ```
#[derive(Debug, Clone)]
pub struct PostgresSnapshotStore {
    pool: PgPool,
}

impl PostgresSnapshotStore {
    /// Creates a new PostgreSQL snapshot store.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl SnapshotStore for PostgresSnapshotStore {
    async fn find_recent(&self, query: &str, since: Timestamp) -> RepositoryResult<Vec<Snapshot>> {
        let rows: Vec<SnapshotRow> = sqlx::query_as(
            r#"
            SELECT id, query_normalized, vendor, price, url, title, in_stock,
                   image_url, rating, enrichment, observed_at, captured_at
            FROM price_snapshot
            WHERE query_normalized = $1 AND captured_at >= $2
            ORDER BY captured_at DESC
            "#,
        )
        .bind(query)
        .bind(*since.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        rows.into_iter().map(SnapshotRow::try_into_snapshot).collect()
    }

    async fn latest(&self, query: &str, limit: usize) -> RepositoryResult<Vec<Snapshot>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<SnapshotRow> = sqlx::query_as(
            r#"
            SELECT id, query_normalized, vendor, price, url, title, in_stock,
                   image_url, rating, enrichment, observed_at, captured_at
            FROM price_snapshot
            WHERE query_normalized = $1
            ORDER BY captured_at DESC
            LIMIT $2
            "#,
        )
        .bind(query)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        rows.into_iter().map(SnapshotRow::try_into_snapshot).collect()
    }

    async fn append(&self, snapshot: &Snapshot) -> RepositoryResult<()> {
        let listing = snapshot.listing();

        sqlx::query(
            r#"
            INSERT INTO price_snapshot (
                id, query_normalized, vendor, price, url, title, in_stock,
                image_url, rating, enrichment, observed_at, captured_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(snapshot.id().get())
        .bind(snapshot.query())
        .bind(listing.vendor().as_str())
        .bind(listing.price().map(|p| p.get()))
        .bind(listing.url())
        .bind(listing.title())
        .bind(listing.in_stock())
        .bind(listing.image_url())
        .bind(listing.rating().map(|r| r.get()))
        .bind(listing.enrichment())
        .bind(*listing.observed_at().as_datetime())
        .bind(*snapshot.captured_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        Ok(())
    }
}

/// Row type for snapshot queries.
#[derive(Debug, sqlx::FromRow)]
struct SnapshotRow {
    id: Uuid,
    query_normalized: String,
    vendor: String,
    price: Option<Decimal>,
    url: String,
    title: String,
    in_stock: bool,
    image_url: Option<String>,
    rating: Option<f64>,
    enrichment: Option<String>,
    observed_at: DateTime<Utc>,
    captured_at: DateTime<Utc>,
}

impl SnapshotRow {
    /// Converts the row into a Snapshot.
    fn try_into_snapshot(self) -> RepositoryResult<Snapshot> {
        let price = self
            .price
            .map(Price::from_decimal)
            .transpose()
            .map_err(|e| RepositoryError::serialization(e.to_string()))?;
        let rating = self
            .rating
            .map(Rating::new)
            .transpose()
            .map_err(|e| RepositoryError::serialization(e.to_string()))?;

        let listing = Listing::builder(VendorId::new(&self.vendor), self.url, self.title)
            .maybe_price(price)
            .in_stock(self.in_stock)
            .maybe_image_url(self.image_url)
            .rating(rating)
            .enrichment(self.enrichment)
            .observed_at(Timestamp::from(self.observed_at))
            .build();

        Ok(Snapshot::from_parts(
            SnapshotId::new(self.id),
            self.query_normalized,
            listing,
            Timestamp::from(self.captured_at),
        ))
    }
}
