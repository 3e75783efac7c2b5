//! # PostgreSQL History Log
//!
//! PostgreSQL implementation of [`HistoryLog`] using sqlx.

use crate::domain::entities::SearchRecord;
use crate::domain::value_objects::Timestamp;
use crate::infrastructure::persistence::traits::{HistoryLog, RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// PostgreSQL implementation of [`HistoryLog`].
#[derive(Debug, Clone)]
pub struct PostgresHistoryLog {
    pool: PgPool,
}

impl PostgresHistoryLog {
    /// Creates a new PostgreSQL history log.
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
impl HistoryLog for PostgresHistoryLog {
    async fn record(&self, record: &SearchRecord) -> RepositoryResult<()> {
        let result_count = i32::try_from(record.result_count)
            .map_err(|e| RepositoryError::serialization(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO search_history (query, query_normalized, result_count, searched_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&record.query)
        .bind(&record.query_normalized)
        .bind(result_count)
        .bind(*record.searched_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        Ok(())
    }

    async fn recent(&self, limit: usize) -> RepositoryResult<Vec<SearchRecord>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<HistoryRow> = sqlx::query_as(
            r#"
            SELECT query, query_normalized, result_count, searched_at
            FROM search_history
            ORDER BY searched_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        rows.into_iter().map(HistoryRow::try_into_record).collect()
    }
}

/// Row type for history queries.
#[derive(Debug, sqlx::FromRow)]
struct HistoryRow {
    query: String,
    query_normalized: String,
    result_count: i32,
    searched_at: DateTime<Utc>,
}

impl HistoryRow {
    fn try_into_record(self) -> RepositoryResult<SearchRecord> {
        let result_count = usize::try_from(self.result_count)
            .map_err(|e| RepositoryError::serialization(e.to_string()))?;
        Ok(SearchRecord {
            query: self.query,
            query_normalized: self.query_normalized,
            result_count,
            searched_at: Timestamp::from(self.searched_at),
        })
    }
}
