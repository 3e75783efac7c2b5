//! # PostgreSQL Schema
//!
//! DDL for the snapshot, history and tracked product tables.
//!
//! Statements are idempotent so [`ensure_schema`] can run on every start.

use crate::infrastructure::persistence::traits::{RepositoryError, RepositoryResult};
use sqlx::PgPool;

/// Snapshot table.
pub const CREATE_PRICE_SNAPSHOT: &str = r#"
CREATE TABLE IF NOT EXISTS price_snapshot (
    id               UUID PRIMARY KEY,
    query_normalized TEXT NOT NULL,
    vendor           TEXT NOT NULL,
    price            NUMERIC(14, 2),
    url              TEXT NOT NULL,
    title            TEXT NOT NULL,
    in_stock         BOOLEAN NOT NULL,
    image_url        TEXT,
    rating           DOUBLE PRECISION,
    enrichment       TEXT,
    observed_at      TIMESTAMPTZ NOT NULL,
    captured_at      TIMESTAMPTZ NOT NULL
)
"#;

/// Lookup index for the freshness query.
pub const CREATE_PRICE_SNAPSHOT_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_price_snapshot_query_captured
    ON price_snapshot (query_normalized, captured_at DESC)
"#;

/// History table.
pub const CREATE_SEARCH_HISTORY: &str = r#"
CREATE TABLE IF NOT EXISTS search_history (
    id               BIGSERIAL PRIMARY KEY,
    query            TEXT NOT NULL,
    query_normalized TEXT NOT NULL,
    result_count     INTEGER NOT NULL,
    searched_at      TIMESTAMPTZ NOT NULL
)
"#;

/// Tracked product table.
pub const CREATE_TRACKED_PRODUCTS: &str = r#"
CREATE TABLE IF NOT EXISTS tracked_products (
    id            UUID PRIMARY KEY,
    product_name  TEXT NOT NULL,
    store         TEXT NOT NULL,
    current_price NUMERIC(14, 2),
    tracked_at    TIMESTAMPTZ NOT NULL
)
"#;

/// Creates tables and indexes if they are missing.
///
/// # Errors
///
/// Returns `RepositoryError::Query` if any statement fails.
pub async fn ensure_schema(pool: &PgPool) -> RepositoryResult<()> {
    for statement in [
        CREATE_PRICE_SNAPSHOT,
        CREATE_PRICE_SNAPSHOT_INDEX,
        CREATE_SEARCH_HISTORY,
        CREATE_TRACKED_PRODUCTS,
    ] {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;
    }
    Ok(())
}
