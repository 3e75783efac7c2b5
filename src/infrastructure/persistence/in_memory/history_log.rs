//! # In-Memory History Log
//!
//! In-memory implementation of [`HistoryLog`].

use crate::domain::entities::SearchRecord;
use crate::infrastructure::persistence::traits::{HistoryLog, RepositoryResult};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`HistoryLog`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistoryLog {
    records: Arc<RwLock<Vec<SearchRecord>>>,
}

impl InMemoryHistoryLog {
    /// Creates a new empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.try_read().map(|guard| guard.len()).unwrap_or(0)
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns every record in insertion order.
    pub async fn records(&self) -> Vec<SearchRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl HistoryLog for InMemoryHistoryLog {
    async fn record(&self, record: &SearchRecord) -> RepositoryResult<()> {
        let mut records = self.records.write().await;
        records.push(record.clone());
        Ok(())
    }

    async fn recent(&self, limit: usize) -> RepositoryResult<Vec<SearchRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().rev().take(limit).cloned().collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::NormalizedQuery;

    #[tokio::test]
    async fn records_and_lists_newest_first() {
        let log = InMemoryHistoryLog::new();
        assert!(log.is_empty());

        for (q, n) in [("Pixel 8", 2), ("iPhone 15", 3)] {
            let query = NormalizedQuery::parse(q).unwrap();
            log.record(&SearchRecord::new(&query, n)).await.unwrap();
        }

        assert_eq!(log.len(), 2);
        let recent = log.recent(1).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].query_normalized, "iphone 15");
        assert_eq!(recent[0].result_count, 3);
    }
}
