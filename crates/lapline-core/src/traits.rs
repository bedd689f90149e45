use std::future::Future;

use crate::error::AppError;
use crate::table::TableRecord;

/// Fetches one JSON document from the race data API.
///
/// `path` is relative to the configured API base URL (for example
/// `f1/2024/1/laps`). Implementations make a single attempt; retrying is
/// layered on top by [`RetryingFetcher`](crate::retry::RetryingFetcher).
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<serde_json::Value, AppError>> + Send;
}

/// Persists a full table of records, replacing whatever the destination held.
pub trait BulkLoader: Send + Sync {
    /// Replace the contents of `table` with `records`. Returns rows written.
    ///
    /// Either every row lands or the destination keeps its previous contents.
    fn load<R: TableRecord>(
        &self,
        records: &[R],
        table: &str,
    ) -> impl Future<Output = Result<u64, AppError>> + Send;
}
