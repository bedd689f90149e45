pub mod api;
pub mod error;
pub mod ingest;
pub mod models;
pub mod report;
pub mod response;
pub mod retry;
pub mod table;
pub mod traits;
pub mod transform;

#[cfg(test)]
mod testutil;

pub use error::AppError;
pub use ingest::{IngestService, TableNames};
pub use models::{LapRecord, PitStopRecord, RaceKey, RaceMeta, RaceRecords, RunSummary, SeasonResult};
pub use report::{IngestEvent, IngestReporter, NullReporter, TracingIngestReporter};
pub use retry::{RetryPolicy, RetryingFetcher};
pub use traits::{BulkLoader, Fetcher};
