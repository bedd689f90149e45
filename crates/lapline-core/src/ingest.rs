use crate::api::{Resource, discover_rounds};
use crate::error::AppError;
use crate::models::{RaceKey, RaceRecords, RunSummary, SeasonResult};
use crate::report::{IngestEvent, IngestReporter};
use crate::table::TableRecord;
use crate::traits::{BulkLoader, Fetcher};
use crate::transform::{transform_laps, transform_pit_stops};

/// Destination table names for the two record streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    pub laps: String,
    pub pit_stops: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            laps: "raw_lap_times".to_string(),
            pit_stops: "raw_pit_stops".to_string(),
        }
    }
}

/// Orchestrates the ingestion pipeline: discover → fetch → transform → aggregate → load.
///
/// Generic over the fetcher, loader and reporter so the whole run can be
/// exercised without HTTP or a database. Everything runs sequentially:
/// seasons in input order, rounds in discovery order, laps before pit stops.
pub struct IngestService<F, L, R>
where
    F: Fetcher,
    L: BulkLoader,
    R: IngestReporter,
{
    fetcher: F,
    loader: L,
    reporter: R,
    tables: TableNames,
}

impl<F, L, R> IngestService<F, L, R>
where
    F: Fetcher,
    L: BulkLoader,
    R: IngestReporter,
{
    pub fn new(fetcher: F, loader: L, reporter: R) -> Self {
        Self {
            fetcher,
            loader,
            reporter,
            tables: TableNames::default(),
        }
    }

    /// Override the destination table names.
    pub fn with_tables(mut self, tables: TableNames) -> Self {
        self.tables = tables;
        self
    }

    pub fn tables(&self) -> &TableNames {
        &self.tables
    }

    /// Fetch and transform lap and pit-stop data for one round.
    ///
    /// Any fetch or transform failure is returned as-is; the caller decides
    /// whether the round is skipped.
    pub async fn ingest_race(
        &self,
        season: i32,
        round: i32,
        max_laps: Option<usize>,
    ) -> Result<RaceRecords, AppError> {
        let key = RaceKey::new(season, round);
        self.reporter.report(IngestEvent::RoundStarted { key });

        let lap_doc = self.fetcher.fetch(&Resource::Laps(key).path()).await?;
        let pit_doc = self.fetcher.fetch(&Resource::PitStops(key).path()).await?;

        let laps = transform_laps(&lap_doc, key, max_laps, &self.reporter)?;
        let pit_stops = transform_pit_stops(&pit_doc, key)?;

        Ok(RaceRecords { laps, pit_stops })
    }

    /// Ingest every round of a season.
    ///
    /// A failed round is reported and contributes nothing; the remaining
    /// rounds still run. Only a failed round discovery fails the season.
    pub async fn ingest_season(
        &self,
        season: i32,
        max_laps: Option<usize>,
    ) -> Result<SeasonResult, AppError> {
        self.reporter.report(IngestEvent::SeasonStarted { season });

        let rounds = discover_rounds(&self.fetcher, season).await?;
        self.reporter.report(IngestEvent::RoundsDiscovered {
            season,
            rounds: &rounds,
        });

        let mut result = SeasonResult::new(season);
        for &round in &rounds {
            match self.ingest_race(season, round, max_laps).await {
                Ok(race) => result.append(race),
                Err(e) => self.reporter.report(IngestEvent::RoundFailed {
                    key: RaceKey::new(season, round),
                    error: &e,
                }),
            }
        }

        self.reporter.report(IngestEvent::SeasonCompleted {
            season,
            laps: result.laps.len(),
            pit_stops: result.pit_stops.len(),
        });

        Ok(result)
    }

    /// Ingest all `seasons` in order, then replace both destination tables.
    ///
    /// Failed seasons are reported and skipped. An empty aggregate leaves its
    /// table untouched. Load errors are returned and end the run.
    pub async fn ingest_and_load(
        &self,
        seasons: &[i32],
        max_laps: Option<usize>,
    ) -> Result<RunSummary, AppError> {
        self.reporter
            .report(IngestEvent::RunStarted { seasons, max_laps });

        let mut all_laps = Vec::new();
        let mut all_pit_stops = Vec::new();

        for &season in seasons {
            match self.ingest_season(season, max_laps).await {
                Ok(result) => {
                    all_laps.extend(result.laps);
                    all_pit_stops.extend(result.pit_stops);
                }
                Err(e) => self
                    .reporter
                    .report(IngestEvent::SeasonFailed { season, error: &e }),
            }
        }

        let summary = RunSummary {
            lap_rows: self.load_table(&all_laps, &self.tables.laps).await?,
            pit_stop_rows: self
                .load_table(&all_pit_stops, &self.tables.pit_stops)
                .await?,
        };

        self.reporter.report(IngestEvent::RunCompleted {
            lap_rows: summary.lap_rows,
            pit_stop_rows: summary.pit_stop_rows,
        });

        Ok(summary)
    }

    async fn load_table<T: TableRecord>(&self, records: &[T], table: &str) -> Result<usize, AppError> {
        if records.is_empty() {
            self.reporter.report(IngestEvent::TableSkipped { table });
            return Ok(0);
        }

        let rows = self.loader.load(records, table).await?;
        self.reporter.report(IngestEvent::TableLoaded { table, rows });

        Ok(records.len())
    }
}
