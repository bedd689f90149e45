use crate::error::AppError;
use crate::models::RaceKey;

/// Events emitted during an ingestion run for monitoring/logging.
#[derive(Debug, Clone, Copy)]
pub enum IngestEvent<'a> {
    RunStarted {
        seasons: &'a [i32],
        max_laps: Option<usize>,
    },
    SeasonStarted {
        season: i32,
    },
    RoundsDiscovered {
        season: i32,
        rounds: &'a [i32],
    },
    RoundStarted {
        key: RaceKey,
    },
    /// A lap cap was given but the race has fewer laps than the cap.
    FewerLapsThanCap {
        key: RaceKey,
        found: usize,
        cap: usize,
    },
    RoundFailed {
        key: RaceKey,
        error: &'a AppError,
    },
    SeasonCompleted {
        season: i32,
        laps: usize,
        pit_stops: usize,
    },
    SeasonFailed {
        season: i32,
        error: &'a AppError,
    },
    TableSkipped {
        table: &'a str,
    },
    TableLoaded {
        table: &'a str,
        rows: u64,
    },
    RunCompleted {
        lap_rows: usize,
        pit_stop_rows: usize,
    },
}

/// Trait for receiving ingestion events (decoupled logging).
pub trait IngestReporter: Send + Sync {
    fn report(&self, event: IngestEvent<'_>) {
        let _ = event;
    }
}

/// Reporter that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl IngestReporter for NullReporter {}

/// Reporter that uses the `tracing` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingIngestReporter;

impl IngestReporter for TracingIngestReporter {
    fn report(&self, event: IngestEvent<'_>) {
        match event {
            IngestEvent::RunStarted { seasons, max_laps } => {
                tracing::info!(?seasons, ?max_laps, "Starting ingestion run");
            }
            IngestEvent::SeasonStarted { season } => {
                tracing::info!(%season, "Starting season");
            }
            IngestEvent::RoundsDiscovered { season, rounds } => {
                tracing::info!(%season, count = rounds.len(), "Rounds discovered");
            }
            IngestEvent::RoundStarted { key } => {
                tracing::info!(season = key.season(), round = key.round(), "Processing round");
            }
            IngestEvent::FewerLapsThanCap { key, found, cap } => {
                tracing::info!(
                    season = key.season(),
                    round = key.round(),
                    %found,
                    %cap,
                    "Race has fewer laps than the requested cap"
                );
            }
            IngestEvent::RoundFailed { key, error } => {
                tracing::warn!(
                    season = key.season(),
                    round = key.round(),
                    %error,
                    "Round failed, skipping"
                );
            }
            IngestEvent::SeasonCompleted {
                season,
                laps,
                pit_stops,
            } => {
                tracing::info!(%season, %laps, %pit_stops, "Season complete");
            }
            IngestEvent::SeasonFailed { season, error } => {
                tracing::error!(%season, %error, "Season failed, skipping");
            }
            IngestEvent::TableSkipped { table } => {
                tracing::info!(%table, "No rows collected, table left untouched");
            }
            IngestEvent::TableLoaded { table, rows } => {
                tracing::info!(%table, %rows, "Table loaded");
            }
            IngestEvent::RunCompleted {
                lap_rows,
                pit_stop_rows,
            } => {
                tracing::info!(%lap_rows, %pit_stop_rows, "Ingestion complete");
            }
        }
    }
}
