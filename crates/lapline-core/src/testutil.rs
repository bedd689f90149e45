//! Test utilities: mock implementations of the core traits and response fixtures.
//!
//! Handwritten mocks for dependency injection in unit tests.
//! All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use crate::error::AppError;
use crate::models::RaceKey;
use crate::report::{IngestEvent, IngestReporter};
use crate::table::{CellValue, TableRecord};
use crate::traits::{BulkLoader, Fetcher};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// Mock fetcher with a queue of responses per path.
///
/// Each call pops the next queued response for its path. A path with nothing
/// queued answers with HTTP 404.
#[derive(Clone, Default)]
pub struct MockFetcher {
    responses: Arc<Mutex<HashMap<String, VecDeque<Result<Value, AppError>>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `path`.
    pub fn push(&self, path: &str, response: Result<Value, AppError>) {
        self.responses
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(response);
    }

    /// Every requested path, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, path: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|p| *p == path).count()
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, path: &str) -> Result<Value, AppError> {
        self.calls.lock().unwrap().push(path.to_string());
        let next = self
            .responses
            .lock()
            .unwrap()
            .get_mut(path)
            .and_then(VecDeque::pop_front);
        next.unwrap_or_else(|| {
            Err(AppError::HttpStatus {
                status: 404,
                url: format!("https://api.example.com/{path}"),
            })
        })
    }
}

// ---------------------------------------------------------------------------
// MockLoader
// ---------------------------------------------------------------------------

/// One recorded call to [`MockLoader::load`].
#[derive(Debug, Clone)]
pub struct LoadCall {
    pub table: String,
    pub rows: Vec<Vec<CellValue>>,
}

impl LoadCall {
    /// First column of every row, which is `race_id` for both record types.
    pub fn race_ids(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| match row.first() {
                Some(CellValue::Text(Some(id))) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }
}

/// Mock loader that records every table it is handed.
#[derive(Clone, Default)]
pub struct MockLoader {
    loads: Arc<Mutex<Vec<LoadCall>>>,
    error: Arc<Mutex<Option<AppError>>>,
}

impl MockLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader whose first load fails with `error`.
    pub fn with_error(error: AppError) -> Self {
        Self {
            loads: Arc::new(Mutex::new(Vec::new())),
            error: Arc::new(Mutex::new(Some(error))),
        }
    }

    pub fn loads(&self) -> Vec<LoadCall> {
        self.loads.lock().unwrap().clone()
    }
}

impl BulkLoader for MockLoader {
    async fn load<R: TableRecord>(&self, records: &[R], table: &str) -> Result<u64, AppError> {
        if let Some(e) = self.error.lock().unwrap().take() {
            return Err(e);
        }
        self.loads.lock().unwrap().push(LoadCall {
            table: table.to_string(),
            rows: records.iter().map(TableRecord::values).collect(),
        });
        Ok(records.len() as u64)
    }
}

// ---------------------------------------------------------------------------
// RecordingReporter
// ---------------------------------------------------------------------------

/// Owned copy of an [`IngestEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedEvent {
    RunStarted {
        seasons: Vec<i32>,
        max_laps: Option<usize>,
    },
    SeasonStarted(i32),
    RoundsDiscovered {
        season: i32,
        rounds: Vec<i32>,
    },
    RoundStarted(RaceKey),
    FewerLapsThanCap {
        key: RaceKey,
        found: usize,
        cap: usize,
    },
    RoundFailed {
        key: RaceKey,
        error: String,
    },
    SeasonCompleted {
        season: i32,
        laps: usize,
        pit_stops: usize,
    },
    SeasonFailed {
        season: i32,
        error: String,
    },
    TableSkipped(String),
    TableLoaded {
        table: String,
        rows: u64,
    },
    RunCompleted {
        lap_rows: usize,
        pit_stop_rows: usize,
    },
}

impl From<IngestEvent<'_>> for RecordedEvent {
    fn from(event: IngestEvent<'_>) -> Self {
        match event {
            IngestEvent::RunStarted { seasons, max_laps } => RecordedEvent::RunStarted {
                seasons: seasons.to_vec(),
                max_laps,
            },
            IngestEvent::SeasonStarted { season } => RecordedEvent::SeasonStarted(season),
            IngestEvent::RoundsDiscovered { season, rounds } => RecordedEvent::RoundsDiscovered {
                season,
                rounds: rounds.to_vec(),
            },
            IngestEvent::RoundStarted { key } => RecordedEvent::RoundStarted(key),
            IngestEvent::FewerLapsThanCap { key, found, cap } => {
                RecordedEvent::FewerLapsThanCap { key, found, cap }
            }
            IngestEvent::RoundFailed { key, error } => RecordedEvent::RoundFailed {
                key,
                error: error.to_string(),
            },
            IngestEvent::SeasonCompleted {
                season,
                laps,
                pit_stops,
            } => RecordedEvent::SeasonCompleted {
                season,
                laps,
                pit_stops,
            },
            IngestEvent::SeasonFailed { season, error } => RecordedEvent::SeasonFailed {
                season,
                error: error.to_string(),
            },
            IngestEvent::TableSkipped { table } => RecordedEvent::TableSkipped(table.to_string()),
            IngestEvent::TableLoaded { table, rows } => RecordedEvent::TableLoaded {
                table: table.to_string(),
                rows,
            },
            IngestEvent::RunCompleted {
                lap_rows,
                pit_stop_rows,
            } => RecordedEvent::RunCompleted {
                lap_rows,
                pit_stop_rows,
            },
        }
    }
}

/// Reporter that keeps every event for later assertions.
#[derive(Clone, Default)]
pub struct RecordingReporter {
    events: Arc<Mutex<Vec<RecordedEvent>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Keys of every round reported as failed.
    pub fn round_failures(&self) -> Vec<RaceKey> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                RecordedEvent::RoundFailed { key, .. } => Some(key),
                _ => None,
            })
            .collect()
    }

    /// Every season reported as failed.
    pub fn season_failures(&self) -> Vec<i32> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                RecordedEvent::SeasonFailed { season, .. } => Some(season),
                _ => None,
            })
            .collect()
    }
}

impl IngestReporter for RecordingReporter {
    fn report(&self, event: IngestEvent<'_>) {
        self.events.lock().unwrap().push(event.into());
    }
}

// ---------------------------------------------------------------------------
// Response fixtures
// ---------------------------------------------------------------------------

/// Season calendar listing `rounds` in the given order.
pub fn calendar_document(rounds: &[i32]) -> Value {
    let races: Vec<Value> = rounds
        .iter()
        .map(|r| json!({"season": "2024", "round": r.to_string(), "raceName": format!("Race {r}")}))
        .collect();
    json!({"MRData": {"RaceTable": {"Races": races}}})
}

/// Lap document with one race of `laps` laps, each timing every driver.
pub fn lap_document(laps: usize, drivers: &[&str]) -> Value {
    let laps: Vec<Value> = (1..=laps)
        .map(|number| {
            let timings: Vec<Value> = drivers
                .iter()
                .enumerate()
                .map(|(i, driver)| {
                    json!({
                        "driverId": driver,
                        "position": (i + 1).to_string(),
                        "time": format!("1:3{i}.{number:03}")
                    })
                })
                .collect();
            json!({"number": number.to_string(), "Timings": timings})
        })
        .collect();

    json!({"MRData": {"RaceTable": {"Races": [{
        "raceName": "Test Grand Prix",
        "date": "2024-03-02",
        "Circuit": {"circuitName": "Test Circuit"},
        "Laps": laps
    }]}}})
}

/// Pit-stop document with one race and one stop per driver.
pub fn pit_stop_document(drivers: &[&str]) -> Value {
    let stops: Vec<Value> = drivers
        .iter()
        .map(|driver| {
            json!({
                "driverId": driver,
                "stop": "1",
                "lap": "15",
                "time": "15:22:10",
                "duration": "22.345"
            })
        })
        .collect();

    json!({"MRData": {"RaceTable": {"Races": [{
        "raceName": "Test Grand Prix",
        "date": "2024-03-02",
        "Circuit": {"circuitName": "Test Circuit"},
        "PitStops": stops
    }]}}})
}
