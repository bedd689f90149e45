use std::fmt;

use crate::table::{CellValue, Column, ColumnType, TableRecord};

/// Identifies one race event within a season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct RaceKey {
    season: i32,
    round: i32,
}

impl RaceKey {
    pub const fn new(season: i32, round: i32) -> Self {
        Self { season, round }
    }

    pub const fn season(&self) -> i32 {
        self.season
    }

    pub const fn round(&self) -> i32 {
        self.round
    }

    /// Composite identifier `"{season}_{round}"`.
    pub fn race_id(&self) -> String {
        format!("{}_{}", self.season, self.round)
    }
}

impl fmt::Display for RaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "season {} round {}", self.season, self.round)
    }
}

/// Descriptive attributes of a race, copied onto every record derived from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct RaceMeta {
    pub race_name: Option<String>,
    pub circuit: Option<String>,
    pub date: Option<String>,
}

/// One timing entry of one driver on one lap.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LapRecord {
    pub race_id: String,
    pub season: i32,
    pub round: i32,
    pub race_name: Option<String>,
    pub circuit: Option<String>,
    pub date: Option<String>,
    pub lap_number: Option<String>,
    pub driver_id: Option<String>,
    pub position: Option<String>,
    pub time: Option<String>,
}

impl LapRecord {
    pub fn new(key: RaceKey, meta: &RaceMeta) -> Self {
        Self {
            race_id: key.race_id(),
            season: key.season(),
            round: key.round(),
            race_name: meta.race_name.clone(),
            circuit: meta.circuit.clone(),
            date: meta.date.clone(),
            lap_number: None,
            driver_id: None,
            position: None,
            time: None,
        }
    }
}

/// One pit-stop event.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PitStopRecord {
    pub race_id: String,
    pub season: i32,
    pub round: i32,
    pub race_name: Option<String>,
    pub circuit: Option<String>,
    pub date: Option<String>,
    pub driver_id: Option<String>,
    pub stop: Option<String>,
    pub lap: Option<String>,
    pub time: Option<String>,
    pub duration: Option<String>,
}

impl PitStopRecord {
    pub fn new(key: RaceKey, meta: &RaceMeta) -> Self {
        Self {
            race_id: key.race_id(),
            season: key.season(),
            round: key.round(),
            race_name: meta.race_name.clone(),
            circuit: meta.circuit.clone(),
            date: meta.date.clone(),
            driver_id: None,
            stop: None,
            lap: None,
            time: None,
            duration: None,
        }
    }
}

/// Records produced by a single round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RaceRecords {
    pub laps: Vec<LapRecord>,
    pub pit_stops: Vec<PitStopRecord>,
}

/// Records aggregated over every surviving round of a season.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonResult {
    pub season: i32,
    pub laps: Vec<LapRecord>,
    pub pit_stops: Vec<PitStopRecord>,
}

impl SeasonResult {
    pub fn new(season: i32) -> Self {
        Self {
            season,
            laps: Vec::new(),
            pit_stops: Vec::new(),
        }
    }

    /// Append one round's records. A round contributes all of its rows or none.
    pub fn append(&mut self, race: RaceRecords) {
        self.laps.extend(race.laps);
        self.pit_stops.extend(race.pit_stops);
    }
}

/// Row counts handed to the loader by a complete run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub lap_rows: usize,
    pub pit_stop_rows: usize,
}

// ---------------------------------------------------------------------------
// Tabular shape
// ---------------------------------------------------------------------------

const LAP_COLUMNS: &[Column] = &[
    Column::new("race_id", ColumnType::Text),
    Column::new("season", ColumnType::BigInt),
    Column::new("round", ColumnType::BigInt),
    Column::new("race_name", ColumnType::Text),
    Column::new("circuit", ColumnType::Text),
    Column::new("date", ColumnType::Text),
    Column::new("lap_number", ColumnType::Text),
    Column::new("driver_id", ColumnType::Text),
    Column::new("position", ColumnType::Text),
    Column::new("time", ColumnType::Text),
];

const PIT_STOP_COLUMNS: &[Column] = &[
    Column::new("race_id", ColumnType::Text),
    Column::new("season", ColumnType::BigInt),
    Column::new("round", ColumnType::BigInt),
    Column::new("race_name", ColumnType::Text),
    Column::new("circuit", ColumnType::Text),
    Column::new("date", ColumnType::Text),
    Column::new("driver_id", ColumnType::Text),
    Column::new("stop", ColumnType::Text),
    Column::new("lap", ColumnType::Text),
    Column::new("time", ColumnType::Text),
    Column::new("duration", ColumnType::Text),
];

impl TableRecord for LapRecord {
    fn columns() -> &'static [Column] {
        LAP_COLUMNS
    }

    fn values(&self) -> Vec<CellValue> {
        vec![
            CellValue::Text(Some(self.race_id.clone())),
            CellValue::BigInt(self.season.into()),
            CellValue::BigInt(self.round.into()),
            CellValue::Text(self.race_name.clone()),
            CellValue::Text(self.circuit.clone()),
            CellValue::Text(self.date.clone()),
            CellValue::Text(self.lap_number.clone()),
            CellValue::Text(self.driver_id.clone()),
            CellValue::Text(self.position.clone()),
            CellValue::Text(self.time.clone()),
        ]
    }
}

impl TableRecord for PitStopRecord {
    fn columns() -> &'static [Column] {
        PIT_STOP_COLUMNS
    }

    fn values(&self) -> Vec<CellValue> {
        vec![
            CellValue::Text(Some(self.race_id.clone())),
            CellValue::BigInt(self.season.into()),
            CellValue::BigInt(self.round.into()),
            CellValue::Text(self.race_name.clone()),
            CellValue::Text(self.circuit.clone()),
            CellValue::Text(self.date.clone()),
            CellValue::Text(self.driver_id.clone()),
            CellValue::Text(self.stop.clone()),
            CellValue::Text(self.lap.clone()),
            CellValue::Text(self.time.clone()),
            CellValue::Text(self.duration.clone()),
        ]
    }
}
