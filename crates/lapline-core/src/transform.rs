//! Flattening of nested lap and pit-stop responses into row records.

use serde_json::Value;

use crate::error::AppError;
use crate::models::{LapRecord, PitStopRecord, RaceKey};
use crate::report::{IngestEvent, IngestReporter};
use crate::response::parse_races;

/// Flatten a lap-timing document into one record per (lap, timing) pair.
///
/// With `max_laps = Some(k)` only the first `k` laps of each race are used.
/// Every race entry in the document is processed.
pub fn transform_laps<R: IngestReporter>(
    document: &Value,
    key: RaceKey,
    max_laps: Option<usize>,
    reporter: &R,
) -> Result<Vec<LapRecord>, AppError> {
    let mut records = Vec::new();

    for race in parse_races(document)? {
        let meta = race.meta();
        let mut laps = race.laps();

        if let Some(cap) = max_laps {
            if laps.len() < cap {
                reporter.report(IngestEvent::FewerLapsThanCap {
                    key,
                    found: laps.len(),
                    cap,
                });
            }
            laps = &laps[..laps.len().min(cap)];
        }

        for lap in laps {
            for timing in lap.timings() {
                records.push(LapRecord {
                    lap_number: lap.number.clone(),
                    driver_id: timing.driver_id.clone(),
                    position: timing.position.clone(),
                    time: timing.time.clone(),
                    ..LapRecord::new(key, &meta)
                });
            }
        }
    }

    Ok(records)
}

/// Flatten a pit-stop document into one record per stop.
pub fn transform_pit_stops(document: &Value, key: RaceKey) -> Result<Vec<PitStopRecord>, AppError> {
    let mut records = Vec::new();

    for race in parse_races(document)? {
        let meta = race.meta();
        for stop in race.pit_stops() {
            records.push(PitStopRecord {
                driver_id: stop.driver_id.clone(),
                stop: stop.stop.clone(),
                lap: stop.lap.clone(),
                time: stop.time.clone(),
                duration: stop.duration.clone(),
                ..PitStopRecord::new(key, &meta)
            });
        }
    }

    Ok(records)
}
