//! Schema-tolerant view of the Ergast `MRData` response envelope.
//!
//! Every field is optional. A missing key, or an explicit `null`, becomes
//! `None` (or an empty list) instead of an error. Scalar leaves are read as
//! text whatever their JSON type. Only a document whose structure contradicts
//! the envelope, such as `Races` holding a string, fails to parse.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::AppError;
use crate::models::RaceMeta;

#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(rename = "MRData", default)]
    mr_data: Option<MrData>,
}

#[derive(Debug, Default, Deserialize)]
struct MrData {
    #[serde(rename = "RaceTable", default)]
    race_table: Option<RaceTable>,
}

#[derive(Debug, Default, Deserialize)]
struct RaceTable {
    #[serde(rename = "Races", default)]
    races: Option<Vec<Race>>,
}

/// One entry of `MRData.RaceTable.Races`.
#[derive(Debug, Default, Deserialize)]
pub struct Race {
    #[serde(default)]
    pub round: Option<Value>,
    #[serde(rename = "raceName", default, deserialize_with = "lenient_string")]
    pub race_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(rename = "Circuit", default)]
    pub circuit: Option<Circuit>,
    #[serde(rename = "Laps", default)]
    pub laps: Option<Vec<Lap>>,
    #[serde(rename = "PitStops", default)]
    pub pit_stops: Option<Vec<PitStop>>,
}

impl Race {
    pub fn meta(&self) -> RaceMeta {
        RaceMeta {
            race_name: self.race_name.clone(),
            circuit: self
                .circuit
                .as_ref()
                .and_then(|c| c.circuit_name.clone()),
            date: self.date.clone(),
        }
    }

    pub fn laps(&self) -> &[Lap] {
        self.laps.as_deref().unwrap_or_default()
    }

    pub fn pit_stops(&self) -> &[PitStop] {
        self.pit_stops.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Circuit {
    #[serde(rename = "circuitName", default, deserialize_with = "lenient_string")]
    pub circuit_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Lap {
    #[serde(default, deserialize_with = "lenient_string")]
    pub number: Option<String>,
    #[serde(rename = "Timings", default)]
    pub timings: Option<Vec<Timing>>,
}

impl Lap {
    pub fn timings(&self) -> &[Timing] {
        self.timings.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Timing {
    #[serde(rename = "driverId", default, deserialize_with = "lenient_string")]
    pub driver_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub position: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub time: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PitStop {
    #[serde(rename = "driverId", default, deserialize_with = "lenient_string")]
    pub driver_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub stop: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lap: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub duration: Option<String>,
}

/// Read a scalar leaf as text. Numbers and booleans are rendered as strings;
/// `null`, arrays and objects become `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Parse the race list out of a response document.
pub fn parse_races(document: &Value) -> Result<Vec<Race>, AppError> {
    let envelope = Envelope::deserialize(document)
        .map_err(|e| AppError::TransformError(format!("Unexpected response shape: {e}")))?;

    Ok(envelope
        .mr_data
        .and_then(|d| d.race_table)
        .and_then(|t| t.races)
        .unwrap_or_default())
}
