use serde_json::Value;

use crate::error::AppError;
use crate::models::RaceKey;
use crate::response::parse_races;
use crate::traits::Fetcher;

/// Resources served by the Ergast-compatible API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    SeasonCalendar { season: i32 },
    Laps(RaceKey),
    PitStops(RaceKey),
}

impl Resource {
    /// Path relative to the API base URL.
    pub fn path(&self) -> String {
        match self {
            Resource::SeasonCalendar { season } => format!("f1/{season}.json"),
            Resource::Laps(key) => format!("f1/{}/{}/laps", key.season(), key.round()),
            Resource::PitStops(key) => format!("f1/{}/{}/pitstops", key.season(), key.round()),
        }
    }
}

/// Fetch a season's calendar and return its round numbers in API order.
pub async fn discover_rounds<F: Fetcher>(fetcher: &F, season: i32) -> Result<Vec<i32>, AppError> {
    let path = Resource::SeasonCalendar { season }.path();
    tracing::info!(%season, %path, "Detecting rounds");
    let calendar = fetcher.fetch(&path).await?;
    parse_rounds(&calendar)
}

/// Extract every race's round number from a calendar document.
///
/// The API sends rounds as strings (`"round": "3"`); plain integers are
/// accepted too. Any other value fails the whole calendar.
pub fn parse_rounds(calendar: &Value) -> Result<Vec<i32>, AppError> {
    parse_races(calendar)?
        .iter()
        .enumerate()
        .map(|(index, race)| match &race.round {
            Some(Value::String(s)) => s.trim().parse::<i32>().map_err(|_| {
                AppError::TransformError(format!("Race {index} has non-integer round '{s}'"))
            }),
            Some(Value::Number(n)) => n
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .ok_or_else(|| {
                    AppError::TransformError(format!("Race {index} has non-integer round {n}"))
                }),
            Some(other) => Err(AppError::TransformError(format!(
                "Race {index} has invalid round {other}"
            ))),
            None => Err(AppError::TransformError(format!(
                "Race {index} has no round"
            ))),
        })
        .collect()
}
