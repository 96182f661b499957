//! Raw ping rows and their conversion into typed [`PositionPing`]s.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::PingError;

/// One stored position record, shaped like the `realtime_subway_positions`
/// table. Every column is optional here; [`parse_ping`] decides what is
/// required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PingRow {
    #[serde(default, deserialize_with = "code")]
    pub line_id: Option<String>,
    #[serde(default)]
    pub station_name: Option<String>,
    #[serde(default)]
    pub train_number: Option<String>,
    #[serde(default, deserialize_with = "code")]
    pub direction_type: Option<String>,
    #[serde(default)]
    pub dest_station_name: Option<String>,
    #[serde(default, deserialize_with = "code")]
    pub train_status: Option<String>,
    #[serde(default, deserialize_with = "code")]
    pub is_express: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Accepts a string, number or boolean column and keeps its string code.
///
/// Providers are inconsistent about quoting `"0"`/`"1"` style codes in JSON.
fn code<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Bool(b)) => Some(if b { "1" } else { "0" }.to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

/// Reported position of a vehicle relative to a station.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PingStatus {
    Approaching,
    Arrived,
    Departed,
    /// Any other provider code, kept verbatim.
    Unknown(String),
}

impl PingStatus {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "0" => PingStatus::Approaching,
            "1" => PingStatus::Arrived,
            "2" => PingStatus::Departed,
            other => PingStatus::Unknown(other.to_string()),
        }
    }

    /// Human-readable label; unknown codes pass through unchanged.
    pub fn label(&self) -> &str {
        match self {
            PingStatus::Approaching => "entering",
            PingStatus::Arrived => "arrived",
            PingStatus::Departed => "departed",
            PingStatus::Unknown(code) => code,
        }
    }
}

/// Travel direction. Code `"0"` is inbound, every other code outbound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Inbound,
    Outbound,
}

impl Direction {
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(str::trim) {
            Some("0") => Direction::Inbound,
            _ => Direction::Outbound,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }
}

/// A validated positional ping.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionPing {
    pub line_id: String,
    pub station_name: String,
    pub vehicle_id: String,
    pub direction: Direction,
    pub status: PingStatus,
    pub destination_station: String,
    pub is_express: bool,
    pub observed_at: DateTime<Utc>,
}

impl PositionPing {
    /// Whether the ping was taken at the vehicle's own destination station.
    pub fn at_destination(&self) -> bool {
        self.station_name == self.destination_station
    }
}

/// Converts a stored row into a [`PositionPing`].
///
/// # Errors
///
/// Returns a [`PingError`] when the line, station, vehicle or timestamp is
/// missing, or when the timestamp cannot be parsed.
pub fn parse_ping(row: PingRow) -> Result<PositionPing, PingError> {
    let line_id = required(row.line_id, "line_id")?;
    let station_name = required(row.station_name, "station_name")?;
    let vehicle_id = required(row.train_number, "train_number")?;
    let created_at = required(row.created_at, "created_at")?;
    let observed_at = parse_observed_at(&created_at)?;

    Ok(PositionPing {
        line_id,
        station_name,
        vehicle_id,
        direction: Direction::from_code(row.direction_type.as_deref()),
        status: PingStatus::from_code(row.train_status.as_deref().unwrap_or_default()),
        destination_station: row.dest_station_name.unwrap_or_default(),
        is_express: row.is_express.as_deref().is_some_and(is_truthy),
        observed_at,
    })
}

fn required(value: Option<String>, field: &'static str) -> Result<String, PingError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(PingError::MissingField(field)),
    }
}

fn is_truthy(flag: &str) -> bool {
    let flag = flag.trim();
    flag == "1" || flag.eq_ignore_ascii_case("true")
}

/// Parses an RFC 3339 timestamp, or a naive one interpreted as UTC.
pub fn parse_observed_at(raw: &str) -> Result<DateTime<Utc>, PingError> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    // PostgREST renders timestamptz with a short offset such as `+00`.
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Ok(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    Err(PingError::BadTimestamp(raw.to_string()))
}
