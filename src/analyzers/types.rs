//! Records produced by the analyzers and the table they render into.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::parser::Direction;

/// Gap between two consecutive arrivals at the same station and direction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalRecord {
    pub line_id: String,
    pub station_name: String,
    pub direction: Direction,
    pub vehicle_a: String,
    pub vehicle_b: String,
    pub gap_seconds: f64,
}

/// Time a vehicle spent between arriving at and departing from a station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DwellRecord {
    pub line_id: String,
    pub station_name: String,
    pub vehicle_id: String,
    pub dwell_seconds: f64,
}

/// Observed window of a vehicle at its terminal station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnaroundRecord {
    pub line_id: String,
    pub station_name: String,
    pub vehicle_id: String,
    pub wait_seconds: f64,
}

/// Latest known state of one express vehicle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CongestionSnapshot {
    pub line_id: String,
    pub vehicle_id: String,
    pub destination: String,
    pub current_station: String,
    pub status_label: String,
    pub observed_at: DateTime<Utc>,
}

/// Display-ready rows for one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(title: &str, headers: &[&str]) -> Self {
        Table {
            title: title.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_rows(mut self, rows: Vec<Vec<String>>) -> Self {
        self.rows = rows;
        self
    }
}
