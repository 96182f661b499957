//! Conversion of analyzer records and pre-aggregated view rows into tables.

use serde_json::Value;

use crate::analyzers::types::{
    CongestionSnapshot, DwellRecord, IntervalRecord, Table, TurnaroundRecord,
};
use crate::error::SourceError;
use crate::services::sources::ViewRow;

pub fn interval_table(records: &[IntervalRecord]) -> Table {
    Table::new(
        "1) Interval regularity top 10",
        &["line", "station", "direction", "vehicles", "gap"],
    )
    .with_rows(
        records
            .iter()
            .map(|r| {
                vec![
                    r.line_id.clone(),
                    r.station_name.clone(),
                    r.direction.label().to_string(),
                    format!("{} -> {}", r.vehicle_a, r.vehicle_b),
                    format!("{:.1} min", r.gap_seconds / 60.0),
                ]
            })
            .collect(),
    )
}

pub fn dwell_table(records: &[DwellRecord]) -> Table {
    Table::new(
        "2) Delay hotspots (dwell time) top 10",
        &["line", "station", "vehicle", "dwell"],
    )
    .with_rows(
        records
            .iter()
            .map(|r| {
                vec![
                    r.line_id.clone(),
                    r.station_name.clone(),
                    r.vehicle_id.clone(),
                    format!("{:.1}s", r.dwell_seconds),
                ]
            })
            .collect(),
    )
}

pub fn turnaround_table(records: &[TurnaroundRecord]) -> Table {
    Table::new(
        "3) Terminal turnaround wait top 10",
        &["line", "station", "vehicle", "wait"],
    )
    .with_rows(
        records
            .iter()
            .map(|r| {
                vec![
                    r.line_id.clone(),
                    r.station_name.clone(),
                    r.vehicle_id.clone(),
                    format!("{:.0}s", r.wait_seconds),
                ]
            })
            .collect(),
    )
}

pub fn congestion_table(states: &[CongestionSnapshot]) -> Table {
    Table::new(
        "4) Express vehicles, latest state",
        &["vehicle", "destination", "current station", "status", "service"],
    )
    .with_rows(
        states
            .iter()
            .map(|s| {
                vec![
                    s.vehicle_id.clone(),
                    s.destination.clone(),
                    s.current_station.clone(),
                    s.status_label.clone(),
                    "express".to_string(),
                ]
            })
            .collect(),
    )
}

pub fn interval_view_table(rows: &[ViewRow]) -> Result<Table, SourceError> {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            Ok(vec![
                field(row, "line_id")?,
                field(row, "station_name")?,
                field(row, "train_number")?,
                format!("{}s", field(row, "interval_seconds")?),
            ])
        })
        .collect::<Result<_, SourceError>>()?;

    Ok(Table::new(
        "1) Interval regularity (view)",
        &["line", "station", "vehicle", "gap"],
    )
    .with_rows(rows))
}

pub fn dwell_view_table(rows: &[ViewRow]) -> Result<Table, SourceError> {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            Ok(vec![
                field(row, "station_name")?,
                field(row, "train_number")?,
                format!("{}s", field(row, "dwell_seconds")?),
            ])
        })
        .collect::<Result<_, SourceError>>()?;

    Ok(Table::new(
        "2) Delay hotspots (dwell time) top 10 (view)",
        &["station", "vehicle", "dwell"],
    )
    .with_rows(rows))
}

pub fn turnaround_view_table(rows: &[ViewRow]) -> Result<Table, SourceError> {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| Ok(vec![field(row, "station_name")?, field(row, "train_number")?]))
        .collect::<Result<_, SourceError>>()?;

    Ok(Table::new("3) Terminal turnaround (view)", &["station", "vehicle"]).with_rows(rows))
}

pub fn congestion_view_table(rows: &[ViewRow]) -> Result<Table, SourceError> {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let service = if field(row, "is_express")? == "1" {
                "express"
            } else {
                "local"
            };
            Ok(vec![
                service.to_string(),
                field(row, "train_number")?,
                field(row, "station_name")?,
            ])
        })
        .collect::<Result<_, SourceError>>()?;

    Ok(Table::new(
        "4) Express/local congestion (view)",
        &["service", "vehicle", "location"],
    )
    .with_rows(rows))
}

/// Text of a view column. A missing column fails the whole view.
fn field(row: &ViewRow, name: &str) -> Result<String, SourceError> {
    match row.get(name) {
        None => Err(SourceError::MissingField(name.to_string())),
        Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Bool(b)) => Ok(if *b { "1" } else { "0" }.to_string()),
        Some(other) => Ok(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn view_row(value: Value) -> ViewRow {
        match value {
            Value::Object(map) => map,
            _ => panic!("view rows are objects"),
        }
    }

    #[test]
    fn test_interval_view_rows() {
        let rows = vec![view_row(json!({
            "line_id": "1001",
            "station_name": "Seoul",
            "train_number": "0123",
            "interval_seconds": 180
        }))];
        let table = interval_view_table(&rows).unwrap();
        assert_eq!(table.rows, vec![vec!["1001", "Seoul", "0123", "180s"]]);
    }

    #[test]
    fn test_missing_view_column_is_an_error() {
        let rows = vec![view_row(json!({ "station_name": "Seoul" }))];
        assert!(matches!(
            dwell_view_table(&rows),
            Err(SourceError::MissingField(name)) if name == "train_number"
        ));
    }

    #[test]
    fn test_congestion_view_service_label() {
        let rows = vec![
            view_row(json!({ "is_express": "1", "train_number": "E1", "station_name": "A" })),
            view_row(json!({ "is_express": false, "train_number": "L1", "station_name": "B" })),
        ];
        let table = congestion_view_table(&rows).unwrap();
        assert_eq!(table.rows[0][0], "express");
        assert_eq!(table.rows[1][0], "local");
    }

    #[test]
    fn test_local_tables_match_header_width() {
        let table = interval_table(&[IntervalRecord {
            line_id: "1001".to_string(),
            station_name: "S".to_string(),
            direction: crate::parser::Direction::Outbound,
            vehicle_a: "T1".to_string(),
            vehicle_b: "T2".to_string(),
            gap_seconds: 95.0,
        }]);
        assert_eq!(table.rows[0].len(), table.headers.len());
        assert_eq!(table.rows[0][2], "outbound");
        assert_eq!(table.rows[0][3], "T1 -> T2");
        assert_eq!(table.rows[0][4], "1.6 min");
    }
}
