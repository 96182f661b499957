//! Schedule regularity: gaps between consecutive arrivals.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::analyzers::events::arrival_events;
use crate::analyzers::types::IntervalRecord;
use crate::analyzers::utility::{TOP_N, seconds_between};
use crate::parser::Direction;
use crate::snapshot::Snapshot;

/// Gaps at or below this are duplicate or overlapping pings, not headways.
pub const MIN_GAP_SECONDS: f64 = 30.0;

type GroupKey = (String, String, Direction);

/// Gaps between consecutive arrivals per (line, station, direction).
///
/// Busiest groups are visited first; at most [`TOP_N`] records are returned.
pub fn interval_regularity(snapshot: &Snapshot) -> Vec<IntervalRecord> {
    let mut groups: BTreeMap<GroupKey, Vec<(String, DateTime<Utc>)>> = BTreeMap::new();
    for (key, arrived_at) in arrival_events(&snapshot.pings) {
        groups
            .entry((key.line_id, key.station_name, key.direction))
            .or_default()
            .push((key.vehicle_id, arrived_at));
    }

    let mut ranked: Vec<_> = groups.into_iter().collect();
    ranked.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

    let mut records = Vec::new();
    for ((line_id, station_name, direction), mut arrivals) in ranked {
        arrivals.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

        for pair in arrivals.windows(2) {
            let (vehicle_a, time_a) = &pair[0];
            let (vehicle_b, time_b) = &pair[1];
            let gap_seconds = seconds_between(*time_a, *time_b);
            if gap_seconds <= MIN_GAP_SECONDS {
                continue;
            }

            records.push(IntervalRecord {
                line_id: line_id.clone(),
                station_name: station_name.clone(),
                direction,
                vehicle_a: vehicle_a.clone(),
                vehicle_b: vehicle_b.clone(),
                gap_seconds,
            });
            if records.len() == TOP_N {
                return records;
            }
        }
    }

    records
}
