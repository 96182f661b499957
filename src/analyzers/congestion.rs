//! Most recent state of every express vehicle.

use std::collections::BTreeMap;

use crate::analyzers::types::CongestionSnapshot;
use crate::analyzers::utility::TOP_N;
use crate::parser::PositionPing;
use crate::snapshot::Snapshot;

/// Latest express ping per (line, vehicle), newest first, at most ten.
///
/// Timestamps are compared explicitly, so input order does not matter.
pub fn express_congestion(snapshot: &Snapshot) -> Vec<CongestionSnapshot> {
    let mut latest: BTreeMap<(&str, &str), &PositionPing> = BTreeMap::new();
    for ping in snapshot.pings.iter().filter(|p| p.is_express) {
        latest
            .entry((ping.line_id.as_str(), ping.vehicle_id.as_str()))
            .and_modify(|seen| {
                if ping.observed_at > seen.observed_at {
                    *seen = ping;
                }
            })
            .or_insert(ping);
    }

    let mut pings: Vec<&PositionPing> = latest.into_values().collect();
    pings.sort_by(|a, b| b.observed_at.cmp(&a.observed_at));

    pings
        .into_iter()
        .take(TOP_N)
        .map(|p| CongestionSnapshot {
            line_id: p.line_id.clone(),
            vehicle_id: p.vehicle_id.clone(),
            destination: p.destination_station.clone(),
            current_station: p.station_name.clone(),
            status_label: p.status.label().to_string(),
            observed_at: p.observed_at,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::fixtures::{at, ping};
    use crate::parser::PingStatus;

    fn express(vehicle: &str, station: &str, status: PingStatus, seconds: i64) -> PositionPing {
        let mut p = ping(vehicle, station, status, seconds);
        p.is_express = true;
        p
    }

    #[test]
    fn test_latest_state_wins_in_any_order() {
        let newer = express("T6", "B", PingStatus::Departed, 20);
        let older = express("T6", "A", PingStatus::Arrived, 10);

        for pings in [
            vec![older.clone(), newer.clone()],
            vec![newer.clone(), older.clone()],
        ] {
            let states = express_congestion(&Snapshot::from_pings(pings));
            assert_eq!(states.len(), 1);
            assert_eq!(states[0].observed_at, at(20));
            assert_eq!(states[0].current_station, "B");
            assert_eq!(states[0].status_label, "departed");
        }
    }

    #[test]
    fn test_local_vehicles_are_excluded() {
        let snapshot = Snapshot::from_pings(vec![ping("L1", "A", PingStatus::Arrived, 10)]);
        assert!(express_congestion(&snapshot).is_empty());
    }

    #[test]
    fn test_labels_and_ordering() {
        let snapshot = Snapshot::from_pings(vec![
            express("E1", "A", PingStatus::Approaching, 5),
            express("E2", "B", PingStatus::Unknown("3".to_string()), 50),
        ]);
        let states = express_congestion(&snapshot);
        assert_eq!(states[0].vehicle_id, "E2");
        assert_eq!(states[0].status_label, "3");
        assert_eq!(states[1].status_label, "entering");
    }
}
