//! Reconstruction of arrival, departure and terminal events from raw pings.
//!
//! Identity is the composite (line, vehicle, station[, direction]); vehicle
//! numbers alone are not unique across lines.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::parser::{Direction, PingStatus, PositionPing};

/// Key of an arrival. Field order groups arrivals by (line, station, direction).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ArrivalKey {
    pub line_id: String,
    pub station_name: String,
    pub direction: Direction,
    pub vehicle_id: String,
}

impl ArrivalKey {
    fn of(ping: &PositionPing) -> Self {
        ArrivalKey {
            line_id: ping.line_id.clone(),
            station_name: ping.station_name.clone(),
            direction: ping.direction,
            vehicle_id: ping.vehicle_id.clone(),
        }
    }
}

/// A vehicle at a station, regardless of direction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct StopKey {
    pub line_id: String,
    pub vehicle_id: String,
    pub station_name: String,
}

impl StopKey {
    fn of(ping: &PositionPing) -> Self {
        StopKey {
            line_id: ping.line_id.clone(),
            vehicle_id: ping.vehicle_id.clone(),
            station_name: ping.station_name.clone(),
        }
    }
}

/// Earliest arrival and departure per key.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EventIndex {
    pub arrivals: BTreeMap<ArrivalKey, DateTime<Utc>>,
    pub departures: BTreeMap<StopKey, DateTime<Utc>>,
}

pub fn reconstruct(pings: &[PositionPing]) -> EventIndex {
    EventIndex {
        arrivals: arrival_events(pings),
        departures: departure_events(pings),
    }
}

/// Earliest ARRIVED timestamp per (line, station, direction, vehicle).
pub fn arrival_events(pings: &[PositionPing]) -> BTreeMap<ArrivalKey, DateTime<Utc>> {
    earliest(pings, PingStatus::Arrived, ArrivalKey::of)
}

/// Earliest DEPARTED timestamp per (line, vehicle, station).
pub fn departure_events(pings: &[PositionPing]) -> BTreeMap<StopKey, DateTime<Utc>> {
    earliest(pings, PingStatus::Departed, StopKey::of)
}

fn earliest<K: Ord>(
    pings: &[PositionPing],
    status: PingStatus,
    key: impl Fn(&PositionPing) -> K,
) -> BTreeMap<K, DateTime<Utc>> {
    let mut events = BTreeMap::new();
    for ping in pings.iter().filter(|p| p.status == status) {
        match events.entry(key(ping)) {
            Entry::Vacant(e) => {
                e.insert(ping.observed_at);
            }
            Entry::Occupied(mut e) => {
                if ping.observed_at < *e.get() {
                    e.insert(ping.observed_at);
                }
            }
        }
    }
    events
}

/// One closed arrival-to-departure window.
#[derive(Debug, Clone, PartialEq)]
pub struct DwellCandidate {
    pub key: StopKey,
    pub arrived_at: DateTime<Utc>,
    pub departed_at: DateTime<Utc>,
}

/// Pairs ARRIVED and DEPARTED pings in time order.
///
/// The first ARRIVED opens a window for its key and later ARRIVED pings do
/// not move it. A DEPARTED closes the open window; without one it is
/// ignored. Once closed, the next ARRIVED opens a fresh window.
pub fn pair_dwells(pings: &[PositionPing]) -> Vec<DwellCandidate> {
    let mut ordered: Vec<&PositionPing> = pings.iter().collect();
    ordered.sort_by_key(|p| p.observed_at);

    let mut open: BTreeMap<StopKey, DateTime<Utc>> = BTreeMap::new();
    let mut closed = Vec::new();

    for ping in ordered {
        match ping.status {
            PingStatus::Arrived => {
                open.entry(StopKey::of(ping)).or_insert(ping.observed_at);
            }
            PingStatus::Departed => {
                let key = StopKey::of(ping);
                if let Some(arrived_at) = open.remove(&key) {
                    closed.push(DwellCandidate {
                        key,
                        arrived_at,
                        departed_at: ping.observed_at,
                    });
                }
            }
            _ => {}
        }
    }

    closed
}

/// First and last sighting of a vehicle at a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalWindow {
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

/// Observation window per (line, vehicle, station) for pings taken at the
/// vehicle's own destination, whatever their status.
pub fn terminal_windows(pings: &[PositionPing]) -> BTreeMap<StopKey, TerminalWindow> {
    let mut windows: BTreeMap<StopKey, TerminalWindow> = BTreeMap::new();
    for ping in pings.iter().filter(|p| p.at_destination()) {
        let ts = ping.observed_at;
        windows
            .entry(StopKey::of(ping))
            .and_modify(|w| {
                w.first_seen = w.first_seen.min(ts);
                w.last_seen = w.last_seen.max(ts);
            })
            .or_insert(TerminalWindow {
                first_seen: ts,
                last_seen: ts,
            });
    }
    windows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::fixtures::{arrived, at, departed, ping};

    #[test]
    fn test_arrivals_keep_earliest_regardless_of_order() {
        let pings = vec![
            arrived("T1", "S", 50),
            arrived("T1", "S", 10),
            arrived("T1", "S", 30),
        ];
        let arrivals = arrival_events(&pings);
        assert_eq!(arrivals.len(), 1);
        assert_eq!(*arrivals.values().next().unwrap(), at(10));
    }

    #[test]
    fn test_arrivals_split_by_direction() {
        let mut outbound = arrived("T1", "S", 20);
        outbound.direction = Direction::Outbound;
        let pings = vec![arrived("T1", "S", 10), outbound];
        assert_eq!(arrival_events(&pings).len(), 2);
    }

    #[test]
    fn test_unknown_status_is_not_an_event() {
        let pings = vec![
            ping("T1", "S", PingStatus::Unknown("7".to_string()), 0),
            ping("T1", "S", PingStatus::Approaching, 5),
        ];
        let index = reconstruct(&pings);
        assert!(index.arrivals.is_empty());
        assert!(index.departures.is_empty());
        assert!(pair_dwells(&pings).is_empty());
    }

    #[test]
    fn test_departures_keep_earliest() {
        let pings = vec![departed("T1", "S", 40), departed("T1", "S", 20)];
        let departures = departure_events(&pings);
        assert_eq!(*departures.values().next().unwrap(), at(20));
    }

    #[test]
    fn test_pairing_sorts_by_time_first() {
        // Received newest-first, as the source returns them.
        let pings = vec![departed("T3", "S", 42), arrived("T3", "S", 0)];
        let dwells = pair_dwells(&pings);
        assert_eq!(dwells.len(), 1);
        assert_eq!(dwells[0].arrived_at, at(0));
        assert_eq!(dwells[0].departed_at, at(42));
    }

    #[test]
    fn test_repeated_arrival_keeps_first() {
        let pings = vec![
            arrived("T1", "S", 0),
            arrived("T1", "S", 20),
            departed("T1", "S", 60),
        ];
        let dwells = pair_dwells(&pings);
        assert_eq!(dwells.len(), 1);
        assert_eq!(dwells[0].arrived_at, at(0));
    }

    #[test]
    fn test_departure_without_arrival_is_dropped() {
        let pings = vec![departed("T4", "S", 10), arrived("T4", "S", 20)];
        assert!(pair_dwells(&pings).is_empty());
    }

    #[test]
    fn test_arrival_after_departure_reopens_window() {
        let pings = vec![
            arrived("T1", "S", 0),
            departed("T1", "S", 30),
            arrived("T1", "S", 100),
            departed("T1", "S", 145),
        ];
        let dwells = pair_dwells(&pings);
        assert_eq!(dwells.len(), 2);
        assert_eq!(dwells[1].arrived_at, at(100));
        assert_eq!(dwells[1].departed_at, at(145));
    }

    #[test]
    fn test_terminal_windows_only_at_destination() {
        let mut first = ping("T5", "Terminal", PingStatus::Approaching, 0);
        first.destination_station = "Terminal".to_string();
        let last = ping("T5", "Terminal", PingStatus::Departed, 300);
        let mut elsewhere = ping("T5", "Midway", PingStatus::Arrived, 500);
        elsewhere.destination_station = "Terminal".to_string();

        let windows = terminal_windows(&[last, elsewhere, first]);
        assert_eq!(windows.len(), 1);
        let window = windows.values().next().unwrap();
        assert_eq!(window.first_seen, at(0));
        assert_eq!(window.last_seen, at(300));
    }
}
