//! Terminal turnaround: how long a vehicle stays visible at its destination.
//!
//! The wait is the span between the first and last sighting at the terminal,
//! not a true arrival to departure pairing. A vehicle that passes through a
//! station named as its destination mid-route is overcounted.

use crate::analyzers::events::terminal_windows;
use crate::analyzers::types::TurnaroundRecord;
use crate::analyzers::utility::{keep_top, seconds_between};
use crate::snapshot::Snapshot;

pub fn turnaround_waits(snapshot: &Snapshot) -> Vec<TurnaroundRecord> {
    let mut records: Vec<TurnaroundRecord> = terminal_windows(&snapshot.pings)
        .into_iter()
        .map(|(key, window)| TurnaroundRecord {
            line_id: key.line_id,
            station_name: key.station_name,
            vehicle_id: key.vehicle_id,
            wait_seconds: seconds_between(window.first_seen, window.last_seen),
        })
        .collect();

    keep_top(&mut records, |r| r.wait_seconds);
    records
}
