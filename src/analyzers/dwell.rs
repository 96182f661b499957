//! Station dwell time from paired arrival and departure pings.

use crate::analyzers::events::pair_dwells;
use crate::analyzers::types::DwellRecord;
use crate::analyzers::utility::{keep_top, seconds_between};
use crate::snapshot::Snapshot;

/// Dwells of an hour or more are treated as instrumentation artifacts.
pub const MAX_DWELL_SECONDS: f64 = 3600.0;

/// Longest dwells in the snapshot, at most ten.
pub fn dwell_times(snapshot: &Snapshot) -> Vec<DwellRecord> {
    let mut records: Vec<DwellRecord> = pair_dwells(&snapshot.pings)
        .into_iter()
        .filter_map(|c| {
            let dwell_seconds = seconds_between(c.arrived_at, c.departed_at);
            (dwell_seconds > 0.0 && dwell_seconds < MAX_DWELL_SECONDS).then(|| DwellRecord {
                line_id: c.key.line_id,
                station_name: c.key.station_name,
                vehicle_id: c.key.vehicle_id,
                dwell_seconds,
            })
        })
        .collect();

    keep_top(&mut records, |r| r.dwell_seconds);
    records
}
