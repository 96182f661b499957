use tracing::{info, warn};

use crate::parser::{PingRow, PositionPing, parse_ping};
use crate::services::sources::PingSource;

/// A frozen batch of pings shared read-only by every analyzer in a run.
#[derive(Debug, Default, Clone)]
pub struct Snapshot {
    pub pings: Vec<PositionPing>,
    /// Rows that failed to parse and were left out.
    pub dropped: usize,
}

impl Snapshot {
    /// Parses every row, dropping and counting the malformed ones.
    pub fn from_rows(rows: Vec<PingRow>) -> Self {
        let mut s = Snapshot {
            pings: Vec::with_capacity(rows.len()),
            dropped: 0,
        };

        for row in rows {
            match parse_ping(row) {
                Ok(ping) => s.pings.push(ping),
                Err(e) => {
                    s.dropped += 1;
                    warn!(error = %e, "Dropping malformed ping");
                }
            }
        }

        s
    }

    pub fn from_pings(pings: Vec<PositionPing>) -> Self {
        Snapshot { pings, dropped: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.pings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pings.len()
    }
}

/// Fetches one snapshot from a [`PingSource`] and hands out the same one for
/// the rest of its lifetime.
pub struct PingSnapshotCache {
    source: Box<dyn PingSource>,
    snapshot: Option<Snapshot>,
}

impl PingSnapshotCache {
    pub fn new(source: Box<dyn PingSource>) -> Self {
        Self {
            source,
            snapshot: None,
        }
    }

    /// Returns the cached snapshot, fetching up to `limit` rows on first use.
    ///
    /// Later calls ignore `limit`. A failed fetch is cached as an empty
    /// snapshot.
    #[tracing::instrument(skip(self))]
    pub async fn snapshot(&mut self, limit: usize) -> &Snapshot {
        if self.snapshot.is_none() {
            let snapshot = match self.source.query_raw(limit).await {
                Ok(rows) => {
                    let snapshot = Snapshot::from_rows(rows);
                    info!(
                        pings = snapshot.len(),
                        dropped = snapshot.dropped,
                        "Loaded ping snapshot for local analysis"
                    );
                    snapshot
                }
                Err(e) => {
                    warn!(error = %e, "Ping snapshot fetch failed, continuing without data");
                    Snapshot::default()
                }
            };
            self.snapshot = Some(snapshot);
        }

        self.snapshot.get_or_insert_with(Snapshot::default)
    }
}
