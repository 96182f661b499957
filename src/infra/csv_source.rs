//! Ping source backed by a local CSV archive, optionally gzip-compressed.

use async_trait::async_trait;
use flate2::read::GzDecoder;
use serde::Deserialize;
use std::cmp::Reverse;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::SourceError;
use crate::parser::{PingRow, parse_observed_at};
use crate::services::sources::PingSource;

/// Archive line with every column read verbatim.
///
/// The CSV reader guesses numbers for bare digits, which would strip leading
/// zeros from codes such as `0101`; string targets bypass that guess.
#[derive(Debug, Deserialize)]
struct ArchiveRow {
    line_id: Option<String>,
    station_name: Option<String>,
    train_number: Option<String>,
    direction_type: Option<String>,
    dest_station_name: Option<String>,
    train_status: Option<String>,
    is_express: Option<String>,
    created_at: Option<String>,
}

impl From<ArchiveRow> for PingRow {
    fn from(row: ArchiveRow) -> Self {
        PingRow {
            line_id: row.line_id,
            station_name: row.station_name,
            train_number: row.train_number,
            direction_type: row.direction_type,
            dest_station_name: row.dest_station_name,
            train_status: row.train_status,
            is_express: row.is_express,
            created_at: row.created_at,
        }
    }
}

/// Reads pings from a CSV archive such as the output of the `export` command
/// or the collector's daily dumps. Line order is not trusted.
pub struct CsvPingSource {
    path: PathBuf,
}

impl CsvPingSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_rows(&self) -> Result<Vec<PingRow>, SourceError> {
        let file = File::open(&self.path)?;
        let reader: Box<dyn Read> = if is_gzip(&self.path) {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };

        let mut rdr = csv::Reader::from_reader(reader);
        let mut rows = Vec::new();
        for result in rdr.deserialize() {
            let row: ArchiveRow = result?;
            rows.push(PingRow::from(row));
        }
        Ok(rows)
    }
}

pub(crate) fn is_gzip(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("gz")
}

#[async_trait]
impl PingSource for CsvPingSource {
    /// The `limit` most recent rows by `created_at`, newest first.
    ///
    /// Rows with a missing or unparseable timestamp sort last, so the
    /// snapshot still sees and counts them. Equal timestamps keep reverse
    /// file order.
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    async fn query_raw(&self, limit: usize) -> Result<Vec<PingRow>, SourceError> {
        let rows = self.read_rows()?;
        debug!(rows = rows.len(), "Archive read");

        let mut keyed: Vec<_> = rows
            .into_iter()
            .rev()
            .map(|row| {
                let observed_at = row
                    .created_at
                    .as_deref()
                    .and_then(|raw| parse_observed_at(raw).ok());
                (observed_at, row)
            })
            .collect();
        keyed.sort_by_key(|(observed_at, _)| Reverse(*observed_at));

        Ok(keyed
            .into_iter()
            .take(limit)
            .map(|(_, row)| row)
            .collect())
    }
}
