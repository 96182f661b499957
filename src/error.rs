//! Error types shared by the sources and the ping parser.

/// Failure of a ping or view source.
///
/// Every variant is recoverable from the runner's point of view: a failed
/// view triggers local analysis, a failed ping query yields an empty snapshot.
#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Source returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to decode source response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Failed to read archive: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse CSV archive: {0}")]
    Csv(#[from] csv::Error),
    #[error("Row is missing field `{0}`")]
    MissingField(String),
    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

/// Why a single raw row could not become a ping.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PingError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("unparseable timestamp `{0}`")]
    BadTimestamp(String),
}
