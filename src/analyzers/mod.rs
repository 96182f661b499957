//! Transit health analysis.
//!
//! Raw pings are reconstructed into arrival, departure and terminal events,
//! from which the interval, dwell, turnaround and express metrics are
//! derived. The [`runner`] prefers server-side views and falls back to
//! these analyzers on a shared snapshot.

pub mod congestion;
pub mod dwell;
pub mod events;
pub mod interval;
pub mod runner;
pub mod tables;
pub mod turnaround;
pub mod types;
pub mod utility;

#[cfg(test)]
mod fixtures;
