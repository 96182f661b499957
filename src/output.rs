//! Output formatting for analysis reports and ping archives.
//!
//! Supports fixed-width text tables, JSON serialization, and CSV export.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::runner::Section;
use crate::infra::csv_source::is_gzip;
use crate::parser::PingRow;

const DELIMITER: &str = " | ";
const SEPARATOR: &str = "-+-";
pub const NO_DATA: &str = "(no data)";

/// Terminal columns a string occupies. Anything outside printable ASCII is
/// counted as a double-width glyph.
pub fn visual_width(s: &str) -> usize {
    s.chars()
        .map(|c| if (' '..='~').contains(&c) { 1 } else { 2 })
        .sum()
}

fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(visual_width(s));
    format!("{s}{}", " ".repeat(fill))
}

/// Formats rows into a fixed-width table under a `[title]` line.
///
/// Every row is rendered with exactly as many cells as there are headers.
/// An empty `rows` renders a single "no data" line.
pub fn render_table<S: AsRef<str>>(title: &str, headers: &[S], rows: &[Vec<String>]) -> String {
    let mut out = format!("\n[{title}]\n");
    if rows.is_empty() {
        out.push_str(&format!("  {NO_DATA}\n"));
        return out;
    }

    let headers: Vec<&str> = headers.iter().map(AsRef::as_ref).collect();
    let rows: Vec<Vec<&str>> = rows
        .iter()
        .map(|row| {
            (0..headers.len())
                .map(|i| row.get(i).map_or("", String::as_str))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| visual_width(h)).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(visual_width(cell));
        }
    }

    let line = |cells: &[&str]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| pad(cell, *width))
            .collect::<Vec<_>>()
            .join(DELIMITER)
    };

    out.push_str(&line(headers.as_slice()));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join(SEPARATOR),
    );
    out.push('\n');
    for row in &rows {
        out.push_str(&line(row.as_slice()));
        out.push('\n');
    }
    out
}

fn write_rows<W: Write>(sink: W, rows: &[PingRow]) -> Result<W> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(sink);
    // Sources return newest first; archives are appended oldest first.
    for row in rows.iter().rev() {
        writer.serialize(row)?;
    }
    writer.flush()?;
    writer.into_inner().map_err(|e| anyhow::anyhow!("failed to flush archive: {}", e.error()))
}

/// Renders every section in order.
pub fn render_report(sections: &[Section]) -> String {
    sections
        .iter()
        .map(|s| render_table(&s.table.title, s.table.headers.as_slice(), &s.table.rows))
        .collect()
}

/// Serializes the report as pretty-printed JSON.
pub fn to_json(sections: &[Section]) -> Result<String> {
    Ok(serde_json::to_string_pretty(sections)?)
}

/// Writes ping rows oldest-first as a CSV archive, gzip-compressed when the
/// path ends in `.gz`.
pub fn write_snapshot_csv(path: &Path, rows: &[PingRow]) -> Result<()> {
    debug!(path = %path.display(), rows = rows.len(), "Writing ping archive");

    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    if is_gzip(path) {
        write_rows(GzEncoder::new(file, Compression::default()), rows)?.finish()?;
    } else {
        write_rows(file, rows)?;
    }

    info!(path = %path.display(), rows = rows.len(), "Ping archive written");
    Ok(())
}
