//! Table Ingestion Boundary
//!
//! Reads the two uniform input tables from delimited text files:
//!
//! - **Time-series table**: tail number (optional), timestamp, one or more
//!   numeric metric columns (normalized performance factor, raw fuel flow).
//! - **Event table**: tail number (optional), event date, free-text event
//!   type name.
//!
//! The field separator is auto-detected from the header row across the
//! configured candidates. Source column names are normalized
//! (trim/lowercase/underscores) and then renamed through the configured
//! source-to-canonical maps, so the rest of the pipeline only ever sees
//! canonical names.
//!
//! Shape errors (canonical columns entirely absent) are fatal and abort
//! the run before any analysis happens. Row-level problems (unparsable
//! timestamp, missing metric value) drop or blank the affected field and
//! are reported as counts, never as errors.

mod clean;
mod table;

pub use clean::{flag_plausible_years, remove_duplicates};
pub use table::{csv_split, detect_separator, RawTable};

use crate::config::IngestConfig;
use crate::types::{MaintenanceEvent, SeriesRow};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{} is empty or has no header row", path.display())]
    Empty { path: PathBuf },

    #[error("{table} table is missing canonical column(s): {missing:?}")]
    MissingColumns {
        table: &'static str,
        missing: Vec<String>,
    },
}

// ============================================================================
// Column name handling
// ============================================================================

/// Normalize a source header: trim, lowercase, spaces to underscores.
fn normalize_column(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace(' ', "_")
}

/// Normalize headers and apply the source-to-canonical rename map.
/// Rename keys are normalized the same way, so `"FF Corrected"` in the
/// config matches `ff corrected` in the file.
fn canonical_headers(headers: &[String], renames: &BTreeMap<String, String>) -> Vec<String> {
    let renames: BTreeMap<String, &String> = renames
        .iter()
        .map(|(src, dst)| (normalize_column(src), dst))
        .collect();

    headers
        .iter()
        .map(|h| {
            let norm = normalize_column(h);
            renames.get(&norm).map_or(norm, |dst| (*dst).clone())
        })
        .collect()
}

fn find_column(headers: &[String], candidates: &[&str]) -> Option<usize> {
    candidates
        .iter()
        .find_map(|c| headers.iter().position(|h| h == c))
}

// ============================================================================
// Cell parsing
// ============================================================================

/// Parse a timestamp cell. ISO formats are always tried first; ambiguous
/// slash/dot/dash dates follow the configured day-first convention.
pub fn parse_timestamp(raw: &str, dayfirst: bool) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    const ISO_DATETIME: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    const DAYFIRST_DATETIME: &[&str] = &["%d/%m/%Y %H:%M:%S", "%d/%m/%Y %H:%M", "%d.%m.%Y %H:%M:%S"];
    const MONTHFIRST_DATETIME: &[&str] = &["%m/%d/%Y %H:%M:%S", "%m/%d/%Y %H:%M"];
    const ISO_DATE: &[&str] = &["%Y-%m-%d"];
    const DAYFIRST_DATE: &[&str] = &["%d/%m/%Y", "%d.%m.%Y", "%d-%m-%Y"];
    const MONTHFIRST_DATE: &[&str] = &["%m/%d/%Y", "%m-%d-%Y"];

    let datetime_formats = if dayfirst {
        [ISO_DATETIME, DAYFIRST_DATETIME]
    } else {
        [ISO_DATETIME, MONTHFIRST_DATETIME]
    };
    for fmt in datetime_formats.into_iter().flatten().copied() {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    let date_formats = if dayfirst {
        [ISO_DATE, DAYFIRST_DATE]
    } else {
        [ISO_DATE, MONTHFIRST_DATE]
    };
    for fmt in date_formats.into_iter().flatten().copied() {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Parse a numeric cell. Falls back to comma-as-decimal for
/// European-formatted exports.
pub fn parse_float(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>()
        .ok()
        .or_else(|| s.replace(',', ".").parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn parse_tail(raw: &str) -> Option<String> {
    let s = raw.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

// ============================================================================
// Series table
// ============================================================================

/// Load the time-series table.
///
/// Requires a timestamp column (`timestamp`, or `date` with an optional
/// separate `time` column) and at least one metric column after renaming —
/// anything less is a fatal shape error.
pub fn load_series(path: &Path, config: &IngestConfig) -> Result<Vec<SeriesRow>, IngestError> {
    let raw = table::read_table(path, &config.separators)?;
    let headers = canonical_headers(&raw.headers, &config.series_columns);

    let tail_col = find_column(&headers, &["tail_number", "tail", "aircraft"]);
    let timestamp_col = find_column(&headers, &["timestamp"]);
    let date_col = find_column(&headers, &["date"]);
    let time_col = find_column(&headers, &["time"]);
    let perf_col = find_column(&headers, &["perf_factor"]);
    let fuel_col = find_column(&headers, &["fuel_flow"]);

    let mut missing = Vec::new();
    if timestamp_col.is_none() && date_col.is_none() {
        missing.push("timestamp".to_string());
    }
    if perf_col.is_none() && fuel_col.is_none() {
        missing.push("perf_factor|fuel_flow".to_string());
    }
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns {
            table: "series",
            missing,
        });
    }

    let mut rows = Vec::with_capacity(raw.rows.len());
    let mut dropped_timestamp = 0usize;

    for fields in &raw.rows {
        let cell = |idx: Option<usize>| idx.and_then(|i| fields.get(i)).map_or("", String::as_str);

        // Prefer a ready-made timestamp column; otherwise assemble one from
        // separate date + time columns.
        let ts_text = if timestamp_col.is_some() {
            cell(timestamp_col).to_string()
        } else {
            let time = cell(time_col);
            if time.trim().is_empty() {
                cell(date_col).to_string()
            } else {
                format!("{} {}", cell(date_col).trim(), time.trim())
            }
        };

        let Some(timestamp) = parse_timestamp(&ts_text, config.dayfirst) else {
            dropped_timestamp += 1;
            continue;
        };

        rows.push(SeriesRow::new(
            parse_tail(cell(tail_col)),
            timestamp,
            perf_col.and_then(|i| fields.get(i)).and_then(|c| parse_float(c)),
            fuel_col.and_then(|i| fields.get(i)).and_then(|c| parse_float(c)),
        ));
    }

    if dropped_timestamp > 0 {
        warn!(
            dropped = dropped_timestamp,
            "Series rows dropped for unparsable timestamps"
        );
    }
    info!(
        path = %path.display(),
        rows = rows.len(),
        separator = %raw.separator_name(),
        "Loaded series table"
    );
    Ok(rows)
}

// ============================================================================
// Event table
// ============================================================================

/// Load the maintenance event table.
///
/// The canonical `date` and `event` columns must exist after renaming;
/// their complete absence is a fatal shape error.
pub fn load_events(
    path: &Path,
    config: &IngestConfig,
) -> Result<Vec<MaintenanceEvent>, IngestError> {
    let raw = table::read_table(path, &config.separators)?;
    let headers = canonical_headers(&raw.headers, &config.event_columns);

    let tail_col = find_column(&headers, &["tail_number", "tail", "aircraft"]);
    let date_col = find_column(&headers, &["date", "timestamp"]);
    let event_col = find_column(&headers, &["event"]);

    let mut missing = Vec::new();
    if date_col.is_none() {
        missing.push("date".to_string());
    }
    if event_col.is_none() {
        missing.push("event".to_string());
    }
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns {
            table: "events",
            missing,
        });
    }

    let mut events = Vec::with_capacity(raw.rows.len());
    let mut dropped_date = 0usize;
    let mut dropped_unnamed = 0usize;

    for fields in &raw.rows {
        let cell = |idx: Option<usize>| idx.and_then(|i| fields.get(i)).map_or("", String::as_str);

        let Some(timestamp) = parse_timestamp(cell(date_col), config.dayfirst) else {
            dropped_date += 1;
            continue;
        };
        let event_type = cell(event_col).trim().to_string();
        if event_type.is_empty() {
            dropped_unnamed += 1;
            continue;
        }

        events.push(MaintenanceEvent {
            tail: parse_tail(cell(tail_col)),
            timestamp,
            event_type,
        });
    }

    if dropped_date > 0 {
        warn!(dropped = dropped_date, "Event rows dropped for unparsable dates");
    }
    if dropped_unnamed > 0 {
        debug!(dropped = dropped_unnamed, "Event rows dropped for empty event names");
    }
    info!(path = %path.display(), events = events.len(), "Loaded event table");
    Ok(events)
}
