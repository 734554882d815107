//! Delimited-text table reading with separator auto-detection.
//!
//! The separator is chosen by splitting the header row with each
//! configured candidate and keeping the one that yields the most fields
//! (first candidate wins ties). Rows whose field count disagrees with the
//! header are skipped and counted, not padded.

use super::IngestError;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// A parsed delimited file: header names plus raw string rows.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub separator: char,
}

impl RawTable {
    /// Printable separator for log lines ("\t" instead of a raw tab).
    pub fn separator_name(&self) -> String {
        match self.separator {
            '\t' => "\\t".to_string(),
            c => c.to_string(),
        }
    }
}

/// Split a delimited line respecting quoted fields (handles separators and
/// escaped quotes inside quotes). Returns owned strings because quoted
/// fields need unquoting.
pub fn csv_split(line: &str, separator: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    // Check for escaped quote ("")
                    if chars.peek() == Some(&'"') {
                        current.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            c if c == separator && !in_quotes => {
                fields.push(current.clone());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

/// Pick the candidate separator that yields the most header fields.
pub fn detect_separator(header: &str, candidates: &[String]) -> char {
    let mut best = (',', 1usize);
    for candidate in candidates {
        let Some(sep) = candidate.chars().next() else {
            continue;
        };
        let count = csv_split(header, sep).len();
        if count > best.1 {
            best = (sep, count);
        }
    }
    best.0
}

/// Read a delimited file into headers + rows.
pub fn read_table(path: &Path, separators: &[String]) -> Result<RawTable, IngestError> {
    let file = std::fs::File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut lines = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }

    let Some((header_line, data_lines)) = lines.split_first() else {
        return Err(IngestError::Empty {
            path: path.to_path_buf(),
        });
    };

    let separator = detect_separator(header_line, separators);
    let headers: Vec<String> = csv_split(header_line, separator)
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::with_capacity(data_lines.len());
    let mut skipped_ragged = 0usize;

    for line in data_lines {
        let fields = csv_split(line, separator);
        if fields.len() == headers.len() {
            rows.push(fields);
        } else {
            skipped_ragged += 1;
        }
    }

    if skipped_ragged > 0 {
        warn!(
            path = %path.display(),
            skipped = skipped_ragged,
            "Rows skipped for mismatched field counts"
        );
    }
    debug!(
        path = %path.display(),
        columns = headers.len(),
        rows = rows.len(),
        "Parsed delimited table"
    );

    Ok(RawTable {
        headers,
        rows,
        separator,
    })
}
