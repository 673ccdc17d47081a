//! Line-oriented conversions files.
//!
//! One conversion per line, three whitespace-separated fields:
//!
//! ```text
//! # from  to   operations
//! °C      °F   *9/5+32
//! K       °F   -273.15*9/5+32
//! m       ft   *3.28084
//! ```
//!
//! Blank lines and lines whose first non-blank character is `#` are skipped.
//! Unit identifiers containing whitespace cannot be written in this format.

use thiserror::Error;

use crate::conversion::{ConversionError, ConversionRecord};
use crate::graph::{ConversionGraph, PopulateOutcome};

/// A problem with one line of a conversions file. `line` is 1-based.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("line {line}: {kind}")]
pub struct ListingError {
    pub line: usize,
    pub kind: ListingErrorKind,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ListingErrorKind {
    #[error("expected `<from> <to> <operations>`, found {0} field(s)")]
    FieldCount(usize),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("a conversion between {0} and {1} is already defined")]
    Duplicate(String, String),
}

/// A record read from a conversions file, with the line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub line: usize,
    pub record: ConversionRecord,
}

/// Split a conversions file into records. Malformed lines become errors in
/// place; the other lines are still returned.
pub fn parse_listing(text: &str) -> Vec<Result<ListingEntry, ListingError>> {
    text.lines()
        .enumerate()
        .filter_map(|(i, raw)| {
            let line = i + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                return None;
            }
            let fields: Vec<&str> = trimmed.split_whitespace().collect();
            Some(match fields.as_slice() {
                [from, to, operations] => Ok(ListingEntry {
                    line,
                    record: ConversionRecord::new(*from, *to, *operations),
                }),
                other => Err(ListingError {
                    line,
                    kind: ListingErrorKind::FieldCount(other.len()),
                }),
            })
        })
        .collect()
}

/// Add every well-formed line of `text` to `graph`, in file order.
///
/// Returns the lines that could not be added; an empty vector means the
/// whole file loaded.
pub fn load_listing(graph: &mut ConversionGraph, text: &str) -> Vec<ListingError> {
    let mut errors = Vec::new();
    let mut entries = Vec::new();
    for parsed in parse_listing(text) {
        match parsed {
            Ok(entry) => entries.push(entry),
            Err(e) => errors.push(e),
        }
    }

    let outcomes = graph.populate(entries.iter().map(|e| e.record.clone()));
    for (entry, outcome) in entries.into_iter().zip(outcomes) {
        let kind = match outcome {
            PopulateOutcome::Added => continue,
            PopulateOutcome::Duplicate => {
                ListingErrorKind::Duplicate(entry.record.from, entry.record.to)
            }
            PopulateOutcome::Rejected(e) => ListingErrorKind::Conversion(e),
        };
        errors.push(ListingError {
            line: entry.line,
            kind,
        });
    }

    errors.sort_by_key(|e| e.line);
    errors
}

/// Write `graph` back out as a conversions file, one edge per line in
/// storage order.
pub fn write_listing(graph: &ConversionGraph) -> String {
    graph.iter().map(|c| format!("{c}\n")).collect()
}

// --- tests -------------------------------------------------------------------
