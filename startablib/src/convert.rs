//! Fixed-width table to CSV conversion.
//!
//! This module converts the published fixed-width ASCII data table ("Table E1")
//! into CSV. The input format is whitespace-delimited with a one-byte format
//! marker at the start of the file and `--` tokens standing in for missing
//! measurements. The output maps every token to a comma-delimited field, with
//! missing-value tokens rendered as empty fields.
//!
//! Conversion is a single streaming pass: lines are read, transformed, and
//! written one at a time, and no state is carried between lines. Matching of
//! the missing-value marker is a literal equality check on the token; the
//! published conversion does no validation beyond that, and neither does this
//! one (wrong field counts and non-numeric data pass through untouched).

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::StartabError;
use crate::Result;

/// The token the published table uses for a missing measurement.
pub const MISSING_MARKER: &str = "--";

/// Options for table conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Token denoting a missing value (default `--`)
    pub missing_marker: String,
    /// Emit a trace event per converted line
    pub trace: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            missing_marker: MISSING_MARKER.to_string(),
            trace: false,
        }
    }
}

impl ConvertOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the missing-value marker token.
    pub fn marker(mut self, token: impl Into<String>) -> Self {
        self.missing_marker = token.into();
        self
    }

    /// Enable per-line trace events.
    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.trace = enabled;
        self
    }
}

/// Counters describing a completed conversion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertSummary {
    /// Lines written (equals lines read after the format marker)
    pub lines: u64,
    /// Total fields emitted across all lines
    pub fields: u64,
    /// Fields blanked because they carried the missing-value marker
    pub missing: u64,
}

/// Convert a table file to CSV, writing to `writer`.
///
/// Fails if the path does not exist or cannot be opened; any read or write
/// failure mid-run aborts the conversion with the error.
pub fn convert_file<W: Write>(
    path: impl AsRef<Path>,
    writer: W,
    options: &ConvertOptions,
) -> Result<ConvertSummary> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(StartabError::PathNotFound(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|e| StartabError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    convert_reader(BufReader::new(file), writer, options)
}

/// Convert a table read from `reader` to CSV, writing to `writer`.
///
/// The first byte of the stream is the format marker and is discarded; the
/// remainder of the first line is ordinary data. A stream holding only the
/// marker (or nothing at all) converts to empty output.
///
/// # Example
///
/// ```rust
/// use startablib::{convert_reader, ConvertOptions};
///
/// let table = b"#1 2.5 -- 4\n-- -- --\n";
/// let mut csv = Vec::new();
/// let summary = convert_reader(&table[..], &mut csv, &ConvertOptions::new()).unwrap();
/// assert_eq!(csv, b"1,2.5,,4\n,,\n");
/// assert_eq!(summary.lines, 2);
/// assert_eq!(summary.missing, 4);
/// ```
pub fn convert_reader<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    options: &ConvertOptions,
) -> Result<ConvertSummary> {
    let mut summary = ConvertSummary::default();

    // Discard the one-byte format marker. An empty stream is an empty table.
    let mut marker = [0u8; 1];
    match reader.read_exact(&mut marker) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(summary),
        Err(e) => return Err(StartabError::Io(e)),
    }

    for line in reader.lines() {
        let line = line?;
        let record = convert_line(&line, options, &mut summary);
        if options.trace {
            trace!(line = summary.lines + 1, input = %line, output = %record, "converted");
        }
        writeln!(writer, "{}", record).map_err(StartabError::OutputWrite)?;
        summary.lines += 1;
    }

    Ok(summary)
}

/// Convert one table line to one CSV record.
///
/// Splits on runs of whitespace and joins the tokens with commas, blanking any
/// token equal to the missing-value marker. The field count always equals the
/// token count, so a line of nothing but markers becomes a run of commas.
fn convert_line(line: &str, options: &ConvertOptions, summary: &mut ConvertSummary) -> String {
    let mut record = String::with_capacity(line.len());
    for (i, token) in line.split_whitespace().enumerate() {
        if i > 0 {
            record.push(',');
        }
        if token == options.missing_marker {
            summary.missing += 1;
        } else {
            record.push_str(token);
        }
        summary.fields += 1;
    }
    record
}
