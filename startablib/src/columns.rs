//! Column extraction from converted CSV tables.
//!
//! The converter renders missing measurements as empty fields, so a numeric
//! column read back from its output is a sequence of `Option<f64>`: `None`
//! for an empty cell, `Some` for a parsed value. Anything non-empty that does
//! not parse as a number is an error naming the row, column, and offending
//! text.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::StartabError;
use crate::Result;

/// Read the requested zero-based columns from CSV.
///
/// Returns one vector per requested column, all of equal length. When
/// `skip_header` is set the first line is discarded (the published table
/// leads with a row of column names). Fully blank lines are skipped.
pub fn read_columns<R: BufRead>(
    reader: R,
    columns: &[usize],
    skip_header: bool,
) -> Result<Vec<Vec<Option<f64>>>> {
    let mut out: Vec<Vec<Option<f64>>> = vec![Vec::new(); columns.len()];
    let skip = usize::from(skip_header);

    for (row, line) in reader.lines().enumerate().skip(skip) {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split(',').collect();
        for (slot, &column) in columns.iter().enumerate() {
            let cell = *cells.get(column).ok_or(StartabError::ShortRow {
                row: row + 1,
                column,
                found: cells.len(),
            })?;
            out[slot].push(parse_cell(cell, row + 1, column)?);
        }
    }

    Ok(out)
}

/// Read the requested zero-based columns from a CSV file.
pub fn read_columns_file(
    path: impl AsRef<Path>,
    columns: &[usize],
    skip_header: bool,
) -> Result<Vec<Vec<Option<f64>>>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| StartabError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    read_columns(BufReader::new(file), columns, skip_header)
}

fn parse_cell(cell: &str, row: usize, column: usize) -> Result<Option<f64>> {
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse::<f64>()
        .map(Some)
        .map_err(|_| StartabError::BadCell {
            row,
            column,
            value: cell.to_string(),
        })
}

/// Keep only the rows where every column has a value.
///
/// Moment estimators need complete samples, so rows missing any of the
/// requested measurements are dropped pairwise across all columns.
pub fn complete_cases(columns: &[Vec<Option<f64>>]) -> Vec<Vec<f64>> {
    let rows = columns.first().map_or(0, Vec::len);
    let mut out: Vec<Vec<f64>> = vec![Vec::new(); columns.len()];

    for row in 0..rows {
        if columns.iter().all(|c| c[row].is_some()) {
            for (slot, column) in columns.iter().enumerate() {
                if let Some(value) = column[row] {
                    out[slot].push(value);
                }
            }
        }
    }

    out
}
