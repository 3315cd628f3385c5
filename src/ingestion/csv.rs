//! CSV ingestion into a raw [`RowSet`].
//!
//! Values are kept as trimmed raw strings; typing is entirely the engine's job.

use std::path::Path;

use crate::error::CollimateResult;
use crate::types::{RawValue, RowSet};

/// Read a CSV file into a [`RowSet`].
///
/// The CSV must have a header row; headers define the column names and order.
pub fn read_rows_from_path(path: impl AsRef<Path>) -> CollimateResult<RowSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    read_rows_from_reader(&mut rdr)
}

/// Read CSV data from an existing CSV reader.
pub fn read_rows_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> CollimateResult<RowSet> {
    let names: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let arity = names.len();

    let mut rows: Vec<Vec<RawValue>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let mut row: Vec<RawValue> = Vec::with_capacity(arity);
        for i in 0..arity {
            // Short records pad with the empty string, which is a null sentinel.
            row.push(RawValue::Text(record.get(i).unwrap_or("").to_string()));
        }
        rows.push(row);
    }

    Ok(RowSet::new(names, rows))
}
