//! CSV dataset ingestion.
//!
//! Loads delimited files into in-memory [`Record`]s without interpreting
//! them. Every cell comes out as text (or [`RawValue::Null`] for an empty
//! cell); type coercion is the validator's job, so a malformed number in the
//! file becomes a scored `type_mismatch` instead of a load failure.

use std::{fs::File, io::Read, path::Path};

use crate::{
    error::{Error, Result},
    value::{RawValue, Record},
};

/// Load records from a CSV file with a header row.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be opened, or a CSV error for
/// structurally broken input (unbalanced quotes, ragged rows).
pub fn records_from_csv_path(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::io(e, path))?;
    records_from_csv_reader(file)
}

/// Load records from CSV text.
///
/// # Errors
///
/// Returns a CSV error for structurally broken input.
pub fn records_from_csv_str(data: &str) -> Result<Vec<Record>> {
    records_from_csv_reader(data.as_bytes())
}

/// Load records from any CSV reader with a header row.
///
/// Cell values are kept as raw text; empty cells become [`RawValue::Null`].
///
/// # Errors
///
/// Returns a CSV error for structurally broken input.
pub fn records_from_csv_reader(reader: impl Read) -> Result<Vec<Record>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut records = Vec::new();

    for row in csv_reader.records() {
        let row = row?;
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(name, cell)| {
                let value = if cell.is_empty() {
                    RawValue::Null
                } else {
                    RawValue::from(cell)
                };
                (name.to_string(), value)
            })
            .collect();
        records.push(record);
    }

    Ok(records)
}
