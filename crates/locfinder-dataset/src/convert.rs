//! Spreadsheet export (CSV) to the JSON record array the loader reads.
//!
//! Every column is kept under its header name, one object per row. Empty
//! cells become `null`. Coordinate columns become JSON numbers when they
//! parse; everything else stays text so postal codes keep leading zeros.

use std::path::Path;

use serde_json::{Map, Number, Value};

use crate::error::DatasetError;

/// Header names written as numbers when the cell parses as one.
const COORDINATE_COLUMNS: [&str; 7] = [
    "Latitude",
    "Longitude",
    "latitude",
    "longitude",
    "lat",
    "lon",
    "lng",
];

/// Parse CSV text with a header row into JSON record objects.
///
/// # Errors
///
/// Returns [`DatasetError::Csv`] for malformed CSV, including rows whose
/// field count differs from the header.
pub fn csv_to_records(input: &[u8], context: &str) -> Result<Vec<Value>, DatasetError> {
    let csv_error = |source| DatasetError::Csv {
        context: context.to_string(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);
    let headers = reader.headers().map_err(csv_error)?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(csv_error)?;
        let object: Map<String, Value> = headers
            .iter()
            .zip(row.iter())
            .map(|(header, cell)| (header.to_string(), cell_value(header, cell)))
            .collect();
        records.push(Value::Object(object));
    }
    Ok(records)
}

fn cell_value(header: &str, cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if COORDINATE_COLUMNS.contains(&header) {
        if let Some(number) = cell.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(number);
        }
    }
    Value::String(cell.to_string())
}

/// Convert the CSV file at `input` into a JSON dataset at `output`.
///
/// Returns the number of records written.
///
/// # Errors
///
/// - [`DatasetError::Io`]: `input` cannot be read.
/// - [`DatasetError::Csv`]: `input` is not well-formed CSV.
/// - [`DatasetError::Write`]: `output` cannot be written.
pub async fn convert_csv_file(input: &Path, output: &Path) -> Result<usize, DatasetError> {
    let raw = tokio::fs::read(input)
        .await
        .map_err(|e| DatasetError::Io {
            path: input.display().to_string(),
            source: e,
        })?;
    let records = csv_to_records(&raw, &input.display().to_string())?;

    let body = serde_json::to_vec_pretty(&records).map_err(|e| DatasetError::Encode {
        context: output.display().to_string(),
        source: e,
    })?;
    tokio::fs::write(output, body)
        .await
        .map_err(|e| DatasetError::Write {
            path: output.display().to_string(),
            source: e,
        })?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        records = records.len(),
        "csv dataset converted"
    );
    Ok(records.len())
}
