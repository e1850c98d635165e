//! Decoding of the JSON dataset into [`Location`] records.

use locfinder_core::{Location, LocationRecord};
use serde_json::Value;

use crate::error::DatasetError;

/// Locations decoded from a dataset body, plus how many records were dropped.
#[derive(Debug, Clone, Default)]
pub struct DecodedDataset {
    pub locations: Vec<Location>,
    /// Records without usable coordinates.
    pub skipped: usize,
}

/// Decode a dataset body: a JSON array of location records.
///
/// Records that are not objects, or that lack finite coordinates, are skipped
/// and counted rather than failing the whole load.
///
/// # Errors
///
/// - [`DatasetError::Decode`]: the body is not valid JSON.
/// - [`DatasetError::NotAnArray`]: the top-level value is not an array.
pub fn decode_locations(body: &str, context: &str) -> Result<DecodedDataset, DatasetError> {
    let value: Value = serde_json::from_str(body).map_err(|e| DatasetError::Decode {
        context: context.to_string(),
        source: e,
    })?;
    let Value::Array(items) = value else {
        return Err(DatasetError::NotAnArray {
            context: context.to_string(),
        });
    };

    let mut decoded = DecodedDataset::default();
    for (index, item) in items.into_iter().enumerate() {
        let location = serde_json::from_value::<LocationRecord>(item)
            .ok()
            .and_then(LocationRecord::into_location);
        if let Some(location) = location {
            decoded.locations.push(location);
        } else {
            tracing::warn!(index, context, "skipping dataset record without usable coordinates");
            decoded.skipped += 1;
        }
    }

    tracing::info!(
        context,
        loaded = decoded.locations.len(),
        skipped = decoded.skipped,
        "dataset decoded"
    );
    Ok(decoded)
}
