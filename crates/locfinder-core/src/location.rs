//! Domain types for geocoded locations and search results.

use serde::Deserialize;
use serde_json::Value;

/// Placeholder shown wherever an optional text field is absent.
pub const MISSING_FIELD: &str = "N/A";

/// A geocoded location loaded from the dataset. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    /// Exact-match search key.
    pub postal_code: Option<String>,
    pub locality: Option<String>,
    pub province: Option<String>,
}

impl Location {
    #[must_use]
    pub fn address_or_missing(&self) -> &str {
        self.address.as_deref().unwrap_or(MISSING_FIELD)
    }

    #[must_use]
    pub fn postal_code_or_missing(&self) -> &str {
        self.postal_code.as_deref().unwrap_or(MISSING_FIELD)
    }

    #[must_use]
    pub fn locality_or_missing(&self) -> &str {
        self.locality.as_deref().unwrap_or(MISSING_FIELD)
    }

    #[must_use]
    pub fn province_or_missing(&self) -> &str {
        self.province.as_deref().unwrap_or(MISSING_FIELD)
    }
}

/// A transient origin for a distance search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl QueryPoint {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A [`Location`] paired with its distance from the query point.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub location: Location,
    pub distance_km: f64,
}

/// One raw record of the dataset as it appears on the wire.
///
/// Accepts both the spreadsheet export column names (`Latitude`, `Direccion`,
/// `CP`, ...) and their English equivalents. Values are kept as loose JSON so
/// that numeric postal codes and stringly-typed coordinates still decode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationRecord {
    #[serde(default, alias = "Latitude", alias = "lat")]
    pub latitude: Value,
    #[serde(default, alias = "Longitude", alias = "lon", alias = "lng")]
    pub longitude: Value,
    #[serde(default, alias = "Direccion")]
    pub address: Value,
    #[serde(default, alias = "CP", alias = "postalCode")]
    pub postal_code: Value,
    #[serde(default, alias = "LOCALIDAD")]
    pub locality: Value,
    #[serde(default, alias = "PROVINCIA")]
    pub province: Value,
}

impl LocationRecord {
    /// Normalize the record into a [`Location`].
    ///
    /// Returns `None` when either coordinate is missing or not a finite number,
    /// since such a record cannot be placed on the map.
    #[must_use]
    pub fn into_location(self) -> Option<Location> {
        let latitude = coordinate(&self.latitude)?;
        let longitude = coordinate(&self.longitude)?;
        Some(Location {
            latitude,
            longitude,
            address: text(&self.address),
            postal_code: text(&self.postal_code),
            locality: text(&self.locality),
            province: text(&self.province),
        })
    }
}

fn coordinate(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

/// Trimmed text for strings, decimal text for numbers, `None` for anything
/// empty or non-scalar.
fn text(value: &Value) -> Option<String> {
    let raw = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                match n.as_f64() {
                    // Spreadsheet exports turn integer columns with gaps into floats.
                    #[allow(clippy::float_cmp)]
                    Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{f:.0}"),
                    Some(f) => f.to_string(),
                    None => return None,
                }
            }
        }
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    (!raw.is_empty()).then_some(raw)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: serde_json::Value) -> LocationRecord {
        serde_json::from_value(value).expect("record should deserialize")
    }

    #[test]
    fn decodes_spreadsheet_column_names() {
        let loc = record(json!({
            "Latitude": -34.6037,
            "Longitude": -58.3816,
            "Direccion": "Av. Corrientes 1234",
            "CP": "C1043",
            "LOCALIDAD": "CABA",
            "PROVINCIA": "Buenos Aires"
        }))
        .into_location()
        .expect("coordinates present");

        assert_eq!(loc.latitude, -34.6037);
        assert_eq!(loc.longitude, -58.3816);
        assert_eq!(loc.address.as_deref(), Some("Av. Corrientes 1234"));
        assert_eq!(loc.postal_code.as_deref(), Some("C1043"));
        assert_eq!(loc.locality.as_deref(), Some("CABA"));
        assert_eq!(loc.province.as_deref(), Some("Buenos Aires"));
    }

    #[test]
    fn decodes_english_field_names() {
        let loc = record(json!({
            "latitude": 1.5,
            "longitude": 2.5,
            "address": "Main St 1",
            "postal_code": "1000",
            "locality": "Town",
            "province": "State"
        }))
        .into_location()
        .expect("coordinates present");

        assert_eq!(loc.postal_code.as_deref(), Some("1000"));
        assert_eq!(loc.address_or_missing(), "Main St 1");
    }

    #[test]
    fn numeric_postal_code_becomes_text() {
        let loc = record(json!({"Latitude": 0.0, "Longitude": 0.0, "CP": 1425}))
            .into_location()
            .unwrap();
        assert_eq!(loc.postal_code.as_deref(), Some("1425"));

        let loc = record(json!({"Latitude": 0.0, "Longitude": 0.0, "CP": 1425.0}))
            .into_location()
            .unwrap();
        assert_eq!(loc.postal_code.as_deref(), Some("1425"));
    }

    #[test]
    fn string_coordinates_are_parsed() {
        let loc = record(json!({"Latitude": " -34.5 ", "Longitude": "-58.4"}))
            .into_location()
            .unwrap();
        assert_eq!(loc.latitude, -34.5);
        assert_eq!(loc.longitude, -58.4);
    }

    #[test]
    fn missing_or_invalid_coordinates_are_rejected() {
        assert!(record(json!({"Longitude": 1.0})).into_location().is_none());
        assert!(record(json!({"Latitude": "north", "Longitude": 1.0}))
            .into_location()
            .is_none());
        assert!(record(json!({"Latitude": null, "Longitude": 1.0}))
            .into_location()
            .is_none());
    }

    #[test]
    fn absent_text_fields_render_as_missing() {
        let loc = record(json!({"Latitude": 0.0, "Longitude": 0.0, "Direccion": "   "}))
            .into_location()
            .unwrap();
        assert!(loc.address.is_none());
        assert_eq!(loc.address_or_missing(), MISSING_FIELD);
        assert_eq!(loc.locality_or_missing(), "N/A");
        assert_eq!(loc.postal_code_or_missing(), "N/A");
        assert_eq!(loc.province_or_missing(), "N/A");
    }
}
