//! Headless presentation model: what the map, table, and side panel show.
//!
//! Nothing here draws; a [`crate::Renderer`] reads these structures and
//! hands them to whatever mapping library or terminal it drives.

use locfinder_core::{Location, QueryPoint, SearchResult};

/// Markers within this many degrees (on both axes) of a card's coordinates
/// are considered the card's marker.
pub const POPUP_MATCH_TOLERANCE_DEG: f64 = 0.0001;

/// Card title used when a location has no street address.
pub const MISSING_ADDRESS_TITLE: &str = "No address";

/// Format a distance for the table and cards: two decimals plus unit.
#[must_use]
pub fn format_distance_km(distance_km: f64) -> String {
    if distance_km.is_finite() {
        format!("{distance_km:.2} km")
    } else {
        "N/A km".to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: QueryPoint,
    pub zoom: u8,
}

impl MapView {
    #[must_use]
    pub fn new(center: QueryPoint, zoom: u8) -> Self {
        Self { center, zoom }
    }

    pub fn set_view(&mut self, center: QueryPoint, zoom: u8) {
        self.center = center;
        self.zoom = zoom;
    }
}

/// Popup content bound to a marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub address: String,
    pub locality: String,
    pub postal_code: String,
    pub province: String,
}

impl Popup {
    #[must_use]
    pub fn for_location(location: &Location) -> Self {
        Self {
            address: location.address_or_missing().to_string(),
            locality: location.locality_or_missing().to_string(),
            postal_code: location.postal_code_or_missing().to_string(),
            province: location.province_or_missing().to_string(),
        }
    }
}

impl std::fmt::Display for Popup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} | Locality: {} | Postal code: {} | Province: {}",
            self.address, self.locality, self.postal_code, self.province
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub latitude: f64,
    pub longitude: f64,
    pub popup: Popup,
    pub popup_open: bool,
}

impl Marker {
    fn is_near(&self, latitude: f64, longitude: f64) -> bool {
        (self.latitude - latitude).abs() < POPUP_MATCH_TOLERANCE_DEG
            && (self.longitude - longitude).abs() < POPUP_MATCH_TOLERANCE_DEG
    }
}

/// The single mutable marker layer. Every update replaces the whole set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerLayer {
    markers: Vec<Marker>,
}

impl MarkerLayer {
    /// Clear the layer, then add one marker per location.
    pub fn replace<'a, I>(&mut self, locations: I)
    where
        I: IntoIterator<Item = &'a Location>,
    {
        self.markers.clear();
        self.markers
            .extend(locations.into_iter().map(|location| Marker {
                latitude: location.latitude,
                longitude: location.longitude,
                popup: Popup::for_location(location),
                popup_open: false,
            }));
    }

    /// Open the popup of the first marker near `(latitude, longitude)` and
    /// close every other popup. Returns the index of the opened marker.
    pub fn open_popup_near(&mut self, latitude: f64, longitude: f64) -> Option<usize> {
        let target = self
            .markers
            .iter()
            .position(|marker| marker.is_near(latitude, longitude));
        for (index, marker) in self.markers.iter_mut().enumerate() {
            marker.popup_open = Some(index) == target;
        }
        target
    }

    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    #[must_use]
    pub fn open_popup(&self) -> Option<&Marker> {
        self.markers.iter().find(|marker| marker.popup_open)
    }
}

/// One row of the nearest-results table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub address: String,
    pub locality: String,
    pub postal_code: String,
    pub province: String,
    pub distance: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
}

impl ResultTable {
    /// Build a table from the first `limit` results.
    #[must_use]
    pub fn from_results(results: &[SearchResult], limit: usize) -> Self {
        let rows = results
            .iter()
            .take(limit)
            .map(|result| ResultRow {
                address: result.location.address_or_missing().to_string(),
                locality: result.location.locality_or_missing().to_string(),
                postal_code: result.location.postal_code_or_missing().to_string(),
                province: result.location.province_or_missing().to_string(),
                distance: format_distance_km(result.distance_km),
            })
            .collect();
        Self { rows }
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    #[must_use]
    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A side panel card with a "view on map" action.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultCard {
    pub title: String,
    pub locality: String,
    pub postal_code: String,
    pub province: String,
    pub distance: String,
    /// Where "view on map" recenters.
    pub target: QueryPoint,
}

impl ResultCard {
    /// Cards for the first `limit` results.
    #[must_use]
    pub fn from_results(results: &[SearchResult], limit: usize) -> Vec<Self> {
        results
            .iter()
            .take(limit)
            .map(|result| {
                let location = &result.location;
                ResultCard {
                    title: location
                        .address
                        .clone()
                        .unwrap_or_else(|| MISSING_ADDRESS_TITLE.to_string()),
                    locality: location.locality_or_missing().to_string(),
                    postal_code: location.postal_code_or_missing().to_string(),
                    province: location.province_or_missing().to_string(),
                    distance: format_distance_km(result.distance_km),
                    target: QueryPoint::new(location.latitude, location.longitude),
                }
            })
            .collect()
    }
}

/// Side panel visibility. Opening is immediate; closing passes through
/// `Closing` until the hide timer for that generation fires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SidePanel {
    #[default]
    Hidden,
    Open,
    Closing {
        generation: u64,
    },
}

impl SidePanel {
    /// Whether the panel still takes up layout space.
    #[must_use]
    pub fn is_visible(self) -> bool {
        !matches!(self, SidePanel::Hidden)
    }

    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(self, SidePanel::Open)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(lat: f64, lon: f64, address: Option<&str>) -> Location {
        Location {
            latitude: lat,
            longitude: lon,
            address: address.map(str::to_string),
            postal_code: Some("1000".to_string()),
            locality: Some("CABA".to_string()),
            province: None,
        }
    }

    fn results(n: usize) -> Vec<SearchResult> {
        (0..n)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let offset = i as f64 * 0.001;
                SearchResult {
                    location: location(offset, 0.0, Some(&format!("Street {i}"))),
                    distance_km: offset * 111.0,
                }
            })
            .collect()
    }

    #[test]
    fn distance_formats_with_two_decimals() {
        assert_eq!(format_distance_km(0.0), "0.00 km");
        assert_eq!(format_distance_km(1.235_9), "1.24 km");
        assert_eq!(format_distance_km(9.999), "10.00 km");
        assert_eq!(format_distance_km(f64::NAN), "N/A km");
    }

    #[test]
    fn table_and_cards_cap_at_limit() {
        let results = results(10);
        let table = ResultTable::from_results(&results, 3);
        let cards = ResultCard::from_results(&results, 3);
        assert_eq!(table.rows().len(), 3);
        assert_eq!(cards.len(), 3);
        assert_eq!(table.rows()[0].address, "Street 0");
        assert_eq!(cards[2].title, "Street 2");
    }

    #[test]
    fn table_shows_fewer_rows_when_fewer_results() {
        let table = ResultTable::from_results(&results(2), 3);
        assert_eq!(table.rows().len(), 2);
    }

    #[test]
    fn missing_fields_render_as_placeholders() {
        let results = vec![SearchResult {
            location: location(0.0, 0.0, None),
            distance_km: 0.5,
        }];
        let table = ResultTable::from_results(&results, 3);
        let row = &table.rows()[0];
        assert_eq!(row.address, "N/A");
        assert_eq!(row.province, "N/A");
        assert_eq!(row.distance, "0.50 km");

        let card = &ResultCard::from_results(&results, 3)[0];
        assert_eq!(card.title, MISSING_ADDRESS_TITLE);
        assert_eq!(card.province, "N/A");
    }

    #[test]
    fn replace_clears_previous_markers() {
        let mut layer = MarkerLayer::default();
        let first = vec![location(0.0, 0.0, Some("a")), location(1.0, 1.0, Some("b"))];
        layer.replace(&first);
        assert_eq!(layer.len(), 2);

        let second = vec![location(2.0, 2.0, Some("c"))];
        layer.replace(&second);
        assert_eq!(layer.len(), 1);
        assert_eq!(layer.markers()[0].popup.address, "c");
    }

    #[test]
    fn open_popup_near_matches_within_tolerance_only() {
        let mut layer = MarkerLayer::default();
        let locations = vec![
            location(-34.6, -58.4, Some("far")),
            location(-34.5, -58.3, Some("target")),
        ];
        layer.replace(&locations);

        assert_eq!(layer.open_popup_near(-34.500_05, -58.300_05), Some(1));
        assert_eq!(layer.open_popup().unwrap().popup.address, "target");

        assert_eq!(layer.open_popup_near(-34.501, -58.3), None);
        assert!(layer.open_popup().is_none());
    }

    #[test]
    fn popup_lists_all_fields() {
        let popup = Popup::for_location(&location(0.0, 0.0, Some("Florida 100")));
        assert_eq!(
            popup.to_string(),
            "Florida 100 | Locality: CABA | Postal code: 1000 | Province: N/A"
        );
    }

    #[test]
    fn panel_visibility() {
        assert!(!SidePanel::Hidden.is_visible());
        assert!(SidePanel::Open.is_visible());
        assert!(SidePanel::Closing { generation: 1 }.is_visible());
        assert!(!SidePanel::Closing { generation: 1 }.is_open());
    }
}
