use locfinder_core::{BaseLayer, LocationStore, SearchResult};

use crate::view::{MapView, MarkerLayer, ResultCard, ResultTable, SidePanel};

/// The search form controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Controls {
    /// Postal code input field.
    pub input: String,
    /// The "clear" control only shows after a successful search.
    pub clear_visible: bool,
}

/// Everything the page shows, in one place.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: LocationStore,
    pub map: MapView,
    pub base_layer: BaseLayer,
    pub markers: MarkerLayer,
    /// Full result list of the latest successful search, nearest first.
    pub results: Vec<SearchResult>,
    pub table: ResultTable,
    pub cards: Vec<ResultCard>,
    pub panel: SidePanel,
    pub controls: Controls,
}

impl AppState {
    #[must_use]
    pub fn new(map: MapView, base_layer: BaseLayer) -> Self {
        Self {
            store: LocationStore::new(),
            map,
            base_layer,
            markers: MarkerLayer::default(),
            results: Vec::new(),
            table: ResultTable::default(),
            cards: Vec::new(),
            panel: SidePanel::Hidden,
            controls: Controls::default(),
        }
    }
}
