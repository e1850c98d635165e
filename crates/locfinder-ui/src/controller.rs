//! The search state machine.
//!
//! Two entry points, postal code and current location, converge on
//! [`SearchController::show_results`]. Everything that cannot happen
//! synchronously is handed back to the host as an [`Effect`].

use std::time::Duration;

use locfinder_core::{
    find_by_postal_code, find_nearby, AppConfig, BaseLayer, LoadState, Location, QueryPoint,
    SearchResult,
};

use crate::alert::Alert;
use crate::command::{Command, Effect, Key};
use crate::geolocation::GeolocationError;
use crate::state::AppState;
use crate::view::{MapView, ResultCard, ResultTable, SidePanel};

/// Tunables for searching and for the map views the controller sets.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    pub radius_km: f64,
    pub default_center: QueryPoint,
    pub default_zoom: u8,
    pub result_zoom: u8,
    pub focus_zoom: u8,
    pub result_limit: usize,
    pub panel_close: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for SearchSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            radius_km: config.search_radius_km,
            default_center: config.default_center,
            default_zoom: config.default_zoom,
            result_zoom: config.result_zoom,
            focus_zoom: config.focus_zoom,
            result_limit: config.result_limit,
            panel_close: Duration::from_millis(config.panel_close_ms),
        }
    }
}

pub struct SearchController {
    settings: SearchSettings,
    state: AppState,
    /// Bumped by every search and by clear; stale geolocation answers are dropped.
    search_generation: u64,
    /// Bumped by every panel open/close; stale hide timers are dropped.
    panel_generation: u64,
}

impl SearchController {
    #[must_use]
    pub fn new(settings: SearchSettings, base_layer: BaseLayer) -> Self {
        let map = MapView::new(settings.default_center, settings.default_zoom);
        Self {
            state: AppState::new(map, base_layer),
            settings,
            search_generation: 0,
            panel_generation: 0,
        }
    }

    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::new(SearchSettings::from(config), config.base_layer)
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Apply one command and return the effects the host must run.
    pub fn dispatch(&mut self, command: Command) -> Vec<Effect> {
        match command {
            Command::DatasetLoaded(result) => self.dataset_loaded(result),
            Command::SetInput(text) => {
                self.state.controls.input = text;
                Vec::new()
            }
            Command::KeyPress(Key::Enter) => self.submit_postal_code(),
            Command::KeyPress(Key::Other(_)) => Vec::new(),
            Command::SubmitPostalCode => self.submit_postal_code(),
            Command::UseCurrentLocation => self.use_current_location(),
            Command::GeolocationResolved { generation, result } => {
                self.geolocation_resolved(generation, result)
            }
            Command::ViewOnMap(index) => self.view_on_map(index),
            Command::ClosePanel => self.close_panel(),
            Command::PanelHideElapsed { generation } => {
                self.panel_hide_elapsed(generation);
                Vec::new()
            }
            Command::Clear => {
                self.clear();
                Vec::new()
            }
            Command::SelectBaseLayer(layer) => {
                tracing::debug!(%layer, "base layer selected");
                self.state.base_layer = layer;
                Vec::new()
            }
        }
    }

    fn dataset_loaded(&mut self, result: Result<Vec<Location>, String>) -> Vec<Effect> {
        match result {
            Ok(locations) => {
                if self.state.store.finish_loading(locations) {
                    self.state.markers.replace(self.state.store.locations());
                }
                Vec::new()
            }
            Err(reason) => {
                tracing::error!(error = %reason, "failed to load location dataset");
                if self.state.store.fail_loading(reason.clone()) {
                    vec![Effect::Alert(Alert::DatasetLoadFailed(reason))]
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn submit_postal_code(&mut self) -> Vec<Effect> {
        let code = self.state.controls.input.trim().to_string();
        if code.is_empty() {
            return vec![Effect::Alert(Alert::EmptyInput)];
        }
        self.search_generation += 1;

        if let Some(alert) = self.dataset_unavailable() {
            tracing::info!(postal_code = %code, "postal code search without a loaded dataset");
            return vec![Effect::Alert(alert)];
        }

        let origin = match find_by_postal_code(&code, self.state.store.locations()) {
            Ok(origin) => origin,
            Err(err) => {
                tracing::info!(error = %err, "postal code search found no origin");
                return vec![Effect::Alert(Alert::PostalCodeNotFound(code))];
            }
        };

        let results = find_nearby(
            origin,
            self.state.store.locations(),
            self.settings.radius_km,
        );
        let Some(nearest) = results.first() else {
            return vec![Effect::Alert(Alert::NoNearbyLocations)];
        };
        let center = QueryPoint::new(nearest.location.latitude, nearest.location.longitude);
        tracing::info!(
            postal_code = %code,
            matches = results.len(),
            "postal code search succeeded"
        );
        self.show_results(results, center)
    }

    fn use_current_location(&mut self) -> Vec<Effect> {
        self.search_generation += 1;
        vec![Effect::RequestGeolocation {
            generation: self.search_generation,
        }]
    }

    fn geolocation_resolved(
        &mut self,
        generation: u64,
        result: Result<QueryPoint, GeolocationError>,
    ) -> Vec<Effect> {
        if generation != self.search_generation {
            tracing::debug!(
                generation,
                current = self.search_generation,
                "discarding stale geolocation result"
            );
            return Vec::new();
        }

        let position = match result {
            Ok(position) => position,
            Err(GeolocationError::Unavailable) => {
                return vec![Effect::Alert(Alert::GeolocationUnavailable)];
            }
            Err(err) => {
                tracing::warn!(error = %err, "geolocation request failed");
                return vec![Effect::Alert(Alert::GeolocationFailed)];
            }
        };

        if let Some(alert) = self.dataset_unavailable() {
            return vec![Effect::Alert(alert)];
        }

        let results = find_nearby(
            position,
            self.state.store.locations(),
            self.settings.radius_km,
        );
        if results.is_empty() {
            return vec![Effect::Alert(Alert::NoNearbyLocations)];
        }
        tracing::info!(
            lat = position.latitude,
            lon = position.longitude,
            matches = results.len(),
            "current location search succeeded"
        );
        self.show_results(results, position)
    }

    /// The alert to show when a search cannot run against the store yet.
    fn dataset_unavailable(&self) -> Option<Alert> {
        match self.state.store.state() {
            LoadState::Loaded => None,
            LoadState::Pending => Some(Alert::DatasetPending),
            LoadState::Failed(reason) => Some(Alert::DatasetLoadFailed(reason.clone())),
        }
    }

    /// Shared tail of both searches: markers, table, cards, panel, clear
    /// control, and map view all switch to `results`.
    fn show_results(&mut self, results: Vec<SearchResult>, center: QueryPoint) -> Vec<Effect> {
        let limit = self.settings.result_limit;
        self.state
            .markers
            .replace(results.iter().map(|result| &result.location));
        self.state.table = ResultTable::from_results(&results, limit);
        self.state.cards = ResultCard::from_results(&results, limit);
        self.state.results = results;
        self.open_panel();
        self.state.controls.clear_visible = true;
        self.state.map.set_view(center, self.settings.result_zoom);
        Vec::new()
    }

    fn view_on_map(&mut self, index: usize) -> Vec<Effect> {
        let Some(card) = self.state.cards.get(index) else {
            tracing::debug!(index, cards = self.state.cards.len(), "no card at index");
            return Vec::new();
        };
        let target = card.target;
        self.state.map.set_view(target, self.settings.focus_zoom);
        if self
            .state
            .markers
            .open_popup_near(target.latitude, target.longitude)
            .is_none()
        {
            tracing::debug!(
                lat = target.latitude,
                lon = target.longitude,
                "no marker for card"
            );
        }
        self.close_panel()
    }

    fn open_panel(&mut self) {
        self.panel_generation += 1;
        self.state.panel = SidePanel::Open;
    }

    fn close_panel(&mut self) -> Vec<Effect> {
        if self.state.panel == SidePanel::Hidden {
            return Vec::new();
        }
        self.panel_generation += 1;
        let generation = self.panel_generation;
        self.state.panel = SidePanel::Closing { generation };
        vec![Effect::SchedulePanelHide {
            generation,
            after: self.settings.panel_close,
        }]
    }

    fn panel_hide_elapsed(&mut self, generation: u64) {
        if self.state.panel == (SidePanel::Closing { generation }) {
            self.state.panel = SidePanel::Hidden;
        }
    }

    /// Back to the initial view with every location on the map.
    fn clear(&mut self) {
        self.search_generation += 1;
        self.panel_generation += 1;

        let state = &mut self.state;
        state.controls.input.clear();
        state.controls.clear_visible = false;
        state.results.clear();
        state.table.clear();
        state.cards.clear();
        state.panel = SidePanel::Hidden;
        state
            .map
            .set_view(self.settings.default_center, self.settings.default_zoom);
        state.markers.replace(state.store.locations());
        tracing::info!(markers = state.markers.len(), "search cleared");
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
