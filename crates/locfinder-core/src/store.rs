//! In-memory location store, populated once per session.

use crate::location::Location;

/// Lifecycle of the one-time dataset load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// The load has not completed yet.
    Pending,
    /// The load completed; the store may still be empty.
    Loaded,
    /// The load failed; the store stays empty for the rest of the session.
    Failed(String),
}

/// Owns every [`Location`] for the lifetime of a session.
///
/// "Not loaded yet" and "loaded but empty" are distinct states: callers check
/// [`LocationStore::is_loaded`] before treating an empty slice as a real answer.
#[derive(Debug, Clone)]
pub struct LocationStore {
    state: LoadState,
    locations: Vec<Location>,
}

impl Default for LocationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: LoadState::Pending,
            locations: Vec::new(),
        }
    }

    /// Complete the load with `locations`.
    ///
    /// Returns `false` (and leaves the store untouched) if the load already
    /// completed or failed.
    pub fn finish_loading(&mut self, locations: Vec<Location>) -> bool {
        if self.state != LoadState::Pending {
            tracing::warn!(state = ?self.state, "ignoring second dataset load completion");
            return false;
        }
        tracing::info!(count = locations.len(), "location store loaded");
        self.locations = locations;
        self.state = LoadState::Loaded;
        true
    }

    /// Record a failed load. The store remains empty.
    pub fn fail_loading(&mut self, reason: impl Into<String>) -> bool {
        if self.state != LoadState::Pending {
            tracing::warn!(state = ?self.state, "ignoring dataset load failure after completion");
            return false;
        }
        self.state = LoadState::Failed(reason.into());
        true
    }

    #[must_use]
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.state == LoadState::Loaded
    }

    /// All loaded locations in dataset order. Empty unless loaded.
    #[must_use]
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Location> {
        vec![Location {
            latitude: -34.6,
            longitude: -58.4,
            address: Some("Florida 100".to_string()),
            postal_code: Some("1005".to_string()),
            locality: Some("CABA".to_string()),
            province: Some("Buenos Aires".to_string()),
        }]
    }

    #[test]
    fn new_store_is_pending_and_empty() {
        let store = LocationStore::new();
        assert_eq!(store.state(), &LoadState::Pending);
        assert!(!store.is_loaded());
        assert!(store.locations().is_empty());
    }

    #[test]
    fn loaded_empty_differs_from_pending() {
        let mut store = LocationStore::new();
        assert!(store.finish_loading(Vec::new()));
        assert!(store.is_loaded());
        assert!(store.is_empty());
    }

    #[test]
    fn finish_loading_only_applies_once() {
        let mut store = LocationStore::new();
        assert!(store.finish_loading(sample()));
        assert!(!store.finish_loading(Vec::new()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn failed_load_leaves_store_empty() {
        let mut store = LocationStore::new();
        assert!(store.fail_loading("connection refused"));
        assert_eq!(
            store.state(),
            &LoadState::Failed("connection refused".to_string())
        );
        assert!(!store.is_loaded());
        assert!(!store.finish_loading(sample()));
        assert!(store.is_empty());
    }
}
