//! Nearest-neighbor search over an in-memory slice of locations.
//!
//! Both entry points are pure: they read only their arguments, so they can be
//! exercised without a store, a map, or a runtime.

use thiserror::Error;

use crate::geo::distance_km;
use crate::location::{Location, QueryPoint, SearchResult};

/// Search radius used when the caller does not configure one.
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("postal code not found: {0}")]
    PostalCodeNotFound(String),
}

/// Return every location within `max_distance_km` of `query`, nearest first.
///
/// The sort is stable, so locations at equal distance keep dataset order.
/// Locations whose distance is NaN never satisfy the radius and are dropped.
#[must_use]
pub fn find_nearby(
    query: QueryPoint,
    locations: &[Location],
    max_distance_km: f64,
) -> Vec<SearchResult> {
    let mut results: Vec<SearchResult> = locations
        .iter()
        .map(|location| SearchResult {
            distance_km: distance_km(
                query.latitude,
                query.longitude,
                location.latitude,
                location.longitude,
            ),
            location: location.clone(),
        })
        .filter(|result| result.distance_km <= max_distance_km)
        .collect();
    results.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

    tracing::debug!(
        lat = query.latitude,
        lon = query.longitude,
        max_distance_km,
        candidates = locations.len(),
        matched = results.len(),
        "nearby search complete"
    );
    results
}

/// Resolve a postal code to the coordinates of the first matching location.
///
/// The code is trimmed, then compared by exact equality. When the dataset
/// holds duplicate codes, dataset order decides which record is the origin.
///
/// # Errors
///
/// Returns [`SearchError::PostalCodeNotFound`] when no location carries `code`.
pub fn find_by_postal_code(code: &str, locations: &[Location]) -> Result<QueryPoint, SearchError> {
    let code = code.trim();
    locations
        .iter()
        .find(|location| location.postal_code.as_deref() == Some(code))
        .map(|location| QueryPoint::new(location.latitude, location.longitude))
        .ok_or_else(|| SearchError::PostalCodeNotFound(code.to_string()))
}

#[cfg(test)]
#[path = "search_test.rs"]
mod tests;
