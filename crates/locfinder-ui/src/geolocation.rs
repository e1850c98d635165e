//! Single-shot device position lookup.

use std::future::Future;

use locfinder_core::QueryPoint;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("geolocation is not available")]
    Unavailable,
    #[error("geolocation permission denied")]
    PermissionDenied,
    #[error("geolocation failed: {0}")]
    Failed(String),
}

/// Source of the current device position. Each call is one request; there
/// is no continuous tracking.
pub trait Geolocator: Send + Sync + 'static {
    fn current_position(
        &self,
    ) -> impl Future<Output = Result<QueryPoint, GeolocationError>> + Send;
}

/// Always reports the same configured position.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocator {
    position: QueryPoint,
}

impl FixedGeolocator {
    #[must_use]
    pub fn new(position: QueryPoint) -> Self {
        Self { position }
    }
}

impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<QueryPoint, GeolocationError> {
        Ok(self.position)
    }
}

/// A host without any position source.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableGeolocator;

impl Geolocator for UnavailableGeolocator {
    async fn current_position(&self) -> Result<QueryPoint, GeolocationError> {
        Err(GeolocationError::Unavailable)
    }
}
