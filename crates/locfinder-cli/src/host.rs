//! Wiring between configuration and the session's collaborators.

use std::future::Future;

use locfinder_core::{AppConfig, Location, QueryPoint};
use locfinder_dataset::{DatasetClient, DatasetSource};
use locfinder_ui::{
    FixedGeolocator, GeolocationError, Geolocator, Renderer, SearchController, Session,
    UnavailableGeolocator,
};

/// The position source this host can offer.
#[derive(Debug, Clone, Copy)]
pub(crate) enum HostGeolocator {
    Fixed(FixedGeolocator),
    Unavailable(UnavailableGeolocator),
}

impl HostGeolocator {
    pub(crate) fn from_position(position: Option<QueryPoint>) -> Self {
        position.map_or(
            HostGeolocator::Unavailable(UnavailableGeolocator),
            |position| HostGeolocator::Fixed(FixedGeolocator::new(position)),
        )
    }
}

impl Geolocator for HostGeolocator {
    async fn current_position(&self) -> Result<QueryPoint, GeolocationError> {
        match self {
            HostGeolocator::Fixed(inner) => inner.current_position().await,
            HostGeolocator::Unavailable(inner) => inner.current_position().await,
        }
    }
}

/// Validate a `--lat/--lon` pair.
pub(crate) fn position_arg(lat: f64, lon: f64) -> anyhow::Result<QueryPoint> {
    if !(-90.0..=90.0).contains(&lat) {
        anyhow::bail!("latitude {lat} out of range [-90, 90]");
    }
    if !(-180.0..=180.0).contains(&lon) {
        anyhow::bail!("longitude {lon} out of range [-180, 180]");
    }
    Ok(QueryPoint::new(lat, lon))
}

/// Build the one-time dataset load for the configured source.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed.
pub(crate) fn dataset_loader(
    config: &AppConfig,
) -> anyhow::Result<impl Future<Output = Result<Vec<Location>, String>> + Send + 'static> {
    let client = DatasetClient::from_app_config(config)?;
    let source = DatasetSource::parse(&config.dataset);
    Ok(async move {
        client
            .load(&source)
            .await
            .map(|decoded| decoded.locations)
            .map_err(|e| e.to_string())
    })
}

/// A session with the dataset load already started.
pub(crate) fn start_session<R: Renderer>(
    config: &AppConfig,
    renderer: R,
) -> anyhow::Result<Session<HostGeolocator, R>> {
    let controller = SearchController::from_app_config(config);
    let geolocator = HostGeolocator::from_position(config.geolocation);
    let mut session = Session::new(controller, geolocator, renderer);
    session.spawn_dataset_load(dataset_loader(config)?);
    Ok(session)
}
