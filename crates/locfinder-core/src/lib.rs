pub mod app_config;
pub mod config;
pub mod geo;
pub mod location;
pub mod search;
pub mod store;

use thiserror::Error;

pub use app_config::{AppConfig, BaseLayer, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{distance_km, EARTH_RADIUS_KM};
pub use location::{Location, LocationRecord, QueryPoint, SearchResult};
pub use search::{find_by_postal_code, find_nearby, SearchError, DEFAULT_MAX_DISTANCE_KM};
pub use store::{LoadState, LocationStore};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
