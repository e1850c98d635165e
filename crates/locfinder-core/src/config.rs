use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::location::QueryPoint;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but its value is invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but its value is invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; absent ones fall back to [`AppConfig::default`].
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let defaults = AppConfig::default();

    let env = match lookup("LOCFINDER_ENV") {
        Ok(raw) => parse_environment(&raw)?,
        Err(_) => defaults.env,
    };
    let log_level = lookup("LOCFINDER_LOG_LEVEL").unwrap_or(defaults.log_level);
    let dataset = lookup("LOCFINDER_DATASET").unwrap_or(defaults.dataset);

    let search_radius_km: f64 = parse_or(
        &lookup,
        "LOCFINDER_SEARCH_RADIUS_KM",
        defaults.search_radius_km,
    )?;
    if !search_radius_km.is_finite() || search_radius_km <= 0.0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "LOCFINDER_SEARCH_RADIUS_KM".to_string(),
            reason: format!("radius must be positive and finite, got {search_radius_km}"),
        });
    }

    let default_center = match lookup("LOCFINDER_DEFAULT_CENTER") {
        Ok(raw) => parse_lat_lon("LOCFINDER_DEFAULT_CENTER", &raw)?,
        Err(_) => defaults.default_center,
    };
    let geolocation = match lookup("LOCFINDER_GEOLOCATION") {
        Ok(raw) => Some(parse_lat_lon("LOCFINDER_GEOLOCATION", &raw)?),
        Err(_) => None,
    };

    let default_zoom = parse_or(&lookup, "LOCFINDER_DEFAULT_ZOOM", defaults.default_zoom)?;
    let result_zoom = parse_or(&lookup, "LOCFINDER_RESULT_ZOOM", defaults.result_zoom)?;
    let focus_zoom = parse_or(&lookup, "LOCFINDER_FOCUS_ZOOM", defaults.focus_zoom)?;
    let result_limit = parse_or(&lookup, "LOCFINDER_RESULT_LIMIT", defaults.result_limit)?;
    if result_limit == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "LOCFINDER_RESULT_LIMIT".to_string(),
            reason: "result limit must be at least 1".to_string(),
        });
    }
    let panel_close_ms = parse_or(&lookup, "LOCFINDER_PANEL_CLOSE_MS", defaults.panel_close_ms)?;
    let base_layer = parse_or(&lookup, "LOCFINDER_BASE_LAYER", defaults.base_layer)?;

    let fetch_timeout_secs = parse_or(
        &lookup,
        "LOCFINDER_FETCH_TIMEOUT_SECS",
        defaults.fetch_timeout_secs,
    )?;
    let fetch_user_agent =
        lookup("LOCFINDER_FETCH_USER_AGENT").unwrap_or(defaults.fetch_user_agent);
    let fetch_max_retries = parse_or(
        &lookup,
        "LOCFINDER_FETCH_MAX_RETRIES",
        defaults.fetch_max_retries,
    )?;
    let fetch_retry_backoff_base_secs = parse_or(
        &lookup,
        "LOCFINDER_FETCH_RETRY_BACKOFF_BASE_SECS",
        defaults.fetch_retry_backoff_base_secs,
    )?;

    Ok(AppConfig {
        env,
        log_level,
        dataset,
        search_radius_km,
        default_center,
        default_zoom,
        result_zoom,
        focus_zoom,
        result_limit,
        panel_close_ms,
        base_layer,
        fetch_timeout_secs,
        fetch_user_agent,
        fetch_max_retries,
        fetch_retry_backoff_base_secs,
        geolocation,
    })
}

/// Parse `var` if present, otherwise fall back to `default`.
fn parse_or<F, T>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_var(lookup, var).map(|v| v.unwrap_or(default))
}

/// Parse `var` if present; `Ok(None)` when it is unset.
fn parse_var<F, T>(lookup: &F, var: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Ok(raw) = lookup(var) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

/// Parse a `"lat,lon"` pair in degrees.
fn parse_lat_lon(var: &str, raw: &str) -> Result<QueryPoint, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let (lat, lon) = raw
        .split_once(',')
        .ok_or_else(|| invalid(format!("expected \"lat,lon\", got \"{raw}\"")))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| invalid(format!("latitude: {e}")))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|e| invalid(format!("longitude: {e}")))?;

    if !(-90.0..=90.0).contains(&lat) {
        return Err(invalid(format!("latitude {lat} out of range")));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(invalid(format!("longitude {lon} out of range")));
    }
    Ok(QueryPoint::new(lat, lon))
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "LOCFINDER_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
