use crate::location::QueryPoint;

/// Buenos Aires, the map's resting view.
pub const DEFAULT_CENTER: QueryPoint = QueryPoint {
    latitude: -34.6037,
    longitude: -58.3816,
};
pub const DEFAULT_ZOOM: u8 = 10;
pub const RESULT_ZOOM: u8 = 12;
pub const FOCUS_ZOOM: u8 = 15;
pub const DEFAULT_RESULT_LIMIT: usize = 3;
pub const DEFAULT_PANEL_CLOSE_MS: u64 = 300;
pub const DEFAULT_DATASET: &str = "./data/output.json";

const CARTO_ATTRIBUTION: &str = "© OpenStreetMap contributors © CARTO";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// The two visual themes the map can toggle between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseLayer {
    #[default]
    Light,
    Dark,
}

impl BaseLayer {
    /// XYZ tile URL template served by Carto.
    #[must_use]
    pub fn tile_url_template(self) -> &'static str {
        match self {
            BaseLayer::Light => "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png",
            BaseLayer::Dark => "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png",
        }
    }

    #[must_use]
    pub fn subdomains(self) -> &'static str {
        "abcd"
    }

    #[must_use]
    pub fn attribution(self) -> &'static str {
        CARTO_ATTRIBUTION
    }

    #[must_use]
    pub fn max_zoom(self) -> u8 {
        19
    }
}

impl std::fmt::Display for BaseLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BaseLayer::Light => write!(f, "light"),
            BaseLayer::Dark => write!(f, "dark"),
        }
    }
}

impl std::str::FromStr for BaseLayer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(BaseLayer::Light),
            "dark" => Ok(BaseLayer::Dark),
            other => Err(format!("unknown base layer '{other}'; expected light or dark")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// File path or `http(s)://` URL of the JSON dataset.
    pub dataset: String,
    pub search_radius_km: f64,
    pub default_center: QueryPoint,
    pub default_zoom: u8,
    pub result_zoom: u8,
    pub focus_zoom: u8,
    /// Maximum rows in the result table and cards in the side panel.
    pub result_limit: usize,
    pub panel_close_ms: u64,
    pub base_layer: BaseLayer,
    pub fetch_timeout_secs: u64,
    pub fetch_user_agent: String,
    pub fetch_max_retries: u32,
    pub fetch_retry_backoff_base_secs: u64,
    /// Fixed device position, when the host has one to offer.
    pub geolocation: Option<QueryPoint>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            env: Environment::Development,
            log_level: "info".to_string(),
            dataset: DEFAULT_DATASET.to_string(),
            search_radius_km: crate::search::DEFAULT_MAX_DISTANCE_KM,
            default_center: DEFAULT_CENTER,
            default_zoom: DEFAULT_ZOOM,
            result_zoom: RESULT_ZOOM,
            focus_zoom: FOCUS_ZOOM,
            result_limit: DEFAULT_RESULT_LIMIT,
            panel_close_ms: DEFAULT_PANEL_CLOSE_MS,
            base_layer: BaseLayer::Light,
            fetch_timeout_secs: 30,
            fetch_user_agent: "locfinder/0.1".to_string(),
            fetch_max_retries: 3,
            fetch_retry_backoff_base_secs: 1,
            geolocation: None,
        }
    }
}
