use std::path::Path;
use std::time::Duration;

use reqwest::Client;

use crate::decode::{decode_locations, DecodedDataset};
use crate::error::DatasetError;
use crate::retry::retry_with_backoff;
use crate::source::DatasetSource;

/// Loads the static location dataset from a file or over HTTP.
///
/// HTTP 404 and other non-2xx responses surface as typed errors. Transient
/// failures (network errors, 429, 5xx) are retried with exponential backoff
/// up to `max_retries` additional attempts.
pub struct DatasetClient {
    client: Client,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in seconds for exponential backoff: `backoff_base_secs * 2^attempt`.
    backoff_base_secs: u64,
}

impl DatasetClient {
    /// Creates a `DatasetClient` with configured timeout, `User-Agent`, and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, DatasetError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Builds a client from the `LOCFINDER_FETCH_*` settings.
    ///
    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn from_app_config(config: &locfinder_core::AppConfig) -> Result<Self, DatasetError> {
        Self::new(
            config.fetch_timeout_secs,
            &config.fetch_user_agent,
            config.fetch_max_retries,
            config.fetch_retry_backoff_base_secs,
        )
    }

    /// Load and decode the dataset from `source`.
    ///
    /// # Errors
    ///
    /// - [`DatasetError::Io`]: the file cannot be read.
    /// - Any error from [`Self::fetch_url`] for URL sources.
    /// - [`DatasetError::Decode`] / [`DatasetError::NotAnArray`]: the body
    ///   is not a JSON array.
    pub async fn load(&self, source: &DatasetSource) -> Result<DecodedDataset, DatasetError> {
        tracing::info!(%source, "loading location dataset");
        let body = match source {
            DatasetSource::File(path) => read_file(path).await?,
            DatasetSource::Url(url) => self.fetch_url(url).await?,
        };
        decode_locations(&body, &source.to_string())
    }

    /// Fetch the raw dataset body from `url`.
    ///
    /// # Errors
    ///
    /// - [`DatasetError::NotFound`]: HTTP 404 (not retried).
    /// - [`DatasetError::RateLimited`]: HTTP 429 after all retries exhausted.
    /// - [`DatasetError::UnexpectedStatus`]: any other non-2xx status; 5xx
    ///   responses are retried first.
    /// - [`DatasetError::Http`]: network or TLS failure after all retries exhausted.
    pub async fn fetch_url(&self, url: &str) -> Result<String, DatasetError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || async move {
            let response = self
                .client
                .get(url)
                .header(reqwest::header::ACCEPT, "application/json")
                .send()
                .await?;
            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let retry_after_secs = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(0);
                return Err(DatasetError::RateLimited {
                    url: url.to_owned(),
                    retry_after_secs,
                });
            }

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(DatasetError::NotFound {
                    url: url.to_owned(),
                });
            }

            if !status.is_success() {
                return Err(DatasetError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_owned(),
                });
            }

            Ok(response.text().await?)
        })
        .await
    }
}

async fn read_file(path: &Path) -> Result<String, DatasetError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DatasetError::Io {
            path: path.display().to_string(),
            source: e,
        })
}
