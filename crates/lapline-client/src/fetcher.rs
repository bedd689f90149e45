use std::time::Duration;

use lapline_core::error::AppError;
use lapline_core::traits::Fetcher;
use reqwest::{Client, ClientBuilder, StatusCode};
use url::Url;

/// Public Ergast-compatible mirror used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.jolpi.ca/ergast/";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP fetcher using reqwest.
///
/// Makes exactly one GET per call against `base_url` joined with the resource
/// path and decodes the body as JSON. A `429` becomes
/// [`AppError::RateLimited`]; every other non-success status becomes
/// [`AppError::HttpStatus`]. Wrap it in a
/// [`RetryingFetcher`](lapline_core::retry::RetryingFetcher) for backoff.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: Client,
    base_url: Url,
    timeout_secs: u64,
}

impl ReqwestFetcher {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        Self::from_builder(base_url, Client::builder(), timeout)
    }

    fn from_builder(
        base_url: &str,
        builder: ClientBuilder,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let base_url = parse_base_url(base_url)?;
        let client = builder
            .user_agent(concat!("lapline/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            timeout_secs: timeout.as_secs(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a resource path against the base URL.
    pub fn url_for(&self, path: &str) -> Result<Url, AppError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| AppError::HttpError(format!("Invalid resource path '{path}': {e}")))
    }
}

impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, path: &str) -> Result<serde_json::Value, AppError> {
        let url = self.url_for(path)?;
        tracing::info!(%url, "Requesting");

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                AppError::NetworkError(format!("Connection failed: {e}"))
            } else {
                AppError::HttpError(e.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::RateLimited {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(AppError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to decode response body from {url}: {e}")))
    }
}

/// Parse the configured base URL, making sure it ends with `/` so joining a
/// resource path appends to it instead of replacing its last segment.
fn parse_base_url(raw: &str) -> Result<Url, AppError> {
    let mut url = Url::parse(raw)
        .map_err(|e| AppError::ConfigError(format!("Invalid API base URL '{raw}': {e}")))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(AppError::ConfigError(format!(
                "API base URL scheme '{scheme}' is not allowed (only http/https)"
            )));
        }
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
