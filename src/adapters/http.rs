use crate::domain::ports::PageFetcher;
use crate::utils::error::FetchError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko)";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub user_agent: String,
    pub headers: BTreeMap<String, String>,
    pub retry_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: BTreeMap::new(),
            retry_attempts: 0,
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// reqwest-backed fetcher: one GET per attempt, redirects and TLS left to reqwest.
pub struct HttpFetcher {
    client: Client,
    settings: FetchSettings,
}

impl HttpFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        for (key, value) in &settings.headers {
            match (
                HeaderName::from_bytes(key.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => tracing::warn!("⚠️ Skipping invalid header '{}'", key),
            }
        }

        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .timeout(settings.timeout)
            .build()?;

        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    async fn fetch_once(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        tracing::debug!("Response status from {}: {}", url, response.status());

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| self.classify(e))
    }

    fn classify(&self, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout {
                seconds: self.settings.timeout.as_secs(),
            }
        } else {
            FetchError::Request(error)
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let mut attempt = 0;
        loop {
            match self.fetch_once(&parsed).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_retryable() && attempt < self.settings.retry_attempts => {
                    attempt += 1;
                    tracing::debug!(
                        "Retrying {} ({}/{}) after error: {}",
                        url,
                        attempt,
                        self.settings.retry_attempts,
                        e
                    );
                    tokio::time::sleep(self.settings.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
