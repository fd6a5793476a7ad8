//! HTTP transport for capabilities and catalogue requests.

use std::time::Duration;

use async_trait::async_trait;
use ows_common::{Credentials, OwsError, OwsResult, RawCapabilitiesResponse};
use reqwest::{header, redirect, Client};
use tracing::{debug, instrument};

/// Fetches a URL and returns the body with the URL it was finally served from.
///
/// Implementations must not retry. Transport failures map to `OwsError::Io`;
/// HTTP error statuses are returned as responses and left to validation.
#[async_trait]
pub trait CapabilitiesFetcher: Send + Sync {
    async fn fetch(
        &self,
        url: &str,
        credentials: Option<&Credentials>,
        expected_content_type: &str,
    ) -> OwsResult<RawCapabilitiesResponse>;
}

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Whole-request timeout
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Redirects followed before giving up
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_redirects: 5,
            user_agent: format!("ows-capabilities/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FetchConfig {
    /// Defaults overridden by environment.
    ///
    /// Environment variables: CAPABILITIES_FETCH_TIMEOUT_SECS (default: 30),
    /// CAPABILITIES_MAX_REDIRECTS (default: 5)
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(secs) = env_parse::<u64>("CAPABILITIES_FETCH_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(max) = env_parse::<usize>("CAPABILITIES_MAX_REDIRECTS") {
            config.max_redirects = max;
        }
        config
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Accept header for the expected content family.
fn accept_header(expected_content_type: &str) -> &'static str {
    match expected_content_type {
        "json" => "application/json, application/geo+json;q=0.9, */*;q=0.5",
        _ => "application/xml, text/xml;q=0.9, */*;q=0.5",
    }
}

/// reqwest-backed fetcher.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: FetchConfig) -> OwsResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .redirect(redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| OwsError::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CapabilitiesFetcher for HttpFetcher {
    #[instrument(skip(self, credentials), fields(authenticated = credentials.is_some()))]
    async fn fetch(
        &self,
        url: &str,
        credentials: Option<&Credentials>,
        expected_content_type: &str,
    ) -> OwsResult<RawCapabilitiesResponse> {
        let mut request = self
            .client
            .get(url)
            .header(header::ACCEPT, accept_header(expected_content_type));
        if let Some(creds) = credentials {
            request = request.basic_auth(&creds.user, Some(&creds.pass));
        }

        let response = request
            .send()
            .await
            .map_err(|e| OwsError::Io(format!("{}: {}", url, e)))?;

        let final_url = response.url().to_string();
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .text()
            .await
            .map_err(|e| OwsError::Io(format!("{}: {}", final_url, e)))?;

        debug!(
            status,
            final_url = %final_url,
            content_type = content_type.as_deref().unwrap_or(""),
            bytes = body.len(),
            "Fetched"
        );

        Ok(RawCapabilitiesResponse {
            url: final_url,
            status,
            content_type,
            body,
        })
    }
}
