//! HTTP client configuration and building logic

use std::time::Duration;

use reqwest::Client;
use url::Url;

use super::http::HttpTransport;
use crate::constants::http;
use crate::errors::{ApiError, ApiResult};

/// Runtime configuration for the HTTP transport
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, e.g. `https://api.trello.com/1`
    pub base_url: String,
    /// Whole-request timeout
    pub request_timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: http::DEFAULT_BASE_URL.to_string(),
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Builds the reqwest client with the configured timeouts
    pub fn build_http_client(&self) -> ApiResult<Client> {
        Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(http::USER_AGENT)
            .build()
            .map_err(ApiError::from)
    }

    /// Parses the configured base URL
    pub fn parsed_base_url(&self) -> ApiResult<Url> {
        Ok(Url::parse(&self.base_url)?)
    }

    /// Builds the production transport
    pub fn build_transport(&self) -> ApiResult<HttpTransport> {
        let client = self.build_http_client()?;
        let base_url = self.parsed_base_url()?;
        tracing::debug!("HTTP transport targeting {}", base_url);
        Ok(HttpTransport::new(client, base_url))
    }
}
