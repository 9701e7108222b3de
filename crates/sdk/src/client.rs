//! Main client for the Veil Mail SDK.

use crate::config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use crate::error::VeilMailResult;
use crate::request::ApiRequest;
use crate::transport::HttpTransport;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// Main client for interacting with the Veil Mail API.
#[derive(Debug, Clone)]
pub struct VeilMailClient {
    config: Arc<ClientConfig>,
    http: HttpTransport,
}

impl VeilMailClient {
    /// Create a new client builder.
    pub fn builder() -> VeilMailClientBuilder {
        VeilMailClientBuilder::new()
    }

    /// Create a client from configuration.
    pub fn from_config(config: ClientConfig) -> VeilMailResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(config.clone())?;

        Ok(Self { config, http })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Whether requests will carry a non-empty API key.
    pub fn has_api_key(&self) -> bool {
        self.config.has_api_key()
    }

    /// Send one request and return the decoded JSON response.
    pub async fn execute(&self, request: &ApiRequest) -> VeilMailResult<Value> {
        self.http.execute(request).await
    }
}

/// Builder for creating a VeilMailClient.
pub struct VeilMailClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    user_agent: String,
}

impl VeilMailClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Set the base URL of the Veil Mail API.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the API key for authentication. An empty key counts as unset.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.api_key = if key.is_empty() { None } else { Some(key) };
        self
    }

    /// Override the user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the client.
    pub fn build(self) -> VeilMailResult<VeilMailClient> {
        let base_url = match self.base_url.as_deref() {
            Some(url) if !url.is_empty() => Url::parse(url)?,
            _ => Url::parse(DEFAULT_BASE_URL)?,
        };

        let config = ClientConfig {
            base_url,
            api_key: self.api_key,
            user_agent: self.user_agent,
        };

        VeilMailClient::from_config(config)
    }
}

impl Default for VeilMailClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
