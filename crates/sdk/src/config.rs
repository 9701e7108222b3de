//! Configuration types for the Veil Mail SDK.

use url::Url;

/// Production endpoint of the Veil Mail API.
pub const DEFAULT_BASE_URL: &str = "https://api.veilmail.xyz";

/// User agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "@resonia/veilmail-mcp/0.1.0";

/// Configuration for the Veil Mail client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Veil Mail API.
    pub base_url: Url,
    /// API key sent as a bearer token.
    pub api_key: Option<String>,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_key: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Whether a non-empty API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_new() {
        let url = Url::parse("https://example.com").unwrap();
        let config = ClientConfig::new(url.clone());

        assert_eq!(config.base_url, url);
        assert!(config.api_key.is_none());
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_default_base_url_parses() {
        let url = Url::parse(DEFAULT_BASE_URL).unwrap();
        assert_eq!(url.host_str(), Some("api.veilmail.xyz"));
    }

    #[test]
    fn test_has_api_key() {
        let mut config = ClientConfig::new(Url::parse(DEFAULT_BASE_URL).unwrap());
        assert!(!config.has_api_key());

        config.api_key = Some(String::new());
        assert!(!config.has_api_key());

        config.api_key = Some("vm_live_123".to_string());
        assert!(config.has_api_key());
    }
}
