//! HTTP transport layer for the Veil Mail SDK.

use crate::config::ClientConfig;
use crate::error::{VeilMailError, VeilMailResult};
use crate::request::ApiRequest;
use reqwest::{header, Client, Response, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// HTTP transport for making API requests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: Arc<ClientConfig>) -> VeilMailResult<Self> {
        let mut headers = header::HeaderMap::new();

        if let Some(ref api_key) = config.api_key {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|_| VeilMailError::Config("Invalid API key format".to_string()))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Build a URL for the given path.
    ///
    /// The path is appended to the base URL verbatim so that a base URL with
    /// a path prefix keeps it.
    fn build_url(&self, path: &str) -> VeilMailResult<url::Url> {
        let base = self.config.base_url.as_str().trim_end_matches('/');
        Ok(url::Url::parse(&format!("{}{}", base, path))?)
    }

    /// Execute a single request and decode the JSON response.
    pub async fn execute(&self, request: &ApiRequest) -> VeilMailResult<Value> {
        let url = self.build_url(&request.path)?;
        debug!(method = %request.method, url = %url, "API request");

        let mut builder = self.client.request(request.method.clone(), url);
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        Self::decode(response).await
    }

    async fn decode(response: Response) -> VeilMailResult<Value> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "API request failed");
            return Err(VeilMailError::from_response(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Error"),
                &body,
            ));
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(serde_json::json!({ "success": true }));
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_config(base_url: &str) -> Arc<ClientConfig> {
        Arc::new(ClientConfig::new(url::Url::parse(base_url).unwrap()))
    }

    fn create_config_with_auth(base_url: &str, api_key: &str) -> Arc<ClientConfig> {
        let mut config = ClientConfig::new(url::Url::parse(base_url).unwrap());
        config.api_key = Some(api_key.to_string());
        Arc::new(config)
    }

    #[tokio::test]
    async fn test_get_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/domains"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": [{"name": "x.com"}]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        let result = transport.execute(&ApiRequest::get("/v1/domains")).await.unwrap();
        assert_eq!(result["data"][0]["name"], "x.com");
    }

    #[tokio::test]
    async fn test_get_with_query_string() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/emails"))
            .and(query_param("limit", "10"))
            .and(query_param("status", "sent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        let result = transport
            .execute(&ApiRequest::get("/v1/emails?limit=10&status=sent"))
            .await
            .unwrap();
        assert_eq!(result, json!({"data": []}));
    }

    #[tokio::test]
    async fn test_post_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/emails/validate"))
            .and(body_json(json!({"email": "a@x.com"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"valid": true})))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        let request = ApiRequest::post("/v1/emails/validate", json!({"email": "a@x.com"}));
        let result = transport.execute(&request).await.unwrap();
        assert_eq!(result["valid"], true);
    }

    #[tokio::test]
    async fn test_request_headers() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/audiences"))
            .and(header("Authorization", "Bearer vm_test_key"))
            .and(header("Content-Type", "application/json"))
            .and(header("User-Agent", "@resonia/veilmail-mcp/0.1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .expect(1)
            .mount(&server)
            .await;

        let config = create_config_with_auth(&server.uri(), "vm_test_key");
        let transport = HttpTransport::new(config).unwrap();

        let result = transport.execute(&ApiRequest::get("/v1/audiences")).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_no_content_is_success_marker() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/audiences/aud_1/subscribers"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        let request = ApiRequest::post("/v1/audiences/aud_1/subscribers", json!({"email": "s@x.com"}));
        let result = transport.execute(&request).await.unwrap();
        assert_eq!(result, json!({"success": true}));
    }

    #[tokio::test]
    async fn test_error_message_from_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/emails/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "not found"})))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        let result = transport.execute(&ApiRequest::get("/v1/emails/missing")).await;
        match result {
            Err(VeilMailError::Api { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "not found");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_falls_back_to_status_text() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/templates"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        let err = transport
            .execute(&ApiRequest::get("/v1/templates"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "API error (500): Internal Server Error");
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        // Nothing listens on port 1.
        let transport = HttpTransport::new(create_config("http://127.0.0.1:1")).unwrap();

        let err = transport
            .execute(&ApiRequest::get("/v1/domains"))
            .await
            .unwrap_err();
        assert!(matches!(err, VeilMailError::Http(_)));
    }

    #[tokio::test]
    async fn test_build_url() {
        let transport = HttpTransport::new(create_config("http://localhost:8080")).unwrap();

        let url = transport.build_url("/v1/emails").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v1/emails");
    }

    #[tokio::test]
    async fn test_build_url_keeps_base_path() {
        let transport = HttpTransport::new(create_config("http://localhost:8080/proxy/")).unwrap();

        let url = transport.build_url("/v1/emails?limit=5").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/proxy/v1/emails?limit=5");
    }

    #[tokio::test]
    async fn test_invalid_api_key_is_config_error() {
        let config = create_config_with_auth("http://localhost:8080", "bad\nkey");
        let err = HttpTransport::new(config).unwrap_err();
        assert!(matches!(err, VeilMailError::Config(_)));
    }
}
