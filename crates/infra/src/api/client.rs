//! Authenticated JSON client for the ClickUp REST API
//!
//! Every request carries the raw personal token in `Authorization` (ClickUp
//! does not use the `Bearer` scheme) and is bounded by the configured
//! timeout on top of the transport's own retries.

use std::sync::Arc;
use std::time::Duration;

use clicktick_domain::config::ApiConfig;
use clicktick_domain::constants::DEFAULT_API_BASE_URL;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::auth::AccessTokenProvider;
use super::errors::ApiError;
use crate::http::HttpClient;

/// Configuration for [`ApiClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiClientConfig {
    /// Base URL including the version segment, without a trailing slash
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Total transport attempts per request
    pub max_attempts: usize,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self::from(&ApiConfig::default())
    }
}

impl From<&ApiConfig> for ApiClientConfig {
    fn from(config: &ApiConfig) -> Self {
        let base_url = config.base_url.trim_end_matches('/');
        Self {
            base_url: if base_url.is_empty() { DEFAULT_API_BASE_URL.into() } else { base_url.into() },
            timeout: Duration::from_secs(config.timeout_seconds.max(1)),
            max_attempts: config.max_attempts.max(1),
        }
    }
}

/// Authenticated JSON client for the ClickUp REST API.
pub struct ApiClient {
    http_client: HttpClient,
    auth: Arc<dyn AccessTokenProvider>,
    config: ApiClientConfig,
}

impl ApiClient {
    /// # Errors
    /// `ApiError::Config` if the HTTP client cannot be built.
    pub fn new(config: ApiClientConfig, auth: Arc<dyn AccessTokenProvider>) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .timeout(config.timeout)
            .max_attempts(config.max_attempts)
            .user_agent(concat!("clicktick/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {e}")))?;

        Ok(Self { http_client, auth, config })
    }

    /// Base URL requests are built on.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// `GET {base}{path}?{query}` decoded as `T`.
    #[instrument(skip(self, query), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "GET request");
        let request = self.http_client.request(Method::GET, &url).query(query);
        self.execute(request, &url).await
    }

    /// `POST {base}{path}` with a JSON body, decoded as `R`.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(url = %url, "POST request");
        let request = self.http_client.request(Method::POST, &url).json(body);
        self.execute(request, &url).await
    }

    /// `POST {base}{path}` without a body.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn post_empty<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "POST request");
        let request = self.http_client.request(Method::POST, &url);
        self.execute(request, &url).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &str,
    ) -> Result<T, ApiError> {
        let token = self.auth.access_token().await?;
        let request = request
            .header(reqwest::header::AUTHORIZATION, token)
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        let timeout = self.config.timeout;
        let response = match tokio::time::timeout(timeout, self.http_client.send(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => return Err(ApiError::from(err)),
            Err(_) => {
                warn!(url, ?timeout, "Request timed out");
                return Err(ApiError::Timeout(timeout));
            }
        };

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(ApiError::from_status(status, url, &body));
        }

        let body = if body.trim().is_empty() || status == StatusCode::NO_CONTENT {
            "null"
        } else {
            body.as_str()
        };
        serde_json::from_str(body)
            .map_err(|e| ApiError::Decode(format!("Failed to parse response from {url}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde::Deserialize;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    struct FixedToken;

    #[async_trait]
    impl AccessTokenProvider for FixedToken {
        async fn access_token(&self) -> Result<String, ApiError> {
            Ok("pk_1_token".to_string())
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Message {
        message: String,
    }

    fn client(server: &MockServer) -> ApiClient {
        let config = ApiClientConfig {
            base_url: server.uri(),
            timeout: Duration::from_secs(5),
            max_attempts: 1,
        };
        ApiClient::new(config, Arc::new(FixedToken)).unwrap()
    }

    #[tokio::test]
    async fn get_sends_raw_token_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/team"))
            .and(header("Authorization", "pk_1_token"))
            .and(query_param("archived", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        let reply: Message = client(&server).get("/team", &[("archived", "false".into())]).await.unwrap();
        assert_eq!(reply.message, "ok");
    }

    #[tokio::test]
    async fn post_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/echo"))
            .and(body_json(serde_json::json!({"message": "hi"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": "hi"})))
            .mount(&server)
            .await;

        let reply: Message =
            client(&server).post("/echo", &serde_json::json!({"message": "hi"})).await.unwrap();
        assert_eq!(reply, Message { message: "hi".into() });
    }

    #[tokio::test]
    async fn error_statuses_are_classified() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/private"))
            .respond_with(ResponseTemplate::new(401).set_body_string("{\"err\":\"Token invalid\"}"))
            .mount(&server)
            .await;

        let err = client(&server).get::<Message>("/private", &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::Auth(msg) if msg.contains("Token invalid")));
    }

    #[tokio::test]
    async fn malformed_bodies_are_decode_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client(&server).get::<Message>("/anything", &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn slow_responses_time_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let config = ApiClientConfig {
            base_url: server.uri(),
            timeout: Duration::from_millis(200),
            max_attempts: 1,
        };
        let client = ApiClient::new(config, Arc::new(FixedToken)).unwrap();

        let err = client.get::<Message>("/slow", &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::Timeout(_) | ApiError::Network(_)));
    }

    #[test]
    fn config_from_domain_trims_trailing_slash() {
        let config = ApiClientConfig::from(&ApiConfig {
            base_url: "https://example.test/api/v2/".into(),
            token: None,
            timeout_seconds: 0,
            max_attempts: 0,
        });
        assert_eq!(config.base_url, "https://example.test/api/v2");
        assert_eq!(config.timeout, Duration::from_secs(1));
        assert_eq!(config.max_attempts, 1);
    }
}
