//! Retrying HTTP transport
//!
//! Every ClickUp call goes through [`HttpClient::send`]. Server errors,
//! `429 Too Many Requests` and transport failures of idempotent requests are
//! retried under a [`RetryPolicy`]; the final response is handed back
//! untouched so the API layer can map its status.
//!
//! `POST` is sent exactly once: opening or closing a time entry is never
//! replayed by the transport.

use std::time::Duration;

use clicktick_domain::ClickTickError;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, IntoUrl, Method, RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};

use crate::errors::InfraError;

/// Longest server-requested pause honored before retrying.
const MAX_RETRY_AFTER: Duration = Duration::from_secs(30);

/// How many times to try a request and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total tries, the first one included.
    pub max_attempts: usize,
    /// Pause before the first retry.
    pub base_backoff: Duration,
    /// Longest computed pause.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Pause before retry number `retry` (1-based): doubling from the base,
    /// capped at `max_backoff`.
    pub fn backoff(&self, retry: usize) -> Duration {
        let exponent = u32::try_from(retry.saturating_sub(1)).unwrap_or(u32::MAX).min(10);
        self.base_backoff.saturating_mul(1 << exponent).min(self.max_backoff)
    }

    /// Only methods that can be replayed without side effects are retried.
    pub fn retries_method(method: &Method) -> bool {
        method.is_idempotent()
    }

    /// Server errors and rate limiting.
    pub fn retries_status(status: StatusCode) -> bool {
        status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
    }

    /// Timeouts and connection failures.
    pub fn retries_error(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect() || err.is_request()
    }
}

/// `reqwest` client plus the retry policy applied by [`send`](Self::send).
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    policy: RetryPolicy,
}

impl HttpClient {
    /// Start from the defaults: 30 s timeout, three attempts.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Retry policy applied by `send`.
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Start a request; send it through [`send`](Self::send).
    pub fn request<U: IntoUrl>(&self, method: Method, url: U) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// Send `builder`, retrying idempotent requests under the client's
    /// policy.
    ///
    /// A `429` carrying `Retry-After` waits the advertised number of seconds
    /// (bounded) instead of the computed backoff.
    ///
    /// # Errors
    /// `Internal` for a streaming body that cannot be replayed; otherwise the
    /// transport failure of the last attempt.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, ClickTickError> {
        let attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let request = builder
                .try_clone()
                .ok_or_else(|| ClickTickError::Internal("request body is not replayable".into()))?
                .build()
                .map_err(transport_error)?;
            let (method, url) = (request.method().clone(), request.url().clone());
            let retries_left = attempt < attempts && RetryPolicy::retries_method(&method);

            match self.client.execute(request).await {
                Ok(response) if retries_left && RetryPolicy::retries_status(response.status()) => {
                    let wait = retry_after(response.headers())
                        .unwrap_or_else(|| self.policy.backoff(attempt));
                    warn!(
                        attempt,
                        %method,
                        %url,
                        status = %response.status(),
                        wait_ms = wait.as_millis() as u64,
                        "Retrying HTTP request"
                    );
                    pause(wait).await;
                }
                Ok(response) => {
                    debug!(attempt, %method, %url, status = %response.status(), "HTTP response");
                    return Ok(response);
                }
                Err(err) if retries_left && RetryPolicy::retries_error(&err) => {
                    let wait = self.policy.backoff(attempt);
                    warn!(attempt, %method, %url, error = %err, "HTTP transport failure, retrying");
                    pause(wait).await;
                }
                Err(err) => return Err(transport_error(err)),
            }

            attempt += 1;
        }
    }
}

fn transport_error(err: reqwest::Error) -> ClickTickError {
    InfraError::from(err).into()
}

/// `Retry-After` in whole seconds; HTTP-date values are ignored.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let seconds = headers.get(RETRY_AFTER)?.to_str().ok()?.trim().parse::<u64>().ok()?;
    Some(Duration::from_secs(seconds).min(MAX_RETRY_AFTER))
}

async fn pause(wait: Duration) {
    if !wait.is_zero() {
        tokio::time::sleep(wait).await;
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    policy: RetryPolicy,
    user_agent: String,
    default_headers: HeaderMap,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            policy: RetryPolicy::default(),
            user_agent: concat!("clicktick/", env!("CARGO_PKG_VERSION")).to_string(),
            default_headers: HeaderMap::new(),
        }
    }
}

impl HttpClientBuilder {
    /// Per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// At least one.
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.policy.max_attempts = attempts.max(1);
        self
    }

    /// Pause before the first retry.
    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.policy.base_backoff = backoff;
        self
    }

    /// Override the `User-Agent` header.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Headers sent with every request.
    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = headers;
        self
    }

    /// # Errors
    /// `Network` when the TLS backend cannot be initialized.
    pub fn build(self) -> Result<HttpClient, ClickTickError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .default_headers(self.default_headers)
            .no_proxy()
            .build()
            .map_err(transport_error)?;

        Ok(HttpClient { client, policy: self.policy })
    }
}
