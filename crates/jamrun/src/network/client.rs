use crate::error::{Error, Result};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 100;
const MAX_BACKOFF_MS: u64 = 5000;

/// JSON-over-HTTP client for the game backend
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

/// Retry configuration for HTTP requests
struct RetryState {
    attempt: u32,
    backoff_ms: u64,
    /// POSTs that create records are not idempotent
    idempotent: bool,
}

impl RetryState {
    fn new(idempotent: bool) -> Self {
        Self {
            attempt: 0,
            backoff_ms: INITIAL_BACKOFF_MS,
            idempotent,
        }
    }

    fn can_retry(&self) -> bool {
        self.attempt < MAX_RETRIES - 1
    }

    fn increment(&mut self) {
        self.attempt += 1;
        self.backoff_ms = (self.backoff_ms * 2).min(MAX_BACKOFF_MS);
    }

    /// Get delay from Retry-After header or use backoff
    fn get_delay(&self, response: &Response) -> u64 {
        retry_after_ms(
            response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok()),
        )
        .unwrap_or(self.backoff_ms)
    }

    async fn wait(&self, delay_ms: u64) {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}

/// 429 is always retried; 5xx and timeouts only when repeating the request is safe
fn is_retryable_status(status: StatusCode, idempotent: bool) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || (idempotent && status.is_server_error())
}

fn is_retryable_error(e: &reqwest::Error, idempotent: bool) -> bool {
    e.is_connect() || (idempotent && e.is_timeout())
}

fn retry_after_ms(header: Option<&str>) -> Option<u64> {
    header
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(|secs| secs * 1000)
}

/// Check if response requires retry and handle logging/waiting
async fn should_retry_response(response: &Response, state: &mut RetryState) -> bool {
    if !state.can_retry() || !is_retryable_status(response.status(), state.idempotent) {
        return false;
    }

    if response.status() == StatusCode::TOO_MANY_REQUESTS {
        let delay = state.get_delay(response);
        warn!(
            "Rate limited (attempt {}/{}), retrying in {}ms",
            state.attempt + 1,
            MAX_RETRIES,
            delay
        );
        state.wait(delay).await;
        state.increment();
        return true;
    }

    if response.status().is_server_error() {
        warn!(
            "Server error {} (attempt {}/{}), retrying in {}ms",
            response.status(),
            state.attempt + 1,
            MAX_RETRIES,
            state.backoff_ms
        );
        state.wait(state.backoff_ms).await;
        state.increment();
        return true;
    }

    false
}

impl HttpClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let user_agent = format!(
            "jamrun/{} ({})",
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS
        );
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// Execute a request with retry logic
    async fn with_retry<F, Fut>(&self, idempotent: bool, request_fn: F) -> Result<String>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = reqwest::Result<Response>>,
    {
        let mut state = RetryState::new(idempotent);

        loop {
            let result = request_fn().await;

            match result {
                Ok(response) => {
                    if should_retry_response(&response, &mut state).await {
                        continue;
                    }
                    let status = response.status();
                    if status.is_client_error() || status.is_server_error() {
                        return Err(Error::Status {
                            status: status.as_u16(),
                            url: response.url().to_string(),
                        });
                    }
                    return Ok(response.text().await?);
                }
                Err(e) if is_retryable_error(&e, state.idempotent) && state.can_retry() => {
                    warn!(
                        "Connection error (attempt {}/{}): {}, retrying in {}ms",
                        state.attempt + 1,
                        MAX_RETRIES,
                        e,
                        state.backoff_ms
                    );
                    state.wait(state.backoff_ms).await;
                    state.increment();
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = self.url(endpoint);
        debug!("GET {}", url);
        let body = self.with_retry(true, || self.client.get(&url).send()).await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn post_json<B, T>(&self, endpoint: &str, payload: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(endpoint);
        debug!("POST {}", url);
        let body = self
            .with_retry(false, || self.client.post(&url).json(payload).send())
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn put_json<B, T>(&self, endpoint: &str, payload: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(endpoint);
        debug!("PUT {}", url);
        let body = self
            .with_retry(true, || self.client.put(&url).json(payload).send())
            .await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_budget() {
        let mut state = RetryState::new(true);
        assert!(state.can_retry());
        state.increment();
        assert!(state.can_retry());
        state.increment();
        assert!(!state.can_retry());
    }

    #[test]
    fn test_backoff_is_capped() {
        let mut state = RetryState::new(true);
        assert_eq!(state.backoff_ms, 100);
        state.increment();
        assert_eq!(state.backoff_ms, 200);
        for _ in 0..10 {
            state.increment();
        }
        assert_eq!(state.backoff_ms, MAX_BACKOFF_MS);
    }

    #[test]
    fn test_server_errors_retried_only_when_idempotent() {
        assert!(is_retryable_status(StatusCode::BAD_GATEWAY, true));
        assert!(!is_retryable_status(StatusCode::BAD_GATEWAY, false));
        assert!(!is_retryable_status(StatusCode::INTERNAL_SERVER_ERROR, false));
        assert!(is_retryable_status(StatusCode::TOO_MANY_REQUESTS, false));
        assert!(!is_retryable_status(StatusCode::NOT_FOUND, true));
    }

    #[test]
    fn test_retry_after_header() {
        assert_eq!(retry_after_ms(Some("3")), Some(3000));
        assert_eq!(retry_after_ms(Some(" 1 ")), Some(1000));
        assert_eq!(retry_after_ms(Some("Wed, 21 Oct 2015 07:28:00 GMT")), None);
        assert_eq!(retry_after_ms(None), None);
    }

    #[test]
    fn test_url_joining() {
        let client = HttpClient::new("http://localhost:8001/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8001/api");
        assert_eq!(client.url("tracks"), "http://localhost:8001/api/tracks");
        assert_eq!(
            client.url("/game-sessions/abc"),
            "http://localhost:8001/api/game-sessions/abc"
        );
        assert_eq!(client.url(""), "http://localhost:8001/api/");
    }
}
