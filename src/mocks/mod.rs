//! Mock implementations for testing.
//!
//! `MockHttpTransport` replays queued responses and records every request;
//! `MockTokenProvider` hands out a fixed token or a fixed failure.

use async_trait::async_trait;
use bytes::Bytes;
use secrecy::SecretString;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use futures::stream;

use crate::auth::TokenProvider;
use crate::error::AuthenticationError;
use crate::transport::{ChunkedStream, HttpRequest, HttpResponse, HttpTransport, TransportError};

type StreamItems = Vec<Result<Bytes, TransportError>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Mock HTTP transport for testing.
///
/// ```
/// use integrations_discovery_engine::mocks::MockHttpTransport;
/// use integrations_discovery_engine::transport::{HttpMethod, HttpRequest, HttpTransport};
/// use std::collections::HashMap;
///
/// # tokio_test();
/// # fn tokio_test() {
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let transport = MockHttpTransport::new();
/// transport.enqueue_json_response(200, r#"{"queryId":"q"}"#);
///
/// let request = HttpRequest {
///     method: HttpMethod::Post,
///     url: "https://example.test/v1alpha/x:search".to_string(),
///     headers: HashMap::new(),
///     body: None,
/// };
///
/// let response = transport.send(request).await.unwrap();
/// assert_eq!(response.status, 200);
/// transport.verify_request_count(1);
/// # });
/// # }
/// ```
#[derive(Clone, Default)]
pub struct MockHttpTransport {
    responses: Arc<Mutex<VecDeque<Result<HttpResponse, TransportError>>>>,
    streaming_responses: Arc<Mutex<VecDeque<Result<StreamItems, TransportError>>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockHttpTransport {
    /// Create a new mock HTTP transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a response to be returned by the next `send`.
    pub fn enqueue_response(&self, response: Result<HttpResponse, TransportError>) {
        lock(&self.responses).push_back(response);
    }

    /// Enqueue a JSON response with the given status code and body.
    pub fn enqueue_json_response(&self, status: u16, body: &str) {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        self.enqueue_response(Ok(HttpResponse {
            status,
            headers,
            body: Bytes::from(body.to_string()),
        }));
    }

    /// Enqueue a transport error for the next `send`.
    pub fn enqueue_error(&self, error: TransportError) {
        self.enqueue_response(Err(error));
    }

    /// Enqueue a streaming body delivered as the given chunks.
    pub fn enqueue_streaming_response<I, S>(&self, chunks: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = chunks
            .into_iter()
            .map(|c| Ok(Bytes::from(c.into())))
            .collect();
        lock(&self.streaming_responses).push_back(Ok(items));
    }

    /// Enqueue a streaming body whose chunks may fail part way.
    pub fn enqueue_streaming_items(&self, items: Vec<Result<Bytes, TransportError>>) {
        lock(&self.streaming_responses).push_back(Ok(items));
    }

    /// Enqueue a failure of the next `send_streaming` call itself.
    pub fn enqueue_streaming_error(&self, error: TransportError) {
        lock(&self.streaming_responses).push_back(Err(error));
    }

    /// Get all requests that were made.
    pub fn get_requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    /// Get the last request that was made.
    pub fn last_request(&self) -> Option<HttpRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Body of the request at `index`, decoded as JSON.
    pub fn request_json(&self, index: usize) -> Option<serde_json::Value> {
        let requests = lock(&self.requests);
        let body = requests.get(index)?.body.as_ref()?;
        serde_json::from_slice(body).ok()
    }

    /// Verify that exactly `expected` requests were made.
    pub fn verify_request_count(&self, expected: usize) {
        let actual = lock(&self.requests).len();
        assert_eq!(actual, expected, "Expected {} requests, got {}", expected, actual);
    }

    /// Verify that a request URL ends with the given suffix.
    pub fn verify_url_suffix(&self, index: usize, suffix: &str) {
        let requests = lock(&self.requests);
        assert!(index < requests.len(), "No request at index {}", index);
        assert!(
            requests[index].url.ends_with(suffix),
            "Expected URL to end with '{}', got '{}'",
            suffix,
            requests[index].url
        );
    }

    /// Verify that a request carries a header with the given value.
    pub fn verify_header(&self, index: usize, header_name: &str, header_value: &str) {
        let requests = lock(&self.requests);
        assert!(index < requests.len(), "No request at index {}", index);
        assert_eq!(
            requests[index].headers.get(header_name).map(String::as_str),
            Some(header_value),
            "Header '{}' mismatch",
            header_name
        );
    }

    fn record(&self, request: HttpRequest) {
        lock(&self.requests).push(request);
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.record(request);
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Request("No mock response queued".to_string())))
    }

    async fn send_streaming(&self, request: HttpRequest) -> Result<ChunkedStream, TransportError> {
        self.record(request);
        let items = lock(&self.streaming_responses)
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Request("No mock stream queued".to_string())))?;
        Ok(Box::pin(stream::iter(items)))
    }
}

/// Token provider returning a fixed token or a fixed failure.
#[derive(Clone)]
pub struct MockTokenProvider {
    result: Result<String, AuthenticationError>,
    calls: Arc<Mutex<usize>>,
}

impl MockTokenProvider {
    /// Provider that always returns `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            result: Ok(token.into()),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Provider that always fails with `error`.
    pub fn failing(error: AuthenticationError) -> Self {
        Self {
            result: Err(error),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Number of tokens requested so far.
    pub fn call_count(&self) -> usize {
        *lock(&self.calls)
    }
}

#[async_trait]
impl TokenProvider for MockTokenProvider {
    async fn access_token(&self) -> Result<SecretString, AuthenticationError> {
        *lock(&self.calls) += 1;
        self.result.clone().map(SecretString::new)
    }
}
