//! Blocking client for a text-embeddings HTTP endpoint.
//!
//! One POST per text with body `{"inputs": "<text>"}`; the response must be a
//! JSON vector (see `parse_embedding`). Transport errors and non-2xx statuses
//! become `EmbedFailure::Transport`, malformed bodies `EmbedFailure::Format`.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Serialize;
use tracing::debug;
use wikiembed_core::{EmbedFailure, Embedder, Embedding, Error, Result};

use crate::response::parse_embedding;
use crate::retry::RetryPolicy;

const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Clone)]
pub struct HttpEmbedder {
    client: Client,
    endpoint: String,
    retry: RetryPolicy,
    id: String,
}

impl HttpEmbedder {
    /// `timeout = None` keeps the transport's default request timeout.
    pub fn new(endpoint: &str, timeout: Option<Duration>, retry: RetryPolicy) -> Result<Self> {
        let endpoint = endpoint.trim().to_string();
        if endpoint.is_empty() {
            return Err(Error::InvalidConfig("embedding endpoint is empty".into()));
        }
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::InvalidConfig(format!("failed to build HTTP client: {e}")))?;
        let id = format!("http:{endpoint}");
        Ok(Self { client, endpoint, retry, id })
    }

    fn send_once(&self, text: &str) -> std::result::Result<Embedding, AttemptError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&EmbedRequest { inputs: text })
            .send()
            .map_err(|err| AttemptError::transport(is_retryable_error(&err), err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_else(|_| "<body unavailable>".to_string());
            let body: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            return Err(AttemptError::transport(should_retry(status), format!("HTTP {status}: {body}")));
        }

        let bytes = response
            .bytes()
            .map_err(|err| AttemptError::transport(is_retryable_error(&err), format!("failed to read response body: {err}")))?;
        let value: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|err| AttemptError::format(format!("response is not valid JSON: {err}")))?;
        parse_embedding(&value).map_err(|failure| AttemptError { retryable: false, failure })
    }
}

impl Embedder for HttpEmbedder {
    fn embedder_id(&self) -> &str { &self.id }

    fn embed(&self, text: &str) -> std::result::Result<Embedding, EmbedFailure> {
        let mut attempt = 1u32;
        loop {
            match self.send_once(text) {
                Ok(vector) => return Ok(vector),
                Err(err) if err.retryable && attempt < self.retry.max_attempts => {
                    let delay = self.retry.backoff(attempt);
                    debug!(attempt, ?delay, failure = %err.failure, "retrying embedding request");
                    thread::sleep(delay);
                    attempt += 1;
                }
                Err(err) => return Err(err.failure),
            }
        }
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a str,
}

struct AttemptError {
    retryable: bool,
    failure: EmbedFailure,
}

impl AttemptError {
    fn transport(retryable: bool, message: String) -> Self {
        Self { retryable, failure: EmbedFailure::Transport(message) }
    }

    fn format(message: String) -> Self {
        Self { retryable: false, failure: EmbedFailure::Format(message) }
    }
}

fn should_retry(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn is_retryable_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_body() || err.is_request()
}
