//! Streaming HTTP backend
//!
//! Sends each turn as a single `POST` with a UTF-8 JSON body and hands the
//! response body back as it arrives, chunk by chunk.

use std::time::Duration;

use futures::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;

use super::{ChatBackend, ChatRequest, ReplyStream};
use crate::config::EndpointConfig;
use crate::error::{ChatlineError, Result};

/// `Content-Type` sent with every request
pub const REQUEST_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// `Accept` sent with every request
pub const REPLY_ACCEPT: &str = "text/plain";

/// HTTP implementation of [`ChatBackend`]
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    endpoint: url::Url,
}

impl HttpBackend {
    /// Create a backend posting to `endpoint`
    ///
    /// `timeout` bounds the whole exchange including the streamed body;
    /// `connect_timeout` bounds connection setup only.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use chatline::backend::HttpBackend;
    ///
    /// let backend = HttpBackend::new(
    ///     url::Url::parse("http://localhost:8000/chat").unwrap(),
    ///     Duration::from_secs(120),
    ///     Duration::from_secs(10),
    /// )
    /// .unwrap();
    /// assert_eq!(backend.endpoint().as_str(), "http://localhost:8000/chat");
    /// ```
    pub fn new(endpoint: url::Url, timeout: Duration, connect_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(ChatlineError::Http)?;

        Ok(Self { client, endpoint })
    }

    /// Create a backend from validated endpoint configuration
    ///
    /// # Errors
    ///
    /// Returns [`ChatlineError::Config`] if the URL does not parse.
    pub fn from_config(config: &EndpointConfig) -> Result<Self> {
        let endpoint = config.parsed_url()?;
        Self::new(
            endpoint,
            Duration::from_secs(config.timeout_seconds),
            Duration::from_secs(config.connect_timeout_seconds),
        )
    }

    pub fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl ChatBackend for HttpBackend {
    async fn open_stream(&self, request: &ChatRequest) -> Result<ReplyStream> {
        let body = serde_json::to_vec(request)?;
        tracing::debug!(
            endpoint = %self.endpoint,
            history_len = request.history.len(),
            "Posting chat turn"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, REQUEST_CONTENT_TYPE)
            .header(ACCEPT, REPLY_ACCEPT)
            .body(body)
            .send()
            .await
            .map_err(|e| ChatlineError::Transport(describe_request_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatlineError::Transport(format!(
                "backend returned HTTP {}",
                status
            ))
            .into());
        }

        let stream = response.bytes_stream().map(|item| {
            item.map_err(|e| {
                anyhow::Error::from(ChatlineError::Transport(format!(
                    "reply stream interrupted: {}",
                    describe_request_error(&e)
                )))
            })
        });

        Ok(Box::pin(stream))
    }

    fn describe(&self) -> String {
        self.endpoint.to_string()
    }
}

fn describe_request_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("request timed out: {}", error)
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    }
}
