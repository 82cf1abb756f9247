//! Chat backend abstraction and implementations
//!
//! This module defines the [`ChatBackend`] trait used by the session
//! controller to send one turn to the remote chat service and receive the
//! reply as a stream of raw byte chunks. Implementations:
//!
//! - [`http::HttpBackend`] -- streaming HTTP POST against the configured
//!   endpoint.
//! - [`fake::FakeBackend`] -- scripted in-process backend used in tests.
//!
//! # Wire contract
//!
//! The request body is the JSON form of [`ChatRequest`]:
//!
//! ```text
//! {"query": "...", "unique_id": "...", "history": ["User: ...", "Assistant: ..."]}
//! ```
//!
//! The reply body is plain text with no framing. Chunks are concatenated in
//! arrival order; the end of the stream is the end of the reply.

use std::pin::Pin;

use bytes::Bytes;
use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod fake;
pub mod http;

pub use fake::FakeBackend;
pub use http::HttpBackend;

/// Stream of raw reply chunks
///
/// An `Err` item means the transport failed mid-stream; no further items
/// follow it.
pub type ReplyStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Payload of one turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The text the user just submitted
    pub query: String,
    /// Routing identifier of the active profile
    pub unique_id: String,
    /// Transcript lines, including the entry for `query`
    pub history: Vec<String>,
}

/// Abstraction over chat backend implementations
///
/// # Examples
///
/// ```
/// use chatline::backend::{ChatBackend, ChatRequest, FakeBackend};
///
/// # #[tokio::main]
/// # async fn main() -> chatline::error::Result<()> {
/// use futures::StreamExt;
///
/// let backend = FakeBackend::new();
/// backend.push_chunks(["Hi", "!"]);
///
/// let request = ChatRequest {
///     query: "hello".to_string(),
///     unique_id: "id-en".to_string(),
///     history: vec!["User: hello".to_string()],
/// };
/// let mut stream = backend.open_stream(&request).await?;
/// let mut reply = Vec::new();
/// while let Some(chunk) = stream.next().await {
///     reply.extend_from_slice(&chunk?);
/// }
/// assert_eq!(reply, b"Hi!");
/// # Ok(())
/// # }
/// ```
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync + std::fmt::Debug {
    /// Send a turn and return the streamed reply body
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ChatlineError::Transport`] if the request
    /// cannot be delivered or the backend answers with an error status.
    async fn open_stream(&self, request: &ChatRequest) -> Result<ReplyStream>;

    /// Human-readable description of where requests go
    fn describe(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_wire_format() {
        let request = ChatRequest {
            query: "hello".to_string(),
            unique_id: "id-en".to_string(),
            history: vec!["User: hello".to_string()],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "query": "hello",
                "unique_id": "id-en",
                "history": ["User: hello"]
            })
        );
    }

    #[test]
    fn test_chat_request_keeps_non_ascii_verbatim() {
        let request = ChatRequest {
            query: "مرحبا".to_string(),
            unique_id: "id-ar".to_string(),
            history: vec!["User: مرحبا".to_string()],
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("مرحبا"));
        let back: ChatRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);
    }
}
