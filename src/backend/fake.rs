//! In-process fake backend for unit and integration tests
//!
//! [`FakeBackend`] replays scripted replies in FIFO order and records every
//! request it receives. It is cheap to clone; clones share the same script
//! and request log, so a test can keep one handle while the controller owns
//! another.
//!
//! When the script is exhausted, further turns get an empty reply.
//!
//! # Example
//!
//! ```
//! use chatline::backend::FakeBackend;
//!
//! let backend = FakeBackend::new();
//! backend.push_chunks(["He", "llo"]);
//! backend.push_connect_error("connection refused");
//! assert!(backend.requests().is_empty());
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use futures::stream;

use super::{ChatBackend, ChatRequest, ReplyStream};
use crate::error::{ChatlineError, Result};

/// One scripted reply
#[derive(Debug, Clone)]
pub enum FakeReply {
    /// Stream these chunks, then end normally
    Chunks(Vec<Bytes>),
    /// Fail before any byte is streamed
    ConnectError(String),
    /// Stream these chunks, then fail
    MidStreamError { chunks: Vec<Bytes>, error: String },
    /// Stream these chunks, then never finish
    Stall(Vec<Bytes>),
}

#[derive(Debug, Default)]
struct FakeState {
    script: VecDeque<FakeReply>,
    requests: Vec<ChatRequest>,
}

/// Scripted [`ChatBackend`] for tests
#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<FakeState>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply
    pub fn push(&self, reply: FakeReply) {
        self.lock().script.push_back(reply);
    }

    /// Queue a reply made of UTF-8 text chunks
    pub fn push_chunks<I, S>(&self, chunks: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(FakeReply::Chunks(to_bytes(chunks)));
    }

    /// Queue a reply made of raw byte chunks
    pub fn push_raw(&self, chunks: Vec<Vec<u8>>) {
        self.push(FakeReply::Chunks(
            chunks.into_iter().map(Bytes::from).collect(),
        ));
    }

    /// Queue a failure before streaming starts
    pub fn push_connect_error(&self, error: impl Into<String>) {
        self.push(FakeReply::ConnectError(error.into()));
    }

    /// Queue a reply that breaks after some chunks
    pub fn push_mid_stream_error<I, S>(&self, chunks: I, error: impl Into<String>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(FakeReply::MidStreamError {
            chunks: to_bytes(chunks),
            error: error.into(),
        });
    }

    /// Queue a reply that streams some chunks and then hangs
    pub fn push_stall<I, S>(&self, chunks: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(FakeReply::Stall(to_bytes(chunks)));
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.lock().requests.clone()
    }

    /// Number of scripted replies not yet consumed
    pub fn pending_replies(&self) -> usize {
        self.lock().script.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        // A poisoned lock only means another test thread panicked
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn to_bytes<I, S>(chunks: I) -> Vec<Bytes>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    chunks.into_iter().map(|c| Bytes::from(c.into())).collect()
}

#[async_trait::async_trait]
impl ChatBackend for FakeBackend {
    async fn open_stream(&self, request: &ChatRequest) -> Result<ReplyStream> {
        let reply = {
            let mut state = self.lock();
            state.requests.push(request.clone());
            state.script.pop_front()
        };

        match reply.unwrap_or(FakeReply::Chunks(Vec::new())) {
            FakeReply::Chunks(chunks) => Ok(Box::pin(stream::iter(
                chunks.into_iter().map(Ok::<Bytes, anyhow::Error>),
            ))),
            FakeReply::ConnectError(error) => Err(ChatlineError::Transport(error).into()),
            FakeReply::MidStreamError { chunks, error } => {
                let items: Vec<Result<Bytes>> = chunks
                    .into_iter()
                    .map(Ok)
                    .chain(std::iter::once(Err(ChatlineError::Transport(error).into())))
                    .collect();
                Ok(Box::pin(stream::iter(items)))
            }
            FakeReply::Stall(chunks) => {
                use futures::StreamExt;
                let head = stream::iter(chunks.into_iter().map(Ok::<Bytes, anyhow::Error>));
                Ok(Box::pin(head.chain(stream::pending())))
            }
        }
    }

    fn describe(&self) -> String {
        "fake backend".to_string()
    }
}
