//! Streaming chat session controller
//!
//! [`ChatController`] owns one [`Session`] and drives it: profile selection
//! resets the conversation, and [`ChatController::submit`] executes a turn
//! against the backend while streaming the reply to the observer.
//!
//! # Turn lifecycle
//!
//! ```text
//! Idle -> UserAppended -> Streaming -> Completed
//!                                  \-> Failed
//! ```
//!
//! The user message is recorded before any network I/O, so it survives a
//! failed turn. The assistant message is recorded only when the whole reply
//! has arrived. A failed turn leaves the session one message longer than
//! before, with no reply; the user resubmits to retry.
//!
//! `submit` takes `&mut self`, so only one turn per session can be in
//! flight. Dropping the `submit` future abandons the turn without appending
//! anything.

use std::sync::Arc;

use futures::StreamExt;

use crate::backend::{ChatBackend, ChatRequest};
use crate::decode::Utf8ChunkDecoder;
use crate::error::{ChatlineError, Result};
use crate::observer::{NoopObserver, SessionEvent, SessionObserver};
use crate::profile::{Profile, ProfileCatalog, TextDirection};
use crate::session::{Message, Session};

/// Position of the current turn in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    /// No turn has started since the session began
    Idle,
    /// The user message is recorded; the request is not sent yet
    UserAppended,
    /// The request is sent and the reply is streaming
    Streaming,
    /// The last turn stored its reply
    Completed,
    /// The last turn failed; no reply was stored
    Failed,
}

impl TurnPhase {
    /// True while a turn is between its start and its outcome
    pub fn in_flight(&self) -> bool {
        matches!(self, Self::UserAppended | Self::Streaming)
    }
}

/// Controller of a single chat session
pub struct ChatController {
    backend: Arc<dyn ChatBackend>,
    catalog: ProfileCatalog,
    session: Session,
    phase: TurnPhase,
    observer: Box<dyn SessionObserver>,
}

impl std::fmt::Debug for ChatController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatController")
            .field("backend", &self.backend)
            .field("session", &self.session)
            .field("phase", &self.phase)
            .finish()
    }
}

impl ChatController {
    /// Create a controller whose session starts on the catalog's default
    /// profile
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use chatline::backend::FakeBackend;
    /// use chatline::controller::ChatController;
    /// use chatline::profile::{Profile, ProfileCatalog, TextDirection};
    ///
    /// let catalog = ProfileCatalog::new(vec![
    ///     Profile::new("English", "id-en", TextDirection::Ltr),
    /// ])
    /// .unwrap();
    /// let controller = ChatController::new(Arc::new(FakeBackend::new()), catalog);
    /// assert_eq!(controller.active_profile().display_name(), "English");
    /// assert!(controller.messages().is_empty());
    /// ```
    pub fn new(backend: Arc<dyn ChatBackend>, catalog: ProfileCatalog) -> Self {
        let session = Session::new(catalog.default_profile().clone());
        Self {
            backend,
            catalog,
            session,
            phase: TurnPhase::Idle,
            observer: Box::new(NoopObserver),
        }
    }

    /// Create a controller starting on a named profile
    ///
    /// # Errors
    ///
    /// Returns [`ChatlineError::Config`] if the profile is unknown.
    pub fn with_profile(
        backend: Arc<dyn ChatBackend>,
        catalog: ProfileCatalog,
        display_name: &str,
    ) -> Result<Self> {
        let profile = catalog.require(display_name)?.clone();
        let mut controller = Self::new(backend, catalog);
        controller.session = Session::new(profile);
        Ok(controller)
    }

    /// Attach the observer that receives session events
    pub fn with_observer(mut self, observer: impl SessionObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn set_observer(&mut self, observer: Box<dyn SessionObserver>) {
        self.observer = observer;
    }

    pub fn catalog(&self) -> &ProfileCatalog {
        &self.catalog
    }

    pub fn active_profile(&self) -> &Profile {
        self.session.profile()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn messages(&self) -> &[Message] {
        self.session.messages()
    }

    pub fn transcript(&self) -> &[String] {
        self.session.transcript()
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn backend(&self) -> &Arc<dyn ChatBackend> {
        &self.backend
    }

    /// Select the active profile
    ///
    /// Selecting the active profile does nothing and returns `false`. Any
    /// other profile clears the conversation, becomes active, and returns
    /// `true`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatlineError::Config`] for an unknown profile; the session
    /// is left untouched.
    pub fn select_profile(&mut self, display_name: &str) -> Result<bool> {
        let profile = self.catalog.require(display_name)?;
        if profile.display_name() == self.session.profile().display_name() {
            tracing::debug!("Profile {} already active", profile.display_name());
            return Ok(false);
        }

        let profile = profile.clone();
        tracing::info!(
            from = %self.session.profile().display_name(),
            to = %profile.display_name(),
            cleared_messages = self.session.messages().len(),
            "Switching profile"
        );
        self.session.reset(profile);
        self.observer
            .on_event(&SessionEvent::ProfileChanged(self.session.profile()));
        Ok(true)
    }

    /// Execute one turn
    ///
    /// Records the user message, posts the query with the full transcript,
    /// streams the reply to the observer, and records the assistant message
    /// once the stream ends. Returns the complete reply.
    ///
    /// # Errors
    ///
    /// - [`ChatlineError::EmptyQuery`] for empty or whitespace-only input;
    ///   nothing is recorded.
    /// - [`ChatlineError::Transport`] if the request fails before or during
    ///   streaming; the user message stays recorded, no reply is stored.
    pub async fn submit(&mut self, query: &str) -> Result<String> {
        if query.trim().is_empty() {
            return Err(ChatlineError::EmptyQuery.into());
        }

        if self.phase.in_flight() {
            tracing::warn!(
                phase = ?self.phase,
                "Previous turn was abandoned before completion"
            );
        }

        self.session.push(Message::user(query));
        self.phase = TurnPhase::UserAppended;
        if let Some(message) = self.session.messages().last() {
            self.observer.on_event(&SessionEvent::MessageAppended(message));
        }

        let profile = self.session.profile();
        let request = ChatRequest {
            query: query.to_string(),
            unique_id: profile.backend_id().to_string(),
            history: self.session.transcript().to_vec(),
        };
        let direction = profile.text_direction();

        tracing::info!(
            profile = %profile.display_name(),
            history_len = request.history.len(),
            "Starting turn"
        );

        self.phase = TurnPhase::Streaming;
        self.observer
            .on_event(&SessionEvent::StreamStarted { direction });

        match self.stream_reply(&request, direction).await {
            Ok(reply) => {
                self.session.push(Message::assistant(reply.clone()));
                self.phase = TurnPhase::Completed;
                if let Some(message) = self.session.messages().last() {
                    self.observer.on_event(&SessionEvent::MessageAppended(message));
                }
                tracing::info!(reply_len = reply.len(), "Turn completed");
                Ok(reply)
            }
            Err(e) => {
                self.phase = TurnPhase::Failed;
                let error = e.to_string();
                tracing::warn!("Turn failed: {}", error);
                self.observer
                    .on_event(&SessionEvent::TurnFailed { error: &error });
                Err(e)
            }
        }
    }

    async fn stream_reply(
        &mut self,
        request: &ChatRequest,
        direction: TextDirection,
    ) -> Result<String> {
        let backend = Arc::clone(&self.backend);
        let mut stream = backend.open_stream(request).await?;

        let mut decoder = Utf8ChunkDecoder::new();
        let mut reply = String::new();
        let mut chunks = 0usize;

        while let Some(item) = stream.next().await {
            let bytes = item?;
            chunks += 1;
            let text = decoder.decode(&bytes);
            self.append_and_notify(&mut reply, &text, direction);
        }

        let tail = decoder.finish();
        self.append_and_notify(&mut reply, &tail, direction);

        if decoder.replaced() > 0 {
            tracing::debug!(
                replaced = decoder.replaced(),
                "Replaced invalid UTF-8 sequences in reply"
            );
        }
        tracing::debug!(chunks, "Reply stream finished");

        Ok(reply)
    }

    fn append_and_notify(&mut self, reply: &mut String, text: &str, direction: TextDirection) {
        if text.is_empty() {
            return;
        }
        reply.push_str(text);
        self.observer.on_event(&SessionEvent::StreamUpdated {
            chunk: text,
            accumulated: reply.as_str(),
            direction,
        });
    }
}
