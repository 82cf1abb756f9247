//! Session events and observers
//!
//! The controller notifies a [`SessionObserver`] after every state change
//! so the presentation layer can redraw: a message appended, a streamed
//! chunk received, a failed turn, or a profile reset.

use std::sync::{Arc, Mutex};

use crate::profile::{Profile, TextDirection};
use crate::session::{Message, Role};

/// A state change reported by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent<'a> {
    /// A message was appended to the session
    MessageAppended(&'a Message),
    /// The request was sent and the reply is about to stream
    StreamStarted { direction: TextDirection },
    /// New reply text arrived; `accumulated` is everything received so far
    StreamUpdated {
        chunk: &'a str,
        accumulated: &'a str,
        direction: TextDirection,
    },
    /// The turn failed; the session holds the user message only
    TurnFailed { error: &'a str },
    /// The session was reset for another profile
    ProfileChanged(&'a Profile),
}

/// Receiver of [`SessionEvent`]s
pub trait SessionObserver: Send {
    fn on_event(&mut self, event: &SessionEvent<'_>);
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {
    fn on_event(&mut self, _event: &SessionEvent<'_>) {}
}

/// Owned copy of a [`SessionEvent`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedEvent {
    MessageAppended { role: Role, content: String },
    StreamStarted { direction: TextDirection },
    StreamUpdated {
        chunk: String,
        accumulated: String,
        direction: TextDirection,
    },
    TurnFailed { error: String },
    ProfileChanged { display_name: String },
}

impl From<&SessionEvent<'_>> for RecordedEvent {
    fn from(event: &SessionEvent<'_>) -> Self {
        match event {
            SessionEvent::MessageAppended(m) => Self::MessageAppended {
                role: m.role,
                content: m.content.clone(),
            },
            SessionEvent::StreamStarted { direction } => Self::StreamStarted {
                direction: *direction,
            },
            SessionEvent::StreamUpdated {
                chunk,
                accumulated,
                direction,
            } => Self::StreamUpdated {
                chunk: chunk.to_string(),
                accumulated: accumulated.to_string(),
                direction: *direction,
            },
            SessionEvent::TurnFailed { error } => Self::TurnFailed {
                error: error.to_string(),
            },
            SessionEvent::ProfileChanged(p) => Self::ProfileChanged {
                display_name: p.display_name().to_string(),
            },
        }
    }
}

/// Observer that records every event, for tests
///
/// Clones share the same log.
///
/// # Examples
///
/// ```
/// use chatline::observer::{RecordingObserver, SessionEvent, SessionObserver};
/// use chatline::profile::TextDirection;
///
/// let recorder = RecordingObserver::new();
/// let mut handle = recorder.clone();
/// handle.on_event(&SessionEvent::StreamStarted { direction: TextDirection::Ltr });
/// assert_eq!(recorder.events().len(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<RecordedEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events
            .lock()
            .map(|e| e.clone())
            .unwrap_or_else(|e| e.into_inner().clone())
    }

    /// The `accumulated` text of every stream update, in order
    pub fn stream_states(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                RecordedEvent::StreamUpdated { accumulated, .. } => Some(accumulated),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl SessionObserver for RecordingObserver {
    fn on_event(&mut self, event: &SessionEvent<'_>) {
        if let Ok(mut events) = self.events.lock() {
            events.push(RecordedEvent::from(event));
        }
    }
}
