//! Conversation state of a single chat session
//!
//! A [`Session`] holds the active [`Profile`], the ordered messages shown to
//! the user, and a separate plain-text transcript that is sent to the
//! backend as conversational context on every turn. Both lists are
//! append-only and are cleared together when the profile changes.

use crate::profile::Profile;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Prefix used for this role in transcript entries
    pub fn transcript_label(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A displayed chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Creates a user message
    ///
    /// # Examples
    ///
    /// ```
    /// use chatline::session::{Message, Role};
    ///
    /// let msg = Message::user("hello");
    /// assert_eq!(msg.role, Role::User);
    /// assert_eq!(msg.transcript_entry(), "User: hello");
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Renders this message as a backend-facing transcript line
    pub fn transcript_entry(&self) -> String {
        format!("{}: {}", self.role.transcript_label(), self.content)
    }
}

/// Mutable aggregate of one user's conversation
#[derive(Debug, Clone)]
pub struct Session {
    profile: Profile,
    messages: Vec<Message>,
    transcript: Vec<String>,
}

impl Session {
    /// Creates an empty session bound to a profile
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            messages: Vec::new(),
            transcript: Vec::new(),
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// Number of completed user/assistant exchanges
    pub fn completed_turns(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == Role::Assistant)
            .count()
    }

    /// True when the last message is a user message with no reply
    ///
    /// This is the state left behind by a failed turn.
    pub fn awaiting_reply(&self) -> bool {
        matches!(self.messages.last(), Some(m) if m.role == Role::User)
    }

    /// Appends a message and its transcript line
    pub fn push(&mut self, message: Message) {
        self.transcript.push(message.transcript_entry());
        self.messages.push(message);
    }

    /// Clears both lists and binds the session to a new profile
    pub fn reset(&mut self, profile: Profile) {
        self.messages.clear();
        self.transcript.clear();
        self.profile = profile;
    }
}
