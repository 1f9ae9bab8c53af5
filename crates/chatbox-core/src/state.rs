//! UI-agnostic conversation state
//!
//! The transcript is owned by the controller and handed to whichever front end
//! draws it. Nothing in here knows about terminals or widgets.

use serde::{Deserialize, Serialize};

/// A single chat message. Never mutated once it is in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub origin: Origin,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            origin: Origin::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            origin: Origin::Assistant,
            text: text.into(),
        }
    }
}

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    User,
    Assistant,
}

impl Origin {
    /// Short label shown above the message body.
    pub fn label(&self) -> &'static str {
        match self {
            Origin::User => "You:",
            Origin::Assistant => "AI:",
        }
    }
}

/// Ordered, append-only list of messages.
///
/// `follow_tail` tells the view to keep the newest message on screen. It is set
/// by every append and cleared when the user scrolls away from the bottom.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    follow_tail: bool,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        self.follow_tail = true;
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn follows_tail(&self) -> bool {
        self.follow_tail
    }

    pub fn set_follow_tail(&mut self, follow: bool) {
        self.follow_tail = follow;
    }
}
