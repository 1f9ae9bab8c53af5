//! The chat widget controller
//!
//! Owns the transcript and the idle/awaiting state, and drives one submission
//! through: append user message, clear input, send, append reply.

use crate::backend::{ChatBackend, ChatRequest};
use crate::error::Result;
use crate::state::{Message, Origin, Transcript};

/// Shown in place of a reply whenever the exchange fails.
pub const FALLBACK_MESSAGE: &str = "Sorry, something went wrong. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerState {
    #[default]
    Idle,
    AwaitingReply,
}

/// Result of trying to submit the input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input was blank; nothing happened.
    Empty,
    /// A reply is still pending; the input was left as typed.
    Busy,
    /// The user message was appended and this request must now be sent.
    Dispatched(ChatRequest),
}

#[derive(Debug, Default)]
pub struct ChatController {
    transcript: Transcript,
    state: ControllerState,
}

impl ChatController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.state == ControllerState::AwaitingReply
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    /// Append a message and keep it in view.
    pub fn render_message(&mut self, text: impl Into<String>, origin: Origin) -> &Message {
        self.transcript.push(Message {
            origin,
            text: text.into(),
        })
    }

    /// First half of a submission, up to the point where the request goes out.
    ///
    /// On `Dispatched` the user message is already in the transcript and
    /// `input` is cleared. The caller must send the request and hand the result
    /// to [`settle`](Self::settle).
    pub fn begin_submission(&mut self, input: &mut String) -> SubmitOutcome {
        let text = input.trim();
        if text.is_empty() {
            return SubmitOutcome::Empty;
        }
        if self.is_awaiting_reply() {
            tracing::debug!("submission refused, reply still pending");
            return SubmitOutcome::Busy;
        }

        let text = text.to_string();
        self.render_message(text.clone(), Origin::User);
        input.clear();
        self.state = ControllerState::AwaitingReply;

        tracing::debug!(chars = text.chars().count(), "dispatching chat request");
        SubmitOutcome::Dispatched(ChatRequest { message: text })
    }

    /// Second half of a submission: render the reply, or the fallback message
    /// if the exchange failed.
    pub fn settle(&mut self, result: Result<String>) -> &Message {
        if !self.is_awaiting_reply() {
            tracing::warn!("settling a reply with no request in flight");
        }
        self.state = ControllerState::Idle;

        match result {
            Ok(reply) => {
                tracing::info!(chars = reply.chars().count(), "chat reply received");
                self.render_message(reply, Origin::Assistant)
            }
            Err(err) => {
                tracing::error!(error = %err, "chat request failed");
                self.render_message(FALLBACK_MESSAGE, Origin::Assistant)
            }
        }
    }

    /// Run a whole submission against `backend`, awaiting the reply inline.
    ///
    /// Failures never escape: they end up as the fallback message.
    pub async fn handle_submission<B>(&mut self, backend: &B, input: &mut String) -> SubmitOutcome
    where
        B: ChatBackend + ?Sized,
    {
        let outcome = self.begin_submission(input);
        if let SubmitOutcome::Dispatched(request) = &outcome {
            let result = backend.send(request).await;
            self.settle(result);
        }
        outcome
    }
}
