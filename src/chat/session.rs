use thiserror::Error;
use tracing::{debug, info, warn};

use crate::structs::{
    dashboard::GREETING,
    message::{HistoryEntry, Message},
};

use super::{exchange, ChatBackend, ChatRequest};

/// Why a send did not start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendRejected {
    /// Input was empty after trimming -- not an error, just nothing to do
    #[error("Nothing to send")]
    Empty,

    /// A previous message is still waiting for its reply
    #[error("Still waiting for the previous reply")]
    Busy,
}

/// A request that left the session and still has to be answered.
#[derive(Debug, Clone)]
pub struct PendingSend {
    /// Session generation the reply belongs to
    pub generation: u64,
    pub request: ChatRequest,
}

/// Chat transcript plus the state of the input line.
///
/// States per send: idle -> awaiting (typing indicator on) -> resolved.
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<Message>,
    input: String,
    awaiting: bool,
    generation: u64,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// Start a conversation with the assistant's greeting
    pub fn new() -> Self {
        Self {
            messages: vec![Message::assistant(GREETING)],
            input: String::new(),
            awaiting: false,
            generation: 0,
        }
    }

    /// Start a conversation with nothing in it, so the first request has no history
    pub fn blank() -> Self {
        Self {
            messages: Vec::new(),
            ..Self::new()
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Whether the "assistant is typing" indicator should be shown
    pub fn is_typing(&self) -> bool {
        self.awaiting
    }

    /// Append the user's message and build the request for it.
    ///
    /// The history carries every message before the new one.
    pub fn begin_send(&mut self, online: bool) -> Result<PendingSend, SendRejected> {
        let text = self.input.trim();
        if text.is_empty() {
            return Err(SendRejected::Empty);
        }

        if self.awaiting {
            warn!("Ignoring send while the previous reply is pending");
            return Err(SendRejected::Busy);
        }

        let text = text.to_string();
        let history = self.messages.iter().map(HistoryEntry::from).collect();

        self.messages.push(Message::user(text.clone()));
        self.input.clear();
        self.awaiting = true;

        Ok(PendingSend {
            generation: self.generation,
            request: ChatRequest {
                message: text,
                history,
                online,
            },
        })
    }

    /// Append the assistant's reply for a pending send.
    ///
    /// Returns `false` if the reply belongs to a conversation that was cleared
    /// in the meantime; such replies are dropped.
    pub fn complete(&mut self, generation: u64, reply: impl Into<String>) -> bool {
        if generation != self.generation {
            debug!(
                "Dropping stale reply (generation {generation}, current {})",
                self.generation
            );
            return false;
        }

        self.messages.push(Message::assistant(reply));
        self.awaiting = false;
        true
    }

    /// Start over with a fresh conversation.
    ///
    /// Replies still in flight are discarded when they arrive.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.messages = vec![Message::assistant(GREETING)];
        self.awaiting = false;

        info!("Conversation cleared");
    }

    /// Run the whole flow in place: append, request, append the reply.
    pub async fn send(
        &mut self,
        backend: &dyn ChatBackend,
        online: bool,
    ) -> Result<&Message, SendRejected> {
        let pending = self.begin_send(online)?;
        let reply = exchange(backend, &pending.request).await;
        self.complete(pending.generation, reply);

        Ok(&self.messages[self.messages.len() - 1])
    }
}
