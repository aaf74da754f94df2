pub mod backend;
pub mod session;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::structs::{errors::ChatError, message::HistoryEntry};

pub use backend::{ChatBackend, HttpBackend};
pub use session::{ChatSession, PendingSend};

/// Shown when the endpoint failed without telling us why.
pub const FALLBACK_ERROR: &str = "Извините, произошла ошибка. Попробуйте ещё раз.";

/// Shown when the request could not complete at all.
pub const UNREACHABLE: &str =
    "Не удалось связаться с сервером. Проверьте подключение к интернету.";

/// Body of the outbound POST
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<HistoryEntry>,
    pub online: bool,
}

/// Body returned by the endpoint.
///
/// Either field may be missing; anything else in the body is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub error: Option<String>,
}

/// Turn the outcome of a request into the text of the assistant bubble.
pub fn reply_text(outcome: Result<ChatResponse, ChatError>) -> String {
    match outcome {
        Ok(ChatResponse {
            message: Some(message),
            ..
        }) => message,
        Ok(ChatResponse { error, .. }) => {
            warn!("Chat endpoint answered without a message");
            error.unwrap_or_else(|| FALLBACK_ERROR.to_string())
        }
        Err(ChatError::Server { status, message }) => {
            warn!("Chat endpoint returned status {status}");
            message.unwrap_or_else(|| FALLBACK_ERROR.to_string())
        }
        Err(ChatError::Unreachable(e)) => {
            warn!("Chat endpoint unreachable: {e}");
            UNREACHABLE.to_string()
        }
        Err(e) => {
            warn!("Chat request failed: {e}");
            FALLBACK_ERROR.to_string()
        }
    }
}

/// Perform one request and produce the assistant's reply text.
///
/// Never fails: every error becomes a visible message.
pub async fn exchange(backend: &dyn ChatBackend, request: &ChatRequest) -> String {
    debug!(
        "Sending message with {} history entries (online: {})",
        request.history.len(),
        request.online
    );

    reply_text(backend.send(request).await)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::{collections::VecDeque, sync::Mutex};

    use async_trait::async_trait;

    use super::*;

    /// Scripted outcome of a mocked request
    pub enum Scripted {
        Reply(ChatResponse),
        Status(u16, Option<String>),
        Unreachable,
    }

    /// Backend answering from a script and recording what it was sent.
    #[derive(Default)]
    pub struct MockBackend {
        script: Mutex<VecDeque<Scripted>>,
        pub requests: Mutex<Vec<ChatRequest>>,
    }

    impl MockBackend {
        pub fn with(script: Vec<Scripted>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn reply(message: &str) -> Self {
            Self::with(vec![Scripted::Reply(ChatResponse {
                message: Some(message.to_string()),
                error: None,
            })])
        }

        pub fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    /// A real transport error: nothing listens on port 9 of localhost.
    async fn transport_error() -> reqwest::Error {
        reqwest::Client::new()
            .post("http://127.0.0.1:9/")
            .send()
            .await
            .unwrap_err()
    }

    #[async_trait]
    impl ChatBackend for MockBackend {
        async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
            self.requests.lock().unwrap().push(request.clone());
            let next = self.script.lock().unwrap().pop_front();

            match next {
                Some(Scripted::Reply(response)) => Ok(response),
                Some(Scripted::Status(status, message)) => {
                    Err(ChatError::Server { status, message })
                }
                Some(Scripted::Unreachable) | None => {
                    Err(ChatError::Unreachable(transport_error().await))
                }
            }
        }
    }
}
