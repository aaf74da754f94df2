use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::chat::{ChatBackend, ChatSession};

/// Shortcut to create a spinner standing in for the typing indicator
macro_rules! typing_spinner {
    () => {
        ProgressBar::new_spinner().with_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .expect("Failed to set spinner template"),
        )
    };
}

/// Send one message without any history and return the assistant's reply.
pub async fn ask(backend: &dyn ChatBackend, message: &str, online: bool) -> Result<String> {
    let mut session = ChatSession::blank();
    session.set_input(message);

    let spinner = typing_spinner!();
    spinner.set_message("Помощник печатает...");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = session.send(backend, online).await;
    spinner.finish_and_clear();

    let reply = result?;
    debug!("Received reply {}", reply.id);

    Ok(reply.content.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::testing::{MockBackend, Scripted};

    #[tokio::test]
    async fn prints_the_reply() {
        let backend = MockBackend::reply("Hello, how are you?");
        let reply = ask(&backend, "Переведи на английский: Привет, как дела?", true)
            .await
            .unwrap();

        assert_eq!(reply, "Hello, how are you?");

        let requests = backend.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].history.is_empty());
        assert_eq!(requests[0].message, "Переведи на английский: Привет, как дела?");
        assert!(requests[0].online);
    }

    #[tokio::test]
    async fn greeting_is_not_sent_as_history() {
        let backend = MockBackend::reply("ok");
        ask(&backend, "Привет", false).await.unwrap();

        let requests = backend.requests.lock().unwrap();
        assert_eq!(requests[0].history, vec![]);
        assert!(!requests[0].online);
    }

    #[tokio::test]
    async fn errors_still_produce_text() {
        let backend = MockBackend::with(vec![Scripted::Status(500, Some("no key".into()))]);
        assert_eq!(ask(&backend, "x", false).await.unwrap(), "no key");
    }

    #[tokio::test]
    async fn blank_message_is_refused() {
        let backend = MockBackend::reply("unused");
        assert!(ask(&backend, "   ", true).await.is_err());
        assert_eq!(backend.calls(), 0);
    }
}
