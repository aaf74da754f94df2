use std::sync::mpsc;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::{layer::SubscriberExt, registry::LookupSpan, Layer};

/// How many lines the dashboard keeps around
const MAX_LOG_LINES: usize = 200;

/// Custom layer to capture logs for our UI, since stdout belongs to the terminal
pub struct UiLogLayer {
    pub sender: mpsc::Sender<String>,
}

impl<S> Layer<S> for UiLogLayer
where
    S: tracing::Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = LogVisitor::default();
        event.record(&mut visitor);

        let now = chrono::Local::now().format("%H:%M:%S");
        let level = event.metadata().level();

        let log_message = format!(
            "[{now}] [{level}]: {}",
            visitor
                .message
                .unwrap_or_else(|| String::from("<no message>"))
        );

        // The dashboard may already be gone during shutdown
        let _ = self.sender.send(log_message);
    }
}

/// Visitor to extract the message from the event
#[derive(Default)]
pub struct LogVisitor {
    pub message: Option<String>,
}

impl tracing::field::Visit for LogVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" && self.message.is_none() {
            self.message = Some(format!("{:?}", value));
        }
    }
}

/// Log management
pub struct LogManager {
    /// Newest first
    pub messages: Vec<String>,
    pub receiver: mpsc::Receiver<String>,
}

impl LogManager {
    pub fn new(receiver: mpsc::Receiver<String>) -> Self {
        Self {
            messages: Vec::new(),
            receiver,
        }
    }

    /// Process any new log messages
    pub fn process_new_logs(&mut self) {
        while let Ok(message) = self.receiver.try_recv() {
            self.messages.insert(0, message);
            self.messages.truncate(MAX_LOG_LINES);
        }
    }

    /// Get the most recent log message, if any
    pub fn latest_message(&self) -> Option<&str> {
        self.messages.first().map(String::as_str)
    }

    /// Route all tracing events to the dashboard
    pub fn setup_tracing(sender: mpsc::Sender<String>) -> Result<(), SetGlobalDefaultError> {
        let subscriber = tracing_subscriber::registry()
            .with(UiLogLayer { sender })
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(crate::logger::DEFAULT_FILTER)
                }),
            );

        tracing::subscriber::set_global_default(subscriber)
    }
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::layer::SubscriberExt;

    use super::*;

    #[test]
    fn events_reach_the_manager_newest_first() {
        let (sender, receiver) = mpsc::channel();
        let mut logs = LogManager::new(receiver);

        let subscriber = tracing_subscriber::registry().with(UiLogLayer { sender });
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("first");
            tracing::warn!("second {}", 2);
        });

        logs.process_new_logs();
        assert_eq!(logs.messages.len(), 2);

        let latest = logs.latest_message().unwrap();
        assert!(latest.contains("[WARN]"));
        assert!(latest.ends_with("second 2"));
    }

    #[test]
    fn keeps_a_bounded_backlog() {
        let (sender, receiver) = mpsc::channel();
        let mut logs = LogManager::new(receiver);

        for i in 0..(MAX_LOG_LINES + 50) {
            sender.send(i.to_string()).unwrap();
        }
        logs.process_new_logs();

        assert_eq!(logs.messages.len(), MAX_LOG_LINES);
        assert_eq!(logs.latest_message(), Some("249"));
    }
}
