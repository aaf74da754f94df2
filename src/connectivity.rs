//! Online/offline tracking.
//!
//! The flag is relayed as-is: no buffering, no debouncing. It only annotates
//! outgoing chat requests and the header badge.

use std::{fmt::Display, sync::Arc, time::Duration};

use tokio::{net::TcpStream, runtime::Handle, sync::watch, task::JoinHandle, time};
use tracing::{debug, info};

use crate::structs::config::ConnectivityConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityEvent {
    Online,
    Offline,
}

impl ConnectivityEvent {
    pub fn from_online(online: bool) -> Self {
        if online {
            Self::Online
        } else {
            Self::Offline
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, Self::Online)
    }
}

impl Display for ConnectivityEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Online => write!(f, "online"),
            Self::Offline => write!(f, "offline"),
        }
    }
}

/// Owns the connectivity flag and the background probe feeding it.
///
/// Dropping the observer stops the probe.
pub struct ConnectivityObserver {
    sender: Arc<watch::Sender<bool>>,
    probe: Option<JoinHandle<()>>,
}

impl ConnectivityObserver {
    pub fn new(initial: bool) -> Self {
        let (sender, _) = watch::channel(initial);

        Self {
            sender: Arc::new(sender),
            probe: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.sender.subscribe()
    }

    pub fn is_online(&self) -> bool {
        *self.sender.borrow()
    }

    /// Apply a connectivity event, returns whether the flag changed.
    pub fn apply(&self, event: ConnectivityEvent) -> bool {
        publish(&self.sender, event)
    }

    /// Flip the flag, as if the opposite event had been received.
    pub fn toggle(&self) -> ConnectivityEvent {
        let event = ConnectivityEvent::from_online(!self.is_online());
        self.apply(event);
        event
    }

    /// Start probing `config.probe` every `config.interval` seconds.
    pub fn spawn_probe(&mut self, config: &ConnectivityConfig, handle: &Handle) {
        self.spawn_probe_with(
            config.probe.clone(),
            Duration::from_secs(config.interval.max(1)),
            Duration::from_millis(config.timeout),
            handle,
        );
    }

    fn spawn_probe_with(
        &mut self,
        address: String,
        interval: Duration,
        timeout: Duration,
        handle: &Handle,
    ) {
        if let Some(previous) = self.probe.take() {
            previous.abort();
        }

        let sender = Arc::clone(&self.sender);
        let mut last = self.is_online();

        debug!("Probing {address} every {}ms", interval.as_millis());

        self.probe = Some(handle.spawn(async move {
            loop {
                let online = probe(&address, timeout).await;

                // Only transitions of the probe itself are events
                if online != last {
                    last = online;
                    publish(&sender, ConnectivityEvent::from_online(online));
                }

                time::sleep(interval).await;
            }
        }));
    }
}

impl Drop for ConnectivityObserver {
    fn drop(&mut self) {
        if let Some(probe) = self.probe.take() {
            probe.abort();
        }
    }
}

fn publish(sender: &watch::Sender<bool>, event: ConnectivityEvent) -> bool {
    let changed = sender.send_if_modified(|online| {
        if *online == event.is_online() {
            return false;
        }
        *online = event.is_online();
        true
    });

    if changed {
        info!("Connection is now {event}");
    }

    changed
}

/// Whether a TCP connection to `address` can be opened within `timeout`.
pub async fn probe(address: &str, timeout: Duration) -> bool {
    matches!(
        time::timeout(timeout, TcpStream::connect(address)).await,
        Ok(Ok(_))
    )
}

#[cfg(test)]
mod tests {
    use tokio::net::TcpListener;

    use super::*;

    #[test]
    fn only_transitions_change_the_flag() {
        let observer = ConnectivityObserver::new(true);
        let receiver = observer.subscribe();

        assert!(!observer.apply(ConnectivityEvent::Online));
        assert!(!receiver.has_changed().unwrap());

        assert!(observer.apply(ConnectivityEvent::Offline));
        assert!(receiver.has_changed().unwrap());
        assert!(!observer.is_online());
    }

    #[test]
    fn toggle_flips_back_and_forth() {
        let observer = ConnectivityObserver::new(true);
        assert_eq!(observer.toggle(), ConnectivityEvent::Offline);
        assert_eq!(observer.toggle(), ConnectivityEvent::Online);
        assert!(observer.is_online());
    }

    #[tokio::test]
    async fn probe_sees_a_listening_socket() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();

        assert!(probe(&address, Duration::from_secs(1)).await);

        drop(listener);
        assert!(!probe(&address, Duration::from_secs(1)).await);
    }

    #[tokio::test]
    async fn probe_task_reports_transitions_and_stops_on_drop() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();

        let mut observer = ConnectivityObserver::new(false);
        let mut receiver = observer.subscribe();
        observer.spawn_probe_with(
            address,
            Duration::from_millis(10),
            Duration::from_millis(200),
            &Handle::current(),
        );

        time::timeout(Duration::from_secs(2), receiver.changed())
            .await
            .unwrap()
            .unwrap();
        assert!(*receiver.borrow_and_update());

        drop(listener);
        time::timeout(Duration::from_secs(2), receiver.changed())
            .await
            .unwrap()
            .unwrap();
        assert!(!*receiver.borrow_and_update());

        drop(observer);
        // Sender is gone once the probe task is aborted
        assert!(time::timeout(Duration::from_secs(2), receiver.changed())
            .await
            .unwrap()
            .is_err());
    }
}
