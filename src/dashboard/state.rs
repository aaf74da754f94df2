use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, Result};
use ratatui::{prelude::CrosstermBackend, widgets::TableState, Terminal};
use tokio::{
    runtime::Handle,
    sync::{mpsc, watch},
};

use crate::{
    chat::{self, ChatBackend, ChatSession, PendingSend},
    connectivity::ConnectivityObserver,
    structs::{config::Config, dashboard::SeedData},
    utils::ui,
};

use super::{
    input::{self, Action},
    logging::LogManager,
    rendering,
    settings::SettingsState,
    status::StatusBar,
    tabs::TabState,
};

/// Reply coming back from a spawned chat request
#[derive(Debug, Clone)]
pub struct Reply {
    pub generation: u64,
    pub text: String,
}

/// Everything the dashboard shows, independent of the terminal
pub struct DashboardState {
    pub session: ChatSession,
    pub seed: SeedData,
    pub online: bool,

    // UI components state
    pub active_tab: TabState,
    pub settings: SettingsState,
    pub history_query: String,
    pub task_state: TableState,

    /// Transcript lines scrolled up from the bottom
    pub chat_scroll: u16,
    pub status_bar: StatusBar,
}

impl DashboardState {
    pub fn new(online: bool) -> Self {
        let mut task_state = TableState::default();
        task_state.select(Some(0));

        let mut state = Self {
            session: ChatSession::new(),
            seed: SeedData::default(),
            online,
            active_tab: TabState::Chat,
            settings: SettingsState::default(),
            history_query: String::new(),
            task_state,
            chat_scroll: 0,
            status_bar: StatusBar::new(),
        };
        state.refresh_status();
        state
    }

    /// Mirror the connectivity flag. Messages are left untouched.
    pub fn set_online(&mut self, online: bool) {
        self.online = online;
        self.refresh_status();
    }

    /// Start sending whatever is in the input line
    pub fn begin_send(&mut self) -> Option<PendingSend> {
        let pending = self.session.begin_send(self.online).ok()?;
        self.chat_scroll = 0;
        self.refresh_status();
        Some(pending)
    }

    pub fn apply_reply(&mut self, reply: Reply) {
        if self.session.complete(reply.generation, reply.text) {
            self.chat_scroll = 0;
        }
        self.refresh_status();
    }

    pub fn clear_conversation(&mut self) {
        self.session.reset();
        self.chat_scroll = 0;
        self.refresh_status();
    }

    pub fn refresh_status(&mut self) {
        self.status_bar
            .update_from(self.session.is_typing(), self.online);
    }
}

/// Main UI state container
pub struct DashboardUI {
    // Terminal and rendering
    pub terminal: Terminal<CrosstermBackend<std::io::Stdout>>,
    pub running: bool,
    pub tick_rate: Duration,

    pub state: DashboardState,
    pub logs: LogManager,

    // Chat plumbing
    pub backend: Arc<dyn ChatBackend>,
    pub handle: Handle,
    pub reply_sender: mpsc::UnboundedSender<Reply>,
    pub replies: mpsc::UnboundedReceiver<Reply>,

    // Connectivity
    pub connectivity: ConnectivityObserver,
    pub online: watch::Receiver<bool>,
}

impl DashboardUI {
    /// Run a single frame of the UI
    pub fn tick(&mut self) {
        self.logs.process_new_logs();

        while let Ok(reply) = self.replies.try_recv() {
            self.state.apply_reply(reply);
        }

        if self.online.has_changed().unwrap_or(false) {
            let online = *self.online.borrow_and_update();
            self.state.set_online(online);
        }

        let state = &self.state;
        let logs = &self.logs;
        if let Err(e) = self
            .terminal
            .draw(|f| rendering::render_ui(f, state, logs.latest_message()))
        {
            tracing::error!("Failed to render UI: {}", e);
        }

        match input::handle_input(&mut self.state, self.tick_rate) {
            Action::None => {}
            Action::Quit => self.running = false,
            Action::Send(pending) => self.spawn_send(pending),
            Action::ToggleConnectivity => {
                let event = self.connectivity.toggle();
                tracing::info!("Simulated {event} event");
            }
        }
    }

    /// Run the request on the runtime; the reply comes back through the channel
    fn spawn_send(&self, pending: PendingSend) {
        let backend = Arc::clone(&self.backend);
        let sender = self.reply_sender.clone();

        self.handle.spawn(async move {
            let text = chat::exchange(backend.as_ref(), &pending.request).await;

            // Receiver only goes away when the dashboard is closing
            let _ = sender.send(Reply {
                generation: pending.generation,
                text,
            });
        });
    }
}

/// Run the dashboard until the user quits.
///
/// Blocks the calling thread; call it from `block_in_place` inside the runtime.
pub fn run_ui(config: &Config, backend: Arc<dyn ChatBackend>, handle: Handle) -> Result<()> {
    // Set up tracing before the terminal takes over stdout
    let (log_sender, log_receiver) = std::sync::mpsc::channel();
    LogManager::setup_tracing(log_sender).map_err(|e| anyhow!(e))?;

    let terminal = ui::setup_terminal()?;

    let mut connectivity = ConnectivityObserver::new(true);
    connectivity.spawn_probe(&config.connectivity, &handle);
    let online = connectivity.subscribe();

    let (reply_sender, replies) = mpsc::unbounded_channel();

    let mut dashboard = DashboardUI {
        terminal,
        running: true,
        tick_rate: Duration::from_millis(config.ui.tick_rate),
        state: DashboardState::new(connectivity.is_online()),
        logs: LogManager::new(log_receiver),
        backend,
        handle,
        reply_sender,
        replies,
        connectivity,
        online,
    };

    let _ = dashboard.terminal.clear();

    tracing::info!("Dashboard started, chat endpoint: {}", config.chat.endpoint);

    // Main UI loop
    while dashboard.running {
        dashboard.tick();
    }

    ui::cleanup_terminal(&mut dashboard.terminal)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::message::Role;

    #[test]
    fn connectivity_changes_leave_messages_alone() {
        let mut state = DashboardState::new(true);
        state.session.set_input("Привет");
        let pending = state.begin_send().unwrap();
        state.apply_reply(Reply {
            generation: pending.generation,
            text: "Здравствуйте".into(),
        });

        let before: Vec<_> = state.session.messages().to_vec();
        state.set_online(false);
        state.set_online(true);
        state.set_online(false);

        assert_eq!(state.session.messages(), before.as_slice());
        assert!(!state.online);
    }

    #[test]
    fn requests_carry_the_connectivity_flag() {
        let mut state = DashboardState::new(true);
        state.set_online(false);
        state.session.set_input("offline question");

        let pending = state.begin_send().unwrap();
        assert!(!pending.request.online);
        assert_eq!(
            state.status_bar.status_type,
            super::super::status::StatusType::Typing
        );
    }

    #[test]
    fn reply_after_clear_is_discarded() {
        let mut state = DashboardState::new(true);
        state.session.set_input("question");
        let pending = state.begin_send().unwrap();

        state.clear_conversation();
        state.apply_reply(Reply {
            generation: pending.generation,
            text: "late".into(),
        });

        assert_eq!(state.session.messages().len(), 1);
        assert_eq!(state.session.messages()[0].role, Role::Assistant);
        assert!(!state.session.is_typing());
    }
}
