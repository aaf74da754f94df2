use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::chat::PendingSend;

use super::state::DashboardState;
use super::tabs::TabState;

/// What the dashboard loop has to do after a key press
#[derive(Debug)]
pub enum Action {
    None,
    Quit,
    Send(PendingSend),
    ToggleConnectivity,
}

/// Poll for one terminal event and turn it into an action.
///
/// Waits at most `timeout` so the loop keeps redrawing.
pub fn handle_input(state: &mut DashboardState, timeout: Duration) -> Action {
    if !event::poll(timeout).unwrap_or(false) {
        return Action::None;
    }

    match event::read() {
        Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => handle_key(state, key),
        _ => Action::None,
    }
}

/// Handle keyboard inputs in the UI
pub fn handle_key(state: &mut DashboardState, key: KeyEvent) -> Action {
    // Global bindings first
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => return Action::Quit,
        (KeyCode::Char('o'), KeyModifiers::CONTROL) => return Action::ToggleConnectivity,
        (KeyCode::Tab, _) => {
            state.active_tab = state.active_tab.next();
            return Action::None;
        }
        (KeyCode::BackTab, _) => {
            state.active_tab = state.active_tab.previous();
            return Action::None;
        }
        (KeyCode::Char(c @ '1'..='5'), KeyModifiers::ALT) => {
            state.active_tab = TabState::from_index(c as usize - '1' as usize);
            return Action::None;
        }
        _ => {}
    }

    match state.active_tab {
        TabState::Chat => handle_chat_key(state, key),
        TabState::Settings => handle_settings_key(state, key),
        TabState::History => handle_history_key(state, key),
        TabState::Data => handle_data_key(state, key),
        TabState::Stats => match key.code {
            KeyCode::Esc => Action::Quit,
            _ => Action::None,
        },
    }
}

fn handle_chat_key(state: &mut DashboardState, key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('l'), KeyModifiers::CONTROL) => {
            state.clear_conversation();
            Action::None
        }
        (KeyCode::Enter, _) => match state.begin_send() {
            Some(pending) => Action::Send(pending),
            None => Action::None,
        },
        (KeyCode::Backspace, _) => {
            state.session.backspace();
            Action::None
        }
        (KeyCode::Up, _) => {
            state.chat_scroll = state.chat_scroll.saturating_add(1);
            Action::None
        }
        (KeyCode::Down, _) => {
            state.chat_scroll = state.chat_scroll.saturating_sub(1);
            Action::None
        }
        (KeyCode::PageUp, _) => {
            state.chat_scroll = state.chat_scroll.saturating_add(10);
            Action::None
        }
        (KeyCode::PageDown, _) => {
            state.chat_scroll = state.chat_scroll.saturating_sub(10);
            Action::None
        }
        (KeyCode::Esc, _) => Action::Quit,
        (KeyCode::Char(c), modifiers) if !modifiers.contains(KeyModifiers::CONTROL) => {
            state.session.push_char(c);
            Action::None
        }
        _ => Action::None,
    }
}

fn handle_settings_key(state: &mut DashboardState, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Up => state.settings.previous(),
        KeyCode::Down => state.settings.next(),
        KeyCode::Right | KeyCode::Char(' ') | KeyCode::Enter => state.settings.adjust(true),
        KeyCode::Left => state.settings.adjust(false),
        KeyCode::Esc => return Action::Quit,
        _ => {}
    }

    Action::None
}

fn handle_history_key(state: &mut DashboardState, key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) if state.history_query.is_empty() => return Action::Quit,
        (KeyCode::Esc, _) => state.history_query.clear(),
        (KeyCode::Backspace, _) => {
            state.history_query.pop();
        }
        (KeyCode::Char(c), modifiers) if !modifiers.contains(KeyModifiers::CONTROL) => {
            state.history_query.push(c)
        }
        _ => {}
    }

    Action::None
}

fn handle_data_key(state: &mut DashboardState, key: KeyEvent) -> Action {
    let len = state.seed.tasks.len();

    match key.code {
        KeyCode::Down if len > 0 => {
            let next = match state.task_state.selected() {
                Some(i) if i + 1 < len => i + 1,
                _ => 0,
            };
            state.task_state.select(Some(next));
        }
        KeyCode::Up if len > 0 => {
            let previous = match state.task_state.selected() {
                Some(0) | None => len - 1,
                Some(i) => i - 1,
            };
            state.task_state.select(Some(previous));
        }
        KeyCode::Esc => return Action::Quit,
        _ => {}
    }

    Action::None
}
