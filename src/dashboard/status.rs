use ratatui::style::Color;
use std::time::Instant;

/// Status types for the status bar with color coding
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusType {
    Ready,
    Typing,
    Offline,
}

impl StatusType {
    /// Get the appropriate color for this status type
    pub fn color(&self) -> Color {
        match self {
            StatusType::Ready => Color::Green,
            StatusType::Typing => Color::Yellow,
            StatusType::Offline => Color::Red,
        }
    }
}

/// Status bar state information
pub struct StatusBar {
    pub message: String,
    pub status_type: StatusType,

    /// When the current status was entered
    pub start_time: Instant,
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBar {
    /// Create a new status bar with default values
    pub fn new() -> Self {
        Self {
            message: "Готов к работе".to_string(),
            status_type: StatusType::Ready,
            start_time: Instant::now(),
        }
    }

    /// Update the status message and type.
    ///
    /// The timer only restarts when the status actually changes.
    pub fn update(&mut self, message: &str, status_type: StatusType) {
        if self.status_type != status_type || self.message != message {
            self.message = message.to_string();
            self.status_type = status_type;
            self.start_time = Instant::now();
        }
    }

    /// Derive the status from the chat and connection state
    pub fn update_from(&mut self, typing: bool, online: bool) {
        if typing {
            self.update("Помощник печатает...", StatusType::Typing);
        } else if !online {
            self.update("Оффлайн: автономный режим", StatusType::Offline);
        } else {
            self.update("Готов к работе", StatusType::Ready);
        }
    }
}
