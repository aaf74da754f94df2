use ratatui::text::Line;

use crate::icons::Icon;

/// Defines the different tabs available in the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabState {
    Chat,
    Settings,
    History,
    Data,
    Stats,
}

impl TabState {
    pub const COUNT: usize = 5;

    /// Label and icon of this tab
    pub fn label(&self) -> (Icon, &'static str) {
        match self {
            TabState::Chat => (Icon::MessageSquare, "Чат"),
            TabState::Settings => (Icon::Settings, "Настройки"),
            TabState::History => (Icon::History, "История"),
            TabState::Data => (Icon::Database, "Данные"),
            TabState::Stats => (Icon::BarChart, "Статистика"),
        }
    }

    /// Get tab titles, with a typing marker on the chat tab while a reply is pending
    pub fn titles(typing: bool) -> Vec<Line<'static>> {
        (0..Self::COUNT)
            .map(Self::from_index)
            .map(|tab| {
                let (icon, label) = tab.label();
                if tab == TabState::Chat && typing {
                    Line::from(format!("{} …", icon.prefix(label)))
                } else {
                    Line::from(icon.prefix(label))
                }
            })
            .collect()
    }

    /// Get the index of the current tab
    pub fn index(&self) -> usize {
        match self {
            TabState::Chat => 0,
            TabState::Settings => 1,
            TabState::History => 2,
            TabState::Data => 3,
            TabState::Stats => 4,
        }
    }

    /// Convert an index to a TabState
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => TabState::Chat,
            1 => TabState::Settings,
            2 => TabState::History,
            3 => TabState::Data,
            4 => TabState::Stats,
            _ => TabState::Chat, // Default
        }
    }

    pub fn next(&self) -> Self {
        Self::from_index((self.index() + 1) % Self::COUNT)
    }

    pub fn previous(&self) -> Self {
        Self::from_index((self.index() + Self::COUNT - 1) % Self::COUNT)
    }
}
