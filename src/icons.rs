//! Symbolic icon names and the terminal glyphs drawn for them.

use std::str::FromStr;

/// Glyph drawn for names we don't know about.
pub const FALLBACK_GLYPH: &str = "•";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Award,
    BarChart,
    Bot,
    Brain,
    Calendar,
    CheckCircle,
    Circle,
    Clock,
    Crown,
    Database,
    File,
    FolderOpen,
    History,
    ListTodo,
    MessageCircle,
    MessageSquare,
    Mic,
    Search,
    Send,
    Settings,
    Target,
    Trash,
    TrendingUp,
    Upload,
    User,
    Wifi,
    WifiOff,
    Zap,
}

impl Icon {
    pub const ALL: [Icon; 28] = [
        Icon::Award,
        Icon::BarChart,
        Icon::Bot,
        Icon::Brain,
        Icon::Calendar,
        Icon::CheckCircle,
        Icon::Circle,
        Icon::Clock,
        Icon::Crown,
        Icon::Database,
        Icon::File,
        Icon::FolderOpen,
        Icon::History,
        Icon::ListTodo,
        Icon::MessageCircle,
        Icon::MessageSquare,
        Icon::Mic,
        Icon::Search,
        Icon::Send,
        Icon::Settings,
        Icon::Target,
        Icon::Trash,
        Icon::TrendingUp,
        Icon::Upload,
        Icon::User,
        Icon::Wifi,
        Icon::WifiOff,
        Icon::Zap,
    ];

    /// Symbolic name, as used in configuration and seed data
    pub fn name(&self) -> &'static str {
        match self {
            Icon::Award => "Award",
            Icon::BarChart => "BarChart3",
            Icon::Bot => "Bot",
            Icon::Brain => "Brain",
            Icon::Calendar => "Calendar",
            Icon::CheckCircle => "CheckCircle",
            Icon::Circle => "Circle",
            Icon::Clock => "Clock",
            Icon::Crown => "Crown",
            Icon::Database => "Database",
            Icon::File => "File",
            Icon::FolderOpen => "FolderOpen",
            Icon::History => "History",
            Icon::ListTodo => "ListTodo",
            Icon::MessageCircle => "MessageCircle",
            Icon::MessageSquare => "MessageSquare",
            Icon::Mic => "Mic",
            Icon::Search => "Search",
            Icon::Send => "Send",
            Icon::Settings => "Settings",
            Icon::Target => "Target",
            Icon::Trash => "Trash2",
            Icon::TrendingUp => "TrendingUp",
            Icon::Upload => "Upload",
            Icon::User => "User",
            Icon::Wifi => "Wifi",
            Icon::WifiOff => "WifiOff",
            Icon::Zap => "Zap",
        }
    }

    /// Single-width glyph drawn in the terminal
    pub fn glyph(&self) -> &'static str {
        match self {
            Icon::Award => "✪",
            Icon::BarChart => "▥",
            Icon::Bot => "◉",
            Icon::Brain => "✺",
            Icon::Calendar => "▦",
            Icon::CheckCircle => "✔",
            Icon::Circle => "○",
            Icon::Clock => "◷",
            Icon::Crown => "♛",
            Icon::Database => "≣",
            Icon::File => "▤",
            Icon::FolderOpen => "▭",
            Icon::History => "↺",
            Icon::ListTodo => "☰",
            Icon::MessageCircle => "◌",
            Icon::MessageSquare => "▢",
            Icon::Mic => "♪",
            Icon::Search => "⌕",
            Icon::Send => "➤",
            Icon::Settings => "⚙",
            Icon::Target => "◎",
            Icon::Trash => "✕",
            Icon::TrendingUp => "↗",
            Icon::Upload => "↑",
            Icon::User => "◆",
            Icon::Wifi => "≋",
            Icon::WifiOff => "≠",
            Icon::Zap => "ϟ",
        }
    }

    /// Glyph followed by a space, ready to prefix a label
    pub fn prefix(&self, label: &str) -> String {
        format!("{} {label}", self.glyph())
    }
}

impl FromStr for Icon {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Icon::ALL
            .iter()
            .copied()
            .find(|icon| icon.name() == s)
            .ok_or(())
    }
}

/// Glyph for a symbolic name, or [`FALLBACK_GLYPH`] if it is unknown.
pub fn render(name: &str) -> &'static str {
    name.parse::<Icon>()
        .map(|icon| icon.glyph())
        .unwrap_or(FALLBACK_GLYPH)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn names_round_trip() {
        for icon in Icon::ALL {
            assert_eq!(icon.name().parse::<Icon>(), Ok(icon));
        }
    }

    #[test]
    fn glyphs_are_distinct() {
        let glyphs: HashSet<_> = Icon::ALL.iter().map(Icon::glyph).collect();
        assert_eq!(glyphs.len(), Icon::ALL.len());
    }

    #[test]
    fn unknown_names_fall_back() {
        assert_eq!(render("Wifi"), "≋");
        assert_eq!(render("Sparkles"), FALLBACK_GLYPH);
    }
}
