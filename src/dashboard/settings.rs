use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
    widgets::{ListItem, ListState},
};

pub const VOICES: [&str; 3] = ["Мужской (Дмитрий)", "Женский (Алина)", "Нейтральный"];
pub const STYLES: [&str; 3] = ["Дружелюбный", "Профессиональный", "Краткий"];

/// Possible settings that can be modified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingType {
    Voice,
    SpeechRate,
    AutoLearning,
    KeepContext,
    SelfDevelopment,
    Proactivity,
    CommunicationStyle,
}

impl SettingType {
    pub fn label(&self) -> &'static str {
        match self {
            SettingType::Voice => "Голос помощника",
            SettingType::SpeechRate => "Скорость речи",
            SettingType::AutoLearning => "Автоматическое обучение",
            SettingType::KeepContext => "Сохранять контекст",
            SettingType::SelfDevelopment => "Режим саморазвития",
            SettingType::Proactivity => "Уровень проактивности",
            SettingType::CommunicationStyle => "Стиль общения",
        }
    }
}

/// Local form values. Nothing here leaves the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsValues {
    /// Index into [`VOICES`]
    pub voice: usize,

    /// Percent, `50..=150`
    pub speech_rate: u16,
    pub auto_learning: bool,
    pub keep_context: bool,
    pub self_development: bool,

    /// Percent, `0..=100`
    pub proactivity: u16,

    /// Index into [`STYLES`]
    pub style: usize,
}

impl Default for SettingsValues {
    fn default() -> Self {
        Self {
            voice: 0,
            speech_rate: 100,
            auto_learning: true,
            keep_context: true,
            self_development: true,
            proactivity: 70,
            style: 0,
        }
    }
}

/// Represents the current state of the settings tab
pub struct SettingsState {
    /// List of settings that can be modified
    pub items: Vec<SettingType>,

    /// Current selected setting
    pub state: ListState,

    pub values: SettingsValues,
}

impl Default for SettingsState {
    fn default() -> Self {
        let mut state = ListState::default();
        state.select(Some(0));

        Self {
            items: vec![
                SettingType::Voice,
                SettingType::SpeechRate,
                SettingType::AutoLearning,
                SettingType::KeepContext,
                SettingType::SelfDevelopment,
                SettingType::Proactivity,
                SettingType::CommunicationStyle,
            ],
            state,
            values: SettingsValues::default(),
        }
    }
}

impl SettingsState {
    /// Move the selection up
    pub fn previous(&mut self) {
        let i = match self.state.selected() {
            Some(0) | None => self.items.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    /// Move the selection down
    pub fn next(&mut self) {
        let i = match self.state.selected() {
            Some(i) if i + 1 < self.items.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn selected(&self) -> Option<SettingType> {
        self.state.selected().and_then(|i| self.items.get(i).copied())
    }

    /// Step the selected setting forward (`Right`) or backward (`Left`).
    ///
    /// Toggles flip regardless of direction.
    pub fn adjust(&mut self, forward: bool) {
        let Some(setting) = self.selected() else {
            return;
        };

        let values = &mut self.values;
        match setting {
            SettingType::Voice => values.voice = cycle(values.voice, VOICES.len(), forward),
            SettingType::SpeechRate => {
                values.speech_rate = step(values.speech_rate, 10, 50, 150, forward)
            }
            SettingType::AutoLearning => values.auto_learning = !values.auto_learning,
            SettingType::KeepContext => values.keep_context = !values.keep_context,
            SettingType::SelfDevelopment => values.self_development = !values.self_development,
            SettingType::Proactivity => {
                values.proactivity = step(values.proactivity, 10, 0, 100, forward)
            }
            SettingType::CommunicationStyle => {
                values.style = cycle(values.style, STYLES.len(), forward)
            }
        }

        tracing::debug!("Setting '{}' changed", setting.label());
    }

    fn display_value(&self, setting: SettingType) -> String {
        let values = &self.values;
        match setting {
            SettingType::Voice => VOICES[values.voice].to_string(),
            SettingType::SpeechRate => format!("{}%", values.speech_rate),
            SettingType::AutoLearning => on_off(values.auto_learning),
            SettingType::KeepContext => on_off(values.keep_context),
            SettingType::SelfDevelopment => on_off(values.self_development),
            SettingType::Proactivity => format!(
                "{}% ({})",
                values.proactivity,
                if values.proactivity >= 50 {
                    "Активный"
                } else {
                    "Пассивный"
                }
            ),
            SettingType::CommunicationStyle => STYLES[values.style].to_string(),
        }
    }
}

fn cycle(index: usize, len: usize, forward: bool) -> usize {
    if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    }
}

fn step(value: u16, by: u16, min: u16, max: u16, forward: bool) -> u16 {
    if forward {
        (value + by).min(max)
    } else {
        value.saturating_sub(by).max(min)
    }
}

fn on_off(value: bool) -> String {
    if value { "[x]" } else { "[ ]" }.to_string()
}

/// Build the list items of the settings form
pub fn render_settings(settings_state: &SettingsState) -> Vec<ListItem<'static>> {
    settings_state
        .items
        .iter()
        .map(|item| create_setting_item(item.label(), &settings_state.display_value(*item)))
        .collect()
}

/// Create a formatted setting item for the list
fn create_setting_item(name: &str, value: &str) -> ListItem<'static> {
    let name_span = Span::styled(name.to_string(), Style::default().fg(Color::Yellow));

    let value_span = Span::styled(format!(": {}", value), Style::default().fg(Color::White));

    ListItem::new(Line::from(vec![name_span, value_span]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_wraps_around() {
        let mut settings = SettingsState::default();
        settings.previous();
        assert_eq!(settings.selected(), Some(SettingType::CommunicationStyle));
        settings.next();
        assert_eq!(settings.selected(), Some(SettingType::Voice));
    }

    #[test]
    fn sliders_are_clamped() {
        let mut settings = SettingsState::default();
        settings.next();
        assert_eq!(settings.selected(), Some(SettingType::SpeechRate));

        for _ in 0..10 {
            settings.adjust(true);
        }
        assert_eq!(settings.values.speech_rate, 150);

        for _ in 0..20 {
            settings.adjust(false);
        }
        assert_eq!(settings.values.speech_rate, 50);
    }

    #[test]
    fn choices_cycle_and_toggles_flip() {
        let mut settings = SettingsState::default();
        settings.adjust(false);
        assert_eq!(VOICES[settings.values.voice], "Нейтральный");

        settings.next();
        settings.next();
        settings.adjust(true);
        assert!(!settings.values.auto_learning);
    }

    #[test]
    fn items_show_current_values() {
        let settings = SettingsState::default();
        let items = render_settings(&settings);
        assert_eq!(items.len(), 7);
        assert_eq!(settings.display_value(SettingType::Proactivity), "70% (Активный)");
    }
}
