//! Static data shown on the dashboard tabs.
//!
//! None of these collections are mutated while the dashboard runs.

use std::fmt::Display;

use chrono::{NaiveDate, NaiveDateTime};

/// Opening message of every chat session.
pub const GREETING: &str = "Здравствуйте! Я ваш виртуальный помощник. Готов помочь вам с любыми задачами. Сейчас я в режиме обучения и накапливаю знания для автономной работы.";

// TaskStatus represents whether the assistant already handled a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "В процессе"),
            Self::Completed => write!(f, "Выполнено"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct DataFile {
    pub id: String,
    pub name: String,

    /// Human readable size, e.g. `2.4 MB`
    pub size: String,
    pub uploaded_at: NaiveDate,
}

/// Fixed usage snapshot; not derived from the chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub total_messages: u32,
    pub tasks_completed: u32,

    /// Percentage, `0..=100`
    pub learning_progress: u16,
    pub uptime: String,
}

#[derive(Debug, Clone)]
pub struct HistoryItem {
    pub date: String,
    pub topic: String,
    pub messages: u32,
}

#[derive(Debug, Clone)]
pub struct DailyActivity {
    pub day: String,

    /// Percentage, `0..=100`
    pub value: u16,
}

#[derive(Debug, Clone)]
pub struct Achievement {
    pub title: String,

    /// Symbolic icon name, see [`crate::icons`]
    pub icon: String,
    pub unlocked: bool,
}

/// Everything the non-chat tabs display.
#[derive(Debug, Clone)]
pub struct SeedData {
    pub tasks: Vec<Task>,
    pub files: Vec<DataFile>,
    pub stats: StatsSnapshot,
    pub history: Vec<HistoryItem>,
    pub activity: Vec<DailyActivity>,
    pub achievements: Vec<Achievement>,
}

fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .unwrap_or_default()
}

fn task(id: &str, title: &str, status: TaskStatus, created_at: NaiveDateTime) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        status,
        created_at,
    }
}

fn file(id: &str, name: &str, size: &str, uploaded_at: NaiveDateTime) -> DataFile {
    DataFile {
        id: id.to_string(),
        name: name.to_string(),
        size: size.to_string(),
        uploaded_at: uploaded_at.date(),
    }
}

impl Default for SeedData {
    fn default() -> Self {
        Self {
            tasks: vec![
                task("1", "Напомнить о встрече в 15:00", TaskStatus::Completed, at(2024, 11, 30, 10)),
                task("2", "Проверить почту каждые 30 минут", TaskStatus::Pending, at(2024, 11, 30, 11)),
                task("3", "Создать отчет по итогам дня", TaskStatus::Pending, at(2024, 11, 30, 12)),
            ],
            files: vec![
                file("1", "База знаний.pdf", "2.4 MB", at(2024, 11, 25, 0)),
                file("2", "Инструкции.docx", "1.1 MB", at(2024, 11, 28, 0)),
                file("3", "Справочник.txt", "156 KB", at(2024, 11, 29, 0)),
            ],
            stats: StatsSnapshot {
                total_messages: 247,
                tasks_completed: 89,
                learning_progress: 67,
                uptime: "12 дней".to_string(),
            },
            history: [
                ("Сегодня, 14:30", "Планирование задач на неделю", 12),
                ("Сегодня, 10:15", "Анализ финансового отчета", 8),
                ("Вчера, 16:45", "Настройка автоматизации", 15),
                ("Вчера, 09:20", "Подготовка презентации", 24),
                ("28 ноября", "Исследование конкурентов", 19),
                ("27 ноября", "Создание контент-плана", 31),
            ]
            .into_iter()
            .map(|(date, topic, messages)| HistoryItem {
                date: date.to_string(),
                topic: topic.to_string(),
                messages,
            })
            .collect(),
            activity: [
                ("Понедельник", 85),
                ("Вторник", 92),
                ("Среда", 78),
                ("Четверг", 95),
                ("Пятница", 88),
                ("Суббота", 45),
                ("Воскресенье", 32),
            ]
            .into_iter()
            .map(|(day, value)| DailyActivity {
                day: day.to_string(),
                value,
            })
            .collect(),
            achievements: [
                ("Первый диалог", "MessageCircle", true),
                ("100 задач", "Target", true),
                ("Неделя работы", "Calendar", true),
                ("Оффлайн режим", "WifiOff", true),
                ("1000 диалогов", "TrendingUp", false),
                ("Эксперт", "Crown", false),
            ]
            .into_iter()
            .map(|(title, icon, unlocked)| Achievement {
                title: title.to_string(),
                icon: icon.to_string(),
                unlocked,
            })
            .collect(),
        }
    }
}

impl SeedData {
    /// History topics containing `query`, ignoring case.
    ///
    /// An empty query matches everything.
    pub fn search_history(&self, query: &str) -> Vec<&HistoryItem> {
        let needle = query.trim().to_lowercase();
        self.history
            .iter()
            .filter(|item| needle.is_empty() || item.topic.to_lowercase().contains(&needle))
            .collect()
    }
}
