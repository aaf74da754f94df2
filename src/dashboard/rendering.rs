use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, List, ListItem, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

use crate::{
    icons::{self, Icon},
    structs::{
        dashboard::TaskStatus,
        message::{Message, Role},
    },
};

use super::{settings, state::DashboardState, tabs::TabState};

/// Bubbles never take more than this share of the transcript width
const BUBBLE_WIDTH_PERCENT: usize = 70;

/// Create the main layout
fn create_layout(size: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(4), // Header
                Constraint::Length(3), // Tabs
                Constraint::Min(8),    // Main content area
                Constraint::Length(3), // Status bar
            ]
            .as_ref(),
        )
        .split(size)
        .to_vec()
}

/// Render the whole dashboard
pub fn render_ui(f: &mut Frame, state: &DashboardState, latest_log: Option<&str>) {
    let chunks = create_layout(f.area());

    render_header(f, chunks[0], state.online);
    render_tabs(f, chunks[1], state.active_tab, state.session.is_typing());

    match state.active_tab {
        TabState::Chat => render_chat_tab(f, chunks[2], state),
        TabState::Settings => render_settings_tab(f, chunks[2], state),
        TabState::History => render_history_tab(f, chunks[2], state),
        TabState::Data => render_data_tab(f, chunks[2], state),
        TabState::Stats => render_stats_tab(f, chunks[2], state),
    }

    render_status_bar(f, chunks[3], state, latest_log);
}

/// Title on the left, badges on the right
fn render_header(f: &mut Frame, area: Rect, online: bool) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(40)].as_ref())
        .split(area);

    let title = Paragraph::new(vec![
        Line::styled(
            "Виртуальный Помощник",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Line::styled(
            "Интеллектуальный ассистент с саморазвитием",
            Style::default().fg(Color::DarkGray),
        ),
    ])
    .block(Block::default().borders(Borders::LEFT | Borders::TOP | Borders::BOTTOM));

    let connection = if online {
        Span::styled(
            format!(" {} ", Icon::Wifi.prefix("Online")),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(
            format!(" {} ", Icon::WifiOff.prefix("Offline")),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    };

    let badges = Paragraph::new(vec![
        Line::from(vec![
            connection,
            Span::raw(" "),
            Span::styled(
                format!(" {} ", Icon::Brain.prefix("Режим обучения")),
                Style::default().fg(Color::Black).bg(Color::Magenta),
            ),
        ]),
        Line::raw(""),
    ])
    .alignment(Alignment::Right)
    .block(Block::default().borders(Borders::RIGHT | Borders::TOP | Borders::BOTTOM));

    f.render_widget(title, columns[0]);
    f.render_widget(badges, columns[1]);
}

fn render_tabs(f: &mut Frame, area: Rect, active_tab: TabState, typing: bool) {
    let tabs = Tabs::new(TabState::titles(typing))
        .select(active_tab.index())
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(tabs, area);
}

/// Greedy word wrap on character count.
///
/// Words longer than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            while word.len() > width {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word.split_off(width);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            let needed = if current_len == 0 {
                word.len()
            } else {
                current_len + 1 + word.len()
            };

            if needed > width {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }

            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(word.iter());
            current_len += word.len();
        }

        lines.push(current);
    }

    lines
}

/// Lines of a single chat bubble
fn message_lines(message: &Message, width: usize) -> Vec<Line<'static>> {
    let bubble_width = (width * BUBBLE_WIDTH_PERCENT / 100).max(10);

    let (icon, author, alignment, style) = match message.role {
        Role::User => (
            Icon::User,
            "Вы",
            Alignment::Right,
            Style::default().fg(Color::Cyan),
        ),
        Role::Assistant => (
            Icon::Bot,
            "Помощник",
            Alignment::Left,
            Style::default().fg(Color::White),
        ),
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(
            icon.prefix(author),
            style.add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" · {}", message.time_label()),
            Style::default().fg(Color::DarkGray),
        ),
    ])
    .alignment(alignment)];

    lines.extend(
        wrap_text(&message.content, bubble_width)
            .into_iter()
            .map(|text| Line::styled(text, style).alignment(alignment)),
    );
    lines.push(Line::raw(""));

    lines
}

/// Three dots bouncing while the assistant is "typing"
fn typing_line() -> Line<'static> {
    let frames = ["●○○", "○●○", "○○●", "○●○"];
    let idx = (chrono::Local::now().timestamp_subsec_millis() / 250) as usize % frames.len();

    Line::from(vec![
        Span::styled(
            format!("{} ", Icon::Bot.glyph()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(frames[idx], Style::default().fg(Color::DarkGray)),
    ])
}

fn render_chat_tab(f: &mut Frame, area: Rect, state: &DashboardState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)].as_ref())
        .split(area);

    let transcript_area = sections[0];
    let inner_width = transcript_area.width.saturating_sub(2) as usize;
    let inner_height = transcript_area.height.saturating_sub(2) as usize;

    let mut lines: Vec<Line> = state
        .session
        .messages()
        .iter()
        .flat_map(|message| message_lines(message, inner_width))
        .collect();

    if state.session.is_typing() {
        lines.push(typing_line());
    }

    // Stick to the bottom unless the user scrolled up
    let bottom = lines.len().saturating_sub(inner_height);
    let offset = bottom.saturating_sub(state.chat_scroll as usize);

    let transcript = Paragraph::new(lines)
        .scroll((offset.min(u16::MAX as usize) as u16, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Icon::MessageSquare.prefix("Диалог")),
        );

    let input_text = if state.session.input().is_empty() {
        Line::styled(
            "Напишите сообщение...",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Line::raw(state.session.input().to_string())
    };

    let input = Paragraph::new(input_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("{} Enter", Icon::Send.glyph()))
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(transcript, transcript_area);
    f.render_widget(input, sections[1]);
}

fn render_settings_tab(f: &mut Frame, area: Rect, state: &DashboardState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(area);

    let items = settings::render_settings(&state.settings);
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Icon::Settings.prefix("Настройки (←/→ изменить)")),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut list_state = state.settings.state.clone();
    f.render_stateful_widget(list, columns[0], &mut list_state);

    // Offline mode panel
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(3)].as_ref())
        .split(columns[1]);

    let offline_text = vec![
        Line::from(vec![
            Span::raw("Автономная работа: "),
            Span::styled("Активна", Style::default().fg(Color::Green)),
        ]),
        Line::raw(""),
        Line::styled(
            "Как это работает:",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::raw("• В онлайн режиме помощник учится и сохраняет данные"),
        Line::raw("• Все диалоги записываются в базу знаний"),
        Line::raw("• Переводы кэшируются для оффлайн доступа"),
        Line::raw("• Без интернета используются накопленные знания"),
    ];

    let offline = Paragraph::new(offline_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Icon::WifiOff.prefix("Оффлайн режим")),
        )
        .wrap(Wrap { trim: true });

    let knowledge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("База знаний: растёт автоматически"),
        )
        .gauge_style(Style::default().fg(Color::Magenta))
        .percent(100);

    f.render_widget(offline, rows[0]);
    f.render_widget(knowledge, rows[1]);
}

fn render_history_tab(f: &mut Frame, area: Rect, state: &DashboardState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)].as_ref())
        .split(area);

    let query = if state.history_query.is_empty() {
        Line::styled("Поиск...", Style::default().fg(Color::DarkGray))
    } else {
        Line::raw(state.history_query.clone())
    };

    let search = Paragraph::new(query).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Icon::Search.glyph()),
    );

    let matches = state.seed.search_history(&state.history_query);
    let items: Vec<ListItem> = matches
        .iter()
        .map(|item| {
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(
                        item.topic.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  [{} сообщений]", item.messages),
                        Style::default().fg(Color::Yellow),
                    ),
                ]),
                Line::styled(item.date.clone(), Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Icon::History.prefix(&format!("История диалогов ({})", matches.len()))),
    );

    f.render_widget(search, sections[0]);
    f.render_widget(list, sections[1]);
}

fn render_data_tab(f: &mut Frame, area: Rect, state: &DashboardState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(area);

    let header_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    // Uploaded files
    let file_rows = state.seed.files.iter().map(|file| {
        Row::new(vec![
            Cell::from(format!("#{}", file.id)).style(Style::default().fg(Color::DarkGray)),
            Cell::from(Icon::File.prefix(&file.name)),
            Cell::from(file.size.clone()),
            Cell::from(file.uploaded_at.format("%d.%m.%Y").to_string()),
            Cell::from(Icon::Trash.glyph()).style(Style::default().fg(Color::Red)),
        ])
    });

    let files = Table::new(
        file_rows,
        &[
            Constraint::Length(3),
            Constraint::Percentage(45),
            Constraint::Percentage(20),
            Constraint::Percentage(22),
            Constraint::Percentage(8),
        ],
    )
    .header(Row::new(vec!["#", "Файл", "Размер", "Загружен", ""]).style(header_style))
    .block(Block::default().borders(Borders::ALL).title(format!(
        "{}  [{}]",
        Icon::FolderOpen.prefix("Загруженные файлы"),
        Icon::Upload.prefix("Загрузить")
    )));

    // Tasks
    let task_rows = state.seed.tasks.iter().map(|task| {
        let (icon, style) = match task.status {
            TaskStatus::Completed => (
                Icon::CheckCircle,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT),
            ),
            TaskStatus::Pending => (Icon::Circle, Style::default().fg(Color::White)),
        };

        Row::new(vec![
            Cell::from(format!("#{}", task.id)).style(Style::default().fg(Color::DarkGray)),
            Cell::from(icon.glyph()),
            Cell::from(task.title.clone()).style(style),
            Cell::from(task.created_at.format("%d.%m %H:%M").to_string()),
            Cell::from(task.status.to_string()),
        ])
    });

    let tasks = Table::new(
        task_rows,
        &[
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Percentage(45),
            Constraint::Percentage(20),
            Constraint::Percentage(25),
        ],
    )
    .header(Row::new(vec!["#", "", "Задача", "Создана", "Статус"]).style(header_style))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Icon::ListTodo.prefix("Задачи")),
    )
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut task_state = state.task_state.clone();
    f.render_widget(files, columns[0]);
    f.render_stateful_widget(tasks, columns[1], &mut task_state);
}

fn stat_card<'a>(value: String, label: &'a str, icon: Icon) -> Paragraph<'a> {
    Paragraph::new(vec![
        Line::styled(
            value,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Line::styled(label, Style::default().fg(Color::DarkGray)),
    ])
    .block(Block::default().borders(Borders::ALL).title(icon.glyph()))
}

fn render_stats_tab(f: &mut Frame, area: Rect, state: &DashboardState) {
    let stats = &state.seed.stats;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(9)].as_ref())
        .split(area);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4].as_ref())
        .split(rows[0]);

    f.render_widget(
        stat_card(stats.total_messages.to_string(), "Всего диалогов", Icon::MessageCircle),
        cards[0],
    );
    f.render_widget(
        stat_card(stats.tasks_completed.to_string(), "Задач выполнено", Icon::CheckCircle),
        cards[1],
    );
    f.render_widget(
        stat_card(format!("{}%", stats.learning_progress), "Прогресс обучения", Icon::Brain),
        cards[2],
    );
    f.render_widget(
        stat_card(stats.uptime.clone(), "Время работы", Icon::Clock),
        cards[3],
    );

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
        .split(rows[1]);

    // Activity per day, one gauge per line
    let activity_block = Block::default()
        .borders(Borders::ALL)
        .title(Icon::BarChart.prefix("Активность по дням"));
    let activity_area = activity_block.inner(bottom[0]);
    f.render_widget(activity_block, bottom[0]);

    let day_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(1); state.seed.activity.len()])
        .split(activity_area);

    for (day, row) in state.seed.activity.iter().zip(day_rows.iter()) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(13), Constraint::Min(5)].as_ref())
            .split(*row);

        f.render_widget(Paragraph::new(day.day.clone()), columns[0]);
        f.render_widget(
            Gauge::default()
                .gauge_style(Style::default().fg(Color::Cyan))
                .percent(day.value.min(100)),
            columns[1],
        );
    }

    let achievements: Vec<ListItem> = state
        .seed
        .achievements
        .iter()
        .map(|achievement| {
            let style = if achievement.unlocked {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            ListItem::new(Line::styled(
                format!("{} {}", icons::render(&achievement.icon), achievement.title),
                style,
            ))
        })
        .collect();

    f.render_widget(
        List::new(achievements).block(
            Block::default()
                .borders(Borders::ALL)
                .title(Icon::Award.prefix("Достижения саморазвития")),
        ),
        bottom[1],
    );
}

fn get_help_text() -> &'static str {
    "Tab/Shift+Tab: вкладки · Enter: отправить · Ctrl+L: очистить · Ctrl+O: сеть · Esc: выход"
}

/// Render the status bar with state components
fn render_status_bar(
    f: &mut Frame,
    area: Rect,
    state: &DashboardState,
    latest_log: Option<&str>,
) {
    let status_bar = &state.status_bar;
    let status_style = Style::default().fg(status_bar.status_type.color());

    let mut spans = vec![Span::styled(
        format!(
            "{} ({:.0}s)",
            status_bar.message,
            status_bar.start_time.elapsed().as_secs_f32()
        ),
        status_style,
    )];

    if let Some(log) = latest_log {
        spans.push(Span::styled(
            format!(" | {log}"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let status_line = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(get_help_text()),
    );

    f.render_widget(status_line, area);
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::dashboard::state::Reply;

    fn draw(state: &DashboardState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal
            .draw(|f| render_ui(f, state, Some("last log line")))
            .unwrap();

        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn wrap_respects_width() {
        assert_eq!(wrap_text("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text("a\nb", 10), vec!["a", "b"]);
        assert_eq!(wrap_text("Привет мир", 6), vec!["Привет", "мир"]);
    }

    #[test]
    fn badge_follows_connectivity() {
        let mut state = DashboardState::new(true);
        assert!(draw(&state).contains("Online"));

        state.set_online(false);
        let screen = draw(&state);
        assert!(screen.contains("Offline"));
        assert!(!screen.contains("Online"));
        assert_eq!(state.session.messages().len(), 1);
    }

    #[test]
    fn chat_shows_messages_and_typing() {
        let mut state = DashboardState::new(true);
        state.session.set_input("Привет");
        let pending = state.begin_send().unwrap();

        let screen = draw(&state);
        assert!(screen.contains("Привет"));
        assert!(screen.contains("Помощник печатает"));

        state.apply_reply(Reply {
            generation: pending.generation,
            text: "Здравствуйте".into(),
        });
        let screen = draw(&state);
        assert!(screen.contains("Здравствуйте"));
        assert!(screen.contains("Готов к работе"));
        assert!(screen.contains("last log line"));
    }

    #[test]
    fn every_tab_renders() {
        let mut state = DashboardState::new(true);
        let expectations = [
            (TabState::Settings, "Голос помощника"),
            (TabState::History, "Анализ финансового отчета"),
            (TabState::Data, "База знаний.pdf"),
            (TabState::Stats, "247"),
        ];

        for (tab, needle) in expectations {
            state.active_tab = tab;
            assert!(draw(&state).contains(needle), "{tab:?} is missing {needle}");
        }
    }

    #[test]
    fn data_tables_show_row_ids() {
        let mut state = DashboardState::new(true);
        state.active_tab = TabState::Data;

        // Files on the left half of the screen, tasks on the right
        let screen = draw(&state);
        let halves = |needle: &str| {
            let line = screen.lines().find(|line| line.contains(needle)).unwrap();
            let chars: Vec<char> = line.chars().collect();
            let (left, right) = chars.split_at(chars.len() / 2);
            (left.iter().collect::<String>(), right.iter().collect::<String>())
        };

        let (files, _) = halves("Справочник.txt");
        assert!(files.contains("#3 "));

        let (_, tasks) = halves("Проверить почту");
        assert!(tasks.contains("#2 "));
    }

    #[test]
    fn history_search_filters_the_list() {
        let mut state = DashboardState::new(true);
        state.active_tab = TabState::History;
        state.history_query = "презентац".into();

        let screen = draw(&state);
        assert!(screen.contains("Подготовка презентации"));
        assert!(!screen.contains("Исследование конкурентов"));
    }
}
