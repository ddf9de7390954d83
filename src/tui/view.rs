// File: src/tui/view.rs
use crate::color_utils;
use crate::model::{Priority, Task};
use crate::store::REWARD_POINTS;
use crate::tui::state::{InputMode, UiState};
use chrono::Local;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Wrap},
};
use std::time::Instant;
use unicode_width::UnicodeWidthStr;

struct Theme {
    bg: Color,
    fg: Color,
    muted: Color,
    accent: Color,
    highlight_bg: Color,
}

impl Theme {
    fn for_mode(dark: bool) -> Self {
        if dark {
            Self {
                bg: Color::Rgb(17, 24, 39),
                fg: Color::Rgb(229, 231, 235),
                muted: Color::Rgb(156, 163, 175),
                accent: Color::Rgb(129, 140, 248),
                highlight_bg: Color::Rgb(55, 65, 81),
            }
        } else {
            Self {
                bg: Color::Rgb(248, 250, 252),
                fg: Color::Rgb(15, 23, 42),
                muted: Color::Rgb(100, 116, 139),
                accent: Color::Rgb(79, 70, 229),
                highlight_bg: Color::Rgb(224, 231, 255),
            }
        }
    }
}

fn priority_badge(p: Priority) -> Style {
    let (bg, fg) = match p {
        Priority::High => ((0xfe, 0xe2, 0xe2), (0x99, 0x1b, 0x1b)),
        Priority::Medium => ((0xff, 0xfb, 0xeb), (0x92, 0x40, 0x0e)),
        Priority::Low => ((0xec, 0xfd, 0xf5), (0x16, 0x65, 0x34)),
    };
    Style::default()
        .bg(Color::Rgb(bg.0, bg.1, bg.2))
        .fg(Color::Rgb(fg.0, fg.1, fg.2))
}

fn category_tag(category: &str) -> Style {
    let (r, g, b) = color_utils::category_color(category);
    let text = if color_utils::is_dark(r, g, b) {
        Color::White
    } else {
        Color::Black
    };
    Style::default().bg(Color::Rgb(r, g, b)).fg(text)
}

pub fn draw(f: &mut Frame, state: &mut UiState) {
    let now = Instant::now();
    let theme = Theme::for_mode(state.app.dark_mode);
    let area = f.area();

    f.render_widget(
        Block::default().style(Style::default().bg(theme.bg).fg(theme.fg)),
        area,
    );

    let full_help_text = vec![
        Line::from(vec![
            Span::styled(
                " GLOBAL ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" ?:Toggle Help  q:Quit  D:Dark Mode  H:Show/Hide Completed"),
        ]),
        Line::from(vec![
            Span::styled(
                " DATES ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" [/]:Previous/Next Day  t:Today  g:Go To Date"),
        ]),
        Line::from(vec![
            Span::styled(
                " TASKS ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" a:Add  Enter:Open  Space:Toggle Done  d:Delete  j/k:Up/Down"),
        ]),
        Line::from(vec![
            Span::styled(
                " NEW TASK ",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" Tab:Category  Shift+Tab:Priority  Enter:Save  Esc:Cancel"),
        ]),
    ];

    let footer_height = if state.show_full_help && !state.mode.takes_text() {
        Constraint::Length(full_help_text.len() as u16 + 2)
    } else {
        Constraint::Length(3)
    };

    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            footer_height,
        ])
        .split(area);

    // --- Header ---
    let today = Local::now().date_naive();
    let date_label = if state.app.selected_date == today {
        format!("📅 {} (Today)", state.app.selected_date)
    } else {
        format!("📅 {}", state.app.selected_date)
    };
    let history_label = if state.app.show_history {
        "Hide Completed"
    } else {
        "Show Completed"
    };
    let theme_label = if state.app.dark_mode {
        "☀️ Light Mode"
    } else {
        "🌙 Dark Mode"
    };

    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(v_chunks[0]);

    let left = Paragraph::new(Line::from(vec![
        Span::styled(
            date_label,
            Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(
            format!("⭐ {} pts", state.app.points),
            Style::default()
                .fg(Color::Rgb(0xf5, 0x9e, 0x0b))
                .add_modifier(Modifier::BOLD),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::LEFT | Borders::TOP | Borders::BOTTOM)
            .border_style(Style::default().fg(theme.muted))
            .title(" tickbox "),
    );
    let right = Paragraph::new(Line::from(vec![
        Span::styled(format!("H:{}", history_label), Style::default().fg(theme.muted)),
        Span::raw("  "),
        Span::styled(format!("D:{}", theme_label), Style::default().fg(theme.muted)),
    ]))
    .alignment(Alignment::Right)
    .block(
        Block::default()
            .borders(Borders::RIGHT | Borders::TOP | Borders::BOTTOM)
            .border_style(Style::default().fg(theme.muted)),
    );
    f.render_widget(left, h_chunks[0]);
    f.render_widget(right, h_chunks[1]);

    // --- Progress ---
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.muted))
                .title(" Progress "),
        )
        .gauge_style(Style::default().fg(theme.accent).bg(theme.highlight_bg))
        .percent(state.view.progress.min(100));
    f.render_widget(gauge, v_chunks[1]);

    // --- Task List ---
    let list_area = v_chunks[2];
    let title = format!(" Tasks ({}) ", state.view.tasks.len());
    let list_block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(if state.unsaved_changes {
            Style::default().fg(Color::LightRed)
        } else {
            Style::default().fg(theme.accent)
        });

    if let Some(msg) = state.view.empty_message {
        let empty = Paragraph::new(msg)
            .style(Style::default().fg(theme.muted))
            .alignment(Alignment::Center)
            .block(list_block);
        f.render_widget(empty, list_area);
    } else {
        let inner_width = list_area.width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = state
            .view
            .tasks
            .iter()
            .map(|t| task_row(t, inner_width, &theme))
            .collect();
        let list = List::new(items).block(list_block).highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(theme.highlight_bg),
        );
        f.render_stateful_widget(list, list_area, &mut state.list_state);
    }

    // --- Footer ---
    let footer_area = v_chunks[3];
    f.render_widget(Clear, footer_area);
    f.render_widget(
        Block::default().style(Style::default().bg(theme.bg).fg(theme.fg)),
        footer_area,
    );

    match state.mode {
        InputMode::Creating | InputMode::GoToDate => {
            let (title_str, color) = match state.mode {
                InputMode::GoToDate => (" Go To Date (YYYY-MM-DD) ".to_string(), Color::Cyan),
                _ => (
                    format!(
                        " New Task [{}] [{}]  Tab:Category  Shift+Tab:Priority ",
                        state.draft_category_name(),
                        state.draft_priority
                    ),
                    Color::Yellow,
                ),
            };
            draw_input(f, state, footer_area, title_str, color, now);
        }
        InputMode::Normal
        | InputMode::Viewing
        | InputMode::EditingText
        | InputMode::ConfirmDelete => {
            if state.show_full_help {
                let h_chunks = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
                    .split(footer_area);
                let block = Block::default()
                    .borders(Borders::ALL)
                    .title(" Keyboard Shortcuts (Press ? to minimize) ")
                    .border_style(Style::default().fg(Color::Cyan));
                let p = Paragraph::new(full_help_text)
                    .block(block)
                    .wrap(Wrap { trim: false });
                f.render_widget(p, h_chunks[0]);
                let status = Paragraph::new(state.message.clone())
                    .style(Style::default().fg(Color::Cyan))
                    .block(Block::default().borders(Borders::ALL).title(" Status "));
                f.render_widget(status, h_chunks[1]);
            } else {
                let f_chunks = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .split(footer_area);
                let status = Paragraph::new(state.message.clone())
                    .style(Style::default().fg(Color::Cyan))
                    .block(
                        Block::default()
                            .borders(Borders::LEFT | Borders::TOP | Borders::BOTTOM)
                            .title(" Status "),
                    );
                let help = Paragraph::new("a:Add Ret:Open Spc:Done d:Del [/]:Day H:History ?:Help")
                    .style(Style::default().fg(theme.muted))
                    .alignment(Alignment::Right)
                    .block(
                        Block::default()
                            .borders(Borders::RIGHT | Borders::TOP | Borders::BOTTOM)
                            .title(" Actions "),
                    );
                f.render_widget(status, f_chunks[0]);
                f.render_widget(help, f_chunks[1]);
            }
        }
    }

    // --- Popups ---
    if state.mode.is_modal() {
        draw_modal(f, state, &theme, now);
    }

    if state.toast_visible(now) {
        let width = 34.min(area.width);
        let toast_area = Rect::new(
            area.x + (area.width - width) / 2,
            area.y + area.height / 4,
            width,
            3.min(area.height),
        );
        let toast = Paragraph::new(format!("🎉 Task completed! +{} points", REWARD_POINTS))
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Rgb(0x10, 0xb9, 0x81))
                    .add_modifier(Modifier::BOLD),
            )
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(Clear, toast_area);
        f.render_widget(toast, toast_area);
    }

    // --- Confetti (drawn last, over everything) ---
    state.confetti.resize(area.width, area.height);
    let buf = f.buffer_mut();
    for p in state.confetti.particles() {
        if p.x < 0.0 || p.y < 0.0 {
            continue;
        }
        let (x, y) = (area.x + p.x as u16, area.y + p.y as u16);
        if x >= area.right() || y >= area.bottom() {
            continue;
        }
        if let Some(cell) = buf.cell_mut((x, y)) {
            let (r, g, b) = p.color;
            cell.set_char(p.glyph()).set_fg(Color::Rgb(r, g, b));
        }
    }
}

fn task_row(t: &Task, inner_width: usize, theme: &Theme) -> ListItem<'static> {
    let checkbox = if t.completed { "[x]" } else { "[ ]" };
    let left_text = format!("{} {}", checkbox, t.text);

    let tag = format!(" {} ", t.category);
    let badge = format!(" {} ", t.priority);
    let date = format!(" {}", t.date);
    let right_len = tag.chars().count() + 1 + badge.chars().count() + date.chars().count();

    let padding_len = inner_width.saturating_sub(left_text.chars().count() + right_len);

    let text_style = if t.completed {
        Style::default()
            .fg(theme.muted)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(theme.fg)
    };

    ListItem::new(Line::from(vec![
        Span::styled(left_text, text_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(tag, category_tag(&t.category)),
        Span::raw(" "),
        Span::styled(badge, priority_badge(t.priority)),
        Span::styled(date, Style::default().fg(theme.muted)),
    ]))
}

fn draw_input(
    f: &mut Frame,
    state: &UiState,
    area: Rect,
    title: String,
    color: Color,
    now: Instant,
) {
    let prefix = "> ";
    let border = if state.is_flashing(now) {
        Style::default().fg(Color::Rgb(0xff, 0x52, 0x52))
    } else {
        Style::default().fg(color)
    };
    let input = Paragraph::new(format!("{}{}", prefix, state.input_buffer))
        .style(Style::default().fg(color))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(border),
        );
    f.render_widget(input, area);

    let cursor_x = area
        .x
        .saturating_add(1)
        .saturating_add(prefix.width() as u16)
        .saturating_add(state.cursor_column());
    let max_x = area.x.saturating_add(area.width.saturating_sub(2));
    if cursor_x <= max_x {
        f.set_cursor_position((cursor_x, area.y + 1));
    }
}

fn draw_modal(f: &mut Frame, state: &UiState, theme: &Theme, now: Instant) {
    let area = centered_rect(60, 50, f.area());
    f.render_widget(Clear, area);

    let Some(task) = state.modal_task() else {
        let gone = Paragraph::new("This task no longer exists.")
            .block(Block::default().borders(Borders::ALL).title(" Task "));
        f.render_widget(gone, area);
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Task ")
        .style(Style::default().bg(theme.bg).fg(theme.fg))
        .border_style(Style::default().fg(theme.accent));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(inner);

    let status = if task.completed { "Done" } else { "Open" };
    let details = vec![
        Line::from(Span::styled(
            task.text.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("📅 {}", task.date)),
        Line::from(vec![
            Span::styled(format!(" {} ", task.category), category_tag(&task.category)),
            Span::raw(" "),
            Span::styled(format!(" {} ", task.priority), priority_badge(task.priority)),
            Span::raw(format!("  {}", status)),
        ]),
    ];
    f.render_widget(
        Paragraph::new(details).wrap(Wrap { trim: true }),
        chunks[0],
    );

    match state.mode {
        InputMode::EditingText => {
            draw_input(f, state, chunks[1], " Edit Task ".to_string(), Color::Magenta, now);
        }
        InputMode::ConfirmDelete => {
            let p = Paragraph::new("Delete this task? This cannot be undone. (y/n)")
                .style(Style::default().fg(Color::LightRed))
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(p, chunks[1]);
        }
        _ => {
            let done = if task.completed { "Undo" } else { "Complete" };
            let p = Paragraph::new(format!("c:{}  e:Edit  d:Delete  Esc:Close", done))
                .style(Style::default().fg(theme.muted))
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(p, chunks[1]);
        }
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
