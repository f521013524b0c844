use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::app::{App, InputMode, MessageKind, PICKER_ROWS};
use super::commands;
use super::theme;
use super::util::truncate;
use crate::form::Field;

/// Height of one bordered input box.
const FIELD_HEIGHT: u16 = 3;

pub(crate) fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(FIELD_HEIGHT * Field::all().len() as u16), // Form
            Constraint::Length(1), // Message
            Constraint::Min(3),    // Console
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Command bar
        ])
        .split(f.area());

    render_title(f, chunks[0]);
    render_form(f, chunks[1], app);
    render_message(f, chunks[2], app);
    render_console(f, chunks[3], app);
    render_status_bar(f, chunks[4], app);
    render_command_bar(f, chunks[5], app);

    if app.input_mode == InputMode::Picker {
        render_picker(f, chunks[1], app);
    }
    if app.show_help {
        render_help_overlay(f, f.area());
    }
}

/// Columns available for console text inside the bordered panel.
pub(crate) fn console_width(total_width: u16) -> usize {
    total_width.saturating_sub(2).max(1) as usize
}

/// Rows available for console text inside the bordered panel.
pub(crate) fn console_rows(total_height: u16) -> usize {
    let fixed = 1 + FIELD_HEIGHT * Field::all().len() as u16 + 1 + 1 + 1 + 2;
    total_height.saturating_sub(fixed).max(1) as usize
}

fn render_title(f: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled(
        " Expense Log ",
        theme::header_style(),
    )))
    .style(Style::default().bg(theme::HEADER_BG));
    f.render_widget(title, area);
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            Field::all()
                .iter()
                .map(|_| Constraint::Length(FIELD_HEIGHT))
                .collect::<Vec<_>>(),
        )
        .split(area);

    let editing = app.input_mode == InputMode::Form;
    for (field, row) in Field::all().iter().zip(rows.iter()) {
        let focused = editing && *field == app.focused;
        let mut title = vec![Span::styled(
            format!(" {} ", field.label()),
            theme::label_style(),
        )];
        if *field == Field::Date {
            title.push(Span::styled("(:dates) ", theme::dim_style()));
        }

        let input = Paragraph::new(app.form.field(*field))
            .style(theme::normal_style())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme::field_border_style(focused))
                    .title(Line::from(title)),
            );
        f.render_widget(input, *row);

        if focused {
            let col = app.form.field(*field).chars().count() as u16;
            let x = (row.x + 1 + col).min(row.right().saturating_sub(2));
            f.set_cursor_position((x, row.y + 1));
        }
    }
}

fn render_message(f: &mut Frame, area: Rect, app: &App) {
    let line = match &app.message {
        Some((text, MessageKind::Error)) => {
            Line::from(Span::styled(text.as_str(), theme::error_style()))
        }
        Some((text, MessageKind::Success)) => {
            Line::from(Span::styled(text.as_str(), theme::success_style()))
        }
        None => Line::from(""),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_console(f: &mut Frame, area: Rect, app: &App) {
    if app.console.is_none() {
        return;
    }

    let rows: Vec<Line> = app
        .console_lines()
        .into_iter()
        .skip(app.console_scroll)
        .take(area.height.saturating_sub(2) as usize)
        .map(Line::from)
        .collect();

    let console = Paragraph::new(rows)
        .style(theme::console_style())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::OVERLAY))
                .title(Span::styled(" Console ", theme::dim_style())),
        );
    f.render_widget(console, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mode_label = format!(" {} ", app.input_mode);
    let mode_bg = match app.input_mode {
        InputMode::Form => theme::GREEN,
        InputMode::Normal => theme::ACCENT,
        InputMode::Command => theme::YELLOW,
        InputMode::Picker => theme::YELLOW,
    };
    let mode_style = Style::default()
        .fg(theme::HEADER_BG)
        .bg(mode_bg)
        .add_modifier(Modifier::BOLD);

    let info = format!(" {} expenses", app.expense_count);

    let right = match app.input_mode {
        InputMode::Form => " Enter save | Tab next | ^L list | ^T total | ^N pick | Esc normal ",
        InputMode::Normal => " i edit | j/k scroll | : command | ? help ",
        InputMode::Command => " Enter run | Esc cancel ",
        InputMode::Picker => " j/k move | Enter pick | Esc cancel ",
    };

    let available = area.width as usize;
    let used = mode_label.len() + info.len() + right.len();
    let pad = available.saturating_sub(used);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(&mode_label, mode_style),
        Span::styled(&info, theme::status_bar_style()),
        Span::styled(" ".repeat(pad), theme::status_bar_style()),
        Span::styled(right, theme::status_bar_style()),
    ]));
    f.render_widget(bar, area);
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App) {
    let (content, cursor_offset) = match app.input_mode {
        InputMode::Command => (
            Line::from(vec![
                Span::styled(":", Style::default().fg(theme::ACCENT)),
                Span::styled(&app.command_input, theme::command_bar_style()),
            ]),
            Some(1 + app.command_input.chars().count() as u16),
        ),
        _ => (
            if app.status_message.is_empty() {
                Line::from(Span::styled(
                    " Press Esc then : for commands, ? for help",
                    theme::dim_style(),
                ))
            } else {
                Line::from(Span::styled(
                    &app.status_message,
                    theme::command_bar_style(),
                ))
            },
            None,
        ),
    };

    let bar = Paragraph::new(content).style(Style::default().bg(theme::CONSOLE_BG));
    f.render_widget(bar, area);

    if let Some(offset) = cursor_offset {
        f.set_cursor_position((area.x + offset, area.y));
    }
}

/// Drop-down under the name field, like a combobox.
fn render_picker(f: &mut Frame, form_area: Rect, app: &App) {
    let entries = app.picker_entries();
    let shown = entries.len().min(PICKER_ROWS) as u16;
    let width = form_area.width.min(40);
    let y = form_area.y + FIELD_HEIGHT;
    let height = (shown + 2).min(f.area().height.saturating_sub(y));
    let popup = Rect::new(form_area.x + 1, y, width, height);
    let inner_width = width.saturating_sub(4) as usize;

    let lines: Vec<Line> = entries
        .iter()
        .enumerate()
        .skip(app.picker_scroll)
        .take(PICKER_ROWS)
        .map(|(i, name)| {
            let style = if i == app.picker_index {
                theme::selected_style()
            } else {
                theme::normal_style()
            };
            Line::from(Span::styled(format!(" {}", truncate(name, inner_width)), style))
        })
        .collect();

    f.render_widget(Clear, popup);
    let list = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::HEADER_BG))
            .title(Span::styled(" Saved expenses ", theme::dim_style())),
    );
    f.render_widget(list, popup);
}

fn render_help_overlay(f: &mut Frame, area: Rect) {
    let section = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(theme::YELLOW)
                .add_modifier(Modifier::BOLD),
        ))
    };
    let row = |text: &'static str| Line::from(Span::styled(text, theme::normal_style()));

    let mut help_text = vec![
        Line::from(Span::styled(
            " Expense Log Help ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section(" Form"),
        row("  Tab/Shift-Tab    Next/Prev field       Enter      Save expense"),
        row("  Ctrl-l           Show expenses         Ctrl-t     Total spent"),
        row("  Ctrl-r           Clear fields          Ctrl-d     Date formats"),
        row("  Ctrl-n           Pick saved name       Esc        Normal mode"),
        Line::from(""),
        section(" Normal"),
        row("  i/Enter          Back to form          j/k        Scroll console"),
        row("  g/G              Console top/bottom    :          Command mode"),
        row("  Ctrl-q           Quit                  ?          This help"),
        Line::from(""),
        section(" Commands"),
    ];

    let mut seen = std::collections::HashSet::new();
    let mut cmd_lines: Vec<(&str, &str)> = Vec::new();
    for (&name, cmd) in commands::COMMANDS.iter() {
        if name.len() <= 1 {
            continue;
        }
        if seen.insert(cmd.description) {
            cmd_lines.push((name, cmd.description));
        }
    }
    cmd_lines.sort_by_key(|(name, _)| *name);
    for (name, desc) in &cmd_lines {
        help_text.push(Line::from(Span::styled(
            format!("  :{name:<10} {desc}"),
            theme::normal_style(),
        )));
    }

    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        " Press any key to close ",
        theme::dim_style(),
    )));

    let popup_height = (help_text.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup_width = 72.min(area.width.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);
    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(help, popup_area);
}
