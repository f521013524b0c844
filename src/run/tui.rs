use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::db::Database;
use crate::ui::app::{App, InputMode};
use crate::ui::commands;

pub(crate) fn as_tui(db: &mut Database) -> Result<()> {
    let mut app = App::new();
    app.refresh(db)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, db);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &mut Database,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            app.console_rows = crate::ui::render::console_rows(f.area().height);
            app.console_width = crate::ui::render::console_width(f.area().width);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            if is_quit(&key) {
                app.running = false;
                continue;
            }
            match app.input_mode {
                InputMode::Form => handle_form_input(key, app, db)?,
                InputMode::Normal => handle_normal_input(key, app, db)?,
                InputMode::Command => handle_command_input(key, app, db)?,
                InputMode::Picker => handle_picker_input(key, app),
            }
        }
    }
    Ok(())
}

fn is_quit(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
}

// ── Input handlers ───────────────────────────────────────────

/// Shortcuts shared by form and normal mode. Returns true when handled.
fn handle_action_key(c: char, app: &mut App, db: &mut Database) -> Result<bool> {
    match c {
        's' => app.save_expense(db)?,
        'l' => app.show_expenses(db)?,
        't' => app.show_total(db),
        'r' => {
            app.clear_fields();
            app.set_status("Fields cleared");
        }
        'd' => app.show_date_formats(),
        'n' | 'p' => app.open_picker(),
        _ => return Ok(false),
    }
    Ok(true)
}

fn handle_form_input(key: KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char(c) = key.code {
            handle_action_key(c, app, db)?;
        }
        return Ok(());
    }

    match key.code {
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Enter => app.save_expense(db)?,
        KeyCode::Tab | KeyCode::Down => app.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.focus_prev(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(c) => app.type_char(c),
        _ => {}
    }
    Ok(())
}

fn handle_normal_input(key: KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('i') | KeyCode::Enter => app.input_mode = InputMode::Form,
        KeyCode::Tab => {
            app.focus_next();
            app.input_mode = InputMode::Form;
        }
        KeyCode::BackTab => {
            app.focus_prev();
            app.input_mode = InputMode::Form;
        }
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('j') | KeyCode::Down => app.scroll_console(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_console(-1),
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_console((app.console_rows / 2) as isize);
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_console(-((app.console_rows / 2) as isize));
        }
        KeyCode::Char('g') => app.console_scroll = 0,
        KeyCode::Char('G') => app.scroll_console(isize::MAX),
        KeyCode::Char(c) => {
            handle_action_key(c, app, db)?;
        }
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, db)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_picker_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => app.picker_down(),
        KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => app.picker_up(),
        KeyCode::Enter => app.pick_selected(),
        KeyCode::Esc => app.close_picker(),
        _ => {}
    }
}
