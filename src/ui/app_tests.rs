#![allow(clippy::unwrap_used)]

use super::app::*;
use crate::db::Database;
use crate::form::{ExpenseForm, Field};

fn fill(app: &mut App, name: &str, price: &str, qty: &str, date: &str) {
    app.form = ExpenseForm::new(name, price, qty, date);
}

// ── Save ──────────────────────────────────────────────────────

#[test]
fn test_save_valid_expense() {
    let db = Database::open_in_memory().unwrap();
    let mut app = App::new();
    fill(&mut app, "Cement", "32.50", "4", "01/03/2024");
    app.focused = Field::Date;

    app.save_expense(&db).unwrap();

    assert_eq!(
        app.message,
        Some(("Expense saved.".to_string(), MessageKind::Success))
    );
    assert_eq!(app.form, ExpenseForm::default());
    assert_eq!(app.focused, Field::Name);
    assert_eq!(app.expense_names, vec!["Cement".to_string()]);
    assert_eq!(app.expense_count, 1);
    let console = app.console.as_deref().unwrap();
    assert!(console.contains("Cement:\n    - Amount:  130.00, spent on: 01/03/2024"));
}

#[test]
fn test_save_invalid_keeps_fields() {
    let db = Database::open_in_memory().unwrap();
    let mut app = App::new();
    fill(&mut app, "Cement", "abc", "4", "01/03/2024");

    app.save_expense(&db).unwrap();

    assert_eq!(
        app.message,
        Some((
            "The 'Unit price' field must be a valid number.".to_string(),
            MessageKind::Error
        ))
    );
    assert_eq!(app.form.unit_price, "abc");
    assert!(app.console.is_none());
    assert_eq!(db.get_expense_count().unwrap(), 0);
}

#[test]
fn test_save_missing_name() {
    let db = Database::open_in_memory().unwrap();
    let mut app = App::new();
    fill(&mut app, "", "1", "1", "01/01/2024");
    app.save_expense(&db).unwrap();
    assert_eq!(
        app.message,
        Some(("Fill in all fields.".to_string(), MessageKind::Error))
    );
}

// ── Console views ─────────────────────────────────────────────

#[test]
fn test_console_starts_hidden() {
    let app = App::new();
    assert!(app.console.is_none());
}

#[test]
fn test_show_total_uses_name_field() {
    let db = Database::open_in_memory().unwrap();
    let mut app = App::new();
    fill(&mut app, "Sand", "12", "2", "10/02/2024");
    app.save_expense(&db).unwrap();

    app.show_total(&db);
    assert_eq!(app.console.as_deref(), Some("Total spent: 24.00\n"));

    app.form.name = "Sand".into();
    app.show_total(&db);
    assert_eq!(app.console.as_deref(), Some("Total spent on Sand: 24.00\n"));

    app.form.name = "Gravel".into();
    app.show_total(&db);
    assert_eq!(
        app.console.as_deref(),
        Some("Expense 'Gravel' not found.\n")
    );
}

#[test]
fn test_show_total_overflow_stays_in_app() {
    let db = Database::open_in_memory().unwrap();
    let mut app = App::new();
    for _ in 0..2 {
        fill(&mut app, "Big", "5e28", "1", "01/01/2024");
        app.save_expense(&db).unwrap();
    }

    app.show_console("previous".into());
    app.show_total(&db);
    assert_eq!(
        app.message,
        Some((
            "Total spent is too large to compute".to_string(),
            MessageKind::Error
        ))
    );
    assert_eq!(app.console.as_deref(), Some("previous"));
}

#[test]
fn test_save_total_too_large() {
    let db = Database::open_in_memory().unwrap();
    let mut app = App::new();
    fill(&mut app, "Big", "79228162514264337593543950335", "2", "01/01/2024");
    app.save_expense(&db).unwrap();
    assert_eq!(
        app.message,
        Some((
            "The total amount is too large.".to_string(),
            MessageKind::Error
        ))
    );
    assert_eq!(db.get_expense_count().unwrap(), 0);
}

#[test]
fn test_show_date_formats() {
    let mut app = App::new();
    app.show_date_formats();
    assert_eq!(
        app.console.as_deref(),
        Some("Valid date formats:\n\ndd/mm/yyyy\ndd-mm-yyyy\n")
    );
}

#[test]
fn test_console_scroll_counts_wrapped_rows() {
    let mut app = App::new();
    app.console_rows = 2;
    app.console_width = 4;
    // One source line that takes three rows at width 4, plus one short line.
    app.show_console("abcdefghij\nk\n".into());
    assert_eq!(app.console_lines(), vec!["abcd", "efgh", "ij", "k"]);
    app.scroll_console(isize::MAX);
    assert_eq!(app.console_scroll, 2);
}

#[test]
fn test_console_scroll_is_clamped() {
    let mut app = App::new();
    app.console_rows = 2;
    app.show_console("a\nb\nc\nd\n".into());
    app.scroll_console(10);
    assert_eq!(app.console_scroll, 2);
    app.scroll_console(-5);
    assert_eq!(app.console_scroll, 0);
}

// ── Form editing ──────────────────────────────────────────────

#[test]
fn test_typing_goes_to_focused_field() {
    let mut app = App::new();
    app.type_char('a');
    app.focus_next();
    app.type_char('1');
    app.type_char('2');
    app.backspace();
    assert_eq!(app.form.name, "a");
    assert_eq!(app.form.unit_price, "1");
    app.focus_prev();
    assert_eq!(app.focused, Field::Name);
}

#[test]
fn test_clear_fields() {
    let mut app = App::new();
    fill(&mut app, "a", "b", "c", "d");
    app.focused = Field::Quantity;
    app.clear_fields();
    assert_eq!(app.form, ExpenseForm::default());
    assert_eq!(app.focused, Field::Name);
}

// ── Name picker ───────────────────────────────────────────────

fn app_with_names(names: &[&str]) -> App {
    let mut app = App::new();
    app.expense_names = names.iter().map(|n| n.to_string()).collect();
    app
}

#[test]
fn test_picker_empty_store() {
    let mut app = App::new();
    app.open_picker();
    assert_eq!(app.input_mode, InputMode::Form);
    assert_eq!(app.status_message, "No saved expenses yet");
}

#[test]
fn test_picker_lists_every_name() {
    let mut app = app_with_names(&["Bricks", "Cement", "Sand"]);
    app.form.name = "cem".into();
    assert_eq!(app.picker_entries(), vec!["Bricks", "Cement", "Sand"]);
    app.open_picker();
    assert_eq!(app.input_mode, InputMode::Picker);
}

#[test]
fn test_pick_replaces_name_field() {
    let mut app = app_with_names(&["Bricks", "Cement", "Sand"]);
    app.focused = Field::Date;
    app.open_picker();
    assert_eq!(app.input_mode, InputMode::Picker);
    app.picker_down();
    app.picker_down();
    app.picker_down();
    app.picker_up();
    app.pick_selected();
    assert_eq!(app.form.name, "Cement");
    assert_eq!(app.input_mode, InputMode::Form);
    assert_eq!(app.focused, Field::Name);
    assert_eq!(app.picker_index, 0);
}

// ── Export ────────────────────────────────────────────────────

#[test]
fn test_export_status() {
    let db = Database::open_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let path = path.to_str().unwrap();
    let mut app = App::new();

    app.export(&db, path);
    assert_eq!(app.status_message, "No expenses to export");

    fill(&mut app, "Sand", "12", "2", "10/02/2024");
    app.save_expense(&db).unwrap();
    app.export(&db, path);
    assert_eq!(app.status_message, format!("Exported 1 expenses to {path}"));
}

#[test]
fn test_export_failure_stays_in_app() {
    let db = Database::open_in_memory().unwrap();
    let mut app = App::new();
    fill(&mut app, "Sand", "12", "2", "10/02/2024");
    app.save_expense(&db).unwrap();

    app.export(&db, "/nonexistent_dir/x.csv");
    assert!(app
        .status_message
        .starts_with("Export failed: Failed to create CSV file: /nonexistent_dir/x.csv"));
}
