use anyhow::Result;

use crate::db::Database;
use crate::form::{ExpenseForm, Field, DATE_FORMATS_HELP};
use crate::report;
use crate::ui::util::{max_scroll, scroll_down, scroll_up, wrap_lines};

/// Rows shown by the name picker popup.
pub(crate) const PICKER_ROWS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Form,
    Normal,
    Command,
    Picker,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Form => write!(f, "FORM"),
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Picker => write!(f, "PICK"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MessageKind {
    Error,
    Success,
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    // Form
    pub(crate) form: ExpenseForm,
    pub(crate) focused: Field,
    pub(crate) message: Option<(String, MessageKind)>,

    // Console panel, hidden until something is shown in it
    pub(crate) console: Option<String>,
    pub(crate) console_scroll: usize,

    // Name picker
    pub(crate) expense_names: Vec<String>,
    pub(crate) picker_index: usize,
    pub(crate) picker_scroll: usize,

    pub(crate) expense_count: i64,

    // Layout (updated each render frame)
    pub(crate) console_rows: usize,
    pub(crate) console_width: usize,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            running: true,
            input_mode: InputMode::Form,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,

            form: ExpenseForm::default(),
            focused: Field::Name,
            message: None,

            console: None,
            console_scroll: 0,

            expense_names: Vec::new(),
            picker_index: 0,
            picker_scroll: 0,

            expense_count: 0,

            console_rows: 10,
            console_width: 50,
        }
    }

    pub(crate) fn refresh(&mut self, db: &Database) -> Result<()> {
        self.expense_names = db.get_expense_names()?;
        self.expense_count = db.get_expense_count()?;
        Ok(())
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    pub(crate) fn set_error(&mut self, msg: impl Into<String>) {
        self.message = Some((msg.into(), MessageKind::Error));
    }

    pub(crate) fn set_success(&mut self, msg: impl Into<String>) {
        self.message = Some((msg.into(), MessageKind::Success));
    }

    /// Replace the console contents and make it visible.
    pub(crate) fn show_console(&mut self, text: String) {
        self.console = Some(text);
        self.console_scroll = 0;
    }

    /// Console text hard-wrapped to the panel width, one entry per screen row.
    pub(crate) fn console_lines(&self) -> Vec<String> {
        self.console
            .as_deref()
            .map_or_else(Vec::new, |c| wrap_lines(c, self.console_width))
    }

    pub(crate) fn scroll_console(&mut self, delta: isize) {
        let limit = max_scroll(self.console_lines().len(), self.console_rows);
        self.console_scroll = self
            .console_scroll
            .saturating_add_signed(delta)
            .min(limit);
    }

    // ── Form actions ──────────────────────────────────────────

    pub(crate) fn save_expense(&mut self, db: &Database) -> Result<()> {
        let expense = match self.form.validate() {
            Ok(e) => e,
            Err(e) => {
                self.set_error(e.to_string());
                return Ok(());
            }
        };

        db.insert_expense(&expense)?;
        self.set_success("Expense saved.");
        self.clear_fields();
        self.show_console(report::expense_history(db)?);
        self.refresh(db)?;
        Ok(())
    }

    pub(crate) fn show_expenses(&mut self, db: &Database) -> Result<()> {
        self.show_console(report::expense_history(db)?);
        Ok(())
    }

    /// A total that cannot be computed is reported on the message line.
    pub(crate) fn show_total(&mut self, db: &Database) {
        match report::total_or_subtotal(db, &self.form.name) {
            Ok(text) => self.show_console(text),
            Err(e) => self.set_error(format!("{e:#}")),
        }
    }

    pub(crate) fn show_date_formats(&mut self) {
        self.show_console(DATE_FORMATS_HELP.to_string());
    }

    pub(crate) fn clear_fields(&mut self) {
        self.form.clear();
        self.focused = Field::Name;
    }

    pub(crate) fn focus_next(&mut self) {
        self.focused = self.focused.next();
    }

    pub(crate) fn focus_prev(&mut self) {
        self.focused = self.focused.prev();
    }

    pub(crate) fn type_char(&mut self, c: char) {
        self.form.field_mut(self.focused).push(c);
    }

    pub(crate) fn backspace(&mut self) {
        self.form.field_mut(self.focused).pop();
    }

    // ── Name picker ───────────────────────────────────────────

    /// Every saved name, alphabetically.
    pub(crate) fn picker_entries(&self) -> Vec<&str> {
        self.expense_names.iter().map(String::as_str).collect()
    }

    pub(crate) fn open_picker(&mut self) {
        if self.expense_names.is_empty() {
            self.set_status("No saved expenses yet");
            return;
        }
        self.picker_index = 0;
        self.picker_scroll = 0;
        self.input_mode = InputMode::Picker;
    }

    pub(crate) fn picker_down(&mut self) {
        let len = self.picker_entries().len();
        scroll_down(&mut self.picker_index, &mut self.picker_scroll, len, PICKER_ROWS);
    }

    pub(crate) fn picker_up(&mut self) {
        scroll_up(&mut self.picker_index, &mut self.picker_scroll);
    }

    /// Put the highlighted name into the name field and close the picker.
    pub(crate) fn pick_selected(&mut self) {
        let picked = self
            .picker_entries()
            .get(self.picker_index)
            .map(|n| n.to_string());
        if let Some(name) = picked {
            self.form.name = name;
        }
        self.close_picker();
    }

    pub(crate) fn close_picker(&mut self) {
        self.picker_index = 0;
        self.picker_scroll = 0;
        self.focused = Field::Name;
        self.input_mode = InputMode::Form;
    }

    pub(crate) fn export(&mut self, db: &Database, path: &str) {
        match db.export_to_csv(path) {
            Ok(0) => self.set_status("No expenses to export"),
            Ok(count) => self.set_status(format!("Exported {count} expenses to {path}")),
            Err(e) => self.set_status(format!("Export failed: {e:#}")),
        }
    }
}
