use std::collections::HashMap;
use std::sync::LazyLock;

use super::app::App;
use crate::db::Database;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit", cmd_quit, r);
    register_command!("quit", "Quit", cmd_quit, r);
    register_command!("s", "Save the expense in the form", cmd_save, r);
    register_command!("save", "Save the expense in the form", cmd_save, r);
    register_command!("l", "Show registered expenses", cmd_list, r);
    register_command!("list", "Show registered expenses", cmd_list, r);
    register_command!(
        "t",
        "Total spent (for the item in the name field, if any)",
        cmd_total,
        r
    );
    register_command!(
        "total",
        "Total spent (for the item in the name field, if any)",
        cmd_total,
        r
    );
    register_command!("c", "Clear the form fields", cmd_clear, r);
    register_command!("clear", "Clear the form fields", cmd_clear, r);
    register_command!("dates", "Show valid date formats", cmd_dates, r);
    register_command!("p", "Pick a saved expense name", cmd_pick, r);
    register_command!("pick", "Pick a saved expense name", cmd_pick, r);
    register_command!(
        "export",
        "Export expenses to CSV (e.g. :export ~/expenses.csv)",
        cmd_export,
        r
    );
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("help", "Show available commands", cmd_help, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| (levenshtein(input, k), **k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_save(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.save_expense(db)
}

fn cmd_list(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.show_expenses(db)
}

fn cmd_total(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.show_total(db);
    Ok(())
}

fn cmd_clear(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.clear_fields();
    app.set_status("Fields cleared");
    Ok(())
}

fn cmd_dates(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_date_formats();
    Ok(())
}

fn cmd_pick(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.open_picker();
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        crate::run::default_export_path()
    } else {
        crate::run::shellexpand(args)
    };
    app.export(db, &path);
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("save", "save"), 0);
        assert_eq!(levenshtein("sav", "save"), 1);
        assert_eq!(levenshtein("totla", "total"), 2);
    }

    #[test]
    fn test_find_closest_skips_aliases() {
        assert_eq!(find_closest("lst"), "list");
        assert_eq!(find_closest("exprt"), "export");
    }

    #[test]
    fn test_unknown_command_suggests() {
        let mut app = App::new();
        let mut db = Database::open_in_memory().unwrap();
        handle_command("totl", &mut app, &mut db).unwrap();
        assert_eq!(
            app.status_message,
            "Unknown command: :totl. Did you mean :total?"
        );
    }

    #[test]
    fn test_export_to_bad_path_keeps_running() {
        let mut app = App::new();
        let mut db = Database::open_in_memory().unwrap();
        app.form = crate::form::ExpenseForm::new("Sand", "12", "2", "10/02/2024");
        app.save_expense(&db).unwrap();

        handle_command("export /nonexistent_dir/x.csv", &mut app, &mut db).unwrap();
        assert!(app.running);
        assert!(app.status_message.starts_with("Export failed:"));
    }

    #[test]
    fn test_quit_command() {
        let mut app = App::new();
        let mut db = Database::open_in_memory().unwrap();
        handle_command("q", &mut app, &mut db).unwrap();
        assert!(!app.running);
    }

    #[test]
    fn test_every_command_has_long_name() {
        let long: std::collections::HashSet<&str> = COMMANDS
            .iter()
            .filter(|(name, _)| name.len() > 1)
            .map(|(_, cmd)| cmd.description)
            .collect();
        for cmd in COMMANDS.values() {
            assert!(long.contains(cmd.description));
        }
    }
}
