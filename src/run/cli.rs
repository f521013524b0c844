use anyhow::Result;
use std::path::Path;

use crate::db::Database;
use crate::form::{ExpenseForm, DATE_FORMATS_HELP};
use crate::report;

pub(crate) fn as_cli(args: &[String], db: &mut Database) -> Result<()> {
    match args[1].as_str() {
        "add" | "a" => cli_add(&args[2..], db),
        "list" | "l" => cli_list(db),
        "total" | "t" => cli_total(&args[2..], db),
        "names" => cli_names(db),
        "dates" => {
            print!("{DATE_FORMATS_HELP}");
            Ok(())
        }
        "export" => cli_export(&args[2..], db),
        "import-legacy" => cli_import_legacy(&args[2..], db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("expenselog {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("expenselog - local-only itemized expense recorder");
    println!();
    println!("Usage: expenselog [command]");
    println!();
    println!("Commands:");
    println!("  (none)                               Launch interactive form");
    println!("  add <name> <unit price> <qty> <date> Record an expense (date: dd/mm/yyyy or dd-mm-yyyy)");
    println!("  list                                 Show expenses grouped by name, newest first");
    println!("  total [name]                         Total spent, overall or for one name");
    println!("  names                                List saved expense names");
    println!("  dates                                Show valid date formats");
    println!("  export [path]                        Export expenses to CSV");
    println!("  import-legacy <EXPENSES.db>          Import rows from the desktop form's database");
    println!("  --help, -h                           Show this help");
    println!("  --version, -V                        Show version");
    println!();
    println!("Environment:");
    println!("  EXPENSELOG_DB                        Database file (default: platform data dir)");
}

/// The name may span several arguments; the last three are price, quantity
/// and date.
fn form_from_args(args: &[String]) -> Option<ExpenseForm> {
    if args.len() < 4 {
        return None;
    }
    let (name, rest) = args.split_at(args.len() - 3);
    Some(ExpenseForm::new(
        name.join(" "),
        rest[0].as_str(),
        rest[1].as_str(),
        rest[2].as_str(),
    ))
}

fn cli_add(args: &[String], db: &mut Database) -> Result<()> {
    let Some(form) = form_from_args(args) else {
        anyhow::bail!("Usage: expenselog add <name> <unit price> <quantity> <date>");
    };

    let expense = form.validate()?;
    db.insert_expense(&expense)?;
    println!("Expense saved.");
    let total = db.get_total_spent_for(&expense.name)?;
    print!("{}", report::render_total_for(&expense.name, total));
    Ok(())
}

fn cli_list(db: &mut Database) -> Result<()> {
    print!("{}", report::expense_history(db)?);
    Ok(())
}

fn cli_total(args: &[String], db: &mut Database) -> Result<()> {
    let name = args.join(" ");
    print!("{}", report::total_or_subtotal(db, &name)?);
    Ok(())
}

fn cli_names(db: &mut Database) -> Result<()> {
    let names = db.get_expense_names()?;
    if names.is_empty() {
        println!("No expenses");
        return Ok(());
    }
    for name in &names {
        println!("{name}");
    }
    Ok(())
}

fn cli_export(args: &[String], db: &mut Database) -> Result<()> {
    let output_path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| super::shellexpand(a))
        .unwrap_or_else(super::default_export_path);

    let count = db.export_to_csv(&output_path)?;
    if count == 0 {
        println!("No expenses to export");
    } else {
        println!("Exported {count} expenses to {output_path}");
    }
    Ok(())
}

fn cli_import_legacy(args: &[String], db: &mut Database) -> Result<()> {
    let Some(file_path) = args.first() else {
        anyhow::bail!("Usage: expenselog import-legacy <EXPENSES.db>");
    };
    let path = Path::new(file_path);
    if !path.exists() {
        anyhow::bail!("File not found: {file_path}");
    }

    let count = db.import_legacy(path)?;
    println!("Imported {count} expenses");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_form_from_args_single_word_name() {
        let form = form_from_args(&args(&["Sand", "12", "2", "10/02/2024"])).unwrap();
        assert_eq!(form, ExpenseForm::new("Sand", "12", "2", "10/02/2024"));
    }

    #[test]
    fn test_form_from_args_multi_word_name() {
        let form = form_from_args(&args(&["Paint", "can", "white", "19.90", "3", "02-05-2024"]))
            .unwrap();
        assert_eq!(form.name, "Paint can white");
        assert_eq!(form.unit_price, "19.90");
        assert_eq!(form.date, "02-05-2024");
    }

    #[test]
    fn test_form_from_args_too_few() {
        assert!(form_from_args(&args(&["12", "2", "10/02/2024"])).is_none());
    }

    #[test]
    fn test_add_rejects_invalid_input() {
        let mut db = Database::open_in_memory().unwrap();
        let err = cli_add(&args(&["Sand", "12", "two", "10/02/2024"]), &mut db).unwrap_err();
        assert_eq!(err.to_string(), "The 'Quantity' field must be a whole number.");
        assert_eq!(db.get_expense_count().unwrap(), 0);
    }

    #[test]
    fn test_add_rejects_oversized_total() {
        let mut db = Database::open_in_memory().unwrap();
        let err = cli_add(
            &args(&["Big", "79228162514264337593543950335", "2", "01/01/2024"]),
            &mut db,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "The total amount is too large.");
        assert_eq!(db.get_expense_count().unwrap(), 0);
    }

    #[test]
    fn test_add_inserts() {
        let mut db = Database::open_in_memory().unwrap();
        cli_add(&args(&["Sand", "12", "2", "10/02/2024"]), &mut db).unwrap();
        assert_eq!(db.get_expense_count().unwrap(), 1);
    }

    #[test]
    fn test_import_legacy_missing_file() {
        let mut db = Database::open_in_memory().unwrap();
        let err = cli_import_legacy(&args(&["/nonexistent/EXPENSES.db"]), &mut db).unwrap_err();
        assert!(err.to_string().starts_with("File not found"));
    }
}
