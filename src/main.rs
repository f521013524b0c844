mod db;
mod form;
mod models;
mod report;
mod run;
mod ui;

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Overrides the database location.
const DB_PATH_ENV: &str = "EXPENSELOG_DB";

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let db_path = get_db_path()?;
    let mut db = db::Database::open(&db_path)?;

    match args.len() {
        1 => run::as_tui(&mut db),
        2.. => run::as_cli(&args, &mut db),
        _ => {
            eprintln!("Usage: expenselog [command]");
            Ok(())
        }
    }
}

fn get_db_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(DB_PATH_ENV).filter(|p| !p.is_empty()) {
        let path = PathBuf::from(path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        return Ok(path);
    }

    let proj_dirs = directories::ProjectDirs::from("com", "expenselog", "ExpenseLog")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("expenselog.db"))
}
