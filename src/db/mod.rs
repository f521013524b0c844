mod schema;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::{Expense, DATE_STORAGE_FORMAT};

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        let current: i32 = if has_version_table {
            self.conn
                .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                    row.get(0)
                })
                .optional()
                .context("Failed to read schema version")?
                .unwrap_or(0)
        } else {
            0
        };

        // Fresh database, or a version table that never got its row.
        if current == 0 {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute("DELETE FROM schema_version", [])?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Expenses ──────────────────────────────────────────────

    pub(crate) fn insert_expense(&self, expense: &Expense) -> Result<i64> {
        insert_into(&self.conn, expense)?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Every stored expense in insertion order.
    pub(crate) fn get_expenses(&self) -> Result<Vec<Expense>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, unit_price, quantity, total_price, date, created_at
             FROM expenses ORDER BY id",
        )?;
        let rows = stmt.query_map([], expense_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Distinct expense names, alphabetically.
    pub(crate) fn get_expense_names(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT name FROM expenses ORDER BY name")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn expense_exists(&self, name: &str) -> Result<bool> {
        Ok(self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM expenses WHERE name = ?1 LIMIT 1)",
            params![name],
            |row| row.get(0),
        )?)
    }

    pub(crate) fn get_expense_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?)
    }

    /// Sum of every `total_price`. Zero for an empty store.
    pub(crate) fn get_total_spent(&self) -> Result<Decimal> {
        let mut stmt = self.conn.prepare("SELECT total_price FROM expenses")?;
        let rows = stmt.query_map([], |row| decimal_column(row, 0))?;
        sum_rows(rows)
    }

    pub(crate) fn get_total_spent_for(&self, name: &str) -> Result<Decimal> {
        let mut stmt = self
            .conn
            .prepare("SELECT total_price FROM expenses WHERE name = ?1")?;
        let rows = stmt.query_map(params![name], |row| decimal_column(row, 0))?;
        sum_rows(rows)
    }

    // ── Export / import ───────────────────────────────────────

    /// Write all expenses to a CSV file, oldest first. Returns the row count;
    /// nothing is written when the store is empty.
    pub(crate) fn export_to_csv(&self, path: &str) -> Result<usize> {
        let mut expenses = self.get_expenses()?;
        if expenses.is_empty() {
            return Ok(0);
        }
        expenses.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));

        let mut wtr = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create CSV file: {path}"))?;
        wtr.write_record(["id", "name", "unit_price", "quantity", "total_price", "date"])?;
        for e in &expenses {
            wtr.write_record([
                e.id.unwrap_or_default().to_string(),
                e.name.clone(),
                e.unit_price.to_string(),
                e.quantity.to_string(),
                e.total_price.to_string(),
                e.storage_date(),
            ])?;
        }
        wtr.flush().context("Failed to write CSV file")?;
        Ok(expenses.len())
    }

    /// Copy every row of the desktop form's `EXPENSES` table from another
    /// SQLite file. All rows land in one transaction.
    pub(crate) fn import_legacy(&mut self, path: &Path) -> Result<usize> {
        let src = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .with_context(|| format!("Failed to open legacy database: {}", path.display()))?;

        let mut stmt = src
            .prepare(schema::LEGACY_SELECT)
            .context("Legacy database has no EXPENSES table")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut expenses = Vec::new();
        for (i, row) in rows.enumerate() {
            let (name, unit_price, quantity, total_price, date) = row?;
            let line = i + 1;
            let unit_price = float_to_decimal(unit_price)
                .with_context(|| format!("Row {line}: bad unit price"))?;
            let total_price = float_to_decimal(total_price)
                .with_context(|| format!("Row {line}: bad total price"))?;
            let date = NaiveDate::parse_from_str(&date, DATE_STORAGE_FORMAT)
                .with_context(|| format!("Row {line}: bad date '{date}'"))?;
            let expense = Expense::new(name, unit_price, quantity, date)
                .with_context(|| format!("Row {line}: amount too large"))?;
            expenses.push(Expense {
                total_price,
                ..expense
            });
        }

        let tx = self.conn.transaction()?;
        for expense in &expenses {
            insert_into(&tx, expense)?;
        }
        tx.commit()?;
        Ok(expenses.len())
    }
}

fn insert_into(conn: &Connection, expense: &Expense) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO expenses (name, unit_price, quantity, total_price, date, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            expense.name,
            expense.unit_price.to_string(),
            expense.quantity,
            expense.total_price.to_string(),
            expense.storage_date(),
            expense.created_at,
        ],
    )
}

fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        unit_price: decimal_column(row, 2)?,
        quantity: row.get(3)?,
        total_price: decimal_column(row, 4)?,
        date: date_column(row, 5)?,
        created_at: row.get(6)?,
    })
}

fn decimal_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = row.get(idx)?;
    Decimal::from_str(&s)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn date_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let s: String = row.get(idx)?;
    NaiveDate::parse_from_str(&s, DATE_STORAGE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn sum_rows<I>(rows: I) -> Result<Decimal>
where
    I: Iterator<Item = rusqlite::Result<Decimal>>,
{
    let mut total = Decimal::ZERO;
    for amount in rows {
        total = total
            .checked_add(amount?)
            .ok_or_else(|| anyhow::anyhow!("Total spent is too large to compute"))?;
    }
    Ok(total)
}

/// Floats from the legacy table go through their shortest decimal text so
/// `0.1` stays `0.1`.
fn float_to_decimal(value: f64) -> Result<Decimal> {
    let text = value.to_string();
    Decimal::from_str(&text).with_context(|| format!("'{text}' is not representable"))
}
