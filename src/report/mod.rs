//! Text views rendered into the console panel (and printed by the CLI).

use std::collections::HashMap;

use anyhow::Result;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::db::Database;
use crate::models::Expense;

/// Width the history view right-aligns amounts to.
pub(crate) const VALUE_WIDTH: usize = 7;

pub(crate) const HISTORY_HEADER: &str = "Registered expenses:";

/// Two decimals, half away from zero.
pub(crate) fn format_money(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

/// Right-align a formatted amount to `VALUE_WIDTH`. Wider values pass through.
pub(crate) fn pad_value(value: Decimal) -> String {
    format!("{:>width$}", format_money(value), width = VALUE_WIDTH)
}

/// Group by name (first appearance decides group order) and list each group
/// newest first. Items on the same date keep their stored order.
pub(crate) fn render_history(expenses: &[Expense]) -> String {
    let mut groups: Vec<(&str, Vec<&Expense>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for expense in expenses {
        let name = expense.name.as_str();
        let idx = *index.entry(name).or_insert_with(|| {
            groups.push((name, Vec::new()));
            groups.len() - 1
        });
        groups[idx].1.push(expense);
    }

    let mut out = format!("{HISTORY_HEADER}\n");
    for (name, mut items) in groups {
        items.sort_by(|a, b| b.date.cmp(&a.date));
        out.push_str(&format!("{name}:\n"));
        for item in items {
            out.push_str(&format!(
                "    - Amount: {}, spent on: {}\n",
                pad_value(item.total_price),
                item.display_date()
            ));
        }
    }
    out
}

pub(crate) fn render_total(total: Decimal) -> String {
    format!("Total spent: {}\n", format_money(total))
}

pub(crate) fn render_total_for(name: &str, total: Decimal) -> String {
    format!("Total spent on {name}: {}\n", format_money(total))
}

pub(crate) fn render_not_found(name: &str) -> String {
    format!("Expense '{name}' not found.\n")
}

pub(crate) fn expense_history(db: &Database) -> Result<String> {
    Ok(render_history(&db.get_expenses()?))
}

/// Grand total when `raw_name` is blank, otherwise the total for that name.
pub(crate) fn total_or_subtotal(db: &Database, raw_name: &str) -> Result<String> {
    let name = raw_name.trim();
    if name.is_empty() {
        return Ok(render_total(db.get_total_spent()?));
    }
    if db.expense_exists(name)? {
        Ok(render_total_for(name, db.get_total_spent_for(name)?))
    } else {
        Ok(render_not_found(name))
    }
}
