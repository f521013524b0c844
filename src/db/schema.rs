pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS expenses (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    unit_price  TEXT NOT NULL,
    quantity    INTEGER NOT NULL,
    total_price TEXT NOT NULL,
    date        TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_expenses_name ON expenses(name);
CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[];

/// Table written by the original desktop form. Read-only, for `import_legacy`.
pub(crate) const LEGACY_SELECT: &str =
    "SELECT NAME, UNITY_PRICE, QUANTITY, TOTAL_PRICE, DATE FROM EXPENSES ORDER BY ID";
