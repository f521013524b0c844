use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Storage format for `Expense::date`.
pub const DATE_STORAGE_FORMAT: &str = "%Y-%m-%d";

/// Display format used in the history view.
const DATE_DISPLAY_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: Option<i64>,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i64,
    pub total_price: Decimal,
    pub date: NaiveDate,
    pub created_at: String,
}

impl Expense {
    /// `None` when `unit_price * quantity` does not fit in a `Decimal`.
    pub fn new(
        name: String,
        unit_price: Decimal,
        quantity: i64,
        date: NaiveDate,
    ) -> Option<Self> {
        let total_price = unit_price.checked_mul(Decimal::from(quantity))?;
        Some(Self {
            id: None,
            name,
            unit_price,
            quantity,
            total_price,
            date,
            created_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    pub fn storage_date(&self) -> String {
        self.date.format(DATE_STORAGE_FORMAT).to_string()
    }

    pub fn display_date(&self) -> String {
        self.date.format(DATE_DISPLAY_FORMAT).to_string()
    }
}
