use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use crate::models::Expense;

/// Day-first formats accepted for the date field, tried in order.
pub(crate) const INPUT_DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y"];

pub(crate) const DATE_FORMATS_HELP: &str = "Valid date formats:\n\ndd/mm/yyyy\ndd-mm-yyyy\n";

/// Validation failures. The `Display` text is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum FormError {
    #[error("Fill in all fields.")]
    MissingFields,
    #[error("The 'Unit price' field must be a valid number.")]
    InvalidUnitPrice,
    #[error("The 'Quantity' field must be a whole number.")]
    InvalidQuantity,
    #[error("Invalid date.")]
    InvalidDate,
    #[error("The total amount is too large.")]
    AmountTooLarge,
}

/// Which input a form field maps to, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    Name,
    UnitPrice,
    Quantity,
    Date,
}

impl Field {
    pub(crate) fn all() -> &'static [Field] {
        &[Self::Name, Self::UnitPrice, Self::Quantity, Self::Date]
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Name => "Item/Service",
            Self::UnitPrice => "Unit price",
            Self::Quantity => "Quantity",
            Self::Date => "Date",
        }
    }

    pub(crate) fn next(self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|f| *f == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub(crate) fn prev(self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|f| *f == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

/// Raw text of the four expense inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ExpenseForm {
    pub(crate) name: String,
    pub(crate) unit_price: String,
    pub(crate) quantity: String,
    pub(crate) date: String,
}

impl ExpenseForm {
    pub(crate) fn new(
        name: impl Into<String>,
        unit_price: impl Into<String>,
        quantity: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            unit_price: unit_price.into(),
            quantity: quantity.into(),
            date: date.into(),
        }
    }

    pub(crate) fn field(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::UnitPrice => &self.unit_price,
            Field::Quantity => &self.quantity,
            Field::Date => &self.date,
        }
    }

    pub(crate) fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::UnitPrice => &mut self.unit_price,
            Field::Quantity => &mut self.quantity,
            Field::Date => &mut self.date,
        }
    }

    /// Copy of the form with surrounding whitespace removed from every field.
    pub(crate) fn trimmed(&self) -> Self {
        Self::new(
            self.name.trim(),
            self.unit_price.trim(),
            self.quantity.trim(),
            self.date.trim(),
        )
    }

    pub(crate) fn clear(&mut self) {
        self.name.clear();
        self.unit_price.clear();
        self.quantity.clear();
        self.date.clear();
    }

    /// Check the fields in order (name, unit price, quantity, date) and build
    /// the expense. The first failing field decides the error.
    pub(crate) fn validate(&self) -> Result<Expense, FormError> {
        let form = self.trimmed();

        if form.name.is_empty() {
            return Err(FormError::MissingFields);
        }
        let unit_price = parse_unit_price(&form.unit_price)?;
        let quantity = parse_quantity(&form.quantity)?;
        let date = parse_date(&form.date)?;

        Expense::new(form.name, unit_price, quantity, date).ok_or(FormError::AmountTooLarge)
    }
}

fn parse_unit_price(s: &str) -> Result<Decimal, FormError> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .map_err(|_| FormError::InvalidUnitPrice)
}

fn parse_quantity(s: &str) -> Result<i64, FormError> {
    s.parse::<i64>().map_err(|_| FormError::InvalidQuantity)
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, FormError> {
    INPUT_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .ok_or(FormError::InvalidDate)
}
