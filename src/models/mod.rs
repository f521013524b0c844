mod expense;

pub use expense::{Expense, DATE_STORAGE_FORMAT};
