use chrono::NaiveDate;
use thiserror::Error;

/// Display and filter-mask format for dates.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterInputError {
    #[error("`{0}` is not a date (expected dd.mm.yyyy)")]
    InvalidDate(String),
    #[error("`{0}` is not a whole number")]
    InvalidQuantity(String),
    #[error("`{0}` is not true or false")]
    InvalidFlag(String),
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses the filter box input. `dd.mm.yyyy` is the mask; ISO dates are also taken.
pub fn parse_date_input(text: &str) -> Result<NaiveDate, FilterInputError> {
    let trimmed = text.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .map_err(|_| FilterInputError::InvalidDate(trimmed.to_string()))
}

pub fn parse_quantity_input(text: &str) -> Result<i64, FilterInputError> {
    let trimmed = text.trim();
    trimmed
        .parse::<i64>()
        .map_err(|_| FilterInputError::InvalidQuantity(trimmed.to_string()))
}

pub fn parse_flag_input(text: &str) -> Result<bool, FilterInputError> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        other => Err(FilterInputError::InvalidFlag(other.to_string())),
    }
}
