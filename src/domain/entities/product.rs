use std::collections::HashSet;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::entities::column::ColumnKey;
use crate::domain::format::format_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A product exactly as the data source delivers it.
///
/// Unknown fields (`price`, `description`, ...) are ignored on deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProduct {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub quantity: i64,
    pub date: String,
    #[serde(default)]
    pub verified: bool,
}

/// A normalized product row. `begda` is the wire `date` parsed once at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub code: String,
    pub name: String,
    pub category: String,
    pub quantity: i64,
    pub begda: NaiveDate,
    pub verified: bool,
}

/// Borrowed view of one cell, typed by column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CellValue<'a> {
    Text(&'a str),
    Number(i64),
    Date(NaiveDate),
    Bool(bool),
}

impl CellValue<'_> {
    pub fn display(&self) -> String {
        match self {
            CellValue::Text(text) => (*text).to_string(),
            CellValue::Number(number) => number.to_string(),
            CellValue::Date(date) => format_date(*date),
            CellValue::Bool(true) => "✔".to_string(),
            CellValue::Bool(false) => "✘".to_string(),
        }
    }
}

impl Product {
    pub fn cell(&self, key: ColumnKey) -> CellValue<'_> {
        match key {
            ColumnKey::Code => CellValue::Text(&self.code),
            ColumnKey::Name => CellValue::Text(&self.name),
            ColumnKey::Category => CellValue::Text(&self.category),
            ColumnKey::Quantity => CellValue::Number(self.quantity),
            ColumnKey::Begda => CellValue::Date(self.begda),
            ColumnKey::Verified => CellValue::Bool(self.verified),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductError {
    #[error("product #{id}: unrecognized date `{value}`")]
    InvalidDate { id: i64, value: String },
    #[error("duplicate product id #{0}")]
    DuplicateId(ProductId),
}

/// Accepts `yyyy-mm-dd` or an RFC 3339 timestamp; the time of day is dropped.
pub fn parse_wire_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

impl TryFrom<RawProduct> for Product {
    type Error = ProductError;

    fn try_from(raw: RawProduct) -> Result<Self, Self::Error> {
        let begda = parse_wire_date(&raw.date).ok_or_else(|| ProductError::InvalidDate {
            id: raw.id,
            value: raw.date.clone(),
        })?;
        Ok(Product {
            id: ProductId(raw.id),
            code: raw.code,
            name: raw.name,
            category: raw.category,
            quantity: raw.quantity,
            begda,
            verified: raw.verified,
        })
    }
}

/// Converts a fetched batch into products, rejecting the whole batch on the
/// first bad date or repeated id.
pub fn normalize_products(raw: Vec<RawProduct>) -> Result<Vec<Product>, ProductError> {
    let mut seen = HashSet::with_capacity(raw.len());
    let mut products = Vec::with_capacity(raw.len());
    for item in raw {
        let product = Product::try_from(item)?;
        if !seen.insert(product.id) {
            return Err(ProductError::DuplicateId(product.id));
        }
        products.push(product);
    }
    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: i64, date: &str) -> RawProduct {
        RawProduct {
            id,
            code: format!("C{id}"),
            name: format!("Item {id}"),
            category: "Tools".to_string(),
            quantity: id,
            date: date.to_string(),
            verified: id % 2 == 0,
        }
    }

    #[test]
    fn parse_wire_date_accepts_iso_and_rfc3339() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 10);
        assert_eq!(parse_wire_date("2024-01-10"), expected);
        assert_eq!(parse_wire_date("2024-01-10T15:30:00+02:00"), expected);
        assert_eq!(parse_wire_date("10.01.2024"), None);
    }

    #[test]
    fn normalize_rejects_duplicate_ids() {
        let result = normalize_products(vec![raw(1, "2024-01-10"), raw(1, "2024-01-11")]);
        assert_eq!(result, Err(ProductError::DuplicateId(ProductId(1))));
    }

    #[test]
    fn normalize_rejects_bad_dates() {
        let result = normalize_products(vec![raw(3, "not a date")]);
        assert!(
            matches!(result, Err(ProductError::InvalidDate { id: 3, .. })),
            "unexpected result: {result:?}"
        );
    }

    #[test]
    fn raw_product_ignores_unknown_fields() {
        let json = r#"{"id":7,"code":"f230fh0g3","name":"Bamboo Watch","description":"Product Description",
            "price":65,"category":"Accessories","quantity":24,"date":"2015-09-13","verified":true}"#;
        let parsed: RawProduct = serde_json::from_str(json).expect("should parse product json");
        assert_eq!(parsed.name, "Bamboo Watch");
        assert_eq!(parsed.quantity, 24);
        assert!(parsed.verified);
    }

    #[test]
    fn cell_display_formats_dates_and_flags() {
        let product = Product::try_from(raw(2, "2024-02-15")).expect("valid product");
        assert_eq!(product.cell(ColumnKey::Begda).display(), "15.02.2024");
        assert_eq!(product.cell(ColumnKey::Verified).display(), "✔");
        assert_eq!(product.cell(ColumnKey::Quantity).display(), "2");
    }
}
