use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::entities::product::RawProduct;
use crate::usecase::ports::source::{ProductSource, SourceError};

/// CSV catalog with a header row named after the `RawProduct` fields.
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

pub fn read_csv_products(csv_path: &Path) -> Result<Vec<RawProduct>> {
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open csv: {}", csv_path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("failed to read headers from csv: {}", csv_path.display()))?;

    if headers.is_empty() {
        anyhow::bail!("csv header is required")
    }

    let mut products = Vec::new();
    for (row_idx, record) in reader.deserialize::<RawProduct>().enumerate() {
        let product = record.with_context(|| format!("failed to parse csv row {}", row_idx + 1))?;
        products.push(product);
    }
    Ok(products)
}

impl ProductSource for CsvFileSource {
    fn fetch_products(&self) -> Result<Vec<RawProduct>, SourceError> {
        read_csv_products(&self.path).map_err(|err| SourceError::Parse(format!("{err:#}")))
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }
}
