use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::SourceConfig;
use crate::domain::entities::product::{normalize_products, ProductId};
use crate::infra::open_source;
use crate::infra::sqlite::repo::SqliteCatalog;

/// Copies an external catalog file into the local SQLite catalog.
pub struct ImportService {
    catalog: Arc<SqliteCatalog>,
}

impl ImportService {
    pub fn new(catalog: Arc<SqliteCatalog>) -> Self {
        Self { catalog }
    }

    /// Replaces the local catalog with the rows of `path`. The file is fully
    /// validated before anything is written. Returns the imported row count.
    pub fn import_file(&self, path: &Path) -> Result<usize> {
        let source = match SourceConfig::from_path(path)? {
            SourceConfig::Sqlite(_) => anyhow::bail!("cannot import from another sqlite catalog"),
            other => open_source(&other)?,
        };
        let raw = source
            .fetch_products()
            .with_context(|| format!("failed to read {}", source.describe()))?;
        normalize_products(raw.clone())
            .with_context(|| format!("rejected catalog {}", path.display()))?;

        let count = self.catalog.replace_all(&raw)?;
        info!(path = %path.display(), count, "catalog imported");
        Ok(count)
    }

    pub fn delete_product(&self, id: ProductId) -> Result<()> {
        self.catalog.delete_product(id)
    }
}
