use std::path::PathBuf;

use anyhow::Result;

use crate::domain::entities::product::{ProductId, RawProduct};
use crate::infra::sqlite::queries::{delete_product, load_products, replace_products};
use crate::infra::sqlite::schema::init_db;
use crate::usecase::ports::source::{ProductSource, SourceError};

/// Local product catalog backed by SQLite.
pub struct SqliteCatalog {
    pub db_path: PathBuf,
}

impl SqliteCatalog {
    pub fn open(db_path: PathBuf) -> Result<Self> {
        init_db(&db_path)?;
        Ok(Self { db_path })
    }

    pub fn replace_all(&self, products: &[RawProduct]) -> Result<usize> {
        replace_products(&self.db_path, products)
    }

    pub fn delete_product(&self, id: ProductId) -> Result<()> {
        delete_product(&self.db_path, id.0)
    }
}

impl ProductSource for SqliteCatalog {
    fn fetch_products(&self) -> Result<Vec<RawProduct>, SourceError> {
        load_products(&self.db_path).map_err(|err| SourceError::Storage(format!("{err:#}")))
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.db_path.display())
    }
}
