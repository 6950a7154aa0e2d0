pub mod import;
pub mod json;
pub mod sqlite;

use std::sync::Arc;

use anyhow::Result;

use crate::config::SourceConfig;
use crate::infra::import::csv::CsvFileSource;
use crate::infra::json::source::JsonFileSource;
use crate::infra::sqlite::repo::SqliteCatalog;
use crate::usecase::ports::source::ProductSource;

pub fn open_source(config: &SourceConfig) -> Result<Arc<dyn ProductSource>> {
    let source: Arc<dyn ProductSource> = match config {
        SourceConfig::Json(path) => Arc::new(JsonFileSource::new(path.clone())),
        SourceConfig::Csv(path) => Arc::new(CsvFileSource::new(path.clone())),
        SourceConfig::Sqlite(path) => Arc::new(SqliteCatalog::open(path.clone())?),
    };
    Ok(source)
}
