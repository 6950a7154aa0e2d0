use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

pub const SOURCE_ENV: &str = "PRODUCT_TABLE_SOURCE";
pub const VARIANT_ENV: &str = "PRODUCT_TABLE_VARIANT";
pub const ROWS_PER_PAGE_OPTIONS: [usize; 4] = [5, 10, 25, 50];
pub const TOAST_LIFE_MS: u64 = 3000;

/// Screen variant switches. One view model serves both the paged screen with
/// row actions and the plain selectable list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    pub paginator: bool,
    pub rows_per_page: usize,
    pub rows_per_page_options: Vec<usize>,
    pub action_column: bool,
    pub toolbar_actions: bool,
    pub toast_life_ms: u64,
}

impl ViewConfig {
    pub fn removable_sort() -> Self {
        Self {
            paginator: true,
            rows_per_page: 10,
            rows_per_page_options: ROWS_PER_PAGE_OPTIONS.to_vec(),
            action_column: true,
            toolbar_actions: true,
            toast_life_ms: TOAST_LIFE_MS,
        }
    }

    pub fn row_select() -> Self {
        Self {
            paginator: false,
            action_column: false,
            toolbar_actions: false,
            ..Self::removable_sort()
        }
    }

    pub fn from_variant(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "removable-sort" => Some(Self::removable_sort()),
            "row-select" => Some(Self::row_select()),
            _ => None,
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self::removable_sort()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    Json(PathBuf),
    Csv(PathBuf),
    Sqlite(PathBuf),
}

impl SourceConfig {
    /// Picks the reader from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(SourceConfig::Json(path.to_path_buf())),
            "csv" => Ok(SourceConfig::Csv(path.to_path_buf())),
            "sqlite" | "db" => Ok(SourceConfig::Sqlite(path.to_path_buf())),
            _ => Err(anyhow!(
                "unsupported catalog file: {} (expected .json, .csv or .sqlite)",
                path.display()
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub view: ViewConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let source = std::env::var(SOURCE_ENV).ok();
        let variant = std::env::var(VARIANT_ENV).ok();
        let default_db = default_db_path()?;
        Self::from_vars(source.as_deref(), variant.as_deref(), default_db)
    }

    pub fn from_vars(source: Option<&str>, variant: Option<&str>, default_db: PathBuf) -> Result<Self> {
        let source = match source.map(str::trim).filter(|s| !s.is_empty()) {
            Some(path) => SourceConfig::from_path(Path::new(path))
                .with_context(|| format!("invalid {SOURCE_ENV}"))?,
            None => SourceConfig::Sqlite(default_db),
        };
        let view = match variant.map(str::trim).filter(|s| !s.is_empty()) {
            Some(name) => ViewConfig::from_variant(name)
                .ok_or_else(|| anyhow!("unknown {VARIANT_ENV}: {name}"))?,
            None => ViewConfig::default(),
        };
        Ok(Self { source, view })
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "product-table", "product-table")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))
}

pub fn default_db_path() -> Result<PathBuf> {
    Ok(project_dirs()?.data_local_dir().join("products.sqlite"))
}

pub fn ensure_webview_data_dir(base_data_dir: &Path) -> Result<PathBuf> {
    let webview_data_dir = base_data_dir.join("webview2");
    std::fs::create_dir_all(&webview_data_dir).with_context(|| {
        format!(
            "failed to create webview dir: {}",
            webview_data_dir.display()
        )
    })?;
    Ok(webview_data_dir)
}

pub fn default_webview_data_dir() -> Result<PathBuf> {
    ensure_webview_data_dir(project_dirs()?.data_local_dir())
}
