use thiserror::Error;

use crate::domain::entities::product::{ProductError, RawProduct};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed catalog: {0}")]
    Parse(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error(transparent)]
    Invalid(#[from] ProductError),
    #[error("{0}")]
    Message(String),
}

/// Where product rows come from. The whole collection is returned in one call;
/// no filtering or paging happens on the source side.
pub trait ProductSource: Send + Sync {
    fn fetch_products(&self) -> Result<Vec<RawProduct>, SourceError>;

    /// Short human-readable origin, used in status lines and logs.
    fn describe(&self) -> String;
}
