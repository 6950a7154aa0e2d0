use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::entities::product::RawProduct;
use crate::usecase::ports::source::{ProductSource, SourceError};

/// Either a bare array or the `{"data": [...]}` envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    List(Vec<RawProduct>),
    Wrapped { data: Vec<RawProduct> },
}

pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

pub fn parse_catalog(text: &str) -> Result<Vec<RawProduct>, SourceError> {
    let document: CatalogDocument =
        serde_json::from_str(text).map_err(|err| SourceError::Parse(err.to_string()))?;
    Ok(match document {
        CatalogDocument::List(items) | CatalogDocument::Wrapped { data: items } => items,
    })
}

impl ProductSource for JsonFileSource {
    fn fetch_products(&self) -> Result<Vec<RawProduct>, SourceError> {
        let text = std::fs::read_to_string(&self.path)?;
        parse_catalog(&text)
    }

    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_and_wrapped_documents() {
        let item = r#"{"id":1,"code":"A1","name":"Widget","category":"Tools","quantity":5,"date":"2024-01-10","verified":true}"#;
        let bare = parse_catalog(&format!("[{item}]")).expect("bare array should parse");
        let wrapped = parse_catalog(&format!(r#"{{"data":[{item}]}}"#)).expect("envelope should parse");
        assert_eq!(bare, wrapped);
        assert_eq!(bare[0].code, "A1");
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let result = parse_catalog("{\"data\": 3}");
        assert!(matches!(result, Err(SourceError::Parse(_))), "unexpected: {result:?}");
    }
}
