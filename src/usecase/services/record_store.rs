use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::entities::product::{normalize_products, Product, RawProduct};
use crate::usecase::ports::source::SourceError;

/// Issued by [`RecordStore::begin_load`]; only the newest ticket may finish a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// Fetched products plus the loading flag.
///
/// The product list is only ever swapped as a whole. Readers holding an older
/// `Arc` keep a consistent snapshot.
#[derive(Debug, Clone)]
pub struct RecordStore {
    products: Arc<[Product]>,
    loading: bool,
    error: Option<String>,
    generation: u64,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self {
            products: Arc::from(Vec::new()),
            loading: false,
            error: None,
            generation: 0,
        }
    }
}

impl RecordStore {
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Ticket of the load currently in flight, if any.
    pub fn pending(&self) -> Option<LoadTicket> {
        self.loading.then_some(LoadTicket {
            generation: self.generation,
        })
    }

    /// Marks a fetch as started. Current rows stay visible until it finishes.
    #[must_use]
    pub fn begin_load(&self) -> (RecordStore, LoadTicket) {
        let generation = self.generation + 1;
        let next = RecordStore {
            products: self.products.clone(),
            loading: true,
            error: None,
            generation,
        };
        (next, LoadTicket { generation })
    }

    /// Applies a fetch result. Dates are normalized here, once per fetch.
    /// A result for a superseded ticket is dropped.
    #[must_use]
    pub fn finish_load(
        &self,
        ticket: LoadTicket,
        result: Result<Vec<RawProduct>, SourceError>,
    ) -> RecordStore {
        if ticket.generation != self.generation || !self.loading {
            warn!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale product load"
            );
            return self.clone();
        }

        match result.and_then(|raw| normalize_products(raw).map_err(SourceError::from)) {
            Ok(products) => {
                info!(count = products.len(), "products loaded");
                RecordStore {
                    products: products.into(),
                    loading: false,
                    error: None,
                    generation: self.generation,
                }
            }
            Err(err) => {
                warn!(error = %err, "product load failed");
                RecordStore {
                    products: Arc::from(Vec::new()),
                    loading: false,
                    error: Some(err.to_string()),
                    generation: self.generation,
                }
            }
        }
    }
}
