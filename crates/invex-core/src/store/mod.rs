//! Invoice persistence.

mod csv;
mod json;

pub use self::csv::CsvStore;
pub use self::json::JsonStore;

use crate::error::StoreError;
use crate::models::config::{StoreBackend, StoreConfig};
use crate::models::invoice::{Fingerprint, InvoiceRecord};

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Append-only storage of invoice records.
pub trait InvoiceStore {
    /// Whether a record with this fingerprint is already stored.
    fn contains(&self, fingerprint: &Fingerprint) -> Result<bool> {
        Ok(self
            .load()?
            .iter()
            .any(|record| &record.content_fingerprint == fingerprint))
    }

    /// Persist a new record.
    fn append(&self, record: &InvoiceRecord) -> Result<()>;

    /// All stored records in insertion order. A store that does not exist
    /// yet is empty.
    fn load(&self) -> Result<Vec<InvoiceRecord>>;
}

/// Open the store described by `config`.
pub fn open_store(config: &StoreConfig) -> Box<dyn InvoiceStore> {
    match config.backend {
        StoreBackend::Json => Box::new(JsonStore::new(config.path.clone())),
        StoreBackend::Csv => Box::new(CsvStore::new(config.path.clone())),
    }
}
