//! Two-table CSV store.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use super::{InvoiceStore, Result};
use crate::error::StoreError;
use crate::models::invoice::{Fingerprint, InvoiceRecord, LineItem};

const INVOICES_FILE: &str = "invoices.csv";
const ITEMS_FILE: &str = "items.csv";

#[derive(Debug, Serialize, Deserialize)]
struct InvoiceRow {
    invoice_id: Uuid,
    invoice_no: String,
    vendor: String,
    date: String,
    total_amount: Decimal,
    content_fingerprint: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ItemRow {
    item_id: Uuid,
    invoice_id: Uuid,
    name: String,
    price: Decimal,
    category: String,
}

/// `invoices.csv` and `items.csv` in one directory, linked by `invoice_id`.
#[derive(Debug, Clone)]
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn invoices_path(&self) -> PathBuf {
        self.dir.join(INVOICES_FILE)
    }

    pub fn items_path(&self) -> PathBuf {
        self.dir.join(ITEMS_FILE)
    }

    fn append_rows<T: Serialize>(&self, path: &Path, rows: &[T]) -> Result<()> {
        let is_new = match fs::metadata(path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == ErrorKind::NotFound => true,
            Err(e) => return Err(StoreError::io(path, e)),
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| StoreError::io(path, e))?;

        let mut writer = ::csv::WriterBuilder::new()
            .has_headers(is_new)
            .from_writer(file);
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush().map_err(|e| StoreError::io(path, e))
    }

    fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
        let mut reader = match ::csv::Reader::from_path(path) {
            Ok(reader) => reader,
            Err(e) => {
                if let ::csv::ErrorKind::Io(io) = e.kind() {
                    if io.kind() == ErrorKind::NotFound {
                        return Ok(Vec::new());
                    }
                }
                return Err(e.into());
            }
        };

        let mut rows = Vec::new();
        for row in reader.deserialize() {
            rows.push(row?);
        }
        Ok(rows)
    }
}

impl InvoiceStore for CsvStore {
    fn append(&self, record: &InvoiceRecord) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;

        let invoice = InvoiceRow {
            invoice_id: record.invoice_id,
            invoice_no: record.invoice_no.clone(),
            vendor: record.vendor.clone(),
            date: record.date.clone(),
            total_amount: record.total_amount,
            content_fingerprint: record.content_fingerprint.as_str().to_string(),
        };
        let items: Vec<ItemRow> = record
            .items
            .iter()
            .map(|item| ItemRow {
                item_id: item.item_id,
                invoice_id: record.invoice_id,
                name: item.name.clone(),
                price: item.price,
                category: item.category.clone(),
            })
            .collect();

        // Items first so a stored invoice row always has its items.
        self.append_rows(&self.items_path(), &items)?;
        self.append_rows(&self.invoices_path(), &[invoice])?;

        debug!(
            "Stored invoice {} with {} items in {}",
            record.invoice_id,
            items.len(),
            self.dir.display()
        );
        Ok(())
    }

    fn load(&self) -> Result<Vec<InvoiceRecord>> {
        let invoices: Vec<InvoiceRow> = Self::read_rows(&self.invoices_path())?;
        let item_rows: Vec<ItemRow> = Self::read_rows(&self.items_path())?;

        let mut items: HashMap<Uuid, Vec<LineItem>> = HashMap::new();
        for row in item_rows {
            items.entry(row.invoice_id).or_default().push(LineItem {
                item_id: row.item_id,
                name: row.name,
                price: row.price,
                category: row.category,
            });
        }

        Ok(invoices
            .into_iter()
            .map(|row| InvoiceRecord {
                items: items.remove(&row.invoice_id).unwrap_or_default(),
                invoice_id: row.invoice_id,
                invoice_no: row.invoice_no,
                vendor: row.vendor,
                date: row.date,
                total_amount: row.total_amount,
                content_fingerprint: Fingerprint::from(row.content_fingerprint),
            })
            .collect())
    }
}
