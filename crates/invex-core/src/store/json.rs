//! Single-document JSON store.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{InvoiceStore, Result};
use crate::error::StoreError;
use crate::models::invoice::InvoiceRecord;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Database {
    #[serde(default)]
    invoices: Vec<InvoiceRecord>,
}

/// `{ "invoices": [...] }` in one pretty-printed file, rewritten on every
/// append. Assumes a single writer.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Database> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Database::default()),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        if content.trim().is_empty() {
            return Ok(Database::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write(&self, db: &Database) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        let content = serde_json::to_string_pretty(db)?;
        fs::write(&self.path, content).map_err(|e| StoreError::io(&self.path, e))
    }
}

impl InvoiceStore for JsonStore {
    fn append(&self, record: &InvoiceRecord) -> Result<()> {
        let mut db = self.read()?;
        db.invoices.push(record.clone());
        self.write(&db)?;
        debug!(
            "Stored invoice {} ({} total) in {}",
            record.invoice_id,
            db.invoices.len(),
            self.path.display()
        );
        Ok(())
    }

    fn load(&self) -> Result<Vec<InvoiceRecord>> {
        Ok(self.read()?.invoices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::{Fingerprint, LineItem};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn record(hash: &str) -> InvoiceRecord {
        InvoiceRecord {
            invoice_id: Uuid::new_v4(),
            invoice_no: "17042".to_string(),
            vendor: "John Smith".to_string(),
            date: "03/05/2024".to_string(),
            total_amount: Decimal::new(12345, 2),
            items: vec![LineItem {
                item_id: Uuid::new_v4(),
                name: "Gaming Laptop".to_string(),
                price: Decimal::new(10000, 2),
                category: "technology".to_string(),
            }],
            content_fingerprint: Fingerprint::from(hash.to_string()),
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("nested/db.json"));
        assert!(store.load().unwrap().is_empty());
        assert!(!store.contains(&Fingerprint::from("abc".to_string())).unwrap());
    }

    #[test]
    fn test_append_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("nested/db.json"));
        let first = record("aaa");
        let second = record("bbb");

        store.append(&first).unwrap();
        store.append(&second).unwrap();

        assert_eq!(store.load().unwrap(), vec![first, second]);
        assert!(store.contains(&Fingerprint::from("bbb".to_string())).unwrap());
    }

    #[test]
    fn test_document_shape() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("db.json"));
        store.append(&record("aaa")).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        let invoice = &raw["invoices"][0];
        assert_eq!(invoice["total_amount"], serde_json::json!(123.45));
        assert_eq!(invoice["items"][0]["price"], serde_json::json!(100.0));
        assert_eq!(invoice["content_fingerprint"], "aaa");
    }

    #[test]
    fn test_reads_legacy_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(
            &path,
            r#"{"invoices": [{
                "invoice_id": "5b0cbf2a-8f2d-4d3c-9a57-2f5d0b7a1c11",
                "invoice_no": "36259",
                "vendor": "Aaron Hawkins",
                "date": "Unknown",
                "total_amount": 50.1,
                "items": [{"name": "Mask", "price": 50.1, "category": "fashion"}],
                "_hash": "d41d8cd98f00b204e9800998ecf8427e"
            }]}"#,
        )
        .unwrap();

        let records = JsonStore::new(&path).load().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].content_fingerprint.as_str(), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(records[0].items[0].price, Decimal::new(501, 1));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(JsonStore::new(&path).load(), Err(StoreError::Json(_))));
    }
}
