//! Invoice records and the raw documents they are extracted from.

use std::fmt;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Placeholder for text fields that could not be extracted.
pub const UNKNOWN: &str = "Unknown";

/// Category assigned when no keyword list matches.
pub const UNCATEGORIZED: &str = "uncategorized";

/// A stored invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Generated identifier, unique per stored record.
    pub invoice_id: Uuid,

    /// Invoice number as printed, or [`UNKNOWN`].
    pub invoice_no: String,

    /// Vendor name, or [`UNKNOWN`].
    pub vendor: String,

    /// Invoice date as MM/DD/YYYY, or [`UNKNOWN`].
    pub date: String,

    /// Invoice total, zero when no total was found.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,

    /// Line items in extraction order.
    #[serde(default)]
    pub items: Vec<LineItem>,

    /// Hash of the source file bytes.
    #[serde(alias = "_hash")]
    pub content_fingerprint: Fingerprint,
}

impl InvoiceRecord {
    /// Sum of line item prices.
    pub fn items_total(&self) -> Decimal {
        self.items
            .iter()
            .fold(Decimal::ZERO, |acc, item| acc.saturating_add(item.price))
    }

    /// Year component of the date, or the raw date when it has no `/`.
    pub fn year(&self) -> &str {
        self.date.rsplit('/').next().unwrap_or(&self.date)
    }
}

/// A single line item on an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Generated identifier, unique per item.
    #[serde(default = "Uuid::new_v4")]
    pub item_id: Uuid,

    /// Whitespace-normalized description.
    pub name: String,

    /// Item price.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Category name or [`UNCATEGORIZED`].
    pub category: String,
}

/// Deterministic content hash of a document (hex SHA-256).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Hash raw document bytes.
    pub fn of(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Fingerprint(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Fingerprint {
    fn from(value: String) -> Self {
        Fingerprint(value)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How text is acquired from a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Text-based PDF (native text extraction).
    Pdf,
    /// Scanned image (OCR).
    Image,
}

impl SourceKind {
    /// Classify a file by extension; anything that is not a PDF goes to OCR.
    pub fn from_path(path: &Path) -> Self {
        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

        if is_pdf { SourceKind::Pdf } else { SourceKind::Image }
    }
}

/// File contents read once per file event.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub kind: SourceKind,
    pub fingerprint: Fingerprint,
}

impl RawDocument {
    /// Read a document from disk.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(path, bytes))
    }

    /// Wrap bytes that were already read.
    pub fn from_bytes(path: &Path, bytes: Vec<u8>) -> Self {
        let fingerprint = Fingerprint::of(&bytes);
        Self {
            path: path.to_path_buf(),
            kind: SourceKind::from_path(path),
            bytes,
            fingerprint,
        }
    }

    /// File name for log messages.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn record(date: &str) -> InvoiceRecord {
        InvoiceRecord {
            invoice_id: Uuid::new_v4(),
            invoice_no: "17042".to_string(),
            vendor: "John Smith".to_string(),
            date: date.to_string(),
            total_amount: Decimal::from_str("123.45").unwrap(),
            items: vec![LineItem {
                item_id: Uuid::new_v4(),
                name: "Gaming Laptop".to_string(),
                price: Decimal::from_str("100.00").unwrap(),
                category: "technology".to_string(),
            }],
            content_fingerprint: Fingerprint::of(b"invoice"),
        }
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = Fingerprint::of(b"same bytes");
        let b = Fingerprint::of(b"same bytes");
        let c = Fingerprint::of(b"other bytes");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str().len(), 64);
    }

    #[test]
    fn test_source_kind_from_extension() {
        assert_eq!(SourceKind::from_path(Path::new("a/b.PDF")), SourceKind::Pdf);
        assert_eq!(SourceKind::from_path(Path::new("scan.png")), SourceKind::Image);
        assert_eq!(SourceKind::from_path(Path::new("noext")), SourceKind::Image);
    }

    #[test]
    fn test_year() {
        assert_eq!(record("03/15/2024").year(), "2024");
        assert_eq!(record(UNKNOWN).year(), UNKNOWN);
    }

    #[test]
    fn test_json_uses_numbers_and_reads_legacy_hash() {
        let json = serde_json::to_value(record("03/15/2024")).unwrap();
        assert!(json["total_amount"].is_number());
        assert!(json["items"][0]["price"].is_number());

        let legacy = r#"{
            "invoice_id": "6f1c1f5e-6f5e-4a57-9d1c-0a4a1b4f5e11",
            "invoice_no": "12345",
            "vendor": "Acme",
            "date": "10/22/2012",
            "total_amount": 57.18,
            "items": [{"name": "Wii Remote", "price": 57.18, "category": "technology"}],
            "_hash": "abc"
        }"#;
        let parsed: InvoiceRecord = serde_json::from_str(legacy).unwrap();
        assert_eq!(parsed.content_fingerprint.as_str(), "abc");
        assert_eq!(parsed.total_amount, Decimal::from_str("57.18").unwrap());
        assert_eq!(parsed.items_total(), Decimal::from_str("57.18").unwrap());
    }
}
