//! Core library for invoice intake and reporting.
//!
//! This crate provides:
//! - Text acquisition (PDF text extraction, OCR for scanned images)
//! - Layout detection and rule-based field and line-item extraction
//! - Keyword categorization and content-hash deduplication
//! - JSON and CSV invoice stores with aggregate reporting
//! - The per-file pipeline used by the directory watcher

pub mod acquire;
pub mod error;
pub mod invoice;
pub mod models;
pub mod notify;
pub mod ocr;
pub mod pdf;
pub mod pipeline;
pub mod report;
pub mod store;

pub use acquire::{DocumentTextSource, TextSource};
pub use error::{InvexError, Result};
pub use invoice::{Categorizer, ExtractedFields, InvoiceAssembler, InvoiceParser, Layout, LayoutParser};
pub use models::config::InvexConfig;
pub use models::invoice::{Fingerprint, InvoiceRecord, LineItem, RawDocument, SourceKind};
pub use notify::{LogNotifier, Notifier, OutboxNotifier, notifier_from_config};
pub use pipeline::{FileOutcome, InvoicePipeline};
pub use report::{ReportOptions, ReportService, ReportSummary};
pub use store::{CsvStore, InvoiceStore, JsonStore, open_store};
