//! Layout-driven invoice parser.

use std::time::Instant;

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::ExtractionError;
use crate::models::invoice::{SourceKind, UNKNOWN};

use super::layout::{Layout, LayoutRules, detect_layout};
use super::rules::{ExtractedItem, FieldExtractor, StrategyChain};

/// Field values extracted from one document's text, defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFields {
    pub layout: Layout,
    pub invoice_no: String,
    pub vendor: String,
    pub date: String,
    pub total_amount: Decimal,
    pub items: Vec<ExtractedItem>,
    /// Fields that fell back to their default value.
    pub missing_fields: Vec<&'static str>,
}

/// Trait for invoice parsing.
pub trait InvoiceParser {
    /// Parse invoice fields from text. Missing fields take defaults.
    fn parse(&self, text: &str) -> ExtractedFields;
}

/// Parser for a single known layout.
pub struct LayoutParser {
    layout: Layout,
    rules: LayoutRules,
}

impl LayoutParser {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            rules: LayoutRules::for_layout(layout),
        }
    }

    /// Choose the parser for a document.
    ///
    /// Images always use the scanned layout. PDFs are detected from their
    /// markers and unrecognized PDFs are rejected.
    pub fn for_document(kind: SourceKind, text: &str) -> Result<Self, ExtractionError> {
        let layout = match kind {
            SourceKind::Image => Layout::Scanned,
            SourceKind::Pdf => detect_layout(text).ok_or(ExtractionError::UnknownLayout)?,
        };
        debug!("Using {} layout", layout);
        Ok(Self::new(layout))
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }
}

impl InvoiceParser for LayoutParser {
    fn parse(&self, text: &str) -> ExtractedFields {
        let start = Instant::now();
        let mut missing_fields = Vec::new();

        info!(
            "Parsing {} invoice from {} characters of text",
            self.layout,
            text.len()
        );

        let mut text_field = |chain: &StrategyChain<String>| {
            chain.extract(text).unwrap_or_else(|| {
                missing_fields.push(chain.field());
                UNKNOWN.to_string()
            })
        };
        let invoice_no = text_field(&self.rules.invoice_no);
        let vendor = text_field(&self.rules.vendor);
        let date = text_field(&self.rules.date);

        let total_amount = self.rules.total.extract(text).unwrap_or_else(|| {
            missing_fields.push(self.rules.total.field());
            Decimal::ZERO
        });

        let items = self.rules.items.extract(text).unwrap_or_else(|| {
            missing_fields.push(self.rules.items.field());
            Vec::new()
        });

        debug!(
            "Extracted invoice {} ({} items, missing: {:?}) in {}ms",
            invoice_no,
            items.len(),
            missing_fields,
            start.elapsed().as_millis()
        );

        ExtractedFields {
            layout: self.layout,
            invoice_no,
            vendor,
            date,
            total_amount,
            items,
            missing_fields,
        }
    }
}
