//! Builds stored records from extracted fields.

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::invoice::{InvoiceRecord, LineItem, RawDocument};
use crate::store::InvoiceStore;

use super::categorize::Categorizer;
use super::parser::ExtractedFields;

/// Combines extracted fields with document identity and categories.
#[derive(Debug, Clone, Default)]
pub struct InvoiceAssembler {
    categorizer: Categorizer,
}

impl InvoiceAssembler {
    pub fn new(categorizer: Categorizer) -> Self {
        Self { categorizer }
    }

    /// Build a record with fresh identifiers. Does not consult any store.
    pub fn build(&self, doc: &RawDocument, fields: ExtractedFields) -> InvoiceRecord {
        let items = fields
            .items
            .into_iter()
            .map(|item| {
                let name = normalize_whitespace(&item.name);
                let category = self.categorizer.categorize(&name).to_string();
                LineItem {
                    item_id: Uuid::new_v4(),
                    name,
                    price: item.price,
                    category,
                }
            })
            .collect();

        InvoiceRecord {
            invoice_id: Uuid::new_v4(),
            invoice_no: fields.invoice_no,
            vendor: fields.vendor,
            date: fields.date,
            total_amount: fields.total_amount,
            items,
            content_fingerprint: doc.fingerprint.clone(),
        }
    }

    /// Build a record unless `store` already holds this document.
    ///
    /// Returns `Ok(None)` for a duplicate.
    pub fn assemble(
        &self,
        doc: &RawDocument,
        fields: ExtractedFields,
        store: &dyn InvoiceStore,
    ) -> Result<Option<InvoiceRecord>, StoreError> {
        if store.contains(&doc.fingerprint)? {
            info!("Duplicate invoice {} ({}), skipping", doc.name(), doc.fingerprint);
            return Ok(None);
        }

        let record = self.build(doc, fields);
        debug!(
            "Assembled invoice {} with {} items",
            record.invoice_id,
            record.items.len()
        );
        Ok(Some(record))
    }
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::layout::Layout;
    use crate::invoice::rules::ExtractedItem;
    use crate::store::JsonStore;
    use rust_decimal::Decimal;
    use std::path::Path;

    fn fields() -> ExtractedFields {
        ExtractedFields {
            layout: Layout::BillTo,
            invoice_no: "17042".to_string(),
            vendor: "John Smith".to_string(),
            date: "03/05/2024".to_string(),
            total_amount: Decimal::new(12345, 2),
            items: vec![
                ExtractedItem::new("Gaming   Laptop\n", Decimal::new(10000, 2)),
                ExtractedItem::new("Mystery box", Decimal::new(2345, 2)),
            ],
            missing_fields: Vec::new(),
        }
    }

    fn document() -> RawDocument {
        RawDocument::from_bytes(Path::new("invoice.pdf"), b"same bytes".to_vec())
    }

    #[test]
    fn test_build_categorizes_and_normalizes() {
        let record = InvoiceAssembler::default().build(&document(), fields());

        assert_eq!(record.invoice_no, "17042");
        assert_eq!(record.items[0].name, "Gaming Laptop");
        assert_eq!(record.items[0].category, "technology");
        assert_eq!(record.items[1].category, "uncategorized");
        assert_ne!(record.items[0].item_id, record.items[1].item_id);
        assert_eq!(record.content_fingerprint, document().fingerprint);
    }

    #[test]
    fn test_fresh_ids_per_build() {
        let assembler = InvoiceAssembler::default();
        let a = assembler.build(&document(), fields());
        let b = assembler.build(&document(), fields());
        assert_ne!(a.invoice_id, b.invoice_id);
    }

    #[test]
    fn test_assemble_detects_duplicate() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("db.json"));
        let assembler = InvoiceAssembler::default();

        let first = assembler.assemble(&document(), fields(), &store).unwrap();
        let record = first.expect("new document yields a record");
        store.append(&record).unwrap();

        let second = assembler.assemble(&document(), fields(), &store).unwrap();
        assert!(second.is_none());
    }
}
