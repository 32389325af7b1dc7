//! Known invoice layouts and the rule set for each.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::rules::patterns::VENDOR_LABEL;
use super::rules::{ExtractedItem, StrategyChain, amounts, dates, invoice_number, items, vendor};

/// Invoice layout families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// OCR of a scanned "Seller / ITEMS / SUMMARY" invoice.
    Scanned,
    /// PDF with a "Bill To:" address block.
    BillTo,
    /// PDF with "Invoice No:" and "Vendor:" labels.
    VendorBlock,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Layout::Scanned => "scanned",
            Layout::BillTo => "bill-to",
            Layout::VendorBlock => "vendor-block",
        };
        f.write_str(name)
    }
}

/// Pick the layout of PDF text from its markers.
pub fn detect_layout(text: &str) -> Option<Layout> {
    if text.contains("Invoice No:") && VENDOR_LABEL.is_match(text) {
        Some(Layout::VendorBlock)
    } else if text.contains("Bill To:") {
        Some(Layout::BillTo)
    } else {
        None
    }
}

/// Strategy chains for every field of one layout.
pub struct LayoutRules {
    pub invoice_no: StrategyChain<String>,
    pub vendor: StrategyChain<String>,
    pub date: StrategyChain<String>,
    pub total: StrategyChain<Decimal>,
    pub items: StrategyChain<Vec<ExtractedItem>>,
}

impl LayoutRules {
    pub fn for_layout(layout: Layout) -> Self {
        match layout {
            Layout::Scanned => Self::scanned(),
            Layout::BillTo => Self::bill_to(),
            Layout::VendorBlock => Self::vendor_block(),
        }
    }

    fn scanned() -> Self {
        Self {
            invoice_no: StrategyChain::new("invoice_no").then("labeled", invoice_number::labeled),
            vendor: StrategyChain::new("vendor")
                .then("seller_block", vendor::seller_block)
                .then("seller_next_line", vendor::seller_next_line),
            date: StrategyChain::new("date")
                .then("numeric", dates::numeric_date)
                .then("month_first", dates::month_first_date)
                .then("day_first", dates::day_first_date),
            total: StrategyChain::new("total_amount")
                .then("gross_worth", amounts::last_gross_worth)
                .then("summary_region", amounts::summary_region_last)
                .then("inline_item_gross", amounts::inline_item_gross),
            items: StrategyChain::new("items")
                .then("gross_column", items::scanned_gross_column)
                .then("row_gross", items::scanned_row_gross),
        }
    }

    fn bill_to() -> Self {
        Self {
            invoice_no: StrategyChain::new("invoice_no")
                .then("labeled", invoice_number::labeled)
                .then("hash", invoice_number::hash_prefixed),
            vendor: StrategyChain::new("vendor").then("bill_to", vendor::bill_to),
            date: StrategyChain::new("date")
                .then("month_first", dates::month_first_date)
                .then("day_first", dates::day_first_date)
                .then("numeric", dates::numeric_date),
            total: StrategyChain::new("total_amount")
                .then("total_label", amounts::total_label)
                .then("grand_total", amounts::grand_total)
                .then("summary_region", amounts::summary_region_last),
            items: StrategyChain::new("items").then("bill_to_rows", items::bill_to_rows),
        }
    }

    fn vendor_block() -> Self {
        Self {
            invoice_no: StrategyChain::new("invoice_no")
                .then("merged_header", invoice_number::merged_header)
                .then("labeled", invoice_number::labeled),
            vendor: StrategyChain::new("vendor")
                .then("merged_header", vendor::merged_header)
                .then("vendor_label", vendor::vendor_label),
            date: StrategyChain::new("date")
                .then("day_first", dates::day_first_date)
                .then("month_first", dates::month_first_date)
                .then("numeric", dates::numeric_date),
            total: StrategyChain::new("total_amount")
                .then("grand_total", amounts::grand_total)
                .then("after_total", amounts::after_last_total),
            items: StrategyChain::new("items").then("indexed_rows", items::indexed_rows),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_layout() {
        assert_eq!(
            detect_layout("Invoice No: Verndor:\n2087 Clark Kent"),
            Some(Layout::VendorBlock)
        );
        assert_eq!(
            detect_layout("Invoice No: 17042\nBill To:\nJohn Smith"),
            Some(Layout::BillTo)
        );
        assert_eq!(detect_layout("Vendor: Acme\nBill To:\nJohn"), Some(Layout::BillTo));
        assert_eq!(detect_layout("Seller: Acme\nTax Id: 1"), None);
    }

    #[test]
    fn test_every_layout_has_all_fields() {
        for layout in [Layout::Scanned, Layout::BillTo, Layout::VendorBlock] {
            let rules = LayoutRules::for_layout(layout);
            assert!(!rules.invoice_no.strategies().is_empty());
            assert!(!rules.vendor.strategies().is_empty());
            assert!(!rules.date.strategies().is_empty());
            assert!(!rules.total.strategies().is_empty());
            assert!(!rules.items.strategies().is_empty());
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Layout::BillTo.to_string(), "bill-to");
    }
}
