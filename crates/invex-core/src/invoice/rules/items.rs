//! Line-item strategies.
//!
//! A strategy returns `None` when its block markers are absent, so the
//! parser can fall through to the next one and finally to an empty list.

use rust_decimal::Decimal;

use super::amounts::parse_amount;
use super::patterns::{
    BILL_TO_ITEMS_SPAN, BILL_TO_ITEM_ROW, COMMA_AMOUNT, GROSS_COLUMN, INDEXED_ITEM_ROW,
    ITEMS_HEADER, ITEMS_SPAN, LEADING_INDEX, UNIT_LABEL, VAT_PERCENT,
};

/// A description/price pair before categorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedItem {
    pub name: String,
    pub price: Decimal,
}

impl ExtractedItem {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// Scanned table paired with the values listed under the first
/// "Gross worth" label, by position.
pub fn scanned_gross_column(text: &str) -> Option<Vec<ExtractedItem>> {
    let chunks = scanned_chunks(text)?;
    let prices = gross_column(text);
    if prices.is_empty() {
        return None;
    }

    Some(
        chunks
            .iter()
            .map(|chunk| clean_description(chunk))
            .zip(prices)
            .map(|(name, price)| ExtractedItem::new(name, price))
            .collect(),
    )
}

/// Scanned table where each row carries its own gross value last.
pub fn scanned_row_gross(text: &str) -> Option<Vec<ExtractedItem>> {
    let chunks = scanned_chunks(text)?;

    Some(
        chunks
            .iter()
            .filter_map(|chunk| {
                let price = COMMA_AMOUNT
                    .find_iter(chunk)
                    .last()
                    .and_then(|m| parse_amount(m.as_str()))?;
                Some(ExtractedItem::new(clean_description(chunk), price))
            })
            .collect(),
    )
}

/// `<description> <qty> $<amount>` rows between the item header and
/// "Subtotal:".
pub fn bill_to_rows(text: &str) -> Option<Vec<ExtractedItem>> {
    let block = BILL_TO_ITEMS_SPAN.captures(text)?;

    Some(
        block[1]
            .lines()
            .filter_map(|line| {
                let caps = BILL_TO_ITEM_ROW.captures(line)?;
                let price = parse_amount(&caps[2])?;
                Some(ExtractedItem::new(caps[1].trim(), price))
            })
            .collect(),
    )
}

/// Every `<index> <description> <qty> $<amount>` occurrence.
pub fn indexed_rows(text: &str) -> Option<Vec<ExtractedItem>> {
    let items: Vec<_> = INDEXED_ITEM_ROW
        .captures_iter(text)
        .filter_map(|caps| {
            let price = parse_amount(&caps[2])?;
            Some(ExtractedItem::new(caps[1].trim(), price))
        })
        .collect();

    (!items.is_empty()).then_some(items)
}

/// Split the ITEMS..SUMMARY block into one chunk per row.
///
/// A line holding a comma-decimal starts a new chunk and any following lines
/// without one are wrapped description text. Lines made of a single amount
/// are column values, not rows.
fn scanned_chunks(text: &str) -> Option<Vec<String>> {
    let caps = ITEMS_SPAN.captures(text)?;
    let block = ITEMS_HEADER.replace_all(&caps[1], "").replace('\r', "");

    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();

    for line in block.lines() {
        if is_lone_amount(line) || is_gross_label(line) {
            continue;
        }
        if COMMA_AMOUNT.is_match(line) {
            chunks.push(std::mem::take(&mut current));
        }
        current.push_str(line);
        current.push('\n');
    }
    chunks.push(current);

    Some(
        chunks
            .into_iter()
            .filter(|chunk| COMMA_AMOUNT.is_match(chunk))
            .collect(),
    )
}

/// Amounts listed one per line under the first "Gross worth" label.
fn gross_column(text: &str) -> Vec<Decimal> {
    let Some(caps) = GROSS_COLUMN.captures(text) else {
        return Vec::new();
    };

    caps[1]
        .lines()
        .filter(|line| is_lone_amount(line))
        .filter_map(|line| parse_amount(line))
        .collect()
}

fn is_lone_amount(line: &str) -> bool {
    let line = line.trim();
    COMMA_AMOUNT
        .find(line)
        .is_some_and(|m| m.start() == 0 && m.end() == line.len())
}

fn is_gross_label(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("gross worth")
}

/// Description text of a row chunk: amounts, unit labels, VAT rates and
/// the row index removed, whitespace collapsed.
fn clean_description(chunk: &str) -> String {
    let without_amounts = COMMA_AMOUNT.replace_all(chunk, "");
    let without_vat = VAT_PERCENT.replace_all(&without_amounts, "");
    let without_units = UNIT_LABEL.replace_all(&without_vat, "");
    let without_index = LEADING_INDEX.replace(without_units.trim(), "");

    without_index.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    const ROW_ORDERED: &str = "Invoice no: 51109338\n\
        ITEMS\n\
        No. Description Qty UM Net price Net worth VAT [%] Gross worth\n\
        1. Wii Remote Controller 2,00 each 25,99 51,98 10% 57,18\n\
        2. Gaming Laptop 1,00 each 1 800,00 1 800,00 10% 1 980,00\n\
        with charger\n\
        SUMMARY\n\
        VAT [%] Net worth VAT Gross worth\n\
        10% 1 851,98 185,20 2 037,18\n\
        Total $ 1 851,98 $ 185,20 $ 2 037,18\n";

    const COLUMN_ORDERED: &str = "ITEMS\n\
        No. Description Qty\n\
        1. Wii Remote Controller 2,00 each\n\
        2. Gaming Laptop 1,00 each\n\
        Gross worth\n\
        57,18\n\
        1 980,00\n\
        SUMMARY\n\
        Gross worth\n\
        $ 2 037,18\n";

    #[test]
    fn test_row_ordered_scan_uses_last_amount() {
        assert_eq!(scanned_gross_column(ROW_ORDERED), None);
        assert_eq!(
            scanned_row_gross(ROW_ORDERED),
            Some(vec![
                ExtractedItem::new("Wii Remote Controller", dec("57.18")),
                ExtractedItem::new("Gaming Laptop with charger", dec("1980.00")),
            ])
        );
    }

    #[test]
    fn test_column_ordered_scan_pairs_by_position() {
        assert_eq!(
            scanned_gross_column(COLUMN_ORDERED),
            Some(vec![
                ExtractedItem::new("Wii Remote Controller", dec("57.18")),
                ExtractedItem::new("Gaming Laptop", dec("1980.00")),
            ])
        );
    }

    #[test]
    fn test_pairing_truncates_to_shorter_list() {
        let text = "ITEMS\n1. Mouse 1,00 each\n2. Keyboard 1,00 each\nGross worth\n12,50\nSUMMARY";
        assert_eq!(
            scanned_gross_column(text),
            Some(vec![ExtractedItem::new("Mouse", dec("12.50"))])
        );
    }

    #[test]
    fn test_missing_span_yields_none() {
        let text = "Invoice no: 1\nGross worth\n10,00\n";
        assert_eq!(scanned_gross_column(text), None);
        assert_eq!(scanned_row_gross(text), None);
        assert_eq!(bill_to_rows(text), None);
        assert_eq!(indexed_rows(text), None);
    }

    #[test]
    fn test_bill_to_rows() {
        let text = "Item Quantity Rate Amount\n\
            Wireless Mouse 2 $25.00 $50.00\n\
            Office Chair 1 $1,150.00 $1,150.00\n\
            Subtotal: $1,200.00\nTotal: $1,200.00";
        assert_eq!(
            bill_to_rows(text),
            Some(vec![
                ExtractedItem::new("Wireless Mouse", dec("25.00")),
                ExtractedItem::new("Office Chair", dec("1150.00")),
            ])
        );
    }

    #[test]
    fn test_indexed_rows() {
        let text = "S.No Item Qty Price\n1 Cotton Shirt 2 $ 40\n2 Table Lamp 1 $ 1,250\nGRAND TOTAL $ 1,290";
        assert_eq!(
            indexed_rows(text),
            Some(vec![
                ExtractedItem::new("Cotton Shirt", dec("40")),
                ExtractedItem::new("Table Lamp", dec("1250")),
            ])
        );
    }
}
