//! Common regex patterns for invoice extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Layout markers
    pub static ref VENDOR_LABEL: Regex = Regex::new(
        r"Ve[rn]*dor:"
    ).unwrap();

    // Invoice number patterns
    pub static ref INVOICE_NO_LABELED: Regex = Regex::new(
        r"(?i)Invoice\s*no\.?\s*[:\-]?\s*(\d+)"
    ).unwrap();

    pub static ref INVOICE_NO_HASH: Regex = Regex::new(
        r"#\s*(\d+)"
    ).unwrap();

    /// "Invoice No: Vendor:" header with both values on the next line.
    pub static ref INVOICE_VENDOR_HEADER: Regex = Regex::new(
        r"(?i)Invoice\s+No:\s*Ve[rn]*dor:\s*\n\s*(\d+)\s+([A-Za-z ]+)"
    ).unwrap();

    // Party patterns
    pub static ref SELLER_BLOCK: Regex = Regex::new(
        r"(?is)Seller:.*?\n(.*?)\n\s*Tax\s*Id"
    ).unwrap();

    pub static ref SELLER_LABEL: Regex = Regex::new(
        r"(?i)Seller:"
    ).unwrap();

    pub static ref VENDOR_NAME: Regex = Regex::new(
        r"(?i)Ve[rn]*dor:[ \t]*\n?\s*([A-Za-z][A-Za-z ]*)"
    ).unwrap();

    // Date patterns
    pub static ref DATE_NUMERIC: Regex = Regex::new(
        r"\b(\d{2})/(\d{2})/(\d{4})\b"
    ).unwrap();

    /// "Mar 15 2024", "March 15, 2024".
    pub static ref DATE_MONTH_FIRST: Regex = Regex::new(
        r"(?i)\b(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?\s+(\d{1,2}),?\s+(\d{4})\b"
    ).unwrap();

    /// "15 March 2024", "15 Mar 2024".
    pub static ref DATE_DAY_FIRST: Regex = Regex::new(
        r"(?i)\b(\d{1,2})\s+(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?,?\s+(\d{4})\b"
    ).unwrap();

    // Amount patterns: "2 012,51", "1,234.56", "57,18", "123.45"
    pub static ref AMOUNT_PATTERN: Regex = Regex::new(
        r"\d+(?:[ ,\u{00a0}]\d{3})*[.,]\d{2}\b"
    ).unwrap();

    pub static ref COMMA_AMOUNT: Regex = Regex::new(
        r"\d+(?:[ \u{00a0}]\d{3})*,\d{2}\b"
    ).unwrap();

    // Total amounts
    pub static ref GROSS_WORTH_TOTAL: Regex = Regex::new(
        r"(?i)Gross\s*worth\s*\n?\$?\s*([\d \u{00a0}]+,\d{2})"
    ).unwrap();

    /// Item row "2,00 each 25,99 51,98 10% 57,18"; the last value is its gross.
    pub static ref INLINE_ITEM_GROSS: Regex = Regex::new(
        r"(?i)\d+,\d{2}\s+each\s+\d+,\d{2}\s+\d+,\d{2}\s+\d+%\s+(\d+,\d{2})"
    ).unwrap();

    pub static ref TOTAL_LABEL: Regex = Regex::new(
        r"Total:\s*\$?\s*(\d[\d,]*\.\d+)"
    ).unwrap();

    pub static ref GRAND_TOTAL: Regex = Regex::new(
        r"(?i)GRAND\s+TOTAL\s*:?\s*\$?\s*(\d[\d,]*(?:\.\d+)?)"
    ).unwrap();

    pub static ref SUMMARY_LABEL: Regex = Regex::new(
        r"SUMMARY"
    ).unwrap();

    pub static ref TOTAL_WORD: Regex = Regex::new(
        r"(?i)\btotal\b"
    ).unwrap();

    // Line item patterns
    pub static ref ITEMS_SPAN: Regex = Regex::new(
        r"(?is)ITEMS(.*?)SUMMARY"
    ).unwrap();

    pub static ref ITEMS_HEADER: Regex = Regex::new(
        r"(?i)No\.\s*Description\s*Qty"
    ).unwrap();

    /// Values listed under the first "Gross worth" label, up to the next
    /// label, a currency sign, SUMMARY or the end of the text.
    pub static ref GROSS_COLUMN: Regex = Regex::new(
        r"(?is)Gross\s*worth(.*?)(?:Gross\s*worth|\$|SUMMARY|\z)"
    ).unwrap();

    pub static ref LEADING_INDEX: Regex = Regex::new(
        r"^\d+\.\s*"
    ).unwrap();

    pub static ref VAT_PERCENT: Regex = Regex::new(
        r"\d+\s*%"
    ).unwrap();

    pub static ref UNIT_LABEL: Regex = Regex::new(
        r"(?i)\beach\b"
    ).unwrap();

    pub static ref BILL_TO_ITEMS_SPAN: Regex = Regex::new(
        r"(?s)Item\s+Quantity\s+Rate\s+Amount\s*\n(.*?)Subtotal:"
    ).unwrap();

    /// "<description> <qty> $<amount>"
    pub static ref BILL_TO_ITEM_ROW: Regex = Regex::new(
        r"(.+?)\s+\d+\s+\$\s*(\d[\d,]*\.\d+)"
    ).unwrap();

    /// "<index> <description> <qty> $<amount>"
    pub static ref INDEXED_ITEM_ROW: Regex = Regex::new(
        r"\d+\s+([A-Za-z][A-Za-z ]*?)\s+\d+\s+\$\s*(\d[\d,]*(?:\.\d+)?)"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amounts(text: &str) -> Vec<&str> {
        AMOUNT_PATTERN.find_iter(text).map(|m| m.as_str()).collect()
    }

    #[test]
    fn test_amount_pattern_forms() {
        assert_eq!(amounts("10% 51,98 5,20 57,18"), ["51,98", "5,20", "57,18"]);
        assert_eq!(amounts("Total: 2 012,51"), ["2 012,51"]);
        assert_eq!(amounts("$1,234.56 and 123.45"), ["1,234.56", "123.45"]);
    }

    #[test]
    fn test_comma_amount_keeps_grouped_thousands() {
        let found: Vec<_> = COMMA_AMOUNT.find_iter("3 57,18\n2 012,51").map(|m| m.as_str()).collect();
        assert_eq!(found, ["57,18", "2 012,51"]);
    }

    #[test]
    fn test_vendor_label_accepts_misspelling() {
        assert!(VENDOR_LABEL.is_match("Vendor:"));
        assert!(VENDOR_LABEL.is_match("Verndor:"));
        assert!(!VENDOR_LABEL.is_match("Vender:"));
    }
}
