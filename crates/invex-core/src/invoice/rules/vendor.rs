//! Vendor strategies.

use super::patterns::{INVOICE_VENDOR_HEADER, SELLER_BLOCK, SELLER_LABEL, VENDOR_NAME};

/// Lines after "Bill To:" that are searched for a name.
const BILL_TO_LOOKAHEAD: usize = 5;

/// Address-block lines that never hold the customer name.
const BILL_TO_BOILERPLATE: [&str; 5] = ["Ship", "Date", "Mode", "Balance", "$"];

/// First non-empty line between the "Seller:" line and "Tax Id".
pub fn seller_block(text: &str) -> Option<String> {
    let caps = SELLER_BLOCK.captures(text)?;
    first_line(&caps[1])
}

/// First non-empty line after the "Seller:" line.
pub fn seller_next_line(text: &str) -> Option<String> {
    let start = SELLER_LABEL.find(text)?.end();
    let rest = &text[start..];
    let after_label_line = rest.find('\n').map(|i| &rest[i + 1..])?;
    first_line(after_label_line)
}

/// First two words of the customer name under "Bill To:".
pub fn bill_to(text: &str) -> Option<String> {
    let start = text.find("Bill To:")? + "Bill To:".len();

    text[start..]
        .lines()
        .take(BILL_TO_LOOKAHEAD + 1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .find(|line| !BILL_TO_BOILERPLATE.iter().any(|marker| line.contains(marker)))
        .map(|line| line.split_whitespace().take(2).collect::<Vec<_>>().join(" "))
}

/// Name from the merged `Invoice No: Vendor:` header.
pub fn merged_header(text: &str) -> Option<String> {
    let caps = INVOICE_VENDOR_HEADER.captures(text)?;
    non_empty(caps[2].trim())
}

/// Letters after a "Vendor:" label, on the same or the next line.
pub fn vendor_label(text: &str) -> Option<String> {
    let caps = VENDOR_NAME.captures(text)?;
    non_empty(caps[1].trim())
}

fn first_line(block: &str) -> Option<String> {
    block
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
