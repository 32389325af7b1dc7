//! Amount parsing and total-amount strategies.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{
    AMOUNT_PATTERN, GRAND_TOTAL, GROSS_WORTH_TOTAL, INLINE_ITEM_GROSS, SUMMARY_LABEL,
    TOTAL_LABEL, TOTAL_WORD,
};
use super::region_after;

/// Longer digit runs are OCR noise, not money.
const MAX_AMOUNT_DIGITS: usize = 15;

/// Parse an amount written with comma or dot decimals (e.g., "2 012,51",
/// "1,234.56", "57,18").
///
/// The last separator is the decimal point unless exactly three digits follow
/// it, in which case every separator is a thousands separator ("1,234" = 1234).
/// More than 15 digits is rejected.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    // Remove spaces, non-breaking spaces and currency symbols
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();
    let cleaned = cleaned.trim_matches([',', '.']);
    if cleaned.chars().filter(char::is_ascii_digit).count() > MAX_AMOUNT_DIGITS {
        return None;
    }

    let normalized = match cleaned.rfind([',', '.']) {
        Some(pos) if cleaned.len() - pos - 1 != 3 => {
            let (integer_part, decimal_part) = cleaned.split_at(pos);
            format!("{}.{}", integer_part.replace([',', '.'], ""), &decimal_part[1..])
        }
        _ => cleaned.replace([',', '.'], ""),
    };

    Decimal::from_str(&normalized).ok()
}

/// All amounts in `text`, in order of appearance.
pub fn amounts_in(text: &str) -> Vec<Decimal> {
    AMOUNT_PATTERN
        .find_iter(text)
        .filter_map(|m| parse_amount(m.as_str()))
        .collect()
}

/// Last "Gross worth" figure; totals blocks list net, tax, then gross last.
pub fn last_gross_worth(text: &str) -> Option<Decimal> {
    GROSS_WORTH_TOTAL
        .captures_iter(text)
        .last()
        .and_then(|caps| parse_amount(&caps[1]))
}

/// Gross value at the end of an inline item row, only on documents that
/// carry a totals label.
pub fn inline_item_gross(text: &str) -> Option<Decimal> {
    if !SUMMARY_LABEL.is_match(text) && !TOTAL_WORD.is_match(text) {
        return None;
    }
    INLINE_ITEM_GROSS
        .captures(text)
        .and_then(|caps| parse_amount(&caps[1]))
}

/// `Total: $123.45`.
pub fn total_label(text: &str) -> Option<Decimal> {
    TOTAL_LABEL
        .captures(text)
        .and_then(|caps| parse_amount(&caps[1]))
}

/// `GRAND TOTAL $1,234`.
pub fn grand_total(text: &str) -> Option<Decimal> {
    GRAND_TOTAL
        .captures(text)
        .and_then(|caps| parse_amount(&caps[1]))
}

/// Last decimal number after the "SUMMARY" marker.
pub fn summary_region_last(text: &str) -> Option<Decimal> {
    region_after(text, &SUMMARY_LABEL).and_then(|region| amounts_in(region).pop())
}

/// Last decimal number after the last standalone "total" word.
pub fn after_last_total(text: &str) -> Option<Decimal> {
    let start = TOTAL_WORD.find_iter(text).last()?.end();
    amounts_in(&text[start..]).pop()
}
