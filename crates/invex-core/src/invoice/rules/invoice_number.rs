//! Invoice number strategies.

use super::patterns::{INVOICE_NO_HASH, INVOICE_NO_LABELED, INVOICE_VENDOR_HEADER};

/// `Invoice no: 51109338`, `Invoice No. 17042`.
pub fn labeled(text: &str) -> Option<String> {
    INVOICE_NO_LABELED
        .captures(text)
        .map(|caps| caps[1].to_string())
}

/// `# 17042`.
pub fn hash_prefixed(text: &str) -> Option<String> {
    INVOICE_NO_HASH
        .captures(text)
        .map(|caps| caps[1].to_string())
}

/// Merged `Invoice No: Vendor:` header with the number on the next line.
pub fn merged_header(text: &str) -> Option<String> {
    INVOICE_VENDOR_HEADER
        .captures(text)
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled() {
        assert_eq!(labeled("Invoice no: 51109338"), Some("51109338".to_string()));
        assert_eq!(labeled("INVOICE NO. 17042"), Some("17042".to_string()));
        assert_eq!(labeled("Invoice no:\n17042"), Some("17042".to_string()));
        assert_eq!(labeled("Receipt 17042"), None);
    }

    #[test]
    fn test_hash_prefixed() {
        assert_eq!(hash_prefixed("INVOICE\n# 36259"), Some("36259".to_string()));
        assert_eq!(hash_prefixed("#1001"), Some("1001".to_string()));
        assert_eq!(hash_prefixed("no marker"), None);
    }

    #[test]
    fn test_merged_header() {
        let text = "Invoice No: Verndor:\n2087 Clark Kent\nDate: 12 March 2024";
        assert_eq!(merged_header(text), Some("2087".to_string()));
        assert_eq!(labeled(text), None);
    }
}
