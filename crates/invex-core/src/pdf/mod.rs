//! PDF text extraction.

mod extractor;

pub use extractor::PdfExtractor;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract text per page, in page order.
    fn extract_pages(&self) -> Result<Vec<String>>;

    /// Extract the text of the whole document.
    ///
    /// Every page that yields text contributes that text followed by a newline;
    /// blank pages contribute nothing.
    fn extract_text(&self) -> Result<String> {
        let mut text = String::new();
        for page in self.extract_pages()? {
            if !page.trim().is_empty() {
                text.push_str(&page);
                text.push('\n');
            }
        }
        Ok(text)
    }
}
