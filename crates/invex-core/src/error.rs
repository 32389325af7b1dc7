//! Error types for the invex-core library.

use thiserror::Error;

/// Main error type for the invex library.
#[derive(Error, Debug)]
pub enum InvexError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Invoice extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Invoice store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Notification delivery error.
    #[error("notification error: {0}")]
    Notify(#[from] NotifyError),

    /// Image decoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// OCR support was not compiled in.
    #[error("OCR support is disabled; rebuild with the `ocr` feature")]
    Disabled,
}

/// Errors that stop a document before field extraction.
///
/// Field-level misses are never errors; they degrade to default values.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Acquisition produced no usable text.
    #[error("no text could be extracted from {0}")]
    NoText(String),

    /// The PDF text carries none of the known layout markers.
    #[error("unknown invoice layout")]
    UnknownLayout,
}

/// Errors related to the invoice store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the backing files failed.
    #[error("store I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The JSON document could not be read or written.
    #[error("malformed JSON store: {0}")]
    Json(#[from] serde_json::Error),

    /// A CSV table could not be read or written.
    #[error("malformed CSV store: {0}")]
    Csv(#[from] csv::Error),
}

impl StoreError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Errors related to notification delivery.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Writing the message to its sink failed.
    #[error("failed to deliver notification: {0}")]
    Delivery(#[from] std::io::Error),
}

/// Result type for the invex library.
pub type Result<T> = std::result::Result<T, InvexError>;
