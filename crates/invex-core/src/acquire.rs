//! Text acquisition: turn a raw document into plain text.

use tracing::{debug, warn};

use crate::error::{ExtractionError, InvexError, OcrError, Result};
use crate::models::config::OcrConfig;
use crate::models::invoice::{RawDocument, SourceKind};
use crate::ocr::TextRecognizer;
use crate::pdf::{PdfExtractor, PdfProcessor};

/// Produces the text of a document.
pub trait TextSource {
    /// Acquire text from `doc`. Blank output is an error.
    fn acquire(&self, doc: &RawDocument) -> Result<String>;
}

/// PDF text extraction plus OCR for images.
pub struct DocumentTextSource {
    recognizer: Option<Box<dyn TextRecognizer>>,
    unavailable: String,
}

impl DocumentTextSource {
    /// Use `recognizer` for images; without one, image files fail.
    pub fn new(recognizer: Option<Box<dyn TextRecognizer>>) -> Self {
        Self {
            recognizer,
            unavailable: "no OCR engine configured".to_string(),
        }
    }

    /// Load the OCR engine described by `config` when its models are present.
    ///
    /// PDF acquisition works regardless; image acquisition fails until the
    /// models are installed.
    pub fn from_config(config: &OcrConfig) -> Self {
        if !config.models_present() {
            warn!(
                "OCR models not found in {}, image invoices will fail",
                config.model_dir.display()
            );
            return Self {
                recognizer: None,
                unavailable: format!("OCR models not found in {}", config.model_dir.display()),
            };
        }
        Self::load_engine(config)
    }

    #[cfg(feature = "ocr")]
    fn load_engine(config: &OcrConfig) -> Self {
        match crate::ocr::PureOcrEngine::from_config(config.clone()) {
            Ok(engine) => Self::new(Some(Box::new(engine))),
            Err(e) => {
                warn!("Failed to load OCR engine: {}", e);
                Self {
                    recognizer: None,
                    unavailable: e.to_string(),
                }
            }
        }
    }

    #[cfg(not(feature = "ocr"))]
    fn load_engine(_config: &OcrConfig) -> Self {
        Self::new(None)
    }

    fn ocr(&self, doc: &RawDocument) -> Result<String> {
        let Some(recognizer) = &self.recognizer else {
            let err = if cfg!(feature = "ocr") {
                OcrError::ModelLoad(self.unavailable.clone())
            } else {
                OcrError::Disabled
            };
            return Err(err.into());
        };

        let image = image::load_from_memory(&doc.bytes)?;
        Ok(recognizer.recognize(&image)?)
    }

    fn pdf(&self, doc: &RawDocument) -> Result<String> {
        let extractor = PdfExtractor::from_bytes(&doc.bytes)?;
        debug!("{}: {} pages", doc.name(), extractor.page_count());
        Ok(extractor.extract_text()?)
    }
}

impl TextSource for DocumentTextSource {
    fn acquire(&self, doc: &RawDocument) -> Result<String> {
        let text = match doc.kind {
            SourceKind::Pdf => self.pdf(doc)?,
            SourceKind::Image => self.ocr(doc)?,
        };

        if text.trim().is_empty() {
            return Err(InvexError::Extraction(ExtractionError::NoText(doc.name())));
        }

        debug!("Acquired {} chars from {}", text.len(), doc.name());
        Ok(text)
    }
}
