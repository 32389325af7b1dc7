//! OCR over scanned invoice images.

#[cfg(feature = "ocr")]
mod pure_engine;

#[cfg(feature = "ocr")]
pub use pure_engine::PureOcrEngine;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// Anything that can turn an image into text.
pub trait TextRecognizer {
    /// Recognize all text in `image`, in reading order.
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError>;
}

/// A detected text box with its coordinates and content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    /// Bounding box coordinates (x1, y1, x2, y2, x3, y3, x4, y4) for quadrilateral.
    pub bbox: [f32; 8],

    /// Recognized text content.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    pub score: f32,
}

impl TextBox {
    /// Get the axis-aligned bounding rectangle.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }
}

/// Lay out recognized boxes as text lines.
///
/// Boxes are sorted top-to-bottom; a box whose top edge lies within
/// `row_tolerance` of the current row's top joins that row. Each row is
/// ordered left-to-right and joined with spaces, rows with newlines.
pub fn boxes_to_text(boxes: &[TextBox], row_tolerance: f32) -> String {
    let mut sorted: Vec<&TextBox> = boxes.iter().filter(|b| !b.text.trim().is_empty()).collect();
    sorted.sort_by(|a, b| a.rect().1.total_cmp(&b.rect().1));

    let mut rows: Vec<Vec<&TextBox>> = Vec::new();
    let mut row_top = f32::NEG_INFINITY;

    for text_box in sorted {
        let top = text_box.rect().1;
        match rows.last_mut() {
            Some(row) if top - row_top < row_tolerance => row.push(text_box),
            _ => {
                rows.push(vec![text_box]);
                row_top = top;
            }
        }
    }

    rows.into_iter()
        .map(|mut row| {
            row.sort_by(|a, b| a.rect().0.total_cmp(&b.rect().0));
            row.iter()
                .map(|b| b.text.trim())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
