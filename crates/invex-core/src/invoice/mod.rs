//! Invoice field extraction module.

mod assembler;
mod categorize;
mod layout;
mod parser;
pub mod rules;

pub use assembler::InvoiceAssembler;
pub use categorize::Categorizer;
pub use layout::{Layout, LayoutRules, detect_layout};
pub use parser::{ExtractedFields, InvoiceParser, LayoutParser};
