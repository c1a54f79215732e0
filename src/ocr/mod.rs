//! OCR input: wire shapes and the token model built from them.
//!
//! ## Example
//!
//! ```ignore
//! use field_oxide::ocr::OcrDocument;
//!
//! let doc = OcrDocument::from_json_files("invoice.text.json", "invoice.words.json")?;
//! for (idx, page) in doc.pages().iter().enumerate() {
//!     println!("page {}: {} words", idx, page.words.len());
//! }
//! ```

pub mod model;
pub mod raw;

pub use model::{OcrDocument, Page, Symbol, Word};
pub use raw::{BreakType, DocText, WordList};
