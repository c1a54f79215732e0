// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # Field Oxide
//!
//! Field-value extraction from OCR output: turn the words of a scanned invoice,
//! form or receipt into a table of named values driven by a reusable template.
//!
//! ## Core Features
//!
//! - **Anchor Location**: find a literal phrase symbol by symbol across OCR
//!   word boundaries, honouring detected spaces and structural gaps
//! - **Positional Extraction**: read the word or phrase to the right of an
//!   anchor, or on the nearest line below it, with multi-segment skipping
//! - **Pattern Extraction**: first regex match over each page's full text
//! - **Value Post-processing**: date reparsing with day offsets and
//!   moment-style output formats, suffixes, left trimming
//! - **Blueprint Assembly**: header columns with positional ids and one
//!   `id -> value` map per template row
//!
//! ## Architecture
//!
//! All inputs are read-only after loading. The Blueprint Assembler drives the
//! Value Resolver once per cell section; the resolver calls into the anchor
//! locator and positional extractor or the pattern searcher. Missing anchors,
//! missing matches and unparseable dates resolve to empty strings; only
//! structural template problems are errors.
//!
//! ## Quick Start
//!
//! ```ignore
//! use field_oxide::{build_blueprint, ExtractionConfig, OcrDocument, RecurringDocument};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let doc = OcrDocument::from_json_files("invoice.doctext.json", "invoice.words.json")?;
//! let template = RecurringDocument::from_json_file("acme_invoice.json")?;
//! let config = ExtractionConfig::default();
//!
//! let blueprint = build_blueprint(&doc, &template, "2024/06/01", &config)?;
//! for record in blueprint.records() {
//!     println!("{}", record.join(","));
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Token model
pub mod geometry;
pub mod ocr;

// Extraction
pub mod extractors;
pub mod search;

// Value post-processing
pub mod dates;

// Templates and assembly
pub mod blueprint;
pub mod resolver;
pub mod template;

// Re-exports
pub use blueprint::{build_blueprint, BlueprintBuilder, CsvBlueprint, CsvHeaderCell, CsvRow};
pub use config::ExtractionConfig;
pub use error::{Error, Result};
pub use ocr::OcrDocument;
pub use resolver::ValueResolver;
pub use template::{identify, Cell, CellSection, RecurringDocument, Row, SearchMethod, StringType};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
