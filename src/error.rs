//! Error types for the field extraction library.
//!
//! Only structural problems are errors. An anchor phrase that cannot be found,
//! a pattern with no match or an unparseable date all resolve to an empty
//! value instead; scanned documents are noisy and a partial row is more useful
//! than no row at all.

/// Result type alias for field extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading inputs or assembling a blueprint.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A template row does not have one cell per header column
    #[error("Row {row} has {found} cells but the header has {expected} columns")]
    CellCountMismatch {
        /// Zero-based row index in the template
        row: usize,
        /// Number of header columns
        expected: usize,
        /// Number of cells found in the row
        found: usize,
    },

    /// A positional cell section asks for the zeroth phrase
    #[error("Row {row}, cell {cell}, section {section}: phraseCount must be at least 1")]
    InvalidPhraseCount {
        /// Zero-based row index
        row: usize,
        /// Zero-based cell index within the row
        cell: usize,
        /// Zero-based section index within the cell
        section: usize,
    },

    /// A pattern cell section holds a regular expression that does not compile
    #[error("Row {row}, cell {cell}, section {section}: invalid pattern: {reason}")]
    InvalidPattern {
        /// Zero-based row index
        row: usize,
        /// Zero-based cell index within the row
        cell: usize,
        /// Zero-based section index within the cell
        section: usize,
        /// Message from the regex compiler
        reason: String,
    },

    /// OCR output without a usable bounding box
    #[error("Page {page}, word {word}{}: missing bounding box coordinates", symbol_suffix(.symbol))]
    MissingCoordinates {
        /// Zero-based page index
        page: usize,
        /// Zero-based word index within the page
        word: usize,
        /// Zero-based symbol index within the word, if the symbol is at fault
        symbol: Option<usize>,
    },

    /// Malformed JSON input, including unknown extraction methods
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn symbol_suffix(symbol: &Option<usize>) -> String {
    symbol.map(|s| format!(", symbol {}", s)).unwrap_or_default()
}
