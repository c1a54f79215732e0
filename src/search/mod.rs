//! Pattern search over page full texts.
//!
//! ## Example
//!
//! ```ignore
//! use field_oxide::search::{SearchOptions, TextSearcher};
//!
//! let regex = TextSearcher::build_regex(r"\d{3}-\d{2}-\d{4}", &SearchOptions::new())?;
//! if let Some(result) = TextSearcher::find_first(&doc, &regex) {
//!     println!("Found '{}' on page {}", result.text, result.page);
//! }
//! ```

mod text_search;

pub use text_search::{PatternSet, SearchOptions, SearchResult, TextSearcher};
