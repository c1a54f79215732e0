//! Token model: the read-only view of a recognized document.
//!
//! Built once from the two OCR projections ([`DocText`] and [`WordList`]).
//! Coordinate sets and break markers are resolved here, so extraction code
//! never has to ask which vertex list is populated or whether a property
//! exists.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::geometry::Quad;
use crate::ocr::raw::{BreakType, DocText, RawSymbol, RawWord, WordList};

/// One recognized glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    /// Glyph text
    pub text: String,
    /// Glyph box
    pub bbox: Quad,
    /// Break following the glyph
    pub detected_break: Option<BreakType>,
}

impl Symbol {
    /// Create a symbol with no trailing break.
    pub fn new(text: impl Into<String>, bbox: Quad) -> Self {
        Self {
            text: text.into(),
            bbox,
            detected_break: None,
        }
    }

    /// Attach a trailing break.
    pub fn with_break(mut self, kind: BreakType) -> Self {
        self.detected_break = Some(kind);
        self
    }

    /// True if an ordinary space follows this symbol.
    pub fn is_space_break(&self) -> bool {
        self.detected_break == Some(BreakType::Space)
    }

    /// True if any break follows this symbol.
    pub fn has_break(&self) -> bool {
        self.detected_break.is_some()
    }
}

/// A recognized word.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    /// Symbols in reading order
    pub symbols: Vec<Symbol>,
    /// Word box
    pub bbox: Quad,
}

impl Word {
    /// Create a word from symbols and an explicit box.
    pub fn new(symbols: Vec<Symbol>, bbox: Quad) -> Self {
        Self { symbols, bbox }
    }

    /// Create a word whose box is the union of its symbols' boxes.
    ///
    /// Returns `None` for an empty symbol list.
    pub fn from_symbols(symbols: Vec<Symbol>) -> Option<Self> {
        let (first, rest) = symbols.split_first()?;
        let bbox = rest.iter().fold(first.bbox, |acc, s| acc.union(&s.bbox));
        Some(Self { symbols, bbox })
    }

    /// Lay `text` out as evenly spaced symbols across `bbox`.
    ///
    /// `trailing` becomes the last symbol's break. Handy for synthetic pages.
    ///
    /// # Examples
    ///
    /// ```
    /// use field_oxide::geometry::Quad;
    /// use field_oxide::ocr::{BreakType, Word};
    ///
    /// let bbox = Quad::from_points(0.0, 0.0, 80.0, 10.0);
    /// let word = Word::from_text("INV-2024", bbox, Some(BreakType::Space));
    /// assert_eq!(word.text(), "INV-2024");
    /// assert_eq!(word.symbols.len(), 8);
    /// assert!(word.ends_with_space());
    /// ```
    pub fn from_text(text: &str, bbox: Quad, trailing: Option<BreakType>) -> Self {
        let count = text.chars().count().max(1) as f32;
        let step = bbox.width() / count;
        let mut symbols: Vec<Symbol> = text
            .chars()
            .enumerate()
            .map(|(i, c)| {
                let x0 = bbox.left() + step * i as f32;
                let glyph = Quad {
                    space: bbox.space,
                    ..Quad::from_points(x0, bbox.top(), x0 + step, bbox.bottom())
                };
                Symbol::new(c.to_string(), glyph)
            })
            .collect();
        if let Some(last) = symbols.last_mut() {
            last.detected_break = trailing;
        }
        Self { symbols, bbox }
    }

    /// Concatenated symbol text, without any break spacing.
    pub fn text(&self) -> String {
        self.symbols.iter().map(|s| s.text.as_str()).collect()
    }

    /// Last symbol of the word.
    pub fn last_symbol(&self) -> Option<&Symbol> {
        self.symbols.last()
    }

    /// True if the word's last symbol carries an ordinary space.
    pub fn ends_with_space(&self) -> bool {
        self.last_symbol().is_some_and(Symbol::is_space_break)
    }
}

/// A page of words in OCR order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Words as emitted by the OCR engine
    pub words: Vec<Word>,
}

impl Page {
    /// Create a page from its words.
    pub fn new(words: Vec<Word>) -> Self {
        Self { words }
    }
}

/// A recognized document: word geometry plus per-page full text.
///
/// Immutable once built; every extraction borrows it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OcrDocument {
    file_name: String,
    pages: Vec<Page>,
    full_texts: Vec<Option<String>>,
}

impl OcrDocument {
    /// Create a document from already-resolved pages.
    ///
    /// `full_texts` is index-aligned with `pages`.
    pub fn from_pages(
        file_name: impl Into<String>,
        pages: Vec<Page>,
        full_texts: Vec<Option<String>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            pages,
            full_texts,
        }
    }

    /// Build the token model from the two OCR projections.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCoordinates`] when a symbol has no usable box,
    /// or when a word has neither a box nor symbols to compute one from.
    pub fn new(doc_text: DocText, word_list: WordList) -> Result<Self> {
        if doc_text.extraction.len() != word_list.words.len() {
            log::warn!(
                "{}: full text has {} pages but word list has {}",
                doc_text.file_name,
                doc_text.extraction.len(),
                word_list.words.len()
            );
        }

        let pages = word_list
            .words
            .into_iter()
            .enumerate()
            .map(|(page_idx, words)| {
                let words = words
                    .into_iter()
                    .enumerate()
                    .map(|(word_idx, word)| resolve_word(page_idx, word_idx, word))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Page::new(words))
            })
            .collect::<Result<Vec<_>>>()?;

        let full_texts = doc_text
            .extraction
            .into_iter()
            .map(|page| page.full_text_annotation.map(|a| a.text))
            .collect();

        log::debug!("Loaded {} with {} pages", doc_text.file_name, pages.len());

        Ok(Self {
            file_name: doc_text.file_name,
            pages,
            full_texts,
        })
    }

    /// Parse both projections from JSON strings.
    pub fn from_json_str(doc_text: &str, word_list: &str) -> Result<Self> {
        let doc_text: DocText = serde_json::from_str(doc_text)?;
        let word_list: WordList = serde_json::from_str(word_list)?;
        Self::new(doc_text, word_list)
    }

    /// Read and parse both projections from JSON files.
    pub fn from_json_files(
        doc_text: impl AsRef<Path>,
        word_list: impl AsRef<Path>,
    ) -> Result<Self> {
        let doc_text = fs::read_to_string(doc_text)?;
        let word_list = fs::read_to_string(word_list)?;
        Self::from_json_str(&doc_text, &word_list)
    }

    /// Name of the source file.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Pages of words.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Page at `index`, if any.
    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    /// Full-text renderings in page order; `None` for pages with no text.
    pub fn full_texts(&self) -> impl Iterator<Item = Option<&str>> {
        self.full_texts.iter().map(|t| t.as_deref())
    }
}

fn resolve_word(page: usize, word_idx: usize, raw: RawWord) -> Result<Word> {
    let symbols = raw
        .symbols
        .into_iter()
        .enumerate()
        .map(|(symbol_idx, symbol)| resolve_symbol(page, word_idx, symbol_idx, symbol))
        .collect::<Result<Vec<_>>>()?;

    match raw.bounding_box.as_ref().and_then(|b| b.to_quad()) {
        Some(bbox) => Ok(Word::new(symbols, bbox)),
        None => Word::from_symbols(symbols).ok_or(Error::MissingCoordinates {
            page,
            word: word_idx,
            symbol: None,
        }),
    }
}

fn resolve_symbol(page: usize, word: usize, symbol: usize, raw: RawSymbol) -> Result<Symbol> {
    let bbox = raw
        .bounding_box
        .as_ref()
        .and_then(|b| b.to_quad())
        .ok_or(Error::MissingCoordinates {
            page,
            word,
            symbol: Some(symbol),
        })?;
    let detected_break = raw
        .property
        .and_then(|p| p.detected_break)
        .map(|b| b.kind);
    Ok(Symbol {
        text: raw.text,
        bbox,
        detected_break,
    })
}
