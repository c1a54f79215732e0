//! Anchor phrase location.
//!
//! An anchor phrase is literal text printed next to the value a template
//! wants, such as `Invoice No` or `Bill To`. The locator finds its first
//! occurrence by walking every symbol of the document once, matching one
//! phrase character per symbol.
//!
//! OCR does not emit space symbols. A space between two words shows up as a
//! `SPACE` break on the last symbol of the first word, so when a partial match
//! hits such a break the phrase cursor skips over the phrase's own space. A
//! gap wide enough to be a structural break (see
//! [`crate::geometry::is_phrase_break`]) means the two words belong to
//! different fields, and the partial match is abandoned instead.

use crate::geometry::is_phrase_break_scaled;
use crate::ocr::{BreakType, OcrDocument, Page, Symbol};

/// Location of a matched anchor phrase on one page.
///
/// Start and end are inclusive symbol positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorSpan {
    /// Page holding the match
    pub page: usize,
    /// Word holding the first matched symbol
    pub start_word: usize,
    /// Index of the first matched symbol within its word
    pub start_symbol: usize,
    /// Word holding the last matched symbol
    pub end_word: usize,
    /// Index of the last matched symbol within its word
    pub end_symbol: usize,
}

/// Enclosing box of a matched anchor phrase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorBox {
    /// Start x of the first symbol
    pub left: f32,
    /// End x of the last symbol
    pub right: f32,
    /// Smallest upper y over the span
    pub top: f32,
    /// Largest lower y over the span
    pub bottom: f32,
}

impl AnchorBox {
    /// Vertical midpoint of the anchor's line.
    pub fn vertical_midpoint(&self) -> f32 {
        (self.bottom - self.top) / 2.0 + self.top
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SymbolPos {
    word: usize,
    symbol: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchState {
    Idle,
    Matching { start: SymbolPos, cursor: usize },
}

/// Forward-only matcher for one phrase.
///
/// Feeding symbols never rewinds: a mismatch drops the partial match and
/// re-tests only the current symbol as a fresh start.
struct PhraseMatcher<'p> {
    phrase: &'p [char],
    state: MatchState,
}

impl<'p> PhraseMatcher<'p> {
    fn new(phrase: &'p [char]) -> Self {
        Self {
            phrase,
            state: MatchState::Idle,
        }
    }

    fn reset(&mut self) {
        self.state = MatchState::Idle;
    }

    fn matches_at(&self, symbol: &Symbol, cursor: usize) -> bool {
        let Some(&expected) = self.phrase.get(cursor) else {
            return false;
        };
        let mut chars = symbol.text.chars();
        chars.next() == Some(expected) && chars.next().is_none()
    }

    /// Feed one symbol. Returns the match start once the final phrase
    /// character is consumed.
    ///
    /// `structural_space` says whether a `SPACE` break on this symbol is wide
    /// enough to separate fields.
    fn feed(
        &mut self,
        at: SymbolPos,
        symbol: &Symbol,
        structural_space: bool,
    ) -> Option<SymbolPos> {
        let (start, cursor) = match self.state {
            MatchState::Matching { start, cursor } if self.matches_at(symbol, cursor) => {
                (start, cursor)
            },
            _ if self.matches_at(symbol, 0) => (at, 0),
            _ => {
                self.reset();
                return None;
            },
        };

        if cursor + 1 == self.phrase.len() {
            self.reset();
            return Some(start);
        }

        self.state = match symbol.detected_break {
            None => MatchState::Matching {
                start,
                cursor: cursor + 1,
            },
            Some(BreakType::Space) if !structural_space => MatchState::Matching {
                start,
                cursor: cursor + 2,
            },
            Some(_) => MatchState::Idle,
        };
        None
    }
}

/// Finds anchor phrases in a document.
#[derive(Debug, Clone, Copy)]
pub struct AnchorLocator<'a> {
    doc: &'a OcrDocument,
    break_ratio: f32,
}

impl<'a> AnchorLocator<'a> {
    /// Create a locator using the default structural break threshold.
    pub fn new(doc: &'a OcrDocument) -> Self {
        Self { doc, break_ratio: 1.0 }
    }

    /// Scale the structural break threshold.
    pub fn with_break_ratio(mut self, ratio: f32) -> Self {
        self.break_ratio = ratio;
        self
    }

    /// Find the first occurrence of `phrase`.
    ///
    /// Pages are scanned in order and a match never spans pages. Returns
    /// `None` when the phrase is empty or absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use field_oxide::extractors::AnchorLocator;
    /// use field_oxide::geometry::Quad;
    /// use field_oxide::ocr::BreakType::Space;
    /// use field_oxide::ocr::{OcrDocument, Page, Word};
    ///
    /// let page = Page::new(vec![
    ///     Word::from_text("Invoice", Quad::from_points(0.0, 0.0, 70.0, 10.0), Some(Space)),
    ///     Word::from_text("No", Quad::from_points(75.0, 0.0, 95.0, 10.0), Some(Space)),
    /// ]);
    /// let doc = OcrDocument::from_pages("scan.pdf", vec![page], vec![None]);
    ///
    /// let span = AnchorLocator::new(&doc).find("Invoice No").unwrap();
    /// assert_eq!((span.start_word, span.start_symbol), (0, 0));
    /// assert_eq!((span.end_word, span.end_symbol), (1, 1));
    /// ```
    pub fn find(&self, phrase: &str) -> Option<AnchorSpan> {
        let chars: Vec<char> = phrase.chars().collect();
        if chars.is_empty() {
            return None;
        }

        for (page_idx, page) in self.doc.pages().iter().enumerate() {
            let mut matcher = PhraseMatcher::new(&chars);
            for (word_idx, word) in page.words.iter().enumerate() {
                for (symbol_idx, symbol) in word.symbols.iter().enumerate() {
                    let structural = symbol.is_space_break()
                        && page
                            .words
                            .get(word_idx + 1)
                            .is_some_and(|next| {
                                is_phrase_break_scaled(&word.bbox, &next.bbox, self.break_ratio)
                            });
                    let at = SymbolPos {
                        word: word_idx,
                        symbol: symbol_idx,
                    };
                    if let Some(start) = matcher.feed(at, symbol, structural) {
                        log::debug!("Anchor {:?} found on page {}", phrase, page_idx);
                        return Some(AnchorSpan {
                            page: page_idx,
                            start_word: start.word,
                            start_symbol: start.symbol,
                            end_word: word_idx,
                            end_symbol: symbol_idx,
                        });
                    }
                }
            }
        }

        log::debug!("Anchor {:?} not found", phrase);
        None
    }

    /// Compute the enclosing box of a matched span.
    ///
    /// Returns `None` if the span does not point into this document.
    pub fn coords(&self, span: &AnchorSpan) -> Option<AnchorBox> {
        anchor_box(self.doc.page(span.page)?, span)
    }
}

/// Enclosing box of `span` on `page`.
///
/// Left comes from the first symbol's start, right from the last symbol's
/// end; top and bottom are the extremes over every symbol in the span.
pub fn anchor_box(page: &Page, span: &AnchorSpan) -> Option<AnchorBox> {
    let first = page.words.get(span.start_word)?.symbols.get(span.start_symbol)?;
    let last = page.words.get(span.end_word)?.symbols.get(span.end_symbol)?;

    let mut top = f32::INFINITY;
    let mut bottom = f32::NEG_INFINITY;
    for word_idx in span.start_word..=span.end_word {
        let word = page.words.get(word_idx)?;
        let from = if word_idx == span.start_word { span.start_symbol } else { 0 };
        let to = if word_idx == span.end_word {
            span.end_symbol + 1
        } else {
            word.symbols.len()
        };
        for symbol in word.symbols.get(from..to)? {
            top = top.min(symbol.bbox.top());
            bottom = bottom.max(symbol.bbox.bottom());
        }
    }

    Some(AnchorBox {
        left: first.bbox.left(),
        right: last.bbox.right(),
        top,
        bottom,
    })
}
