//! Positional value extraction.
//!
//! Given an anchor phrase, the value is read either to its right on the same
//! line or from the nearest line below whose words overlap the anchor
//! horizontally. Both walks accumulate symbol text and count boundaries:
//!
//! - a `SPACE` break is an ordinary space for phrase extraction, unless the
//!   gap to the next word is structural;
//! - any other break, a structural `SPACE`, or any `SPACE` in word extraction
//!   is a boundary.
//!
//! The walk stops at the `phrase_count`-th boundary and returns the segment
//! accumulated since the previous one. Reaching the end of the page returns
//! whatever was accumulated.

use crate::extractors::anchor::{AnchorBox, AnchorLocator, AnchorSpan};
use crate::geometry::is_phrase_break_scaled;
use crate::ocr::{OcrDocument, Page, Symbol, Word};
use crate::template::StringType;

/// Where a value sits relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Following the anchor on the same line
    Rightward,
    /// On the nearest following line that overlaps the anchor horizontally
    NearestLine,
}

/// A positional extraction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionQuery<'q> {
    /// Anchor phrase to locate
    pub anchor: &'q str,
    /// Walk direction
    pub direction: Direction,
    /// Word or phrase extent
    pub string_type: StringType,
    /// Segment to take, starting at 1
    pub phrase_count: u32,
}

impl<'q> PositionQuery<'q> {
    /// Query for the first word after `anchor` in `direction`.
    pub fn new(anchor: &'q str, direction: Direction) -> Self {
        Self {
            anchor,
            direction,
            string_type: StringType::Word,
            phrase_count: 1,
        }
    }

    /// Set the string type.
    pub fn with_string_type(mut self, string_type: StringType) -> Self {
        self.string_type = string_type;
        self
    }

    /// Set the phrase count.
    pub fn with_phrase_count(mut self, count: u32) -> Self {
        self.phrase_count = count;
        self
    }
}

/// Reads values positioned relative to anchor phrases.
#[derive(Debug, Clone, Copy)]
pub struct PositionExtractor<'a> {
    doc: &'a OcrDocument,
    break_ratio: f32,
}

impl<'a> PositionExtractor<'a> {
    /// Create an extractor using the default structural break threshold.
    pub fn new(doc: &'a OcrDocument) -> Self {
        Self { doc, break_ratio: 1.0 }
    }

    /// Scale the structural break threshold.
    pub fn with_break_ratio(mut self, ratio: f32) -> Self {
        self.break_ratio = ratio;
        self
    }

    /// Extract the value described by `query`.
    ///
    /// Returns an empty string when the anchor is absent or ends its page.
    pub fn extract(&self, query: &PositionQuery<'_>) -> String {
        let locator = AnchorLocator::new(self.doc).with_break_ratio(self.break_ratio);
        let Some(span) = locator.find(query.anchor) else {
            return String::new();
        };
        let (Some(anchor), Some(page)) = (locator.coords(&span), self.doc.page(span.page)) else {
            return String::new();
        };
        let Some(start) = value_start(page, &span) else {
            log::debug!("Anchor {:?} ends its page", query.anchor);
            return String::new();
        };

        let walk = Walk {
            page,
            start,
            string_type: query.string_type,
            phrase_count: query.phrase_count,
            break_ratio: self.break_ratio,
        };
        match query.direction {
            Direction::Rightward => walk.rightward(),
            Direction::NearestLine => walk.nearest_line(&anchor),
        }
    }
}

/// First (word, symbol) after the anchor: the next symbol of the anchor's last
/// word, else the first symbol of the following word.
fn value_start(page: &Page, span: &AnchorSpan) -> Option<(usize, usize)> {
    let end_word = page.words.get(span.end_word)?;
    if span.end_symbol + 1 < end_word.symbols.len() {
        Some((span.end_word, span.end_symbol + 1))
    } else if span.end_word + 1 < page.words.len() {
        Some((span.end_word + 1, 0))
    } else {
        None
    }
}

struct Walk<'a> {
    page: &'a Page,
    start: (usize, usize),
    string_type: StringType,
    phrase_count: u32,
    break_ratio: f32,
}

impl<'a> Walk<'a> {
    fn symbols(&self) -> impl Iterator<Item = (usize, &'a Word, &'a Symbol)> + 'a {
        let (start_word, start_symbol) = self.start;
        self.page
            .words
            .iter()
            .enumerate()
            .skip(start_word)
            .flat_map(move |(idx, word)| {
                let first = if idx == start_word { start_symbol } else { 0 };
                word.symbols.iter().skip(first).map(move |symbol| (idx, word, symbol))
            })
    }

    fn phrase_break(&self, current: &Word, next: &Word) -> bool {
        is_phrase_break_scaled(&current.bbox, &next.bbox, self.break_ratio)
    }

    /// A break kept as a literal space instead of counting as a boundary.
    fn is_literal_space(&self, word_idx: usize, word: &Word, symbol: &Symbol) -> bool {
        self.string_type == StringType::Phrase
            && symbol.is_space_break()
            && self
                .page
                .words
                .get(word_idx + 1)
                .is_some_and(|next| !self.phrase_break(word, next))
    }

    fn rightward(&self) -> String {
        let mut value = String::new();
        let mut boundaries = 0;

        for (idx, word, symbol) in self.symbols() {
            value.push_str(&symbol.text);
            if !symbol.has_break() {
                continue;
            }
            if self.is_literal_space(idx, word, symbol) {
                value.push(' ');
                continue;
            }
            boundaries += 1;
            if boundaries == self.phrase_count {
                return value;
            }
            value.clear();
        }

        value
    }

    fn nearest_line(&self, anchor: &AnchorBox) -> String {
        let mut value = String::new();
        let mut boundaries = 0;
        let mut overlap_start: Option<usize> = None;
        let mut line_mid = anchor.vertical_midpoint();

        for (idx, word, symbol) in self.symbols() {
            let below = !word.bbox.straddles(line_mid);
            if below && word.bbox.overlaps_horizontally(anchor.left, anchor.right) {
                overlap_start = Some(idx);
                line_mid = word.bbox.vertical_midpoint();
            }
            let Some(first) = overlap_start else {
                continue;
            };

            value.push_str(&symbol.text);
            if !symbol.has_break() {
                continue;
            }
            if self.is_literal_space(idx, word, symbol) {
                value.push(' ');
                continue;
            }
            boundaries += 1;
            if boundaries == self.phrase_count {
                return self.merge_backward(first, line_mid, value);
            }
            value.clear();
            overlap_start = None;
        }

        value
    }

    /// Prepend the words left of `first` on the locked line.
    ///
    /// The overlap test only guarantees the value's tail sits under the
    /// anchor; this recovers a head that starts further left. Stops at the
    /// first word off the line, a structural gap, an ordinary space in word
    /// extraction, or the start of the page.
    fn merge_backward(&self, first: usize, line_mid: f32, mut value: String) -> String {
        let words = &self.page.words;
        for idx in (1..=first).rev() {
            let current = &words[idx];
            let prev = &words[idx - 1];
            if !prev.bbox.straddles(line_mid) || self.phrase_break(prev, current) {
                break;
            }
            if !prev.ends_with_space() {
                value.insert_str(0, &prev.text());
            } else if self.string_type == StringType::Phrase {
                value = format!("{} {}", prev.text(), value);
            } else {
                break;
            }
        }
        value
    }
}
