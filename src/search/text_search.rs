//! Regex search over page full texts.
//!
//! Pattern search ignores geometry entirely: each page's full-text rendering
//! is searched in page order and the first match wins.

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};

use crate::error::{Error, Result};
use crate::ocr::OcrDocument;
use crate::template::{RecurringDocument, SearchMethod};

/// A pattern match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Page number (0-indexed) where the match was found
    pub page: usize,
    /// The matched text
    pub text: String,
    /// Byte offset of the match start in the page text
    pub start_index: usize,
    /// Byte offset just past the match end in the page text
    pub end_index: usize,
}

/// Options for pattern search.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Case insensitive search
    pub case_insensitive: bool,
    /// Treat pattern as literal text (not regex)
    pub literal: bool,
}

impl SearchOptions {
    /// Create new default search options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set case sensitivity.
    pub fn with_case_insensitive(mut self, value: bool) -> Self {
        self.case_insensitive = value;
        self
    }

    /// Treat pattern as literal text (escape regex special characters).
    pub fn with_literal(mut self, value: bool) -> Self {
        self.literal = value;
        self
    }
}

/// Pattern searcher over a document's page texts.
pub struct TextSearcher;

impl TextSearcher {
    /// Build regex from pattern and options.
    pub fn build_regex(
        pattern: &str,
        options: &SearchOptions,
    ) -> std::result::Result<Regex, regex::Error> {
        let pattern_str = if options.literal {
            regex::escape(pattern)
        } else {
            pattern.to_string()
        };

        RegexBuilder::new(&pattern_str)
            .case_insensitive(options.case_insensitive)
            .build()
    }

    /// First match of `regex` across the document's pages.
    ///
    /// Pages without a full-text rendering are skipped.
    pub fn find_first(doc: &OcrDocument, regex: &Regex) -> Option<SearchResult> {
        doc.full_texts().enumerate().find_map(|(page, text)| {
            let mat = regex.find(text?)?;
            Some(SearchResult {
                page,
                text: mat.as_str().to_string(),
                start_index: mat.start(),
                end_index: mat.end(),
            })
        })
    }
}

/// Compiled patterns of a template, keyed by their source.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    options: SearchOptions,
    patterns: HashMap<String, Regex>,
}

impl PatternSet {
    /// Create an empty set compiling with `options`.
    pub fn new(options: SearchOptions) -> Self {
        Self {
            options,
            patterns: HashMap::new(),
        }
    }

    /// Compile every pattern section of `template`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] for the first section whose regex
    /// does not compile.
    pub fn compile(template: &RecurringDocument, options: SearchOptions) -> Result<Self> {
        let mut set = Self::new(options);
        for ((row, cell, section), sect) in template.sections() {
            if sect.search_or_input_method != Some(SearchMethod::Pattern) {
                continue;
            }
            set.insert(&sect.phrase_or_value).map_err(|e| Error::InvalidPattern {
                row,
                cell,
                section,
                reason: e.to_string(),
            })?;
        }
        Ok(set)
    }

    /// Compile and store `pattern` unless already present.
    pub fn insert(&mut self, pattern: &str) -> std::result::Result<(), regex::Error> {
        if !self.patterns.contains_key(pattern) {
            let regex = TextSearcher::build_regex(pattern, &self.options)?;
            self.patterns.insert(pattern.to_string(), regex);
        }
        Ok(())
    }

    /// Compiled regex for `pattern`, if present.
    pub fn get(&self, pattern: &str) -> Option<&Regex> {
        self.patterns.get(pattern)
    }

    /// Options the set compiles with.
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Number of distinct patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True if the set holds no patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
