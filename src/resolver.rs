//! Cell section resolution.
//!
//! Dispatches each section to its extraction method, then applies date
//! handling, the suffix and left trimming, in that order.

use crate::config::ExtractionConfig;
use crate::dates;
use crate::extractors::{Direction, PositionExtractor, PositionQuery};
use crate::ocr::OcrDocument;
use crate::search::{PatternSet, SearchOptions, TextSearcher};
use crate::template::{Cell, CellSection, SearchMethod};

/// Resolves cell sections against one document.
///
/// Holds only shared references and a read-only pattern cache, so the same
/// section always resolves to the same value.
#[derive(Debug, Clone)]
pub struct ValueResolver<'a> {
    doc: &'a OcrDocument,
    date_today: &'a str,
    config: &'a ExtractionConfig,
    patterns: PatternSet,
}

impl<'a> ValueResolver<'a> {
    /// Create a resolver. `date_today` is returned verbatim by `today` sections.
    pub fn new(doc: &'a OcrDocument, date_today: &'a str, config: &'a ExtractionConfig) -> Self {
        Self {
            doc,
            date_today,
            config,
            patterns: PatternSet::new(search_options(config)),
        }
    }

    /// Use precompiled patterns.
    pub fn with_patterns(mut self, patterns: PatternSet) -> Self {
        self.patterns = patterns;
        self
    }

    /// Resolve one section to its final value.
    pub fn resolve(&self, section: &CellSection) -> String {
        let mut value = self.raw_value(section);

        if section.wants_date() {
            let format = section
                .date_format()
                .unwrap_or(self.config.default_date_format.as_str());
            let shifted = dates::shift_and_format(
                &value,
                section.days_added(),
                format,
                &self.config.input_date_formats,
            );
            value = shifted.unwrap_or_else(|| {
                log::warn!("Could not read {:?} as a date", value);
                String::new()
            });
        }

        if let Some(suffix) = &section.append_chars {
            value.push_str(suffix);
        }

        let value = value.trim_start().to_string();
        log::trace!(
            "{:?} {:?} -> {:?}",
            section.search_or_input_method,
            section.phrase_or_value,
            value
        );
        value
    }

    /// Concatenate the resolved values of a cell's sections.
    pub fn resolve_cell(&self, cell: &Cell) -> String {
        cell.cell_sects.iter().map(|s| self.resolve(s)).collect()
    }

    fn raw_value(&self, section: &CellSection) -> String {
        let Some(method) = section.search_or_input_method else {
            return String::new();
        };
        match method {
            SearchMethod::Pattern => self.pattern_value(&section.phrase_or_value),
            SearchMethod::LeftPhrase => self.positional_value(section, Direction::Rightward),
            SearchMethod::TopPhrase => self.positional_value(section, Direction::NearestLine),
            SearchMethod::CustomValue => section.phrase_or_value.clone(),
            SearchMethod::Today => self.date_today.to_string(),
        }
    }

    fn positional_value(&self, section: &CellSection, direction: Direction) -> String {
        let query = PositionQuery::new(&section.phrase_or_value, direction)
            .with_string_type(section.string_type)
            .with_phrase_count(section.phrase_count);
        PositionExtractor::new(self.doc)
            .with_break_ratio(self.config.phrase_break_ratio)
            .extract(&query)
    }

    fn pattern_value(&self, pattern: &str) -> String {
        let compiled;
        let regex = match self.patterns.get(pattern) {
            Some(regex) => regex,
            None => match TextSearcher::build_regex(pattern, self.patterns.options()) {
                Ok(regex) => {
                    compiled = regex;
                    &compiled
                },
                Err(e) => {
                    log::warn!("Skipping invalid pattern {:?}: {}", pattern, e);
                    return String::new();
                },
            },
        };
        match TextSearcher::find_first(self.doc, regex) {
            Some(result) => result.text,
            None => {
                log::debug!("Pattern {:?} not found", pattern);
                String::new()
            },
        }
    }
}

/// Search options implied by `config`.
pub(crate) fn search_options(config: &ExtractionConfig) -> SearchOptions {
    SearchOptions::new().with_case_insensitive(config.case_insensitive_patterns)
}
