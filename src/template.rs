//! Recurring document templates.
//!
//! A template describes one document layout: the CSV header and, for every
//! data row, how each cell's value is found. Cells are built from one or more
//! sections whose values are concatenated.
//!
//! Templates are authored elsewhere and arrive as JSON:
//!
//! ```json
//! {
//!   "name": "Acme invoice",
//!   "idPhrase": "ACME SUPPLY CO",
//!   "header": [{"value": "Invoice"}, {"value": "Due"}],
//!   "dataRows": [{"dataCells": [
//!     {"cellSects": [{"searchOrInputMethod": "leftPhrase", "phraseOrValue": "Invoice No", "stringType": "word", "phraseCount": 1}]},
//!     {"cellSects": [{"searchOrInputMethod": "today", "daysAdded": 30}]}
//!   ]}]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::extractors::{AnchorLocator, Direction};
use crate::ocr::OcrDocument;

/// How a cell section obtains its raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchMethod {
    /// First regex match in the page texts
    Pattern,
    /// Text to the right of an anchor phrase, on its line
    LeftPhrase,
    /// Text on the nearest line below an anchor phrase that overlaps it
    TopPhrase,
    /// The section's literal value
    CustomValue,
    /// The caller-supplied current date
    Today,
}

impl SearchMethod {
    /// Walk direction for the positional methods.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Self::LeftPhrase => Some(Direction::Rightward),
            Self::TopPhrase => Some(Direction::NearestLine),
            Self::Pattern | Self::CustomValue | Self::Today => None,
        }
    }
}

/// Extent of a positional value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringType {
    /// Stops at the first space of any kind
    #[default]
    Word,
    /// Keeps ordinary spaces, stops at structural breaks
    Phrase,
}

fn default_phrase_count() -> u32 {
    1
}

/// One extraction instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellSection {
    /// Extraction method; a section without one contributes only its suffix
    #[serde(default)]
    pub search_or_input_method: Option<SearchMethod>,
    /// Anchor phrase, regex or literal value depending on the method
    #[serde(default)]
    pub phrase_or_value: String,
    /// Word or phrase extraction for positional methods
    #[serde(default)]
    pub string_type: StringType,
    /// Which boundary-delimited segment to take, starting at 1
    #[serde(default = "default_phrase_count")]
    pub phrase_count: u32,
    /// Output date format; enables date handling
    #[serde(default)]
    pub date_format: Option<String>,
    /// Days to add; a non-zero value enables date handling
    #[serde(default)]
    pub days_added: Option<i64>,
    /// Suffix appended after date handling
    #[serde(default)]
    pub append_chars: Option<String>,
}

impl CellSection {
    /// Create a section with the given method and phrase, defaults elsewhere.
    pub fn new(method: SearchMethod, phrase_or_value: impl Into<String>) -> Self {
        Self {
            search_or_input_method: Some(method),
            phrase_or_value: phrase_or_value.into(),
            string_type: StringType::Word,
            phrase_count: 1,
            date_format: None,
            days_added: None,
            append_chars: None,
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

    /// Set the output date format.
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }

    /// Set the day offset.
    pub fn with_days_added(mut self, days: i64) -> Self {
        self.days_added = Some(days);
        self
    }

    /// Set the appended suffix.
    pub fn with_append_chars(mut self, chars: impl Into<String>) -> Self {
        self.append_chars = Some(chars.into());
        self
    }

    /// Output date format, if one is set and non-empty.
    pub fn date_format(&self) -> Option<&str> {
        self.date_format.as_deref().filter(|f| !f.is_empty())
    }

    /// Day offset, zero when unset.
    pub fn days_added(&self) -> i64 {
        self.days_added.unwrap_or(0)
    }

    /// True if the raw value must be reparsed as a date.
    pub fn wants_date(&self) -> bool {
        self.date_format().is_some() || self.days_added() != 0
    }
}

/// One output value, the concatenation of its sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    /// Sections in output order
    #[serde(default)]
    pub cell_sects: Vec<CellSection>,
}

impl Cell {
    /// Create a cell from its sections.
    pub fn new(cell_sects: Vec<CellSection>) -> Self {
        Self { cell_sects }
    }
}

/// One output row; cell *i* fills header column *i*.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    /// Cells in column order
    #[serde(default)]
    pub data_cells: Vec<Cell>,
}

impl Row {
    /// Create a row from its cells.
    pub fn new(data_cells: Vec<Cell>) -> Self {
        Self { data_cells }
    }
}

/// A header column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderCell {
    /// Column title
    #[serde(default)]
    pub value: String,
}

/// A recurring document template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringDocument {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Literal text that identifies documents of this layout
    #[serde(default)]
    pub id_phrase: Option<String>,
    /// Header columns
    #[serde(default)]
    pub header: Vec<HeaderCell>,
    /// Data rows
    #[serde(default)]
    pub data_rows: Vec<Row>,
}

impl RecurringDocument {
    /// Create a template from header titles and rows.
    pub fn new<I, S>(titles: I, data_rows: Vec<Row>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: String::new(),
            id_phrase: None,
            header: titles.into_iter().map(|t| HeaderCell { value: t.into() }).collect(),
            data_rows,
        }
    }

    /// Set the identifying phrase.
    pub fn with_id_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.id_phrase = Some(phrase.into());
        self
    }

    /// Parse a template from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a template from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    /// Iterate over every section with its (row, cell, section) position.
    pub fn sections(&self) -> impl Iterator<Item = ((usize, usize, usize), &CellSection)> {
        self.data_rows.iter().enumerate().flat_map(|(r, row)| {
            row.data_cells.iter().enumerate().flat_map(move |(c, cell)| {
                cell.cell_sects.iter().enumerate().map(move |(s, sect)| ((r, c, s), sect))
            })
        })
    }

    /// Check the template's shape.
    ///
    /// # Errors
    ///
    /// - [`Error::CellCountMismatch`] if a row's cell count differs from the
    ///   header's column count
    /// - [`Error::InvalidPhraseCount`] if a positional section asks for
    ///   segment zero
    pub fn validate(&self) -> Result<()> {
        for (row_idx, row) in self.data_rows.iter().enumerate() {
            if row.data_cells.len() != self.header.len() {
                return Err(Error::CellCountMismatch {
                    row: row_idx,
                    expected: self.header.len(),
                    found: row.data_cells.len(),
                });
            }
        }

        for ((row, cell, section), sect) in self.sections() {
            let positional = sect.search_or_input_method.and_then(|m| m.direction()).is_some();
            if positional && sect.phrase_count == 0 {
                return Err(Error::InvalidPhraseCount { row, cell, section });
            }
        }

        Ok(())
    }

    /// True if `doc` contains this template's identifying phrase.
    ///
    /// A template without an identifying phrase matches nothing.
    pub fn matches(&self, doc: &OcrDocument) -> bool {
        self.id_phrase
            .as_deref()
            .filter(|p| !p.is_empty())
            .is_some_and(|p| AnchorLocator::new(doc).find(p).is_some())
    }
}

/// First template whose identifying phrase occurs in `doc`.
pub fn identify<'t>(
    doc: &OcrDocument,
    templates: &'t [RecurringDocument],
) -> Option<&'t RecurringDocument> {
    let found = templates.iter().find(|t| t.matches(doc));
    match found {
        Some(t) => log::debug!("{} matches template {:?}", doc.file_name(), t.name),
        None => log::debug!("{} matches no template", doc.file_name()),
    }
    found
}
