//! Blueprint assembly.
//!
//! A blueprint is the tabular result of running a template over one
//! document: a header of `{id, title}` columns and one `id -> value` map per
//! template row. Column ids are positional (`"0"`, `"1"`, ...), so two
//! columns with the same title stay distinct.
//!
//! # Examples
//!
//! ```
//! use field_oxide::blueprint::BlueprintBuilder;
//! use field_oxide::config::ExtractionConfig;
//! use field_oxide::ocr::OcrDocument;
//! use field_oxide::template::{Cell, CellSection, RecurringDocument, Row, SearchMethod};
//!
//! let doc = OcrDocument::from_pages("scan.pdf", vec![], vec![]);
//! let template = RecurringDocument::new(
//!     ["Vendor"],
//!     vec![Row::new(vec![Cell::new(vec![CellSection::new(SearchMethod::CustomValue, "Acme")])])],
//! );
//! let config = ExtractionConfig::default();
//!
//! let blueprint = BlueprintBuilder::new(&doc, &template, "2024/06/01", &config)?.build()?;
//! assert_eq!(blueprint.header[0].title, "Vendor");
//! assert_eq!(blueprint.rows[0]["0"], "Acme");
//! # Ok::<(), field_oxide::Error>(())
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::ExtractionConfig;
use crate::error::{Error, Result};
use crate::ocr::OcrDocument;
use crate::resolver::{search_options, ValueResolver};
use crate::search::PatternSet;
use crate::template::RecurringDocument;

/// A blueprint column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvHeaderCell {
    /// Positional id, the column index as a string
    pub id: String,
    /// Column title from the template header
    pub title: String,
}

/// One output row, keyed by column id in header order.
pub type CsvRow = IndexMap<String, String>;

/// The tabular result for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvBlueprint {
    /// Source document name
    #[serde(rename = "fileName")]
    pub file_name: String,
    /// Columns in order
    #[serde(rename = "CSVHeader")]
    pub header: Vec<CsvHeaderCell>,
    /// One map per template row
    #[serde(rename = "CSVDataRows")]
    pub rows: Vec<CsvRow>,
}

impl CsvBlueprint {
    /// Each row's values in header order.
    ///
    /// A column missing from a row yields an empty string.
    pub fn records(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        self.rows.iter().map(move |row| {
            self.header
                .iter()
                .map(|col| row.get(&col.id).map(String::as_str).unwrap_or(""))
                .collect()
        })
    }

    /// Column titles in order.
    pub fn titles(&self) -> Vec<&str> {
        self.header.iter().map(|col| col.title.as_str()).collect()
    }
}

/// Drives a template over one document.
///
/// Construction validates the template and compiles its patterns, so a
/// builder that exists can always produce a blueprint of the right shape.
#[derive(Debug, Clone)]
pub struct BlueprintBuilder<'a> {
    doc: &'a OcrDocument,
    template: &'a RecurringDocument,
    resolver: ValueResolver<'a>,
}

impl<'a> BlueprintBuilder<'a> {
    /// Create a builder.
    ///
    /// # Errors
    ///
    /// Returns the first structural problem in `template`:
    /// [`Error::CellCountMismatch`], [`Error::InvalidPhraseCount`] or
    /// [`Error::InvalidPattern`].
    pub fn new(
        doc: &'a OcrDocument,
        template: &'a RecurringDocument,
        date_today: &'a str,
        config: &'a ExtractionConfig,
    ) -> Result<Self> {
        template.validate()?;
        let patterns = PatternSet::compile(template, search_options(config))?;
        log::debug!(
            "Template {:?}: {} columns, {} rows, {} patterns",
            template.name,
            template.header.len(),
            template.data_rows.len(),
            patterns.len()
        );
        Ok(Self {
            doc,
            template,
            resolver: ValueResolver::new(doc, date_today, config).with_patterns(patterns),
        })
    }

    /// Header columns with positional ids.
    pub fn header(&self) -> Vec<CsvHeaderCell> {
        self.template
            .header
            .iter()
            .enumerate()
            .map(|(i, cell)| CsvHeaderCell {
                id: i.to_string(),
                title: cell.value.clone(),
            })
            .collect()
    }

    /// Resolve every template row against `header`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CellCountMismatch`] if `header` does not have one
    /// column per cell.
    pub fn data_rows(&self, header: &[CsvHeaderCell]) -> Result<Vec<CsvRow>> {
        let mut rows = Vec::with_capacity(self.template.data_rows.len());
        for (row_idx, row) in self.template.data_rows.iter().enumerate() {
            if row.data_cells.len() != header.len() {
                return Err(Error::CellCountMismatch {
                    row: row_idx,
                    expected: header.len(),
                    found: row.data_cells.len(),
                });
            }
            let values: CsvRow = header
                .iter()
                .zip(&row.data_cells)
                .map(|(col, cell)| (col.id.clone(), self.resolver.resolve_cell(cell)))
                .collect();
            log::debug!("{}: row {} resolved", self.doc.file_name(), row_idx);
            rows.push(values);
        }
        Ok(rows)
    }

    /// Assemble the full blueprint.
    pub fn build(&self) -> Result<CsvBlueprint> {
        let header = self.header();
        let rows = self.data_rows(&header)?;
        Ok(CsvBlueprint {
            file_name: self.doc.file_name().to_string(),
            header,
            rows,
        })
    }
}

/// Build the blueprint of `doc` under `template` in one call.
pub fn build_blueprint(
    doc: &OcrDocument,
    template: &RecurringDocument,
    date_today: &str,
    config: &ExtractionConfig,
) -> Result<CsvBlueprint> {
    BlueprintBuilder::new(doc, template, date_today, config)?.build()
}
