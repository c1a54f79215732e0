//! Wire shapes of the OCR engine's output.
//!
//! These mirror the JSON the recognition service emits, field for field, so
//! they can be deserialized without any intermediate mapping. Nothing outside
//! [`crate::ocr`] should read them directly: the token model in
//! [`crate::ocr::model`] resolves coordinate sets and break markers once.

use serde::{Deserialize, Serialize};

use crate::geometry::{CoordinateSpace, Point, Quad};

/// Full-text projection of a document, one entry per page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocText {
    /// Name of the source file
    pub file_name: String,
    /// Per-page recognition results
    #[serde(default)]
    pub extraction: Vec<PageExtraction>,
}

/// Recognition result for one page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageExtraction {
    /// Absent when nothing was recognized on the page
    #[serde(default)]
    pub full_text_annotation: Option<FullTextAnnotation>,
}

/// Page text as rendered by the OCR engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FullTextAnnotation {
    /// Recognized text, lines separated by newlines
    #[serde(default)]
    pub text: String,
}

/// Word-tree projection of a document: pages of words.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordList {
    /// Name of the source file
    pub file_name: String,
    /// Outer vector is pages, inner is words in OCR order
    #[serde(default)]
    pub words: Vec<Vec<RawWord>>,
}

/// A recognized word.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWord {
    /// Symbols in reading order
    #[serde(default)]
    pub symbols: Vec<RawSymbol>,
    /// Word box; computed from the symbols when absent
    #[serde(default)]
    pub bounding_box: Option<BoundingPoly>,
}

/// A recognized glyph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSymbol {
    /// Glyph text, normally a single character
    #[serde(default)]
    pub text: String,
    /// Glyph box
    #[serde(default)]
    pub bounding_box: Option<BoundingPoly>,
    /// Extra properties such as a detected break
    #[serde(default)]
    pub property: Option<TextProperty>,
}

/// Bounding polygon. Exactly one of the two vertex sets is populated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingPoly {
    /// Pixel coordinates
    #[serde(default)]
    pub vertices: Vec<Vertex>,
    /// Page-relative coordinates
    #[serde(default)]
    pub normalized_vertices: Vec<Vertex>,
}

impl BoundingPoly {
    /// Resolve the populated vertex set into a [`Quad`].
    ///
    /// Pixel vertices win when both are present. Returns `None` when neither
    /// set is populated or the populated one has fewer than four corners.
    pub fn to_quad(&self) -> Option<Quad> {
        let (vertices, space) = if !self.vertices.is_empty() {
            (&self.vertices, CoordinateSpace::Pixel)
        } else {
            (&self.normalized_vertices, CoordinateSpace::Normalized)
        };
        match vertices.as_slice() {
            [a, b, c, d, ..] => {
                Some(Quad::new([a.point(), b.point(), c.point(), d.point()], space))
            },
            _ => None,
        }
    }
}

/// One polygon corner. The engine omits zero coordinates.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Vertex {
    /// X coordinate
    #[serde(default)]
    pub x: f32,
    /// Y coordinate
    #[serde(default)]
    pub y: f32,
}

impl Vertex {
    fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Additional symbol information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProperty {
    /// Break detected after the symbol, if any
    #[serde(default)]
    pub detected_break: Option<DetectedBreak>,
}

/// A break following a symbol.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedBreak {
    /// Kind of break
    #[serde(rename = "type", default)]
    pub kind: BreakType,
    /// True if the break precedes the symbol instead of following it
    #[serde(default)]
    pub is_prefix: bool,
}

/// Kinds of break the OCR engine reports.
///
/// Only [`BreakType::Space`] is an ordinary inter-word space; every other kind
/// ends a word or line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BreakType {
    /// Regular space
    Space,
    /// Wide space
    SureSpace,
    /// Line-wrapping break
    EolSureSpace,
    /// End-of-line hyphen
    Hyphen,
    /// Line break that ends a paragraph
    LineBreak,
    /// Unrecognized break kind
    #[default]
    #[serde(other)]
    Unknown,
}
