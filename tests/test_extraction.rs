//! End-to-end tests: OCR JSON in, blueprint out.

use field_oxide::extractors::AnchorLocator;
use field_oxide::geometry::{CoordinateSpace, Quad};
use field_oxide::ocr::{OcrDocument, Page, Word};
use field_oxide::{
    build_blueprint, Cell, CellSection, Error, ExtractionConfig, RecurringDocument, Row,
    SearchMethod, StringType, ValueResolver,
};
use serde_json::{json, Value};

/// One OCR word in wire form, glyphs spread evenly over `x0..x1`.
fn word_json(
    text: &str,
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    brk: Option<&str>,
    with_box: bool,
) -> Value {
    let n = text.chars().count() as f32;
    let step = (x1 - x0) / n;
    let last = text.chars().count() - 1;
    let symbols: Vec<Value> = text
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let sx0 = x0 + step * i as f32;
            let mut symbol = json!({
                "text": c.to_string(),
                "boundingBox": {"vertices": quad_json(sx0, y0, sx0 + step, y1)},
            });
            if let (true, Some(kind)) = (i == last, brk) {
                symbol["property"] = json!({"detectedBreak": {"type": kind}});
            }
            symbol
        })
        .collect();
    let mut word = json!({ "symbols": symbols });
    if with_box {
        word["boundingBox"] = json!({"vertices": quad_json(x0, y0, x1, y1)});
    }
    word
}

fn quad_json(x0: f32, y0: f32, x1: f32, y1: f32) -> Value {
    json!([{"x": x0, "y": y0}, {"x": x1, "y": y0}, {"x": x1, "y": y1}, {"x": x0, "y": y1}])
}

/// A one-page invoice:
///
/// ```text
/// Invoice No INV-2024          Date 2023-01-01
///                    Ship To
///               Jane Doe
/// ```
fn invoice_json() -> (String, String) {
    let words = vec![
        word_json("Invoice", 0.0, 20.0, 70.0, 40.0, Some("SPACE"), true),
        word_json("No", 80.0, 20.0, 100.0, 40.0, Some("SPACE"), true),
        word_json("INV-2024", 110.0, 20.0, 190.0, 40.0, Some("SPACE"), true),
        word_json("Date", 300.0, 20.0, 340.0, 40.0, Some("SPACE"), true),
        word_json("2023-01-01", 350.0, 20.0, 450.0, 40.0, Some("LINE_BREAK"), true),
        word_json("Ship", 200.0, 100.0, 230.0, 120.0, Some("SPACE"), false),
        word_json("To", 240.0, 100.0, 270.0, 120.0, Some("LINE_BREAK"), false),
        word_json("Jane", 120.0, 140.0, 180.0, 160.0, Some("SPACE"), true),
        word_json("Doe", 190.0, 140.0, 240.0, 160.0, Some("LINE_BREAK"), true),
    ];
    let doc_text = json!({
        "fileName": "invoice-0042.pdf",
        "extraction": [{"fullTextAnnotation": {
            "text": "Invoice No INV-2024 Date 2023-01-01\nShip To\nJane Doe\nSSN: 123-45-6789\n"
        }}],
    });
    let word_list = json!({ "fileName": "invoice-0042.pdf", "words": [words] });
    (doc_text.to_string(), word_list.to_string())
}

/// Rewrite every pixel `vertices` list as page-relative `normalizedVertices`.
fn normalize_vertices(value: &mut Value, page_width: f64, page_height: f64) {
    match value {
        Value::Object(map) => {
            if let Some(Value::Array(vertices)) = map.remove("vertices") {
                let scaled: Vec<Value> = vertices
                    .iter()
                    .map(|v| {
                        let x = v["x"].as_f64().unwrap_or(0.0) / page_width;
                        let y = v["y"].as_f64().unwrap_or(0.0) / page_height;
                        json!({"x": x, "y": y})
                    })
                    .collect();
                map.insert("normalizedVertices".to_string(), Value::Array(scaled));
            }
            for child in map.values_mut() {
                normalize_vertices(child, page_width, page_height);
            }
        },
        Value::Array(items) => {
            for item in items {
                normalize_vertices(item, page_width, page_height);
            }
        },
        _ => {},
    }
}

fn invoice() -> OcrDocument {
    let (doc_text, word_list) = invoice_json();
    OcrDocument::from_json_str(&doc_text, &word_list).unwrap()
}

fn section(method: SearchMethod, value: &str) -> CellSection {
    CellSection::new(method, value)
}

mod scenarios {
    use super::*;

    #[test]
    fn test_left_phrase_word() {
        let doc = invoice();
        let config = ExtractionConfig::default();
        let resolver = ValueResolver::new(&doc, "", &config);
        assert_eq!(resolver.resolve(&section(SearchMethod::LeftPhrase, "Invoice No")), "INV-2024");
    }

    #[test]
    fn test_top_phrase_joins_line() {
        let doc = invoice();
        let config = ExtractionConfig::default();
        let resolver = ValueResolver::new(&doc, "", &config);
        let sect = section(SearchMethod::TopPhrase, "Ship To").with_string_type(StringType::Phrase);
        assert_eq!(resolver.resolve(&sect), "Jane Doe");
    }

    #[test]
    fn test_pattern() {
        let doc = invoice();
        let config = ExtractionConfig::default();
        let resolver = ValueResolver::new(&doc, "", &config);
        assert_eq!(
            resolver.resolve(&section(SearchMethod::Pattern, r"\d{3}-\d{2}-\d{4}")),
            "123-45-6789"
        );
    }

    #[test]
    fn test_date_shift() {
        let doc = invoice();
        let config = ExtractionConfig::default();
        let resolver = ValueResolver::new(&doc, "", &config);
        let due = section(SearchMethod::LeftPhrase, "Date")
            .with_days_added(5)
            .with_date_format("YYYY/MM/DD");
        assert_eq!(resolver.resolve(&due), "2023/01/06");

        let bad = section(SearchMethod::CustomValue, "N/A")
            .with_days_added(5)
            .with_date_format("YYYY/MM/DD");
        assert_eq!(resolver.resolve(&bad), "");
    }

    #[test]
    fn test_missing_anchor_is_empty() {
        let doc = invoice();
        let config = ExtractionConfig::default();
        let resolver = ValueResolver::new(&doc, "", &config);
        assert_eq!(resolver.resolve(&section(SearchMethod::LeftPhrase, "PO Number")), "");
        assert_eq!(resolver.resolve(&section(SearchMethod::TopPhrase, "Bill To")), "");
    }

    #[test]
    fn test_normalized_vertices_end_to_end() {
        let (doc_text, word_list) = invoice_json();
        let mut word_list: Value = serde_json::from_str(&word_list).unwrap();
        normalize_vertices(&mut word_list, 1000.0, 1000.0);
        assert!(word_list["words"][0][0]["boundingBox"]["normalizedVertices"].is_array());

        let doc = OcrDocument::from_json_str(&doc_text, &word_list.to_string()).unwrap();
        let ship = &doc.page(0).unwrap().words[5];
        assert_eq!(ship.bbox.space, CoordinateSpace::Normalized);
        assert!((ship.bbox.left() - 0.2).abs() < 1e-6);

        let config = ExtractionConfig::default();
        let resolver = ValueResolver::new(&doc, "", &config);
        let invoice_no = section(SearchMethod::LeftPhrase, "Invoice No");
        assert_eq!(resolver.resolve(&invoice_no), "INV-2024");
        let invoice_phrase =
            section(SearchMethod::LeftPhrase, "Invoice").with_string_type(StringType::Phrase);
        assert_eq!(resolver.resolve(&invoice_phrase), "No INV-2024");
        let ship_to =
            section(SearchMethod::TopPhrase, "Ship To").with_string_type(StringType::Phrase);
        assert_eq!(resolver.resolve(&ship_to), "Jane Doe");
        let due = section(SearchMethod::LeftPhrase, "Date").with_days_added(5);
        assert_eq!(resolver.resolve(&due), "2023/01/06");
    }

    #[test]
    fn test_computed_word_box() {
        let doc = invoice();
        let ship = &doc.page(0).unwrap().words[5];
        assert_eq!(ship.bbox.left(), 200.0);
        assert_eq!(ship.bbox.right(), 230.0);
        assert_eq!(ship.bbox.top(), 100.0);
        assert_eq!(ship.bbox.bottom(), 120.0);
    }
}

mod blueprint {
    use super::*;

    fn template() -> RecurringDocument {
        RecurringDocument::new(
            ["Invoice", "Customer", "Due", "SSN"],
            vec![Row::new(vec![
                Cell::new(vec![section(SearchMethod::LeftPhrase, "Invoice No")]),
                Cell::new(vec![
                    section(SearchMethod::TopPhrase, "Ship To").with_string_type(StringType::Phrase)
                ]),
                Cell::new(vec![section(SearchMethod::LeftPhrase, "Date").with_days_added(30)]),
                Cell::new(vec![
                    section(SearchMethod::CustomValue, "SSN "),
                    section(SearchMethod::Pattern, r"\d{3}-\d{2}-\d{4}"),
                ]),
            ])],
        )
        .with_id_phrase("Invoice No")
    }

    #[test]
    fn test_full_blueprint() {
        let doc = invoice();
        let config = ExtractionConfig::default();
        let bp = build_blueprint(&doc, &template(), "2024/06/01", &config).unwrap();

        assert_eq!(bp.file_name, "invoice-0042.pdf");
        assert_eq!(bp.titles(), vec!["Invoice", "Customer", "Due", "SSN"]);
        let records: Vec<_> = bp.records().collect();
        // Sections are concatenated and each one is left-trimmed
        assert_eq!(records, vec![vec!["INV-2024", "Jane Doe", "2023/01/31", "SSN 123-45-6789"]]);
    }

    #[test]
    fn test_template_round_trip_through_json() {
        let json = serde_json::to_string(&template()).unwrap();
        assert!(json.contains("\"searchOrInputMethod\":\"leftPhrase\""));
        let parsed = RecurringDocument::from_json_str(&json).unwrap();
        assert_eq!(parsed, template());
        assert!(parsed.matches(&invoice()));
    }

    #[test]
    fn test_unknown_method_rejected() {
        let json = r#"{"header": [{"value": "A"}], "dataRows": [{"dataCells": [
            {"cellSects": [{"searchOrInputMethod": "bottomPhrase", "phraseOrValue": "x"}]}
        ]}]}"#;
        assert!(matches!(RecurringDocument::from_json_str(json), Err(Error::Json(_))));
    }

    #[test]
    fn test_missing_coordinates_rejected() {
        let doc_text = json!({"fileName": "x", "extraction": [{}]}).to_string();
        let word_list = json!({"fileName": "x", "words": [[
            {"symbols": [{"text": "A", "boundingBox": {"vertices": []}}]}
        ]]})
        .to_string();
        let err = OcrDocument::from_json_str(&doc_text, &word_list).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingCoordinates {
                page: 0,
                word: 0,
                symbol: Some(0)
            }
        ));
    }

    #[test]
    fn test_blueprint_json_shape() {
        let doc = invoice();
        let config = ExtractionConfig::default();
        let bp = build_blueprint(&doc, &template(), "2024/06/01", &config).unwrap();
        let value = serde_json::to_value(&bp).unwrap();
        let row = value["CSVDataRows"][0].as_object().unwrap();
        let keys: Vec<&str> = row.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["0", "1", "2", "3"]);
        assert_eq!(value["CSVHeader"][2], json!({"id": "2", "title": "Due"}));
    }
}

mod loaders {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_from_json_files() {
        let dir = TempDir::new().unwrap();
        let (doc_text, word_list) = invoice_json();
        let doc_path = dir.path().join("invoice.doctext.json");
        let words_path = dir.path().join("invoice.words.json");
        fs::write(&doc_path, doc_text).unwrap();
        fs::write(&words_path, word_list).unwrap();

        let doc = OcrDocument::from_json_files(&doc_path, &words_path).unwrap();
        assert_eq!(doc.file_name(), "invoice-0042.pdf");
        assert_eq!(doc.pages().len(), 1);
        assert_eq!(doc.page(0).unwrap().words.len(), 9);
    }

    #[test]
    fn test_template_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("template.json");
        fs::write(
            &path,
            r#"{"name": "t", "header": [{"value": "Today"}],
                "dataRows": [{"dataCells": [{"cellSects": [{"searchOrInputMethod": "today"}]}]}]}"#,
        )
        .unwrap();

        let template = RecurringDocument::from_json_file(&path).unwrap();
        let config = ExtractionConfig::default();
        let bp = build_blueprint(&invoice(), &template, "2024/06/01", &config).unwrap();
        assert_eq!(bp.rows[0]["0"], "2024/06/01");
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = RecurringDocument::from_json_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}

mod properties {
    use super::*;
    use field_oxide::geometry::is_phrase_break;
    use proptest::prelude::*;
    use field_oxide::ocr::BreakType::{LineBreak, Space};

    const ANCHORS: [&str; 6] = ["Invoice", "Invoice No", "Date", "Ship To", "Jane", "Missing"];

    fn single_line(words: Vec<Word>) -> OcrDocument {
        OcrDocument::from_pages("prop.pdf", vec![Page::new(words)], vec![None])
    }

    proptest! {
        #[test]
        fn test_anchor_span_within_word(
            prefix in "[a-z]{0,5}",
            phrase in "[A-Z0-9]{1,6}",
            suffix in "[a-z]{0,5}",
        ) {
            let text = format!("{}{}{}", prefix, phrase, suffix);
            let width = text.len() as f32 * 10.0;
            let bbox = Quad::from_points(0.0, 0.0, width, 20.0);
            let doc = single_line(vec![Word::from_text(&text, bbox, Some(LineBreak))]);

            let span = AnchorLocator::new(&doc).find(&phrase).unwrap();
            prop_assert_eq!((span.start_word, span.start_symbol), (0, prefix.len()));
            prop_assert_eq!((span.end_word, span.end_symbol), (0, prefix.len() + phrase.len() - 1));
        }

        #[test]
        fn test_anchor_span_across_space(
            prefix in "[a-z]{0,4}",
            head in "[A-Z0-9]{1,4}",
            tail in "[A-Z0-9]{1,4}",
            suffix in "[a-z]{0,4}",
        ) {
            let first = format!("{}{}", prefix, head);
            let second = format!("{}{}", tail, suffix);
            let w1 = first.len() as f32 * 10.0;
            let w2 = second.len() as f32 * 10.0;
            let doc = single_line(vec![
                Word::from_text(&first, Quad::from_points(0.0, 0.0, w1, 20.0), Some(Space)),
                Word::from_text(
                    &second,
                    Quad::from_points(w1 + 5.0, 0.0, w1 + 5.0 + w2, 20.0),
                    Some(LineBreak),
                ),
            ]);

            let span = AnchorLocator::new(&doc).find(&format!("{} {}", head, tail)).unwrap();
            prop_assert_eq!((span.start_word, span.start_symbol), (0, prefix.len()));
            prop_assert_eq!((span.end_word, span.end_symbol), (1, tail.len() - 1));
        }

        #[test]
        fn test_absent_anchor_resolves_empty(
            words in prop::collection::vec("[a-z]{1,8}", 1..8),
            phrase in "[A-Z]{1,6}",
            below in any::<bool>(),
        ) {
            let page_words = words
                .iter()
                .enumerate()
                .map(|(i, w)| {
                    let x0 = i as f32 * 100.0;
                    Word::from_text(w, Quad::from_points(x0, 0.0, x0 + 80.0, 20.0), Some(Space))
                })
                .collect();
            let doc = single_line(page_words);
            prop_assert!(AnchorLocator::new(&doc).find(&phrase).is_none());

            let method = if below { SearchMethod::TopPhrase } else { SearchMethod::LeftPhrase };
            let config = ExtractionConfig::default();
            let resolver = ValueResolver::new(&doc, "", &config);
            prop_assert_eq!(resolver.resolve(&CellSection::new(method, phrase)), "");
        }

        #[test]
        fn test_resolution_is_idempotent(
            anchor in prop::sample::select(ANCHORS.to_vec()),
            top in any::<bool>(),
            phrase in any::<bool>(),
            count in 1u32..4,
        ) {
            let doc = invoice();
            let config = ExtractionConfig::default();
            let resolver = ValueResolver::new(&doc, "", &config);
            let method = if top { SearchMethod::TopPhrase } else { SearchMethod::LeftPhrase };
            let string_type = if phrase { StringType::Phrase } else { StringType::Word };
            let sect = CellSection::new(method, anchor)
                .with_string_type(string_type)
                .with_phrase_count(count);
            prop_assert_eq!(resolver.resolve(&sect), resolver.resolve(&sect));
        }

        #[test]
        fn test_phrase_break_uses_current_height(
            gap in 0u8..40,
            h1 in 1u8..40,
            h2 in 1u8..40,
        ) {
            let (gap, h1, h2) = (gap as f32, h1 as f32, h2 as f32);
            let a = Quad::from_points(0.0, 0.0, 10.0, h1);
            let b = Quad::from_points(10.0 + gap, 0.0, 30.0 + gap, h2);
            prop_assert_eq!(is_phrase_break(&a, &b), gap >= h1);

            let b_first = Quad::from_points(0.0, 0.0, 10.0, h2);
            let a_second = Quad::from_points(10.0 + gap, 0.0, 30.0 + gap, h1);
            prop_assert_eq!(is_phrase_break(&b_first, &a_second), gap >= h2);
        }

        #[test]
        fn test_rows_keyed_by_header(
            rows in prop::collection::vec(("[ -~]{0,12}", "[ -~]{0,12}"), 0..6),
        ) {
            let data_rows = rows
                .iter()
                .map(|(a, b)| Row::new(vec![
                    Cell::new(vec![CellSection::new(SearchMethod::CustomValue, a.as_str())]),
                    Cell::new(vec![CellSection::new(SearchMethod::CustomValue, b.as_str())]),
                ]))
                .collect();
            let template = RecurringDocument::new(["Left", "Right"], data_rows);
            let config = ExtractionConfig::default();
            let bp = build_blueprint(&invoice(), &template, "", &config).unwrap();

            prop_assert_eq!(bp.rows.len(), rows.len());
            for (row, (a, b)) in bp.rows.iter().zip(&rows) {
                let keys: Vec<&str> = row.keys().map(String::as_str).collect();
                prop_assert_eq!(keys, vec!["0", "1"]);
                prop_assert_eq!(&row["0"], a.trim_start());
                prop_assert_eq!(&row["1"], b.trim_start());
            }
        }
    }
}
