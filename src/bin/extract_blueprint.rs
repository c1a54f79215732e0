//! Extract a Blueprint from OCR Output
//!
//! Loads a document's full-text and word-list JSON plus a template, resolves
//! every cell and prints the blueprint as JSON.
//!
//! Usage:
//!   cargo run --release --bin extract_blueprint -- \
//!       --doc-text scan.doctext.json --word-list scan.words.json --template invoice.json
//!   cargo run --release --bin extract_blueprint -- ... --today 2024/06/01 --date-format DD.MM.YYYY

use field_oxide::dates::format_date;
use field_oxide::{build_blueprint, ExtractionConfig, OcrDocument, RecurringDocument};
use std::path::PathBuf;
use std::process;

struct CliConfig {
    doc_text: Option<PathBuf>,
    word_list: Option<PathBuf>,
    template: Option<PathBuf>,
    today: Option<String>,
    date_format: Option<String>,
    case_insensitive: bool,
}

impl CliConfig {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut config = Self {
            doc_text: None,
            word_list: None,
            template: None,
            today: None,
            date_format: None,
            case_insensitive: false,
        };

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--doc-text" => {
                    i += 1;
                    if i < args.len() {
                        config.doc_text = Some(PathBuf::from(&args[i]));
                    }
                },
                "--word-list" => {
                    i += 1;
                    if i < args.len() {
                        config.word_list = Some(PathBuf::from(&args[i]));
                    }
                },
                "--template" => {
                    i += 1;
                    if i < args.len() {
                        config.template = Some(PathBuf::from(&args[i]));
                    }
                },
                "--today" => {
                    i += 1;
                    if i < args.len() {
                        config.today = Some(args[i].clone());
                    }
                },
                "--date-format" => {
                    i += 1;
                    if i < args.len() {
                        config.date_format = Some(args[i].clone());
                    }
                },
                "--ignore-case" | "-i" => {
                    config.case_insensitive = true;
                },
                other => {
                    eprintln!("Warning: ignoring unknown argument {}", other);
                },
            }
            i += 1;
        }

        config
    }
}

fn print_usage() {
    eprintln!(
        "Usage: extract_blueprint --doc-text FILE --word-list FILE --template FILE \
         [--today DATE] [--date-format FORMAT] [--ignore-case]"
    );
}

fn run(cli: CliConfig) -> Result<String, Box<dyn std::error::Error>> {
    let (Some(doc_text), Some(word_list), Some(template)) =
        (cli.doc_text, cli.word_list, cli.template)
    else {
        print_usage();
        process::exit(2);
    };

    let mut config =
        ExtractionConfig::default().with_case_insensitive_patterns(cli.case_insensitive);
    if let Some(format) = cli.date_format {
        config = config.with_default_date_format(format);
    }
    let today = cli.today.unwrap_or_else(|| {
        let now = chrono::Local::now().naive_local();
        format_date(now, &config.default_date_format)
    });

    let doc = OcrDocument::from_json_files(&doc_text, &word_list)?;
    let template = RecurringDocument::from_json_file(&template)?;
    log::info!("Extracting {} with template {:?}", doc.file_name(), template.name);

    let blueprint = build_blueprint(&doc, &template, &today, &config)?;
    Ok(serde_json::to_string_pretty(&blueprint)?)
}

fn main() {
    env_logger::init();

    match run(CliConfig::from_args()) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        },
    }
}
