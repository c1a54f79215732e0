//! Configuration for field extraction.

/// Date format applied when a cell section asks for date handling without
/// naming a format.
pub const DEFAULT_DATE_FORMAT: &str = "YYYY/MM/DD";

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionConfig {
    /// Output date format in moment-style tokens (`YYYY`, `MM`, `DD`, ...).
    pub default_date_format: String,

    /// chrono format strings tried in order when reading a value as a date.
    pub input_date_formats: Vec<String>,

    /// Multiple of the current word's height a gap must reach to count as a
    /// structural break.
    pub phrase_break_ratio: f32,

    /// Compile pattern sections case-insensitively.
    pub case_insensitive_patterns: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            default_date_format: DEFAULT_DATE_FORMAT.to_string(),
            input_date_formats: [
                "%Y-%m-%d",
                "%Y/%m/%d",
                "%Y%m%d",
                "%m/%d/%Y",
                "%B %d, %Y",
                "%b %d, %Y",
                "%d %B %Y",
                "%d %b %Y",
                "%b %d %Y",
                "%B %d %Y",
            ]
            .iter()
            .map(|f| f.to_string())
            .collect(),
            phrase_break_ratio: 1.0,
            case_insensitive_patterns: false,
        }
    }

    /// Set the default output date format.
    pub fn with_default_date_format(mut self, format: impl Into<String>) -> Self {
        self.default_date_format = format.into();
        self
    }

    /// Replace the list of accepted input date formats.
    pub fn with_input_date_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input_date_formats = formats.into_iter().map(Into::into).collect();
        self
    }

    /// Set the structural break ratio.
    pub fn with_phrase_break_ratio(mut self, ratio: f32) -> Self {
        self.phrase_break_ratio = ratio;
        self
    }

    /// Match pattern sections case-insensitively.
    pub fn with_case_insensitive_patterns(mut self, enable: bool) -> Self {
        self.case_insensitive_patterns = enable;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExtractionConfig::default();
        assert_eq!(config.default_date_format, "YYYY/MM/DD");
        assert_eq!(config.input_date_formats[0], "%Y-%m-%d");
        assert!(config.input_date_formats.iter().any(|f| f == "%b %d %Y"));
        assert_eq!(config.phrase_break_ratio, 1.0);
        assert!(!config.case_insensitive_patterns);
    }

    #[test]
    fn test_builder() {
        let config = ExtractionConfig::new()
            .with_default_date_format("DD.MM.YYYY")
            .with_input_date_formats(["%d.%m.%Y"])
            .with_phrase_break_ratio(1.5)
            .with_case_insensitive_patterns(true);

        assert_eq!(config.default_date_format, "DD.MM.YYYY");
        assert_eq!(config.input_date_formats, vec!["%d.%m.%Y".to_string()]);
        assert_eq!(config.phrase_break_ratio, 1.5);
        assert!(config.case_insensitive_patterns);
    }
}
