//! Date reparsing and formatting for cell values.
//!
//! Templates write output formats with moment-style tokens (`YYYY/MM/DD`,
//! `MMM D, YYYY`, `[Week of] DD.MM`). Supported tokens:
//!
//! | Token | Output |
//! |---|---|
//! | `YYYY` / `YY` | 4- / 2-digit year |
//! | `MMMM` / `MMM` | month name / abbreviation |
//! | `MM` / `M` | zero-padded / plain month |
//! | `DDDD` / `DDD` | zero-padded / plain day of year |
//! | `DD` / `D` / `Do` | zero-padded / plain / ordinal day of month |
//! | `dddd` / `ddd` / `d` | weekday name / abbreviation / number (Sunday = 0) |
//! | `HH` / `H` | 24-hour clock, zero-padded / plain |
//! | `hh` / `h` | 12-hour clock, zero-padded / plain |
//! | `mm` / `m` / `ss` / `s` | minutes / seconds, zero-padded / plain |
//! | `A` / `a` | `AM`/`PM`, `am`/`pm` |
//! | `[text]` | literal text |
//!
//! Anything else is copied through unchanged.

use std::borrow::Cow;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Format tokens, longest first so alternation picks the longest match
    static ref RE_FORMAT_TOKEN: Regex = Regex::new(
        r"(?s)\[[^\]]*\]|YYYY|YY|MMMM|MMM|MM|M|DDDD|DDD|DD|Do|D|dddd|ddd|d|HH|H|hh|h|mm|m|ss|s|A|a|."
    )
    .unwrap();

    /// ISO year and month without a day
    static ref RE_YEAR_MONTH: Regex = Regex::new(r"^(\d{4})-(\d{2})$").unwrap();
}

/// ISO date-time shapes tried before the configured formats.
const ISO_DATE_TIMES: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Read `value` as a date and time.
///
/// RFC 3339 timestamps (kept in their own offset) and ISO date-times are
/// tried first, then each of `formats` in order, then an ISO year-month
/// (`2023-01`, the first of the month). Date-only inputs are read as
/// midnight. Surrounding whitespace is ignored.
pub fn parse_date(value: &str, formats: &[String]) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    if let Some(dt) = ISO_DATE_TIMES
        .iter()
        .find_map(|iso| NaiveDateTime::parse_from_str(value, iso).ok())
    {
        return Some(dt);
    }
    if let Some(dt) = formats.iter().find_map(|format| parse_with(value, format)) {
        return Some(dt);
    }

    let caps = RE_YEAR_MONTH.captures(value)?;
    let year = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)
}

/// Parse with one chrono format, which may or may not carry a time.
fn parse_with(value: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, format)
        .ok()
        .or_else(|| NaiveDate::parse_from_str(value, format).ok()?.and_hms_opt(0, 0, 0))
}

/// Render `datetime` with a moment-style `format`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use field_oxide::dates::format_date;
///
/// let due = NaiveDate::from_ymd_opt(2023, 1, 6).unwrap().and_hms_opt(14, 5, 0).unwrap();
/// assert_eq!(format_date(due, "YYYY/MM/DD"), "2023/01/06");
/// assert_eq!(format_date(due, "MMM Do, YYYY"), "Jan 6th, 2023");
/// assert_eq!(format_date(due, "[Due] DD.MM h:mm A"), "Due 06.01 2:05 PM");
/// ```
pub fn format_date(datetime: NaiveDateTime, format: &str) -> String {
    let mut out = String::with_capacity(format.len() + 8);
    for token in RE_FORMAT_TOKEN.find_iter(format) {
        out.push_str(&render_token(&datetime, token.as_str()));
    }
    out
}

fn render_token<'f>(dt: &NaiveDateTime, token: &'f str) -> Cow<'f, str> {
    let (pm, hour12) = dt.hour12();
    let rendered = match token {
        "YYYY" => format!("{:04}", dt.year()),
        "YY" => format!("{:02}", dt.year().rem_euclid(100)),
        "MMMM" => dt.format("%B").to_string(),
        "MMM" => dt.format("%b").to_string(),
        "MM" => format!("{:02}", dt.month()),
        "M" => dt.month().to_string(),
        "DDDD" => format!("{:03}", dt.ordinal()),
        "DDD" => dt.ordinal().to_string(),
        "DD" => format!("{:02}", dt.day()),
        "D" => dt.day().to_string(),
        "Do" => format!("{}{}", dt.day(), ordinal_suffix(dt.day())),
        "dddd" => dt.format("%A").to_string(),
        "ddd" => dt.format("%a").to_string(),
        "d" => dt.weekday().num_days_from_sunday().to_string(),
        "HH" => format!("{:02}", dt.hour()),
        "H" => dt.hour().to_string(),
        "hh" => format!("{:02}", hour12),
        "h" => hour12.to_string(),
        "mm" => format!("{:02}", dt.minute()),
        "m" => dt.minute().to_string(),
        "ss" => format!("{:02}", dt.second()),
        "s" => dt.second().to_string(),
        "A" => return Cow::Borrowed(if pm { "PM" } else { "AM" }),
        "a" => return Cow::Borrowed(if pm { "pm" } else { "am" }),
        _ if token.len() >= 2 && token.starts_with('[') => {
            return Cow::Borrowed(&token[1..token.len() - 1])
        },
        _ => return Cow::Borrowed(token),
    };
    Cow::Owned(rendered)
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Reparse `value` as a date, shift it by `days_added` and format it.
///
/// The time of day survives the shift. Returns `None` if the value is not a
/// date or the shift leaves chrono's supported range.
pub fn shift_and_format(
    value: &str,
    days_added: i64,
    format: &str,
    input_formats: &[String],
) -> Option<String> {
    let parsed = parse_date(value, input_formats)?;
    let shifted = parsed.checked_add_signed(Duration::try_days(days_added)?)?;
    Some(format_date(shifted, format))
}
