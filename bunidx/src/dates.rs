//! Date extraction from filenames.
//!
//! Filenames in document sets routinely embed a date (`2023-04-05 -
//! Witness Statement.pdf`, `05.04.2023_Attendance_Note.pdf`). This module
//! extracts that date and strips it from the display title, via ordered
//! heuristics:
//!
//! 1. Year-first numeric pattern (`YYYY[-._]MM[-._]DD`, optional brackets)
//! 2. Year-last numeric pattern (`DD[-._]MM[-._]YYYY`, optional brackets)
//! 3. A pluggable natural-language resolver (`12 March 2023`)
//!
//! The numeric patterns are unambiguous and are trusted to rewrite the
//! title; the natural-language fallback is a lower-confidence safety net
//! whose match span is not tracked, so the title is left alone in that
//! branch.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};

static YEAR_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\[(]?(1\d{3}|20\d{2})[-._]?(0[1-9]|1[0-2])[-._]?(0[1-9]|[12]\d|3[01])[\])]?")
        .unwrap()
});

static YEAR_LAST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\[(]?(0[1-9]|[12]\d|3[01])[-._]?(0[1-9]|1[0-2])[-._]?(1\d{3}|20\d{2})[\])]?")
        .unwrap()
});

/// A swappable natural-language date resolver.
///
/// Injected into [`extract_date`] so the numeric heuristics and the
/// fallback can be tested independently.
pub trait DateResolver {
    /// Attempt to resolve a calendar date from free text.
    fn resolve(&self, text: &str) -> Option<NaiveDate>;
}

/// Result of running the extraction heuristics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDate {
    /// The extracted date, if any heuristic matched.
    pub date: Option<NaiveDate>,

    /// The title with any matched numeric date substring removed.
    pub title: String,
}

/// Extract a date from a filename and strip it from the title.
///
/// The numeric patterns are matched against `current_title` first so the
/// matched substring can be removed from it; when the title no longer
/// contains the pattern (e.g. it was already edited), the filename is
/// consulted for the date value alone. Leftover leading/trailing
/// separators (space, hyphen, underscore) are trimmed after removal.
///
/// A numeric match that does not form a real calendar date (e.g. Feb 30)
/// is ignored and the next heuristic is tried.
///
/// # Examples
///
/// ```
/// use bunidx::dates::{extract_date, NaturalDateResolver};
/// use chrono::NaiveDate;
///
/// let out = extract_date(
///     "2023-04-05 - Witness Statement.pdf",
///     "2023-04-05 - Witness Statement",
///     &NaturalDateResolver,
/// );
/// assert_eq!(out.date, NaiveDate::from_ymd_opt(2023, 4, 5));
/// assert_eq!(out.title, "Witness Statement");
/// ```
pub fn extract_date(
    filename: &str,
    current_title: &str,
    resolver: &dyn DateResolver,
) -> ExtractedDate {
    for (pattern, order) in [(&*YEAR_FIRST, FieldOrder::YearFirst), (&*YEAR_LAST, FieldOrder::YearLast)] {
        if let Some(caps) = pattern.captures(current_title) {
            if let (Some(date), Some(whole)) = (capture_to_date(&caps, order), caps.get(0)) {
                let mut title = String::with_capacity(current_title.len());
                title.push_str(&current_title[..whole.start()]);
                title.push_str(&current_title[whole.end()..]);
                let title = title.trim_matches([' ', '-', '_']).to_string();
                return ExtractedDate {
                    date: Some(date),
                    title,
                };
            }
        }

        // Title may have been edited past recognition; the filename can
        // still yield the date, but there is nothing to strip.
        if let Some(caps) = pattern.captures(filename) {
            if let Some(date) = capture_to_date(&caps, order) {
                return ExtractedDate {
                    date: Some(date),
                    title: current_title.to_string(),
                };
            }
        }
    }

    if let Some(date) = resolver.resolve(crate::naming::strip_pdf_extension(filename)) {
        return ExtractedDate {
            date: Some(date),
            title: current_title.to_string(),
        };
    }

    ExtractedDate {
        date: None,
        title: current_title.to_string(),
    }
}

#[derive(Clone, Copy)]
enum FieldOrder {
    YearFirst,
    YearLast,
}

fn capture_to_date(caps: &Captures<'_>, order: FieldOrder) -> Option<NaiveDate> {
    let field = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
    let (year, month, day) = match order {
        FieldOrder::YearFirst => (field(1)?, field(2)?, field(3)?),
        FieldOrder::YearLast => (field(3)?, field(2)?, field(1)?),
    };
    NaiveDate::from_ymd_opt(year as i32, month, day)
}

/// Strict natural-language date resolver.
///
/// Recognizes month-name dates (`12 March 2023`, `March 12, 2023`,
/// `2023 March 12`, abbreviated month names, ordinal day suffixes) inside
/// arbitrary text. Returns the first parseable three-token window.
pub struct NaturalDateResolver;

const WINDOW_FORMATS: &[&str] = &["%d %B %Y", "%B %d %Y", "%Y %B %d", "%d %b %Y", "%b %d %Y"];

impl DateResolver for NaturalDateResolver {
    fn resolve(&self, text: &str) -> Option<NaiveDate> {
        let tokens: Vec<String> = text
            .split(|c: char| c.is_whitespace() || matches!(c, '_' | '-' | '.' | ',' | '(' | ')' | '[' | ']'))
            .filter(|t| !t.is_empty())
            .map(strip_ordinal_suffix)
            .collect();

        for window in tokens.windows(3) {
            let candidate = window.join(" ");
            for format in WINDOW_FORMATS {
                if let Ok(date) = NaiveDate::parse_from_str(&candidate, format) {
                    return Some(date);
                }
            }
        }

        None
    }
}

/// Turn `12th` into `12` (also `1st`, `2nd`, `3rd`); other tokens pass
/// through unchanged.
fn strip_ordinal_suffix(token: &str) -> String {
    let lower = token.to_ascii_lowercase();
    for suffix in ["st", "nd", "rd", "th"] {
        if let Some(prefix) = lower.strip_suffix(suffix) {
            if !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_digit()) {
                return prefix.to_string();
            }
        }
    }
    token.to_string()
}

/// A resolver that never matches. Useful for exercising the numeric
/// heuristics in isolation.
pub struct NoopResolver;

impl DateResolver for NoopResolver {
    fn resolve(&self, _text: &str) -> Option<NaiveDate> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case("2023-04-05 - Witness Statement.pdf", "2023-04-05 - Witness Statement", Some((2023, 4, 5)), "Witness Statement")]
    #[case("05.04.2023_Witness_Statement.pdf", "05.04.2023 Witness Statement", Some((2023, 4, 5)), "Witness Statement")]
    #[case("(2023-04-05) Attendance Note.pdf", "(2023-04-05) Attendance Note", Some((2023, 4, 5)), "Attendance Note")]
    #[case("20230405 Report.pdf", "20230405 Report", Some((2023, 4, 5)), "Report")]
    #[case("Exhibit A.pdf", "Exhibit A", None, "Exhibit A")]
    fn test_numeric_extraction(
        #[case] filename: &str,
        #[case] title: &str,
        #[case] expected_date: Option<(i32, u32, u32)>,
        #[case] expected_title: &str,
    ) {
        let out = extract_date(filename, title, &NoopResolver);
        assert_eq!(out.date, expected_date.map(|(y, m, d)| ymd(y, m, d)));
        assert_eq!(out.title, expected_title);
    }

    #[test]
    fn test_year_first_takes_priority_over_year_last() {
        // "2011-12-10" reads as 2011-12-10 year-first, not 10/12/2011.
        let out = extract_date("2011-12-10 Note.pdf", "2011-12-10 Note", &NoopResolver);
        assert_eq!(out.date, Some(ymd(2011, 12, 10)));
    }

    #[test]
    fn test_date_from_filename_when_title_was_edited() {
        let out = extract_date("2023-04-05 - Witness Statement.pdf", "My Custom Title", &NoopResolver);
        assert_eq!(out.date, Some(ymd(2023, 4, 5)));
        // Nothing to strip from an edited title.
        assert_eq!(out.title, "My Custom Title");
    }

    #[test]
    fn test_invalid_calendar_date_is_not_extracted() {
        // February 30th matches the pattern shape but is not a real date.
        let out = extract_date("2023-02-30 Note.pdf", "2023-02-30 Note", &NoopResolver);
        assert_eq!(out.date, None);
        assert_eq!(out.title, "2023-02-30 Note");
    }

    #[test]
    fn test_fallback_resolver_does_not_rewrite_title() {
        let out = extract_date(
            "Statement dated 12 March 2023.pdf",
            "Statement dated 12 March 2023",
            &NaturalDateResolver,
        );
        assert_eq!(out.date, Some(ymd(2023, 3, 12)));
        assert_eq!(out.title, "Statement dated 12 March 2023");
    }

    #[rstest]
    #[case("Letter of 12 March 2023", Some((2023, 3, 12)))]
    #[case("March 12, 2023 letter", Some((2023, 3, 12)))]
    #[case("filed 3rd Jan 2020", Some((2020, 1, 3)))]
    #[case("2023 March 12", Some((2023, 3, 12)))]
    #[case("no date here", None)]
    fn test_natural_resolver(#[case] text: &str, #[case] expected: Option<(i32, u32, u32)>) {
        let resolved = NaturalDateResolver.resolve(text);
        assert_eq!(resolved, expected.map(|(y, m, d)| ymd(y, m, d)));
    }

    #[test]
    fn test_strip_ordinal_suffix() {
        assert_eq!(strip_ordinal_suffix("12th"), "12");
        assert_eq!(strip_ordinal_suffix("1st"), "1");
        assert_eq!(strip_ordinal_suffix("2nd"), "2");
        assert_eq!(strip_ordinal_suffix("3rd"), "3");
        assert_eq!(strip_ordinal_suffix("March"), "March");
        assert_eq!(strip_ordinal_suffix("th"), "th");
    }
}
