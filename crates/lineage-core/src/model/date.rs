//! Lenient genealogical date parsing.
//!
//! Dates in the read model are stored exactly as the source recorded them
//! (`"ABT 1850"`, `"12 MAR 1850"`, `"BET 1850 AND 1860"`, `"1850-03-12"`,
//! or free text). They are parsed on demand into a [`GenealogicalDate`],
//! which keeps the raw text and extracts whatever structure is present.
//! Parsing never fails: text that cannot be understood simply has no year.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;

/// Qualifier keyword leading a genealogical date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DateQualifier {
    About,
    Calculated,
    Estimated,
    Before,
    After,
    Between,
    Range,
    Interpreted,
}

impl DateQualifier {
    /// Recognise a (case-insensitive) qualifier keyword.
    #[must_use]
    pub fn from_keyword(token: &str) -> Option<Self> {
        match token.to_ascii_uppercase().as_str() {
            "ABT" | "ABOUT" | "CIRCA" | "C." | "CA" | "CA." => Some(Self::About),
            "CAL" => Some(Self::Calculated),
            "EST" => Some(Self::Estimated),
            "BEF" | "BEFORE" => Some(Self::Before),
            "AFT" | "AFTER" => Some(Self::After),
            "BET" | "BETWEEN" => Some(Self::Between),
            "FROM" | "TO" => Some(Self::Range),
            "INT" => Some(Self::Interpreted),
            _ => None,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::About => "about",
            Self::Calculated => "calculated",
            Self::Estimated => "estimated",
            Self::Before => "before",
            Self::After => "after",
            Self::Between => "between",
            Self::Range => "range",
            Self::Interpreted => "interpreted",
        }
    }
}

impl fmt::Display for DateQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed genealogical date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenealogicalDate {
    /// The trimmed source text.
    pub raw: String,
    /// Leading qualifier keyword, if any.
    pub qualifier: Option<DateQualifier>,
    /// First year mentioned in the text.
    pub year: Option<i32>,
    /// Full calendar date, only when day, month and year are all known.
    pub date: Option<NaiveDate>,
}

impl GenealogicalDate {
    /// Parse a stored date string.
    ///
    /// Returns `None` for blank input; every non-blank input yields a value.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        let (first, tail) = tokens.split_first()?;

        let qualifier = DateQualifier::from_keyword(first);
        let rest = if qualifier.is_some() { tail } else { &tokens[..] };

        // For ranges, the primary date is the part before AND/TO.
        let primary: Vec<&str> = rest
            .iter()
            .copied()
            .take_while(|t| !t.eq_ignore_ascii_case("AND") && !t.eq_ignore_ascii_case("TO"))
            .collect();

        let date = parse_calendar_date(&primary);
        let year = date
            .map(|d| d.year())
            .or_else(|| rest.iter().find_map(|t| leading_year(t)));

        Some(Self {
            raw: trimmed.to_string(),
            qualifier,
            year,
            date,
        })
    }

    /// Parse an optional stored value, treating `None` like blank text.
    #[must_use]
    pub fn parse_opt(raw: Option<&str>) -> Option<Self> {
        raw.and_then(Self::parse)
    }

    /// True when the text names one exact calendar day with no qualifier.
    #[must_use]
    pub const fn is_exact(&self) -> bool {
        self.date.is_some() && self.qualifier.is_none()
    }
}

impl fmt::Display for GenealogicalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn parse_calendar_date(tokens: &[&str]) -> Option<NaiveDate> {
    match tokens {
        [iso] if iso.contains('-') => NaiveDate::parse_from_str(iso, "%Y-%m-%d").ok(),
        [day, month, year] => {
            let day: u32 = day.parse().ok()?;
            let month = month_number(month)?;
            let year: i32 = year.parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)
        }
        _ => None,
    }
}

fn month_number(token: &str) -> Option<u32> {
    let prefix: String = token
        .chars()
        .take(3)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    let month = match prefix.as_str() {
        "JAN" => 1,
        "FEB" => 2,
        "MAR" => 3,
        "APR" => 4,
        "MAY" => 5,
        "JUN" => 6,
        "JUL" => 7,
        "AUG" => 8,
        "SEP" => 9,
        "OCT" => 10,
        "NOV" => 11,
        "DEC" => 12,
        _ => return None,
    };
    Some(month)
}

/// A token is a year when it starts with 3-4 digits followed by nothing,
/// an ISO separator, or a dual-dating slash (`1750/51`).
fn leading_year(token: &str) -> Option<i32> {
    let digits = token.chars().take_while(char::is_ascii_digit).count();
    if !(3..=4).contains(&digits) {
        return None;
    }
    let (year, rest) = token.split_at(digits);
    if rest.is_empty() || rest.starts_with('-') || rest.starts_with('/') {
        year.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> GenealogicalDate {
        GenealogicalDate::parse(raw).expect("non-blank input parses")
    }

    #[test]
    fn blank_input_is_no_date() {
        assert!(GenealogicalDate::parse("").is_none());
        assert!(GenealogicalDate::parse("   ").is_none());
        assert!(GenealogicalDate::parse_opt(None).is_none());
    }

    #[test]
    fn bare_year() {
        let d = parse("1850");
        assert_eq!(d.year, Some(1850));
        assert_eq!(d.qualifier, None);
        assert_eq!(d.date, None);
        assert!(!d.is_exact());
    }

    #[test]
    fn full_gedcom_date() {
        let d = parse("12 MAR 1850");
        assert_eq!(d.year, Some(1850));
        assert_eq!(d.date, NaiveDate::from_ymd_opt(1850, 3, 12));
        assert!(d.is_exact());
    }

    #[test]
    fn long_month_names_and_lowercase() {
        let d = parse("3 september 1901");
        assert_eq!(d.date, NaiveDate::from_ymd_opt(1901, 9, 3));
    }

    #[test]
    fn iso_date() {
        let d = parse("1850-03-12");
        assert_eq!(d.year, Some(1850));
        assert_eq!(d.date, NaiveDate::from_ymd_opt(1850, 3, 12));
    }

    #[test]
    fn qualified_year() {
        let d = parse("ABT 1850");
        assert_eq!(d.qualifier, Some(DateQualifier::About));
        assert_eq!(d.year, Some(1850));
        assert!(!d.is_exact());

        let d = parse("bef 3 JAN 1900");
        assert_eq!(d.qualifier, Some(DateQualifier::Before));
        assert_eq!(d.date, NaiveDate::from_ymd_opt(1900, 1, 3));
    }

    #[test]
    fn between_takes_first_year() {
        let d = parse("BET 1850 AND 1860");
        assert_eq!(d.qualifier, Some(DateQualifier::Between));
        assert_eq!(d.year, Some(1850));
        assert_eq!(d.date, None);
    }

    #[test]
    fn range_with_full_start_date() {
        let d = parse("FROM 1 JAN 1900 TO 1905");
        assert_eq!(d.qualifier, Some(DateQualifier::Range));
        assert_eq!(d.date, NaiveDate::from_ymd_opt(1900, 1, 1));
        assert_eq!(d.year, Some(1900));
    }

    #[test]
    fn dual_dated_year() {
        assert_eq!(parse("1750/51").year, Some(1750));
    }

    #[test]
    fn free_text_keeps_raw_without_year() {
        let d = parse("  unknown, family bible  ");
        assert_eq!(d.raw, "unknown, family bible");
        assert_eq!(d.year, None);
        assert_eq!(d.to_string(), "unknown, family bible");
    }

    #[test]
    fn impossible_calendar_day_still_yields_year() {
        let d = parse("31 FEB 1850");
        assert_eq!(d.date, None);
        assert_eq!(d.year, Some(1850));
    }
}
