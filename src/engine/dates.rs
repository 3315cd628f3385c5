//! Date-format detection and canonical `YYYY-MM-DD` normalization.
//!
//! Detection applies only to Text columns whose tokens have date-like lengths. Each
//! column tracks the subset of the fixed candidate formats that have parsed every
//! qualifying token so far; if exactly one survives the scan, it is locked in and
//! used by the materializer to rewrite values into canonical form.

use chrono::NaiveDate;

/// A candidate date-only format: day/month/year order combined with `-` or `/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `2020-1-15` (ISO field order).
    YearMonthDayDash,
    /// `2020/1/15`.
    YearMonthDaySlash,
    /// `15-1-2020` (most common global order).
    DayMonthYearDash,
    /// `15/1/2020`.
    DayMonthYearSlash,
    /// `1-15-2020` (U.S. order).
    MonthDayYearDash,
    /// `1/15/2020`.
    MonthDayYearSlash,
}

/// All candidate formats, in priority order.
pub const DATE_FORMATS: [DateFormat; 6] = [
    DateFormat::YearMonthDayDash,
    DateFormat::YearMonthDaySlash,
    DateFormat::DayMonthYearDash,
    DateFormat::DayMonthYearSlash,
    DateFormat::MonthDayYearDash,
    DateFormat::MonthDayYearSlash,
];

/// Inclusive token-length range in which a value can be one of the candidate formats.
const MIN_DATE_LEN: usize = 8;
const MAX_DATE_LEN: usize = 10;

impl DateFormat {
    /// strftime pattern for exact parsing. chrono accepts unpadded month/day digits,
    /// matching the original strict formats (`YYYY-M-D` etc.).
    fn pattern(self) -> &'static str {
        match self {
            DateFormat::YearMonthDayDash => "%Y-%m-%d",
            DateFormat::YearMonthDaySlash => "%Y/%m/%d",
            DateFormat::DayMonthYearDash => "%d-%m-%Y",
            DateFormat::DayMonthYearSlash => "%d/%m/%Y",
            DateFormat::MonthDayYearDash => "%m-%d-%Y",
            DateFormat::MonthDayYearSlash => "%m/%d/%Y",
        }
    }

    /// Parse `value` with this format exactly (full-string, no leniency).
    ///
    /// chrono's `%Y` would accept 1-3 digit years; the candidate formats require a
    /// literal 4-digit year, so the year segment's width is checked first.
    pub fn parse(self, value: &str) -> Option<NaiveDate> {
        if !self.has_four_digit_year(value) {
            return None;
        }
        NaiveDate::parse_from_str(value, self.pattern()).ok()
    }

    fn separator(self) -> char {
        match self {
            DateFormat::YearMonthDayDash
            | DateFormat::DayMonthYearDash
            | DateFormat::MonthDayYearDash => '-',
            DateFormat::YearMonthDaySlash
            | DateFormat::DayMonthYearSlash
            | DateFormat::MonthDayYearSlash => '/',
        }
    }

    fn has_four_digit_year(self, value: &str) -> bool {
        let mut parts = value.split(self.separator());
        let year = match self {
            DateFormat::YearMonthDayDash | DateFormat::YearMonthDaySlash => parts.next(),
            _ => parts.next_back(),
        };
        year.is_some_and(|y| y.len() == 4 && y.bytes().all(|b| b.is_ascii_digit()))
    }

    /// Rewrite `value` into canonical `YYYY-MM-DD` form, or pass it through unchanged
    /// if it no longer parses (a later malformed cell is a local fallback, not fatal).
    pub fn normalize(self, value: &str) -> String {
        match self.parse(value) {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => value.to_string(),
        }
    }
}

/// Returns `true` if `value` has a length that any candidate format could match.
pub fn has_date_like_length(value: &str) -> bool {
    (MIN_DATE_LEN..=MAX_DATE_LEN).contains(&value.len())
}

/// Running intersection of surviving candidate formats for one column.
///
/// `Untested` means no qualifying token has been seen yet; `Dead` means some
/// qualifying token matched no candidate and detection is abandoned permanently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateCandidates {
    /// No qualifying token observed yet.
    Untested,
    /// Bitmask over [`DATE_FORMATS`] of formats that parsed every qualifying token.
    Surviving(u8),
    /// A qualifying token matched no surviving format; detection abandoned.
    Dead,
}

impl DateCandidates {
    /// Observe one qualifying token (caller has already checked the length gate and
    /// null-sentinel exclusion).
    pub fn observe(&mut self, value: &str) {
        let matches = format_mask(value);
        *self = match *self {
            DateCandidates::Untested => {
                if matches == 0 {
                    DateCandidates::Dead
                } else {
                    DateCandidates::Surviving(matches)
                }
            }
            DateCandidates::Surviving(mask) => {
                let surviving = mask & matches;
                if surviving == 0 {
                    DateCandidates::Dead
                } else {
                    DateCandidates::Surviving(surviving)
                }
            }
            DateCandidates::Dead => DateCandidates::Dead,
        };
    }

    /// The locked format, if exactly one candidate survived.
    pub fn locked(&self) -> Option<DateFormat> {
        match *self {
            DateCandidates::Surviving(mask) if mask.count_ones() == 1 => {
                let idx = mask.trailing_zeros() as usize;
                Some(DATE_FORMATS[idx])
            }
            _ => None,
        }
    }
}

fn format_mask(value: &str) -> u8 {
    let mut mask = 0u8;
    for (i, fmt) in DATE_FORMATS.iter().enumerate() {
        if fmt.parse(value).is_some() {
            mask |= 1 << i;
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_order_is_unambiguous() {
        let mut c = DateCandidates::Untested;
        c.observe("2020-1-15");
        assert_eq!(c.locked(), Some(DateFormat::YearMonthDayDash));
    }

    #[test]
    fn ambiguous_tokens_keep_multiple_candidates() {
        let mut c = DateCandidates::Untested;
        // Day and month both <= 12: D-M-Y and M-D-Y both parse.
        c.observe("3-4-2020");
        assert_eq!(c.locked(), None);

        // A day > 12 disambiguates to day-first.
        c.observe("25-4-2020");
        assert_eq!(c.locked(), Some(DateFormat::DayMonthYearDash));
    }

    #[test]
    fn no_match_kills_detection_permanently() {
        let mut c = DateCandidates::Untested;
        c.observe("2020-1-15");
        c.observe("13-13-13X"); // qualifying length, no candidate parses
        assert_eq!(c, DateCandidates::Dead);

        c.observe("2020-1-16");
        assert_eq!(c, DateCandidates::Dead);
        assert_eq!(c.locked(), None);
    }

    #[test]
    fn normalization_is_canonical_and_fallible_locally() {
        let fmt = DateFormat::YearMonthDayDash;
        assert_eq!(fmt.normalize("2020-1-15"), "2020-01-15");
        assert_eq!(fmt.normalize("2020-2-20"), "2020-02-20");
        // Later malformed cells pass through unchanged.
        assert_eq!(fmt.normalize("not-a-date"), "not-a-date");
    }

    #[test]
    fn length_gate_bounds() {
        assert!(!has_date_like_length("1-1-202")); // 7
        assert!(has_date_like_length("1-1-2020")); // 8
        assert!(has_date_like_length("01-01-2020")); // 10
        assert!(!has_date_like_length("01-01-20201")); // 11
    }

    #[test]
    fn parsing_is_exact_full_string() {
        assert!(DateFormat::YearMonthDayDash.parse("2020-1-15").is_some());
        assert!(DateFormat::YearMonthDayDash.parse("2020-1-15 ").is_none());
        assert!(DateFormat::YearMonthDayDash.parse("2020-13-1").is_none());
    }

    #[test]
    fn years_must_be_exactly_four_digits() {
        // Within the length gate, but short-year tokens are not dates.
        assert!(DateFormat::YearMonthDayDash.parse("999-1-15").is_none());
        assert!(DateFormat::DayMonthYearDash.parse("15-1-999").is_none());
        assert!(DateFormat::MonthDayYearSlash.parse("1/15/999").is_none());
        assert!(DateFormat::YearMonthDayDash.parse("2020-1-15").is_some());
        assert!(DateFormat::DayMonthYearSlash.parse("15/1/2020").is_some());

        let mut c = DateCandidates::Untested;
        c.observe("999-1-15");
        assert_eq!(c, DateCandidates::Dead);
    }
}
