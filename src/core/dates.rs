//! Date-range recognition for education and work history lines.

use std::ops::Range;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use super::models::DateRange;

const MONTH: &str = r"(?:jan(?:uary|uari)?|feb(?:ruary|ruari)?|mar(?:ch|et)?|apr(?:il)?|ma[yi]|jun[ei]?|jul[iy]?|aug(?:ust)?|agu(?:stus)?|agt|sep(?:tember|t)?|o[ck]t(?:ober)?|nov(?:ember)?|de[cs](?:ember)?)\.?";
const YEAR: &str = r"(?:19|20)\d{2}";
const OPEN_END: &str = r"(?:present|now|current|currently|today|sekarang|saat\s+ini)";
const SEPARATOR: &str = r"\s*(?:-|–|—|\bto\b|\buntil\b|s/d|s\.d\.?|\bsampai\b|\bhingga\b)\s*";

static POINT: Lazy<String> = Lazy::new(|| {
    format!(r"(?:{MONTH}\s*,?\s*{YEAR}|(?:0?[1-9]|1[0-2])[/.]{YEAR}|{YEAR})")
});

static DATE_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    let point = POINT.as_str();
    Regex::new(&format!(r"(?i)\b({point}){SEPARATOR}({point}|{OPEN_END})\b")).unwrap()
});

static MONTH_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)\b{MONTH}\s*,?\s*{YEAR}\b")).unwrap());

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(&format!(r"\b{YEAR}\b")).unwrap());

static MONTH_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(&format!(r"(?i)^{MONTH}")).unwrap());

static NUMERIC_MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^(0?[1-9]|1[0-2])[/.]({YEAR})$")).unwrap());

static OPEN_END_RE: Lazy<Regex> = Lazy::new(|| Regex::new(&format!(r"(?i)^{OPEN_END}$")).unwrap());

/// First date range in `text`, in document order.
pub fn find_date_range(text: &str) -> Option<DateRange> {
    find_date_ranges(text).into_iter().next().map(|(_, range)| range)
}

/// Every date range in `text` with its byte span.
pub fn find_date_ranges(text: &str) -> Vec<(Range<usize>, DateRange)> {
    DATE_RANGE_RE
        .captures_iter(text)
        .filter_map(|captures| {
            let whole = captures.get(0)?;
            let start = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
            let end = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
            let is_current = OPEN_END_RE.is_match(end.trim());
            Some((
                whole.range(),
                DateRange {
                    raw: whole.as_str().trim().to_string(),
                    start: parse_point(start),
                    end: if is_current { None } else { parse_point(end) },
                    is_current,
                },
            ))
        })
        .collect()
}

/// A range, else a lone `Month YYYY`, else a lone year.
pub fn find_any_date(text: &str) -> Option<DateRange> {
    if let Some(range) = find_date_range(text) {
        return Some(range);
    }

    MONTH_YEAR_RE
        .find(text)
        .or_else(|| YEAR_RE.find(text))
        .map(|m| {
            let point = parse_point(m.as_str());
            DateRange {
                raw: m.as_str().trim().to_string(),
                start: point,
                end: point,
                is_current: false,
            }
        })
}

/// Byte span of the first date signal strong enough to anchor a work-history
/// window: a range or a `Month YYYY` mention.
pub fn find_date_signal(text: &str) -> Option<Range<usize>> {
    let range = DATE_RANGE_RE.find(text).map(|m| m.range());
    let month_year = MONTH_YEAR_RE.find(text).map(|m| m.range());
    match (range, month_year) {
        (Some(a), Some(b)) => Some(if a.start <= b.start { a } else { b }),
        (a, b) => a.or(b),
    }
}

pub fn contains_date_range(text: &str) -> bool {
    DATE_RANGE_RE.is_match(text)
}

pub fn contains_year(text: &str) -> bool {
    YEAR_RE.is_match(text)
}

/// Whether a line begins with a year, a `Month YYYY` or a numeric `MM/YYYY`.
pub fn starts_with_date(line: &str) -> bool {
    let trimmed = line.trim_start();
    [&*DATE_RANGE_RE, &*MONTH_YEAR_RE, &*YEAR_RE]
        .iter()
        .any(|re| re.find(trimmed).is_some_and(|m| m.start() == 0))
        || NUMERIC_MONTH_RE.is_match(trimmed.split_whitespace().next().unwrap_or_default())
}

/// Removes date ranges (and then lone years) from a line and trims the
/// separators left behind.
pub fn strip_dates(line: &str) -> String {
    let without_ranges = DATE_RANGE_RE.replace_all(line, " ");
    let without_month_years = MONTH_YEAR_RE.replace_all(&without_ranges, " ");
    let without_years = YEAR_RE.replace_all(&without_month_years, " ");
    trim_separators(&collapse_spaces(&without_years))
}

/// Whether nothing but dates and separators remain on the line.
pub fn is_date_only_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && (contains_date_range(trimmed) || contains_year(trimmed))
        && strip_dates(trimmed).is_empty()
}

pub fn collapse_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn trim_separators(text: &str) -> String {
    text.trim_matches(|c: char| {
        c.is_whitespace() || matches!(c, '-' | '–' | '—' | '|' | ',' | ':' | '(' | ')' | '/')
    })
    .to_string()
}

/// Parses one side of a range. Year-only points map to January.
pub fn parse_point(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let year: i32 = YEAR_RE.find(text)?.as_str().parse().ok()?;

    if let Some(captures) = NUMERIC_MONTH_RE.captures(text) {
        let month: u32 = captures.get(1)?.as_str().parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, 1);
    }

    let month = MONTH_NAME_RE
        .find(text)
        .and_then(|m| month_number(m.as_str()))
        .unwrap_or(1);
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn month_number(name: &str) -> Option<u32> {
    let lowered = name.trim_end_matches('.').to_lowercase();
    let month = match lowered.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" | "mei" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" | "agu" | "agt" => 8,
        "sep" => 9,
        "oct" | "okt" => 10,
        "nov" => 11,
        "dec" | "des" => 12,
        _ => return None,
    };
    Some(month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, month, 1)
    }

    #[test]
    fn parses_month_name_ranges_in_both_languages() {
        let range = find_date_range("PT Maju - Jakarta   Jan 2019 - Mar 2021").unwrap();
        assert_eq!(range.raw, "Jan 2019 - Mar 2021");
        assert_eq!(range.start, ymd(2019, 1));
        assert_eq!(range.end, ymd(2021, 3));
        assert!(!range.is_current);

        let range = find_date_range("Agustus 2020 s/d Sekarang").unwrap();
        assert_eq!(range.start, ymd(2020, 8));
        assert_eq!(range.end, None);
        assert!(range.is_current);
    }

    #[test]
    fn parses_year_and_numeric_ranges() {
        let range = find_date_range("2015–2019").unwrap();
        assert_eq!(range.start, ymd(2015, 1));
        assert_eq!(range.end, ymd(2019, 1));

        let range = find_date_range("03/2018 to 11/2020").unwrap();
        assert_eq!(range.start, ymd(2018, 3));
        assert_eq!(range.end, ymd(2020, 11));

        let range = find_date_range("September 2017 - Present").unwrap();
        assert_eq!(range.start, ymd(2017, 9));
        assert!(range.is_current);
    }

    #[test]
    fn first_range_wins_when_several_are_present() {
        let ranges = find_date_ranges("2010 - 2012 and later 2014 - 2016");
        assert_eq!(ranges.len(), 2);
        assert_eq!(find_date_range("2010 - 2012 and later 2014 - 2016").unwrap().raw, "2010 - 2012");
    }

    #[test]
    fn lone_dates_fall_back_to_points() {
        let date = find_any_date("Graduated June 2018").unwrap();
        assert_eq!(date.start, ymd(2018, 6));
        assert_eq!(date.end, ymd(2018, 6));
        assert!(find_any_date("no dates here").is_none());
    }

    #[test]
    fn date_line_helpers() {
        assert!(starts_with_date("2019 - 2021 Universitas Indonesia"));
        assert!(starts_with_date("Jan 2020 Bachelor"));
        assert!(!starts_with_date("Universitas Indonesia 2019"));
        assert!(is_date_only_line("  Jan 2019 - Present "));
        assert!(!is_date_only_line("Software Engineer  Jan 2019 - Present"));
        assert_eq!(strip_dates("Software Engineer | Jan 2019 - Present"), "Software Engineer");
    }

    #[test]
    fn date_signal_prefers_earliest_match() {
        let text = "Worked at Acme since March 2018, then 2019 - 2020 elsewhere";
        let span = find_date_signal(text).unwrap();
        assert_eq!(&text[span], "March 2018");
        assert!(find_date_signal("nothing").is_none());
    }
}
