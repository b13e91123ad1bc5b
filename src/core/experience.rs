//! Work history (and organization membership) extraction.

use once_cell::sync::Lazy;
use regex::Regex;

use super::dates::{
    contains_date_range, find_any_date, find_date_range, is_date_only_line, starts_with_date,
    strip_dates, trim_separators,
};
use super::models::{DateRange, ExperienceEntry, Extraction};
use super::vocabulary::{bullet_item, line_contains_phrase, COMPANY_SUFFIXES, JOB_TITLE_TERMS};

static HEADER_SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+[-–—|]\s+").unwrap());
static CAPITALIZED_PHRASE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\p{Lu}[\p{L}\p{N}&.'-]*(?:\s+\p{Lu}[\p{L}\p{N}&.'-]*){1,3}").unwrap()
});
static TITLE_AT_COMPANY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)\s+(?:at|@|di)\s+(.+)$").unwrap());

const HEADER_MAX_WORDS: usize = 6;

/// Entries in document order. Blocks start at `Company - Location` header
/// lines; without any, at date ranges. Returns the body itself when neither
/// yields an entry.
pub fn extract_experience(body: &str) -> Extraction<Vec<ExperienceEntry>> {
    let lines: Vec<&str> = body
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut entries = entries_from_headers(&lines);
    if entries.is_empty() {
        entries = entries_from_date_ranges(&lines);
    }

    if entries.is_empty() {
        Extraction::Unparsed(body.trim().to_string())
    } else {
        Extraction::Structured(entries)
    }
}

struct Header {
    company: Option<String>,
    location: Option<String>,
    job_title: Option<String>,
}

fn parse_header(line: &str) -> Option<Header> {
    if bullet_item(line).is_some() || starts_with_date(line) {
        return None;
    }
    let stripped = trim_separators(&strip_dates(line));
    if !HEADER_SEPARATOR_RE.is_match(&stripped) {
        return None;
    }

    let parts: Vec<String> = HEADER_SEPARATOR_RE
        .split(&stripped)
        .map(trim_separators)
        .filter(|part| !part.is_empty())
        .collect();
    let first = parts.first()?;
    let starts_upper = first.chars().next().is_some_and(|c| c.is_uppercase() || c.is_ascii_digit());
    if parts.len() < 2 || !starts_upper || first.split_whitespace().count() > HEADER_MAX_WORDS {
        return None;
    }

    if has_title_term(first) && !has_company_suffix(first) {
        return Some(Header {
            job_title: Some(first.clone()),
            company: parts.get(1).cloned(),
            location: parts.get(2).cloned(),
        });
    }
    Some(Header {
        company: Some(first.clone()),
        location: parts.get(1).cloned(),
        job_title: None,
    })
}

fn entries_from_headers(lines: &[&str]) -> Vec<ExperienceEntry> {
    let header_indices: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| parse_header(line).is_some())
        .map(|(index, _)| index)
        .collect();
    let Some(&first_header) = header_indices.first() else {
        return Vec::new();
    };

    let mut entries: Vec<ExperienceEntry> = header_indices
        .iter()
        .enumerate()
        .filter_map(|(n, &start)| {
            let end = header_indices.get(n + 1).copied().unwrap_or(lines.len());
            let header = parse_header(lines[start])?;
            Some(parse_header_block(header, &lines[start..end]))
        })
        .collect();

    if first_header > 0 {
        if let Some(first) = entries.first_mut() {
            first.raw = format!("{}\n{}", lines[..first_header].join("\n"), first.raw);
        }
    }
    entries
}

fn parse_header_block(header: Header, block: &[&str]) -> ExperienceEntry {
    let mut entry = ExperienceEntry {
        company: header.company,
        location: header.location,
        job_title: header.job_title,
        raw: block.join("\n"),
        ..ExperienceEntry::default()
    };

    let next = block.get(1).copied().filter(|line| bullet_item(line).is_none());
    entry.dates = find_date_range(block[0])
        .or_else(|| next.and_then(find_date_range))
        .or_else(|| find_any_date(block[0]))
        .or_else(|| next.filter(|line| is_date_only_line(line)).and_then(find_any_date));

    let mut title_taken = entry.job_title.is_some();
    for line in &block[1..] {
        if let Some(item) = bullet_item(line) {
            entry.responsibilities.push(item.to_string());
            continue;
        }
        if is_date_only_line(line) {
            continue;
        }
        if !title_taken && entry.responsibilities.is_empty() {
            let title = trim_separators(&strip_dates(line));
            if !title.is_empty() {
                entry.job_title = Some(title);
                title_taken = true;
                continue;
            }
        }
        continue_responsibility(&mut entry.responsibilities, line);
    }
    entry
}

/// A lower-case line continues the previous wrapped bullet.
fn continue_responsibility(responsibilities: &mut [String], line: &str) {
    if !line.chars().next().is_some_and(char::is_lowercase) {
        return;
    }
    if let Some(last) = responsibilities.last_mut() {
        last.push(' ');
        last.push_str(line);
    }
}

fn entries_from_date_ranges(lines: &[&str]) -> Vec<ExperienceEntry> {
    let anchors: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| contains_date_range(line))
        .map(|(index, _)| index)
        .collect();
    let Some(&first_anchor) = anchors.first() else {
        return Vec::new();
    };

    // Date-first layouts open a block at each date line; otherwise the run of
    // plain lines just above a date belongs to it.
    let mut starts: Vec<usize> = if first_anchor == 0 {
        anchors.clone()
    } else {
        anchors
            .iter()
            .enumerate()
            .map(|(n, &anchor)| {
                let floor = if n == 0 { 0 } else { anchors[n - 1] + 1 };
                let mut start = anchor;
                while start > floor && bullet_item(lines[start - 1]).is_none() {
                    start -= 1;
                }
                start
            })
            .collect()
    };
    starts[0] = 0;

    starts
        .iter()
        .zip(&anchors)
        .enumerate()
        .map(|(n, (&start, &anchor))| {
            let end = starts.get(n + 1).copied().unwrap_or(lines.len());
            parse_dated_block(&lines[start..end], find_date_range(lines[anchor]))
        })
        .collect()
}

fn parse_dated_block(block: &[&str], dates: Option<DateRange>) -> ExperienceEntry {
    let mut entry = ExperienceEntry {
        dates,
        raw: block.join("\n"),
        ..ExperienceEntry::default()
    };

    let mut candidates = Vec::new();
    for line in block {
        if let Some(item) = bullet_item(line) {
            entry.responsibilities.push(item.to_string());
            continue;
        }
        let stripped = trim_separators(&strip_dates(line));
        if stripped.is_empty() {
            continue;
        }
        if entry.job_title.is_none() && has_title_term(&stripped) {
            let split = TITLE_AT_COMPANY_RE
                .captures(&stripped)
                .map(|captures| (captures[1].to_string(), trim_separators(&captures[2])));
            match split {
                Some((title, company)) => {
                    entry.job_title = Some(title);
                    entry.company = Some(company).filter(|company| !company.is_empty());
                }
                None => entry.job_title = Some(stripped),
            }
            continue;
        }
        candidates.push(stripped);
    }

    if entry.company.is_none() {
        entry.company = candidates
            .iter()
            .find(|line| has_company_suffix(line))
            .or_else(|| candidates.iter().find(|line| CAPITALIZED_PHRASE_RE.is_match(line)))
            .cloned();
    }
    entry
}

fn has_title_term(text: &str) -> bool {
    JOB_TITLE_TERMS.iter().any(|term| line_contains_phrase(text, term))
}

fn has_company_suffix(text: &str) -> bool {
    COMPANY_SUFFIXES.iter().any(|suffix| line_contains_phrase(text, suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(body: &str) -> Vec<ExperienceEntry> {
        match extract_experience(body) {
            Extraction::Structured(entries) => entries,
            Extraction::Unparsed(raw) => panic!("expected entries, got raw text: {raw}"),
        }
    }

    #[test]
    fn splits_at_company_headers() {
        let body = "PT Maju Jaya - Jakarta    Jan 2019 - Present\n\
                    Software Engineer\n\
                    • Built payment APIs\n\
                    handling 1M requests\n\
                    • Mentored juniors\n\
                    Acme Corp - Singapore\n\
                    Mar 2016 - Dec 2018\n\
                    Intern\n\
                    - Wrote tests";
        let entries = entries(body);
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].company.as_deref(), Some("PT Maju Jaya"));
        assert_eq!(entries[0].location.as_deref(), Some("Jakarta"));
        assert_eq!(entries[0].job_title.as_deref(), Some("Software Engineer"));
        assert!(entries[0].dates.as_ref().is_some_and(|d| d.is_current));
        assert_eq!(
            entries[0].responsibilities,
            vec!["Built payment APIs handling 1M requests", "Mentored juniors"]
        );

        assert_eq!(entries[1].company.as_deref(), Some("Acme Corp"));
        assert_eq!(entries[1].job_title.as_deref(), Some("Intern"));
        assert_eq!(
            entries[1].dates.as_ref().map(|d| d.raw.as_str()),
            Some("Mar 2016 - Dec 2018")
        );
        assert_eq!(entries[1].responsibilities, vec!["Wrote tests"]);
    }

    #[test]
    fn title_first_headers_are_recognized() {
        let entries = entries("Senior Data Analyst | Tokopedia | 2020 - 2022\n• Built dashboards");
        assert_eq!(entries[0].job_title.as_deref(), Some("Senior Data Analyst"));
        assert_eq!(entries[0].company.as_deref(), Some("Tokopedia"));
        assert_eq!(entries[0].location, None);
        assert_eq!(entries[0].responsibilities, vec!["Built dashboards"]);
    }

    #[test]
    fn preamble_is_kept_with_first_entry() {
        let entries = entries("Selected roles:\nAcme - Remote\nEngineer");
        assert_eq!(entries.len(), 1);
        assert!(entries[0].raw.starts_with("Selected roles:\nAcme - Remote"));
        assert_eq!(entries[0].job_title.as_deref(), Some("Engineer"));
    }

    #[test]
    fn falls_back_to_date_ranges_with_dates_after_titles() {
        let body = "Software Engineer at Gojek\n\
                    Jakarta, Jan 2020 - Present\n\
                    • Scaled services\n\
                    Backend Developer\n\
                    Bukalapak Inc\n\
                    2017 - 2019";
        let entries = entries(body);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].job_title.as_deref(), Some("Software Engineer"));
        assert_eq!(entries[0].company.as_deref(), Some("Gojek"));
        assert_eq!(entries[0].responsibilities, vec!["Scaled services"]);
        assert_eq!(entries[1].job_title.as_deref(), Some("Backend Developer"));
        assert_eq!(entries[1].company.as_deref(), Some("Bukalapak Inc"));
        assert_eq!(entries[1].dates.as_ref().map(|d| d.raw.as_str()), Some("2017 - 2019"));
    }

    #[test]
    fn falls_back_to_date_ranges_with_dates_first() {
        let body = "2018 - 2020\nPT Sinar Mas\nMarketing Staff\n2020 - 2022\nPT Lain\nMarketing Manager";
        let entries = entries(body);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].company.as_deref(), Some("PT Sinar Mas"));
        assert_eq!(entries[0].job_title.as_deref(), Some("Marketing Staff"));
        assert_eq!(entries[1].company.as_deref(), Some("PT Lain"));
        assert_eq!(entries[1].job_title.as_deref(), Some("Marketing Manager"));
    }

    #[test]
    fn unstructured_text_is_returned_verbatim() {
        let body = "Freelance work on various projects";
        assert_eq!(extract_experience(body), Extraction::Unparsed(body.to_string()));
        assert_eq!(extract_experience("   "), Extraction::Unparsed(String::new()));
    }

    #[test]
    fn tolerates_arbitrary_input() {
        for body in ["- - -", "| | |", "A - B - C - D - E", "\u{0}2019 - 2020\u{0}"] {
            let _ = extract_experience(body);
        }
    }
}
