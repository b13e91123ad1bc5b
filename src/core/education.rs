use once_cell::sync::Lazy;
use regex::Regex;

use super::dates::{
    collapse_spaces, find_any_date, find_date_range, starts_with_date, strip_dates, trim_separators,
};
use super::models::{EducationEntry, Extraction};
use super::vocabulary::{
    bullet_item, line_contains_phrase, EducationLevel, DEGREE_KEYWORDS, INSTITUTION_KEYWORDS,
};

static DEGREE_RE: Lazy<Regex> = Lazy::new(|| {
    let alternation = DEGREE_KEYWORDS
        .iter()
        .map(|(keyword, _)| regex::escape(keyword))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b\.?")).unwrap()
});

static CAPITALIZED_INSTITUTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:[A-Z][\w&.'-]*\s+){0,5}(?:University|College|Institute|Polytechnic|Academy|School|Universitas|Institut|Politeknik|Akademi|Sekolah)(?:\s+(?:of|for|and|dan)?\s*[A-Z][\w&.'-]*){0,5}",
    )
    .unwrap()
});

static FIELD_STOP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*(?:[,(|;]|\s-\s|\s–\s|\b(?:gpa|ipk|cgpa)\b|\b(?:19|20)\d{2}\b|\d+[.,]\d+\s*/)").unwrap()
});

static GPA_RATIO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d+[.,]\d+\s*/\s*\d+(?:[.,]\d+)?").unwrap());
static GPA_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:c?gpa|ipk)\s*[:=]?\s*(\d+[.,]\d+)").unwrap());

const FIELD_CONNECTORS: &[&str] = &[
    "of", "in", "on", "untuk", "jurusan", "dalam", "degree", "program", "bidang", "-", ":",
];

/// Long institution lines are treated as prose and narrowed to the
/// capitalized name around the institution word.
const PROSE_WORDS: usize = 6;

#[derive(Default)]
struct Block<'a> {
    lines: Vec<&'a str>,
    has_date: bool,
    has_institution: bool,
    has_degree: bool,
}

/// Education entries in document order, or the body itself when no entry
/// carries a degree, institution or date.
pub fn extract_education(body: &str) -> Extraction<Vec<EducationEntry>> {
    let entries: Vec<EducationEntry> = split_blocks(body)
        .iter()
        .filter_map(|block| parse_block(&block.lines))
        .collect();

    if entries.is_empty() {
        Extraction::Unparsed(body.trim().to_string())
    } else {
        Extraction::Structured(entries)
    }
}

fn split_blocks(body: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut current = Block::default();

    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.lines.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            continue;
        }

        if bullet_item(line).is_none() {
            let dated = starts_with_date(line);
            let institution = has_institution_keyword(line);
            let degree = DEGREE_RE.is_match(line);
            let starts_entry = (dated && current.has_date)
                || (institution && current.has_institution)
                || (degree && current.has_degree);
            if starts_entry && !current.lines.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            current.has_date |= dated || find_date_range(line).is_some();
            current.has_institution |= institution;
            current.has_degree |= degree;
        }
        current.lines.push(line);
    }
    if !current.lines.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn parse_block(lines: &[&str]) -> Option<EducationEntry> {
    let (bullets, plain): (Vec<&str>, Vec<&str>) =
        lines.iter().copied().partition(|line| bullet_item(line).is_some());

    let mut entry = EducationEntry {
        raw: lines.join("\n"),
        achievements: bullets.iter().filter_map(|line| bullet_item(line)).map(str::to_string).collect(),
        ..EducationEntry::default()
    };

    let plain_text = plain.join("\n");
    entry.dates = find_date_range(&plain_text).or_else(|| find_any_date(&plain_text));

    for line in &plain {
        if let Some(m) = DEGREE_RE.find(line) {
            let degree_level = degree_level_of(m.as_str());
            entry.degree = Some(m.as_str().trim_end_matches('.').to_string());
            if degree_level != Some(EducationLevel::HighSchool) {
                entry.field_of_study = field_after(&line[m.end()..]);
            } else if !plain.iter().any(|line| has_institution_keyword(line)) {
                entry.institution = Some(strip_dates(line)).filter(|name| !name.is_empty());
            }
            break;
        }
    }

    if let Some(line) = plain.iter().find(|line| has_institution_keyword(line)) {
        let (institution, location) = institution_and_location(line);
        entry.institution = institution.or(entry.institution);
        entry.location = location;
    }

    entry.gpa = lines.iter().find_map(|line| {
        GPA_RATIO_RE
            .find(line)
            .map(|m| m.as_str().replace(' ', ""))
            .or_else(|| GPA_LABEL_RE.captures(line).and_then(|c| c.get(1)).map(|m| m.as_str().to_string()))
    });

    (entry.degree.is_some() || entry.institution.is_some() || entry.dates.is_some()).then_some(entry)
}

fn has_institution_keyword(line: &str) -> bool {
    INSTITUTION_KEYWORDS
        .iter()
        .any(|keyword| line_contains_phrase(line, keyword))
}

fn degree_level_of(matched: &str) -> Option<EducationLevel> {
    let lowered = matched.trim_end_matches('.').to_lowercase();
    DEGREE_KEYWORDS
        .iter()
        .find(|(keyword, _)| *keyword == lowered)
        .map(|(_, level)| *level)
}

/// Field of study following a degree keyword, up to the first separator,
/// GPA or year.
fn field_after(rest: &str) -> Option<String> {
    let cut = FIELD_STOP_RE.find(rest).map_or(rest.len(), |m| m.start());
    let mut words: Vec<&str> = rest[..cut].split_whitespace().collect();

    let is_connector = |word: &&str| FIELD_CONNECTORS.contains(&word.to_lowercase().as_str());
    while words.first().is_some_and(is_connector) {
        words.remove(0);
    }
    while words.last().is_some_and(is_connector) {
        words.pop();
    }

    let field = trim_separators(&words.join(" "));
    (!field.is_empty()).then_some(field)
}

fn institution_and_location(line: &str) -> (Option<String>, Option<String>) {
    let cleaned = collapse_spaces(&strip_dates(line));
    let parts: Vec<String> = cleaned
        .split(" | ")
        .flat_map(|part| part.split(" - "))
        .flat_map(|part| part.split(" – "))
        .flat_map(|part| part.split(", "))
        .map(trim_separators)
        .filter(|part| !part.is_empty())
        .collect();

    let Some(index) = parts.iter().position(|part| has_institution_keyword(part)) else {
        return (None, None);
    };

    let part = &parts[index];
    let institution = if part.split_whitespace().count() > PROSE_WORDS {
        CAPITALIZED_INSTITUTION_RE
            .find(part)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_else(|| part.clone())
    } else {
        part.clone()
    };

    let location = parts.get(index + 1).filter(|next| {
        !has_institution_keyword(next)
            && !DEGREE_RE.is_match(next)
            && !next.chars().any(|c| c.is_ascii_digit())
            && next.split_whitespace().count() <= 4
    });

    (Some(institution), location.cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entries(body: &str) -> Vec<EducationEntry> {
        match extract_education(body) {
            Extraction::Structured(entries) => entries,
            Extraction::Unparsed(raw) => panic!("expected entries, got raw text: {raw}"),
        }
    }

    #[test]
    fn parses_institution_first_layout() {
        let body = "Universitas Indonesia - Depok    2015 - 2019\n\
                    Bachelor of Computer Science, GPA 3.75/4.00\n\
                    • Dean's list 2017\n\
                    • Led robotics club\n\
                    SMA Negeri 8 Jakarta    2012 - 2015";
        let entries = entries(body);
        assert_eq!(entries.len(), 2);

        let university = &entries[0];
        assert_eq!(university.institution.as_deref(), Some("Universitas Indonesia"));
        assert_eq!(university.location.as_deref(), Some("Depok"));
        assert_eq!(university.degree.as_deref(), Some("Bachelor"));
        assert_eq!(university.field_of_study.as_deref(), Some("Computer Science"));
        assert_eq!(university.gpa.as_deref(), Some("3.75/4.00"));
        assert_eq!(university.achievements, vec!["Dean's list 2017", "Led robotics club"]);
        assert_eq!(
            university.dates.as_ref().and_then(|d| d.start),
            NaiveDate::from_ymd_opt(2015, 1, 1)
        );

        let school = &entries[1];
        assert_eq!(school.degree.as_deref(), Some("SMA"));
        assert_eq!(school.institution.as_deref(), Some("SMA Negeri 8 Jakarta"));
        assert_eq!(school.field_of_study, None);
        assert_eq!(school.dates.as_ref().map(|d| d.raw.as_str()), Some("2012 - 2015"));
    }

    #[test]
    fn parses_date_first_indonesian_layout() {
        let body = "2019 - 2023\n\
                    S1 Teknik Informatika - Institut Teknologi Bandung\n\
                    IPK 3.60\n\
                    2016 - 2019\n\
                    SMA Negeri 1 Bandung";
        let entries = entries(body);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].degree.as_deref(), Some("S1"));
        assert_eq!(entries[0].field_of_study.as_deref(), Some("Teknik Informatika"));
        assert_eq!(entries[0].institution.as_deref(), Some("Institut Teknologi Bandung"));
        assert_eq!(entries[0].gpa.as_deref(), Some("3.60"));
        assert_eq!(entries[1].institution.as_deref(), Some("SMA Negeri 1 Bandung"));
        assert!(entries[1].raw.starts_with("2016 - 2019"));
    }

    #[test]
    fn narrows_prose_to_capitalized_institution() {
        let body = "Graduated from Universitas Gadjah Mada with a Bachelor degree in Economics in 2010";
        let entries = entries(body);
        assert_eq!(entries[0].institution.as_deref(), Some("Universitas Gadjah Mada"));
        assert_eq!(entries[0].degree.as_deref(), Some("Bachelor"));
        assert_eq!(entries[0].field_of_study.as_deref(), Some("Economics"));
        assert_eq!(entries[0].dates.as_ref().map(|d| d.raw.as_str()), Some("2010"));
    }

    #[test]
    fn blocks_without_signal_fall_back_to_raw_text() {
        let body = "Self-taught through online courses\nLots of reading";
        assert_eq!(
            extract_education(body),
            Extraction::Unparsed(body.to_string())
        );
        assert_eq!(extract_education(""), Extraction::Unparsed(String::new()));
    }

    #[test]
    fn raw_text_of_each_entry_is_kept() {
        let entries = entries("Master of Data Science\nMonash University\n2020 - 2022");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].raw, "Master of Data Science\nMonash University\n2020 - 2022");
        assert_eq!(entries[0].institution.as_deref(), Some("Monash University"));
        assert_eq!(entries[0].field_of_study.as_deref(), Some("Data Science"));
    }

    #[test]
    fn tolerates_arbitrary_input() {
        for body in ["\u{0}\n\n\n", "////", "• • •", "GPA 4.0/4.0"] {
            let _ = extract_education(body);
        }
    }
}
