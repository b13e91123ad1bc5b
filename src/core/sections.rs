//! Splits a résumé into labeled sections by header lines, with a
//! keyword-proximity fallback for documents that have none.

use std::cmp::Reverse;

use once_cell::sync::Lazy;
use regex::Regex;

use super::dates::find_date_signal;
use super::models::{ExtractorSettings, Language, SectionKind, SectionMap};
use super::vocabulary::{line_contains_phrase, DEGREE_KEYWORDS, INSTITUTION_KEYWORDS, SECTION_HEADERS};

/// Extra characters a line may carry beyond a contained header phrase.
const HEADER_SLACK: usize = 10;
const TITLE_MAX_WORDS: usize = 5;
const TITLE_CONNECTORS: &[&str] = &["&", "and", "of", "dan", "the", "/", "-"];

static EDUCATION_SIGNAL_RE: Lazy<Regex> = Lazy::new(|| {
    let alternation = DEGREE_KEYWORDS
        .iter()
        .map(|(keyword, _)| *keyword)
        .chain(INSTITUTION_KEYWORDS.iter().copied())
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).unwrap()
});

static SKILLS_SIGNAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:skills?|proficient|proficiency|experienced in|expert in|keahlian|keterampilan)\b",
    )
    .unwrap()
});

/// Section bodies plus whether they came from the proximity fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    pub sections: SectionMap,
    pub used_fallback: bool,
}

struct HeaderMatch {
    kind: SectionKind,
    inline: bool,
}

pub fn segment_sections(text: &str, language: Language) -> SectionMap {
    segment_sections_with(text, language, &ExtractorSettings::default()).sections
}

pub fn segment_sections_with(
    text: &str,
    language: Language,
    settings: &ExtractorSettings,
) -> Segmentation {
    let mut sections = SectionMap::default();
    let mut open: Option<(SectionKind, Vec<&str>)> = None;
    let mut headers_found = 0usize;

    for line in text.lines() {
        let open_kind = open.as_ref().map(|(kind, _)| *kind);
        match match_header(line, language) {
            Some(header) if open_kind != Some(header.kind) => {
                headers_found += 1;
                if let Some((kind, body)) = open.take() {
                    sections.append(kind, join_body(&body));
                }
                let body = if header.inline { vec![line.trim()] } else { Vec::new() };
                open = Some((header.kind, body));
            }
            // A sub-heading of the open section stays in its body.
            _ => {
                if let Some((_, body)) = open.as_mut() {
                    body.push(line);
                }
            }
        }
    }
    if let Some((kind, body)) = open.take() {
        sections.append(kind, join_body(&body));
    }

    if headers_found > 0 {
        tracing::debug!(headers = headers_found, sections = sections.len(), "segmented by headers");
        return Segmentation {
            sections,
            used_fallback: false,
        };
    }

    let sections = proximity_sections(text, settings);
    tracing::debug!(sections = sections.len(), "no section headers, used proximity fallback");
    Segmentation {
        sections,
        used_fallback: true,
    }
}

/// Category of a header line, ignoring the detected language.
pub(crate) fn header_kind(line: &str) -> Option<SectionKind> {
    match_header(line, Language::default()).map(|header| header.kind)
}

fn match_header(line: &str, language: Language) -> Option<HeaderMatch> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some((label, rest)) = trimmed.split_once(':') {
        if !rest.trim().is_empty() {
            let label = normalize_header(label);
            return best_phrase(language, |phrase| phrase == label).map(|kind| HeaderMatch {
                kind,
                inline: true,
            });
        }
    }

    let normalized = normalize_header(trimmed);
    if normalized.is_empty() {
        return None;
    }
    let title_like = is_title_like(trimmed);
    best_phrase(language, |phrase| {
        phrase == normalized
            || (line_contains_phrase(&normalized, phrase)
                && (normalized.len() <= phrase.len() + HEADER_SLACK
                    || (title_like && leads_with(&normalized, phrase))))
    })
    .map(|kind| HeaderMatch {
        kind,
        inline: false,
    })
}

/// Longest matching phrase wins; equal lengths prefer the detected language,
/// then category order.
fn best_phrase(language: Language, matches: impl Fn(&str) -> bool) -> Option<SectionKind> {
    SECTION_HEADERS
        .iter()
        .enumerate()
        .flat_map(|(order, header)| {
            let english = header.english.iter().map(move |p| (Language::English, order, header.kind, *p));
            let indonesian = header
                .indonesian
                .iter()
                .map(move |p| (Language::Indonesian, order, header.kind, *p));
            english.chain(indonesian)
        })
        .filter(|(_, _, _, phrase)| matches(phrase))
        .max_by_key(|(phrase_language, order, _, phrase)| {
            (phrase.len(), *phrase_language == language, Reverse(*order))
        })
        .map(|(_, _, kind, _)| kind)
}

/// Longer title lines only count when they open with the phrase, as in
/// `Education & Professional Training`.
fn leads_with(normalized: &str, phrase: &str) -> bool {
    normalized
        .strip_prefix(phrase)
        .is_some_and(|rest| rest.starts_with(|c: char| !c.is_alphanumeric()))
}

fn normalize_header(line: &str) -> String {
    line.trim()
        .to_lowercase()
        .trim_end_matches(|c: char| matches!(c, ':' | '_' | '-' | '.' | '|') || c.is_whitespace())
        .to_string()
}

fn is_title_like(line: &str) -> bool {
    let words: Vec<&str> = line
        .trim_end_matches(|c: char| matches!(c, ':' | '_' | '-' | '.' | '|') || c.is_whitespace())
        .split_whitespace()
        .collect();
    !words.is_empty()
        && words.len() <= TITLE_MAX_WORDS
        && !line.chars().any(|c| c.is_ascii_digit())
        && words.iter().all(|word| {
            TITLE_CONNECTORS.contains(&word.to_lowercase().as_str())
                || word.chars().next().is_some_and(char::is_uppercase)
        })
}

fn join_body(lines: &[&str]) -> String {
    lines.join("\n").trim_matches('\n').trim_end().to_string()
}

fn proximity_sections(text: &str, settings: &ExtractorSettings) -> SectionMap {
    let mut sections = SectionMap::default();
    let signals = [
        (
            SectionKind::Experience,
            find_date_signal(text).map(|span| span.start),
            settings.experience_window,
        ),
        (
            SectionKind::Education,
            EDUCATION_SIGNAL_RE.find(text).map(|m| m.start()),
            settings.education_window,
        ),
        (
            SectionKind::Skills,
            SKILLS_SIGNAL_RE.find(text).map(|m| m.start()),
            settings.skills_window,
        ),
    ];

    for (kind, anchor, width) in signals {
        if let Some(anchor) = anchor {
            let window = char_window(text, anchor, width);
            if !window.is_empty() {
                sections.append(kind, window.to_string());
            }
        }
    }
    sections
}

/// Up to `width` characters centered on the byte offset `anchor`.
fn char_window(text: &str, anchor: usize, width: usize) -> &str {
    let anchor_char = text[..anchor].chars().count();
    let start_char = anchor_char.saturating_sub(width / 2);
    let byte_at = |n: usize| text.char_indices().nth(n).map_or(text.len(), |(i, _)| i);
    let start = byte_at(start_char);
    let end = byte_at(start_char + width);
    text[start..end].trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_bodies_between_headers() {
        let text = "Jane Doe\nEDUCATION\nUniversitas Indonesia\nBachelor of Science, 2015 - 2019\nEXPERIENCE\nAcme - Jakarta\nEngineer";
        let sections = segment_sections(text, Language::English);

        assert_eq!(
            sections.get(SectionKind::Education),
            Some("Universitas Indonesia\nBachelor of Science, 2015 - 2019")
        );
        assert_eq!(sections.get(SectionKind::Experience), Some("Acme - Jakarta\nEngineer"));
        assert!(!sections.contains(SectionKind::Skills));
    }

    #[test]
    fn accepts_decorated_and_bilingual_headers() {
        let text = "Pengalaman Kerja:\nPT Maju\nKeahlian Teknis\nJava\nRiwayat Pendidikan\nUI";
        let sections = segment_sections(text, Language::Indonesian);
        assert_eq!(sections.get(SectionKind::Experience), Some("PT Maju"));
        assert_eq!(sections.get(SectionKind::Skills), Some("Java"));
        assert_eq!(sections.get(SectionKind::Education), Some("UI"));
    }

    #[test]
    fn prose_mentioning_a_header_word_is_not_a_header() {
        let text = "Summary\nI gained experience building payment systems for banks\nSkills\nGo";
        let sections = segment_sections(text, Language::English);
        assert!(!sections.contains(SectionKind::Experience));
        assert_eq!(
            sections.get(SectionKind::Profile),
            Some("I gained experience building payment systems for banks")
        );
    }

    #[test]
    fn longest_phrase_decides_category() {
        assert_eq!(header_kind("Organizational Experience"), Some(SectionKind::Organizations));
        assert_eq!(header_kind("Language Skills"), Some(SectionKind::Languages));
        assert_eq!(header_kind("PROFESSIONAL EXPERIENCE"), Some(SectionKind::Experience));
        assert_eq!(header_kind("Built 3 services with experience"), None);
    }

    #[test]
    fn long_title_lines_only_open_a_section_when_led_by_the_phrase() {
        assert_eq!(header_kind("Education & Professional Training"), Some(SectionKind::Education));
        assert_eq!(header_kind("Ministry of Education - Jakarta"), None);

        let text = "EXPERIENCE\nMinistry of Education - Jakarta\nTeacher\n2015 - 2019\nSKILLS\nExcel";
        let sections = segment_sections(text, Language::English);
        assert_eq!(
            sections.get(SectionKind::Experience),
            Some("Ministry of Education - Jakarta\nTeacher\n2015 - 2019")
        );
        assert!(!sections.contains(SectionKind::Education));
        assert_eq!(sections.get(SectionKind::Skills), Some("Excel"));
    }

    #[test]
    fn inline_header_keeps_its_line_and_subheadings_stay_in_body() {
        let text = "Skills: Java, Python\nSoft Skills\nCommunication\nEducation\nITB";
        let sections = segment_sections(text, Language::English);
        assert_eq!(
            sections.get(SectionKind::Skills),
            Some("Skills: Java, Python\nSoft Skills\nCommunication")
        );
        assert_eq!(sections.get(SectionKind::Education), Some("ITB"));
    }

    #[test]
    fn repeated_sections_are_concatenated() {
        let text = "Skills\nJava\nEducation\nITB\nSkills\nGo";
        let sections = segment_sections(text, Language::English);
        assert_eq!(sections.get(SectionKind::Skills), Some("Java\n\nGo"));
    }

    #[test]
    fn falls_back_to_keyword_proximity_without_headers() {
        let text = "Budi Santoso\nLulus Sarjana Teknik dari Universitas Brawijaya\nBekerja di PT Maju Jan 2019 - Present\nProficient in SQL";
        let segmentation = segment_sections_with(text, Language::Indonesian, &ExtractorSettings::default());

        assert!(segmentation.used_fallback);
        assert!(segmentation.sections.body(SectionKind::Education).is_some());
        assert!(segmentation.sections.body(SectionKind::Experience).is_some());
        assert!(segmentation.sections.body(SectionKind::Skills).is_some());
    }

    #[test]
    fn fallback_window_respects_width_and_char_boundaries() {
        let text = format!("{} bachelor {}", "é".repeat(50), "ü".repeat(50));
        let settings = ExtractorSettings {
            education_window: 20,
            ..ExtractorSettings::default()
        };
        let segmentation = segment_sections_with(&text, Language::English, &settings);
        let body = segmentation.sections.get(SectionKind::Education).unwrap();
        assert_eq!(body.chars().count(), 20);
        assert!(body.contains("bachelor"));
    }

    #[test]
    fn empty_input_yields_empty_map() {
        let segmentation = segment_sections_with("", Language::English, &ExtractorSettings::default());
        assert!(segmentation.sections.is_empty());
    }
}
