use std::collections::HashSet;

use super::models::{Extraction, SkillSet};
use super::vocabulary::{bullet_item, scan_keywords, SOFT_KEYWORDS, TECH_KEYWORDS};

const HARD_LABELS: &[&str] = &[
    "hard skills",
    "technical skills",
    "programming languages",
    "programming",
    "tools",
    "technical",
    "keahlian teknis",
    "keahlian keras",
];
const SOFT_LABELS: &[&str] = &[
    "soft skills",
    "personal skills",
    "professional skills",
    "keahlian lunak",
];
const INTEREST_LABELS: &[&str] = &["interests", "interest", "hobbies", "activities", "minat", "hobi"];

/// Lines this long are prose, not list items.
const SHORT_LINE_CHARS: usize = 50;
const ITEM_LABEL_WORDS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Hard,
    Soft,
    Interests,
}

#[derive(Default)]
struct Spans {
    preamble: Vec<String>,
    hard: Option<Vec<String>>,
    soft: Option<Vec<String>>,
    interests: Option<Vec<String>>,
}

impl Spans {
    fn slot(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Hard => self.hard.get_or_insert_with(Vec::new),
            Category::Soft => self.soft.get_or_insert_with(Vec::new),
            Category::Interests => self.interests.get_or_insert_with(Vec::new),
        }
    }
}

/// Splits a skills section into hard skills, soft skills and interests.
///
/// Labeled sub-lists (`Technical Skills:`, `Soft Skills`, `Hobbies`) become
/// their own category; anything before the first label counts as hard skills.
/// Lines no layout could read are kept in `unparsed`. Returns the body when no
/// item is found.
pub fn extract_skills(body: &str) -> Extraction<SkillSet> {
    let spans = split_spans(body);

    let mut hard_lines = spans.preamble;
    hard_lines.extend(spans.hard.unwrap_or_default());
    let hard = extract_items(&hard_lines.join("\n"));
    let soft = extract_items(&spans.soft.unwrap_or_default().join("\n"));
    let interests = extract_items(&spans.interests.unwrap_or_default().join("\n"));

    let skills = SkillSet {
        hard_skills: hard.items,
        soft_skills: soft.items,
        interests: interests.items,
        unparsed: [hard.leftover, soft.leftover, interests.leftover].concat(),
    };

    if skills.is_empty() {
        Extraction::Unparsed(body.trim().to_string())
    } else {
        Extraction::Structured(skills)
    }
}

fn split_spans(body: &str) -> Spans {
    let mut spans = Spans::default();
    let mut current: Option<Category> = None;

    for line in body.lines() {
        let line = line.trim();
        if let Some((category, rest)) = match_label(line) {
            current = Some(category);
            let slot = spans.slot(category);
            if !rest.is_empty() {
                slot.push(rest.to_string());
            }
            continue;
        }
        match current {
            Some(category) => spans.slot(category).push(line.to_string()),
            None => spans.preamble.push(line.to_string()),
        }
    }
    spans
}

/// A category label at the start of a line, and the text after it.
fn match_label(line: &str) -> Option<(Category, &str)> {
    let text = bullet_item(line).unwrap_or(line);
    let lowered = text.to_lowercase();

    let labels = HARD_LABELS
        .iter()
        .map(|label| (Category::Hard, *label))
        .chain(SOFT_LABELS.iter().map(|label| (Category::Soft, *label)))
        .chain(INTEREST_LABELS.iter().map(|label| (Category::Interests, *label)));

    labels
        .filter(|(_, label)| lowered.starts_with(label))
        .max_by_key(|(_, label)| label.len())
        .and_then(|(category, label)| {
            // Labels are ASCII, so the byte offset is valid in `text` too.
            let rest = text.get(label.len()..)?.trim_start();
            let terminated = rest.is_empty() || rest.starts_with([':', '-', '–', '⚒', '|']);
            terminated.then(|| {
                let rest = rest.trim_start_matches([':', '-', '–', '⚒', '|']).trim();
                (category, rest)
            })
        })
}

/// What one layout read from a span: the items, and the lines it skipped.
#[derive(Debug, Default, PartialEq)]
struct SpanItems {
    items: Vec<String>,
    leftover: Vec<String>,
}

/// Items of one span: bullets, then delimited lists, then short lines, then
/// known keywords, whichever yields first.
fn extract_items(text: &str) -> SpanItems {
    let text = text.trim();
    if text.is_empty() {
        return SpanItems::default();
    }

    let strategies: [fn(&str) -> SpanItems; 4] = [bullet_items, delimited_items, short_line_items, keyword_items];
    strategies
        .iter()
        .map(|strategy| {
            let mut read = strategy(text);
            read.items = dedup(read.items);
            read
        })
        .find(|read| !read.items.is_empty())
        .unwrap_or_else(|| SpanItems {
            items: Vec::new(),
            leftover: non_empty_lines(text).map(str::to_string).collect(),
        })
}

fn non_empty_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}

fn is_short(line: &str) -> bool {
    line.chars().count() < SHORT_LINE_CHARS
}

fn bullet_items(text: &str) -> SpanItems {
    let mut read = SpanItems::default();
    for line in non_empty_lines(text) {
        match bullet_item(line).or_else(|| line.contains('•').then_some(line)) {
            Some(item) => read.items.extend(split_list(strip_item_label(item), &['•', '|', ',', ';'])),
            None => read.leftover.push(line.to_string()),
        }
    }
    read
}

fn delimited_items(text: &str) -> SpanItems {
    if !text.contains([',', ';']) {
        return SpanItems::default();
    }
    let mut read = SpanItems::default();
    for line in non_empty_lines(text) {
        if line.contains([',', ';']) || is_short(line) {
            read.items.extend(split_list(strip_item_label(line), &[',', ';']));
        } else {
            read.leftover.push(line.to_string());
        }
    }
    if read.items.len() > 1 {
        read
    } else {
        SpanItems::default()
    }
}

fn short_line_items(text: &str) -> SpanItems {
    let (short, long): (Vec<&str>, Vec<&str>) = non_empty_lines(text).partition(|line| is_short(line));
    SpanItems {
        items: short.into_iter().map(str::to_string).collect(),
        leftover: long.into_iter().map(str::to_string).collect(),
    }
}

/// Keywords found in prose. The prose itself stays in `leftover`.
fn keyword_items(text: &str) -> SpanItems {
    SpanItems {
        items: scan_keywords(text, TECH_KEYWORDS)
            .into_iter()
            .chain(scan_keywords(text, SOFT_KEYWORDS))
            .map(str::to_string)
            .collect(),
        leftover: non_empty_lines(text).map(str::to_string).collect(),
    }
}

/// Drops a short `Label:` prefix such as `Frameworks: React, Vue`.
fn strip_item_label(item: &str) -> &str {
    match item.split_once(':') {
        Some((label, rest)) if label.split_whitespace().count() <= ITEM_LABEL_WORDS && !rest.trim().is_empty() => {
            rest.trim()
        }
        _ => item,
    }
}

fn split_list(text: &str, delimiters: &[char]) -> Vec<String> {
    text.split(delimiters)
        .map(|item| item.trim().trim_end_matches('.').trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn dedup(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(body: &str) -> SkillSet {
        match extract_skills(body) {
            Extraction::Structured(skills) => skills,
            Extraction::Unparsed(raw) => panic!("expected skills, got raw text: {raw}"),
        }
    }

    #[test]
    fn splits_labeled_categories() {
        let body = "Technical Skills: Java, Python, SQL\n\
                    Soft Skills\n\
                    • Communication\n\
                    • Leadership\n\
                    Hobbies: Chess; Hiking";
        let skills = skills(body);
        assert_eq!(skills.hard_skills, vec!["Java", "Python", "SQL"]);
        assert_eq!(skills.soft_skills, vec!["Communication", "Leadership"]);
        assert_eq!(skills.interests, vec!["Chess", "Hiking"]);
    }

    #[test]
    fn unlabeled_items_are_hard_skills() {
        let skills = skills("React, Node.js, react\nDocker");
        assert_eq!(skills.hard_skills, vec!["React", "Node.js", "Docker"]);
        assert!(skills.soft_skills.is_empty());
    }

    #[test]
    fn bullets_win_over_other_layouts() {
        let skills = skills("- Frameworks: React, Vue\n- Go\nSome trailing sentence, with a comma");
        assert_eq!(skills.hard_skills, vec!["React", "Vue", "Go"]);
        assert_eq!(skills.unparsed, vec!["Some trailing sentence, with a comma"]);
    }

    #[test]
    fn lines_beside_bullets_are_kept_unparsed() {
        let skills = skills("- React\n- Vue\nAlso fluent in Kubernetes and Terraform, Ansible");
        assert_eq!(skills.hard_skills, vec!["React", "Vue"]);
        assert_eq!(skills.unparsed, vec!["Also fluent in Kubernetes and Terraform, Ansible"]);
    }

    #[test]
    fn unlabeled_lines_join_a_labeled_hard_list() {
        let skills = skills("Java, Go\nTechnical Skills: Rust");
        assert_eq!(skills.hard_skills, vec!["Java", "Go", "Rust"]);
        assert!(skills.unparsed.is_empty());
    }

    #[test]
    fn inline_bullets_are_split() {
        let skills = skills("Java • Kotlin • Spring Boot");
        assert_eq!(skills.hard_skills, vec!["Java", "Kotlin", "Spring Boot"]);
    }

    #[test]
    fn short_lines_become_items() {
        let skills = skills("Keahlian Teknis\nMicrosoft Excel\nAkuntansi\nKeahlian Lunak\nKomunikasi");
        assert_eq!(skills.hard_skills, vec!["Microsoft Excel", "Akuntansi"]);
        assert_eq!(skills.soft_skills, vec!["Komunikasi"]);
    }

    #[test]
    fn unreadable_category_text_is_kept() {
        let body = "Technical Skills: Go, Rust\n\
                    Hobbies\n\
                    Restoring old motorcycles with my father on most weekends";
        let skills = skills(body);
        assert_eq!(skills.hard_skills, vec!["Go", "Rust"]);
        assert!(skills.interests.is_empty());
        assert_eq!(skills.unparsed, vec!["Restoring old motorcycles with my father on most weekends"]);
    }

    #[test]
    fn prose_falls_back_to_keyword_scan() {
        let body = "I have spent the last several years building services in python and docker \
                    while mentoring a team with strong communication across many projects";
        let skills = skills(body);
        assert_eq!(skills.hard_skills, vec!["python", "docker", "communication"]);
        assert_eq!(skills.unparsed, vec![body.to_string()]);
    }

    #[test]
    fn label_requires_a_word_boundary() {
        assert!(match_label("Technical writing").is_none());
        assert_eq!(match_label("Tools | Git").map(|(c, rest)| (c, rest.to_string())), Some((Category::Hard, "Git".to_string())));
        assert_eq!(match_label("INTERESTS").map(|(c, _)| c), Some(Category::Interests));
    }

    #[test]
    fn nothing_recognizable_returns_the_text() {
        let body = "A very long paragraph that says nothing about any particular ability at all really";
        assert_eq!(extract_skills(body), Extraction::Unparsed(body.to_string()));
        assert_eq!(extract_skills(""), Extraction::Unparsed(String::new()));
    }

    #[test]
    fn odd_input_never_panics_or_yields_blank_items() {
        let long_commas = ",".repeat(10_000);
        let long_list = "a, ".repeat(5_000);
        for body in ["•••", ":::", "\u{212A}ills:", "Technical:", "- \n•\n1.", long_commas.as_str(), long_list.as_str()] {
            if let Extraction::Structured(skills) = extract_skills(body) {
                let mut items = skills.hard_skills.iter().chain(&skills.soft_skills).chain(&skills.interests);
                assert!(items.all(|item| !item.trim().is_empty()), "blank item from {body:?}");
            }
        }
        assert_eq!(extract_skills(&long_commas), Extraction::Unparsed(long_commas.clone()));
        assert_eq!(skills(&long_list).hard_skills, vec!["a"]);
    }
}
