use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::completeness::CompletenessReport;
use super::record::CandidateRecord;
use super::search_filters::SearchFilters;
use super::tags::Tag;

/// Primary language of a document, used to rank header vocabularies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "EN")]
    English,
    #[default]
    #[serde(rename = "ID")]
    Indonesian,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Indonesian];

    pub fn code(self) -> &'static str {
        match self {
            Language::English => "EN",
            Language::Indonesian => "ID",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SectionKind {
    Contact,
    Profile,
    Experience,
    Education,
    Skills,
    Achievements,
    Languages,
    Interests,
    Organizations,
}

impl SectionKind {
    pub const ALL: [SectionKind; 9] = [
        SectionKind::Contact,
        SectionKind::Profile,
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::Achievements,
        SectionKind::Languages,
        SectionKind::Interests,
        SectionKind::Organizations,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::Contact => "CONTACT",
            SectionKind::Profile => "PROFILE",
            SectionKind::Experience => "EXPERIENCE",
            SectionKind::Education => "EDUCATION",
            SectionKind::Skills => "SKILLS",
            SectionKind::Achievements => "ACHIEVEMENTS",
            SectionKind::Languages => "LANGUAGES",
            SectionKind::Interests => "INTERESTS",
            SectionKind::Organizations => "ORGANIZATIONS",
        }
    }
}

/// Section bodies keyed by category. Built once by the segmenter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionMap {
    sections: BTreeMap<SectionKind, String>,
}

impl SectionMap {
    /// Body of a section whose header was found, possibly empty.
    pub fn get(&self, kind: SectionKind) -> Option<&str> {
        self.sections.get(&kind).map(String::as_str)
    }

    /// Body of a section, treating a header with nothing under it as absent.
    pub fn body(&self, kind: SectionKind) -> Option<&str> {
        self.get(kind).filter(|body| !body.trim().is_empty())
    }

    pub fn contains(&self, kind: SectionKind) -> bool {
        self.sections.contains_key(&kind)
    }

    pub fn kinds(&self) -> Vec<SectionKind> {
        self.sections.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub(crate) fn append(&mut self, kind: SectionKind, body: String) {
        match self.sections.get_mut(&kind) {
            Some(existing) if !existing.is_empty() => {
                if !body.is_empty() {
                    existing.push_str("\n\n");
                    existing.push_str(&body);
                }
            }
            Some(existing) => *existing = body,
            None => {
                self.sections.insert(kind, body);
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub phone_e164: Option<String>,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    #[serde(default)]
    pub websites: Vec<String>,
}

/// A date span as written, plus whatever could be parsed out of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub raw: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub is_current: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub dates: Option<DateRange>,
    pub gpa: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
    pub raw: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub company: Option<String>,
    pub location: Option<String>,
    pub dates: Option<DateRange>,
    pub job_title: Option<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    pub raw: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillSet {
    #[serde(default)]
    pub hard_skills: Vec<String>,
    #[serde(default)]
    pub soft_skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    /// Lines of the section that no layout turned into items.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unparsed: Vec<String>,
}

impl SkillSet {
    /// True when no category holds an item; `unparsed` is not counted.
    pub fn is_empty(&self) -> bool {
        self.hard_skills.is_empty() && self.soft_skills.is_empty() && self.interests.is_empty()
    }
}

/// Extractor output: structured entries, or the section text when nothing
/// structured could be recovered from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Extraction<T> {
    Structured(T),
    Unparsed(String),
}

impl<T> Extraction<T> {
    pub fn structured(&self) -> Option<&T> {
        match self {
            Extraction::Structured(value) => Some(value),
            Extraction::Unparsed(_) => None,
        }
    }

    pub fn unparsed(&self) -> Option<&str> {
        match self {
            Extraction::Structured(_) => None,
            Extraction::Unparsed(raw) => Some(raw),
        }
    }
}

/// Everything the heuristic pipeline recovered from one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedResume {
    pub detected_language: Language,
    pub contact: ContactInfo,
    pub summary: Option<String>,
    pub education: Option<Extraction<Vec<EducationEntry>>>,
    pub experience: Option<Extraction<Vec<ExperienceEntry>>>,
    pub skills: Option<Extraction<SkillSet>>,
    pub organizations: Option<Extraction<Vec<ExperienceEntry>>>,
    pub achievements: Option<String>,
    pub languages: Option<String>,
    pub interests: Option<String>,
    pub salary: Option<String>,
    #[serde(default)]
    pub sections: Vec<SectionKind>,
    pub used_fallback: bool,
}

/// One file processed by the batch parser.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDocument {
    pub source_file: Option<String>,
    pub resume: Option<ParsedResume>,
    pub record: Option<CandidateRecord>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub search_filters: Option<SearchFilters>,
    pub completeness: Option<CompletenessReport>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ParsedDocument {
    pub fn empty(source_file: Option<String>, errors: Vec<String>) -> Self {
        Self {
            source_file,
            resume: None,
            record: None,
            tags: Vec::new(),
            search_filters: None,
            completeness: None,
            errors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractorSettings {
    pub name_scan_lines: usize,
    pub location_scan_lines: usize,
    pub experience_window: usize,
    pub education_window: usize,
    pub skills_window: usize,
    pub default_calling_code: String,
    pub max_text_chars: usize,
    pub max_concurrent_documents: usize,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            name_scan_lines: 5,
            location_scan_lines: 15,
            experience_window: 2000,
            education_window: 1500,
            skills_window: 1000,
            default_calling_code: "62".to_string(),
            max_text_chars: 20_000,
            max_concurrent_documents: 4,
        }
    }
}

impl ExtractorSettings {
    pub fn sanitized(mut self) -> Self {
        self.name_scan_lines = self.name_scan_lines.max(1);
        self.location_scan_lines = self.location_scan_lines.max(1);
        self.experience_window = self.experience_window.max(1);
        self.education_window = self.education_window.max(1);
        self.skills_window = self.skills_window.max(1);
        self.max_text_chars = self.max_text_chars.max(1);
        self.max_concurrent_documents = self.max_concurrent_documents.max(1);
        let digits: String = self
            .default_calling_code
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        self.default_calling_code = if digits.is_empty() {
            Self::default().default_calling_code
        } else {
            digits
        };
        self
    }
}
