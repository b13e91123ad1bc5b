//! Categorized tag generation from a candidate record.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::record::CandidateRecord;
use super::search_filters::{build_search_filters, SearchFilters};
use super::smart_tags::suggest_smart_tags;
use super::vocabulary::{
    COUNTRY_REGIONS, EDUCATION_LEVELS, EXPERIENCE_LEVELS, EXPERIENCE_YEAR_RANGES, INDUSTRIES,
    KNOWN_CITIES, SALARY_RANGES_IDR, WORK_LOCATIONS, WORK_TYPES,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagCategory {
    Location,
    Country,
    Skill,
    SoftSkill,
    Experience,
    Level,
    Education,
    Degree,
    Industry,
    WorkType,
    Language,
    Certification,
    Salary,
    Availability,
    Gender,
    Nationality,
    General,
    Region,
    Market,
    Stack,
    Specialization,
    Role,
    Career,
    Mobility,
    Preference,
    Age,
}

impl TagCategory {
    pub const ALL: [TagCategory; 26] = [
        TagCategory::Location,
        TagCategory::Country,
        TagCategory::Skill,
        TagCategory::SoftSkill,
        TagCategory::Experience,
        TagCategory::Level,
        TagCategory::Education,
        TagCategory::Degree,
        TagCategory::Industry,
        TagCategory::WorkType,
        TagCategory::Language,
        TagCategory::Certification,
        TagCategory::Salary,
        TagCategory::Availability,
        TagCategory::Gender,
        TagCategory::Nationality,
        TagCategory::General,
        TagCategory::Region,
        TagCategory::Market,
        TagCategory::Stack,
        TagCategory::Specialization,
        TagCategory::Role,
        TagCategory::Career,
        TagCategory::Mobility,
        TagCategory::Preference,
        TagCategory::Age,
    ];

    /// The prefix word written in front of every tag of this category.
    pub fn as_str(self) -> &'static str {
        match self {
            TagCategory::Location => "location",
            TagCategory::Country => "country",
            TagCategory::Skill => "skill",
            TagCategory::SoftSkill => "softskill",
            TagCategory::Experience => "experience",
            TagCategory::Level => "level",
            TagCategory::Education => "education",
            TagCategory::Degree => "degree",
            TagCategory::Industry => "industry",
            TagCategory::WorkType => "worktype",
            TagCategory::Language => "language",
            TagCategory::Certification => "certification",
            TagCategory::Salary => "salary",
            TagCategory::Availability => "availability",
            TagCategory::Gender => "gender",
            TagCategory::Nationality => "nationality",
            TagCategory::General => "general",
            TagCategory::Region => "region",
            TagCategory::Market => "market",
            TagCategory::Stack => "stack",
            TagCategory::Specialization => "specialization",
            TagCategory::Role => "role",
            TagCategory::Career => "career",
            TagCategory::Mobility => "mobility",
            TagCategory::Preference => "preference",
            TagCategory::Age => "age",
        }
    }

    /// Key of this category's bucket in [`SearchFilters`].
    pub fn filter_key(self) -> &'static str {
        match self {
            TagCategory::Location => "locations",
            TagCategory::Country => "countries",
            TagCategory::Skill => "skills",
            TagCategory::SoftSkill => "softSkills",
            TagCategory::Experience => "experienceRanges",
            TagCategory::Level => "experienceLevels",
            TagCategory::Education => "educationLevels",
            TagCategory::Degree => "degrees",
            TagCategory::Industry => "industries",
            TagCategory::WorkType => "workTypes",
            TagCategory::Language => "languages",
            TagCategory::Certification => "certifications",
            TagCategory::Salary => "salaryRanges",
            TagCategory::Availability => "availability",
            TagCategory::Gender => "genders",
            TagCategory::Nationality => "nationalities",
            TagCategory::General => "general",
            TagCategory::Region => "regions",
            TagCategory::Market => "markets",
            TagCategory::Stack => "stacks",
            TagCategory::Specialization => "specializations",
            TagCategory::Role => "roles",
            TagCategory::Career => "careers",
            TagCategory::Mobility => "mobility",
            TagCategory::Preference => "preferences",
            TagCategory::Age => "ageBrackets",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<TagCategory> {
        TagCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == prefix)
    }
}

impl fmt::Display for TagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized `"<category> <value>"` string: lower-case, single-spaced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(String);

impl Tag {
    /// Builds a categorized tag, or `None` when the value is blank.
    pub fn new(category: TagCategory, value: &str) -> Option<Tag> {
        let value = normalize_words(value);
        if value.is_empty() {
            return None;
        }
        Some(Tag(format!("{} {}", category.as_str(), value)))
    }

    /// Folds a caller-supplied tag into the vocabulary. Single words land in
    /// the `general` category; longer tags pass through lower-cased.
    pub fn from_free_form(raw: &str) -> Option<Tag> {
        let normalized = normalize_words(raw);
        if normalized.is_empty() {
            return None;
        }
        if !normalized.contains(' ') {
            return Tag::new(TagCategory::General, &normalized);
        }
        Some(Tag(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn category(&self) -> Option<TagCategory> {
        self.0
            .split_once(' ')
            .and_then(|(prefix, _)| TagCategory::from_prefix(prefix))
    }

    /// The part after the category prefix, or the whole tag when it has none.
    pub fn value(&self) -> &str {
        match self.category() {
            Some(category) => &self.0[category.as_str().len() + 1..],
            None => &self.0,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn normalize_words(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Buckets a years-of-experience figure into one of the fixed ranges.
pub fn experience_range(years: f64) -> &'static str {
    if years < 1.0 {
        "0-1 years"
    } else if years < 2.0 {
        "1-2 years"
    } else if years < 3.0 {
        "2-3 years"
    } else if years < 5.0 {
        "3-5 years"
    } else if years < 7.0 {
        "5-7 years"
    } else if years < 10.0 {
        "7-10 years"
    } else {
        "10+ years"
    }
}

/// Maps every populated field of `record` to its category tags. The result is
/// deduplicated and sorted.
pub fn normalize_tags(record: &CandidateRecord) -> Vec<Tag> {
    let mut tags = BTreeSet::new();
    let mut push = |category: TagCategory, value: Option<&str>| {
        if let Some(tag) = value.and_then(|value| Tag::new(category, value)) {
            tags.insert(tag);
        }
    };

    push(TagCategory::Location, record.current_location.as_deref());
    push(TagCategory::Country, record.current_country.as_deref());
    if let Some(years) = record
        .total_experience_years
        .filter(|years| years.is_finite() && *years >= 0.0)
    {
        push(TagCategory::Experience, Some(experience_range(years)));
    }
    push(TagCategory::Level, record.experience_level.as_deref());
    push(TagCategory::Education, record.highest_education.as_deref());
    push(TagCategory::Degree, record.degree.as_deref());
    push(TagCategory::Role, record.recent_job_title.as_deref());
    push(TagCategory::WorkType, record.remote_work_preference.as_deref());
    push(TagCategory::Salary, record.expected_salary.as_deref());
    push(TagCategory::Availability, record.notice_period.as_deref());
    push(TagCategory::Gender, record.gender.as_deref());
    push(TagCategory::Nationality, record.nationality.as_deref());

    let delimited = [
        (TagCategory::Skill, &record.hard_skills),
        (TagCategory::SoftSkill, &record.soft_skills),
        (TagCategory::Language, &record.languages),
        (TagCategory::Certification, &record.certifications),
        (TagCategory::Industry, &record.industry_experience),
    ];
    for (category, field) in delimited {
        for item in field.as_deref().unwrap_or_default().split(',') {
            push(category, Some(item));
        }
    }

    if record.management_experience == Some(true) {
        push(TagCategory::Career, Some("management experience"));
    }
    if record.willing_to_relocate == Some(true) {
        push(TagCategory::Preference, Some("willing to relocate"));
    }

    tags.extend(record.tags.iter().filter_map(|raw| Tag::from_free_form(raw)));
    tags.into_iter().collect()
}

/// Full tag output for one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaggedRecord {
    pub tags: Vec<Tag>,
    pub total_tags: usize,
    pub search_filters: SearchFilters,
}

/// Normalized and suggested tags merged into one sorted set, with the
/// matching filter buckets.
pub fn tag_record(record: &CandidateRecord) -> TaggedRecord {
    let tags: Vec<Tag> = normalize_tags(record)
        .into_iter()
        .chain(suggest_smart_tags(record))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let search_filters = build_search_filters(&tags);
    TaggedRecord {
        total_tags: tags.len(),
        tags,
        search_filters,
    }
}

/// Predefined values offered to filter UIs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagCatalogue {
    pub experience_levels: Vec<&'static str>,
    pub experience_years: Vec<&'static str>,
    pub education_levels: Vec<&'static str>,
    pub work_types: Vec<&'static str>,
    pub work_locations: Vec<&'static str>,
    pub salary_ranges_idr: Vec<&'static str>,
    pub industries: Vec<&'static str>,
    pub countries: Vec<&'static str>,
    pub indonesian_cities: Vec<&'static str>,
}

pub fn tag_catalogue() -> TagCatalogue {
    TagCatalogue {
        experience_levels: EXPERIENCE_LEVELS.to_vec(),
        experience_years: EXPERIENCE_YEAR_RANGES.to_vec(),
        education_levels: EDUCATION_LEVELS.to_vec(),
        work_types: WORK_TYPES.to_vec(),
        work_locations: WORK_LOCATIONS.to_vec(),
        salary_ranges_idr: SALARY_RANGES_IDR.to_vec(),
        industries: INDUSTRIES.to_vec(),
        countries: COUNTRY_REGIONS.iter().map(|(country, _, _)| *country).collect(),
        indonesian_cities: KNOWN_CITIES
            .iter()
            .filter(|(_, country)| *country == "Indonesia")
            .map(|(city, _)| *city)
            .collect(),
    }
}
