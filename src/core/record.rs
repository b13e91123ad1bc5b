//! The loosely-typed candidate record shared by the heuristic parser and
//! external extraction services.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::models::{DateRange, EducationEntry, ExperienceEntry, ParsedResume};
use super::vocabulary::{
    canonical_country, line_contains_phrase, EducationLevel, COUNTRY_ALIASES, COUNTRY_REGIONS,
    DEGREE_KEYWORDS, KNOWN_CITIES,
};

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?\d+(?:[.,]\d+)?").unwrap());

/// Multi-value fields hold comma-delimited strings; numeric and boolean fields
/// accept their string spellings. Keys this struct does not know are kept in
/// `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self", rename_all = "camelCase", default)]
pub struct CandidateRecord {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub current_location: Option<String>,
    pub current_country: Option<String>,
    pub nationality: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    #[serde(deserialize_with = "number_or_string")]
    pub age: Option<f64>,

    pub summary: Option<String>,
    #[serde(deserialize_with = "number_or_string")]
    pub total_experience_years: Option<f64>,
    pub experience_level: Option<String>,
    pub recent_job_title: Option<String>,
    pub recent_job_company: Option<String>,

    pub highest_education: Option<String>,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub institution: Option<String>,

    #[serde(deserialize_with = "string_or_list")]
    pub hard_skills: Option<String>,
    #[serde(deserialize_with = "string_or_list")]
    pub soft_skills: Option<String>,
    #[serde(deserialize_with = "string_or_list")]
    pub languages: Option<String>,
    #[serde(deserialize_with = "string_or_list")]
    pub certifications: Option<String>,
    #[serde(deserialize_with = "string_or_list")]
    pub industry_experience: Option<String>,
    #[serde(deserialize_with = "string_or_list")]
    pub interests: Option<String>,

    #[serde(deserialize_with = "scalar_string")]
    pub expected_salary: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub current_salary: Option<String>,
    pub remote_work_preference: Option<String>,
    #[serde(deserialize_with = "bool_or_string")]
    pub willing_to_relocate: Option<bool>,
    #[serde(deserialize_with = "bool_or_string")]
    pub management_experience: Option<bool>,
    #[serde(deserialize_with = "scalar_string")]
    pub notice_period: Option<String>,

    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub portfolio_url: Option<String>,

    pub work_experience: Vec<WorkHistoryItem>,
    pub education: Vec<EducationHistoryItem>,
    #[serde(deserialize_with = "list_or_string")]
    pub tags: Vec<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,

    /// Keys present in the decoded JSON, nulls included. `None` for records
    /// built by the parser.
    #[serde(skip)]
    pub supplied_keys: Option<BTreeSet<String>>,
}

impl Serialize for CandidateRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        CandidateRecord::serialize(self, serializer)
    }
}

/// Remembers which keys the input carried before decoding the fields.
impl<'de> Deserialize<'de> for CandidateRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let keys = match &value {
            Value::Object(fields) => Some(fields.keys().cloned().collect()),
            _ => None,
        };
        let mut record = CandidateRecord::deserialize(value).map_err(serde::de::Error::custom)?;
        record.supplied_keys = keys;
        Ok(record)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkHistoryItem {
    pub company: Option<String>,
    #[serde(alias = "jobTitle", alias = "title")]
    pub position: Option<String>,
    pub location: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub start_date: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub end_date: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationHistoryItem {
    pub institution: Option<String>,
    pub degree: Option<String>,
    #[serde(alias = "major")]
    pub field_of_study: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub start_date: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub end_date: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub gpa: Option<String>,
}

impl CandidateRecord {
    /// Builds a record from a heuristic parse. `as_of` closes open-ended
    /// ("Present") experience ranges.
    pub fn from_parsed(parsed: &ParsedResume, as_of: NaiveDate) -> Self {
        let contact = &parsed.contact;
        let mut record = CandidateRecord {
            email: contact.email.clone(),
            phone_number: contact.phone_e164.clone().or_else(|| contact.phone.clone()),
            linkedin_url: contact.linkedin.clone(),
            github_url: contact.github.clone(),
            portfolio_url: contact.websites.first().cloned(),
            summary: parsed.summary.clone(),
            expected_salary: parsed.salary.clone(),
            ..CandidateRecord::default()
        };

        if let Some(name) = contact.name.as_deref() {
            let mut words = name.split_whitespace();
            record.first_name = words.next().map(str::to_string);
            record.last_name = Some(words.collect::<Vec<_>>().join(" ")).filter(|s| !s.is_empty());
        }

        if let Some(location) = contact.location.as_deref() {
            let (current_location, current_country) = resolve_location(location);
            record.current_location = Some(current_location);
            record.current_country = current_country.map(str::to_string);
        }

        if let Some(skills) = parsed.skills.as_ref().and_then(|skills| skills.structured()) {
            record.hard_skills = join_items(&skills.hard_skills);
            record.soft_skills = join_items(&skills.soft_skills);
            record.interests = join_items(&skills.interests);
        }
        if record.interests.is_none() {
            record.interests = parsed.interests.as_deref().and_then(items_from_text);
        }

        let jobs = parsed
            .experience
            .as_ref()
            .and_then(|experience| experience.structured())
            .map(Vec::as_slice)
            .unwrap_or_default();
        if let Some(recent) = most_recent_job(jobs) {
            record.recent_job_title = recent.job_title.clone();
            record.recent_job_company = recent.company.clone();
        }
        record.total_experience_years = total_experience_years(jobs, as_of);
        record.work_experience = jobs.iter().map(WorkHistoryItem::from).collect();

        let schools = parsed
            .education
            .as_ref()
            .and_then(|education| education.structured())
            .map(Vec::as_slice)
            .unwrap_or_default();
        if let Some((level, entry)) = highest_education(schools) {
            record.highest_education = Some(level.label().to_string());
            record.degree = entry.degree.clone();
            record.field_of_study = entry.field_of_study.clone();
            record.institution = entry.institution.clone();
        }
        record.education = schools.iter().map(EducationHistoryItem::from).collect();

        record.languages = parsed.languages.as_deref().and_then(items_from_text);
        record.certifications = parsed.achievements.as_deref().and_then(|text| {
            let certificates: Vec<String> = list_lines(text)
                .into_iter()
                .filter(|line| {
                    let lowered = line.to_lowercase();
                    lowered.contains("certif") || lowered.contains("sertifika")
                })
                .collect();
            join_items(&certificates)
        });

        record
    }
}

impl From<&ExperienceEntry> for WorkHistoryItem {
    fn from(entry: &ExperienceEntry) -> Self {
        let (start_date, end_date) = range_bounds(entry.dates.as_ref());
        WorkHistoryItem {
            company: entry.company.clone(),
            position: entry.job_title.clone(),
            location: entry.location.clone(),
            start_date,
            end_date,
            description: Some(entry.responsibilities.join("\n")).filter(|d| !d.is_empty()),
        }
    }
}

impl From<&EducationEntry> for EducationHistoryItem {
    fn from(entry: &EducationEntry) -> Self {
        let (start_date, end_date) = range_bounds(entry.dates.as_ref());
        EducationHistoryItem {
            institution: entry.institution.clone(),
            degree: entry.degree.clone(),
            field_of_study: entry.field_of_study.clone(),
            start_date,
            end_date,
            gpa: entry.gpa.clone(),
        }
    }
}

fn range_bounds(range: Option<&DateRange>) -> (Option<String>, Option<String>) {
    let Some(range) = range else {
        return (None, None);
    };
    let start = range.start.map(|date| date.format("%Y-%m").to_string());
    let end = if range.is_current {
        Some("Present".to_string())
    } else {
        range.end.map(|date| date.format("%Y-%m").to_string())
    };
    (start, end)
}

/// A known city becomes the location and implies its country; otherwise the
/// text is kept and a country is looked for inside it.
fn resolve_location(location: &str) -> (String, Option<&'static str>) {
    if let Some((city, country)) = KNOWN_CITIES
        .iter()
        .find(|(city, _)| line_contains_phrase(location, &city.to_lowercase()))
    {
        return (city.to_string(), Some(*country));
    }

    let country = COUNTRY_REGIONS
        .iter()
        .map(|(country, _, _)| country.to_lowercase())
        .chain(COUNTRY_ALIASES.iter().map(|(alias, _)| alias.to_string()))
        .find(|candidate| line_contains_phrase(location, candidate))
        .and_then(|candidate| canonical_country(&candidate));
    (location.trim().to_string(), country)
}

/// Current jobs first, then the latest start; ties keep document order.
fn most_recent_job(jobs: &[ExperienceEntry]) -> Option<&ExperienceEntry> {
    jobs.iter().min_by_key(|job| {
        let dates = job.dates.as_ref();
        Reverse((
            dates.is_some_and(|range| range.is_current),
            dates.and_then(|range| range.start),
        ))
    })
}

/// Length of the union of dated intervals, in years to one decimal.
fn total_experience_years(jobs: &[ExperienceEntry], as_of: NaiveDate) -> Option<f64> {
    let mut intervals: Vec<(NaiveDate, NaiveDate)> = jobs
        .iter()
        .filter_map(|job| {
            let range = job.dates.as_ref()?;
            let start = range.start?;
            let end = if range.is_current { as_of } else { range.end? };
            let end = end.min(as_of);
            (end > start).then_some((start, end))
        })
        .collect();
    if intervals.is_empty() {
        return None;
    }
    intervals.sort();

    let mut days = 0i64;
    let (mut open_start, mut open_end) = intervals[0];
    for &(start, end) in &intervals[1..] {
        if start <= open_end {
            open_end = open_end.max(end);
        } else {
            days += (open_end - open_start).num_days();
            (open_start, open_end) = (start, end);
        }
    }
    days += (open_end - open_start).num_days();

    Some((days as f64 / 365.25 * 10.0).round() / 10.0)
}

fn highest_education(schools: &[EducationEntry]) -> Option<(EducationLevel, &EducationEntry)> {
    schools
        .iter()
        .filter_map(|entry| {
            let degree = entry.degree.as_deref()?;
            DEGREE_KEYWORDS
                .iter()
                .filter(|(keyword, _)| line_contains_phrase(degree, keyword))
                .map(|(_, level)| *level)
                .max()
                .map(|level| (level, entry))
        })
        .fold(None, |best: Option<(EducationLevel, &EducationEntry)>, candidate| {
            match best {
                Some(current) if current.0 >= candidate.0 => Some(current),
                _ => Some(candidate),
            }
        })
}

fn list_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(['•', '-', '*', '·', '▪', '●', '◦', '‣', '>'])
                .trim()
                .to_string()
        })
        .filter(|line| !line.is_empty())
        .collect()
}

fn items_from_text(text: &str) -> Option<String> {
    let items: Vec<String> = list_lines(text)
        .iter()
        .flat_map(|line| line.split([',', ';']))
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();
    join_items(&items)
}

fn join_items(items: &[String]) -> Option<String> {
    Some(items.join(", ")).filter(|joined| !joined.is_empty())
}

fn number_or_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => NUMBER_RE
            .find(&text)
            .and_then(|m| m.as_str().replace(',', ".").parse().ok()),
        _ => None,
    })
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => {
            let items: Vec<String> = items.iter().filter_map(scalar_text).collect();
            join_items(&items)
        }
        Some(other) => scalar_text(&other),
        None => None,
    })
}

fn list_or_string<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        Some(Value::String(text)) => text
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    })
}

fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_text))
}

fn bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(flag)) => Some(flag),
        Some(Value::Number(number)) => number.as_f64().map(|n| n != 0.0),
        Some(Value::String(text)) => match text.trim().to_lowercase().as_str() {
            "true" | "yes" | "y" | "ya" | "1" => Some(true),
            "false" | "no" | "n" | "tidak" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => return None,
    };
    Some(text).filter(|text| !text.is_empty())
}
