use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::CandidateRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletenessReport {
    pub is_complete: bool,
    pub missing: Vec<String>,
    pub suggestions: Vec<String>,
    pub completeness_score: i64,
}

/// High-value fields checked for tagging, with the advice shown when absent.
const HIGH_VALUE_FIELDS: &[(&str, &str)] = &[
    (
        "currentLocation",
        "Location information helps with geographical filtering",
    ),
    (
        "totalExperienceYears",
        "Experience duration helps categorize seniority level",
    ),
    (
        "hardSkills",
        "Technical skills are crucial for skill-based filtering",
    ),
    (
        "industryExperience",
        "Industry information helps match relevant opportunities",
    ),
];

/// Scores field coverage. For decoded records the total is every supplied key,
/// nulls included, plus any missing high-value field the input never named.
/// Parser-built records count their populated fields instead.
pub fn validate_completeness(record: &CandidateRecord) -> CompletenessReport {
    let mut missing = Vec::new();
    let mut suggestions = Vec::new();

    for (field, rationale) in HIGH_VALUE_FIELDS {
        let present = match *field {
            "currentLocation" => is_filled(record.current_location.as_deref()),
            "totalExperienceYears" => record.total_experience_years.is_some(),
            "hardSkills" => is_filled(record.hard_skills.as_deref()),
            "industryExperience" => is_filled(record.industry_experience.as_deref()),
            _ => true,
        };
        if !present {
            missing.push(field.to_string());
            suggestions.push(rationale.to_string());
        }
    }

    let total = match &record.supplied_keys {
        Some(keys) => keys.len() + missing.iter().filter(|field| !keys.contains(field.as_str())).count(),
        None => {
            let populated = serde_json::to_value(record)
                .map(|value| populated_fields(&value))
                .unwrap_or_default();
            populated + missing.len()
        }
    };
    let completeness_score = if total == 0 {
        0
    } else {
        (((total - missing.len()) as f64 / total as f64) * 100.0).round() as i64
    };

    CompletenessReport {
        is_complete: missing.is_empty(),
        missing,
        suggestions,
        completeness_score,
    }
}

fn is_filled(value: Option<&str>) -> bool {
    value.is_some_and(|value| !value.trim().is_empty())
}

fn populated_fields(value: &Value) -> usize {
    let Value::Object(fields) = value else {
        return 0;
    };
    fields
        .values()
        .filter(|field| match field {
            Value::Null => false,
            Value::String(text) => !text.trim().is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
            Value::Bool(_) | Value::Number(_) => true,
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> CandidateRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn reports_missing_fields_and_formula_score() {
        let report = validate_completeness(&record(json!({
            "firstName": "Ayu",
            "lastName": "Lestari",
            "email": "ayu@example.com",
            "phoneNumber": "+628111",
            "industryExperience": "Banking",
            "degree": "S1",
            "gender": "Female",
            "hardSkills": "   "
        })));

        assert_eq!(
            report.missing,
            vec!["currentLocation", "totalExperienceYears", "hardSkills"]
        );
        assert_eq!(report.suggestions.len(), 3);
        assert!(!report.is_complete);
        // 7 populated of 10 total
        assert_eq!(report.completeness_score, 70);
    }

    #[test]
    fn complete_record_scores_full() {
        let report = validate_completeness(&record(json!({
            "currentLocation": "Medan",
            "totalExperienceYears": 0,
            "hardSkills": "Excel",
            "industryExperience": "Retail"
        })));
        assert!(report.is_complete);
        assert!(report.missing.is_empty());
        assert_eq!(report.completeness_score, 100);
    }

    #[test]
    fn null_keys_count_toward_total() {
        let report = validate_completeness(&record(json!({
            "firstName": "Rina",
            "lastName": "Wijaya",
            "email": "rina@example.com",
            "phoneNumber": "+628122",
            "industryExperience": "Logistics",
            "degree": "S1",
            "gender": null,
            "currentLocation": null,
            "totalExperienceYears": null,
            "hardSkills": null
        })));

        assert_eq!(report.missing.len(), 3);
        // 7 of 10 keys
        assert_eq!(report.completeness_score, 70);
    }

    #[test]
    fn pass_through_keys_count_toward_total() {
        let report = validate_completeness(&record(json!({
            "hardSkills": "Go",
            "industryExperience": "Tech",
            "portfolioNotes": "see site",
            "emptyExtra": null
        })));
        // 4 keys + 2 missing fields never supplied
        assert_eq!(report.completeness_score, 67);
    }

    #[test]
    fn parsed_records_count_populated_fields() {
        let parsed = CandidateRecord {
            first_name: Some("Dewi".to_string()),
            current_location: Some("Surabaya".to_string()),
            hard_skills: Some("SQL".to_string()),
            ..CandidateRecord::default()
        };
        let report = validate_completeness(&parsed);
        // 3 populated + 2 missing
        assert_eq!(report.completeness_score, 60);
    }

    #[test]
    fn empty_record_scores_zero() {
        let report = validate_completeness(&CandidateRecord::default());
        assert_eq!(report.missing.len(), 4);
        assert_eq!(report.completeness_score, 0);
    }
}
