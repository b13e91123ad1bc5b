use super::record::CandidateRecord;
use super::tags::{Tag, TagCategory};
use super::vocabulary::{
    canonical_country, line_contains_phrase, BACKEND_MARKERS, COUNTRY_REGIONS, FRONTEND_MARKERS,
    KNOWN_CITIES, PRESTIGE_INSTITUTIONS, STACK_RULES,
};

/// Secondary tags inferred from combinations of record fields. Each rule reads
/// only the record; overlap with [`normalize_tags`](super::tags::normalize_tags)
/// output is left to the caller's set union.
pub fn suggest_smart_tags(record: &CandidateRecord) -> Vec<Tag> {
    let mut suggestions = Vec::new();
    suggestions.extend(region_tags(record));
    suggestions.extend(stack_tags(record));
    suggestions.extend(seniority_tags(record));
    suggestions.extend(mobility_tags(record));
    suggestions.extend(prestige_tags(record));
    suggestions.extend(age_tags(record));
    suggestions
}

fn region_tags(record: &CandidateRecord) -> Vec<Tag> {
    let Some(location) = non_blank(record.current_location.as_deref()) else {
        return Vec::new();
    };
    let country = record
        .current_country
        .as_deref()
        .and_then(canonical_country)
        .or_else(|| city_country(location));

    COUNTRY_REGIONS
        .iter()
        .find(|(name, _, _)| Some(*name) == country)
        .map(|(_, region, market)| {
            [
                Tag::new(TagCategory::Region, region),
                Tag::new(TagCategory::Market, market),
            ]
            .into_iter()
            .flatten()
            .collect()
        })
        .unwrap_or_default()
}

fn city_country(location: &str) -> Option<&'static str> {
    KNOWN_CITIES
        .iter()
        .find(|(city, _)| line_contains_phrase(location, &city.to_lowercase()))
        .map(|(_, country)| *country)
}

fn stack_tags(record: &CandidateRecord) -> Vec<Tag> {
    let Some(skills) = non_blank(record.hard_skills.as_deref()) else {
        return Vec::new();
    };
    let skills = skills.to_lowercase();

    let mut tags: Vec<Tag> = STACK_RULES
        .iter()
        .filter(|rule| {
            rule.all_of.iter().all(|needle| skills.contains(needle))
                && (rule.any_of.is_empty() || rule.any_of.iter().any(|needle| skills.contains(needle)))
        })
        .filter_map(|rule| Tag::new(rule.category, rule.value))
        .collect();

    let frontend = FRONTEND_MARKERS.iter().any(|marker| skills.contains(marker));
    let backend = BACKEND_MARKERS.iter().any(|marker| skills.contains(marker));
    let role = match (frontend, backend) {
        (true, true) => Some("full stack developer"),
        (true, false) => Some("frontend developer"),
        (false, true) => Some("backend developer"),
        (false, false) => None,
    };
    tags.extend(role.and_then(|role| Tag::new(TagCategory::Role, role)));
    tags
}

fn seniority_tags(record: &CandidateRecord) -> Vec<Tag> {
    let mut tags = Vec::new();

    if let Some(years) = record
        .total_experience_years
        .filter(|years| years.is_finite() && *years >= 0.0)
    {
        let stage = if years < 2.0 {
            "early career"
        } else if years < 5.0 {
            "mid career"
        } else if years < 10.0 {
            "experienced professional"
        } else {
            "veteran"
        };
        tags.extend(Tag::new(TagCategory::Career, stage));
    }

    let promoted = record.work_experience.iter().any(|job| {
        job.position
            .as_deref()
            .map(str::to_lowercase)
            .is_some_and(|position| position.contains("senior") || position.contains("lead"))
    });
    if record.work_experience.len() > 2 && promoted {
        tags.extend(Tag::new(TagCategory::Career, "progressive growth"));
    }
    tags
}

fn mobility_tags(record: &CandidateRecord) -> Vec<Tag> {
    let mut tags = Vec::new();
    if record.willing_to_relocate == Some(true) {
        tags.extend(Tag::new(TagCategory::Mobility, "flexible location"));
    }
    let remote = record
        .remote_work_preference
        .as_deref()
        .is_some_and(|preference| preference.trim().eq_ignore_ascii_case("remote"));
    if remote {
        tags.extend(Tag::new(TagCategory::Mobility, "remote ready"));
    }
    tags
}

fn prestige_tags(record: &CandidateRecord) -> Vec<Tag> {
    let mut institutions = record
        .education
        .iter()
        .filter_map(|entry| entry.institution.as_deref())
        .chain(record.institution.as_deref());
    let prestigious = institutions.any(|institution| {
        PRESTIGE_INSTITUTIONS
            .iter()
            .any(|name| line_contains_phrase(institution, name))
    });

    if prestigious {
        Tag::new(TagCategory::Education, "top university")
            .into_iter()
            .collect()
    } else {
        Vec::new()
    }
}

fn age_tags(record: &CandidateRecord) -> Vec<Tag> {
    let Some(age) = record.age.filter(|age| age.is_finite() && *age > 0.0) else {
        return Vec::new();
    };
    let bracket = if age < 25.0 {
        "under 25"
    } else if age < 35.0 {
        "25-34"
    } else if age < 45.0 {
        "35-44"
    } else {
        "45+"
    };
    Tag::new(TagCategory::Age, bracket).into_iter().collect()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn suggest(value: serde_json::Value) -> Vec<String> {
        let record: CandidateRecord = serde_json::from_value(value).unwrap();
        suggest_smart_tags(&record)
            .into_iter()
            .map(|tag| tag.as_str().to_string())
            .collect()
    }

    #[test]
    fn region_needs_country_and_location() {
        assert_eq!(
            suggest(json!({"currentCountry": "Indonesia", "currentLocation": "Surabaya"})),
            vec!["region southeast asia", "market asean"]
        );
        assert!(suggest(json!({"currentCountry": "Indonesia"})).is_empty());
        assert_eq!(
            suggest(json!({"currentLocation": "Berlin"})),
            vec!["region europe", "market emea"]
        );
    }

    #[test]
    fn stack_rules_fire_on_co_occurrence() {
        let tags = suggest(json!({"hardSkills": "MongoDB, Express, React, Node.js, AWS"}));
        for expected in [
            "stack full stack javascript",
            "stack mern",
            "specialization cloud computing",
            "role full stack developer",
        ] {
            assert!(tags.iter().any(|tag| tag == expected), "missing {expected}");
        }
        assert!(!tags.iter().any(|tag| tag == "stack mean"));

        let tags = suggest(json!({"hardSkills": "Docker"}));
        assert!(!tags.iter().any(|tag| tag == "specialization devops"));
    }

    #[test]
    fn seniority_follows_years_and_titles() {
        assert_eq!(suggest(json!({"totalExperienceYears": 1})), vec!["career early career"]);
        assert_eq!(suggest(json!({"totalExperienceYears": "12"})), vec!["career veteran"]);

        let tags = suggest(json!({
            "workExperience": [
                {"position": "Senior Engineer"},
                {"position": "Engineer"},
                {"jobTitle": "Intern"}
            ]
        }));
        assert_eq!(tags, vec!["career progressive growth"]);

        let tags = suggest(json!({"workExperience": [{"position": "Lead"}, {"position": "Dev"}]}));
        assert!(tags.is_empty());
    }

    #[test]
    fn mobility_prestige_and_age_rules_are_independent() {
        let tags = suggest(json!({
            "willingToRelocate": true,
            "remoteWorkPreference": "Remote",
            "education": [{"institution": "Institut Teknologi Bandung"}],
            "age": 29
        }));
        assert_eq!(
            tags,
            vec![
                "mobility flexible location",
                "mobility remote ready",
                "education top university",
                "age 25-34",
            ]
        );
    }

    #[test]
    fn prestige_matches_whole_words_only() {
        assert!(suggest(json!({"institution": "Politeknik Bitburg"})).is_empty());
        assert_eq!(
            suggest(json!({"institution": "ITB"})),
            vec!["education top university"]
        );
    }
}
