use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::tags::{Tag, TagCategory};

/// Tag values grouped by category. Every known category is present, empty
/// when no tag carries its prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchFilters {
    buckets: BTreeMap<String, Vec<String>>,
}

impl SearchFilters {
    pub fn values(&self, category: TagCategory) -> &[String] {
        self.buckets
            .get(category.filter_key())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.buckets.get(key).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }
}

/// Partitions `tags` into per-category value lists, keeping input order and
/// stripping the `"<category> "` prefix.
pub fn build_search_filters(tags: &[Tag]) -> SearchFilters {
    let mut buckets: BTreeMap<String, Vec<String>> = TagCategory::ALL
        .iter()
        .map(|category| (category.filter_key().to_string(), Vec::new()))
        .collect();

    for tag in tags {
        for category in TagCategory::ALL {
            let Some(value) = tag
                .as_str()
                .strip_prefix(category.as_str())
                .and_then(|rest| rest.strip_prefix(' '))
            else {
                continue;
            };
            if let Some(bucket) = buckets.get_mut(category.filter_key()) {
                bucket.push(value.to_string());
            }
        }
    }

    SearchFilters { buckets }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(category: TagCategory, value: &str) -> Tag {
        Tag::new(category, value).unwrap()
    }

    #[test]
    fn every_category_key_is_present() {
        let filters = build_search_filters(&[]);
        for category in TagCategory::ALL {
            assert_eq!(filters.get(category.filter_key()), Some(&[][..]));
        }
        assert_eq!(filters.keys().count(), TagCategory::ALL.len());
    }

    #[test]
    fn values_keep_input_order_without_prefix() {
        let tags = vec![
            tag(TagCategory::Skill, "rust"),
            tag(TagCategory::Location, "jakarta"),
            tag(TagCategory::Skill, "go"),
            tag(TagCategory::SoftSkill, "leadership"),
        ];
        let filters = build_search_filters(&tags);

        assert_eq!(filters.values(TagCategory::Skill), ["rust", "go"]);
        assert_eq!(filters.values(TagCategory::SoftSkill), ["leadership"]);
        assert_eq!(filters.values(TagCategory::Location), ["jakarta"]);
        assert!(filters.values(TagCategory::Country).is_empty());
    }

    #[test]
    fn normalized_skill_round_trips_into_bucket() {
        let record: crate::core::record::CandidateRecord =
            serde_json::from_value(serde_json::json!({"hardSkills": "React, Node.js"})).unwrap();
        let tags = crate::core::tags::normalize_tags(&record);
        let filters = build_search_filters(&tags);

        assert!(tags.iter().any(|tag| tag.as_str() == "skill react"));
        assert!(filters.values(TagCategory::Skill).iter().any(|v| v == "react"));
    }

    #[test]
    fn uncategorized_tags_land_nowhere() {
        let tags = vec![Tag::from_free_form("open source contributor").unwrap()];
        let filters = build_search_filters(&tags);
        assert!(TagCategory::ALL
            .iter()
            .all(|category| filters.values(*category).is_empty()));
    }

    #[test]
    fn serializes_as_flat_object() {
        let filters = build_search_filters(&[tag(TagCategory::Age, "25-34")]);
        let json = serde_json::to_value(&filters).unwrap();
        assert_eq!(json["ageBrackets"], serde_json::json!(["25-34"]));
        assert_eq!(json["skills"], serde_json::json!([]));
    }
}
