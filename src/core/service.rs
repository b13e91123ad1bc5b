use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use futures::stream::{self, StreamExt};
use serde::Serialize;

use super::completeness::{validate_completeness, CompletenessReport};
use super::document_parser::{decode_document, parse_resume_text};
use super::models::{ExtractorSettings, ParsedDocument};
use super::record::CandidateRecord;
use super::search_filters::SearchFilters;
use super::tags::{tag_record, Tag};

/// Tagging output for a record produced outside the heuristic parser.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordReport {
    pub tags: Vec<Tag>,
    pub search_filters: SearchFilters,
    pub total_tags: usize,
    pub completeness: CompletenessReport,
}

pub fn tag_external_record(record: &CandidateRecord) -> RecordReport {
    let tagged = tag_record(record);
    RecordReport {
        tags: tagged.tags,
        search_filters: tagged.search_filters,
        total_tags: tagged.total_tags,
        completeness: validate_completeness(record),
    }
}

/// Decodes, parses and tags one document. Failures end up in `errors`.
pub fn parse_document(
    file_name: &str,
    data: &[u8],
    settings: &ExtractorSettings,
    as_of: NaiveDate,
) -> ParsedDocument {
    let source_file = Some(file_name.to_string());
    let text = match decode_document(file_name, data) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(file = file_name, error = %format!("{err:#}"), "failed to decode document");
            return ParsedDocument::empty(source_file, vec![format!("{err:#}")]);
        }
    };

    let mut errors = Vec::new();
    if text.trim().is_empty() {
        tracing::warn!(file = file_name, "document has no extractable text");
        errors.push(format!("No extractable text in {file_name}"));
    }

    let resume = parse_resume_text(&text, settings);
    let record = CandidateRecord::from_parsed(&resume, as_of);
    let tagged = tag_record(&record);
    let completeness = validate_completeness(&record);

    ParsedDocument {
        source_file,
        resume: Some(resume),
        record: Some(record),
        tags: tagged.tags,
        search_filters: Some(tagged.search_filters),
        completeness: Some(completeness),
        errors,
    }
}

pub struct BatchParser {
    settings: ExtractorSettings,
}

impl BatchParser {
    pub fn new(settings: ExtractorSettings) -> Self {
        Self {
            settings: settings.sanitized(),
        }
    }

    pub fn settings(&self) -> &ExtractorSettings {
        &self.settings
    }

    /// Parses every file, at most `max_concurrent_documents` at a time, and
    /// returns the results in input order.
    pub async fn parse_files(&self, paths: &[PathBuf]) -> Vec<ParsedDocument> {
        let as_of = Local::now().date_naive();
        let max_concurrency = self.settings.max_concurrent_documents.max(1);
        tracing::info!(files = paths.len(), max_concurrency, "starting batch");

        let mut results: Vec<(usize, ParsedDocument)> = stream::iter(paths.iter().enumerate())
            .map(|(index, path)| async move { (index, self.parse_file(path, as_of).await) })
            .buffer_unordered(max_concurrency)
            .collect()
            .await;
        results.sort_by_key(|(index, _)| *index);

        let failed = results.iter().filter(|(_, doc)| doc.resume.is_none()).count();
        tracing::info!(files = results.len(), failed, "batch finished");
        results.into_iter().map(|(_, doc)| doc).collect()
    }

    pub async fn parse_file(&self, path: &Path, as_of: NaiveDate) -> ParsedDocument {
        let file_name = path
            .file_name()
            .and_then(|v| v.to_str())
            .unwrap_or("resume")
            .to_string();

        let data = match tokio::fs::read(path).await {
            Ok(data) => data,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to read file");
                return ParsedDocument::empty(
                    Some(file_name),
                    vec![format!("Failed to read {}: {err}", path.display())],
                );
            }
        };

        let settings = self.settings.clone();
        let name = file_name.clone();
        match tokio::task::spawn_blocking(move || parse_document(&name, &data, &settings, as_of)).await {
            Ok(document) => {
                tracing::debug!(file = %file_name, tags = document.tags.len(), "parsed document");
                document
            }
            Err(err) => ParsedDocument::empty(Some(file_name), vec![format!("Parse task failed: {err}")]),
        }
    }
}
