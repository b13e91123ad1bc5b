use std::io::{Cursor, Read};
use std::path::Path;

use anyhow::Context;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::Event;
use quick_xml::Reader;

use super::education::extract_education;
use super::errors::CoreError;
use super::experience::extract_experience;
use super::field_extractor::{extract_contact_with, extract_salary};
use super::language::detect_language;
use super::models::{ExtractorSettings, ParsedResume, SectionKind};
use super::pdf::extract_pdf_text;
use super::preprocess::preprocess_text;
use super::sections::segment_sections_with;
use super::skills::extract_skills;
use super::vocabulary::{contains_phrase, word_tokens};

const EDUCATION_HINTS: &[&str] = &[
    "university", "universitas", "college", "school", "institute", "institut", "bachelor", "master",
    "phd", "sarjana",
];
const EXPERIENCE_HINTS: &[&str] = &[
    "experience", "work", "employment", "company", "job", "pengalaman", "kerja",
];
const SKILLS_HINTS: &[&str] = &[
    "skills", "abilities", "competencies", "keahlian", "keterampilan",
];

/// Plain text of a `.pdf`, `.docx`, `.txt` or `.md` file.
pub fn decode_document(file_name: &str, data: &[u8]) -> anyhow::Result<String> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|v| v.to_str())
        .map(|v| v.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => extract_pdf_text(data).map_err(|err| decode_error(file_name, err)),
        "docx" => extract_docx_text(data).map_err(|err| decode_error(file_name, err)),
        "txt" | "md" => Ok(String::from_utf8_lossy(data).into_owned()),
        _ => Err(CoreError::UnsupportedFileType(file_name.to_string()).into()),
    }
}

fn decode_error(file_name: &str, err: anyhow::Error) -> anyhow::Error {
    CoreError::decode(file_name, format!("{err:#}")).into()
}

/// Runs the heuristic pipeline over one document's text. Never fails: what
/// cannot be structured is carried as raw text.
pub fn parse_resume_text(text: &str, settings: &ExtractorSettings) -> ParsedResume {
    let cleaned = preprocess_text(text);
    let cleaned = truncate_chars(&cleaned, settings.max_text_chars);

    let detected_language = detect_language(cleaned);
    let contact = extract_contact_with(cleaned, settings);
    let segmentation = segment_sections_with(cleaned, detected_language, settings);
    let sections = &segmentation.sections;
    let tokens = word_tokens(cleaned);

    let whole_document = |kind: SectionKind, hints: &[&str]| {
        let hinted = hints.iter().any(|hint| contains_phrase(&tokens, hint));
        if hinted {
            tracing::debug!(section = kind.as_str(), "section missing, extracting from the whole document");
        }
        hinted.then_some(cleaned)
    };

    let education = sections
        .body(SectionKind::Education)
        .or_else(|| whole_document(SectionKind::Education, EDUCATION_HINTS))
        .map(extract_education);
    let experience = sections
        .body(SectionKind::Experience)
        .or_else(|| whole_document(SectionKind::Experience, EXPERIENCE_HINTS))
        .map(extract_experience);
    let skills = sections
        .body(SectionKind::Skills)
        .or_else(|| whole_document(SectionKind::Skills, SKILLS_HINTS))
        .map(extract_skills);

    let owned = |kind: SectionKind| sections.body(kind).map(str::to_string);

    ParsedResume {
        detected_language,
        contact,
        summary: owned(SectionKind::Profile),
        education,
        experience,
        skills,
        organizations: sections.body(SectionKind::Organizations).map(extract_experience),
        achievements: owned(SectionKind::Achievements),
        languages: owned(SectionKind::Languages),
        interests: owned(SectionKind::Interests),
        salary: extract_salary(cleaned),
        sections: sections.kinds(),
        used_fallback: segmentation.used_fallback,
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => {
            tracing::debug!(max_chars, "document text truncated");
            &text[..end]
        }
        None => text,
    }
}

fn extract_docx_text(data: &[u8]) -> anyhow::Result<String> {
    let cursor = Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor).context("not a zip archive")?;

    let mut document_file = archive
        .by_name("word/document.xml")
        .context("missing word/document.xml")?;
    let mut xml = String::new();
    document_file.read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut current = String::new();
    let mut lines = Vec::new();
    let mut in_paragraph = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if e.name().as_ref() == b"w:p" {
                    in_paragraph = true;
                    current.clear();
                }
            }
            Ok(Event::Empty(e)) if in_paragraph => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" | b"w:cr" => current.push('\n'),
                _ => {}
            },
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"w:p" {
                    if !current.trim().is_empty() {
                        lines.push(current.trim().to_string());
                    }
                    current.clear();
                    in_paragraph = false;
                }
            }
            Ok(Event::Text(e)) => {
                if in_paragraph {
                    let value = e.xml_content()?.into_owned();
                    current.push_str(&value);
                }
            }
            Ok(Event::GeneralRef(e)) if in_paragraph => {
                if let Some(ch) = e.resolve_char_ref()? {
                    current.push(ch);
                } else if let Some(value) = resolve_xml_entity(&e.decode()?) {
                    current.push_str(value);
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(err.into()),
            _ => {}
        }

        buf.clear();
    }

    Ok(lines.join("\n"))
}
