pub mod core;

pub use crate::core::document_parser::{decode_document, parse_resume_text};
pub use crate::core::models::{ExtractorSettings, ParsedDocument, ParsedResume};
pub use crate::core::record::CandidateRecord;
pub use crate::core::service::{tag_external_record, BatchParser};
pub use crate::core::tags::{normalize_tags, tag_record, Tag, TagCategory};
