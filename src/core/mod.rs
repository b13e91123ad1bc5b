pub mod completeness;
pub mod dates;
pub mod document_parser;
pub mod education;
pub mod errors;
pub mod experience;
pub mod field_extractor;
pub mod language;
pub mod models;
pub mod pdf;
pub mod preprocess;
pub mod record;
pub mod search_filters;
pub mod sections;
pub mod service;
pub mod settings_store;
pub mod skills;
pub mod smart_tags;
pub mod tags;
pub mod vocabulary;
