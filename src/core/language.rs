use super::models::Language;
use super::vocabulary::{
    word_tokens, FUNCTION_WORDS_EN, FUNCTION_WORDS_ID, LANGUAGE_MARKERS_EN, LANGUAGE_MARKERS_ID,
};

/// Picks the primary language by weighted whole-word counts: domain markers
/// score 1, function words 0.5. Ties go to Indonesian.
pub fn detect_language(text: &str) -> Language {
    let tokens = word_tokens(text);
    let english = score(&tokens, LANGUAGE_MARKERS_EN, FUNCTION_WORDS_EN);
    let indonesian = score(&tokens, LANGUAGE_MARKERS_ID, FUNCTION_WORDS_ID);

    tracing::debug!(english, indonesian, "language scores");
    if english > indonesian {
        Language::English
    } else {
        Language::Indonesian
    }
}

fn score(tokens: &[String], markers: &[&str], function_words: &[&str]) -> f64 {
    tokens
        .iter()
        .map(|token| {
            if markers.contains(&token.as_str()) {
                1.0
            } else if function_words.contains(&token.as_str()) {
                0.5
            } else {
                0.0
            }
        })
        .sum()
}
