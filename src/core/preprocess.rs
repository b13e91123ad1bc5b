use once_cell::sync::Lazy;
use regex::Regex;

static HYPHEN_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\p{Ll})-\n(\p{Ll})").unwrap());
static BLANK_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static SPACED_DASH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r" +[–—] +").unwrap());
static MISSING_SPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\p{Ll}{2,})\.(\p{Lu}\p{Ll})").unwrap());
static INLINE_SPACES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").unwrap());

/// Normalizes line breaks, whitespace and common extraction artifacts.
/// Emails, URLs, dotted technology names and numeric ranges pass through.
pub fn preprocess_text(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() != Some(&'\n') {
                    normalized.push('\n');
                }
            }
            '\u{00AD}' | '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}' => {}
            '\t' | '\u{00A0}' | '\u{2007}' | '\u{202F}' => normalized.push(' '),
            '\u{F0B7}' | '▪' | '●' | '◦' | '‣' | '·' | '■' | '◆' | '➢' | '➤' | '✓' => normalized.push('•'),
            other => normalized.push(other),
        }
    }

    let text = HYPHEN_BREAK_RE.replace_all(&normalized, "$1$2");
    let text = SPACED_DASH_RE.replace_all(&text, " - ");
    let text = MISSING_SPACE_RE.replace_all(&text, "$1. $2");

    let lines: Vec<String> = text
        .lines()
        .map(|line| INLINE_SPACES_RE.replace_all(line.trim_end(), " ").into_owned())
        .collect();
    let joined = lines.join("\n");

    BLANK_RUN_RE
        .replace_all(&joined, "\n\n")
        .trim_matches('\n')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_line_endings_and_blank_runs() {
        let input = "Name\r\nEmail\rPhone\n\n\n\n\nSkills  \t\n";
        assert_eq!(preprocess_text(input), "Name\nEmail\nPhone\n\nSkills");
    }

    #[test]
    fn repairs_word_breaks_and_bullets() {
        let input = "Built a distri-\nbuted cache\n\u{F0B7} Led the team\n▪ Wrote docs";
        assert_eq!(
            preprocess_text(input),
            "Built a distributed cache\n• Led the team\n• Wrote docs"
        );
    }

    #[test]
    fn leaves_emails_urls_and_ranges_intact() {
        let input = "jane.doe@mail.com | https://github.com/jane | Node.js | 2019-2021";
        assert_eq!(preprocess_text(input), input);
    }

    #[test]
    fn splits_run_on_sentences_and_spaced_dashes() {
        assert_eq!(
            preprocess_text("Managed budgets.Delivered on time"),
            "Managed budgets. Delivered on time"
        );
        assert_eq!(preprocess_text("Acme — Jakarta"), "Acme - Jakarta");
    }

    #[test]
    fn strips_invisible_characters() {
        assert_eq!(preprocess_text("Da\u{00AD}ta\u{200B} Engineer\u{00A0}II"), "Data Engineer II");
        assert_eq!(preprocess_text(""), "");
    }
}
