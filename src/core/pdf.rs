use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"https?://[^\s<>'"\)]+"#).unwrap());

/// Below this many characters a PDF is most likely a scan.
const SCANNED_TEXT_CHARS: usize = 50;

/// Text layer of a PDF followed by the link targets found in its raw bytes,
/// which the text layer drops for clickable profile links.
pub fn extract_pdf_text(data: &[u8]) -> anyhow::Result<String> {
    let mut text = pdf_extract::extract_text_from_mem(data).context("failed to read PDF text layer")?;

    let links = extract_hyperlinks(data);
    if !links.is_empty() {
        text.push('\n');
        text.push_str(&links.join("\n"));
    }

    if text.trim().chars().count() < SCANNED_TEXT_CHARS {
        tracing::warn!(chars = text.trim().chars().count(), "PDF has almost no text layer, it may be a scan");
    }
    Ok(text)
}

fn extract_hyperlinks(data: &[u8]) -> Vec<String> {
    let raw = String::from_utf8_lossy(data);
    let mut links: Vec<String> = Vec::new();
    for m in URL_RE.find_iter(&raw) {
        let value = m.as_str().to_string();
        if !links
            .iter()
            .any(|existing: &String| existing.eq_ignore_ascii_case(&value))
        {
            links.push(value);
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_unique_links_from_raw_bytes() {
        let raw = b"<< /URI (https://linkedin.com/in/jane) >> << /URI (HTTPS://LINKEDIN.COM/IN/JANE) >> \
                    << /URI (https://github.com/jane) >>";
        assert_eq!(
            extract_hyperlinks(raw),
            vec!["https://linkedin.com/in/jane", "https://github.com/jane"]
        );
    }

    #[test]
    fn rejects_bytes_that_are_not_a_pdf() {
        assert!(extract_pdf_text(b"definitely not a pdf").is_err());
    }
}
