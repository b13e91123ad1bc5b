use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use super::models::{ContactInfo, ExtractorSettings};
use super::sections::header_kind;
use super::vocabulary::{canonical_country, line_contains_phrase, KNOWN_CITIES, LOCATION_TERMS};

static MAILTO_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"mailto:\s*([A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,})").unwrap(),
        Regex::new(r#"href=["']mailto:([A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,})["']"#)
            .unwrap(),
    ]
});

static KEYWORD_EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:email|e-mail|surel)[\s:]*(?:mailto:)?([A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,})")
        .unwrap()
});

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());
static PHONE_CLEAN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\-\(\)\.]").unwrap());
static DIGIT_SEQ_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{7,15}").unwrap());
static NAME_STARTS_WITH_PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?\d").unwrap());
static DIGIT_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{3,}").unwrap());
static NAME_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:full\s+name|name|nama(?:\s+lengkap)?)\s*:\s*").unwrap());
static ADDRESS_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:address|alamat|location|lokasi|domisili)\s*:\s*").unwrap()
});

/// Regional phone shapes, most specific first.
static PHONE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?:\+62[-.\s]?|\b62[-.\s]?|\b0)8\d{1,2}[-.\s]?\d{3,4}[-.\s]?\d{2,5}\b").unwrap(),
        Regex::new(r"\+\d{1,3}[-.\s]?\(?\d{1,4}\)?(?:[-.\s]?\d{2,4}){2,4}\b").unwrap(),
        Regex::new(r"\(\d{2,4}\)\s?\d{3,4}[-.\s]?\d{3,4}\b").unwrap(),
        Regex::new(r"\b\d{3,4}[-.\s]\d{3,4}[-.\s]\d{3,5}\b").unwrap(),
        Regex::new(r"\b\d{10,13}\b").unwrap(),
    ]
});

static NUMERIC_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}[/.\-]\d{1,2}[/.\-]\d{2,4}$").unwrap());

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:https?://|www\.)[^\s()<>|,]+").unwrap());

static LINKEDIN_HREF_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r#"href=["'](https?://(?:www\.)?linkedin\.com/in/[a-zA-Z0-9\-]+)["']"#).unwrap(),
        Regex::new(r#"href=["'](linkedin\.com/in/[a-zA-Z0-9\-]+)["']"#).unwrap(),
    ]
});

static LINKEDIN_KEYWORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:linkedin|linked\s*in)[\s:]*(?:href=["'])?(https?://(?:www\.)?linkedin\.com/in/[a-zA-Z0-9\-]+)"#)
        .unwrap()
});

static LINKEDIN_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"https?://(?:www\.)?linkedin\.com/in/([a-zA-Z0-9\-]+)").unwrap(),
        Regex::new(r"linkedin\.com/in/([a-zA-Z0-9\-]+)").unwrap(),
        Regex::new(r"linkedin\.com/profile/view\?id=([a-zA-Z0-9\-]+)").unwrap(),
    ]
});

static GITHUB_HREF_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r#"href=["'](https?://(?:www\.)?github\.com/[A-Za-z0-9-]{1,39})["']"#).unwrap(),
        Regex::new(r#"href=["'](github\.com/[A-Za-z0-9-]{1,39})["']"#).unwrap(),
    ]
});

static GITHUB_KEYWORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:github|git\s*hub)[\s:]*(?:href=["'])?(https?://(?:www\.)?github\.com/[A-Za-z0-9-]{1,39})"#)
        .unwrap()
});

static GITHUB_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"https?://(?:www\.)?github\.com/([A-Za-z0-9-]{1,39})").unwrap(),
        Regex::new(r"github\.com/([A-Za-z0-9-]{1,39})").unwrap(),
    ]
});

static SALARY_RE: Lazy<Regex> = Lazy::new(|| {
    let amount = r"(?:(?:idr|rp\.?|usd|sgd|\$)\s*)?\d[\d.,]*(?:\s*(?:juta|jt|million|mio|m|k)\b)?";
    Regex::new(&format!(
        r"(?i)\b(?:expected\s+salary|salary\s+expectations?|ekspektasi\s+gaji|gaji\s+yang\s+diharapkan|salary|gaji)\b[^\n\d$]{{0,30}}?({amount}(?:\s*(?:-|–|to|s/d|sampai)\s*{amount})?)"
    ))
    .unwrap()
});

const NAME_STOP_WORDS: &[&str] = &["resume", "cv", "curriculum vitae", "biodata", "daftar riwayat hidup"];

pub fn extract_contact(text: &str) -> ContactInfo {
    extract_contact_with(text, &ExtractorSettings::default())
}

/// Contact details from the top of a document. Every field is independent;
/// a miss leaves it empty.
pub fn extract_contact_with(text: &str, settings: &ExtractorSettings) -> ContactInfo {
    let phone = extract_phone(text);
    let phone_e164 = phone
        .as_deref()
        .and_then(|phone| normalize_phone(phone, &settings.default_calling_code));
    let name = guess_name(text, settings.name_scan_lines);
    let location = extract_location(text, settings.location_scan_lines, name.as_deref());

    ContactInfo {
        name,
        email: extract_email(text),
        phone,
        phone_e164,
        location,
        linkedin: extract_linkedin(text),
        github: extract_github(text),
        websites: extract_websites(text),
    }
}

pub fn extract_email(text: &str) -> Option<String> {
    for regex in &*MAILTO_REGEXES {
        if let Some(captures) = regex.captures(text) {
            if let Some(email) = captures.get(1) {
                return Some(email.as_str().to_lowercase());
            }
        }
    }

    if let Some(captures) = KEYWORD_EMAIL_RE.captures(text) {
        if let Some(email) = captures.get(1) {
            return Some(email.as_str().to_lowercase());
        }
    }

    EMAIL_RE.find(text).map(|m| m.as_str().to_lowercase())
}

/// First phone-shaped string, skipping year ranges and numeric dates.
pub fn extract_phone(text: &str) -> Option<String> {
    for regex in &*PHONE_PATTERNS {
        for m in regex.find_iter(text) {
            let candidate = m.as_str().split_whitespace().collect::<Vec<_>>().join(" ");
            if is_plausible_phone(&candidate) {
                return Some(candidate);
            }
        }
    }
    None
}

fn is_plausible_phone(candidate: &str) -> bool {
    let digits = candidate.chars().filter(char::is_ascii_digit).count();
    if !(8..=15).contains(&digits) || NUMERIC_DATE_RE.is_match(candidate) {
        return false;
    }

    let groups: Vec<&str> = candidate
        .split(|c: char| !c.is_ascii_digit())
        .filter(|group| !group.is_empty())
        .collect();
    let all_years = groups.len() >= 2
        && groups.iter().all(|group| {
            group.len() == 4 && (group.starts_with("19") || group.starts_with("20"))
        });
    !all_years
}

/// E.164 form of a phone string. National numbers (leading `0`, or no
/// country code) get `calling_code`.
pub fn normalize_phone(text: &str, calling_code: &str) -> Option<String> {
    if let Some(normalized) = format_if_valid_phone(text) {
        return Some(normalized);
    }

    let cleaned = PHONE_CLEAN_RE.replace_all(text, "");
    for m in DIGIT_SEQ_RE.find_iter(&cleaned) {
        let digits = m.as_str();
        let candidate = if let Some(national) = digits.strip_prefix('0') {
            format!("+{calling_code}{national}")
        } else if digits.starts_with(calling_code) && digits.len() >= 10 {
            format!("+{digits}")
        } else {
            format!("+{calling_code}{digits}")
        };

        if let Some(normalized) = format_if_valid_phone(&candidate) {
            return Some(normalized);
        }
    }

    None
}

pub fn extract_linkedin(text: &str) -> Option<String> {
    for regex in &*LINKEDIN_HREF_RES {
        if let Some(captures) = regex.captures(text) {
            let mut url = captures.get(1)?.as_str().to_string();
            if !url.to_ascii_lowercase().starts_with("http") {
                url = format!("https://www.{url}");
            }
            return Some(url);
        }
    }

    if let Some(captures) = LINKEDIN_KEYWORD_RE.captures(text) {
        return captures.get(1).map(|m| m.as_str().to_string());
    }

    for regex in &*LINKEDIN_PATTERNS {
        if let Some(captures) = regex.captures(text) {
            if let Some(username) = captures.get(1) {
                return Some(format!("https://www.linkedin.com/in/{}", username.as_str()));
            }
        }
    }

    None
}

pub fn extract_github(text: &str) -> Option<String> {
    for regex in &*GITHUB_HREF_RES {
        if let Some(captures) = regex.captures(text) {
            let mut url = captures.get(1)?.as_str().to_string();
            if !url.to_ascii_lowercase().starts_with("http") {
                url = format!("https://{url}");
            }
            return Some(url);
        }
    }

    if let Some(captures) = GITHUB_KEYWORD_RE.captures(text) {
        return captures.get(1).map(|m| m.as_str().to_string());
    }

    for regex in &*GITHUB_PATTERNS {
        if let Some(captures) = regex.captures(text) {
            if let Some(username) = captures.get(1) {
                return Some(format!("https://github.com/{}", username.as_str()));
            }
        }
    }

    None
}

/// Links other than LinkedIn and GitHub profiles, in document order.
pub fn extract_websites(text: &str) -> Vec<String> {
    let mut websites: Vec<String> = Vec::new();
    for m in URL_RE.find_iter(text) {
        if text[..m.start()].ends_with('@') {
            continue;
        }
        let raw = m.as_str().trim_end_matches(['.', ',', ';', ':', ')', ']', '"', '\'']);
        let with_scheme = if raw.to_ascii_lowercase().starts_with("http") {
            raw.to_string()
        } else {
            format!("https://{raw}")
        };
        let Some(host) = Url::parse(&with_scheme)
            .ok()
            .and_then(|url| url.host_str().map(str::to_ascii_lowercase))
        else {
            continue;
        };
        if is_host(&host, "linkedin.com") || is_host(&host, "github.com") {
            continue;
        }
        if !websites.iter().any(|seen| seen.eq_ignore_ascii_case(raw)) {
            websites.push(raw.to_string());
        }
    }
    websites
}

fn is_host(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{domain}"))
}

/// Name from the first `scan_lines` non-empty lines: a capitalized line of two
/// to four words, else the first line that does not look like contact data.
pub fn guess_name(text: &str, scan_lines: usize) -> Option<String> {
    let candidate_lines: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(scan_lines)
        .map(|line| NAME_LABEL_RE.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty() && !looks_like_contact_data(line))
        .collect();

    for line in &candidate_lines {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.len() < 2 || words.len() > 4 {
            continue;
        }

        if words
            .iter()
            .all(|w| w.chars().next().map(|c| c.is_uppercase()).unwrap_or(false))
        {
            return Some(line.to_string());
        }
    }

    candidate_lines.into_iter().next()
}

fn looks_like_contact_data(line: &str) -> bool {
    let lower = line.to_lowercase();
    line.contains('@')
        || lower.contains("http")
        || lower.contains("www.")
        || line.chars().count() > 50
        || NAME_STARTS_WITH_PHONE_RE.is_match(line)
        || DIGIT_RUN_RE.is_match(line)
        || NAME_STOP_WORDS.iter().any(|word| line_contains_phrase(line, word))
        || header_kind(line).is_some()
}

/// Address-like segment of the first `scan_lines` non-empty lines, skipping
/// the name line.
pub fn extract_location(text: &str, scan_lines: usize, name: Option<&str>) -> Option<String> {
    for line in text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(scan_lines)
    {
        if name.is_some_and(|name| line.ends_with(name)) {
            continue;
        }

        for segment in line.split(['|', '•']).map(str::trim) {
            let segment = ADDRESS_LABEL_RE.replace(segment, "");
            let segment = segment.trim();
            if segment.is_empty()
                || segment.contains('@')
                || URL_RE.is_match(segment)
                || extract_phone(segment).is_some()
            {
                continue;
            }

            let has_location_term = LOCATION_TERMS
                .iter()
                .any(|term| line_contains_phrase(segment, term));
            let has_known_place = KNOWN_CITIES
                .iter()
                .any(|(city, _)| line_contains_phrase(segment, &city.to_lowercase()))
                || segment
                    .split(',')
                    .any(|part| canonical_country(part).is_some());
            if has_location_term || has_known_place {
                return Some(segment.to_string());
            }
        }
    }
    None
}

/// Salary expectation phrase such as `Expected salary: IDR 15.000.000`.
pub fn extract_salary(text: &str) -> Option<String> {
    SALARY_RE
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim().to_string())
}

fn format_if_valid_phone(input: &str) -> Option<String> {
    let parsed = phonenumber::parse(None, input).ok()?;
    if !phonenumber::is_valid(&parsed) {
        return None;
    }

    Some(parsed.format().mode(phonenumber::Mode::E164).to_string())
}
