//! Static word lists and lookup tables shared by the extractors and the tag
//! stages. Entries are lower-case unless noted.

use super::models::SectionKind;
use super::tags::TagCategory;

pub const LANGUAGE_MARKERS_EN: &[&str] = &[
    "experience",
    "education",
    "skills",
    "work",
    "profile",
    "summary",
    "achievements",
    "professional",
    "contact",
    "references",
];

pub const LANGUAGE_MARKERS_ID: &[&str] = &[
    "pengalaman",
    "pendidikan",
    "keahlian",
    "kerja",
    "profil",
    "ringkasan",
    "prestasi",
    "profesional",
    "kontak",
    "referensi",
];

/// Counted at half weight next to the domain markers.
pub const FUNCTION_WORDS_EN: &[&str] = &[
    "and", "the", "that", "with", "for", "from", "this", "by", "was", "have",
];

pub const FUNCTION_WORDS_ID: &[&str] = &[
    "dan", "yang", "dengan", "untuk", "dari", "pada", "adalah", "ini", "oleh", "saya", "kami",
    "kita",
];

pub struct HeaderPhrases {
    pub kind: SectionKind,
    pub english: &'static [&'static str],
    pub indonesian: &'static [&'static str],
}

pub const SECTION_HEADERS: &[HeaderPhrases] = &[
    HeaderPhrases {
        kind: SectionKind::Contact,
        english: &[
            "contact",
            "personal information",
            "contact details",
            "personal details",
            "contact information",
        ],
        indonesian: &[
            "kontak",
            "informasi pribadi",
            "detail kontak",
            "data pribadi",
            "informasi kontak",
        ],
    },
    HeaderPhrases {
        kind: SectionKind::Profile,
        english: &[
            "profile",
            "summary",
            "professional summary",
            "career objective",
            "about me",
            "personal profile",
        ],
        indonesian: &[
            "profil",
            "ringkasan",
            "ringkasan profesional",
            "tujuan karir",
            "tentang saya",
            "profil pribadi",
        ],
    },
    HeaderPhrases {
        kind: SectionKind::Experience,
        english: &[
            "experience",
            "work experience",
            "employment history",
            "professional experience",
            "career history",
            "work history",
        ],
        indonesian: &[
            "pengalaman",
            "pengalaman kerja",
            "riwayat pekerjaan",
            "pengalaman profesional",
            "riwayat karir",
            "sejarah pekerjaan",
        ],
    },
    HeaderPhrases {
        kind: SectionKind::Education,
        english: &[
            "education",
            "education level",
            "academic background",
            "qualifications",
            "academic qualifications",
            "educational background",
        ],
        indonesian: &[
            "pendidikan",
            "tingkat pendidikan",
            "latar belakang akademis",
            "kualifikasi",
            "kualifikasi akademis",
            "latar belakang pendidikan",
            "riwayat pendidikan",
        ],
    },
    HeaderPhrases {
        kind: SectionKind::Skills,
        english: &[
            "skills",
            "key skills",
            "technical skills",
            "competencies",
            "core competencies",
            "professional skills",
            "hard skills",
            "soft skills",
        ],
        indonesian: &[
            "keahlian",
            "keterampilan",
            "kemampuan",
            "kompetensi",
            "keahlian teknis",
            "keahlian profesional",
            "keahlian keras",
            "keahlian lunak",
        ],
    },
    HeaderPhrases {
        kind: SectionKind::Achievements,
        english: &[
            "achievements",
            "awards",
            "honors",
            "certifications",
            "accomplishments",
        ],
        indonesian: &[
            "prestasi",
            "penghargaan",
            "kehormatan",
            "sertifikasi",
            "pencapaian",
        ],
    },
    HeaderPhrases {
        kind: SectionKind::Languages,
        english: &["languages", "language proficiency", "language skills"],
        indonesian: &["bahasa", "kemampuan bahasa", "keahlian bahasa"],
    },
    HeaderPhrases {
        kind: SectionKind::Interests,
        english: &["interests", "hobbies", "activities", "personal interests"],
        indonesian: &["minat", "hobi", "kegiatan", "minat pribadi"],
    },
    HeaderPhrases {
        kind: SectionKind::Organizations,
        english: &[
            "organizations",
            "organizational experience",
            "professional memberships",
            "affiliations",
            "volunteer",
        ],
        indonesian: &[
            "organisasi",
            "pengalaman organisasi",
            "keanggotaan profesional",
            "afiliasi",
            "sukarelawan",
        ],
    },
];

/// Academic level, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EducationLevel {
    HighSchool,
    Diploma,
    Associate,
    Bachelor,
    Master,
    Doctorate,
}

impl EducationLevel {
    pub fn label(self) -> &'static str {
        match self {
            EducationLevel::HighSchool => "High School",
            EducationLevel::Diploma => "Diploma",
            EducationLevel::Associate => "Associate Degree",
            EducationLevel::Bachelor => "Bachelor",
            EducationLevel::Master => "Master",
            EducationLevel::Doctorate => "PhD",
        }
    }
}

/// Degree keywords in both languages. Longer spellings come first so that an
/// alternation built from this list prefers them.
pub const DEGREE_KEYWORDS: &[(&str, EducationLevel)] = &[
    ("senior high school", EducationLevel::HighSchool),
    ("high school", EducationLevel::HighSchool),
    ("sma", EducationLevel::HighSchool),
    ("smk", EducationLevel::HighSchool),
    ("associate", EducationLevel::Associate),
    ("diploma", EducationLevel::Diploma),
    ("d3", EducationLevel::Diploma),
    ("d4", EducationLevel::Diploma),
    ("bachelor", EducationLevel::Bachelor),
    ("sarjana", EducationLevel::Bachelor),
    ("b.eng", EducationLevel::Bachelor),
    ("b.sc", EducationLevel::Bachelor),
    ("bsc", EducationLevel::Bachelor),
    ("s1", EducationLevel::Bachelor),
    ("magister", EducationLevel::Master),
    ("master", EducationLevel::Master),
    ("m.sc", EducationLevel::Master),
    ("msc", EducationLevel::Master),
    ("mba", EducationLevel::Master),
    ("s2", EducationLevel::Master),
    ("doctorate", EducationLevel::Doctorate),
    ("doktor", EducationLevel::Doctorate),
    ("ph.d", EducationLevel::Doctorate),
    ("phd", EducationLevel::Doctorate),
    ("s3", EducationLevel::Doctorate),
];

pub const INSTITUTION_KEYWORDS: &[&str] = &[
    "perguruan tinggi",
    "university",
    "universitas",
    "college",
    "institute",
    "institut",
    "polytechnic",
    "politeknik",
    "academy",
    "akademi",
    "school",
    "sekolah",
];

pub const LOCATION_TERMS: &[&str] = &[
    "jalan", "jl", "street", "avenue", "road", "city", "state", "province", "country", "kota",
    "provinsi", "kabupaten", "kecamatan", "address", "alamat", "location", "lokasi", "domisili",
];

/// Known cities (display case) with the country they belong to.
pub const KNOWN_CITIES: &[(&str, &str)] = &[
    ("Jakarta", "Indonesia"),
    ("Surabaya", "Indonesia"),
    ("Bandung", "Indonesia"),
    ("Medan", "Indonesia"),
    ("Semarang", "Indonesia"),
    ("Makassar", "Indonesia"),
    ("Yogyakarta", "Indonesia"),
    ("Depok", "Indonesia"),
    ("Tangerang", "Indonesia"),
    ("Bekasi", "Indonesia"),
    ("Batam", "Indonesia"),
    ("Bogor", "Indonesia"),
    ("Palembang", "Indonesia"),
    ("Balikpapan", "Indonesia"),
    ("Malang", "Indonesia"),
    ("Denpasar", "Indonesia"),
    ("Singapore", "Singapore"),
    ("Kuala Lumpur", "Malaysia"),
    ("Bangkok", "Thailand"),
    ("Manila", "Philippines"),
    ("Ho Chi Minh City", "Vietnam"),
    ("Hanoi", "Vietnam"),
    ("Tokyo", "Japan"),
    ("Sydney", "Australia"),
    ("Melbourne", "Australia"),
    ("New York", "United States"),
    ("San Francisco", "United States"),
    ("London", "United Kingdom"),
    ("Berlin", "Germany"),
    ("Amsterdam", "Netherlands"),
    ("Toronto", "Canada"),
];

/// Country (display case) -> (region, market), both lower-case tag values.
pub const COUNTRY_REGIONS: &[(&str, &str, &str)] = &[
    ("Indonesia", "southeast asia", "asean"),
    ("Singapore", "southeast asia", "asean"),
    ("Malaysia", "southeast asia", "asean"),
    ("Thailand", "southeast asia", "asean"),
    ("Philippines", "southeast asia", "asean"),
    ("Vietnam", "southeast asia", "asean"),
    ("Japan", "east asia", "apac"),
    ("Australia", "oceania", "apac"),
    ("United States", "north america", "americas"),
    ("Canada", "north america", "americas"),
    ("United Kingdom", "europe", "emea"),
    ("Germany", "europe", "emea"),
    ("Netherlands", "europe", "emea"),
];

pub const COUNTRY_ALIASES: &[(&str, &str)] = &[
    ("republic of indonesia", "Indonesia"),
    ("usa", "United States"),
    ("us", "United States"),
    ("united states of america", "United States"),
    ("uk", "United Kingdom"),
    ("england", "United Kingdom"),
    ("great britain", "United Kingdom"),
    ("the netherlands", "Netherlands"),
    ("viet nam", "Vietnam"),
];

/// Resolves a free-form country string to its canonical display name.
pub fn canonical_country(value: &str) -> Option<&'static str> {
    let lowered = value.trim().to_lowercase();
    if lowered.is_empty() {
        return None;
    }
    COUNTRY_REGIONS
        .iter()
        .map(|(country, _, _)| *country)
        .find(|country| country.to_lowercase() == lowered)
        .or_else(|| {
            COUNTRY_ALIASES
                .iter()
                .find(|(alias, _)| *alias == lowered)
                .map(|(_, country)| *country)
        })
}

/// Technical keywords for the last-resort keyword scan (display form).
pub const TECH_KEYWORDS: &[&str] = &[
    "java",
    "python",
    "javascript",
    "typescript",
    "c++",
    "c#",
    "ruby",
    "php",
    "swift",
    "kotlin",
    "react",
    "angular",
    "vue",
    "django",
    "flask",
    "spring",
    "node",
    "express",
    "laravel",
    "sql",
    "mysql",
    "postgresql",
    "mongodb",
    "oracle",
    "redis",
    "firebase",
    "git",
    "docker",
    "kubernetes",
    "aws",
    "azure",
    "gcp",
    "jenkins",
    "travis",
    "jira",
    "html",
    "css",
    "sass",
    "bootstrap",
    "tailwind",
    "material-ui",
    "jquery",
];

pub const SOFT_KEYWORDS: &[&str] = &[
    "communication",
    "leadership",
    "teamwork",
    "problem solving",
    "time management",
    "critical thinking",
    "adaptability",
    "creativity",
    "komunikasi",
    "kepemimpinan",
    "kerja sama",
    "pemecahan masalah",
    "manajemen waktu",
    "berpikir kritis",
    "adaptasi",
    "kreativitas",
];

pub const JOB_TITLE_TERMS: &[&str] = &[
    "developer",
    "engineer",
    "manager",
    "consultant",
    "specialist",
    "analyst",
    "officer",
    "director",
    "coordinator",
    "designer",
    "architect",
    "scientist",
    "programmer",
    "administrator",
    "supervisor",
    "intern",
    "staff",
    "lead",
    "head",
    "assistant",
    "manajer",
    "staf",
];

pub const COMPANY_SUFFIXES: &[&str] = &[
    "pt", "cv", "tbk", "persero", "inc", "ltd", "llc", "corp", "corporation", "company", "gmbh",
    "group",
];

/// Institutions that earn a prestige tag when they appear in an education entry.
pub const PRESTIGE_INSTITUTIONS: &[&str] = &[
    "universitas indonesia",
    "university of indonesia",
    "institut teknologi bandung",
    "bandung institute of technology",
    "universitas gadjah mada",
    "gadjah mada university",
    "institut teknologi sepuluh nopember",
    "institut pertanian bogor",
    "universitas airlangga",
    "itb",
    "ugm",
    "national university of singapore",
    "nanyang technological university",
    "university of melbourne",
    "harvard",
    "stanford",
    "massachusetts institute of technology",
    "oxford",
    "cambridge",
    "eth zurich",
];

/// Substring co-occurrence rule over the lower-cased hard-skills text.
pub struct StackRule {
    pub all_of: &'static [&'static str],
    pub any_of: &'static [&'static str],
    pub category: TagCategory,
    pub value: &'static str,
}

pub const STACK_RULES: &[StackRule] = &[
    StackRule {
        all_of: &["react", "node"],
        any_of: &[],
        category: TagCategory::Stack,
        value: "full stack javascript",
    },
    StackRule {
        all_of: &["mongodb", "express", "react", "node"],
        any_of: &[],
        category: TagCategory::Stack,
        value: "mern",
    },
    StackRule {
        all_of: &["mongodb", "express", "angular", "node"],
        any_of: &[],
        category: TagCategory::Stack,
        value: "mean",
    },
    StackRule {
        all_of: &["php", "mysql"],
        any_of: &[],
        category: TagCategory::Stack,
        value: "lamp",
    },
    StackRule {
        all_of: &["python", "django"],
        any_of: &[],
        category: TagCategory::Stack,
        value: "python web",
    },
    StackRule {
        all_of: &[],
        any_of: &["aws", "azure", "gcp", "google cloud"],
        category: TagCategory::Specialization,
        value: "cloud computing",
    },
    StackRule {
        all_of: &["docker", "kubernetes"],
        any_of: &[],
        category: TagCategory::Specialization,
        value: "devops",
    },
    StackRule {
        all_of: &[],
        any_of: &["tensorflow", "pytorch", "scikit", "machine learning"],
        category: TagCategory::Specialization,
        value: "machine learning",
    },
    StackRule {
        all_of: &[],
        any_of: &["flutter", "react native", "kotlin", "swift"],
        category: TagCategory::Specialization,
        value: "mobile development",
    },
    StackRule {
        all_of: &[],
        any_of: &["tableau", "power bi", "pandas"],
        category: TagCategory::Specialization,
        value: "data analytics",
    },
];

pub const FRONTEND_MARKERS: &[&str] = &["react", "vue", "angular", "svelte", "html", "css"];

pub const BACKEND_MARKERS: &[&str] = &[
    "node", "express", "django", "flask", "spring", "laravel", "php", "golang", "rails", ".net",
];

/// Predefined values offered to filter UIs.
pub const EXPERIENCE_LEVELS: &[&str] = &[
    "Fresh Graduate",
    "Entry Level",
    "Junior",
    "Mid-Level",
    "Senior",
    "Lead",
    "Manager",
    "Director",
    "VP",
    "C-Level",
];

pub const EXPERIENCE_YEAR_RANGES: &[&str] = &[
    "0-1 years",
    "1-2 years",
    "2-3 years",
    "3-5 years",
    "5-7 years",
    "7-10 years",
    "10+ years",
];

pub const EDUCATION_LEVELS: &[&str] = &[
    "High School",
    "Diploma",
    "Associate Degree",
    "Bachelor",
    "Master",
    "PhD",
    "Professional Degree",
];

pub const WORK_TYPES: &[&str] = &[
    "Full-time",
    "Part-time",
    "Contract",
    "Freelance",
    "Internship",
    "Temporary",
];

pub const WORK_LOCATIONS: &[&str] = &["Remote", "On-site", "Hybrid", "Flexible"];

pub const SALARY_RANGES_IDR: &[&str] = &[
    "< 5M IDR",
    "5-10M IDR",
    "10-15M IDR",
    "15-20M IDR",
    "20-25M IDR",
    "25M+ IDR",
];

pub const INDUSTRIES: &[&str] = &[
    "Technology",
    "Finance",
    "Banking",
    "Healthcare",
    "Education",
    "Manufacturing",
    "Retail",
    "Consulting",
    "Government",
    "Non-Profit",
    "Media",
    "Real Estate",
    "Agriculture",
    "Energy",
    "Transportation",
];

/// Lower-cases `text` and splits it into word tokens. Characters that belong
/// inside technology names (`+`, `#`, `.`) stay in the token; a trailing dot
/// is dropped.
pub fn word_tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#' || c == '.'))
        .map(|token| token.trim_matches('.'))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether `phrase` occurs in `tokens` as a whole-word sequence. Hyphens in
/// the phrase count as word separators, and a dotted token such as `node.js`
/// also matches on its first segment.
pub fn contains_phrase(tokens: &[String], phrase: &str) -> bool {
    let parts: Vec<&str> = phrase
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() || parts.len() > tokens.len() {
        return false;
    }

    tokens.windows(parts.len()).any(|window| {
        window.iter().zip(&parts).all(|(token, part)| {
            token == part || token.split('.').next().is_some_and(|head| head == *part)
        })
    })
}

/// Keywords from `vocabulary` found in `text`, in vocabulary order.
pub fn scan_keywords(text: &str, vocabulary: &[&'static str]) -> Vec<&'static str> {
    let tokens = word_tokens(text);
    vocabulary
        .iter()
        .copied()
        .filter(|keyword| contains_phrase(&tokens, keyword))
        .collect()
}

/// Case-insensitive whole-word containment of a phrase in a line.
pub fn line_contains_phrase(line: &str, phrase: &str) -> bool {
    contains_phrase(&word_tokens(line), phrase)
}

/// Text of a bulleted or numbered list line, without its marker.
pub fn bullet_item(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let rest = if let Some(rest) = trimmed.strip_prefix(['•', '*', '-', '–', '>', '✔']) {
        rest
    } else {
        let digits = trimmed.len() - trimmed.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        let after_digits = &trimmed[digits..];
        match after_digits.strip_prefix(['.', ')']) {
            Some(rest) if digits > 0 && digits <= 2 && rest.starts_with(' ') => rest,
            _ => return None,
        }
    };
    let item = rest.trim();
    (!item.is_empty()).then_some(item)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_keep_technology_punctuation() {
        assert_eq!(
            word_tokens("Skilled in C++, C#, Node.js."),
            vec!["skilled", "in", "c++", "c#", "node.js"]
        );
    }

    #[test]
    fn phrase_matching_respects_word_boundaries() {
        let tokens = word_tokens("JavaScript and Problem-Solving with Node.js");
        assert!(contains_phrase(&tokens, "javascript"));
        assert!(!contains_phrase(&tokens, "java"));
        assert!(contains_phrase(&tokens, "problem solving"));
        assert!(contains_phrase(&tokens, "node"));
    }

    #[test]
    fn keyword_scan_returns_vocabulary_order() {
        let hits = scan_keywords("Docker, python and MATERIAL UI", TECH_KEYWORDS);
        assert_eq!(hits, vec!["python", "docker", "material-ui"]);
    }

    #[test]
    fn bullet_markers_are_stripped() {
        assert_eq!(bullet_item("  • Built APIs"), Some("Built APIs"));
        assert_eq!(bullet_item("- Led team"), Some("Led team"));
        assert_eq!(bullet_item("2. Shipped v2"), Some("Shipped v2"));
        assert_eq!(bullet_item("2019 - 2021"), None);
        assert_eq!(bullet_item("3.85/4.00"), None);
        assert_eq!(bullet_item("•   "), None);
        assert_eq!(bullet_item("Plain line"), None);
    }

    #[test]
    fn country_aliases_resolve() {
        assert_eq!(canonical_country(" indonesia "), Some("Indonesia"));
        assert_eq!(canonical_country("USA"), Some("United States"));
        assert_eq!(canonical_country("Atlantis"), None);
        assert_eq!(canonical_country(""), None);
    }

    #[test]
    fn education_levels_are_ranked() {
        assert!(EducationLevel::Doctorate > EducationLevel::Master);
        assert!(EducationLevel::Bachelor > EducationLevel::Diploma);
        assert_eq!(EducationLevel::Doctorate.label(), "PhD");
    }
}
