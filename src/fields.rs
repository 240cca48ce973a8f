//! Personal and contact field extraction from CV text
//!
//! Each field is tried against an ordered list of patterns; the first match
//! wins. Missing fields come back empty.

use crate::gender::Gender;
use once_cell::sync::Lazy;
use regex::Regex;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| Regex::new(p).unwrap()).collect()
}

static NAME_PATTERNS: Lazy<Vec<Regex>> =
    Lazy::new(|| compile(&[r"(?i)(?:họ\s*(?:và\s*)?tên|tên|name)\s*:?[ \t]*([^\n\r]{2,50})"]));

static EMAIL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)(?:email|e-mail|thư\s*điện\s*tử)\s*:?\s*([a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,})",
        r"([a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,})",
    ])
});

static PHONE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)(?:điện\s*thoại|phone|mobile|di\s*động|sđt)\s*:?\s*(\+?[0-9][0-9 .()-]{7,}[0-9])",
        r"(\+?(?:84|0)[ .-]?[1-9][0-9 .()-]{7,}[0-9])",
    ])
});

static DOB_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)(?:ngày\s*sinh|date\s*of\s*birth|dob|sinh\s*ngày)\s*:?\s*([0-9]{1,2}[/.-][0-9]{1,2}[/.-][0-9]{2,4})",
        r"\b([0-9]{1,2}[/.-][0-9]{1,2}[/.-][0-9]{4})\b",
    ])
});

static GENDER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[r"(?i)(?:giới\s*tính|gender|sex)\s*:?\s*(nam|nữ|male|female)\b"])
});

static EDUCATION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)(?:học\s*vấn|education|trình\s*độ)\s*:?\s*(đại\s*học|cao\s*đẳng|trung\s*cấp|phổ\s*thông|bachelor|master|phd|tiến\s*sĩ|thạc\s*sĩ)",
        r"(?i)\b(đại\s*học|cao\s*đẳng|trung\s*cấp|bachelor|master|phd|tiến\s*sĩ|thạc\s*sĩ)\b",
    ])
});

static SCHOOL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)(?:trường|university|college|học\s*viện)\s*:?[ \t]*([^\n\r]{10,80})",
        r"(?i)(đại\s*học\s+[^\n\r]{5,50})",
        r"(?i)(học\s*viện\s+[^\n\r]{5,50})",
    ])
});

static MAJOR_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)(?:chuyên\s*ngành|major|ngành\s*học)\s*:?[ \t]*([^\n\r]{5,50})",
        r"(?i)ngành\s*:?[ \t]*([^\n\r]{5,50})",
    ])
});

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

/// Personal details of the candidate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonalInfo {
    pub name: String,
    pub date_of_birth: String,
    pub gender: Option<Gender>,
}

/// Contact details of the candidate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
}

/// Highest education of the candidate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EducationInfo {
    /// Degree level as written ("Đại học", "Master", ...)
    pub level: String,
    pub school: String,
    pub major: String,
}

fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
    })
}

/// Candidate name from a labelled line, with each word capitalized
pub fn extract_name(text: &str) -> String {
    first_capture(&NAME_PATTERNS, text)
        .map(|name| capitalize_words(&name))
        .unwrap_or_default()
}

pub fn extract_email(text: &str) -> String {
    first_capture(&EMAIL_PATTERNS, text)
        .filter(|email| EMAIL_RE.is_match(email))
        .unwrap_or_default()
}

/// Phone number normalized to the `+84` international form
pub fn extract_phone(text: &str) -> String {
    first_capture(&PHONE_PATTERNS, text)
        .map(|raw| normalize_phone(&raw))
        .unwrap_or_default()
}

pub fn extract_date_of_birth(text: &str) -> String {
    first_capture(&DOB_PATTERNS, text).unwrap_or_default()
}

/// Gender written as text next to its label ("Giới tính: Nữ")
pub fn gender_from_text(text: &str) -> Option<Gender> {
    first_capture(&GENDER_PATTERNS, text).and_then(|token| Gender::from_token(&token))
}

pub fn extract_education(text: &str) -> String {
    first_capture(&EDUCATION_PATTERNS, text).unwrap_or_default()
}

/// School name, from a "Trường:" style label or a bare "Đại học ..." line
pub fn extract_school(text: &str) -> String {
    first_capture(&SCHOOL_PATTERNS, text).unwrap_or_default()
}

pub fn extract_major(text: &str) -> String {
    first_capture(&MAJOR_PATTERNS, text).unwrap_or_default()
}

pub fn extract_personal_info(text: &str) -> PersonalInfo {
    PersonalInfo {
        name: extract_name(text),
        date_of_birth: extract_date_of_birth(text),
        gender: gender_from_text(text),
    }
}

pub fn extract_contact_info(text: &str) -> ContactInfo {
    ContactInfo {
        email: extract_email(text),
        phone: extract_phone(text),
    }
}

pub fn extract_education_info(text: &str) -> EducationInfo {
    EducationInfo {
        level: extract_education(text),
        school: extract_school(text),
        major: extract_major(text),
    }
}

/// Keep digits and `+`, then rewrite local `0...` and bare `84...` numbers
/// as `+84...`.
pub fn normalize_phone(raw: &str) -> String {
    let phone: String = raw.chars().filter(|c| c.is_ascii_digit() || *c == '+').collect();
    if let Some(rest) = phone.strip_prefix('0') {
        format!("+84{}", rest)
    } else if phone.starts_with("84") {
        format!("+{}", phone)
    } else {
        phone
    }
}

fn capitalize_words(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
