//! Section location in CV transcripts
//!
//! Finds the work-history block and the "applied position" lines of the
//! Vietnamese application form layout.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

/// Default number of lines inspected after the applied-position header
pub const APPLIED_POSITION_LOOKAHEAD: usize = 9;

static EXPERIENCE_SECTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)QUÁ\s*TRÌNH\s*CÔNG\s*TÁC(.*?)(?:VỊ\s*TRÍ\s*ỨNG\s*TUYỂN|\z)").unwrap()
});

/// Weaker cues that an experience section exists under another heading
static EXPERIENCE_CUES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"(?i)kinh\s*nghiệm", r"(?i)công\s*tác", r"(?i)làm\s*việc"]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
});

static APPLIED_HEADER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)vị\s*trí\s*ứng\s*tuyển").unwrap());
static NUMBERED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\.\s*(.+)$").unwrap());
static NEXT_SECTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:[IVX]+\.\s*)?(?:thông\s*tin|quá\s*trình|skills|education)").unwrap()
});

/// The block between the work-history header and the applied-position
/// header (or end of text), trimmed.
pub fn find_experience_section(text: &str) -> Option<&str> {
    match EXPERIENCE_SECTION_RE.captures(text).and_then(|c| c.get(1)) {
        Some(section) => {
            let section = section.as_str().trim();
            debug!("experience section found ({} chars)", section.len());
            Some(section)
        }
        None => {
            for (idx, cue) in EXPERIENCE_CUES.iter().enumerate() {
                if cue.is_match(text) {
                    debug!("no experience header, but alternative cue {} matched", idx + 1);
                }
            }
            None
        }
    }
}

/// Positions listed after the "vị trí ứng tuyển" line, joined with spaces.
///
/// Numbered lines are normalized to `"n. title"` and lines of two characters
/// or fewer are skipped. Collection stops at the next section heading.
pub fn find_applied_position(text: &str, lookahead: usize) -> String {
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    let Some(header) = lines.iter().position(|l| APPLIED_HEADER_RE.is_match(l)) else {
        debug!("applied position header not found");
        return String::new();
    };

    let mut positions = Vec::new();
    for line in lines.iter().skip(header + 1).take(lookahead) {
        if NEXT_SECTION_RE.is_match(line) {
            break;
        }
        if let Some(caps) = NUMBERED_RE.captures(line) {
            positions.push(format!("{}. {}", &caps[1], caps[2].trim()));
        } else if line.chars().count() > 2 {
            positions.push(line.to_string());
        }
    }

    positions.join(" ")
}
