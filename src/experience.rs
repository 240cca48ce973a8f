//! Work-experience parsing and current-position resolution
//!
//! Experience sections in Vietnamese CVs are usually one job per line:
//!
//! ```text
//! 01/2023 - nay: Marketing Manager - ABC Company
//! 06/2021 - 12/2022: Marketing Executive - XYZ Corp
//! ```
//!
//! Lines are matched heuristically. Anything that does not look like a dated
//! entry is dropped (or kept as a [`ExperienceEntry::RawLine`]) rather than
//! treated as an error.

use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;

/// `<start M/YYYY> - <end M/YYYY | nay | hiện tại> [: ]* <free text>`
static ENTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d{1,2}/20\d{2})\s*-\s*(\d{1,2}/20\d{2}|nay|hiện tại)[:\s]*(.+)").unwrap()
});

static PRESENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)nay|hiện tại").unwrap());

/// First `M/YYYY` date inside a time range
static START_DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{1,2})/(\d{4})").unwrap());

/// One parsed work-experience record.
///
/// Entries are immutable once built; everything derived (start date,
/// position, company) is computed in the constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobEntry {
    time_range: String,
    start_month: Option<u32>,
    start_year: Option<u32>,
    is_current: bool,
    description: String,
    position: String,
    company: String,
}

impl JobEntry {
    /// Build an entry from a time range and the free-text description.
    ///
    /// Position and company are split from the description on the first `-`.
    pub fn new(time_range: impl Into<String>, description: impl Into<String>, is_current: bool) -> Self {
        let time_range = time_range.into();
        let description = description.into().trim().to_string();

        let (start_month, start_year) = parse_start_date(&time_range);
        let (position, company) = split_description(&description);

        Self {
            time_range,
            start_month,
            start_year,
            is_current,
            description,
            position,
            company,
        }
    }

    /// Parse a single line, returning `None` when it is not a dated entry
    pub fn parse_line(line: &str) -> Option<Self> {
        let caps = ENTRY_RE.captures(line)?;
        let end = &caps[2];
        let time_range = format!("{} - {}", &caps[1], end);
        let is_current = PRESENT_RE.is_match(end);
        Some(Self::new(time_range, &caps[3], is_current))
    }

    pub fn time_range(&self) -> &str {
        &self.time_range
    }

    pub fn start_month(&self) -> Option<u32> {
        self.start_month
    }

    pub fn start_year(&self) -> Option<u32> {
        self.start_year
    }

    pub fn is_current(&self) -> bool {
        self.is_current
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn position(&self) -> &str {
        &self.position
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    /// Chronological sort key: `year * 12 + month`, or `0` when the start
    /// date could not be parsed (sorts as oldest).
    pub fn start_key(&self) -> u32 {
        match (self.start_year, self.start_month) {
            (Some(year), Some(month)) => year * 12 + month,
            _ => 0,
        }
    }

    /// The job title to report when this entry is the current one
    fn title(&self) -> String {
        if !self.position.is_empty() {
            return self.position.clone();
        }
        self.description
            .split('-')
            .next()
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }
}

/// An experience line as seen by the orchestrator: either a dated job entry
/// or a line that could not be parsed but is kept for manual review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExperienceEntry {
    RawLine(String),
    Structured(JobEntry),
}

impl ExperienceEntry {
    pub fn as_job(&self) -> Option<&JobEntry> {
        match self {
            ExperienceEntry::Structured(job) => Some(job),
            ExperienceEntry::RawLine(_) => None,
        }
    }
}

fn parse_start_date(time_range: &str) -> (Option<u32>, Option<u32>) {
    let Some(caps) = START_DATE_RE.captures(time_range) else {
        return (None, None);
    };
    let month = caps[1].parse().ok();
    let year = caps[2].parse().ok();
    match (month, year) {
        (Some(m), Some(y)) => (Some(m), Some(y)),
        _ => (None, None),
    }
}

fn split_description(description: &str) -> (String, String) {
    match description.split_once('-') {
        Some((position, company)) => (position.trim().to_string(), company.trim().to_string()),
        None => (description.to_string(), String::new()),
    }
}

fn non_empty_lines(raw_block: &str) -> impl Iterator<Item = &str> {
    raw_block.lines().map(str::trim).filter(|l| !l.is_empty())
}

/// Parse an experience block into job entries, in input line order.
///
/// Lines that do not match the dated-entry pattern are dropped.
pub fn parse_experience_section(raw_block: &str) -> Vec<JobEntry> {
    let mut entries = Vec::new();
    for line in non_empty_lines(raw_block) {
        match JobEntry::parse_line(line) {
            Some(entry) => {
                trace!("experience match: {:?} -> {}", line, entry.time_range());
                entries.push(entry);
            }
            None => trace!("experience line skipped: {:?}", line),
        }
    }
    debug!("parsed {} job entries", entries.len());
    entries
}

/// Like [`parse_experience_section`], but unmatched lines are kept as
/// [`ExperienceEntry::RawLine`].
pub fn parse_experience_lines(raw_block: &str) -> Vec<ExperienceEntry> {
    non_empty_lines(raw_block)
        .map(|line| match JobEntry::parse_line(line) {
            Some(entry) => ExperienceEntry::Structured(entry),
            None => ExperienceEntry::RawLine(line.to_string()),
        })
        .collect()
}

/// Determine the current job title.
///
/// Only the chronologically latest entry is considered. If it is not marked
/// as current the result is empty, even when an older entry is.
pub fn resolve_current_position(entries: &[JobEntry]) -> String {
    let mut sorted: Vec<&JobEntry> = entries.iter().collect();
    // sort_by is stable: ties keep caller order
    sorted.sort_by(|a, b| b.start_key().cmp(&a.start_key()));

    match sorted.first() {
        Some(latest) if latest.is_current() => {
            let title = latest.title();
            debug!("current position from {}: {:?}", latest.time_range(), title);
            title
        }
        Some(latest) => {
            debug!("latest entry {} is not current", latest.time_range());
            String::new()
        }
        None => String::new(),
    }
}

/// [`resolve_current_position`] over mixed entries; raw lines are ignored.
pub fn resolve_current_position_from(entries: &[ExperienceEntry]) -> String {
    let jobs: Vec<JobEntry> = entries.iter().filter_map(|e| e.as_job().cloned()).collect();
    resolve_current_position(&jobs)
}

/// Render entries as `"<time range>: <description>"` lines in caller order
pub fn format_experience(entries: &[JobEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{}: {}", e.time_range(), e.description()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render mixed entries; raw lines are emitted verbatim.
pub fn format_entries(entries: &[ExperienceEntry]) -> String {
    entries
        .iter()
        .map(|e| match e {
            ExperienceEntry::Structured(job) => format!("{}: {}", job.time_range(), job.description()),
            ExperienceEntry::RawLine(line) => line.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
