//! CV analysis orchestration
//!
//! [`CvAnalyzer`] runs the individual extractors over a transcript (and the
//! document markup when available) and assembles a [`CvAnalysis`]. Callers
//! that want to inspect intermediate results plug in an
//! [`AnalysisObserver`] instead of wrapping the extractors.

use crate::experience::{self, ExperienceEntry, JobEntry};
use crate::fields::{self, ContactInfo, EducationInfo, PersonalInfo};
use crate::gender::{self, CheckboxConfig, Gender};
use crate::sections::{self, APPLIED_POSITION_LOOKAHEAD};
use log::{debug, info, warn};

/// Where the reported gender came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenderSource {
    /// A ticked checkbox in the document markup
    Checkbox,
    /// A "Giới tính: ..." label in the transcript
    Text,
    /// Not found
    None,
}

/// Options for [`CvAnalyzer`]
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub checkbox: CheckboxConfig,
    /// Lines inspected after the applied-position header (default: 9)
    pub applied_position_lookahead: usize,
    /// Fall back to the text transcript when no checkbox gender is found
    pub text_gender_fallback: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            checkbox: CheckboxConfig::default(),
            applied_position_lookahead: APPLIED_POSITION_LOOKAHEAD,
            text_gender_fallback: true,
        }
    }
}

/// Everything extracted from one CV
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CvAnalysis {
    pub personal: PersonalInfo,
    pub contact: ContactInfo,
    pub education: EducationInfo,
    pub experience: Vec<ExperienceEntry>,
    pub current_position: String,
    pub formatted_experience: String,
    pub applied_position: String,
    pub gender_source: GenderSource,
}

impl CvAnalysis {
    /// Parsed job entries, skipping raw lines
    pub fn jobs(&self) -> Vec<&JobEntry> {
        self.experience.iter().filter_map(ExperienceEntry::as_job).collect()
    }

    /// Names of fields that came back empty and need manual review
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let checks = [
            ("name", self.personal.name.is_empty()),
            ("date_of_birth", self.personal.date_of_birth.is_empty()),
            ("gender", self.personal.gender.is_none()),
            ("email", self.contact.email.is_empty()),
            ("phone", self.contact.phone.is_empty()),
            ("education", self.education.level.is_empty()),
            ("school", self.education.school.is_empty()),
            ("major", self.education.major.is_empty()),
            ("experience", self.experience.is_empty()),
            ("current_position", self.current_position.is_empty()),
            ("applied_position", self.applied_position.is_empty()),
        ];
        checks
            .iter()
            .filter(|(_, missing)| *missing)
            .map(|(name, _)| *name)
            .collect()
    }
}

/// Hooks called while a CV is analyzed. All methods default to no-ops.
pub trait AnalysisObserver: Send + Sync {
    fn on_experience_section(&self, _section: Option<&str>) {}
    fn on_experience(&self, _entries: &[ExperienceEntry]) {}
    fn on_current_position(&self, _jobs: &[JobEntry], _position: &str) {}
    fn on_gender(&self, _gender: Option<Gender>, _source: GenderSource) {}
    fn on_complete(&self, _analysis: &CvAnalysis) {}
}

/// Observer that reports through the `log` facade
#[derive(Debug, Default)]
pub struct LogObserver;

impl AnalysisObserver for LogObserver {
    fn on_experience_section(&self, section: Option<&str>) {
        match section {
            Some(s) => debug!("experience section: {} chars", s.len()),
            None => warn!("experience section not found"),
        }
    }

    fn on_experience(&self, entries: &[ExperienceEntry]) {
        for (idx, entry) in entries.iter().enumerate() {
            match entry {
                ExperienceEntry::Structured(job) => debug!(
                    "  {}. {} - {} (current: {})",
                    idx + 1,
                    job.time_range(),
                    job.position(),
                    job.is_current()
                ),
                ExperienceEntry::RawLine(line) => debug!("  {}. {}", idx + 1, line),
            }
        }
    }

    fn on_current_position(&self, jobs: &[JobEntry], position: &str) {
        info!("current position {:?} from {} job entries", position, jobs.len());
    }

    fn on_gender(&self, gender: Option<Gender>, source: GenderSource) {
        match gender {
            Some(g) => info!("gender {} ({:?})", g, source),
            None => info!("gender not found"),
        }
    }

    fn on_complete(&self, analysis: &CvAnalysis) {
        for field in analysis.missing_fields() {
            warn!("field {} is empty", field);
        }
    }
}

/// Composes the extractors into a full CV analysis
pub struct CvAnalyzer {
    options: AnalysisOptions,
    observer: Option<Box<dyn AnalysisObserver>>,
}

impl Default for CvAnalyzer {
    fn default() -> Self {
        Self::new(AnalysisOptions::default())
    }
}

impl CvAnalyzer {
    pub fn new(options: AnalysisOptions) -> Self {
        Self {
            options,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn AnalysisObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    fn notify(&self, f: impl FnOnce(&dyn AnalysisObserver)) {
        if let Some(observer) = &self.observer {
            f(observer.as_ref());
        }
    }

    /// Analyze a transcript, optionally with the document markup it came from
    pub fn analyze(&self, text: &str, markup: Option<&str>) -> CvAnalysis {
        let section = sections::find_experience_section(text);
        self.notify(|o| o.on_experience_section(section));

        let experience = section.map(experience::parse_experience_lines).unwrap_or_default();
        self.notify(|o| o.on_experience(&experience));

        let jobs: Vec<JobEntry> = experience.iter().filter_map(|e| e.as_job().cloned()).collect();
        let current_position = experience::resolve_current_position(&jobs);
        self.notify(|o| o.on_current_position(&jobs, &current_position));

        let formatted_experience = experience::format_entries(&experience);
        let applied_position =
            sections::find_applied_position(text, self.options.applied_position_lookahead);

        let mut personal = fields::extract_personal_info(text);
        let (gender, gender_source) = self.resolve_gender(text, markup);
        personal.gender = gender;
        self.notify(|o| o.on_gender(gender, gender_source));

        let analysis = CvAnalysis {
            personal,
            contact: fields::extract_contact_info(text),
            education: fields::extract_education_info(text),
            experience,
            current_position,
            formatted_experience,
            applied_position,
            gender_source,
        };
        self.notify(|o| o.on_complete(&analysis));
        analysis
    }

    fn resolve_gender(&self, text: &str, markup: Option<&str>) -> (Option<Gender>, GenderSource) {
        if let Some(g) = markup.and_then(|m| gender::find_checked_gender_with_config(m, &self.options.checkbox)) {
            return (Some(g), GenderSource::Checkbox);
        }
        if self.options.text_gender_fallback {
            if let Some(g) = fields::gender_from_text(text) {
                return (Some(g), GenderSource::Text);
            }
        }
        (None, GenderSource::None)
    }
}

/// Analyze a transcript with default options and no observer
pub fn analyze_cv_text(text: &str) -> CvAnalysis {
    CvAnalyzer::default().analyze(text, None)
}
