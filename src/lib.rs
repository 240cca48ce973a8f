//! Heuristic CV (résumé) inspection
//!
//! This crate provides:
//! - Work-experience parsing and current-position resolution
//! - Checkbox-based gender detection in word-processing document markup
//! - Section and field extraction for Vietnamese application-form CVs
//! - Transcript loading from text, PDF and unpacked document parts

pub mod analyzer;
pub mod experience;
pub mod fields;
pub mod gender;
pub mod sections;
pub mod source;

pub use analyzer::{
    analyze_cv_text, AnalysisObserver, AnalysisOptions, CvAnalysis, CvAnalyzer, GenderSource,
    LogObserver,
};
pub use experience::{
    format_experience, parse_experience_section, resolve_current_position, ExperienceEntry, JobEntry,
};
pub use gender::{find_checked_gender, CheckboxConfig, CheckboxSymbol, Gender};
pub use source::{load_source, CvSource};

use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Load a CV file and analyze it with default options
pub fn process_cv<P: AsRef<Path>>(path: P) -> Result<CvAnalysis, CvError> {
    process_cv_with(path, &CvAnalyzer::default())
}

/// Load a CV file and analyze it with the given analyzer
pub fn process_cv_with<P: AsRef<Path>>(path: P, analyzer: &CvAnalyzer) -> Result<CvAnalysis, CvError> {
    let source = load_source(path)?;
    Ok(analyzer.analyze(&source.text, source.markup.as_deref()))
}

/// Process several CV files in parallel.
///
/// Results are returned in input order, one per path; a failing file does
/// not affect the others.
pub fn process_cv_batch<P: AsRef<Path> + Sync>(
    paths: &[P],
    analyzer: &CvAnalyzer,
) -> Vec<(PathBuf, Result<CvAnalysis, CvError>)> {
    paths
        .par_iter()
        .map(|p| {
            let path = p.as_ref().to_path_buf();
            let result = process_cv_with(&path, analyzer);
            (path, result)
        })
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum CvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF parsing error: {0}")]
    Pdf(String),
    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),
}

impl From<lopdf::Error> for CvError {
    fn from(e: lopdf::Error) -> Self {
        CvError::Pdf(e.to_string())
    }
}
