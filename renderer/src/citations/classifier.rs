// Final-report classifier: decides whether a message gets a reference list

use serde::Serialize;

use super::markers::count_bracketed_integers;
use super::{FINAL_REPORT_MIN_CITATIONS, FINAL_REPORT_MIN_LENGTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportThresholds {
    pub min_length: usize,
    pub min_citations: usize,
}

impl Default for ReportThresholds {
    fn default() -> Self {
        Self {
            min_length: FINAL_REPORT_MIN_LENGTH,
            min_citations: FINAL_REPORT_MIN_CITATIONS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportAssessment {
    pub length: usize,
    pub citation_count: usize,
    pub is_final_report: bool,
}

/// Length is measured in characters, not bytes.
pub fn content_length(content: &str) -> usize {
    content.chars().count()
}

pub fn is_final_report(content: &str, thresholds: &ReportThresholds) -> bool {
    if content.is_empty() || content_length(content) < thresholds.min_length {
        return false;
    }
    count_bracketed_integers(content) >= thresholds.min_citations
}

/// Like [`is_final_report`], but reports the measured values as well.
pub fn assess(content: &str, thresholds: &ReportThresholds) -> ReportAssessment {
    let length = content_length(content);
    let citation_count = count_bracketed_integers(content);
    ReportAssessment {
        length,
        citation_count,
        is_final_report: length > 0
            && length >= thresholds.min_length
            && citation_count >= thresholds.min_citations,
    }
}
