// Citation pipeline: source extraction, final-report detection, and marker rewriting

pub mod classifier;
pub mod extractor;
pub mod injector;
pub mod markers;
pub mod matcher;
pub mod parser;
pub mod references;
pub mod render;
pub mod sanitizer;

/// Minimum body length (in characters) for a message to count as a final report.
pub const FINAL_REPORT_MIN_LENGTH: usize = 500;
/// Minimum number of `[n]` markers for a message to count as a final report.
pub const FINAL_REPORT_MIN_CITATIONS: usize = 3;
/// Heading of the appended reference list.
pub const DEFAULT_SOURCES_HEADING: &str = "Sources";
