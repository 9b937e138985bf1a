use anyhow::{ensure, Result};
use config::Environment;
use serde::Deserialize;

use crate::citations::classifier::ReportThresholds;
use crate::citations::references::ReferenceStyle;
use crate::citations::render::RenderOptions;
use crate::citations::{DEFAULT_SOURCES_HEADING, FINAL_REPORT_MIN_CITATIONS, FINAL_REPORT_MIN_LENGTH};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub log_level: String,
    pub final_report_min_length: usize,
    pub final_report_min_citations: usize,
    pub sources_heading: String,
    pub cache_capacity: usize,
    pub max_body_bytes: u64,
    /// Comma-separated browser origins; empty allows any.
    pub cors_allowed_origins: String,
}

impl Config {
    /// Reads `CITATION_*` environment variables, after loading `.env` if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::load(Environment::with_prefix("CITATION").try_parsing(true))
    }

    fn load(environment: Environment) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("port", 8080i64)?
            .set_default("log_level", "info")?
            .set_default("final_report_min_length", FINAL_REPORT_MIN_LENGTH as i64)?
            .set_default("final_report_min_citations", FINAL_REPORT_MIN_CITATIONS as i64)?
            .set_default("sources_heading", DEFAULT_SOURCES_HEADING)?
            .set_default("cache_capacity", 1024i64)?
            .set_default("max_body_bytes", 2i64 * 1024 * 1024)?
            .set_default("cors_allowed_origins", "")?
            .add_source(environment)
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            !self.sources_heading.trim().is_empty(),
            "sources_heading must not be blank"
        );
        ensure!(self.max_body_bytes > 0, "max_body_bytes must be positive");
        for origin in self.allowed_origins() {
            let parts = origin.split_once("://");
            ensure!(
                matches!(parts, Some((scheme, host)) if !scheme.is_empty() && !host.is_empty() && !host.contains('/')),
                "cors origin '{}' must look like scheme://host[:port]",
                origin
            );
        }
        Ok(())
    }

    pub fn allowed_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            thresholds: ReportThresholds {
                min_length: self.final_report_min_length,
                min_citations: self.final_report_min_citations,
            },
            style: ReferenceStyle {
                heading: self.sources_heading.clone(),
            },
        }
    }
}
