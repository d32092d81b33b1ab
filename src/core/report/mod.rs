//! Report generation for finished graduation plans
//!
//! Renders a [`PlanSummary`] as Markdown (a per-quarter table built from an
//! embedded template) or as JSON.

pub mod formats;

use crate::core::models::CompletedSet;
use crate::core::planner::PlanSummary;
use std::error::Error;
use std::path::{Path, PathBuf};

pub use formats::{JsonReporter, MarkdownReporter, ReportFormat};

/// Data context for report generation
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    /// Finished plan
    pub summary: &'a PlanSummary,
    /// Courses completed before planning started
    pub completed: &'a CompletedSet,
    /// Optional student or plan label shown in the header
    pub title: Option<&'a str>,
}

impl<'a> ReportContext<'a> {
    /// Create a new report context
    #[must_use]
    pub const fn new(summary: &'a PlanSummary, completed: &'a CompletedSet) -> Self {
        Self {
            summary,
            completed,
            title: None,
        }
    }

    /// Set the header label
    #[must_use]
    pub const fn with_title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    /// Header label, defaulting to the graduation quarter
    #[must_use]
    pub fn title(&self) -> String {
        self.title.map_or_else(
            || format!("Graduation Plan: {}", self.summary.graduation_term),
            str::to_string,
        )
    }

    /// Default report file name for a format, e.g. `plan-spring-2026.md`
    #[must_use]
    pub fn default_file_name(&self, format: ReportFormat) -> PathBuf {
        let term = self.summary.graduation_term.to_string().to_lowercase().replace(' ', "-");
        PathBuf::from(format!("plan-{term}.{}", format.extension()))
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate a report to a file
    ///
    /// # Errors
    /// Returns an error if report generation or file writing fails
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let content = self.render(ctx)?;
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(output_path, content)?;
        Ok(())
    }

    /// Generate report content as a string
    ///
    /// # Errors
    /// Returns an error if report generation fails
    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>>;
}

/// Generator for a format
#[must_use]
pub fn reporter_for(format: ReportFormat) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Markdown => Box::new(MarkdownReporter::new()),
        ReportFormat::Json => Box::new(JsonReporter),
    }
}
