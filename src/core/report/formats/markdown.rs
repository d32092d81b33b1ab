//! Markdown report generator
//!
//! Renders a plan as Markdown tables. These reports render well in GitHub,
//! GitLab, and VS Code.

use crate::core::report::{ReportContext, ReportGenerator};
use std::error::Error;
use std::fmt::Write;

/// Embedded Markdown report template
const MARKDOWN_TEMPLATE: &str = include_str!("../templates/plan.md");

/// Markdown report generator
#[derive(Debug, Clone, Copy)]
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the report using template substitution
    #[allow(clippy::unused_self)]
    fn render_template(&self, ctx: &ReportContext) -> String {
        let summary = ctx.summary;
        let mut output = MARKDOWN_TEMPLATE.to_string();

        output = output.replace("{{title}}", &ctx.title());
        output = output.replace("{{graduation_term}}", &summary.graduation_term.to_string());
        output = output.replace("{{terms_planned}}", &summary.terms_planned.to_string());
        output = output.replace("{{total_courses}}", &summary.total_courses.to_string());
        output = output.replace("{{total_units}}", &summary.total_units.to_string());
        output = output.replace("{{completed_count}}", &ctx.completed.len().to_string());

        output = output.replace("{{quarter_table}}", &Self::generate_quarter_table(ctx));
        output = output.replace(
            "{{requirements_status}}",
            &Self::generate_requirements_status(ctx),
        );

        output
    }

    /// One row per committed quarter
    fn generate_quarter_table(ctx: &ReportContext) -> String {
        let mut table = String::new();

        table.push_str("| Quarter | Courses | Units |\n");
        table.push_str("|---|---|---|\n");

        for quarter in &ctx.summary.plan {
            let courses = if quarter.courses.is_empty() {
                "-".to_string()
            } else {
                quarter
                    .courses
                    .iter()
                    .map(|c| format!("{} - {}", c.code, c.name))
                    .collect::<Vec<_>>()
                    .join("<br>")
            };
            let _ = writeln!(table, "| {} | {courses} | {} |", quarter.term, quarter.units());
        }

        table
    }

    /// Either a satisfied note or a table of open groups
    fn generate_requirements_status(ctx: &ReportContext) -> String {
        if !ctx.summary.requirements_remaining {
            return "All tracked requirements are covered by this plan.\n".to_string();
        }

        let mut section = String::from(
            "⚠️ Some requirements are still open after the graduation quarter.\n\n",
        );
        section.push_str("| Requirement | Courses still needed | Candidates left |\n");
        section.push_str("|---|---|---|\n");
        for group in &ctx.summary.remaining {
            let _ = writeln!(
                section,
                "| {} | {} | {} |",
                group.id, group.num_needed, group.candidates
            );
        }
        section
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for MarkdownReporter {
    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        Ok(self.render_template(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{CompletedSet, Term};
    use crate::core::planner::{
        CommittedQuarter, PlanSummary, PlannedCourse, RemainingRequirement, SessionState,
    };

    fn summary(remaining: Vec<RemainingRequirement>) -> PlanSummary {
        let term: Term = "Winter 2026".parse().unwrap();
        PlanSummary {
            session_id: "abcd1234".to_string(),
            state: SessionState::Complete,
            graduation_term: term,
            terms_planned: 1,
            total_courses: 2,
            total_units: 8,
            plan: vec![CommittedQuarter {
                term,
                courses: vec![
                    PlannedCourse {
                        code: "CS1".to_string(),
                        name: "Intro".to_string(),
                        credits: 4,
                    },
                    PlannedCourse {
                        code: "CS2".to_string(),
                        name: "Data Structures".to_string(),
                        credits: 4,
                    },
                ],
            }],
            requirements_remaining: !remaining.is_empty(),
            remaining,
        }
    }

    #[test]
    fn test_render_plan() {
        let summary = summary(Vec::new());
        let completed: CompletedSet = ["MATH1"].into_iter().collect();
        let ctx = ReportContext::new(&summary, &completed);

        let report = MarkdownReporter::new().render(&ctx).unwrap();

        assert!(report.starts_with("# Graduation Plan: Winter 2026"));
        assert!(report.contains("| Winter 2026 | CS1 - Intro<br>CS2 - Data Structures | 8 |"));
        assert!(report.contains("All tracked requirements are covered"));
        assert!(!report.contains("{{"));
    }

    #[test]
    fn test_render_open_requirements() {
        let summary = summary(vec![RemainingRequirement {
            id: "electives".to_string(),
            num_needed: 2,
            candidates: 5,
        }]);
        let completed = CompletedSet::new();
        let ctx = ReportContext::new(&summary, &completed).with_title("Plan for Sam");

        let report = MarkdownReporter::new().render(&ctx).unwrap();

        assert!(report.starts_with("# Plan for Sam"));
        assert!(report.contains("| electives | 2 | 5 |"));
    }
}
