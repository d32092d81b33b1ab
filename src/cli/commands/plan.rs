//! Plan command handler: run a full session through graduation

use super::{load_catalog, load_student, settings, StudentInputs};
use crate::args::StudentArgs;
use grad_planner::config::Config;
use grad_planner::core::models::Term;
use grad_planner::core::planner::{GraduationPlanner, PlanSummary, StartRequest};
use grad_planner::core::report::{reporter_for, ReportContext, ReportFormat};
use grad_planner::core::PlannerResult;
use grad_planner::{error, info, verbose};
use std::path::{Path, PathBuf};

/// Options for the plan command
pub struct PlanOptions<'a> {
    /// Graduation quarter label
    pub graduation_term: &'a str,
    /// Student inputs
    pub student: &'a StudentArgs,
    /// Print JSON instead of text
    pub json: bool,
    /// Report format, if a report was requested
    pub report: Option<&'a str>,
    /// Report path override
    pub output: Option<&'a Path>,
}

/// Run the plan command
pub fn run(options: &PlanOptions, config: &Config) {
    if let Err(e) = plan(options, config) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn plan(options: &PlanOptions, config: &Config) -> Result<(), String> {
    let graduation_term: Term = options
        .graduation_term
        .parse()
        .map_err(|e| format!("✗ {e}"))?;
    let report_format = options
        .report
        .map(str::parse::<ReportFormat>)
        .transpose()
        .map_err(|e| format!("✗ {e}"))?;

    let catalog = load_catalog(config)?;
    let inputs = load_student(options.student, &catalog)?;
    let planner = GraduationPlanner::new(settings(config)?);

    let summary = run_session(&planner, graduation_term, options.student, &inputs).map_err(|e| {
        error!("Planning failed: {e}");
        format!("✗ {e}")
    })?;

    if options.json {
        let out = serde_json::to_string_pretty(&summary).map_err(|e| format!("✗ {e}"))?;
        println!("{out}");
    } else {
        print_summary(&summary);
    }

    if let Some(format) = report_format {
        let ctx = ReportContext::new(&summary, &inputs.completed);
        let path = options.output.map_or_else(
            || PathBuf::from(&config.paths.reports_dir).join(ctx.default_file_name(format)),
            Path::to_path_buf,
        );
        reporter_for(format).generate(&ctx, &path).map_err(|e| {
            error!("Report generation failed: {e}");
            format!("✗ Failed to write report {}: {e}", path.display())
        })?;
        println!("✓ Report generated: {}", path.display());
    }

    Ok(())
}

/// Accept the recommended courses for every quarter, then finish
///
/// # Errors
/// Propagates planner errors.
pub fn run_session(
    planner: &GraduationPlanner,
    graduation_term: Term,
    student: &StudentArgs,
    inputs: &StudentInputs,
) -> PlannerResult<PlanSummary> {
    let started = planner.start(StartRequest {
        graduation_term: Some(graduation_term),
        completed: inputs.completed.clone(),
        requirements: inputs.requirements.clone(),
        interests: student.interests.clone(),
        courses_per_quarter: student.courses_per_quarter,
    })?;
    verbose!("{}", started.message);

    let session_id = started.session_id;
    let mut next = Some(started.next_term);
    while let Some(term) = next {
        let quarter = planner.get_quarter_plan(&session_id, term)?;
        verbose!("{}", quarter.message);
        let commit = planner.add_quarter(&session_id, term, quarter.courses)?;
        info!("{} ({} units)", commit.message, commit.total_units);
        next = commit.next_term;
    }

    planner.finish(&session_id)
}

fn print_summary(summary: &PlanSummary) {
    println!("\n=== Plan through {} ===\n", summary.graduation_term);

    for quarter in &summary.plan {
        println!("{} ({} units)", quarter.term, quarter.units());
        if quarter.courses.is_empty() {
            println!("  (no eligible courses)");
        }
        for course in &quarter.courses {
            println!("  {:<12} {}", course.code, course.name);
        }
    }

    println!(
        "\n{} course(s), {} units over {} quarter(s)",
        summary.total_courses, summary.total_units, summary.terms_planned
    );

    if summary.requirements_remaining {
        println!("\n⚠️  Requirements still open:");
        for group in &summary.remaining {
            println!(
                "  {}: {} more needed ({} candidate(s) left)",
                group.id, group.num_needed, group.candidates
            );
        }
    } else {
        println!("✓ All tracked requirements covered");
    }
}
