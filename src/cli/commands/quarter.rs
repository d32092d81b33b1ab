//! Quarter command handler: single-term preview

use super::{load_catalog, load_student, settings};
use crate::args::StudentArgs;
use grad_planner::config::Config;
use grad_planner::core::models::Term;
use grad_planner::core::planner::{GraduationPlanner, Projection, QuarterPreview};
use grad_planner::core::DataGap;
use grad_planner::{error, verbose};

/// Run the quarter preview
pub fn run(term: &str, student: &StudentArgs, json: bool, config: &Config) {
    if let Err(e) = preview(term, student, json, config) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn preview(term: &str, student: &StudentArgs, json: bool, config: &Config) -> Result<(), String> {
    let term: Term = term.parse().map_err(|e| format!("✗ {e}"))?;
    let catalog = load_catalog(config)?;
    let inputs = load_student(student, &catalog)?;
    let planner = GraduationPlanner::new(settings(config)?);

    let preview = planner.preview_quarter(
        &inputs.completed,
        &inputs.requirements,
        term,
        student.courses_per_quarter,
        student.interests.as_deref(),
        Projection::Detailed,
    );

    if json {
        let out = serde_json::to_string_pretty(&preview).map_err(|e| {
            error!("Failed to encode preview: {e}");
            format!("✗ {e}")
        })?;
        println!("{out}");
    } else {
        print_preview(&preview);
    }
    Ok(())
}

fn print_preview(preview: &QuarterPreview) {
    println!("\n=== {} ===\n", preview.term);

    if preview.courses.is_empty() {
        println!("No eligible courses this quarter.");
        return;
    }

    println!("{} eligible course(s):", preview.num_eligible);
    for course in &preview.courses {
        let marker = if preview.recommended.contains(&course.code) {
            "★"
        } else {
            " "
        };
        let difficulty = course
            .difficulty
            .map(|d| format!("{d:?}").to_lowercase())
            .unwrap_or_default();
        println!(
            " {marker} {:<12} {:<40} {:>2} units  {:<8} [{}]",
            course.code,
            course.name,
            course.credits.unwrap_or_default(),
            difficulty,
            course.satisfies_requirement
        );
    }

    println!("\nRecommended: {}", preview.recommended.join(", "));

    let unknown: Vec<&str> = preview
        .gaps
        .iter()
        .filter_map(|gap| match gap {
            DataGap::UnknownDifficulty { code } => Some(code.as_str()),
            DataGap::NoEligibleCourses { .. } => None,
        })
        .collect();
    if !unknown.is_empty() {
        verbose!("No difficulty data for: {}", unknown.join(", "));
    }
}
