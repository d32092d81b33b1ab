//! Course command handler: catalog lookup

use super::{load_catalog, settings};
use grad_planner::config::Config;
use grad_planner::core::catalog::CourseInfo;
use grad_planner::core::planner::GraduationPlanner;
use grad_planner::error;

/// Run the course lookup
pub fn run(department: &str, course_number: &str, json: bool, config: &Config) {
    if let Err(e) = lookup(department, course_number, json, config) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn lookup(department: &str, course_number: &str, json: bool, config: &Config) -> Result<(), String> {
    let planner = GraduationPlanner::new(settings(config)?).with_catalog(load_catalog(config)?);
    let info = planner
        .course_info(department, course_number)
        .map_err(|e| format!("✗ {e}"))?;

    if json {
        let out = serde_json::to_string_pretty(&info).map_err(|e| {
            error!("Failed to encode course: {e}");
            format!("✗ {e}")
        })?;
        println!("{out}");
    } else {
        print_info(&info);
    }
    Ok(())
}

fn print_info(info: &CourseInfo) {
    println!("\n=== {} ({} units) ===", info.code, info.credits);
    println!("{}", info.name);
    if !info.description.is_empty() {
        println!("\n{}", info.description);
    }

    let prerequisites = if info.prerequisites.is_empty() {
        "none".to_string()
    } else {
        info.prerequisites.join(", ")
    };
    println!("\nPrerequisites: {prerequisites}");

    let offered: Vec<String> = info.offered_quarters.iter().map(ToString::to_string).collect();
    if offered.is_empty() {
        println!("Offered: not scheduled");
    } else {
        println!("Offered: {}", offered.join(", "));
    }
}
