//! CLI command handlers for `GradPlanner`.
//!
//! Each command is implemented in its own submodule; input loading shared by
//! `quarter`, `plan`, `course` and `session` lives here.

pub mod config;
pub mod course;
pub mod plan;
pub mod quarter;
pub mod session;

use crate::args::StudentArgs;
use grad_planner::config::Config;
use grad_planner::core::catalog::{self, Catalog};
use grad_planner::core::models::{CompletedSet, RequirementMap};
use grad_planner::core::planner::PlannerSettings;
use grad_planner::{error, info};
use std::path::PathBuf;

/// Everything a planning command needs about one student
pub struct StudentInputs {
    /// Completed course codes
    pub completed: CompletedSet,
    /// Requirement groups resolved against the catalog
    pub requirements: RequirementMap,
}

/// Planner settings from config, reported to the user on failure
pub fn settings(config: &Config) -> Result<PlannerSettings, String> {
    PlannerSettings::from_config(config).map_err(|e| {
        error!("Invalid planning config: {e}");
        format!("✗ Invalid planning config: {e}")
    })
}

/// Load the catalog named by config (or `--catalog`)
pub fn load_catalog(config: &Config) -> Result<Catalog, String> {
    if config.paths.catalog_file.is_empty() {
        return Err("✗ No catalog file configured; pass --catalog or set catalog_file".to_string());
    }
    let path = PathBuf::from(&config.paths.catalog_file);
    let catalog = Catalog::load(&path).map_err(|e| {
        error!("Failed to load catalog: {e}");
        format!("✗ {e}")
    })?;
    info!("Catalog loaded: {} course(s)", catalog.len());
    Ok(catalog)
}

/// Load completed courses and requirements for a student
pub fn load_student(student: &StudentArgs, catalog: &Catalog) -> Result<StudentInputs, String> {
    let mut completed = match &student.completed_file {
        Some(path) => catalog::load_completed(path).map_err(|e| format!("✗ {e}"))?,
        None => CompletedSet::new(),
    };
    if let Some(raw) = &student.completed {
        completed.extend(catalog::parse_completed(raw).iter());
    }

    let requirements = catalog::load_requirements(&student.requirements, catalog).map_err(|e| {
        error!("Failed to load requirements: {e}");
        format!("✗ {e}")
    })?;
    info!(
        "{} completed course(s), {} requirement group(s)",
        completed.len(),
        requirements.len()
    );

    Ok(StudentInputs {
        completed,
        requirements,
    })
}
