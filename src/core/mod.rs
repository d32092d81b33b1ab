//! Core module for common functionality across all targets

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod planner;
pub mod report;

pub use error::{DataGap, ErrorKind, PlannerError, PlannerResult};

/// Returns the current version of the `GradPlanner` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
