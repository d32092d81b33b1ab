//! Library for `GradPlanner`
//! Prerequisite evaluation, quarter filtering, and multi-quarter graduation planning
//! shared by the CLI and any orchestration layer that embeds the planner.

pub mod core;
pub mod logger;

pub use crate::core::{config, get_version};
