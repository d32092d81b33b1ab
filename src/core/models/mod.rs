//! Data models for `GradPlanner`

pub mod completed;
pub mod course;
pub mod prereq;
pub mod requirement;
pub mod term;

pub use completed::{normalize_code, CompletedSet};
pub use course::{Course, Difficulty, DEFAULT_CREDITS};
pub use prereq::PrereqTree;
pub use requirement::{RequirementGroup, RequirementMap};
pub use term::{Season, Term};
