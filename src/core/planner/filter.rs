//! Quarter filter: which requirement courses a student can take in a given term

use crate::core::error::DataGap;
use crate::core::models::{CompletedSet, Course, Difficulty, RequirementMap, Term};
use crate::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Output shape for eligible courses
///
/// `Summary` is what a planning session works from; `Detailed` adds the credit
/// and difficulty columns shown in single-quarter previews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    /// Code, name, description, and requirement
    #[default]
    Summary,
    /// Summary plus credits and difficulty
    Detailed,
}

/// An eligible course annotated with the requirement group it was found under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibleCourse {
    /// The catalog course
    pub course: Course,
    /// Id of the first requirement group (in map order) listing the course
    pub requirement_id: String,
    /// That group's current `num_needed`
    pub num_needed: u32,
}

impl EligibleCourse {
    /// Project to the serializable view
    #[must_use]
    pub fn view(&self, projection: Projection) -> CourseView {
        let detailed = projection == Projection::Detailed;
        CourseView {
            code: self.course.code.clone(),
            name: self.course.name.clone(),
            description: self.course.description.clone(),
            satisfies_requirement: self.requirement_id.clone(),
            num_needed: self.num_needed,
            credits: detailed.then(|| self.course.credits_or_default()),
            difficulty: detailed.then_some(self.course.difficulty),
        }
    }
}

/// Serializable projection of an [`EligibleCourse`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseView {
    /// Course code
    pub code: String,
    /// Course title
    pub name: String,
    /// Catalog description
    pub description: String,
    /// Requirement group the course counts toward
    pub satisfies_requirement: String,
    /// Courses that group still needs
    pub num_needed: u32,
    /// Units (detailed projection only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<u32>,
    /// Difficulty tag (detailed projection only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

/// Result of filtering one quarter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuarterOptions {
    /// Quarter that was filtered
    pub term: Term,
    /// Eligible courses, deduplicated, in requirement-map order
    pub courses: Vec<EligibleCourse>,
}

impl QuarterOptions {
    /// Whether nothing is eligible
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Eligible course codes in order
    #[must_use]
    pub fn codes(&self) -> Vec<&str> {
        self.courses.iter().map(|c| c.course.code.as_str()).collect()
    }

    /// Project every eligible course
    #[must_use]
    pub fn views(&self, projection: Projection) -> Vec<CourseView> {
        self.courses.iter().map(|c| c.view(projection)).collect()
    }

    /// Non-fatal gaps for the chosen projection
    ///
    /// An empty result is reported as [`DataGap::NoEligibleCourses`]. Missing
    /// difficulty tags only matter when the projection shows difficulty.
    #[must_use]
    pub fn data_gaps(&self, projection: Projection) -> Vec<DataGap> {
        if self.courses.is_empty() {
            return vec![DataGap::NoEligibleCourses { term: self.term }];
        }
        if projection == Projection::Summary {
            return Vec::new();
        }
        self.courses
            .iter()
            .filter(|c| c.course.difficulty == Difficulty::Unknown)
            .map(|c| DataGap::UnknownDifficulty {
                code: c.course.code.clone(),
            })
            .collect()
    }
}

/// Collect the courses a student could take in `term`
///
/// A course qualifies when it is not completed, its prerequisites are met, and
/// it is offered in `term`. Courses listed in several groups appear once, under
/// the first group in map order. An empty result is a normal outcome.
#[must_use]
pub fn filter_quarter(
    completed: &CompletedSet,
    requirements: &RequirementMap,
    term: Term,
) -> QuarterOptions {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut courses = Vec::new();

    for group in requirements {
        for course in &group.courses {
            if completed.contains(&course.code) || seen.contains(course.code.as_str()) {
                continue;
            }
            if !course.prerequisites_met(completed) || !course.is_offered_in(term) {
                continue;
            }
            seen.insert(course.code.as_str());
            courses.push(EligibleCourse {
                course: course.clone(),
                requirement_id: group.id.clone(),
                num_needed: group.num_needed,
            });
        }
    }

    debug!(
        "{term}: {} eligible course(s) across {} requirement group(s)",
        courses.len(),
        requirements.len()
    );

    QuarterOptions { term, courses }
}
