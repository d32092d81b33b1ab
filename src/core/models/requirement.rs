//! Degree requirement groups

use super::completed::normalize_code;
use super::course::Course;
use serde::{Deserialize, Serialize};

/// A degree-requirement bucket: `num_needed` courses drawn from `courses`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementGroup {
    /// Stable requirement id (e.g., "upper-division-electives")
    pub id: String,

    /// Courses still needed from the pool
    pub num_needed: u32,

    /// Candidate pool, in catalog order. Pools of different groups may overlap.
    #[serde(default)]
    pub courses: Vec<Course>,
}

impl RequirementGroup {
    /// Create a requirement group
    pub fn new(id: impl Into<String>, num_needed: u32, courses: Vec<Course>) -> Self {
        Self {
            id: id.into(),
            num_needed,
            courses,
        }
    }

    /// Whether a course code is in the pool
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        let code = normalize_code(code);
        self.courses.iter().any(|c| c.code == code)
    }

    /// A group stays in play while it still needs courses and has candidates left
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.num_needed > 0 && !self.courses.is_empty()
    }
}

/// Requirement groups keyed by id, kept in insertion order
///
/// Insertion order is meaningful: eligible-course deduplication and backfill
/// both follow it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequirementMap {
    groups: Vec<RequirementGroup>,
}

impl RequirementMap {
    /// Create an empty map
    #[must_use]
    pub const fn new() -> Self {
        Self { groups: Vec::new() }
    }

    /// Insert a group, replacing any group with the same id in place
    pub fn insert(&mut self, group: RequirementGroup) {
        if let Some(existing) = self.groups.iter_mut().find(|g| g.id == group.id) {
            *existing = group;
        } else {
            self.groups.push(group);
        }
    }

    /// Look up a group by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&RequirementGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Groups in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, RequirementGroup> {
        self.groups.iter()
    }

    /// Number of groups
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no groups remain
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of courses still needed across all groups
    #[must_use]
    pub fn total_needed(&self) -> u32 {
        self.groups.iter().map(|g| g.num_needed).sum()
    }
}

impl FromIterator<RequirementGroup> for RequirementMap {
    fn from_iter<I: IntoIterator<Item = RequirementGroup>>(iter: I) -> Self {
        let mut map = Self::new();
        for group in iter {
            map.insert(group);
        }
        map
    }
}

impl<'a> IntoIterator for &'a RequirementMap {
    type Item = &'a RequirementGroup;
    type IntoIter = std::slice::Iter<'a, RequirementGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}
