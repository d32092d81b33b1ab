//! Course model

use super::completed::{normalize_code, CompletedSet};
use super::prereq::{self, PrereqTree};
use super::term::{self, Term};
use serde::{Deserialize, Deserializer, Serialize};

/// Credits assumed when a course record carries none
pub const DEFAULT_CREDITS: u32 = 4;

/// Difficulty tag derived outside the planner; opaque to planning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Difficulty {
    /// Easy course
    Easy,
    /// Medium course
    Medium,
    /// Hard course
    Hard,
    /// No tag, or a tag the planner does not recognize
    #[default]
    Unknown,
}

impl From<String> for Difficulty {
    fn from(tag: String) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "easy" => Self::Easy,
            "medium" => Self::Medium,
            "hard" => Self::Hard,
            _ => Self::Unknown,
        }
    }
}

/// A catalog course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CourseRecord")]
pub struct Course {
    /// Normalized course code (e.g., "COMPSCI161")
    pub code: String,

    /// Course title (e.g., "Design and Analysis of Algorithms")
    pub name: String,

    /// Units; `None` means the catalog did not say
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<u32>,

    /// Catalog description
    pub description: String,

    /// Declared prerequisite codes. An empty list means the course has no
    /// prerequisites, whatever its tree looks like.
    pub prerequisites: Vec<String>,

    /// Prerequisite expression
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prereq_tree: Option<PrereqTree>,

    /// Quarters the course is offered in
    #[serde(rename = "offered_quarters")]
    pub offered: Vec<Term>,

    /// Difficulty tag
    pub difficulty: Difficulty,
}

/// Course as written in a catalog or request
///
/// `prerequisites` stays `None` when the key is absent, in which case the list
/// is derived from the tree's course leaves.
#[derive(Deserialize)]
struct CourseRecord {
    #[serde(deserialize_with = "deserialize_code")]
    code: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    credits: Option<u32>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    prerequisites: Option<Vec<String>>,
    #[serde(default, deserialize_with = "prereq::deserialize_tree")]
    prereq_tree: Option<PrereqTree>,
    #[serde(
        default,
        rename = "offered_quarters",
        deserialize_with = "term::deserialize_offered"
    )]
    offered: Vec<Term>,
    #[serde(default)]
    difficulty: Difficulty,
}

impl From<CourseRecord> for Course {
    fn from(record: CourseRecord) -> Self {
        let prerequisites = record.prerequisites.unwrap_or_else(|| {
            record
                .prereq_tree
                .as_ref()
                .map(PrereqTree::course_codes)
                .unwrap_or_default()
        });
        Self {
            code: record.code,
            name: record.name,
            credits: record.credits,
            description: record.description,
            prerequisites,
            prereq_tree: record.prereq_tree,
            offered: record.offered,
            difficulty: record.difficulty,
        }
    }
}

impl Course {
    /// Create a course with no prerequisites, credits, or offerings
    ///
    /// # Arguments
    /// * `code` - Course code; normalized on construction
    /// * `name` - Course title
    pub fn new(code: &str, name: impl Into<String>) -> Self {
        Self {
            code: normalize_code(code),
            name: name.into(),
            credits: None,
            description: String::new(),
            prerequisites: Vec::new(),
            prereq_tree: None,
            offered: Vec::new(),
            difficulty: Difficulty::Unknown,
        }
    }

    /// Set the unit count
    #[must_use]
    pub const fn with_credits(mut self, credits: u32) -> Self {
        self.credits = Some(credits);
        self
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the prerequisite tree; the declared prerequisite list is derived from its course leaves
    #[must_use]
    pub fn with_prereq_tree(mut self, tree: PrereqTree) -> Self {
        self.prerequisites = tree.course_codes();
        self.prereq_tree = Some(tree);
        self
    }

    /// Add a quarter the course is offered in
    #[must_use]
    pub fn offered_in(mut self, term: Term) -> Self {
        if !self.offered.contains(&term) {
            self.offered.push(term);
        }
        self
    }

    /// Set the difficulty tag
    #[must_use]
    pub const fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Units, falling back to [`DEFAULT_CREDITS`]
    #[must_use]
    pub fn credits_or_default(&self) -> u32 {
        self.credits.unwrap_or(DEFAULT_CREDITS)
    }

    /// Whether the course is offered in `term`
    #[must_use]
    pub fn is_offered_in(&self, term: Term) -> bool {
        self.offered.contains(&term)
    }

    /// Whether the student may take this course given what they have completed
    #[must_use]
    pub fn prerequisites_met(&self, completed: &CompletedSet) -> bool {
        self.prerequisites.is_empty() || prereq::is_satisfied(self.prereq_tree.as_ref(), completed)
    }
}

fn deserialize_code<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|code| normalize_code(&code))
}
