//! Prerequisite expression tree and its evaluator
//!
//! Catalog trees arrive in the shape
//! `{"AND": [...]}` / `{"OR": [...]}` / `{"prereqType": "course", "courseId": "..."}`.
//! Any other leaf (exam credit, placement, unknown objects) is kept as
//! [`PrereqTree::Unsupported`] and never counts as satisfied.

use super::completed::CompletedSet;
use serde::{Deserialize, Deserializer, Serialize};

/// Boolean prerequisite expression over course codes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawTree", into = "RawTree")]
pub enum PrereqTree {
    /// Satisfied when the course code is completed
    Course(String),
    /// Satisfied when every child is; vacuously true when empty
    And(Vec<PrereqTree>),
    /// Satisfied when any child is; false when empty
    Or(Vec<PrereqTree>),
    /// A leaf kind the planner does not evaluate (e.g. `"exam"`)
    Unsupported(String),
}

impl PrereqTree {
    /// Shorthand for a course leaf
    pub fn course(code: impl Into<String>) -> Self {
        Self::Course(code.into())
    }

    /// Evaluate the expression against a completed-course set
    #[must_use]
    pub fn is_satisfied(&self, completed: &CompletedSet) -> bool {
        match self {
            Self::Course(code) => completed.contains(code),
            Self::And(children) => children.iter().all(|c| c.is_satisfied(completed)),
            Self::Or(children) => children.iter().any(|c| c.is_satisfied(completed)),
            Self::Unsupported(_) => false,
        }
    }

    /// Every course code mentioned in the tree, in first-seen order
    #[must_use]
    pub fn course_codes(&self) -> Vec<String> {
        let mut codes = Vec::new();
        self.collect_codes(&mut codes);
        codes
    }

    fn collect_codes(&self, codes: &mut Vec<String>) {
        match self {
            Self::Course(code) => {
                if !codes.contains(code) {
                    codes.push(code.clone());
                }
            }
            Self::And(children) | Self::Or(children) => {
                for child in children {
                    child.collect_codes(codes);
                }
            }
            Self::Unsupported(_) => {}
        }
    }
}

/// Evaluate an optional tree; an absent tree has no prerequisites.
#[must_use]
pub fn is_satisfied(tree: Option<&PrereqTree>, completed: &CompletedSet) -> bool {
    tree.map_or(true, |t| t.is_satisfied(completed))
}

/// Wire shape of a catalog prerequisite tree
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawTree {
    And {
        #[serde(rename = "AND")]
        and: Vec<RawTree>,
    },
    Or {
        #[serde(rename = "OR")]
        or: Vec<RawTree>,
    },
    Leaf {
        #[serde(rename = "prereqType")]
        prereq_type: String,
        #[serde(rename = "courseId", default, skip_serializing_if = "Option::is_none")]
        course_id: Option<String>,
    },
    Other(serde_json::Value),
}

impl From<RawTree> for PrereqTree {
    fn from(raw: RawTree) -> Self {
        match raw {
            RawTree::And { and } => Self::And(and.into_iter().map(Self::from).collect()),
            RawTree::Or { or } => Self::Or(or.into_iter().map(Self::from).collect()),
            RawTree::Leaf {
                prereq_type,
                course_id: Some(id),
            } if prereq_type.eq_ignore_ascii_case("course") => Self::Course(id),
            RawTree::Leaf { prereq_type, .. } => Self::Unsupported(prereq_type),
            RawTree::Other(_) => Self::Unsupported("unknown".to_string()),
        }
    }
}

impl From<PrereqTree> for RawTree {
    fn from(tree: PrereqTree) -> Self {
        match tree {
            PrereqTree::Course(id) => Self::Leaf {
                prereq_type: "course".to_string(),
                course_id: Some(id),
            },
            PrereqTree::And(children) => Self::And {
                and: children.into_iter().map(Self::from).collect(),
            },
            PrereqTree::Or(children) => Self::Or {
                or: children.into_iter().map(Self::from).collect(),
            },
            PrereqTree::Unsupported(kind) => Self::Leaf {
                prereq_type: kind,
                course_id: None,
            },
        }
    }
}

/// Deserialize an optional tree, treating `null` and `{}` as absent.
pub(crate) fn deserialize_tree<'de, D>(deserializer: D) -> Result<Option<PrereqTree>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Object(map)) if map.is_empty() => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
