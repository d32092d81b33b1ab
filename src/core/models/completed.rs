//! Completed-course set

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Normalize a course code for comparison: strip all whitespace and uppercase.
///
/// `"compsci 161"` and `"COMPSCI161"` name the same course.
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Set of normalized course codes a student has completed
///
/// Grows monotonically; there is no removal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct CompletedSet {
    codes: BTreeSet<String>,
}

impl CompletedSet {
    /// Create an empty set
    #[must_use]
    pub const fn new() -> Self {
        Self {
            codes: BTreeSet::new(),
        }
    }

    /// Add a code (normalized). Returns `true` if it was not already present.
    pub fn insert(&mut self, code: &str) -> bool {
        self.codes.insert(normalize_code(code))
    }

    /// Whether the code (normalized) is in the set
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(&normalize_code(code))
    }

    /// Number of completed courses
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether nothing has been completed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Codes in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for CompletedSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<S: AsRef<str>> Extend<S> for CompletedSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for code in iter {
            self.insert(code.as_ref());
        }
    }
}

impl From<Vec<String>> for CompletedSet {
    fn from(codes: Vec<String>) -> Self {
        codes.into_iter().collect()
    }
}

impl From<CompletedSet> for Vec<String> {
    fn from(set: CompletedSet) -> Self {
        set.codes.into_iter().collect()
    }
}
