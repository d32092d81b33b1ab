//! Course catalog and planner input loading
//!
//! The catalog is a JSON document of the form `{"courses": [ ... ]}`. Requirement
//! files list groups by course code and are resolved against the catalog into a
//! [`RequirementMap`]. Completed courses come from a comma or newline separated
//! list.

use crate::core::error::{PlannerError, PlannerResult};
use crate::core::models::{
    normalize_code, CompletedSet, Course, Difficulty, RequirementGroup, RequirementMap, Term,
};
use crate::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// On-disk catalog shape
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    courses: Vec<Course>,
}

/// Course records indexed by normalized code
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    courses: Vec<Course>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from course records
    ///
    /// The first record wins when a code appears more than once.
    #[must_use]
    pub fn from_courses(courses: Vec<Course>) -> Self {
        let mut kept: Vec<Course> = Vec::with_capacity(courses.len());
        let mut index = HashMap::with_capacity(courses.len());

        for course in courses {
            if index.contains_key(&course.code) {
                warn!("Duplicate catalog entry for {}; keeping the first", course.code);
                continue;
            }
            index.insert(course.code.clone(), kept.len());
            kept.push(course);
        }

        Self {
            courses: kept,
            index,
        }
    }

    /// Parse a catalog document
    ///
    /// # Errors
    /// Returns [`PlannerError::Json`] if the document does not match the catalog shape.
    pub fn from_json(json: &str) -> PlannerResult<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Ok(Self::from_courses(file.courses))
    }

    /// Load a catalog file
    ///
    /// # Errors
    /// Returns [`PlannerError::Io`] if the file cannot be read and
    /// [`PlannerError::Parse`] if its JSON does not match the catalog shape.
    pub fn load(path: &Path) -> PlannerResult<Self> {
        let content = read(path)?;
        let file: CatalogFile =
            serde_json::from_str(&content).map_err(|source| PlannerError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let catalog = Self::from_courses(file.courses);
        debug!(
            "Loaded {} course(s) from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Look up a course by code; the code is normalized first
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Course> {
        self.index
            .get(&normalize_code(code))
            .map(|&idx| &self.courses[idx])
    }

    /// Look up a course that must exist
    ///
    /// # Errors
    /// Returns [`PlannerError::UnknownCourse`] if the code is not in the catalog.
    pub fn require(&self, code: &str) -> PlannerResult<&Course> {
        self.get(code).ok_or_else(|| PlannerError::UnknownCourse {
            code: normalize_code(code),
        })
    }

    /// Look up a course by department and number, e.g. `("I&C SCI", "32A")`
    ///
    /// # Errors
    /// Returns [`PlannerError::UnknownCourse`] if no such course is in the catalog.
    pub fn course_info(&self, department: &str, course_number: &str) -> PlannerResult<CourseInfo> {
        self.require(&format!("{department}{course_number}"))
            .map(CourseInfo::from)
    }

    /// Number of courses
    #[must_use]
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Courses in file order
    pub fn iter(&self) -> std::slice::Iter<'_, Course> {
        self.courses.iter()
    }
}

/// Catalog details for one course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseInfo {
    /// Normalized course code
    pub code: String,
    /// Course title
    pub name: String,
    /// Units, defaulted when the catalog does not say
    pub credits: u32,
    /// Catalog description
    pub description: String,
    /// Declared prerequisite codes
    pub prerequisites: Vec<String>,
    /// Quarters the course is offered in
    pub offered_quarters: Vec<Term>,
    /// Difficulty tag
    pub difficulty: Difficulty,
}

impl From<&Course> for CourseInfo {
    fn from(course: &Course) -> Self {
        Self {
            code: course.code.clone(),
            name: course.name.clone(),
            credits: course.credits_or_default(),
            description: course.description.clone(),
            prerequisites: course.prerequisites.clone(),
            offered_quarters: course.offered.clone(),
            difficulty: course.difficulty,
        }
    }
}

/// A requirement group as written in a requirements file: pool given by code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementSpec {
    /// Stable requirement id
    pub id: String,
    /// Courses still needed from the pool
    pub num_needed: u32,
    /// Pool course codes
    #[serde(default)]
    pub courses: Vec<String>,
}

/// Resolve requirement specs against the catalog, keeping file order
///
/// Duplicate codes within one pool are collapsed.
///
/// # Errors
/// Returns [`PlannerError::UnknownCourse`] for the first code not in the catalog.
pub fn resolve_requirements(
    specs: &[RequirementSpec],
    catalog: &Catalog,
) -> PlannerResult<RequirementMap> {
    let mut map = RequirementMap::new();
    for spec in specs {
        let mut pool: Vec<Course> = Vec::with_capacity(spec.courses.len());
        for code in &spec.courses {
            let course = catalog.require(code)?;
            if !pool.iter().any(|c| c.code == course.code) {
                pool.push(course.clone());
            }
        }
        map.insert(RequirementGroup::new(spec.id.clone(), spec.num_needed, pool));
    }
    Ok(map)
}

/// Load and resolve a requirements file (a JSON array of [`RequirementSpec`])
///
/// # Errors
/// Returns [`PlannerError::Io`] or [`PlannerError::Parse`] for unreadable or
/// malformed files and [`PlannerError::UnknownCourse`] for codes missing from
/// the catalog.
pub fn load_requirements(path: &Path, catalog: &Catalog) -> PlannerResult<RequirementMap> {
    let content = read(path)?;
    let specs: Vec<RequirementSpec> =
        serde_json::from_str(&content).map_err(|source| PlannerError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    resolve_requirements(&specs, catalog)
}

/// Resolve course codes to full catalog records, in order
///
/// # Errors
/// Returns [`PlannerError::UnknownCourse`] for the first code not in the catalog.
pub fn resolve_courses<S: AsRef<str>>(codes: &[S], catalog: &Catalog) -> PlannerResult<Vec<Course>> {
    codes
        .iter()
        .map(|code| catalog.require(code.as_ref()).cloned())
        .collect()
}

/// Parse completed course codes separated by commas or newlines
///
/// Blank entries and `#` comment lines are skipped; codes are normalized.
#[must_use]
pub fn parse_completed(raw: &str) -> CompletedSet {
    raw.lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .collect()
}

/// Read completed course codes from a file, one per line or comma separated
///
/// # Errors
/// Returns [`PlannerError::Io`] if the file cannot be read.
pub fn load_completed(path: &Path) -> PlannerResult<CompletedSet> {
    read(path).map(|content| parse_completed(&content))
}

fn read(path: &Path) -> PlannerResult<String> {
    fs::read_to_string(path).map_err(|source| PlannerError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "courses": [
            {"code": "COMPSCI 161", "name": "Algorithms", "credits": 4},
            {"code": "COMPSCI171", "name": "AI"},
            {"code": "compsci161", "name": "Duplicate"}
        ]
    }"#;

    #[test]
    fn test_from_json_indexes_and_dedups() {
        let catalog = Catalog::from_json(CATALOG).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("compsci 161").unwrap().name, "Algorithms");
        assert!(catalog.get("COMPSCI999").is_none());
        assert!(matches!(
            catalog.require("COMPSCI 999"),
            Err(PlannerError::UnknownCourse { code }) if code == "COMPSCI999"
        ));
    }

    #[test]
    fn test_course_info_joins_department_and_number() {
        let catalog = Catalog::from_json(CATALOG).unwrap();

        let info = catalog.course_info("compsci", "171").unwrap();
        assert_eq!(info.code, "COMPSCI171");
        assert_eq!(info.name, "AI");
        assert_eq!(info.credits, 4);

        let err = catalog.course_info("COMPSCI", "999").unwrap_err();
        assert!(matches!(err, PlannerError::UnknownCourse { code } if code == "COMPSCI999"));
    }

    #[test]
    fn test_resolve_requirements_keeps_order() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let specs = vec![
            RequirementSpec {
                id: "ai".to_string(),
                num_needed: 1,
                courses: vec!["COMPSCI171".to_string()],
            },
            RequirementSpec {
                id: "theory".to_string(),
                num_needed: 1,
                courses: vec!["compsci161".to_string(), "COMPSCI 161".to_string()],
            },
        ];

        let map = resolve_requirements(&specs, &catalog).unwrap();

        let ids: Vec<&str> = map.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["ai", "theory"]);
        assert_eq!(map.get("theory").unwrap().courses.len(), 1);
    }

    #[test]
    fn test_resolve_unknown_code() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let specs = vec![RequirementSpec {
            id: "r".to_string(),
            num_needed: 1,
            courses: vec!["NOPE1".to_string()],
        }];

        let err = resolve_requirements(&specs, &catalog).unwrap_err();
        assert!(matches!(err, PlannerError::UnknownCourse { .. }));
        assert!(resolve_courses(&["NOPE1"], &catalog).is_err());
    }

    #[test]
    fn test_parse_completed() {
        let completed = parse_completed("compsci 161, I&CSCI46\n# transfer credit\n\nMATH2A,");

        assert_eq!(completed.len(), 3);
        assert!(completed.contains("COMPSCI161"));
        assert!(completed.contains("I&CSCI46"));
        assert!(completed.contains("math2a"));
    }
}
