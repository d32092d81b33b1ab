//! Integration tests for catalog, requirement, and completed-course loading

use grad_planner::core::catalog::{load_completed, load_requirements, resolve_courses, Catalog};
use grad_planner::core::models::{CompletedSet, Difficulty, PrereqTree, Term};
use grad_planner::core::planner::filter_quarter;
use grad_planner::core::{ErrorKind, PlannerError};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const CATALOG: &str = r#"{
  "courses": [
    {
      "code": "I&C SCI 31",
      "name": "Introduction to Programming",
      "credits": 4,
      "offered_quarters": ["Fall 2025", "Winter 2026", "Summer 2026"],
      "difficulty": "easy"
    },
    {
      "code": "I&C SCI 32",
      "name": "Programming with Software Libraries",
      "prerequisites": ["I&C SCI 31"],
      "prereq_tree": {"AND": [{"prereqType": "course", "courseId": "I&C SCI 31"}]},
      "offered_quarters": ["Winter 2026", "Spring 2026"]
    },
    {
      "code": "MATH 2B",
      "name": "Single-Variable Calculus",
      "prerequisites": ["MATH 2A"],
      "prereq_tree": {"OR": [
        {"prereqType": "course", "courseId": "MATH 2A"},
        {"prereqType": "exam", "examName": "AP Calculus AB"}
      ]},
      "offered_quarters": ["Winter 2026"],
      "difficulty": "brutal"
    }
  ]
}"#;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write fixture");
    path
}

fn term(label: &str) -> Term {
    label.parse().unwrap()
}

#[test]
fn load_catalog_normalizes_and_parses() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "courses.json", CATALOG);

    let catalog = Catalog::load(&path).unwrap();

    assert_eq!(catalog.len(), 3);
    let intro = catalog.get("i&c sci 31").unwrap();
    assert_eq!(intro.code, "I&CSCI31");
    assert_eq!(intro.credits, Some(4));
    assert_eq!(intro.difficulty, Difficulty::Easy);
    // Unknown season labels are dropped
    assert_eq!(intro.offered, vec![term("Fall 2025"), term("Winter 2026")]);

    let calc = catalog.get("MATH2B").unwrap();
    assert_eq!(calc.difficulty, Difficulty::Unknown);
    assert!(matches!(calc.prereq_tree, Some(PrereqTree::Or(_))));
}

#[test]
fn load_catalog_reports_io_and_parse_errors() {
    let dir = TempDir::new().unwrap();

    let err = Catalog::load(&dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, PlannerError::Io { .. }));
    assert_eq!(err.kind(), ErrorKind::Io);

    let bad = write(&dir, "bad.json", "{\"courses\": [{\"name\": \"no code\"}]}");
    let err = Catalog::load(&bad).unwrap_err();
    assert!(matches!(err, PlannerError::Parse { .. }));
    assert_eq!(err.kind(), ErrorKind::InputValidation);
    assert!(err.to_string().contains("bad.json"));
}

#[test]
fn requirements_resolve_against_catalog() {
    let dir = TempDir::new().unwrap();
    let catalog = Catalog::from_json(CATALOG).unwrap();
    let path = write(
        &dir,
        "requirements.json",
        r#"[
          {"id": "lower-div", "num_needed": 2, "courses": ["I&C SCI 31", "I&C SCI 32"]},
          {"id": "math", "num_needed": 1, "courses": ["MATH 2B"]}
        ]"#,
    );

    let reqs = load_requirements(&path, &catalog).unwrap();

    assert_eq!(reqs.len(), 2);
    assert_eq!(reqs.total_needed(), 3);
    assert_eq!(reqs.get("lower-div").unwrap().courses.len(), 2);
}

#[test]
fn requirements_with_unknown_course_fail() {
    let dir = TempDir::new().unwrap();
    let catalog = Catalog::from_json(CATALOG).unwrap();
    let path = write(
        &dir,
        "requirements.json",
        r#"[{"id": "r", "num_needed": 1, "courses": ["COMPSCI 999"]}]"#,
    );

    let err = load_requirements(&path, &catalog).unwrap_err();

    assert!(matches!(&err, PlannerError::UnknownCourse { code } if code == "COMPSCI999"));
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(resolve_courses(&["MATH 2B", "NOPE 1"], &catalog).is_err());
}

#[test]
fn completed_file_accepts_lines_and_commas() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "completed.txt",
        "# transferred\nI&C SCI 31, math 2a\n\nWRITING 39A\n",
    );

    let completed = load_completed(&path).unwrap();

    assert_eq!(completed.len(), 3);
    assert!(completed.contains("I&C SCI 31"));
    assert!(completed.contains("MATH2A"));
    assert!(completed.contains("writing39a"));
}

#[test]
fn loaded_inputs_drive_the_filter() {
    let dir = TempDir::new().unwrap();
    let catalog = Catalog::from_json(CATALOG).unwrap();
    let reqs = load_requirements(
        &write(
            &dir,
            "requirements.json",
            r#"[
              {"id": "lower-div", "num_needed": 2, "courses": ["I&C SCI 31", "I&C SCI 32"]},
              {"id": "math", "num_needed": 1, "courses": ["MATH 2B"]}
            ]"#,
        ),
        &catalog,
    )
    .unwrap();
    let completed = load_completed(&write(&dir, "completed.txt", "I&C SCI 31\nMATH 2A")).unwrap();

    let winter = filter_quarter(&completed, &reqs, term("Winter 2026"));

    assert_eq!(winter.codes(), vec!["I&CSCI32", "MATH2B"]);
}

#[test]
fn tree_without_declared_list_still_gates_eligibility() {
    let catalog = Catalog::from_json(
        r#"{"courses": [
          {"code": "A", "name": "First", "offered_quarters": ["Winter 2026"]},
          {"code": "B", "name": "Second", "offered_quarters": ["Winter 2026"],
           "prereq_tree": {"prereqType": "course", "courseId": "A"}}
        ]}"#,
    )
    .unwrap();
    let dir = TempDir::new().unwrap();
    let reqs = load_requirements(
        &write(
            &dir,
            "requirements.json",
            r#"[{"id": "r", "num_needed": 2, "courses": ["A", "B"]}]"#,
        ),
        &catalog,
    )
    .unwrap();

    let before = filter_quarter(&CompletedSet::new(), &reqs, term("Winter 2026"));
    let after = filter_quarter(&["A"].into_iter().collect(), &reqs, term("Winter 2026"));

    assert_eq!(before.codes(), vec!["A"]);
    assert_eq!(after.codes(), vec!["B"]);
}
