//! JSON request/response envelope over the planner operations
//!
//! Requests are tagged by `op`:
//!
//! ```json
//! {"op":"start","graduation_term":"Spring 2026","completed":["CS1"],"requirements":[...]}
//! {"op":"get_quarter_plan","session_id":"1a2b3c4d","term":"Winter 2026"}
//! {"op":"course_info","department":"COMPSCI","course_number":"161"}
//! ```
//!
//! Every response is `{"ok":true,"data":...}` or
//! `{"ok":false,"error":{"kind":...,"message":...}}`.

use super::{GraduationPlanner, Projection, SessionStore, StartRequest};
use crate::core::error::{ErrorKind, PlannerError, PlannerResult};
use crate::core::models::{CompletedSet, Course, RequirementMap, Term};
use crate::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A planner call decoded from JSON
///
/// Required string arguments are optional here so a missing one is reported as
/// [`PlannerError::MissingArgument`] rather than a decode failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    /// Single-quarter preview outside a session
    FilterQuarter {
        /// Quarter label
        term: Option<String>,
        /// Completed course codes
        #[serde(default)]
        completed: CompletedSet,
        /// Requirement groups
        #[serde(default)]
        requirements: RequirementMap,
        /// Include credits and difficulty
        #[serde(default)]
        detailed: bool,
        /// Also run the selector with this many slots
        #[serde(default)]
        target: Option<usize>,
        /// Interest keywords for the selector
        #[serde(default)]
        interests: Option<String>,
    },
    /// Look up a course in the attached catalog
    CourseInfo {
        /// Department code, e.g. `COMPSCI`
        department: Option<String>,
        /// Course number, e.g. `161`
        course_number: Option<String>,
    },
    /// Begin a session
    Start {
        /// Graduation quarter label
        graduation_term: Option<String>,
        /// Completed course codes
        #[serde(default)]
        completed: CompletedSet,
        /// Requirement groups
        #[serde(default)]
        requirements: RequirementMap,
        /// Interest keywords
        #[serde(default)]
        interests: Option<String>,
        /// Courses per quarter
        #[serde(default)]
        courses_per_quarter: Option<usize>,
    },
    /// Recommend courses for a quarter of a session
    GetQuarterPlan {
        /// Session id
        session_id: Option<String>,
        /// Quarter label
        term: Option<String>,
    },
    /// Commit a quarter to a session
    AddQuarter {
        /// Session id
        session_id: Option<String>,
        /// Quarter label
        term: Option<String>,
        /// Course records to commit
        #[serde(default)]
        courses: Vec<Course>,
    },
    /// End a session
    Finish {
        /// Session id
        session_id: Option<String>,
    },
}

/// Error payload of a failed call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error category
    pub kind: ErrorKind,
    /// Human-readable message
    pub message: String,
}

/// Uniform response wrapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Whether the call succeeded
    pub ok: bool,
    /// Result payload on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Error payload on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl Envelope {
    /// Successful response
    #[must_use]
    pub const fn success(data: Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Failed response
    #[must_use]
    pub fn failure(err: &PlannerError) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(ErrorBody {
                kind: err.kind(),
                message: err.to_string(),
            }),
        }
    }
}

impl From<PlannerResult<Value>> for Envelope {
    fn from(result: PlannerResult<Value>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(err) => Self::failure(&err),
        }
    }
}

/// A required, non-blank string argument
fn required(name: &str, value: Option<String>) -> PlannerResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| PlannerError::MissingArgument {
            name: name.to_string(),
        })
}

/// A required quarter label
fn required_term(name: &str, value: Option<String>) -> PlannerResult<Term> {
    required(name, value)?.parse()
}

/// Execute one decoded request
///
/// # Errors
/// Propagates any [`PlannerError`] from argument checks or the planner.
pub fn handle<S: SessionStore>(
    planner: &GraduationPlanner<S>,
    request: Request,
) -> PlannerResult<Value> {
    let data = match request {
        Request::FilterQuarter {
            term,
            completed,
            requirements,
            detailed,
            target,
            interests,
        } => {
            let term = required_term("term", term)?;
            let projection = if detailed {
                Projection::Detailed
            } else {
                Projection::Summary
            };
            let preview = if target.is_some() || interests.is_some() {
                planner.preview_quarter(
                    &completed,
                    &requirements,
                    term,
                    target,
                    interests.as_deref(),
                    projection,
                )
            } else {
                planner.filter_quarter(&completed, &requirements, term, projection)
            };
            serde_json::to_value(preview)?
        }
        Request::CourseInfo {
            department,
            course_number,
        } => {
            let department = required("department", department)?;
            let course_number = required("course_number", course_number)?;
            serde_json::to_value(planner.course_info(&department, &course_number)?)?
        }
        Request::Start {
            graduation_term,
            completed,
            requirements,
            interests,
            courses_per_quarter,
        } => {
            let graduation_term = required_term("graduation_term", graduation_term)?;
            let summary = planner.start(StartRequest {
                graduation_term: Some(graduation_term),
                completed,
                requirements,
                interests,
                courses_per_quarter,
            })?;
            serde_json::to_value(summary)?
        }
        Request::GetQuarterPlan { session_id, term } => {
            let session_id = required("session_id", session_id)?;
            let term = required_term("term", term)?;
            serde_json::to_value(planner.get_quarter_plan(&session_id, term)?)?
        }
        Request::AddQuarter {
            session_id,
            term,
            courses,
        } => {
            let session_id = required("session_id", session_id)?;
            let term = required_term("term", term)?;
            serde_json::to_value(planner.add_quarter(&session_id, term, courses)?)?
        }
        Request::Finish { session_id } => {
            let session_id = required("session_id", session_id)?;
            serde_json::to_value(planner.finish(&session_id)?)?
        }
    };
    Ok(data)
}

/// Decode a JSON request, execute it, and wrap the outcome
#[must_use]
pub fn dispatch<S: SessionStore>(planner: &GraduationPlanner<S>, raw: &str) -> Envelope {
    let result = serde_json::from_str::<Request>(raw)
        .map_err(PlannerError::from)
        .and_then(|request| handle(planner, request));

    if let Err(err) = &result {
        warn!("Request failed: {err}");
    }
    Envelope::from(result)
}

/// [`dispatch`] with the envelope encoded as a single JSON line
#[must_use]
pub fn handle_json<S: SessionStore>(planner: &GraduationPlanner<S>, raw: &str) -> String {
    let envelope = dispatch(planner, raw);
    serde_json::to_string(&envelope).unwrap_or_else(|err| {
        format!(
            r#"{{"ok":false,"error":{{"kind":"input_validation","message":"failed to encode response: {err}"}}}}"#
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(planner: &GraduationPlanner, request: &Value) -> Envelope {
        dispatch(planner, &request.to_string())
    }

    fn requirements() -> Value {
        json!([{
            "id": "core",
            "num_needed": 1,
            "courses": [{"code": "cs 1", "name": "Intro", "offered_quarters": ["2026 Winter"]}]
        }])
    }

    #[test]
    fn test_full_session_over_envelope() {
        let planner = GraduationPlanner::default();

        let started = call(
            &planner,
            &json!({"op": "start", "graduation_term": "Winter 2026", "requirements": requirements()}),
        );
        assert!(started.ok);
        let data = started.data.unwrap();
        let id = data["session_id"].as_str().unwrap().to_string();
        assert_eq!(data["terms_remaining"], 1);

        let plan = call(
            &planner,
            &json!({"op": "get_quarter_plan", "session_id": id, "term": "Winter 2026"}),
        );
        let plan = plan.data.unwrap();
        assert_eq!(plan["num_selected"], 1);
        assert_eq!(plan["selected"][0]["code"], "CS1");

        let added = call(
            &planner,
            &json!({"op": "add_quarter", "session_id": id, "term": "Winter 2026",
                    "courses": [{"code": "CS1", "name": "Intro"}]}),
        );
        let added = added.data.unwrap();
        assert_eq!(added["total_units"], 4);
        assert_eq!(added["next_term"], Value::Null);

        let finished = call(&planner, &json!({"op": "finish", "session_id": id}));
        let summary = finished.data.unwrap();
        assert_eq!(summary["requirements_remaining"], false);
        assert_eq!(summary["total_courses"], 1);

        let again = call(&planner, &json!({"op": "finish", "session_id": id}));
        assert!(!again.ok);
        assert_eq!(again.error.unwrap().kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_missing_and_invalid_arguments() {
        let planner = GraduationPlanner::default();

        let missing = call(&planner, &json!({"op": "start"}));
        let error = missing.error.unwrap();
        assert_eq!(error.kind, ErrorKind::InputValidation);
        assert!(error.message.contains("graduation_term"));

        let blank = call(&planner, &json!({"op": "finish", "session_id": "  "}));
        assert_eq!(blank.error.unwrap().kind, ErrorKind::InputValidation);

        let bad_term = call(
            &planner,
            &json!({"op": "filter_quarter", "term": "Summer 2026"}),
        );
        assert_eq!(bad_term.error.unwrap().kind, ErrorKind::InputValidation);
    }

    #[test]
    fn test_course_info_lookup() {
        let catalog = crate::core::catalog::Catalog::from_json(
            r#"{"courses": [{"code": "COMPSCI 161", "name": "Algorithms",
                "prerequisites": ["I&C SCI 46"], "offered_quarters": ["Fall 2025"]}]}"#,
        )
        .unwrap();
        let planner = GraduationPlanner::default().with_catalog(catalog);

        let found = call(
            &planner,
            &json!({"op": "course_info", "department": "COMPSCI", "course_number": "161"}),
        );
        let data = found.data.unwrap();
        assert_eq!(data["name"], "Algorithms");
        assert_eq!(data["credits"], 4);
        assert_eq!(data["prerequisites"][0], "I&C SCI 46");
        assert_eq!(data["offered_quarters"][0], "Fall 2025");

        let missing = call(
            &planner,
            &json!({"op": "course_info", "department": "COMPSCI", "course_number": "999"}),
        );
        assert_eq!(missing.error.unwrap().kind, ErrorKind::NotFound);

        let no_number = call(&planner, &json!({"op": "course_info", "department": "COMPSCI"}));
        assert_eq!(no_number.error.unwrap().kind, ErrorKind::InputValidation);
    }

    #[test]
    fn test_undecodable_requests() {
        let planner = GraduationPlanner::default();

        for raw in ["not json", r#"{"op":"launch"}"#, r#"{"term":"Fall 2026"}"#] {
            let envelope = dispatch(&planner, raw);
            assert!(!envelope.ok, "{raw} should fail");
            assert_eq!(envelope.error.unwrap().kind, ErrorKind::InputValidation);
        }
    }

    #[test]
    fn test_filter_quarter_detailed() {
        let planner = GraduationPlanner::default();
        let envelope = call(
            &planner,
            &json!({"op": "filter_quarter", "term": "Winter 2026",
                    "requirements": requirements(), "detailed": true}),
        );

        let data = envelope.data.unwrap();
        assert_eq!(data["num_eligible"], 1);
        assert_eq!(data["courses"][0]["credits"], 4);
        assert_eq!(data["gaps"][0]["gap"], "unknown_difficulty");
    }

    #[test]
    fn test_handle_json_is_single_line() {
        let planner = GraduationPlanner::default();
        let line = handle_json(&planner, r#"{"op":"finish","session_id":"nope"}"#);

        assert!(!line.contains('\n'));
        let envelope: Envelope = serde_json::from_str(&line).unwrap();
        assert!(!envelope.ok);
        assert!(envelope.data.is_none());
    }
}
