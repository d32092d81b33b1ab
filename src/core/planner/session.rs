//! Planning session: state carried across quarter-by-quarter planning calls

use super::filter::{filter_quarter, CourseView, Projection};
use super::selector::{select_courses, InterestScorer, KeywordScorer};
use super::tracker::update_requirements;
use crate::core::error::{DataGap, PlannerError, PlannerResult};
use crate::core::models::{CompletedSet, Course, RequirementMap, Term};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Started, nothing committed yet
    Created,
    /// At least one quarter committed
    Planning,
    /// Finished; the session has left the store
    Complete,
}

/// A course as recorded in a committed quarter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedCourse {
    /// Course code
    pub code: String,
    /// Course title
    pub name: String,
    /// Units, defaulted when the catalog had none
    pub credits: u32,
}

impl From<&Course> for PlannedCourse {
    fn from(course: &Course) -> Self {
        Self {
            code: course.code.clone(),
            name: course.name.clone(),
            credits: course.credits_or_default(),
        }
    }
}

/// One committed quarter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedQuarter {
    /// The quarter
    pub term: Term,
    /// Courses planned in it
    pub courses: Vec<PlannedCourse>,
}

impl CommittedQuarter {
    /// Total units for the quarter
    #[must_use]
    pub fn units(&self) -> u32 {
        self.courses.iter().map(|c| c.credits).sum()
    }
}

/// Requirement group still open at the end of planning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemainingRequirement {
    /// Requirement id
    pub id: String,
    /// Courses still needed
    pub num_needed: u32,
    /// Candidates left in the pool
    pub candidates: usize,
}

/// Returned by `start`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartSummary {
    /// Opaque session id
    pub session_id: String,
    /// Target graduation quarter
    pub graduation_term: Term,
    /// Quarters to plan, from the planning start through graduation
    pub terms_to_plan: Vec<Term>,
    /// Number of quarters to plan
    pub terms_remaining: usize,
    /// First quarter to plan
    pub next_term: Term,
    /// Human-readable status line
    pub message: String,
}

/// Returned by `get_quarter_plan`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterPlan {
    /// Quarter being planned
    pub term: Term,
    /// Recommended courses
    pub selected: Vec<CourseView>,
    /// Number of recommended courses
    pub num_selected: usize,
    /// Non-fatal data gaps
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gaps: Vec<DataGap>,
    /// Human-readable status line
    pub message: String,
    /// Full records of the recommended courses, ready to commit
    #[serde(skip)]
    pub courses: Vec<Course>,
}

/// Returned by `add_quarter`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterCommit {
    /// Quarter that was committed
    pub term_added: Term,
    /// Number of courses committed
    pub courses_added: usize,
    /// Committed courses
    pub courses: Vec<PlannedCourse>,
    /// Units committed in this quarter
    pub total_units: u32,
    /// Whether any requirement group is still open
    pub requirements_remaining: bool,
    /// Next quarter to plan; `None` once the graduation quarter is committed
    pub next_term: Option<Term>,
    /// Human-readable status line
    pub message: String,
}

/// Returned by `finish`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Session id the plan came from
    pub session_id: String,
    /// Final state of the session
    pub state: SessionState,
    /// Target graduation quarter
    pub graduation_term: Term,
    /// Quarters committed
    pub terms_planned: usize,
    /// Courses committed across all quarters
    pub total_courses: usize,
    /// Units committed across all quarters
    pub total_units: u32,
    /// Per-quarter plan in commit order
    pub plan: Vec<CommittedQuarter>,
    /// Whether any requirement group is still open
    pub requirements_remaining: bool,
    /// Open requirement groups
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remaining: Vec<RemainingRequirement>,
}

/// Inputs for a new session
#[derive(Debug, Clone)]
pub struct SessionParams {
    /// Quarters from the planning start through graduation
    pub terms: Vec<Term>,
    /// Courses already completed
    pub completed: CompletedSet,
    /// Requirement groups still to satisfy
    pub requirements: RequirementMap,
    /// Comma-separated interest keywords
    pub interests: Option<String>,
    /// Courses to recommend per quarter
    pub courses_per_quarter: usize,
}

/// A multi-quarter planning run
#[derive(Debug, Clone)]
pub struct PlanningSession {
    id: String,
    graduation_term: Term,
    terms: Vec<Term>,
    committed: Vec<CommittedQuarter>,
    completed: CompletedSet,
    requirements: RequirementMap,
    scorer: Option<KeywordScorer>,
    courses_per_quarter: usize,
    next_term: Option<Term>,
    state: SessionState,
    last_touched: Instant,
}

impl PlanningSession {
    /// Create a session over a non-empty term sequence
    ///
    /// # Errors
    /// Returns [`PlannerError::MissingArgument`] when `terms` is empty and
    /// [`PlannerError::InvalidArgument`] when `courses_per_quarter` is zero.
    pub fn new(id: String, params: SessionParams) -> PlannerResult<Self> {
        let (Some(&first), Some(&graduation_term)) = (params.terms.first(), params.terms.last())
        else {
            return Err(PlannerError::MissingArgument {
                name: "terms".to_string(),
            });
        };
        if params.courses_per_quarter == 0 {
            return Err(PlannerError::invalid_argument(
                "courses_per_quarter",
                "must be at least 1",
            ));
        }

        Ok(Self {
            id,
            graduation_term,
            terms: params.terms,
            committed: Vec::new(),
            completed: params.completed,
            requirements: params.requirements,
            scorer: params.interests.as_deref().and_then(KeywordScorer::parse),
            courses_per_quarter: params.courses_per_quarter,
            next_term: Some(first),
            state: SessionState::Created,
            last_touched: Instant::now(),
        })
    }

    /// Session id
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Graduation quarter
    #[must_use]
    pub const fn graduation_term(&self) -> Term {
        self.graduation_term
    }

    /// Quarters to plan
    #[must_use]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Next quarter to plan, `None` once the graduation quarter is committed
    #[must_use]
    pub const fn next_term(&self) -> Option<Term> {
        self.next_term
    }

    /// Lifecycle state
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Courses completed so far, including committed quarters
    #[must_use]
    pub const fn completed(&self) -> &CompletedSet {
        &self.completed
    }

    /// Requirement groups still open
    #[must_use]
    pub const fn requirements(&self) -> &RequirementMap {
        &self.requirements
    }

    /// Committed quarters
    #[must_use]
    pub fn committed(&self) -> &[CommittedQuarter] {
        &self.committed
    }

    /// Mark the session as used now
    pub fn touch(&mut self) {
        self.last_touched = Instant::now();
    }

    /// Time since the session was last used
    #[must_use]
    pub fn idle_for(&self) -> Duration {
        self.last_touched.elapsed()
    }

    /// The start summary for this session
    #[must_use]
    pub fn start_summary(&self) -> StartSummary {
        let next_term = self.terms[0];
        StartSummary {
            session_id: self.id.clone(),
            graduation_term: self.graduation_term,
            terms_to_plan: self.terms.clone(),
            terms_remaining: self.terms.len(),
            next_term,
            message: format!(
                "Started planning for {}. Plan {} quarter(s). Start with {next_term}.",
                self.graduation_term,
                self.terms.len()
            ),
        }
    }

    /// Recommend courses for `term` from the current state; does not mutate
    #[must_use]
    pub fn quarter_plan(&self, term: Term) -> QuarterPlan {
        let options = filter_quarter(&self.completed, &self.requirements, term);
        let scorer = self.scorer.as_ref().map(|s| s as &dyn InterestScorer);
        let selected = select_courses(
            &options.courses,
            &self.requirements,
            self.courses_per_quarter,
            scorer,
        );

        let message = if selected.is_empty() {
            format!("No eligible courses for {term}")
        } else {
            format!("Auto-selected {} course(s) for {term}", selected.len())
        };

        QuarterPlan {
            term,
            selected: selected.iter().map(|c| c.view(Projection::Summary)).collect(),
            num_selected: selected.len(),
            gaps: options.data_gaps(Projection::Summary),
            message,
            courses: selected.into_iter().map(|c| c.course).collect(),
        }
    }

    /// Quarter a code was committed in, if any
    fn committed_term_of(&self, code: &str) -> Option<Term> {
        self.committed
            .iter()
            .find(|q| q.courses.iter().any(|c| c.code == code))
            .map(|q| q.term)
    }

    /// Check that `term` is the quarter the cursor points at
    fn check_sequence(&self, term: Term) -> PlannerResult<()> {
        let reason = match self.next_term {
            Some(expected) if expected == term => return Ok(()),
            Some(expected) => format!("the next quarter to plan is {expected}"),
            None => format!(
                "every quarter through {} is already planned",
                self.graduation_term
            ),
        };
        Err(PlannerError::QuarterOutOfSequence { term, reason })
    }

    /// Commit `selected` for `term`
    ///
    /// Quarters are committed in order, one commit per quarter.
    ///
    /// # Errors
    /// - [`PlannerError::SessionClosed`] once the session is complete
    /// - [`PlannerError::DuplicateCourse`] if a course was committed in an
    ///   earlier quarter of this session or appears twice in `selected`
    /// - [`PlannerError::QuarterOutOfSequence`] if `term` is not the next
    ///   quarter to plan
    ///
    /// Nothing is mutated on error.
    pub fn add_quarter(&mut self, term: Term, selected: Vec<Course>) -> PlannerResult<QuarterCommit> {
        if self.state == SessionState::Complete {
            return Err(PlannerError::SessionClosed {
                session_id: self.id.clone(),
            });
        }

        let mut incoming: HashSet<&str> = HashSet::with_capacity(selected.len());
        for course in &selected {
            if let Some(first) = self.committed_term_of(&course.code) {
                return Err(PlannerError::DuplicateCourse {
                    code: course.code.clone(),
                    term: first,
                });
            }
            if !incoming.insert(course.code.as_str()) {
                return Err(PlannerError::DuplicateCourse {
                    code: course.code.clone(),
                    term,
                });
            }
        }
        self.check_sequence(term)?;

        let planned: Vec<PlannedCourse> = selected.iter().map(PlannedCourse::from).collect();
        self.completed.extend(selected.iter().map(|c| c.code.as_str()));
        self.requirements = update_requirements(&self.requirements, &selected);
        self.committed.push(CommittedQuarter {
            term,
            courses: planned.clone(),
        });
        self.state = SessionState::Planning;
        self.next_term = (term != self.graduation_term).then(|| term.next());

        let total_units = planned.iter().map(|c| c.credits).sum();
        Ok(QuarterCommit {
            term_added: term,
            courses_added: planned.len(),
            courses: planned,
            total_units,
            requirements_remaining: !self.requirements.is_empty(),
            next_term: self.next_term,
            message: format!("Added {} course(s) for {term}.", selected.len()),
        })
    }

    /// Aggregate summary of everything committed
    #[must_use]
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            session_id: self.id.clone(),
            state: self.state,
            graduation_term: self.graduation_term,
            terms_planned: self.committed.len(),
            total_courses: self.committed.iter().map(|q| q.courses.len()).sum(),
            total_units: self.committed.iter().map(CommittedQuarter::units).sum(),
            plan: self.committed.clone(),
            requirements_remaining: !self.requirements.is_empty(),
            remaining: self
                .requirements
                .iter()
                .map(|g| RemainingRequirement {
                    id: g.id.clone(),
                    num_needed: g.num_needed,
                    candidates: g.courses.len(),
                })
                .collect(),
        }
    }

    /// Close the session and return its final summary
    pub fn complete(&mut self) -> PlanSummary {
        self.state = SessionState::Complete;
        self.next_term = None;
        self.summary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{PrereqTree, RequirementGroup};

    fn term(label: &str) -> Term {
        label.parse().unwrap()
    }

    fn session(terms: &[&str], requirements: RequirementMap) -> PlanningSession {
        PlanningSession::new(
            "test".to_string(),
            SessionParams {
                terms: terms.iter().map(|t| term(t)).collect(),
                completed: CompletedSet::new(),
                requirements,
                interests: None,
                courses_per_quarter: 3,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_empty_terms_and_zero_target() {
        let params = SessionParams {
            terms: vec![],
            completed: CompletedSet::new(),
            requirements: RequirementMap::new(),
            interests: None,
            courses_per_quarter: 3,
        };
        assert!(matches!(
            PlanningSession::new("x".to_string(), params.clone()),
            Err(PlannerError::MissingArgument { .. })
        ));

        let params = SessionParams {
            terms: vec![term("Winter 2026")],
            courses_per_quarter: 0,
            ..params
        };
        assert!(matches!(
            PlanningSession::new("x".to_string(), params),
            Err(PlannerError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_add_quarter_advances_and_updates_state() {
        let winter = term("Winter 2026");
        let a = Course::new("A", "First").offered_in(winter).with_credits(5);
        let b = Course::new("B", "Second")
            .offered_in(term("Spring 2026"))
            .with_prereq_tree(PrereqTree::course("A"));
        let reqs = vec![RequirementGroup::new("r1", 2, vec![a.clone(), b])]
            .into_iter()
            .collect();
        let mut s = session(&["Winter 2026", "Spring 2026"], reqs);
        assert_eq!(s.state(), SessionState::Created);

        let commit = s.add_quarter(winter, vec![a]).unwrap();

        assert_eq!(commit.total_units, 5);
        assert_eq!(commit.next_term, Some(term("Spring 2026")));
        assert!(commit.requirements_remaining);
        assert_eq!(s.state(), SessionState::Planning);
        assert!(s.completed().contains("A"));
        assert_eq!(s.requirements().get("r1").unwrap().num_needed, 1);

        let plan = s.quarter_plan(term("Spring 2026"));
        assert_eq!(plan.num_selected, 1);
        assert_eq!(plan.courses[0].code, "B");
    }

    #[test]
    fn test_graduation_quarter_ends_cursor() {
        let mut s = session(&["Winter 2026"], RequirementMap::new());
        let commit = s.add_quarter(term("Winter 2026"), vec![]).unwrap();

        assert_eq!(commit.next_term, None);
        assert_eq!(commit.total_units, 0);
        assert!(!commit.requirements_remaining);
    }

    #[test]
    fn test_duplicate_within_selection_rejected_without_mutation() {
        let mut s = session(&["Winter 2026"], RequirementMap::new());
        let a = Course::new("A", "First");

        let err = s
            .add_quarter(term("Winter 2026"), vec![a.clone(), a])
            .unwrap_err();

        assert!(matches!(err, PlannerError::DuplicateCourse { .. }));
        assert!(s.committed().is_empty());
        assert!(s.completed().is_empty());
    }

    #[test]
    fn test_complete_session_rejects_commits() {
        let mut s = session(&["Winter 2026"], RequirementMap::new());
        s.complete();

        let err = s
            .add_quarter(term("Winter 2026"), vec![Course::new("A", "First")])
            .unwrap_err();

        assert!(matches!(err, PlannerError::SessionClosed { .. }));
        assert_eq!(s.state(), SessionState::Complete);
        assert!(s.committed().is_empty());
        assert!(!s.completed().contains("A"));
    }

    #[test]
    fn test_commits_follow_the_term_sequence() {
        let mut s = session(&["Winter 2026", "Spring 2026"], RequirementMap::new());

        // Skipping ahead, or past graduation
        for label in ["Spring 2026", "Fall 2030"] {
            let err = s.add_quarter(term(label), vec![]).unwrap_err();
            assert!(matches!(err, PlannerError::QuarterOutOfSequence { .. }), "{label}");
        }
        assert!(s.committed().is_empty());
        assert_eq!(s.state(), SessionState::Created);

        s.add_quarter(term("Winter 2026"), vec![]).unwrap();
        // The same quarter twice
        let err = s.add_quarter(term("Winter 2026"), vec![]).unwrap_err();
        assert!(matches!(err, PlannerError::QuarterOutOfSequence { .. }));

        s.add_quarter(term("Spring 2026"), vec![]).unwrap();
        let err = s.add_quarter(term("Fall 2026"), vec![]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot plan Fall 2026: every quarter through Spring 2026 is already planned"
        );
        assert_eq!(s.next_term(), None);
        assert_eq!(s.committed().len(), 2);
    }

    #[test]
    fn test_quarter_plan_is_read_only() {
        let winter = term("Winter 2026");
        let reqs = vec![RequirementGroup::new(
            "r1",
            1,
            vec![Course::new("A", "First").offered_in(winter)],
        )]
        .into_iter()
        .collect();
        let s = session(&["Winter 2026"], reqs);
        let before = s.requirements().clone();

        let first = s.quarter_plan(winter);
        let second = s.quarter_plan(winter);

        assert_eq!(first, second);
        assert_eq!(s.requirements(), &before);
        assert!(s.completed().is_empty());
    }

    #[test]
    fn test_empty_quarter_plan_reports_gap() {
        let s = session(&["Winter 2026"], RequirementMap::new());
        let plan = s.quarter_plan(term("Winter 2026"));

        assert_eq!(plan.num_selected, 0);
        assert_eq!(
            plan.gaps,
            vec![DataGap::NoEligibleCourses {
                term: term("Winter 2026")
            }]
        );
    }

    #[test]
    fn test_summary_totals_default_credits() {
        let mut s = session(&["Winter 2026", "Spring 2026"], RequirementMap::new());
        s.add_quarter(
            term("Winter 2026"),
            vec![Course::new("A", "A"), Course::new("B", "B").with_credits(2)],
        )
        .unwrap();
        s.add_quarter(term("Spring 2026"), vec![Course::new("C", "C")])
            .unwrap();

        let summary = s.complete();

        assert_eq!(summary.state, SessionState::Complete);
        assert_eq!(summary.terms_planned, 2);
        assert_eq!(summary.total_courses, 3);
        assert_eq!(summary.total_units, 4 + 2 + 4);
        assert!(!summary.requirements_remaining);
        assert_eq!(summary.plan[0].units(), 6);
    }
}
