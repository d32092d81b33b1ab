//! Graduation planning engine
//!
//! [`GraduationPlanner`] ties the pieces together:
//! - [`filter`]: which requirement courses are takeable in a quarter
//! - [`selector`]: which of those to recommend
//! - [`tracker`]: how requirement pools shrink after a commit
//! - [`session`] and [`store`]: multi-quarter planning state
//! - [`api`]: JSON envelope over the planner operations

pub mod api;
pub mod filter;
pub mod selector;
pub mod session;
pub mod store;
pub mod tracker;

pub use filter::{filter_quarter, CourseView, EligibleCourse, Projection, QuarterOptions};
pub use selector::{select_courses, InterestScorer, KeywordScorer};
pub use session::{
    CommittedQuarter, PlanSummary, PlannedCourse, PlanningSession, QuarterCommit, QuarterPlan,
    RemainingRequirement, SessionParams, SessionState, StartSummary,
};
pub use store::{InMemorySessionStore, SessionHandle, SessionStore};
pub use tracker::update_requirements;

use crate::core::catalog::{Catalog, CourseInfo};
use crate::core::config::Config;
use crate::core::error::{DataGap, PlannerError, PlannerResult};
use crate::core::models::{CompletedSet, Course, RequirementMap, Season, Term};
use crate::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::{MutexGuard, PoisonError};
use std::time::Duration;
use uuid::Uuid;

/// Default courses recommended per quarter
pub const DEFAULT_COURSES_PER_QUARTER: usize = 3;
/// Default planning horizon in quarters (eight academic years)
pub const DEFAULT_MAX_TERMS: usize = 24;
/// Default idle time before a session is dropped
pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(3600);
/// Length of generated session ids
const SESSION_ID_LEN: usize = 8;

/// Engine settings resolved from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerSettings {
    /// First quarter of every plan
    pub epoch: Term,
    /// Courses recommended per quarter when a request leaves it out
    pub courses_per_quarter: usize,
    /// Longest plan accepted, in quarters
    pub max_terms: usize,
    /// Idle time after which sessions are evicted
    pub session_idle: Duration,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            epoch: Term::new(Season::Winter, 2026),
            courses_per_quarter: DEFAULT_COURSES_PER_QUARTER,
            max_terms: DEFAULT_MAX_TERMS,
            session_idle: DEFAULT_SESSION_IDLE,
        }
    }
}

impl PlannerSettings {
    /// Read settings from the `[planning]` section, defaulting unset values
    ///
    /// # Errors
    /// Returns [`PlannerError::InvalidTermLabel`] if the configured epoch does not parse.
    pub fn from_config(config: &Config) -> PlannerResult<Self> {
        let defaults = Self::default();
        let planning = &config.planning;

        let epoch = if planning.epoch.trim().is_empty() {
            defaults.epoch
        } else {
            planning.epoch.parse()?
        };
        let or_default = |value: usize, default: usize| if value == 0 { default } else { value };

        Ok(Self {
            epoch,
            courses_per_quarter: or_default(
                planning.courses_per_quarter,
                defaults.courses_per_quarter,
            ),
            max_terms: or_default(planning.max_terms, defaults.max_terms),
            session_idle: if planning.session_idle_secs == 0 {
                defaults.session_idle
            } else {
                Duration::from_secs(planning.session_idle_secs)
            },
        })
    }
}

/// Inputs for [`GraduationPlanner::start`]
#[derive(Debug, Clone, Default)]
pub struct StartRequest {
    /// Target graduation quarter
    pub graduation_term: Option<Term>,
    /// Courses already completed
    pub completed: CompletedSet,
    /// Requirement groups still to satisfy
    pub requirements: RequirementMap,
    /// Comma-separated interest keywords
    pub interests: Option<String>,
    /// Courses per quarter; falls back to the configured default
    pub courses_per_quarter: Option<usize>,
}

/// Single-quarter preview outside of any session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterPreview {
    /// Quarter previewed
    pub term: Term,
    /// Number of eligible courses
    pub num_eligible: usize,
    /// Eligible courses in requirement-map order
    pub courses: Vec<CourseView>,
    /// Codes the selector would recommend, when a selection was requested
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommended: Vec<String>,
    /// Non-fatal data gaps
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gaps: Vec<DataGap>,
}

/// Lock a session, recovering the data if a previous holder panicked
fn lock(handle: &SessionHandle) -> MutexGuard<'_, PlanningSession> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Multi-session planning engine
#[derive(Debug)]
pub struct GraduationPlanner<S: SessionStore = InMemorySessionStore> {
    settings: PlannerSettings,
    store: S,
    catalog: Catalog,
}

impl Default for GraduationPlanner {
    fn default() -> Self {
        Self::new(PlannerSettings::default())
    }
}

impl GraduationPlanner {
    /// Planner backed by an in-memory session store
    #[must_use]
    pub fn new(settings: PlannerSettings) -> Self {
        Self::with_store(settings, InMemorySessionStore::new())
    }
}

impl<S: SessionStore> GraduationPlanner<S> {
    /// Planner backed by a caller-provided store
    #[must_use]
    pub fn with_store(settings: PlannerSettings, store: S) -> Self {
        Self {
            settings,
            store,
            catalog: Catalog::default(),
        }
    }

    /// Attach the catalog used for course lookups
    #[must_use]
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Active settings
    #[must_use]
    pub const fn settings(&self) -> &PlannerSettings {
        &self.settings
    }

    /// Catalog used for course lookups; empty unless one was attached
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Catalog details for a course given by department and number
    ///
    /// # Errors
    /// Returns [`PlannerError::UnknownCourse`] if the course is not in the catalog.
    pub fn course_info(&self, department: &str, course_number: &str) -> PlannerResult<CourseInfo> {
        let info = self.catalog.course_info(department, course_number)?;
        debug!("Course lookup: {}", info.code);
        Ok(info)
    }

    /// Number of live sessions
    #[must_use]
    pub fn active_sessions(&self) -> usize {
        self.store.len()
    }

    /// List the courses a student could take in `term`
    #[must_use]
    pub fn filter_quarter(
        &self,
        completed: &CompletedSet,
        requirements: &RequirementMap,
        term: Term,
        projection: Projection,
    ) -> QuarterPreview {
        let options = filter_quarter(completed, requirements, term);
        QuarterPreview {
            term,
            num_eligible: options.courses.len(),
            courses: options.views(projection),
            recommended: Vec::new(),
            gaps: options.data_gaps(projection),
        }
    }

    /// Filter `term` and also report which courses the selector would pick
    ///
    /// `target` falls back to the configured courses per quarter.
    #[must_use]
    pub fn preview_quarter(
        &self,
        completed: &CompletedSet,
        requirements: &RequirementMap,
        term: Term,
        target: Option<usize>,
        interests: Option<&str>,
        projection: Projection,
    ) -> QuarterPreview {
        let options = filter_quarter(completed, requirements, term);
        let scorer = interests.and_then(KeywordScorer::parse);
        let selected = select_courses(
            &options.courses,
            requirements,
            target.unwrap_or(self.settings.courses_per_quarter),
            scorer.as_ref().map(|s| s as &dyn InterestScorer),
        );

        QuarterPreview {
            term,
            num_eligible: options.courses.len(),
            courses: options.views(projection),
            recommended: selected.into_iter().map(|c| c.course.code).collect(),
            gaps: options.data_gaps(projection),
        }
    }

    /// Fresh session id not currently in the store
    fn new_session_id(&self) -> String {
        loop {
            let mut id = Uuid::new_v4().simple().to_string();
            id.truncate(SESSION_ID_LEN);
            if !self.store.contains(&id) {
                return id;
            }
        }
    }

    /// Begin a planning session
    ///
    /// Evicts idle sessions, builds the quarter sequence from the configured
    /// epoch through the graduation term, and registers a new session.
    ///
    /// # Errors
    /// - [`PlannerError::MissingArgument`] if no graduation term is given
    /// - [`PlannerError::InvalidArgument`] if `courses_per_quarter` is zero
    /// - [`PlannerError::InvalidTarget`] if the graduation term is before the
    ///   epoch or past the planning horizon
    pub fn start(&self, request: StartRequest) -> PlannerResult<StartSummary> {
        let graduation_term = request
            .graduation_term
            .ok_or_else(|| PlannerError::MissingArgument {
                name: "graduation_term".to_string(),
            })?;

        let evicted = self.store.evict_idle(self.settings.session_idle);
        if evicted > 0 {
            debug!("Evicted {evicted} idle session(s)");
        }

        let terms = Term::sequence(self.settings.epoch, graduation_term, self.settings.max_terms)?;
        let session = PlanningSession::new(
            self.new_session_id(),
            SessionParams {
                terms,
                completed: request.completed,
                requirements: request.requirements,
                interests: request.interests,
                courses_per_quarter: request
                    .courses_per_quarter
                    .unwrap_or(self.settings.courses_per_quarter),
            },
        )?;

        let summary = session.start_summary();
        info!(
            "Session {} started: {} quarter(s) through {}",
            summary.session_id, summary.terms_remaining, summary.graduation_term
        );
        self.store.insert(session);
        Ok(summary)
    }

    /// Look up a session
    fn session(&self, session_id: &str) -> PlannerResult<SessionHandle> {
        self.store
            .get(session_id)
            .ok_or_else(|| PlannerError::SessionNotFound {
                session_id: session_id.to_string(),
            })
    }

    /// Recommend courses for `term` from the session's current state
    ///
    /// Planning state is not changed. The session's idle timer is reset, so a
    /// session that is only being read is not evicted.
    ///
    /// # Errors
    /// Returns [`PlannerError::SessionNotFound`] for an unknown id.
    pub fn get_quarter_plan(&self, session_id: &str, term: Term) -> PlannerResult<QuarterPlan> {
        let handle = self.session(session_id)?;
        let mut session = lock(&handle);
        session.touch();
        let plan = session.quarter_plan(term);
        debug!(
            "Session {session_id}: {} recommended for {term}",
            plan.num_selected
        );
        Ok(plan)
    }

    /// Commit a quarter's courses to a session
    ///
    /// # Errors
    /// - [`PlannerError::SessionNotFound`] for an unknown id
    /// - [`PlannerError::SessionClosed`] if the session was finished while
    ///   this call waited for it
    /// - [`PlannerError::DuplicateCourse`] if a course was already planned in
    ///   this session or appears twice in `courses`
    /// - [`PlannerError::QuarterOutOfSequence`] if `term` is not the session's
    ///   next quarter
    pub fn add_quarter(
        &self,
        session_id: &str,
        term: Term,
        courses: Vec<Course>,
    ) -> PlannerResult<QuarterCommit> {
        let handle = self.session(session_id)?;
        let mut session = lock(&handle);
        session.touch();
        let commit = session.add_quarter(term, courses)?;
        info!(
            "Session {session_id}: committed {} course(s) for {term}",
            commit.courses_added
        );
        Ok(commit)
    }

    /// End a session and return its plan
    ///
    /// The session is removed from the store.
    ///
    /// # Errors
    /// Returns [`PlannerError::SessionNotFound`] for an unknown id.
    pub fn finish(&self, session_id: &str) -> PlannerResult<PlanSummary> {
        let handle = self
            .store
            .remove(session_id)
            .ok_or_else(|| PlannerError::SessionNotFound {
                session_id: session_id.to_string(),
            })?;
        let summary = lock(&handle).complete();
        info!(
            "Session {session_id} finished: {} course(s) over {} quarter(s)",
            summary.total_courses, summary.terms_planned
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::PlanningConfig;
    use crate::core::models::RequirementGroup;

    fn term(label: &str) -> Term {
        label.parse().unwrap()
    }

    #[test]
    fn test_settings_from_config_defaults_unset_values() {
        let config = Config {
            planning: PlanningConfig {
                epoch: "Fall 2025".to_string(),
                courses_per_quarter: 0,
                max_terms: 6,
                session_idle_secs: 0,
            },
            ..Config::default()
        };

        let settings = PlannerSettings::from_config(&config).unwrap();

        assert_eq!(settings.epoch, term("Fall 2025"));
        assert_eq!(settings.courses_per_quarter, DEFAULT_COURSES_PER_QUARTER);
        assert_eq!(settings.max_terms, 6);
        assert_eq!(settings.session_idle, DEFAULT_SESSION_IDLE);
    }

    #[test]
    fn test_settings_reject_bad_epoch() {
        let mut config = Config::default();
        config.planning.epoch = "Summer 2026".to_string();

        assert!(matches!(
            PlannerSettings::from_config(&config),
            Err(PlannerError::InvalidTermLabel { .. })
        ));
    }

    #[test]
    fn test_start_requires_graduation_term() {
        let planner = GraduationPlanner::default();
        let err = planner.start(StartRequest::default()).unwrap_err();
        assert!(matches!(err, PlannerError::MissingArgument { .. }));
        assert_eq!(planner.active_sessions(), 0);
    }

    #[test]
    fn test_session_ids_are_short_and_unique() {
        let planner = GraduationPlanner::default();
        let request = StartRequest {
            graduation_term: Some(term("Winter 2026")),
            ..StartRequest::default()
        };

        let a = planner.start(request.clone()).unwrap();
        let b = planner.start(request).unwrap();

        assert_eq!(a.session_id.len(), SESSION_ID_LEN);
        assert_ne!(a.session_id, b.session_id);
        assert_eq!(planner.active_sessions(), 2);
    }

    #[test]
    fn test_preview_reports_recommendations() {
        let winter = term("Winter 2026");
        let reqs: RequirementMap = vec![RequirementGroup::new(
            "r1",
            1,
            vec![
                Course::new("A", "Intro").offered_in(winter),
                Course::new("B", "Other").offered_in(winter),
            ],
        )]
        .into_iter()
        .collect();
        let planner = GraduationPlanner::default();

        let filtered = planner.filter_quarter(&CompletedSet::new(), &reqs, winter, Projection::Summary);
        assert_eq!(filtered.num_eligible, 2);
        assert!(filtered.recommended.is_empty());

        let preview = planner.preview_quarter(
            &CompletedSet::new(),
            &reqs,
            winter,
            Some(1),
            None,
            Projection::Detailed,
        );
        assert_eq!(preview.recommended, vec!["A"]);
        assert_eq!(preview.courses[0].credits, Some(4));
    }
}
