//! Planner error taxonomy and non-fatal data-gap notices

use crate::core::models::Term;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Broad category of a [`PlannerError`], exposed to callers across the envelope boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed term label, missing or invalid argument, undecodable request
    InputValidation,
    /// Unknown session id or catalog course
    NotFound,
    /// Operation conflicts with session state (duplicate commit, unreachable target)
    StateConflict,
    /// Input file could not be read
    Io,
}

/// Errors raised by catalog loading and the planning engine
#[derive(Debug, Error)]
pub enum PlannerError {
    /// Term label is not `"<Season> <Year>"` with a Fall, Winter, or Spring season
    #[error("invalid term label '{label}': expected \"<Fall|Winter|Spring> <Year>\"")]
    InvalidTermLabel {
        /// The rejected label
        label: String,
    },
    /// A required argument was not supplied
    #[error("missing required argument: {name}")]
    MissingArgument {
        /// Argument name
        name: String,
    },
    /// An argument was supplied with an unusable value
    #[error("invalid value for {name}: {reason}")]
    InvalidArgument {
        /// Argument name
        name: String,
        /// Why the value was rejected
        reason: String,
    },
    /// No planning session is registered under this id
    #[error("session {session_id} not found")]
    SessionNotFound {
        /// Requested session id
        session_id: String,
    },
    /// A referenced course code is not in the catalog
    #[error("course {code} not found in catalog")]
    UnknownCourse {
        /// Normalized course code
        code: String,
    },
    /// The course was already committed in an earlier quarter of the session
    #[error("{code} already planned for {term}")]
    DuplicateCourse {
        /// Normalized course code
        code: String,
        /// Quarter the course was first planned in
        term: Term,
    },
    /// The session has been finished and accepts no further commits
    #[error("session {session_id} is already complete")]
    SessionClosed {
        /// Requested session id
        session_id: String,
    },
    /// A commit named a quarter other than the session's next quarter
    #[error("cannot plan {term}: {reason}")]
    QuarterOutOfSequence {
        /// Quarter named by the commit
        term: Term,
        /// What the session expected instead
        reason: String,
    },
    /// Graduation term cannot be reached forward from the planning epoch
    #[error("graduation term {target} is invalid: {reason}")]
    InvalidTarget {
        /// Requested graduation term
        target: Term,
        /// Why the term is unreachable
        reason: String,
    },
    /// Failed to read an input file
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
    /// Input file was read but its JSON did not match the expected shape
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },
    /// JSON payload (request or inline document) could not be decoded or encoded
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl PlannerError {
    /// Category used when the error crosses the envelope boundary
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidTermLabel { .. }
            | Self::MissingArgument { .. }
            | Self::InvalidArgument { .. }
            | Self::Parse { .. }
            | Self::Json(_) => ErrorKind::InputValidation,
            Self::SessionNotFound { .. } | Self::UnknownCourse { .. } => ErrorKind::NotFound,
            Self::DuplicateCourse { .. }
            | Self::SessionClosed { .. }
            | Self::QuarterOutOfSequence { .. }
            | Self::InvalidTarget { .. } => ErrorKind::StateConflict,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    /// Shorthand for [`PlannerError::InvalidArgument`]
    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the planner
pub type PlannerResult<T> = std::result::Result<T, PlannerError>;

/// Non-fatal gaps in the data behind a successful result
///
/// These are normal planning outcomes and travel inside `Ok` values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "gap", rename_all = "snake_case")]
pub enum DataGap {
    /// Nothing is eligible in this term: requirements exhausted or nothing offered
    NoEligibleCourses {
        /// Term that was filtered
        term: Term,
    },
    /// The catalog carries no difficulty tag for this course
    UnknownDifficulty {
        /// Course code
        code: String,
    },
}
