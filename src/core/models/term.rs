//! Academic term (quarter) model and succession rule

use crate::core::error::{PlannerError, PlannerResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Earliest and latest calendar years accepted in a term label
const MIN_YEAR: u16 = 1000;
const MAX_YEAR: u16 = 9998;

/// Quarter season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    /// Fall quarter, first of the academic year
    Fall,
    /// Winter quarter
    Winter,
    /// Spring quarter, last of the academic year
    Spring,
}

impl Season {
    /// Position within the academic year (Fall = 0)
    const fn position(self) -> i32 {
        match self {
            Self::Fall => 0,
            Self::Winter => 1,
            Self::Spring => 2,
        }
    }

    fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "fall" => Some(Self::Fall),
            "winter" => Some(Self::Winter),
            "spring" => Some(Self::Spring),
            _ => None,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fall => "Fall",
            Self::Winter => "Winter",
            Self::Spring => "Spring",
        };
        write!(f, "{name}")
    }
}

/// A quarter labelled `"<Season> <Year>"`
///
/// Terms order chronologically: Fall of year Y comes before Winter of Y+1,
/// which comes before Spring of Y+1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Term {
    /// Season of the quarter
    pub season: Season,
    /// Calendar year the quarter falls in
    pub year: u16,
}

impl Term {
    /// Create a term
    #[must_use]
    pub const fn new(season: Season, year: u16) -> Self {
        Self { season, year }
    }

    /// Chronological index: three consecutive values per academic year
    const fn ordinal(self) -> i32 {
        let academic_year = match self.season {
            Season::Fall => self.year as i32,
            Season::Winter | Season::Spring => self.year as i32 - 1,
        };
        academic_year * 3 + self.season.position()
    }

    /// The quarter that follows this one
    ///
    /// Fall(Y) → Winter(Y+1) → Spring(Y+1) → Fall(Y+1)
    #[must_use]
    pub const fn next(self) -> Self {
        match self.season {
            Season::Fall => Self::new(Season::Winter, self.year + 1),
            Season::Winter => Self::new(Season::Spring, self.year),
            Season::Spring => Self::new(Season::Fall, self.year),
        }
    }

    /// Number of quarters from `self` to `later`, counting both ends.
    /// `None` when `later` precedes `self`.
    #[must_use]
    pub fn span_to(self, later: Self) -> Option<usize> {
        usize::try_from(later.ordinal() - self.ordinal() + 1)
            .ok()
            .filter(|&n| n > 0)
    }

    /// Quarters from `epoch` through `target` inclusive, following [`Term::next`]
    ///
    /// # Errors
    /// Returns [`PlannerError::InvalidTarget`] when `target` lies before `epoch`
    /// or more than `max_terms` quarters ahead of it.
    pub fn sequence(epoch: Self, target: Self, max_terms: usize) -> PlannerResult<Vec<Self>> {
        let count = epoch.span_to(target).ok_or_else(|| PlannerError::InvalidTarget {
            target,
            reason: format!("it is before the planning start {epoch}"),
        })?;
        if count > max_terms {
            return Err(PlannerError::InvalidTarget {
                target,
                reason: format!(
                    "it is {count} quarters after {epoch}, beyond the {max_terms}-quarter horizon"
                ),
            });
        }

        let mut terms = Vec::with_capacity(count);
        let mut current = epoch;
        while current != target {
            terms.push(current);
            current = current.next();
        }
        terms.push(target);
        Ok(terms)
    }
}

impl Ord for Term {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal().cmp(&other.ordinal())
    }
}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Term {
    type Err = PlannerError;

    /// Accepts `"Fall 2025"` as well as the catalog ordering `"2025 Fall"`;
    /// the season is case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PlannerError::InvalidTermLabel {
            label: s.to_string(),
        };

        let mut parts = s.split_whitespace();
        let (Some(first), Some(second), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };

        let (season, year) = match (Season::parse(first), Season::parse(second)) {
            (Some(season), None) => (season, second),
            (None, Some(season)) => (season, first),
            _ => return Err(invalid()),
        };

        let year: u16 = year.parse().map_err(|_| invalid())?;
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(invalid());
        }

        Ok(Self::new(season, year))
    }
}

impl TryFrom<String> for Term {
    type Error = PlannerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Term> for String {
    fn from(term: Term) -> Self {
        term.to_string()
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.season, self.year)
    }
}

/// Deserialize a catalog's offered-term labels, skipping sessions the planner
/// does not schedule (e.g. `"2025 Summer1"`).
pub(crate) fn deserialize_offered<'de, D>(deserializer: D) -> Result<Vec<Term>, D::Error>
where
    D: Deserializer<'de>,
{
    let labels = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
    let mut terms: Vec<Term> = Vec::with_capacity(labels.len());
    for label in labels {
        if let Ok(term) = label.parse::<Term>() {
            if !terms.contains(&term) {
                terms.push(term);
            }
        }
    }
    Ok(terms)
}
