//! Course selector: greedy per-quarter choice among eligible courses
//!
//! Selection runs in two phases:
//! 1. Scarcity-first coverage. Eligible courses are bucketed by requirement
//!    group; groups with the fewest candidates go first, ties going to the
//!    group that still needs more courses. Each group contributes up to its
//!    `num_needed` courses until the quarter is full.
//! 2. Backfill. Remaining slots go to the highest-ranked group still short
//!    of its `num_needed`, then to any eligible course in catalog order.

use super::filter::EligibleCourse;
use crate::core::models::{Course, RequirementMap};
use crate::debug;
use std::cmp::Reverse;
use std::collections::HashSet;

/// Scores how well a course matches a student's interests; higher is better
pub trait InterestScorer {
    /// Score a course
    fn score(&self, course: &Course) -> u32;
}

/// Points for a keyword found in the course title
const TITLE_MATCH_POINTS: u32 = 10;
/// Points for a keyword found in the course description
const DESCRIPTION_MATCH_POINTS: u32 = 5;

/// Case-insensitive substring matching against comma-separated keywords
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordScorer {
    keywords: Vec<String>,
}

impl KeywordScorer {
    /// Parse `"machine learning, web ,AI"` into trimmed lowercase keywords.
    /// Returns `None` when no keyword remains.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let keywords: Vec<String> = raw
            .split(',')
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        (!keywords.is_empty()).then_some(Self { keywords })
    }

    /// The parsed keywords
    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

impl InterestScorer for KeywordScorer {
    fn score(&self, course: &Course) -> u32 {
        let title = course.name.to_lowercase();
        let description = course.description.to_lowercase();
        self.keywords
            .iter()
            .map(|k| {
                let mut points = 0;
                if title.contains(k.as_str()) {
                    points += TITLE_MATCH_POINTS;
                }
                if description.contains(k.as_str()) {
                    points += DESCRIPTION_MATCH_POINTS;
                }
                points
            })
            .sum()
    }
}

/// Candidates for one requirement group
struct Bucket<'a> {
    num_needed: u32,
    candidates: Vec<&'a EligibleCourse>,
    taken: u32,
}

impl Bucket<'_> {
    const fn is_short(&self) -> bool {
        self.taken < self.num_needed
    }
}

/// Bucket eligible courses by requirement id, in first-seen order
fn bucket_by_requirement<'a>(
    eligible: &'a [EligibleCourse],
    requirements: &RequirementMap,
) -> Vec<Bucket<'a>> {
    let mut ids: Vec<&str> = Vec::new();
    let mut buckets: Vec<Bucket<'a>> = Vec::new();

    for course in eligible {
        if let Some(idx) = ids.iter().position(|id| *id == course.requirement_id) {
            buckets[idx].candidates.push(course);
        } else {
            let num_needed = requirements
                .get(&course.requirement_id)
                .map_or(course.num_needed, |g| g.num_needed);
            ids.push(&course.requirement_id);
            buckets.push(Bucket {
                num_needed,
                candidates: vec![course],
                taken: 0,
            });
        }
    }

    buckets
}

/// Choose at most `target` distinct courses for one quarter
///
/// Returns fewer than `target` only when the eligible pool runs out. With a
/// `scorer`, candidates within each requirement group are stably reordered by
/// descending score before selection.
#[must_use]
pub fn select_courses(
    eligible: &[EligibleCourse],
    requirements: &RequirementMap,
    target: usize,
    scorer: Option<&dyn InterestScorer>,
) -> Vec<EligibleCourse> {
    let mut buckets = bucket_by_requirement(eligible, requirements);

    // Stable: equal ranks keep requirement-map order
    buckets.sort_by_key(|b| (b.candidates.len(), Reverse(b.num_needed)));

    if let Some(scorer) = scorer {
        for bucket in &mut buckets {
            bucket
                .candidates
                .sort_by_cached_key(|c| Reverse(scorer.score(&c.course)));
        }
    }

    let mut selected: Vec<&EligibleCourse> = Vec::with_capacity(target);
    let mut chosen: HashSet<&str> = HashSet::new();

    // Phase 1: scarcity-first coverage
    for bucket in &mut buckets {
        if selected.len() >= target {
            break;
        }
        for &candidate in &bucket.candidates {
            if !bucket.is_short() || selected.len() >= target {
                break;
            }
            if chosen.insert(candidate.course.code.as_str()) {
                selected.push(candidate);
                bucket.taken += 1;
            }
        }
    }

    // Phase 2: backfill one course at a time
    while selected.len() < target {
        let from_short_group = buckets.iter_mut().filter(|b| b.is_short()).find_map(|b| {
            let next = b
                .candidates
                .iter()
                .copied()
                .find(|c| !chosen.contains(c.course.code.as_str()))?;
            b.taken += 1;
            Some(next)
        });

        let next = from_short_group.or_else(|| {
            eligible
                .iter()
                .find(|c| !chosen.contains(c.course.code.as_str()))
        });

        let Some(next) = next else {
            break;
        };
        chosen.insert(next.course.code.as_str());
        selected.push(next);
    }

    debug!(
        "Selected {}/{} course(s) from {} eligible across {} group(s)",
        selected.len(),
        target,
        eligible.len(),
        buckets.len()
    );

    selected.into_iter().cloned().collect()
}
