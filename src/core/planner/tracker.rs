//! Requirement tracker: shrink requirement pools after courses are committed

use crate::core::models::{Course, RequirementGroup, RequirementMap};
use std::collections::HashSet;

/// Recompute the requirement map after `committed` courses are planned
///
/// Each group loses the committed codes from its pool and its `num_needed`
/// drops by the number of committed courses that were in that pool, so one
/// course can count toward several groups. `num_needed` saturates at zero.
/// Groups that are satisfied or have no candidates left are dropped.
/// Committing nothing returns the map unchanged.
#[must_use]
pub fn update_requirements(requirements: &RequirementMap, committed: &[Course]) -> RequirementMap {
    if committed.is_empty() {
        return requirements.clone();
    }

    let codes: HashSet<&str> = committed.iter().map(|c| c.code.as_str()).collect();

    requirements
        .iter()
        .filter_map(|group| {
            let (taken, remaining): (Vec<&Course>, Vec<&Course>) = group
                .courses
                .iter()
                .partition(|c| codes.contains(c.code.as_str()));
            let satisfied = u32::try_from(taken.len()).unwrap_or(u32::MAX);

            let updated = RequirementGroup {
                id: group.id.clone(),
                num_needed: group.num_needed.saturating_sub(satisfied),
                courses: remaining.into_iter().cloned().collect(),
            };
            updated.is_open().then_some(updated)
        })
        .collect()
}
