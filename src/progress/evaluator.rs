//! Badge evaluation
//!
//! Evaluate every automatic badge against a settled snapshot, diff against
//! what the learner already holds, and return the delta. Applying the delta
//! is the store's job so that all new badges land in a single step.

use crate::catalog::{BadgeDefinition, Catalog};

use super::ProgressSnapshot;

/// Badges whose requirement now holds but which have not been granted yet,
/// in catalog order
pub fn newly_earned<'a>(catalog: &'a Catalog, snapshot: &ProgressSnapshot) -> Vec<&'a BadgeDefinition> {
    catalog
        .badges
        .iter()
        .filter(|badge| !badge.is_manual())
        .filter(|badge| !snapshot.badges.contains(&badge.id))
        .filter(|badge| badge.requirement.is_met(snapshot))
        .collect()
}
