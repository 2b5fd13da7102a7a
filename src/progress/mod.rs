//! Learner progress and gamification engine
//!
//! The store owns the snapshot and applies completion events; the evaluator
//! and unlock policy are pure functions over the catalog and a snapshot.

pub mod actor;
pub mod evaluator;
pub mod events;
pub mod snapshot;
pub mod store;
pub mod unlock;

pub use actor::{Mutation, Outcome, ProgressHandle};
pub use events::{ProgressEvent, XpSource};
pub use snapshot::{LevelProgress, PartialSnapshot, ProgressSnapshot, XP_PER_LEVEL, level_for_xp};
pub use store::{ProgressStore, ScorePolicy, StoreOptions};
