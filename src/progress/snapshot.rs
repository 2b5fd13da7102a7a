//! The learner progress snapshot
//!
//! A snapshot is the complete state of one learner's progress. Level and the
//! weekly percentages are derived values; they are recomputed from XP and the
//! completed-lesson set rather than patched incrementally.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// XP needed to advance one level
pub const XP_PER_LEVEL: u32 = 100;

/// Derive the level for an XP total
pub fn level_for_xp(total_xp: u32) -> u32 {
    total_xp / XP_PER_LEVEL + 1
}

/// Progress toward the next level boundary, for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    /// XP earned within the current level
    pub current: u32,
    /// XP span of a level
    pub next: u32,
    /// `current / next` as a rounded percentage (0-100)
    pub percentage: u8,
}

impl LevelProgress {
    /// Compute level progress for an XP total
    pub fn for_xp(total_xp: u32) -> Self {
        let level = level_for_xp(total_xp);
        let current = total_xp - (level - 1) * XP_PER_LEVEL;
        let percentage = (f64::from(current) / f64::from(XP_PER_LEVEL) * 100.0).round().min(100.0);
        Self { current, next: XP_PER_LEVEL, percentage: percentage as u8 }
    }
}

/// Complete progress state for one learner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    #[serde(rename = "totalXP")]
    pub total_xp: u32,

    /// Always `level_for_xp(total_xp)` once a mutation settles
    pub level: u32,

    /// Earned badge ids (never shrinks)
    pub badges: BTreeSet<String>,

    pub completed_lessons: BTreeSet<String>,
    pub completed_tasks: BTreeSet<String>,
    pub completed_quizzes: BTreeSet<String>,

    /// Week number -> percentage of that week's lessons completed
    pub weekly_progress: BTreeMap<u32, u8>,

    /// Consecutive active days, maintained by the host
    pub current_streak: u32,

    pub last_activity_date: Option<DateTime<Utc>>,

    /// Total minutes spent learning
    pub total_time_spent: u32,

    /// Exact running mean over all completed quizzes (0-100)
    pub average_quiz_score: f64,

    pub tasks_submitted_this_week: u32,
    pub lessons_completed_this_week: u32,
}

impl Default for ProgressSnapshot {
    fn default() -> Self {
        Self {
            total_xp: 0,
            level: 1,
            badges: BTreeSet::new(),
            completed_lessons: BTreeSet::new(),
            completed_tasks: BTreeSet::new(),
            completed_quizzes: BTreeSet::new(),
            weekly_progress: BTreeMap::new(),
            current_streak: 0,
            last_activity_date: None,
            total_time_spent: 0,
            average_quiz_score: 0.0,
            tasks_submitted_this_week: 0,
            lessons_completed_this_week: 0,
        }
    }
}

impl ProgressSnapshot {
    /// Number of weeks whose lessons are all done
    pub fn completed_weeks(&self) -> usize {
        self.weekly_progress.values().filter(|&&pct| pct >= 100).count()
    }

    /// Quiz average rounded for display
    pub fn rounded_quiz_average(&self) -> u8 {
        self.average_quiz_score.round().clamp(0.0, 100.0) as u8
    }

    /// Progress toward the next level
    pub fn level_progress(&self) -> LevelProgress {
        LevelProgress::for_xp(self.total_xp)
    }

    /// Re-derive `level` from `total_xp`
    pub(crate) fn recompute_level(&mut self) {
        self.level = level_for_xp(self.total_xp);
    }
}

/// Externally supplied prior values used to rehydrate a learner
///
/// Every field is optional; missing fields keep their all-zero default. There
/// is no `level` field because level is always derived from XP.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialSnapshot {
    #[serde(rename = "totalXP")]
    pub total_xp: Option<u32>,
    pub badges: Option<BTreeSet<String>>,
    pub completed_lessons: Option<BTreeSet<String>>,
    pub completed_tasks: Option<BTreeSet<String>>,
    pub completed_quizzes: Option<BTreeSet<String>>,
    pub weekly_progress: Option<BTreeMap<u32, u8>>,
    pub current_streak: Option<u32>,
    pub last_activity_date: Option<DateTime<Utc>>,
    pub total_time_spent: Option<u32>,
    pub average_quiz_score: Option<f64>,
    pub tasks_submitted_this_week: Option<u32>,
    pub lessons_completed_this_week: Option<u32>,
}

impl PartialSnapshot {
    /// Overlay these values onto the all-zero snapshot (shallow merge)
    pub fn merged_onto_default(self) -> ProgressSnapshot {
        let base = ProgressSnapshot::default();
        let mut snapshot = ProgressSnapshot {
            total_xp: self.total_xp.unwrap_or(base.total_xp),
            level: base.level,
            badges: self.badges.unwrap_or(base.badges),
            completed_lessons: self.completed_lessons.unwrap_or(base.completed_lessons),
            completed_tasks: self.completed_tasks.unwrap_or(base.completed_tasks),
            completed_quizzes: self.completed_quizzes.unwrap_or(base.completed_quizzes),
            weekly_progress: self.weekly_progress.unwrap_or(base.weekly_progress),
            current_streak: self.current_streak.unwrap_or(base.current_streak),
            last_activity_date: self.last_activity_date.or(base.last_activity_date),
            total_time_spent: self.total_time_spent.unwrap_or(base.total_time_spent),
            average_quiz_score: self
                .average_quiz_score
                .unwrap_or(base.average_quiz_score)
                .clamp(0.0, 100.0),
            tasks_submitted_this_week: self
                .tasks_submitted_this_week
                .unwrap_or(base.tasks_submitted_this_week),
            lessons_completed_this_week: self
                .lessons_completed_this_week
                .unwrap_or(base.lessons_completed_this_week),
        };
        snapshot.recompute_level();
        snapshot
    }
}

impl From<ProgressSnapshot> for PartialSnapshot {
    fn from(snapshot: ProgressSnapshot) -> Self {
        Self {
            total_xp: Some(snapshot.total_xp),
            badges: Some(snapshot.badges),
            completed_lessons: Some(snapshot.completed_lessons),
            completed_tasks: Some(snapshot.completed_tasks),
            completed_quizzes: Some(snapshot.completed_quizzes),
            weekly_progress: Some(snapshot.weekly_progress),
            current_streak: Some(snapshot.current_streak),
            last_activity_date: snapshot.last_activity_date,
            total_time_spent: Some(snapshot.total_time_spent),
            average_quiz_score: Some(snapshot.average_quiz_score),
            tasks_submitted_this_week: Some(snapshot.tasks_submitted_this_week),
            lessons_completed_this_week: Some(snapshot.lessons_completed_this_week),
        }
    }
}
