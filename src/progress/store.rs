//! The progress store
//!
//! `ProgressStore` exclusively owns a learner's [`ProgressSnapshot`]. Every
//! public mutation leaves the snapshot consistent before returning: level is
//! re-derived from XP, the week cache is refreshed, and one badge evaluation
//! pass has run against the settled state.
//!
//! Mutations never fail. Re-delivered completion events and ids the catalog
//! does not know are logged and ignored.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, LESSONS_PER_WEEK};

use super::evaluator;
use super::events::{ProgressEvent, XpSource};
use super::snapshot::{LevelProgress, PartialSnapshot, ProgressSnapshot};
use super::unlock;

/// XP granted for each completed lesson
pub const LESSON_XP: u32 = 15;

/// XP granted for an explicitly awarded badge
pub const MANUAL_BADGE_XP: u32 = 25;

/// Badge granted to every brand-new learner
pub const WELCOME_BADGE: &str = "first-step";

/// What to do with a quiz score above 100
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScorePolicy {
    /// Treat it as 100
    #[default]
    Clamp,
    /// Ignore the whole quiz completion
    Reject,
}

/// Tunables for a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Badge granted by `initialize_new_user`
    pub welcome_badge: String,
    pub score_policy: ScorePolicy,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { welcome_badge: WELCOME_BADGE.to_string(), score_policy: ScorePolicy::default() }
    }
}

/// Owner and sole mutator of one learner's progress
#[derive(Debug, Clone)]
pub struct ProgressStore {
    catalog: Arc<Catalog>,
    options: StoreOptions,
    snapshot: ProgressSnapshot,
    events: Vec<ProgressEvent>,
}

impl ProgressStore {
    /// Create a store with an all-zero snapshot
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_options(catalog, StoreOptions::default())
    }

    /// Create a store with custom options
    pub fn with_options(catalog: Arc<Catalog>, options: StoreOptions) -> Self {
        Self { catalog, options, snapshot: ProgressSnapshot::default(), events: Vec::new() }
    }

    /// The catalog this store evaluates against
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Read-only view of the current snapshot
    pub fn snapshot(&self) -> &ProgressSnapshot {
        &self.snapshot
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<ProgressEvent> {
        std::mem::take(&mut self.events)
    }

    // === Completion events ===

    /// Mark a lesson complete. Returns false if nothing changed.
    pub fn complete_lesson(&mut self, lesson_id: &str, week_number: u32) -> bool {
        if self.snapshot.completed_lessons.contains(lesson_id) {
            debug!("Lesson {} already completed, ignoring", lesson_id);
            return false;
        }

        let Some(week) = self.catalog.week(week_number) else {
            warn!("Ignoring lesson {}: week {} is not in the catalog", lesson_id, week_number);
            return false;
        };
        if !week.contains_lesson(lesson_id) {
            warn!("Ignoring lesson {}: not part of week {}", lesson_id, week_number);
            return false;
        }

        self.snapshot.completed_lessons.insert(lesson_id.to_string());

        let done = week
            .lessons
            .iter()
            .filter(|l| self.snapshot.completed_lessons.contains(&l.id))
            .count();
        let percentage = (done * 100 / LESSONS_PER_WEEK).min(100) as u8;
        self.snapshot.weekly_progress.insert(week_number, percentage);

        self.snapshot.lessons_completed_this_week += 1;
        self.touch();
        self.events.push(ProgressEvent::LessonCompleted {
            lesson_id: lesson_id.to_string(),
            week_number,
        });
        info!("Lesson {} completed, week {} at {}%", lesson_id, week_number, percentage);

        self.award_xp(LESSON_XP, XpSource::Lesson(lesson_id.to_string()));
        self.evaluate_badges();
        true
    }

    /// Mark a task submitted. Returns false if nothing changed.
    pub fn complete_task(&mut self, task_id: &str, xp_awarded: u32) -> bool {
        if self.snapshot.completed_tasks.contains(task_id) {
            debug!("Task {} already submitted, ignoring", task_id);
            return false;
        }
        if !self.catalog.weeks.iter().any(|w| w.task.id == task_id) {
            warn!("Ignoring unknown task {}", task_id);
            return false;
        }

        self.snapshot.completed_tasks.insert(task_id.to_string());
        self.snapshot.tasks_submitted_this_week += 1;
        self.touch();
        self.events.push(ProgressEvent::TaskCompleted { task_id: task_id.to_string() });
        info!("Task {} submitted", task_id);

        self.award_xp(xp_awarded, XpSource::Task(task_id.to_string()));
        self.evaluate_badges();
        true
    }

    /// Record a finished quiz and fold its score into the running average.
    /// Returns false if nothing changed.
    pub fn complete_quiz(&mut self, quiz_id: &str, score: u8, xp_awarded: u32) -> bool {
        if self.snapshot.completed_quizzes.contains(quiz_id) {
            debug!("Quiz {} already completed, ignoring", quiz_id);
            return false;
        }
        if !self.catalog.weeks.iter().any(|w| w.quiz.id == quiz_id) {
            warn!("Ignoring unknown quiz {}", quiz_id);
            return false;
        }

        let score = match (score > 100, self.options.score_policy) {
            (false, _) => score,
            (true, ScorePolicy::Clamp) => {
                warn!("Quiz {} score {} out of range, clamping to 100", quiz_id, score);
                100
            }
            (true, ScorePolicy::Reject) => {
                warn!("Rejecting quiz {} with out-of-range score {}", quiz_id, score);
                return false;
            }
        };

        let prior_count = self.snapshot.completed_quizzes.len() as f64;
        let prior_avg = self.snapshot.average_quiz_score;
        self.snapshot.average_quiz_score =
            (prior_avg * prior_count + f64::from(score)) / (prior_count + 1.0);
        self.snapshot.completed_quizzes.insert(quiz_id.to_string());

        self.touch();
        self.events.push(ProgressEvent::QuizCompleted { quiz_id: quiz_id.to_string(), score });
        info!(
            "Quiz {} completed with {}%, average now {:.1}",
            quiz_id, score, self.snapshot.average_quiz_score
        );

        self.award_xp(xp_awarded, XpSource::Quiz(quiz_id.to_string()));
        self.evaluate_badges();
        true
    }

    // === XP, badges and counters ===

    /// Add XP from any source
    pub fn update_xp(&mut self, amount: u32, source: XpSource) {
        self.award_xp(amount, source);
        self.evaluate_badges();
    }

    /// Explicitly grant a badge for a fixed XP reward. Returns false if the
    /// learner already holds it or the catalog does not define it.
    pub fn add_badge(&mut self, badge_id: &str) -> bool {
        if self.snapshot.badges.contains(badge_id) {
            debug!("Badge {} already granted, ignoring", badge_id);
            return false;
        }
        if self.catalog.badge(badge_id).is_none() {
            warn!("Ignoring unknown badge {}", badge_id);
            return false;
        }

        self.snapshot.badges.insert(badge_id.to_string());
        self.events.push(ProgressEvent::BadgeGranted {
            badge_id: badge_id.to_string(),
            xp_reward: MANUAL_BADGE_XP,
        });
        info!("Badge {} granted", badge_id);

        self.award_xp(MANUAL_BADGE_XP, XpSource::Badge(badge_id.to_string()));
        self.evaluate_badges();
        true
    }

    /// Add learning time in minutes
    pub fn update_time_spent(&mut self, minutes: u32) {
        self.snapshot.total_time_spent = self.snapshot.total_time_spent.saturating_add(minutes);
        self.touch();
        self.evaluate_badges();
    }

    /// Set the activity streak computed by the host's calendar logic
    pub fn record_streak(&mut self, days: u32) {
        self.snapshot.current_streak = days;
        self.touch();
        debug!("Streak set to {} days", days);
        self.evaluate_badges();
    }

    /// Zero the per-week counters at a weekly rollover
    pub fn reset_weekly_counters(&mut self) {
        self.snapshot.tasks_submitted_this_week = 0;
        self.snapshot.lessons_completed_this_week = 0;
        debug!("Weekly counters reset");
    }

    // === Lifecycle ===

    /// Replace the snapshot with the all-zero initial state
    pub fn reset_progress(&mut self) {
        self.snapshot = ProgressSnapshot::default();
        self.events.push(ProgressEvent::Reset);
        info!("Progress reset");
    }

    /// Start a brand-new learner and grant the welcome badge
    pub fn initialize_new_user(&mut self) {
        self.reset_progress();
        let welcome = self.options.welcome_badge.clone();
        self.add_badge(&welcome);
    }

    /// Rehydrate a returning learner from previously saved values
    pub fn initialize_existing_user(&mut self, partial: PartialSnapshot) {
        self.snapshot = partial.merged_onto_default();
        self.touch();
        self.events.push(ProgressEvent::Reset);
        info!(
            "Restored learner at level {} with {} XP",
            self.snapshot.level, self.snapshot.total_xp
        );
    }

    // === Derived queries ===

    /// Progress toward the next level
    pub fn level_progress(&self) -> LevelProgress {
        self.snapshot.level_progress()
    }

    /// Percentage of a week's lessons completed (0 if untouched)
    pub fn week_progress(&self, week_number: u32) -> u8 {
        self.snapshot.weekly_progress.get(&week_number).copied().unwrap_or(0)
    }

    /// Course-wide completion: fully completed weeks over total weeks
    pub fn total_progress(&self) -> u8 {
        let total = self.catalog.total_weeks();
        if total == 0 {
            return 0;
        }
        let done = self.snapshot.completed_weeks() as f64;
        (done / f64::from(total) * 100.0).round().min(100.0) as u8
    }

    /// The learner's current week
    pub fn current_week_number(&self) -> u32 {
        unlock::current_week_number(&self.catalog, &self.snapshot)
    }

    /// Whether a lesson is accessible right now
    pub fn is_lesson_unlocked(&self, lesson_id: &str) -> bool {
        unlock::is_lesson_unlocked(&self.catalog, &self.snapshot, lesson_id)
    }

    /// Every accessible lesson in program order
    pub fn unlocked_lessons(&self) -> Vec<&str> {
        unlock::unlocked_lessons(&self.catalog, &self.snapshot)
    }

    // === Internals ===

    /// The single path by which XP changes
    fn award_xp(&mut self, amount: u32, source: XpSource) {
        let before = self.snapshot.level;
        self.snapshot.total_xp = self.snapshot.total_xp.saturating_add(amount);
        self.snapshot.recompute_level();
        self.touch();

        if amount > 0 {
            debug!("+{} XP from {}, total {}", amount, source, self.snapshot.total_xp);
            self.events.push(ProgressEvent::XpAwarded { amount, source });
        }
        if self.snapshot.level != before {
            info!("Level up: {} -> {}", before, self.snapshot.level);
            self.events.push(ProgressEvent::LevelUp { from: before, to: self.snapshot.level });
        }
    }

    /// One evaluation pass: grant every newly satisfied badge in one step,
    /// then pay out their rewards. Rewards do not trigger another pass.
    fn evaluate_badges(&mut self) {
        let earned: Vec<(String, u32)> = evaluator::newly_earned(&self.catalog, &self.snapshot)
            .into_iter()
            .map(|badge| (badge.id.clone(), badge.xp_reward))
            .collect();

        if earned.is_empty() {
            return;
        }

        self.snapshot.badges.extend(earned.iter().map(|(id, _)| id.clone()));

        for (badge_id, xp_reward) in earned {
            info!("Badge {} earned", badge_id);
            self.events.push(ProgressEvent::BadgeGranted { badge_id: badge_id.clone(), xp_reward });
            self.award_xp(xp_reward, XpSource::Badge(badge_id));
        }
    }

    fn touch(&mut self) {
        self.snapshot.last_activity_date = Some(Utc::now());
    }
}
