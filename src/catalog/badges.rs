//! Badge definitions and their unlock requirements
//!
//! Requirements are plain data so a new badge is one more entry in the
//! catalog rather than a new code path.

use serde::{Deserialize, Serialize};

use crate::progress::ProgressSnapshot;

/// Condition a snapshot must satisfy for a badge to be granted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Requirement {
    /// Never granted automatically; only through an explicit grant
    Manual,
    /// Total XP reached a threshold
    XpAtLeast(u32),
    /// Number of completed lessons reached a threshold
    LessonsCompleted(usize),
    /// Number of completed tasks reached a threshold
    TasksCompleted(usize),
    /// Number of completed quizzes reached a threshold
    QuizzesCompleted(usize),
    /// Number of fully completed weeks reached a threshold
    WeeksCompleted(usize),
    /// Activity streak reached a number of days
    StreakAtLeast(u32),
    /// Enough quizzes taken with a high enough running average
    QuizPerformance { min_quizzes: usize, min_average: f64 },
}

impl Requirement {
    /// Evaluate this requirement against a snapshot
    pub fn is_met(&self, snapshot: &ProgressSnapshot) -> bool {
        match self {
            Requirement::Manual => false,
            Requirement::XpAtLeast(xp) => snapshot.total_xp >= *xp,
            Requirement::LessonsCompleted(n) => snapshot.completed_lessons.len() >= *n,
            Requirement::TasksCompleted(n) => snapshot.completed_tasks.len() >= *n,
            Requirement::QuizzesCompleted(n) => snapshot.completed_quizzes.len() >= *n,
            Requirement::WeeksCompleted(n) => snapshot.completed_weeks() >= *n,
            Requirement::StreakAtLeast(days) => snapshot.current_streak >= *days,
            Requirement::QuizPerformance { min_quizzes, min_average } => {
                snapshot.completed_quizzes.len() >= *min_quizzes
                    && snapshot.average_quiz_score >= *min_average
            }
        }
    }
}

/// A badge that can be earned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeDefinition {
    /// Globally unique identifier (e.g., "xp-master-100")
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// How to earn it
    #[serde(default)]
    pub description: String,
    pub requirement: Requirement,
    /// XP granted once when the badge is earned
    pub xp_reward: u32,
}

impl BadgeDefinition {
    /// Create a new badge definition
    pub fn new(id: impl Into<String>, requirement: Requirement, xp_reward: u32) -> Self {
        Self { id: id.into(), name: String::new(), description: String::new(), requirement, xp_reward }
    }

    /// Set display name and description
    pub fn described(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.name = name.into();
        self.description = description.into();
        self
    }

    /// Whether the badge is only granted explicitly
    pub fn is_manual(&self) -> bool {
        matches!(self.requirement, Requirement::Manual)
    }
}

/// The built-in badge set
pub fn default_badges() -> Vec<BadgeDefinition> {
    vec![
        BadgeDefinition::new("first-step", Requirement::Manual, 25)
            .described("First Step", "Joined the program"),
        BadgeDefinition::new("first-lesson", Requirement::LessonsCompleted(1), 10)
            .described("First Lesson", "Finished your first lesson"),
        BadgeDefinition::new("week-warrior", Requirement::WeeksCompleted(1), 50)
            .described("Week Warrior", "Completed every lesson of a week"),
        BadgeDefinition::new("lesson-marathon", Requirement::LessonsCompleted(25), 50)
            .described("Lesson Marathon", "Finished 25 lessons"),
        BadgeDefinition::new("task-tackler", Requirement::TasksCompleted(5), 40)
            .described("Task Tackler", "Submitted 5 tasks"),
        BadgeDefinition::new(
            "quiz-ace",
            Requirement::QuizPerformance { min_quizzes: 3, min_average: 90.0 },
            75,
        )
        .described("Quiz Ace", "Averaged 90% or more over at least 3 quizzes"),
        BadgeDefinition::new("streak-7", Requirement::StreakAtLeast(7), 30)
            .described("On Fire", "Kept a 7-day activity streak"),
        BadgeDefinition::new("xp-master-100", Requirement::XpAtLeast(100), 20)
            .described("XP Master I", "Earned 100 XP"),
        BadgeDefinition::new("xp-master-500", Requirement::XpAtLeast(500), 50)
            .described("XP Master II", "Earned 500 XP"),
        BadgeDefinition::new("course-graduate", Requirement::WeeksCompleted(13), 200)
            .described("Graduate", "Completed all 13 weeks"),
    ]
}
