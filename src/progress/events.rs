//! Change notifications emitted by the progress store

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where an XP award came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum XpSource {
    Lesson(String),
    Task(String),
    Quiz(String),
    Badge(String),
    /// Direct award from admin tooling or the host
    Manual,
}

impl fmt::Display for XpSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XpSource::Lesson(id) => write!(f, "lesson {id}"),
            XpSource::Task(id) => write!(f, "task {id}"),
            XpSource::Quiz(id) => write!(f, "quiz {id}"),
            XpSource::Badge(id) => write!(f, "badge {id}"),
            XpSource::Manual => write!(f, "manual award"),
        }
    }
}

/// Something that changed in the snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ProgressEvent {
    LessonCompleted { lesson_id: String, week_number: u32 },
    TaskCompleted { task_id: String },
    QuizCompleted { quiz_id: String, score: u8 },
    XpAwarded { amount: u32, source: XpSource },
    LevelUp { from: u32, to: u32 },
    BadgeGranted { badge_id: String, xp_reward: u32 },
    /// Snapshot was replaced wholesale (reset or rehydration)
    Reset,
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::LessonCompleted { lesson_id, week_number } => {
                write!(f, "Completed {lesson_id} (week {week_number})")
            }
            ProgressEvent::TaskCompleted { task_id } => write!(f, "Submitted {task_id}"),
            ProgressEvent::QuizCompleted { quiz_id, score } => {
                write!(f, "Finished {quiz_id} with {score}%")
            }
            ProgressEvent::XpAwarded { amount, source } => write!(f, "+{amount} XP ({source})"),
            ProgressEvent::LevelUp { from, to } => write!(f, "Level up! {from} -> {to}"),
            ProgressEvent::BadgeGranted { badge_id, xp_reward } => {
                write!(f, "Badge earned: {badge_id} (+{xp_reward} XP)")
            }
            ProgressEvent::Reset => write!(f, "Progress reset"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_xp_award() {
        let event = ProgressEvent::XpAwarded { amount: 15, source: XpSource::Lesson("lesson-1-1".into()) };
        assert_eq!(event.to_string(), "+15 XP (lesson lesson-1-1)");
    }

    #[test]
    fn event_serializes_camel_case() {
        let event = ProgressEvent::BadgeGranted { badge_id: "first-step".into(), xp_reward: 25 };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"badgeGranted":{"badgeId":"first-step","xpReward":25}}"#);
    }
}
