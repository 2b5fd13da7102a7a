//! Curriculum content model
//!
//! A program is an ordered list of weeks. Each week holds its lessons in
//! order, plus exactly one quiz and one task.

use serde::{Deserialize, Serialize};

/// A lesson within a week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    /// Globally unique identifier (e.g., "lesson-1-1")
    pub id: String,
    /// Position within the week (1-indexed)
    pub order: u32,
    /// Display title
    #[serde(default)]
    pub title: String,
}

impl Lesson {
    /// Create a new lesson
    pub fn new(id: impl Into<String>, order: u32) -> Self {
        Self { id: id.into(), order, title: String::new() }
    }

    /// Set the display title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// End-of-week quiz
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub xp_reward: u32,
}

/// Hands-on task submitted once per week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub xp_reward: u32,
}

/// A week of the program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Week {
    /// Week identifier (e.g., "week-1")
    pub id: String,
    /// Week number (1-indexed, contiguous across the program)
    pub week_number: u32,
    /// Lessons in order
    pub lessons: Vec<Lesson>,
    pub quiz: Quiz,
    pub task: Task,
}

impl Week {
    /// Find a lesson in this week by id
    pub fn lesson(&self, lesson_id: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id == lesson_id)
    }

    /// Check whether a lesson id belongs to this week
    pub fn contains_lesson(&self, lesson_id: &str) -> bool {
        self.lesson(lesson_id).is_some()
    }

    /// The lesson with the lowest order
    pub fn first_lesson(&self) -> Option<&Lesson> {
        self.lessons.iter().min_by_key(|l| l.order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_week() -> Week {
        Week {
            id: "week-1".into(),
            week_number: 1,
            lessons: vec![Lesson::new("b", 2), Lesson::new("a", 1).with_title("Intro")],
            quiz: Quiz { id: "quiz-1-1".into(), xp_reward: 30 },
            task: Task { id: "task-1-1".into(), xp_reward: 25 },
        }
    }

    #[test]
    fn first_lesson_uses_order_not_position() {
        let week = sample_week();
        assert_eq!(week.first_lesson().map(|l| l.id.as_str()), Some("a"));
    }

    #[test]
    fn contains_lesson() {
        let week = sample_week();
        assert!(week.contains_lesson("b"));
        assert!(!week.contains_lesson("c"));
    }

    #[test]
    fn week_deserializes_camel_case() {
        let json = r#"{
            "id": "week-2",
            "weekNumber": 2,
            "lessons": [{"id": "lesson-2-1", "order": 1}],
            "quiz": {"id": "quiz-2-1", "xpReward": 30},
            "task": {"id": "task-2-1", "xpReward": 25}
        }"#;
        let week: Week = serde_json::from_str(json).unwrap();
        assert_eq!(week.week_number, 2);
        assert_eq!(week.quiz.xp_reward, 30);
        assert!(week.lessons[0].title.is_empty());
    }
}
