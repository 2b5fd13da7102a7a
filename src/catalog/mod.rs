//! Curriculum catalog
//!
//! The catalog is the static, read-only description of a program: its weeks,
//! lessons, quizzes, tasks and badge definitions. The engine reads it but
//! never mutates it.

pub mod badges;
pub mod model;

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub use badges::{BadgeDefinition, Requirement, default_badges};
pub use model::{Lesson, Quiz, Task, Week};

use crate::error::AscendError;

/// Lessons per week in the standard program cadence
pub const LESSONS_PER_WEEK: usize = 5;

/// Weeks in the built-in program
pub const DEFAULT_WEEKS: u32 = 13;

static DEFAULT_CATALOG: Lazy<Arc<Catalog>> = Lazy::new(|| Arc::new(Catalog::default_program()));

/// A complete program definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    /// Weeks ordered by week number
    pub weeks: Vec<Week>,
    /// All badges that can be earned
    #[serde(default)]
    pub badges: Vec<BadgeDefinition>,
}

impl Catalog {
    /// Shared handle to the built-in program
    pub fn shared_default() -> Arc<Catalog> {
        Arc::clone(&DEFAULT_CATALOG)
    }

    /// Build the built-in 13-week program
    pub fn default_program() -> Self {
        let weeks = (1..=DEFAULT_WEEKS)
            .map(|w| Week {
                id: format!("week-{w}"),
                week_number: w,
                lessons: (1..=LESSONS_PER_WEEK as u32)
                    .map(|n| {
                        Lesson::new(format!("lesson-{w}-{n}"), n)
                            .with_title(format!("Week {w}, lesson {n}"))
                    })
                    .collect(),
                quiz: Quiz { id: format!("quiz-{w}-1"), xp_reward: 30 },
                task: Task { id: format!("task-{w}-1"), xp_reward: 25 },
            })
            .collect();

        Self { weeks, badges: default_badges() }
    }

    /// Parse and validate a catalog from JSON
    pub fn from_json_str(json: &str) -> Result<Self, AscendError> {
        let mut catalog: Catalog = serde_json::from_str(json)?;
        catalog.weeks.sort_by_key(|w| w.week_number);
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load and validate a catalog file
    pub fn load(path: &Path) -> Result<Self, AscendError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|source| AscendError::CatalogIo { path: path.to_path_buf(), source })?;
        let catalog = Self::from_json_str(&contents)?;
        tracing::debug!(
            "Loaded catalog from {:?}: {} weeks, {} badges",
            path,
            catalog.weeks.len(),
            catalog.badges.len()
        );
        Ok(catalog)
    }

    /// Check structural rules: contiguous week numbers, unique ids, 1..k lesson orders
    pub fn validate(&self) -> Result<(), AscendError> {
        if self.weeks.is_empty() {
            return Err(AscendError::InvalidCatalog("catalog has no weeks".into()));
        }

        let mut ids = HashSet::new();
        let mut claim = |id: &str| -> Result<(), AscendError> {
            if ids.insert(id.to_string()) {
                Ok(())
            } else {
                Err(AscendError::InvalidCatalog(format!("duplicate id '{id}'")))
            }
        };

        for (idx, week) in self.weeks.iter().enumerate() {
            let expected = idx as u32 + 1;
            if week.week_number != expected {
                return Err(AscendError::InvalidCatalog(format!(
                    "week numbers must be contiguous from 1: expected {expected}, found {}",
                    week.week_number
                )));
            }

            let mut orders: Vec<u32> = week.lessons.iter().map(|l| l.order).collect();
            orders.sort_unstable();
            if orders.iter().enumerate().any(|(i, &o)| o != i as u32 + 1) {
                return Err(AscendError::InvalidCatalog(format!(
                    "lesson orders in week {} must be 1..{}",
                    week.week_number,
                    week.lessons.len()
                )));
            }

            for lesson in &week.lessons {
                claim(lesson.id.as_str())?;
            }
            claim(week.quiz.id.as_str())?;
            claim(week.task.id.as_str())?;
        }

        let mut badge_ids = HashSet::new();
        for badge in &self.badges {
            if !badge_ids.insert(badge.id.as_str()) {
                return Err(AscendError::InvalidCatalog(format!(
                    "duplicate badge id '{}'",
                    badge.id
                )));
            }
        }

        Ok(())
    }

    /// Number of weeks in the program
    pub fn total_weeks(&self) -> u32 {
        self.weeks.len() as u32
    }

    /// Total lessons across all weeks
    pub fn lesson_count(&self) -> usize {
        self.weeks.iter().map(|w| w.lessons.len()).sum()
    }

    /// Get a week by number
    pub fn week(&self, week_number: u32) -> Option<&Week> {
        self.weeks.iter().find(|w| w.week_number == week_number)
    }

    /// Find a lesson and the week that holds it
    pub fn lesson(&self, lesson_id: &str) -> Option<(&Week, &Lesson)> {
        self.weeks.iter().find_map(|w| w.lesson(lesson_id).map(|l| (w, l)))
    }

    /// Get a badge definition by id
    pub fn badge(&self, badge_id: &str) -> Option<&BadgeDefinition> {
        self.badges.iter().find(|b| b.id == badge_id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::default_program()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_program_shape() {
        let catalog = Catalog::default_program();
        assert_eq!(catalog.total_weeks(), 13);
        assert_eq!(catalog.lesson_count(), 65);
        assert!(catalog.validate().is_ok());

        let (week, lesson) = catalog.lesson("lesson-3-4").unwrap();
        assert_eq!(week.week_number, 3);
        assert_eq!(lesson.order, 4);
        assert_eq!(lesson.title, "Week 3, lesson 4");
        assert_eq!(catalog.week(1).unwrap().task.id, "task-1-1");
    }

    #[test]
    fn shared_default_is_the_same_instance() {
        let a = Catalog::shared_default();
        let b = Catalog::shared_default();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn rejects_gap_in_week_numbers() {
        let mut catalog = Catalog::default_program();
        catalog.weeks.remove(1);
        let err = catalog.validate().unwrap_err();
        assert!(err.to_string().contains("contiguous"));
    }

    #[test]
    fn rejects_duplicate_lesson_ids() {
        let mut catalog = Catalog::default_program();
        catalog.weeks[1].lessons[0].id = "lesson-1-1".into();
        let err = catalog.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate id 'lesson-1-1'"));
    }

    #[test]
    fn rejects_bad_lesson_order() {
        let mut catalog = Catalog::default_program();
        catalog.weeks[0].lessons[2].order = 7;
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn rejects_duplicate_badges() {
        let mut catalog = Catalog::default_program();
        let dup = catalog.badges[0].clone();
        catalog.badges.push(dup);
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn rejects_empty_catalog() {
        let err = Catalog::from_json_str(r#"{"weeks": []}"#).unwrap_err();
        assert!(err.is_catalog_error());
    }

    #[test]
    fn json_round_trip_preserves_program() {
        let catalog = Catalog::default_program();
        let json = serde_json::to_string(&catalog).unwrap();
        let parsed = Catalog::from_json_str(&json).unwrap();
        assert_eq!(parsed, catalog);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Catalog::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, AscendError::CatalogIo { .. }));
    }
}
