//! Lesson unlock policy
//!
//! Pure functions over the catalog and a snapshot. Results depend only on
//! the completed-lesson set, so they must be recomputed after every mutation
//! and never cached across one.

use crate::catalog::{Catalog, LESSONS_PER_WEEK, Lesson, Week};

use super::ProgressSnapshot;

/// The learner's current week, derived from how many lessons are done
///
/// Follows the fixed five-lessons-per-week cadence and is capped at the last
/// week of the program.
pub fn current_week_number(catalog: &Catalog, snapshot: &ProgressSnapshot) -> u32 {
    let by_count = (snapshot.completed_lessons.len() / LESSONS_PER_WEEK) as u32 + 1;
    by_count.min(catalog.total_weeks().max(1))
}

/// Whether a lesson is currently accessible. Unknown lesson ids are locked.
pub fn is_lesson_unlocked(catalog: &Catalog, snapshot: &ProgressSnapshot, lesson_id: &str) -> bool {
    match catalog.lesson(lesson_id) {
        Some((week, lesson)) => is_unlocked_in_week(catalog, snapshot, week, lesson),
        None => false,
    }
}

fn is_unlocked_in_week(
    catalog: &Catalog,
    snapshot: &ProgressSnapshot,
    week: &Week,
    lesson: &Lesson,
) -> bool {
    let is_first_of_week = week.first_lesson().is_some_and(|first| first.id == lesson.id);

    // Bootstrap: a fresh learner can always start the program
    if week.week_number == 1 && is_first_of_week {
        return true;
    }

    let current = current_week_number(catalog, snapshot);
    if week.week_number < current {
        return true;
    }
    if week.week_number > current {
        return false;
    }

    if is_first_of_week {
        return true;
    }

    let done_before = week
        .lessons
        .iter()
        .filter(|l| l.order < lesson.order && snapshot.completed_lessons.contains(&l.id))
        .count();
    done_before >= (lesson.order as usize).saturating_sub(1)
}

/// All currently unlocked lesson ids in program order
pub fn unlocked_lessons<'a>(catalog: &'a Catalog, snapshot: &ProgressSnapshot) -> Vec<&'a str> {
    catalog
        .weeks
        .iter()
        .flat_map(|week| week.lessons.iter().map(move |lesson| (week, lesson)))
        .filter(|(week, lesson)| is_unlocked_in_week(catalog, snapshot, week, lesson))
        .map(|(_, lesson)| lesson.id.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_completed(ids: &[&str]) -> ProgressSnapshot {
        let mut snapshot = ProgressSnapshot::default();
        snapshot.completed_lessons.extend(ids.iter().map(|s| s.to_string()));
        snapshot
    }

    #[test]
    fn fresh_learner_only_has_first_lesson() {
        let catalog = Catalog::default_program();
        let snapshot = ProgressSnapshot::default();
        assert_eq!(unlocked_lessons(&catalog, &snapshot), vec!["lesson-1-1"]);
    }

    #[test]
    fn lessons_unlock_linearly_within_week() {
        let catalog = Catalog::default_program();
        let snapshot = with_completed(&["lesson-1-1", "lesson-1-2"]);
        assert!(is_lesson_unlocked(&catalog, &snapshot, "lesson-1-3"));
        assert!(!is_lesson_unlocked(&catalog, &snapshot, "lesson-1-4"));
    }

    #[test]
    fn skipped_lesson_blocks_later_ones() {
        let catalog = Catalog::default_program();
        let snapshot = with_completed(&["lesson-1-1", "lesson-1-3"]);
        assert!(is_lesson_unlocked(&catalog, &snapshot, "lesson-1-2"));
        assert!(!is_lesson_unlocked(&catalog, &snapshot, "lesson-1-4"));
    }

    #[test]
    fn current_week_follows_completed_count() {
        let catalog = Catalog::default_program();
        assert_eq!(current_week_number(&catalog, &ProgressSnapshot::default()), 1);

        let snapshot = with_completed(&["a", "b", "c", "d", "e"]);
        assert_eq!(current_week_number(&catalog, &snapshot), 2);
    }

    #[test]
    fn current_week_is_capped_at_program_length() {
        let catalog = Catalog::default_program();
        let mut snapshot = ProgressSnapshot::default();
        snapshot.completed_lessons.extend((0..200).map(|i| format!("l{i}")));
        assert_eq!(current_week_number(&catalog, &snapshot), 13);
    }

    #[test]
    fn finished_week_unlocks_next_week_start() {
        let catalog = Catalog::default_program();
        let snapshot = with_completed(&[
            "lesson-1-1",
            "lesson-1-2",
            "lesson-1-3",
            "lesson-1-4",
            "lesson-1-5",
        ]);
        assert!(is_lesson_unlocked(&catalog, &snapshot, "lesson-2-1"));
        assert!(!is_lesson_unlocked(&catalog, &snapshot, "lesson-2-2"));
        assert!(!is_lesson_unlocked(&catalog, &snapshot, "lesson-3-1"));
    }

    #[test]
    fn earlier_weeks_stay_open() {
        let catalog = Catalog::default_program();
        let mut ids: Vec<String> = (1..=5).map(|n| format!("lesson-1-{n}")).collect();
        ids.extend((1..=5).map(|n| format!("lesson-2-{n}")));
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let snapshot = with_completed(&refs);

        assert!(is_lesson_unlocked(&catalog, &snapshot, "lesson-1-5"));
        assert!(is_lesson_unlocked(&catalog, &snapshot, "lesson-2-3"));
        assert!(is_lesson_unlocked(&catalog, &snapshot, "lesson-3-1"));
    }

    #[test]
    fn unknown_lesson_is_locked() {
        let catalog = Catalog::default_program();
        assert!(!is_lesson_unlocked(&catalog, &ProgressSnapshot::default(), "lesson-99-1"));
    }
}
