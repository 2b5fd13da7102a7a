//! Interactive shell that feeds completion events to a running store

pub mod command;

use std::fmt::Write as _;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::storage::ProgressFile;
use crate::progress::{ProgressHandle, ProgressSnapshot, ProgressStore};
use command::{Command, HELP, ParseResult, parse_command};

/// Render a short status block for a store
pub fn render_status(store: &ProgressStore) -> String {
    let snapshot = store.snapshot();
    let level = store.level_progress();
    let mut out = String::new();

    let _ = writeln!(out, "Level {} ({} XP total)", snapshot.level, snapshot.total_xp);
    let _ = writeln!(out, "  Next level: {}/{} XP ({}%)", level.current, level.next, level.percentage);
    let _ = writeln!(
        out,
        "  Week {} of {}, course {}% complete",
        store.current_week_number(),
        store.catalog().total_weeks(),
        store.total_progress()
    );
    let _ = writeln!(
        out,
        "  Lessons {}/{} | Tasks {} | Quizzes {} (avg {}%)",
        snapshot.completed_lessons.len(),
        store.catalog().lesson_count(),
        snapshot.completed_tasks.len(),
        snapshot.completed_quizzes.len(),
        snapshot.rounded_quiz_average()
    );
    let _ = write!(
        out,
        "  Streak {} days | {} min learning | {} badges",
        snapshot.current_streak,
        snapshot.total_time_spent,
        snapshot.badges.len()
    );
    out
}

/// Read commands from stdin until `quit` or end of input, saving on exit
pub async fn run(store: ProgressStore, file: ProgressFile) -> Result<()> {
    let handle = ProgressHandle::spawn(store);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("Type 'help' for commands.");

    while let Some(line) = lines.next_line().await? {
        match execute(&handle, &file, &line).await? {
            Some(output) if output.is_empty() => {}
            Some(output) => println!("{output}"),
            None => break,
        }
    }

    file.save(&handle.snapshot().await?)?;
    Ok(())
}

/// Run one shell line against the actor. Returns `None` on quit.
pub async fn execute(
    handle: &ProgressHandle,
    file: &ProgressFile,
    line: &str,
) -> Result<Option<String>> {
    let output = match parse_command(line) {
        ParseResult::Ok(Command::Mutate(mutation)) => {
            let outcome = handle.mutate(mutation).await?;
            if outcome.applied {
                outcome.events.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
            } else {
                "Nothing changed".to_string()
            }
        }
        ParseResult::Ok(Command::Status) => handle.inspect(render_status).await?,
        ParseResult::Ok(Command::Lessons) => {
            handle.inspect(|store| store.unlocked_lessons().join(" ")).await?
        }
        ParseResult::Ok(Command::Badges) => render_badges(&handle.snapshot().await?),
        ParseResult::Ok(Command::Week(n)) => {
            let percentage = handle.inspect(move |store| store.week_progress(n)).await?;
            format!("Week {n}: {percentage}%")
        }
        ParseResult::Ok(Command::Save) => {
            file.save(&handle.snapshot().await?)?;
            format!("Saved to {:?}", file.path())
        }
        ParseResult::Ok(Command::Help) => HELP.to_string(),
        ParseResult::Ok(Command::Quit) => return Ok(None),
        ParseResult::Ok(Command::Nop) => String::new(),
        ParseResult::UnknownCommand(cmd) => format!("Unknown command: {cmd}"),
        ParseResult::MissingArgument(cmd) => format!("Missing argument for {cmd}"),
        ParseResult::InvalidNumber(arg) => format!("Not a valid number: {arg}"),
    };
    Ok(Some(output))
}

/// Earned badges, one per line
pub fn render_badges(snapshot: &ProgressSnapshot) -> String {
    if snapshot.badges.is_empty() {
        return "No badges yet".to_string();
    }
    snapshot.badges.iter().map(|badge| format!("  * {badge}")).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use tempfile::TempDir;

    #[test]
    fn status_mentions_level_and_progress() {
        let mut store = ProgressStore::new(Catalog::shared_default());
        store.initialize_new_user();

        let status = render_status(&store);
        assert!(status.starts_with("Level 1 (25 XP total)"));
        assert!(status.contains("Week 1 of 13, course 0% complete"));
        assert!(status.contains("Lessons 0/65"));
        assert!(status.contains("1 badges"));
    }

    #[test]
    fn badges_render_one_per_line() {
        let mut store = ProgressStore::new(Catalog::shared_default());
        assert_eq!(render_badges(store.snapshot()), "No badges yet");

        store.initialize_new_user();
        store.complete_lesson("lesson-1-1", 1);
        assert_eq!(render_badges(store.snapshot()), "  * first-lesson\n  * first-step");
    }

    #[tokio::test]
    async fn queries_follow_mutations_through_the_actor() {
        let dir = TempDir::new().unwrap();
        let file = ProgressFile::at(dir.path().join("progress.json"));
        let handle = ProgressHandle::spawn(ProgressStore::new(Catalog::shared_default()));

        let events = execute(&handle, &file, "lesson lesson-1-1 1").await.unwrap().unwrap();
        assert!(events.contains("lesson-1-1"));

        let status = execute(&handle, &file, "status").await.unwrap().unwrap();
        assert!(status.contains("Lessons 1/65"));
        assert_eq!(
            execute(&handle, &file, "lessons").await.unwrap(),
            Some("lesson-1-1 lesson-1-2".to_string())
        );
        assert_eq!(execute(&handle, &file, "week 1").await.unwrap(), Some("Week 1: 20%".to_string()));
        assert_eq!(
            execute(&handle, &file, "lesson lesson-1-1 1").await.unwrap(),
            Some("Nothing changed".to_string())
        );
    }

    #[tokio::test]
    async fn save_writes_what_queries_show() {
        let dir = TempDir::new().unwrap();
        let file = ProgressFile::at(dir.path().join("progress.json"));
        let handle = ProgressHandle::spawn(ProgressStore::new(Catalog::shared_default()));

        execute(&handle, &file, "task task-1-1 25").await.unwrap();
        execute(&handle, &file, "save").await.unwrap();

        let saved = file.load().unwrap().unwrap().merged_onto_default();
        assert_eq!(saved, handle.snapshot().await.unwrap());
        assert_eq!(execute(&handle, &file, "quit").await.unwrap(), None);
    }
}
