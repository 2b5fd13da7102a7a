//! Command parsing for the interactive shell

use crate::progress::{Mutation, XpSource};

/// Parsed command from a shell line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Apply a progress mutation: lesson, task, quiz, xp, badge, time, streak, ...
    Mutate(Mutation),
    /// Show level, XP and course progress: status
    Status,
    /// Show unlocked lessons: lessons
    Lessons,
    /// Show earned badges: badges
    Badges,
    /// Show one week's progress: week <n>
    Week(u32),
    /// Save progress now: save
    Save,
    /// Show help: help or h
    Help,
    /// Leave the shell: quit or q
    Quit,
    /// Empty line
    Nop,
}

/// Result of parsing a command
#[derive(Debug, PartialEq)]
pub enum ParseResult {
    /// Successfully parsed command
    Ok(Command),
    /// Unknown command
    UnknownCommand(String),
    /// Command needs more arguments
    MissingArgument(String),
    /// An argument was not a valid number
    InvalidNumber(String),
}

/// Parse one shell line
pub fn parse_command(input: &str) -> ParseResult {
    let input = input.trim();

    if input.is_empty() {
        return ParseResult::Ok(Command::Nop);
    }

    let mut parts = input.split_whitespace();
    let cmd = parts.next().unwrap_or("");
    let args: Vec<&str> = parts.collect();

    match cmd.to_lowercase().as_str() {
        "lesson" | "l" => match args.as_slice() {
            [id, week, ..] => match number(week) {
                Ok(week_number) => mutate(Mutation::CompleteLesson {
                    lesson_id: id.to_string(),
                    week_number,
                }),
                Err(e) => e,
            },
            _ => ParseResult::MissingArgument("lesson".to_string()),
        },
        "task" | "t" => match args.as_slice() {
            [id, xp, ..] => match number(xp) {
                Ok(xp_awarded) => {
                    mutate(Mutation::CompleteTask { task_id: id.to_string(), xp_awarded })
                }
                Err(e) => e,
            },
            _ => ParseResult::MissingArgument("task".to_string()),
        },
        "quiz" => match args.as_slice() {
            [id, score, xp, ..] => match (number::<u8>(score), number(xp)) {
                (Ok(score), Ok(xp_awarded)) => {
                    mutate(Mutation::CompleteQuiz { quiz_id: id.to_string(), score, xp_awarded })
                }
                (Err(e), _) | (_, Err(e)) => e,
            },
            _ => ParseResult::MissingArgument("quiz".to_string()),
        },
        "xp" => match args.as_slice() {
            [amount, ..] => match number(amount) {
                Ok(amount) => mutate(Mutation::UpdateXp { amount, source: XpSource::Manual }),
                Err(e) => e,
            },
            _ => ParseResult::MissingArgument("xp".to_string()),
        },
        "badge" | "b" => match args.as_slice() {
            [id, ..] => mutate(Mutation::AddBadge { badge_id: id.to_string() }),
            _ => ParseResult::MissingArgument("badge".to_string()),
        },
        "time" => match args.as_slice() {
            [minutes, ..] => match number(minutes) {
                Ok(minutes) => mutate(Mutation::UpdateTimeSpent { minutes }),
                Err(e) => e,
            },
            _ => ParseResult::MissingArgument("time".to_string()),
        },
        "streak" => match args.as_slice() {
            [days, ..] => match number(days) {
                Ok(days) => mutate(Mutation::RecordStreak { days }),
                Err(e) => e,
            },
            _ => ParseResult::MissingArgument("streak".to_string()),
        },
        "week" | "w" => match args.as_slice() {
            [n, ..] => match number(n) {
                Ok(n) => ParseResult::Ok(Command::Week(n)),
                Err(e) => e,
            },
            _ => ParseResult::MissingArgument("week".to_string()),
        },
        "rollover" => mutate(Mutation::ResetWeeklyCounters),
        "reset" => mutate(Mutation::ResetProgress),
        "init" => mutate(Mutation::InitializeNewUser),
        "status" | "s" => ParseResult::Ok(Command::Status),
        "lessons" | "ls" => ParseResult::Ok(Command::Lessons),
        "badges" => ParseResult::Ok(Command::Badges),
        "save" => ParseResult::Ok(Command::Save),
        "help" | "h" | "?" => ParseResult::Ok(Command::Help),
        "quit" | "q" | "exit" => ParseResult::Ok(Command::Quit),
        _ => ParseResult::UnknownCommand(cmd.to_string()),
    }
}

/// Help text listing shell commands
pub const HELP: &str = "\
lesson <id> <week>        complete a lesson
task <id> <xp>            submit a task
quiz <id> <score> <xp>    finish a quiz
xp <amount>               award XP
badge <id>                grant a badge
time <minutes>            add learning time
streak <days>             set the activity streak
rollover                  reset weekly counters
week <n>                  show a week's progress
status | lessons | badges | save | reset | init | help | quit";

fn mutate(mutation: Mutation) -> ParseResult {
    ParseResult::Ok(Command::Mutate(mutation))
}

fn number<T: std::str::FromStr>(arg: &str) -> Result<T, ParseResult> {
    arg.parse().map_err(|_| ParseResult::InvalidNumber(arg.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_lesson_command() {
        assert_eq!(
            parse_command("lesson lesson-1-1 1"),
            ParseResult::Ok(Command::Mutate(Mutation::CompleteLesson {
                lesson_id: "lesson-1-1".into(),
                week_number: 1
            }))
        );
    }

    #[test]
    fn parse_lesson_missing_week() {
        assert!(matches!(parse_command("lesson lesson-1-1"), ParseResult::MissingArgument(_)));
    }

    #[test]
    fn parse_quiz_command() {
        match parse_command("quiz quiz-1-1 85 30") {
            ParseResult::Ok(Command::Mutate(Mutation::CompleteQuiz { quiz_id, score, xp_awarded })) => {
                assert_eq!(quiz_id, "quiz-1-1");
                assert_eq!(score, 85);
                assert_eq!(xp_awarded, 30);
            }
            other => panic!("Expected quiz mutation, got {:?}", other),
        }
    }

    #[test]
    fn negative_numbers_are_rejected() {
        assert_eq!(parse_command("xp -5"), ParseResult::InvalidNumber("-5".into()));
        assert_eq!(parse_command("time -1"), ParseResult::InvalidNumber("-1".into()));
    }

    #[test]
    fn quiz_score_must_fit_a_byte() {
        assert_eq!(parse_command("quiz quiz-1-1 300 10"), ParseResult::InvalidNumber("300".into()));
    }

    #[test]
    fn parse_xp_is_manual_award() {
        assert_eq!(
            parse_command("xp 40"),
            ParseResult::Ok(Command::Mutate(Mutation::UpdateXp {
                amount: 40,
                source: XpSource::Manual
            }))
        );
    }

    #[test]
    fn parse_queries() {
        assert_eq!(parse_command("status"), ParseResult::Ok(Command::Status));
        assert_eq!(parse_command("LS"), ParseResult::Ok(Command::Lessons));
        assert_eq!(parse_command("week 3"), ParseResult::Ok(Command::Week(3)));
        assert_eq!(parse_command("q"), ParseResult::Ok(Command::Quit));
    }

    #[test]
    fn parse_empty_is_nop() {
        assert_eq!(parse_command(""), ParseResult::Ok(Command::Nop));
        assert_eq!(parse_command("   "), ParseResult::Ok(Command::Nop));
    }

    #[test]
    fn parse_unknown_command() {
        assert_eq!(parse_command("dance"), ParseResult::UnknownCommand("dance".into()));
    }
}
