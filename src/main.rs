use anyhow::Result;
use ascend::Config;
use ascend::config::storage::ProgressFile;
use ascend::progress::{Mutation, ProgressStore, XpSource};
use ascend::shell;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ascend")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Progress file to use instead of the default data directory
    #[arg(short, long, global = true)]
    file: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new learner (replaces any saved progress)
    Init,
    /// Show level, XP and course progress
    Status,
    /// Complete a lesson
    Lesson {
        /// Lesson id, e.g. lesson-1-1
        id: String,
        /// Week the lesson belongs to
        week: u32,
    },
    /// Submit a task
    Task {
        id: String,
        /// XP to award
        xp: u32,
    },
    /// Finish a quiz
    Quiz {
        id: String,
        /// Score (0-100)
        score: u8,
        /// XP to award
        xp: u32,
    },
    /// Award XP directly
    Xp { amount: u32 },
    /// Grant a badge
    Badge { id: String },
    /// Add learning time in minutes
    Time { minutes: u32 },
    /// Set the activity streak
    Streak { days: u32 },
    /// Reset weekly counters
    Rollover,
    /// Reset all progress
    Reset,
    /// List unlocked lessons
    Lessons,
    /// List earned badges
    Badges,
    /// Interactive shell
    Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ascend=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let file = match cli.file {
        Some(path) => ProgressFile::at(path),
        None => ProgressFile::default_location()?,
    };

    let mut store = ProgressStore::with_options(config.catalog()?, config.store_options());
    match file.load()? {
        Some(saved) => store.initialize_existing_user(saved),
        None => {
            store.initialize_new_user();
            file.save(store.snapshot())?;
        }
    }
    store.drain_events();

    let mutation = match cli.command.unwrap_or(Commands::Status) {
        Commands::Init => Mutation::InitializeNewUser,
        Commands::Lesson { id, week } => {
            Mutation::CompleteLesson { lesson_id: id, week_number: week }
        }
        Commands::Task { id, xp } => Mutation::CompleteTask { task_id: id, xp_awarded: xp },
        Commands::Quiz { id, score, xp } => {
            Mutation::CompleteQuiz { quiz_id: id, score, xp_awarded: xp }
        }
        Commands::Xp { amount } => Mutation::UpdateXp { amount, source: XpSource::Manual },
        Commands::Badge { id } => Mutation::AddBadge { badge_id: id },
        Commands::Time { minutes } => Mutation::UpdateTimeSpent { minutes },
        Commands::Streak { days } => Mutation::RecordStreak { days },
        Commands::Rollover => Mutation::ResetWeeklyCounters,
        Commands::Reset => Mutation::ResetProgress,
        Commands::Status => {
            println!("{}", shell::render_status(&store));
            return Ok(());
        }
        Commands::Lessons => {
            for lesson in store.unlocked_lessons() {
                println!("{lesson}");
            }
            return Ok(());
        }
        Commands::Badges => {
            println!("{}", shell::render_badges(store.snapshot()));
            return Ok(());
        }
        Commands::Shell => return shell::run(store, file).await,
    };

    if mutation.apply(&mut store) {
        for event in store.drain_events() {
            println!("{event}");
        }
    } else {
        println!("Nothing changed");
    }
    file.save(store.snapshot())?;

    Ok(())
}
