//! Ascend - learner progress and gamification engine
//!
//! Ascend tracks a learner's experience points, level, badges and lesson
//! unlocks against a static curriculum catalog, and keeps every derived value
//! consistent after each completion event.

pub mod catalog;
pub mod config;
pub mod error;
pub mod progress;
pub mod shell;

pub use catalog::Catalog;
pub use config::Config;
pub use error::AscendError;
pub use progress::{ProgressSnapshot, ProgressStore};
